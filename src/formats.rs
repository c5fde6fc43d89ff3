use serde::{Deserialize, Deserializer, Serialize};

/// One entry of a playlist response. Only `audio` drives the pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ChapterDescriptor {
    #[serde(deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub subtitle: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub audio: String,
    #[serde(rename = "buyUrl", deserialize_with = "null_as_empty")]
    pub buy_url: String,
    #[serde(rename = "downloadUrl", deserialize_with = "null_as_empty")]
    pub download_url: String,
    #[serde(rename = "downloadFilename", deserialize_with = "null_as_empty")]
    pub download_filename: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub cover: String,
    #[serde(deserialize_with = "null_as_empty")]
    pub lyrics: String,
}

// Playlist endpoints occasionally send `null` for unset fields.
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub output_dir: Option<String>,
    pub books: Vec<CatalogEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogEntry {
    pub url: String,
    pub output: String,
}
