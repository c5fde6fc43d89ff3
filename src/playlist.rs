use std::time::Duration;

use anyhow::Context as _;
use url::Url;

use crate::cli::ChaptersArgs;
use crate::error::{PipelineError, Result};
use crate::formats::ChapterDescriptor;
use crate::http::HttpFetcher;

/// Resolves a playlist's chapter URLs without downloading any audio.
pub fn list(args: ChaptersArgs) -> anyhow::Result<Vec<String>> {
    let url = Url::parse(&args.url).context("parse --url")?;
    if url.scheme() != "http" && url.scheme() != "https" {
        anyhow::bail!("--url must be http/https: {url}");
    }

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let urls = fetch_chapter_urls(&fetcher, url.as_str()).context("fetch chapter list")?;
    Ok(urls)
}

/// Fetches the playlist at `url` and returns the audio URLs of its chapters,
/// in playlist order. Chapters without audio are skipped.
pub fn fetch_chapter_urls(fetcher: &HttpFetcher, url: &str) -> Result<Vec<String>> {
    let body = fetcher.get_bytes(url, "application/json")?;
    let chapters = decode_chapters(url, &body)?;
    tracing::debug!(url, chapters = chapters.len(), "decoded playlist");
    Ok(chapter_urls(chapters))
}

pub fn decode_chapters(url: &str, body: &[u8]) -> Result<Vec<ChapterDescriptor>> {
    serde_json::from_slice(body).map_err(|source| PipelineError::Decode {
        url: url.to_owned(),
        source,
    })
}

pub fn chapter_urls(chapters: Vec<ChapterDescriptor>) -> Vec<String> {
    chapters
        .into_iter()
        .map(|chapter| chapter.audio)
        .filter(|audio| !audio.is_empty())
        .collect()
}
