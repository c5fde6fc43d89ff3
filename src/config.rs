use std::path::{Component, Path, PathBuf};

use anyhow::Context as _;
use url::Url;

use crate::formats::Catalog;
use crate::pipeline::BookJob;

pub fn load_catalog(path: &Path) -> anyhow::Result<Catalog> {
    let yaml = std::fs::read_to_string(path)
        .with_context(|| format!("read catalog: {}", path.display()))?;
    serde_yaml::from_str(&yaml).with_context(|| format!("parse catalog: {}", path.display()))
}

/// Turns catalog entries into jobs. `out_dir` overrides the catalog's
/// `output_dir`; with neither, outputs land in the current directory.
pub fn book_jobs(catalog: &Catalog, out_dir: Option<&Path>) -> anyhow::Result<Vec<BookJob>> {
    if catalog.books.is_empty() {
        anyhow::bail!("catalog has no books");
    }

    let base_dir = match (out_dir, catalog.output_dir.as_deref()) {
        (Some(dir), _) => dir.to_path_buf(),
        (None, Some(dir)) => PathBuf::from(dir),
        (None, None) => PathBuf::from("."),
    };

    let mut jobs = Vec::with_capacity(catalog.books.len());
    for (index, entry) in catalog.books.iter().enumerate() {
        let url = Url::parse(&entry.url)
            .with_context(|| format!("books[{index}]: parse url: {}", entry.url))?;
        if url.scheme() != "http" && url.scheme() != "https" {
            anyhow::bail!("books[{index}]: url must be http/https: {url}");
        }

        let output = Path::new(&entry.output);
        ensure_relative_output(output).with_context(|| format!("books[{index}]: output"))?;

        jobs.push(BookJob {
            name: entry.output.clone(),
            playlist_url: entry.url.clone(),
            output: base_dir.join(output),
        });
    }

    Ok(jobs)
}

fn ensure_relative_output(output: &Path) -> anyhow::Result<()> {
    if output.as_os_str().is_empty() {
        anyhow::bail!("must not be empty");
    }
    for component in output.components() {
        match component {
            Component::Normal(_) | Component::CurDir => {}
            Component::ParentDir => {
                anyhow::bail!("must not contain '..': {}", output.display());
            }
            Component::RootDir | Component::Prefix(_) => {
                anyhow::bail!("must be relative to the output dir: {}", output.display());
            }
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formats::CatalogEntry;

    fn catalog(books: &[(&str, &str)]) -> Catalog {
        Catalog {
            output_dir: Some("/srv/books".to_owned()),
            books: books
                .iter()
                .map(|(url, output)| CatalogEntry {
                    url: (*url).to_owned(),
                    output: (*output).to_owned(),
                })
                .collect(),
        }
    }

    #[test]
    fn book_jobs_join_outputs_onto_base_dir() -> anyhow::Result<()> {
        let catalog = catalog(&[
            ("https://host/?audioigniter_playlist_id=639", "one.mp3"),
            ("http://host/p/2", "series/two.mp3"),
        ]);

        let jobs = book_jobs(&catalog, None)?;
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].output, PathBuf::from("/srv/books/one.mp3"));
        assert_eq!(jobs[0].name, "one.mp3");
        assert_eq!(jobs[1].output, PathBuf::from("/srv/books/series/two.mp3"));

        let jobs = book_jobs(&catalog, Some(Path::new("elsewhere")))?;
        assert_eq!(jobs[0].output, PathBuf::from("elsewhere/one.mp3"));
        Ok(())
    }

    #[test]
    fn book_jobs_reject_invalid_entries() {
        let cases = [
            catalog(&[]),
            catalog(&[("not a url", "one.mp3")]),
            catalog(&[("ftp://host/p", "one.mp3")]),
            catalog(&[("http://host/p", "../escape.mp3")]),
            catalog(&[("http://host/p", "/abs.mp3")]),
            catalog(&[("http://host/p", "")]),
        ];
        for catalog in cases {
            assert!(book_jobs(&catalog, None).is_err(), "catalog={catalog:?}");
        }
    }

    #[test]
    fn load_catalog_parses_yaml() -> anyhow::Result<()> {
        let temp = tempfile::TempDir::new()?;
        let path = temp.path().join("catalog.yaml");
        std::fs::write(
            &path,
            "books:\n  - url: http://host/p/1\n    output: one.mp3\n",
        )?;

        let catalog = load_catalog(&path)?;
        assert!(catalog.output_dir.is_none());
        assert_eq!(catalog.books.len(), 1);
        assert_eq!(catalog.books[0].output, "one.mp3");
        Ok(())
    }
}
