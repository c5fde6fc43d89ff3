use crate::error::Result;
use crate::http::HttpFetcher;

/// Downloads one chapter fully into memory.
pub fn download_chapter(fetcher: &HttpFetcher, url: &str) -> Result<Vec<u8>> {
    let bytes = fetcher.get_bytes(url, "audio/*,*/*;q=0.8")?;
    tracing::debug!(url, bytes = bytes.len(), "downloaded chapter");
    Ok(bytes)
}
