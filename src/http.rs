use std::time::Duration;

use anyhow::Context as _;
use reqwest::blocking::Client;
use reqwest::header::{ACCEPT, USER_AGENT};

use crate::error::{PipelineError, Result};

/// Whole-request bound, body included; sized for one long chapter on a
/// slow link.
pub const DEFAULT_TIMEOUT_SECS: u64 = 3600;

const CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

const USER_AGENT_VALUE: &str = concat!("chapterstitch/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(timeout))
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }

    /// GETs `url` and returns the whole body. Non-2xx is an error.
    pub fn get_bytes(&self, url: &str, accept: &str) -> Result<Vec<u8>> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, USER_AGENT_VALUE)
            .header(ACCEPT, accept)
            .send()
            .map_err(|source| PipelineError::Fetch {
                url: url.to_owned(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PipelineError::Status {
                url: url.to_owned(),
                status,
            });
        }

        let body = response.bytes().map_err(|source| PipelineError::Fetch {
            url: url.to_owned(),
            source,
        })?;
        Ok(body.to_vec())
    }
}
