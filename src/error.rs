use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure of a single book job. Never aborts the batch.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("fetch {url}: unexpected status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("decode playlist {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("spawn {bin}: {source}")]
    Spawn {
        bin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("combine into {}: {bin} exited with {status}", .output.display())]
    Combine {
        bin: String,
        output: PathBuf,
        status: std::process::ExitStatus,
    },

    #[error("playlist {url} has no chapters with audio")]
    EmptyPlaylist { url: String },
}

impl PipelineError {
    pub fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Write {
            path: path.into(),
            source,
        }
    }

    /// Coarse taxonomy used in operator reports.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Fetch { .. } | Self::Status { .. } => ErrorKind::Fetch,
            Self::Decode { .. } | Self::EmptyPlaylist { .. } => ErrorKind::Decode,
            Self::Write { .. } => ErrorKind::Write,
            Self::Spawn { .. } | Self::Combine { .. } => ErrorKind::Combine,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Fetch,
    Decode,
    Write,
    Combine,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Fetch => "FetchError",
            Self::Decode => "DecodeError",
            Self::Write => "WriteError",
            Self::Combine => "CombineError",
        };
        f.write_str(name)
    }
}
