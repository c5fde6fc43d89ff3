use std::fs::OpenOptions;
use std::io::{BufWriter, Write as _};
use std::path::{Path, PathBuf};

use crate::error::{PipelineError, Result};

pub const MANIFEST_FILE_NAME: &str = "concat_list.txt";

const DEFAULT_EXTENSION: &str = "mp3";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StagedChapterFile {
    pub ordinal: usize,
    pub path: PathBuf,
}

impl StagedChapterFile {
    fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConcatManifest {
    pub path: PathBuf,
    pub entries: usize,
}

/// Owns the working directory for one book job at a time: staged chapters
/// and the concat manifest are named by ordinal, not by job.
#[derive(Debug, Clone)]
pub struct Stager {
    work_dir: PathBuf,
}

impl Stager {
    pub fn new(work_dir: impl Into<PathBuf>) -> Self {
        Self {
            work_dir: work_dir.into(),
        }
    }

    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.work_dir.join(MANIFEST_FILE_NAME)
    }

    pub fn chapter_path(&self, ordinal: usize, chapter_url: &str) -> PathBuf {
        let extension = chapter_extension(chapter_url);
        self.work_dir.join(format!("chapter_{ordinal}.{extension}"))
    }

    pub fn stage(
        &self,
        ordinal: usize,
        chapter_url: &str,
        bytes: &[u8],
    ) -> Result<StagedChapterFile> {
        let path = self.chapter_path(ordinal, chapter_url);
        std::fs::create_dir_all(&self.work_dir)
            .map_err(|source| PipelineError::write(&self.work_dir, source))?;
        if let Err(source) = std::fs::write(&path, bytes) {
            // A failed write may leave a truncated chapter behind.
            remove_if_file(&path);
            return Err(PipelineError::write(&path, source));
        }
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "staged chapter");
        Ok(StagedChapterFile { ordinal, path })
    }

    /// Writes `concat_list.txt` listing `staged` in the given order.
    pub fn build_manifest(&self, staged: &[StagedChapterFile]) -> Result<ConcatManifest> {
        let path = self.manifest_path();
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(&path)
            .map_err(|source| PipelineError::write(&path, source))?;
        let mut out = BufWriter::new(file);
        out.write_all(render_manifest(staged).as_bytes())
            .and_then(|()| out.flush())
            .map_err(|source| PipelineError::write(&path, source))?;

        Ok(ConcatManifest {
            path,
            entries: staged.len(),
        })
    }

    /// Removes staged chapters and the manifest. Best effort.
    pub fn clean_up(&self, staged: &[StagedChapterFile]) {
        let manifest = self.manifest_path();
        for path in staged.iter().map(|file| &file.path).chain([&manifest]) {
            match std::fs::remove_file(path) {
                Ok(()) => {}
                Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
                Err(err) => {
                    tracing::warn!(path = %path.display(), %err, "remove staged file failed");
                }
            }
        }
    }
}

fn remove_if_file(path: &Path) {
    let is_file = std::fs::symlink_metadata(path)
        .map(|meta| !meta.is_dir())
        .unwrap_or(false);
    if !is_file {
        return;
    }
    if let Err(err) = std::fs::remove_file(path) {
        tracing::warn!(path = %path.display(), %err, "remove partial chapter failed");
    }
}

/// Concat demuxer input: entries are relative to the manifest's directory.
pub fn render_manifest(staged: &[StagedChapterFile]) -> String {
    let mut out = String::new();
    for file in staged {
        let name = file.file_name().replace('\'', r"'\''");
        out.push_str(&format!("file '{name}'\n"));
    }
    out
}

fn chapter_extension(chapter_url: &str) -> String {
    let path = match url::Url::parse(chapter_url) {
        Ok(url) => url.path().to_owned(),
        Err(_) => chapter_url.split(['?', '#']).next().unwrap_or_default().to_owned(),
    };
    let last_segment = path.rsplit('/').next().unwrap_or_default();
    let Some((stem, extension)) = last_segment.rsplit_once('.') else {
        return DEFAULT_EXTENSION.to_owned();
    };
    if stem.is_empty()
        || extension.is_empty()
        || extension.len() > 5
        || !extension.chars().all(|ch| ch.is_ascii_alphanumeric())
    {
        return DEFAULT_EXTENSION.to_owned();
    }
    extension.to_ascii_lowercase()
}
