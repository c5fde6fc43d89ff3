use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use crate::error::{PipelineError, Result};

pub trait Combiner {
    /// Concatenates the files listed in `manifest` into `output` without
    /// re-encoding. `output` is created or overwritten.
    fn combine(&self, manifest: &Path, output: &Path) -> Result<()>;
}

#[derive(Debug, Clone)]
pub struct FfmpegConfig {
    pub bin: String,
}

impl FfmpegConfig {
    pub fn from_env() -> Self {
        let bin =
            std::env::var("CHAPTERSTITCH_FFMPEG_BIN").unwrap_or_else(|_| "ffmpeg".to_owned());
        Self { bin }
    }
}

#[derive(Debug, Clone)]
pub struct FfmpegCombiner {
    config: FfmpegConfig,
}

impl FfmpegCombiner {
    pub fn new(config: FfmpegConfig) -> Self {
        Self { config }
    }
}

impl Combiner for FfmpegCombiner {
    fn combine(&self, manifest: &Path, output: &Path) -> Result<()> {
        if let Some(parent) = output.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)
                .map_err(|source| PipelineError::write(parent, source))?;
        }

        // ffmpeg writes next to `output`; an earlier good book is only
        // replaced once the new one is complete.
        let partial = partial_output_path(output);
        tracing::info!(
            bin = %self.config.bin,
            manifest = %manifest.display(),
            output = %output.display(),
            "ffmpeg concat"
        );

        // stdout/stderr stay attached to the operator's console.
        let status = Command::new(&self.config.bin)
            .args(build_ffmpeg_args(manifest, &partial))
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .map_err(|source| PipelineError::Spawn {
                bin: self.config.bin.clone(),
                source,
            })?;

        if !status.success() {
            remove_partial_output(&partial);
            return Err(PipelineError::Combine {
                bin: self.config.bin.clone(),
                output: output.to_path_buf(),
                status,
            });
        }

        if let Err(source) = std::fs::rename(&partial, output) {
            remove_partial_output(&partial);
            return Err(PipelineError::write(output, source));
        }

        Ok(())
    }
}

/// `dir/book.mp3` -> `dir/book.partial.mp3`. The extension is kept so
/// ffmpeg still picks the muxer from it.
pub fn partial_output_path(output: &Path) -> PathBuf {
    let stem = output
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(extension) => format!("{stem}.partial.{}", extension.to_string_lossy()),
        None => format!("{stem}.partial"),
    };
    output.with_file_name(name)
}

pub fn build_ffmpeg_args(manifest: &Path, output: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = [
        "-hide_banner",
        "-loglevel",
        "error",
        "-f",
        "concat",
        "-safe",
        "0",
        "-i",
    ]
    .into_iter()
    .map(OsString::from)
    .collect();
    args.push(manifest.as_os_str().to_owned());
    args.extend(["-c", "copy", "-y"].map(OsString::from));
    args.push(output.as_os_str().to_owned());
    args
}

fn remove_partial_output(partial: &Path) {
    match std::fs::remove_file(partial) {
        Ok(()) => tracing::debug!(partial = %partial.display(), "removed partial output"),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {}
        Err(err) => {
            tracing::warn!(partial = %partial.display(), %err, "remove partial output failed");
        }
    }
}
