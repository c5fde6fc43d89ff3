use clap::{Args, Parser, Subcommand};

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Download and combine every book in a catalog.
    Run(RunArgs),
    /// Print the chapter audio URLs of one playlist.
    Chapters(ChaptersArgs),
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Catalog file (YAML) listing playlist URLs and output files.
    #[arg(long)]
    pub catalog: String,

    /// Base output directory (overrides `output_dir` from the catalog).
    #[arg(long)]
    pub out_dir: Option<String>,

    /// Directory for staged chapters and the concat manifest.
    #[arg(long, default_value = ".")]
    pub work_dir: String,

    /// ffmpeg binary (default: $CHAPTERSTITCH_FFMPEG_BIN or `ffmpeg`).
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// Per-request HTTP timeout in seconds, including the body download.
    /// Size it for the largest chapter.
    #[arg(long, default_value_t = crate::http::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}

#[derive(Debug, Args)]
pub struct ChaptersArgs {
    /// Playlist URL (must be http/https).
    #[arg(long)]
    pub url: String,

    /// Per-request HTTP timeout.
    #[arg(long, default_value_t = crate::http::DEFAULT_TIMEOUT_SECS)]
    pub timeout_secs: u64,
}
