use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;

use crate::cli::RunArgs;
use crate::combine::{FfmpegCombiner, FfmpegConfig};
use crate::http::HttpFetcher;
use crate::pipeline::{BatchReport, Pipeline};
use crate::stage::Stager;

/// Loads the catalog named by `args` and runs every book in it.
pub fn run(args: RunArgs) -> anyhow::Result<BatchReport> {
    let catalog_path = PathBuf::from(&args.catalog);
    let catalog = crate::config::load_catalog(&catalog_path).context("load catalog")?;
    let out_dir = args.out_dir.as_deref().map(PathBuf::from);
    let jobs = crate::config::book_jobs(&catalog, out_dir.as_deref()).context("catalog books")?;

    let fetcher = HttpFetcher::new(Duration::from_secs(args.timeout_secs))?;
    let stager = Stager::new(&args.work_dir);
    let mut ffmpeg = FfmpegConfig::from_env();
    if let Some(bin) = args.ffmpeg {
        ffmpeg.bin = bin;
    }
    let combiner = FfmpegCombiner::new(ffmpeg);

    tracing::info!(
        books = jobs.len(),
        work_dir = %stager.work_dir().display(),
        "starting batch"
    );
    let report = Pipeline::new(&fetcher, &stager, &combiner).run_batch(&jobs);
    Ok(report)
}
