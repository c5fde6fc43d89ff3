use std::fmt;
use std::path::PathBuf;

use crate::combine::Combiner;
use crate::error::PipelineError;
use crate::http::HttpFetcher;
use crate::stage::{StagedChapterFile, Stager};

/// One book to build: a playlist plus where the combined file goes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookJob {
    pub name: String,
    pub playlist_url: String,
    pub output: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookStage {
    Pending,
    FetchingMetadata,
    DownloadingChapters,
    Staging,
    Combining,
    CleaningUp,
    Done,
    Failed,
}

impl fmt::Display for BookStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Pending => "pending",
            Self::FetchingMetadata => "fetching metadata",
            Self::DownloadingChapters => "downloading chapters",
            Self::Staging => "staging",
            Self::Combining => "combining",
            Self::CleaningUp => "cleaning up",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        f.write_str(name)
    }
}

#[derive(Debug)]
pub struct BookFailure {
    /// Last non-terminal stage entered before the error.
    pub stage: BookStage,
    pub error: PipelineError,
}

impl fmt::Display for BookFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} while {}: {}", self.error.kind(), self.stage, self.error)
    }
}

#[derive(Debug)]
pub struct BookOutcome {
    pub job: BookJob,
    pub result: Result<PathBuf, BookFailure>,
}

impl BookOutcome {
    pub fn final_stage(&self) -> BookStage {
        match self.result {
            Ok(_) => BookStage::Done,
            Err(_) => BookStage::Failed,
        }
    }

    pub fn report_line(&self) -> String {
        match &self.result {
            Ok(output) => format!(
                "Successfully processed '{}' -> {}",
                self.job.name,
                output.display()
            ),
            Err(failure) => format!("Error processing book '{}': {failure}", self.job.name),
        }
    }
}

#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<BookOutcome>,
}

impl BatchReport {
    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.succeeded()
    }

    pub fn all_succeeded(&self) -> bool {
        self.failed() == 0
    }

    pub fn summary_line(&self) -> String {
        format!("{} succeeded, {} failed", self.succeeded(), self.failed())
    }
}

/// Drives book jobs one after another. Staged files live in the stager's
/// work dir and are named by ordinal, so only one job may run at a time.
pub struct Pipeline<'a> {
    fetcher: &'a HttpFetcher,
    stager: &'a Stager,
    combiner: &'a dyn Combiner,
}

impl<'a> Pipeline<'a> {
    pub fn new(fetcher: &'a HttpFetcher, stager: &'a Stager, combiner: &'a dyn Combiner) -> Self {
        Self {
            fetcher,
            stager,
            combiner,
        }
    }

    /// Runs every job in order. A failed job never stops the batch.
    pub fn run_batch(&self, jobs: &[BookJob]) -> BatchReport {
        let mut report = BatchReport::default();
        for job in jobs {
            let result = self.run_book(job);
            match &result {
                Ok(output) => {
                    tracing::info!(book = %job.name, output = %output.display(), "book done");
                }
                Err(failure) => {
                    tracing::error!(book = %job.name, stage = %failure.stage, err = %failure.error, "book failed");
                }
            }
            report.outcomes.push(BookOutcome {
                job: job.clone(),
                result,
            });
        }
        report
    }

    /// Runs one job. Staged chapters and the manifest are removed whether
    /// the job succeeds or fails.
    pub fn run_book(&self, job: &BookJob) -> Result<PathBuf, BookFailure> {
        let mut stage = BookStage::Pending;
        let mut staged = Vec::new();

        match self.try_run_book(job, &mut stage, &mut staged) {
            Ok(()) => {
                tracing::info!(book = %job.name, stage = %BookStage::CleaningUp, "cleaning up");
                self.stager.clean_up(&staged);
                Ok(job.output.clone())
            }
            Err(error) => {
                if !staged.is_empty() || self.stager.manifest_path().exists() {
                    tracing::info!(book = %job.name, files = staged.len(), "cleaning up after failure");
                    self.stager.clean_up(&staged);
                }
                Err(BookFailure { stage, error })
            }
        }
    }

    fn try_run_book(
        &self,
        job: &BookJob,
        stage: &mut BookStage,
        staged: &mut Vec<StagedChapterFile>,
    ) -> crate::error::Result<()> {
        *stage = BookStage::FetchingMetadata;
        tracing::info!(book = %job.name, url = %job.playlist_url, "fetching chapter list");
        let chapter_urls = crate::playlist::fetch_chapter_urls(self.fetcher, &job.playlist_url)?;
        if chapter_urls.is_empty() {
            return Err(PipelineError::EmptyPlaylist {
                url: job.playlist_url.clone(),
            });
        }

        for (index, chapter_url) in chapter_urls.iter().enumerate() {
            let ordinal = index + 1;

            *stage = BookStage::DownloadingChapters;
            tracing::info!(
                book = %job.name,
                ordinal,
                total = chapter_urls.len(),
                url = %chapter_url,
                "Downloading chapter {ordinal}"
            );
            let bytes = crate::download::download_chapter(self.fetcher, chapter_url)?;

            *stage = BookStage::Staging;
            staged.push(self.stager.stage(ordinal, chapter_url, &bytes)?);
        }

        *stage = BookStage::Staging;
        let manifest = self.stager.build_manifest(staged)?;

        *stage = BookStage::Combining;
        tracing::info!(book = %job.name, chapters = manifest.entries, "combining");
        self.combiner.combine(&manifest.path, &job.output)?;

        Ok(())
    }
}
