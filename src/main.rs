use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

fn main() -> ExitCode {
    match try_main() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Returns whether every requested book succeeded.
fn try_main() -> anyhow::Result<bool> {
    chapterstitch::logging::init().context("init logging")?;

    let cli = chapterstitch::cli::Cli::parse();
    tracing::debug!(?cli, "parsed cli");

    match cli.command {
        chapterstitch::cli::Command::Run(args) => {
            let report = chapterstitch::batch::run(args).context("run")?;
            for outcome in &report.outcomes {
                println!("{}", outcome.report_line());
            }
            println!("{}", report.summary_line());
            Ok(report.all_succeeded())
        }
        chapterstitch::cli::Command::Chapters(args) => {
            let urls = chapterstitch::playlist::list(args).context("chapters")?;
            for url in urls {
                println!("{url}");
            }
            Ok(true)
        }
    }
}
