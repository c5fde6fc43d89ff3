use std::io::IsTerminal as _;

use anyhow::Context as _;

const DEFAULT_DIRECTIVES: &str = "info";

/// Logs go to stderr; stdout carries the batch report. Colour only when
/// stderr is a terminal, so captured logs stay greppable.
pub fn init() -> anyhow::Result<()> {
    init_with_default(DEFAULT_DIRECTIVES)
}

/// `RUST_LOG` wins over `default_directives`.
pub fn init_with_default(default_directives: &str) -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(default_directives))
        .with_context(|| format!("build log filter: {default_directives}"))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
