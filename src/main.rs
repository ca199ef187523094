use anyhow::Context;
use clap::Parser;
use portprobe::cli::Args;
use portprobe::output;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = init_logging(args.verbose) {
        output::print_error(&format!("{e:#}"));
        return ExitCode::FAILURE;
    }

    match args.execute().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(error = ?e, "run failed");
            output::print_error(&e.to_string());
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr. `RUST_LOG` wins; otherwise `--verbose` selects debug.
fn init_logging(verbose: bool) -> anyhow::Result<()> {
    let default_level = if verbose { "portprobe=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("invalid log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("{e}"))
        .context("failed to initialize logging")
}
