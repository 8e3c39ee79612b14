//! Command-line interface for the `insight` semantic search tool.

use std::{io, process::ExitCode};

use clap::Parser;
use insight::cli::{
    CommandContext,
    args::{Cli, Commands},
    commands,
};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let ctx = match &cli.command {
        Commands::Init(_) => CommandContext::load_cwd_only(),
        _ => CommandContext::load(),
    };
    let ctx = match ctx {
        Ok(ctx) => ctx,
        Err(code) => return code,
    };

    commands::run(cli.command, &ctx).await
}

/// Installs a stderr subscriber; `RUST_LOG` wins over the `-v` count.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,insight={level},insight_client={level},insight_highlight={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
