//! relpak - release packager CLI

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use relpak_cli::cmd;
use relpak_cli::{Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // --debug wins over RUST_LOG; otherwise only warnings reach the console.
    let filter = if cli.global.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    tracing::debug!("running with debug turned on");

    let global = &cli.global;
    match cli.command {
        Commands::Package(args) => cmd::package::package(global, &args),
        Commands::Plan { args, json } => cmd::plan::plan(global, &args, json),
        Commands::Completions { shell } => {
            cmd::completions::completions(shell);
            Ok(())
        }
    }
}
