//! `refman` command-line entry point

use anyhow::Result;
use bibtex_refman::cli::{self, Cli};
use clap::Parser;
use tracing_subscriber::EnvFilter;

fn init_tracing(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level);

    let stdout = std::io::stdout();
    cli::run(cli, &mut stdout.lock())
}
