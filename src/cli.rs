//! Command-line interface of the `refman` binary
//!
//! Parsing and execution live here so the one-shot commands can be driven
//! from tests with any [`Write`] sink.

use crate::config::DEFAULT_FILE_PATH;
use crate::console::{Session, StdConsole};
use crate::{Config, Criterion, FileStore, Query, Reference};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use std::io::Write;
use std::path::PathBuf;

/// Top-level arguments
#[derive(Debug, Parser)]
#[command(name = "refman")]
#[command(about = "Add, list and filter journal articles and conference papers in a BibTeX file")]
#[command(version)]
pub struct Cli {
    /// BibTeX file to read and append to
    #[arg(short, long, env = "REFMAN_FILE", default_value = DEFAULT_FILE_PATH)]
    pub file: PathBuf,

    /// Logging level (trace, debug, info, warn, error); RUST_LOG overrides
    #[arg(short, long, default_value = "warn")]
    pub log_level: String,

    /// Command to run; the interactive session when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactive session (default)
    Shell,
    /// Print every stored reference
    List {
        /// Print JSON instead of BibTeX
        #[arg(long)]
        json: bool,
    },
    /// Print references matching all given filters; quote a value for exact match
    Filter(FilterArgs),
}

/// Options of the `filter` subcommand
#[derive(Debug, Default, Args)]
pub struct FilterArgs {
    /// Author filter; several comma-separated names must all match
    #[arg(long)]
    pub author: Option<String>,
    /// Journal filter (articles only)
    #[arg(long)]
    pub journal: Option<String>,
    /// Year, always compared for equality
    #[arg(long)]
    pub year: Option<String>,
    /// Title filter
    #[arg(long)]
    pub title: Option<String>,
    /// Print JSON instead of BibTeX
    #[arg(long)]
    pub json: bool,
}

impl FilterArgs {
    /// Build the query; absent or blank options are skipped
    #[must_use]
    pub fn query(&self) -> Query {
        let mut query = Query::new();
        for (criterion, value) in [
            (Criterion::Author, &self.author),
            (Criterion::Journal, &self.journal),
            (Criterion::Year, &self.year),
            (Criterion::Title, &self.title),
        ] {
            if let Some(value) = value {
                query.push(criterion, value);
            }
        }
        query
    }
}

/// Run the parsed command, writing one-shot output to `out`
pub fn run(cli: Cli, out: &mut impl Write) -> Result<()> {
    let config = Config::new(cli.file);
    let store = FileStore::from_config(&config);

    match cli.command.unwrap_or(Command::Shell) {
        Command::Shell => {
            let mut session = Session::new(config, StdConsole, store);
            session.run();
        }
        Command::List { json } => {
            let report = store
                .load_report()
                .with_context(|| format!("reading {}", config.file_path().display()))?;
            let references: Vec<&Reference> = report.references.iter().collect();
            if references.is_empty() && !json {
                writeln!(out, "No references found.")?;
                return Ok(());
            }
            write_references(out, &references, json)?;
        }
        Command::Filter(args) => {
            let report = store
                .load_report()
                .with_context(|| format!("reading {}", config.file_path().display()))?;

            let matches = args.query().apply(&report.references);
            if matches.is_empty() && !args.json {
                writeln!(out, "No references match the given filters.")?;
                return Ok(());
            }
            write_references(out, &matches, args.json)?;
        }
    }

    Ok(())
}

fn write_references(out: &mut impl Write, references: &[&Reference], json: bool) -> Result<()> {
    if json {
        serde_json::to_writer_pretty(&mut *out, references).context("serializing references")?;
        writeln!(out)?;
        return Ok(());
    }

    for reference in references {
        let block = reference.to_bibtex();
        if !block.is_empty() {
            writeln!(out, "{block}\n")?;
        }
    }
    Ok(())
}
