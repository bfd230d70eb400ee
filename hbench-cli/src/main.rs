// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! hbench CLI
//!
//! Command-line front end for running the bundled benchmark suite.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use hbench::{
    BenchSuite, ConfigLoader, SuiteConfig, DEFAULT_DELIMITER, DEFAULT_ITERATIONS, DEFAULT_WARMUP,
};
use tempfile::TempDir;

mod commands;
mod workloads;

use commands::run::ReportOptions;

/// Report in milliseconds unless told otherwise.
const DEFAULT_SCALE: f64 = 1000.0;

/// hbench - Microbenchmark harness for metadata-service clients
#[derive(Parser, Debug)]
#[command(name = "hbench")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Configuration file path (YAML)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Log level
    #[arg(
        short = 'L',
        long,
        default_value = "error",
        value_parser = ["error", "warn", "info", "debug", "trace"]
    )]
    pub loglevel: String,

    /// Enable verbose logging (same as --loglevel debug)
    #[arg(short, long)]
    pub verbose: bool,

    /// Number of warmup iterations
    #[arg(short = 'W', long)]
    pub warmup: Option<u64>,

    /// Number of measured iterations
    #[arg(short = 'B', long)]
    pub benchmark: Option<u64>,

    /// Multiplier applied to reported times (1000 = milliseconds)
    #[arg(long)]
    pub scale: Option<f64>,

    /// Drop samples outside two standard deviations of the mean
    #[arg(long)]
    pub sanitize: bool,

    /// Write the report to this file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report as delimited values (tab-separated unless --delimiter is given)
    #[arg(long)]
    pub csv: bool,

    /// Field delimiter for delimited output (implies --csv)
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Save raw samples of each benchmark to DIR/<name>.out
    #[arg(long, value_name = "DIR")]
    pub savedata: Option<PathBuf>,

    /// Save a JSON report with host information to FILE
    #[arg(long, value_name = "FILE")]
    pub json: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq)]
pub enum Commands {
    /// List benchmark names matching the filters
    List {
        /// Regular expressions; a name matches if any of them does
        filters: Vec<String>,
    },

    /// Run benchmarks matching the filters (default)
    Run {
        /// Regular expressions; a name matches if any of them does
        filters: Vec<String>,
    },
}

impl Cli {
    /// Effective suite configuration: file values overridden by flags.
    pub fn suite_config(&self) -> anyhow::Result<SuiteConfig> {
        let base = match &self.config {
            Some(path) => ConfigLoader::load_file(path)
                .with_context(|| format!("loading configuration from {}", path.display()))?,
            None => SuiteConfig::new(DEFAULT_WARMUP, DEFAULT_ITERATIONS, DEFAULT_SCALE, false)?,
        };

        let config = SuiteConfig::new(
            self.warmup.unwrap_or(base.warmup()),
            self.benchmark.unwrap_or(base.iterations()),
            self.scale.unwrap_or(base.scale()),
            self.sanitize || base.sanitize(),
        )?;
        Ok(config)
    }

    /// Output options for the run command.
    pub fn report_options(&self) -> ReportOptions {
        let delimiter = match (self.delimiter, self.csv) {
            (Some(d), _) => Some(d),
            (None, true) => Some(DEFAULT_DELIMITER),
            (None, false) => None,
        };

        ReportOptions {
            output: self.output.clone(),
            delimiter,
            savedata: self.savedata.clone(),
            json: self.json.clone(),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging; stdout is reserved for reports
    let log_level = if cli.verbose { "debug" } else { cli.loglevel.as_str() };
    tracing_subscriber::fmt()
        .with_env_filter(log_level)
        .with_writer(std::io::stderr)
        .init();

    let config = cli.suite_config()?;
    tracing::debug!(?config, "resolved configuration");

    // Scratch space for the catalog workloads, removed on exit
    let scratch = TempDir::new().context("creating scratch directory")?;
    let mut suite = BenchSuite::new(config);
    workloads::register(&mut suite, scratch.path());

    match cli.command.as_ref() {
        Some(Commands::List { filters }) => commands::list::execute(&suite, filters),
        Some(Commands::Run { filters }) => {
            commands::run::execute(&mut suite, filters, &cli.report_options())
        }
        None => commands::run::execute(&mut suite, &[], &cli.report_options()),
    }
}
