// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `hbench run` command - Run benchmarks and report results.
//!
//! A failing benchmark stops the run, but whatever completed before it is
//! still reported before the command returns the failure.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use anyhow::Context;
use hbench::{BenchSuite, JsonReporter, SuiteReport};

/// Suite name recorded in JSON reports.
const SUITE_NAME: &str = "hbench";

/// Where and how results are written.
#[derive(Debug, Clone, Default)]
pub struct ReportOptions {
    /// Report file; stdout when unset
    pub output: Option<PathBuf>,
    /// Delimited output with this separator; table when unset
    pub delimiter: Option<char>,
    /// Directory for raw sample files
    pub savedata: Option<PathBuf>,
    /// JSON report path
    pub json: Option<PathBuf>,
}

pub fn execute(
    suite: &mut BenchSuite<'_>,
    filters: &[String],
    options: &ReportOptions,
) -> anyhow::Result<()> {
    let outcome = suite.run(filters);

    if suite.result().is_empty() {
        if outcome.is_ok() {
            tracing::warn!(?filters, "no benchmark matched");
        }
    } else {
        report(suite, options)?;
    }

    outcome.context("benchmark run failed")
}

fn report(suite: &BenchSuite<'_>, options: &ReportOptions) -> anyhow::Result<()> {
    let mut sink: Box<dyn Write> = match &options.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    match options.delimiter {
        Some(delimiter) => suite.print_csv(&mut sink, delimiter)?,
        None => suite.print(&mut sink)?,
    }
    sink.flush().context("flushing report")?;

    if let Some(dir) = &options.savedata {
        let paths = suite.save_data(dir)?;
        tracing::info!(files = paths.len(), dir = %dir.display(), "raw samples saved");
    }

    if let Some(path) = &options.json {
        let report = SuiteReport::from_suite(SUITE_NAME, suite, true)?;
        JsonReporter::save(path, &report)?;
        tracing::info!(path = %path.display(), "JSON report saved");
    }

    Ok(())
}
