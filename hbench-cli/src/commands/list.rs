// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! `hbench list` command - Print matching benchmark names.

use hbench::BenchSuite;

pub fn execute(suite: &BenchSuite<'_>, filters: &[String]) -> anyhow::Result<()> {
    let names = suite.list(filters)?;
    tracing::info!(matched = names.len(), registered = suite.len(), "listing benchmarks");

    for name in names {
        println!("{}", name);
    }
    Ok(())
}
