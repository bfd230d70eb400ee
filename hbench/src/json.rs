// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Machine-readable JSON reports.
//!
//! A [`SuiteReport`] captures the summary rows of one suite run together with
//! the configuration and the host it ran on, so that results from different
//! machines can be told apart later.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sysinfo::System;

use crate::config::SuiteConfig;
use crate::error::{BenchError, BenchResult};
use crate::report::Summary;
use crate::stats::Statistics;
use crate::suite::BenchSuite;
use crate::timer::Clock;

const UNKNOWN: &str = "unknown";

/// Host the suite ran on, with the load it was under when the report was built.
///
/// Latency numbers are only comparable between runs on similar, similarly
/// idle hosts; this is what lets an operator tell them apart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SystemInfo {
    pub hostname: String,
    /// Operating system with version, e.g. "Linux 22.04 Ubuntu"
    pub os: String,
    pub cpu_model: String,
    /// Base CPU frequency of the first core, in MHz
    pub cpu_mhz: u64,
    pub logical_cpus: usize,
    pub physical_cores: Option<usize>,
    pub total_memory_bytes: u64,
    pub available_memory_bytes: u64,
    /// 1, 5 and 15 minute load averages (zero where the OS has none)
    pub load_average: [f64; 3],
}

impl SystemInfo {
    pub fn collect() -> Self {
        let sys = System::new_all();
        let first_cpu = sys.cpus().first();
        let load = System::load_average();

        let info = Self {
            hostname: System::host_name().unwrap_or_else(|| UNKNOWN.to_string()),
            os: System::long_os_version().unwrap_or_else(|| UNKNOWN.to_string()),
            cpu_model: first_cpu
                .map(|cpu| cpu.brand().trim().to_string())
                .unwrap_or_else(|| UNKNOWN.to_string()),
            cpu_mhz: first_cpu.map(|cpu| cpu.frequency()).unwrap_or(0),
            logical_cpus: sys.cpus().len(),
            physical_cores: sys.physical_core_count(),
            total_memory_bytes: sys.total_memory(),
            available_memory_bytes: sys.available_memory(),
            load_average: [load.one, load.five, load.fifteen],
        };

        if info.is_busy() {
            tracing::warn!(
                load = info.load_average[0],
                cpus = info.logical_cpus,
                "host is busy, timings may be noisy"
            );
        }
        info
    }

    /// One-minute load above the number of logical CPUs.
    pub fn is_busy(&self) -> bool {
        self.logical_cpus > 0 && self.load_average[0] > self.logical_cpus as f64
    }
}

/// Report of one suite run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteReport {
    /// Suite identifier
    pub benchmark_suite: String,
    /// Harness version
    pub version: String,
    /// Timestamp when the report was built
    pub timestamp: DateTime<Utc>,
    pub system_info: SystemInfo,
    pub config: SuiteConfig,
    /// One row per benchmark, in name order
    pub results: Vec<Summary>,
    /// Raw samples per benchmark (only when requested)
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub samples: BTreeMap<String, Statistics>,
}

impl SuiteReport {
    /// Build a report from the current results of `suite`.
    ///
    /// Fails with [`BenchError::EmptyResultSet`] when the suite has no results.
    pub fn from_suite<C: Clock>(
        name: impl Into<String>,
        suite: &BenchSuite<'_, C>,
        keep_samples: bool,
    ) -> BenchResult<Self> {
        let results = suite.summaries()?;
        let samples = if keep_samples {
            suite.result().clone()
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            benchmark_suite: name.into(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            timestamp: Utc::now(),
            system_info: SystemInfo::collect(),
            config: *suite.config(),
            results,
            samples,
        })
    }
}

/// JSON reporter for suite reports.
pub struct JsonReporter;

impl JsonReporter {
    /// Write `report` as pretty-printed JSON.
    pub fn write<W: Write>(writer: W, report: &SuiteReport) -> BenchResult<()> {
        serde_json::to_writer_pretty(writer, report)?;
        Ok(())
    }

    /// Save `report` to the file at `path`, replacing its contents.
    pub fn save(path: impl AsRef<Path>, report: &SuiteReport) -> BenchResult<()> {
        let file = File::create(path).map_err(BenchError::io("creating report file"))?;
        let mut writer = BufWriter::new(file);
        Self::write(&mut writer, report)?;
        writer.flush().map_err(BenchError::io("flushing report file"))
    }

    /// Load a report saved by [`JsonReporter::save`].
    pub fn load(path: impl AsRef<Path>) -> BenchResult<SuiteReport> {
        let file = File::open(path).map_err(BenchError::io("opening report file"))?;
        let report = serde_json::from_reader(file)?;
        Ok(report)
    }
}
