// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Named benchmark registry and suite runner.
//!
//! A [`BenchSuite`] owns its registry, its registration order and its result
//! table; nothing is shared between instances. Benchmarks run strictly one
//! after another on the calling thread.

use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use regex::RegexSet;

use crate::config::SuiteConfig;
use crate::error::{BenchError, BenchResult};
use crate::microbench::MicroBench;
use crate::report::{self, Summary};
use crate::stats::Statistics;
use crate::timer::{Clock, MonotonicClock};

/// A registered benchmark: drives the runner and returns its samples.
pub type BenchFn<'a, C = MonotonicClock> =
    Box<dyn FnMut(&MicroBench<C>) -> BenchResult<Statistics> + 'a>;

/// Extension of raw sample files written by [`BenchSuite::save_data`].
const DATA_EXTENSION: &str = "out";

/// Registry of named benchmarks plus their accumulated results.
pub struct BenchSuite<'a, C = MonotonicClock> {
    config: SuiteConfig,
    bench: MicroBench<C>,
    /// Map of benchmark name to benchmark closure.
    suite: HashMap<String, BenchFn<'a, C>>,
    /// Names in first-registration order.
    order: Vec<String>,
    /// Latest result per benchmark, iterated in name order.
    result: BTreeMap<String, Statistics>,
}

impl<'a> BenchSuite<'a> {
    /// Create a suite whose runner follows `config`.
    pub fn new(config: SuiteConfig) -> Self {
        let bench = config.micro_bench();
        Self::with_bench(config, bench)
    }
}

impl Default for BenchSuite<'_> {
    fn default() -> Self {
        Self::new(SuiteConfig::default())
    }
}

impl<'a, C: Clock> BenchSuite<'a, C> {
    /// Create a suite around an explicitly constructed runner.
    ///
    /// The runner's warmup and iteration counts take precedence over the
    /// ones in `config`; scale and sanitize still come from `config`.
    pub fn with_bench(config: SuiteConfig, bench: MicroBench<C>) -> Self {
        Self {
            config,
            bench,
            suite: HashMap::new(),
            order: Vec::new(),
            result: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &SuiteConfig {
        &self.config
    }

    /// Register `benchmark` under `name`, replacing any previous definition.
    ///
    /// A replaced benchmark keeps its original position in [`list`](Self::list).
    pub fn add<F>(&mut self, name: impl Into<String>, benchmark: F) -> &mut Self
    where
        F: FnMut(&MicroBench<C>) -> BenchResult<Statistics> + 'a,
    {
        let name = name.into();
        if self.suite.insert(name.clone(), Box::new(benchmark)).is_none() {
            self.order.push(name);
        }
        self
    }

    /// Number of registered benchmarks.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Registered names in registration order, filtered by regular expressions.
    ///
    /// With no filters every name is returned. Otherwise a name is kept when
    /// any pattern matches anywhere in it.
    pub fn list<S: AsRef<str>>(&self, filters: &[S]) -> BenchResult<Vec<String>> {
        if filters.is_empty() {
            return Ok(self.order.clone());
        }

        let patterns = RegexSet::new(filters.iter().map(|f| f.as_ref()))?;
        Ok(self
            .order
            .iter()
            .filter(|name| patterns.is_match(name))
            .cloned()
            .collect())
    }

    /// Run every benchmark selected by `filters`, in registration order.
    ///
    /// Each result replaces the previous one stored under the same name. The
    /// first failing benchmark stops the run; results stored before it are
    /// kept.
    pub fn run<S: AsRef<str>>(&mut self, filters: &[S]) -> BenchResult<()> {
        let names = self.list(filters)?;
        tracing::info!(
            selected = names.len(),
            registered = self.order.len(),
            "running benchmark suite"
        );

        for name in names {
            let Some(benchmark) = self.suite.get_mut(&name) else {
                continue;
            };

            tracing::debug!(benchmark = %name, "running benchmark");
            let outcome = benchmark(&self.bench).and_then(|stats| {
                if self.config.sanitize() {
                    stats.sanitize()
                } else {
                    Ok(stats)
                }
            });

            match outcome {
                Ok(stats) => {
                    self.result.insert(name, stats);
                }
                Err(source) => {
                    tracing::error!(benchmark = %name, error = %source, "benchmark failed");
                    return Err(BenchError::BenchmarkFailed {
                        name,
                        source: Box::new(source),
                    });
                }
            }
        }

        tracing::info!(results = self.result.len(), "benchmark suite finished");
        Ok(())
    }

    /// Run every registered benchmark.
    pub fn run_all(&mut self) -> BenchResult<()> {
        self.run::<&str>(&[])
    }

    /// Accumulated results keyed by benchmark name.
    pub fn result(&self) -> &BTreeMap<String, Statistics> {
        &self.result
    }

    /// One scaled summary row per result, sorted by name.
    pub fn summaries(&self) -> BenchResult<Vec<Summary>> {
        report::summarize(&self.result, self.config.scale())
    }

    /// Write the fixed-width result table.
    pub fn print<W: Write>(&self, sink: &mut W) -> BenchResult<()> {
        report::write_table(sink, &self.summaries()?)
    }

    /// Write results as delimited text.
    pub fn print_csv<W: Write>(&self, sink: &mut W, delimiter: char) -> BenchResult<()> {
        report::write_csv(sink, &self.summaries()?, delimiter)
    }

    /// Write results as delimited text to the file at `path`.
    pub fn print_csv_to_path(&self, path: impl AsRef<Path>, delimiter: char) -> BenchResult<()> {
        let summaries = self.summaries()?;
        let file = File::create(path).map_err(BenchError::io("creating CSV file"))?;
        let mut writer = BufWriter::new(file);
        report::write_csv(&mut writer, &summaries, delimiter)?;
        writer.flush().map_err(BenchError::io("flushing CSV file"))
    }

    /// Write the raw samples of every result to `<dir>/<name>.out`.
    ///
    /// Returns the written paths in name order.
    pub fn save_data(&self, dir: impl AsRef<Path>) -> BenchResult<Vec<PathBuf>> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir).map_err(BenchError::io("creating data directory"))?;

        let mut paths = Vec::with_capacity(self.result.len());
        for (name, stats) in &self.result {
            let path = dir.join(format!("{}.{}", name, DATA_EXTENSION));
            stats.write_to_file(&path)?;
            paths.push(path);
        }

        tracing::debug!(files = paths.len(), dir = %dir.display(), "saved raw samples");
        Ok(paths)
    }
}
