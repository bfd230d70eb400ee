// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! hbench Benchmark Harness
//!
//! Benchmark execution and statistics engine used to measure remote
//! metadata-service clients. The harness is agnostic to what it measures:
//! every operation under test is a closure.
//!
//! # Components
//!
//! - **Statistics**: sample series with mean/median/min/max/stdev/variance
//!   and ±2σ outlier sanitization
//! - **Timer**: monotonic clock abstraction and the `repeat` primitive
//! - **MicroBench**: warmup and measured loops around a pre/action/post operation
//! - **BenchSuite**: named registry with regex filtering, sequential execution
//!   and table/CSV/JSON reporting
//!
//! # Example
//!
//! ```no_run
//! use hbench::{BenchSuite, Operation, SuiteConfig};
//!
//! # fn main() -> hbench::BenchResult<()> {
//! let config = SuiteConfig::new(2, 5, 1000.0, false)?;
//! let mut suite = BenchSuite::new(config);
//! suite
//!     .add("noop", |b| b.bench_simple(|| Ok(())))
//!     .add("create", |b| {
//!         b.bench(Operation::new(|| Ok(())).with_post(|| Ok(())))
//!     });
//! suite.run_all()?;
//! suite.print(&mut std::io::stdout())?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod json;
pub mod microbench;
pub mod report;
pub mod stats;
pub mod suite;
pub mod timer;

// Re-export commonly used types
pub use config::{ConfigLoader, SuiteConfig};
pub use error::{BenchError, BenchResult, Phase, Step};
pub use json::{JsonReporter, SuiteReport, SystemInfo};
pub use microbench::{Callable, MicroBench, Operation, DEFAULT_ITERATIONS, DEFAULT_WARMUP};
pub use report::{Summary, DEFAULT_DELIMITER};
pub use stats::Statistics;
pub use suite::{BenchFn, BenchSuite};
pub use timer::{repeat, Clock, ManualClock, MonotonicClock, Timer};
