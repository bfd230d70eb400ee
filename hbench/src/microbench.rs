// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Benchmark runner for a single three-phase operation.
//!
//! The runner executes a warmup phase, discarding timings, and then a
//! measured phase in which only the action is timed. Setup (`pre`) and
//! teardown (`post`) run around every iteration but are never part of a
//! sample.

use std::fmt;

use crate::error::{BenchError, BenchResult, Phase, Step};
use crate::stats::Statistics;
use crate::timer::{repeat, Clock, MonotonicClock};

/// Default number of warmup cycles.
pub const DEFAULT_WARMUP: u64 = 15;
/// Default number of measured cycles.
pub const DEFAULT_ITERATIONS: u64 = 100;

/// A zero-argument unit of work that may fail.
pub type Callable<'a> = Box<dyn FnMut() -> anyhow::Result<()> + 'a>;

/// Benchmark definition: optional setup, the timed action, optional teardown.
pub struct Operation<'a> {
    pre: Option<Callable<'a>>,
    action: Callable<'a>,
    post: Option<Callable<'a>>,
}

impl<'a> Operation<'a> {
    /// Create an operation that times `action` with no setup or teardown.
    pub fn new<F>(action: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'a,
    {
        Self {
            pre: None,
            action: Box::new(action),
            post: None,
        }
    }

    /// Run `pre` before every iteration, outside the timed span.
    pub fn with_pre<F>(mut self, pre: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'a,
    {
        self.pre = Some(Box::new(pre));
        self
    }

    /// Run `post` after every iteration, outside the timed span.
    pub fn with_post<F>(mut self, post: F) -> Self
    where
        F: FnMut() -> anyhow::Result<()> + 'a,
    {
        self.post = Some(Box::new(post));
        self
    }

    fn pre(&mut self, phase: Phase, iteration: u64) -> BenchResult<()> {
        match self.pre.as_mut() {
            Some(pre) => invoke(pre, phase, Step::Pre, iteration),
            None => Ok(()),
        }
    }

    fn action(&mut self, phase: Phase, iteration: u64) -> BenchResult<()> {
        invoke(&mut self.action, phase, Step::Action, iteration)
    }

    fn post(&mut self, phase: Phase, iteration: u64) -> BenchResult<()> {
        match self.post.as_mut() {
            Some(post) => invoke(post, phase, Step::Post, iteration),
            None => Ok(()),
        }
    }
}

impl fmt::Debug for Operation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Operation")
            .field("pre", &self.pre.is_some())
            .field("post", &self.post.is_some())
            .finish()
    }
}

fn invoke(f: &mut Callable<'_>, phase: Phase, step: Step, iteration: u64) -> BenchResult<()> {
    f().map_err(|source| BenchError::Operation {
        phase,
        step,
        iteration,
        source,
    })
}

/// Runner producing one [`Statistics`] series per benchmark.
#[derive(Debug, Clone)]
pub struct MicroBench<C = MonotonicClock> {
    /// Number of untimed warmup cycles
    warmup: u64,
    /// Number of measured cycles
    iterations: u64,
    clock: C,
}

impl MicroBench {
    /// Create a runner timed by the monotonic clock.
    pub fn new(warmup: u64, iterations: u64) -> Self {
        Self::with_clock(warmup, iterations, MonotonicClock::new())
    }
}

impl Default for MicroBench {
    fn default() -> Self {
        Self::new(DEFAULT_WARMUP, DEFAULT_ITERATIONS)
    }
}

impl<C: Clock> MicroBench<C> {
    /// Create a runner reading timestamps from `clock`.
    pub fn with_clock(warmup: u64, iterations: u64, clock: C) -> Self {
        Self {
            warmup,
            iterations,
            clock,
        }
    }

    pub fn warmup(&self) -> u64 {
        self.warmup
    }

    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Benchmark `action` alone.
    pub fn bench_simple<F>(&self, action: F) -> BenchResult<Statistics>
    where
        F: FnMut() -> anyhow::Result<()>,
    {
        self.bench(Operation::new(action))
    }

    /// Benchmark a three-phase operation.
    ///
    /// Returns exactly `iterations` samples, each the span of one `action`
    /// call. Any failure in any step aborts the run. The result is never
    /// sanitized here.
    pub fn bench(&self, mut op: Operation<'_>) -> BenchResult<Statistics> {
        tracing::debug!(cycles = self.warmup, "warming up");
        repeat(self.warmup, |i| {
            op.pre(Phase::Warmup, i)?;
            op.action(Phase::Warmup, i)?;
            op.post(Phase::Warmup, i)
        })?;

        tracing::debug!(cycles = self.iterations, "measuring time");
        let mut stats = Statistics::new();
        repeat(self.iterations, |i| {
            op.pre(Phase::Measure, i)?;

            let start = self.clock.now();
            let outcome = op.action(Phase::Measure, i);
            let end = self.clock.now();
            outcome?;
            stats.add(end - start);

            op.post(Phase::Measure, i)
        })?;

        if let Ok(mean) = stats.mean() {
            tracing::debug!("mean time is {} seconds", mean);
        }
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::timer::{ManualClock, Timer};
    use std::cell::Cell;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_default_configuration() {
        let bench = MicroBench::default();
        assert_eq!(bench.warmup(), 15);
        assert_eq!(bench.iterations(), 100);
    }

    #[test]
    fn test_bench_simple_counts() {
        let clock = ManualClock::new();
        let bench = MicroBench::with_clock(3, 7, &clock);
        let calls = Cell::new(0u64);

        let stats = bench
            .bench_simple(|| {
                calls.set(calls.get() + 1);
                clock.advance(0.25);
                Ok(())
            })
            .unwrap();

        assert_eq!(calls.get(), 10);
        assert_eq!(stats.len(), 7);
        assert!(stats.data().iter().all(|&s| s == 0.25));
    }

    #[test]
    fn test_pre_and_post_are_not_timed() {
        let clock = ManualClock::new();
        let bench = MicroBench::with_clock(2, 5, &clock);
        let pre_calls = Cell::new(0u64);
        let post_calls = Cell::new(0u64);

        let op = Operation::new(|| {
            clock.advance(0.5);
            Ok(())
        })
        .with_pre(|| {
            pre_calls.set(pre_calls.get() + 1);
            clock.advance(10.0);
            Ok(())
        })
        .with_post(|| {
            post_calls.set(post_calls.get() + 1);
            clock.advance(100.0);
            Ok(())
        });

        let stats = bench.bench(op).unwrap();

        assert_eq!(stats.data(), &[0.5; 5]);
        assert_eq!(pre_calls.get(), 7);
        assert_eq!(post_calls.get(), 7);
    }

    #[test]
    fn test_phase_order() {
        let log = std::cell::RefCell::new(Vec::new());
        let bench = MicroBench::new(1, 1);

        let op = Operation::new(|| {
            log.borrow_mut().push("action");
            Ok(())
        })
        .with_pre(|| {
            log.borrow_mut().push("pre");
            Ok(())
        })
        .with_post(|| {
            log.borrow_mut().push("post");
            Ok(())
        });
        bench.bench(op).unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["pre", "action", "post", "pre", "action", "post"]
        );
    }

    #[test]
    fn test_action_failure_aborts_measurement() {
        let clock = ManualClock::new();
        let bench = MicroBench::with_clock(1, 10, &clock);
        let calls = Cell::new(0u64);
        let post_calls = Cell::new(0u64);

        let op = Operation::new(|| {
            calls.set(calls.get() + 1);
            // Warmup is call 1, measured iteration 2 is call 4.
            if calls.get() == 4 {
                anyhow::bail!("table already exists");
            }
            Ok(())
        })
        .with_post(|| {
            post_calls.set(post_calls.get() + 1);
            Ok(())
        });

        let err = bench.bench(op).unwrap_err();
        match err {
            BenchError::Operation {
                phase,
                step,
                iteration,
                source,
            } => {
                assert_eq!(phase, Phase::Measure);
                assert_eq!(step, Step::Action);
                assert_eq!(iteration, 2);
                assert!(source.to_string().contains("table already exists"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(calls.get(), 4);
        // No teardown after the failing action.
        assert_eq!(post_calls.get(), 3);
    }

    #[test]
    fn test_warmup_failure_propagates() {
        let bench = MicroBench::new(5, 10);
        let actions = Cell::new(0u64);

        let op = Operation::new(|| {
            actions.set(actions.get() + 1);
            Ok(())
        })
        .with_pre(|| Err(anyhow::anyhow!("no connection")));

        let err = bench.bench(op).unwrap_err();
        assert!(matches!(
            err,
            BenchError::Operation {
                phase: Phase::Warmup,
                step: Step::Pre,
                iteration: 0,
                ..
            }
        ));
        assert_eq!(actions.get(), 0);
    }

    #[test]
    fn test_zero_warmup() {
        let clock = ManualClock::new();
        let bench = MicroBench::with_clock(0, 3, &clock);
        let stats = bench
            .bench_simple(|| {
                clock.advance(1.0);
                Ok(())
            })
            .unwrap();
        assert_eq!(stats.len(), 3);
    }

    #[test]
    fn test_samples_cover_real_sleep() {
        let bench = MicroBench::new(1, 3);
        let timer = Timer::start();

        let op = Operation::new(|| {
            thread::sleep(Duration::from_millis(2));
            Ok(())
        })
        .with_pre(|| {
            thread::sleep(Duration::from_millis(1));
            Ok(())
        });
        let stats = bench.bench(op).unwrap();
        let total = timer.elapsed_secs();

        assert_eq!(stats.len(), 3);
        for sample in stats.data() {
            assert!(*sample >= 0.002, "Sample {} < 2ms", sample);
        }
        assert!(total >= stats.data().iter().sum::<f64>());
    }
}
