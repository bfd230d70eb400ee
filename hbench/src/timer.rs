// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Clock abstraction and the bounded repetition primitive.
//!
//! Samples are taken from a [`Clock`] that reports seconds as `f64`. The
//! default [`MonotonicClock`] reads `std::time::Instant`, which is immune to
//! wall-clock adjustments on every supported platform.

use std::cell::Cell;
use std::time::{Duration, Instant};

/// Source of timestamps for the runner, in seconds.
pub trait Clock {
    /// Current reading. Only differences between readings are meaningful.
    fn now(&self) -> f64;
}

/// Monotonic clock measuring seconds since its creation.
#[derive(Debug, Clone, Copy)]
pub struct MonotonicClock {
    origin: Instant,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for MonotonicClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for MonotonicClock {
    fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }
}

/// Clock that only moves when told to.
///
/// Lets tests and simulations make exact assertions about recorded samples.
#[derive(Debug, Default)]
pub struct ManualClock {
    now: Cell<f64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move the clock forward by `secs` seconds.
    pub fn advance(&self, secs: f64) {
        self.now.set(self.now.get() + secs);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> f64 {
        self.now.get()
    }
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> f64 {
        (**self).now()
    }
}

/// Stopwatch for timing a single span.
pub struct Timer {
    start: Instant,
}

impl Timer {
    /// Start a new timer.
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    /// Elapsed time since start.
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Elapsed seconds since start.
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed().as_secs_f64()
    }
}

/// Invoke `operation` exactly `count` times, in order.
///
/// The first failure aborts the loop and is returned as-is; remaining
/// iterations are not attempted. The operation receives the zero-based
/// iteration index.
pub fn repeat<E, F>(count: u64, mut operation: F) -> Result<(), E>
where
    F: FnMut(u64) -> Result<(), E>,
{
    for iteration in 0..count {
        operation(iteration)?;
    }
    Ok(())
}
