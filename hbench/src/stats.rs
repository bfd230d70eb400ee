// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Sample series and descriptive statistics.
//!
//! A [`Statistics`] value holds one series of duration samples (seconds) in
//! collection order. Every statistic is computed on demand from the full
//! series and fails explicitly when the series is too short for it.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};

/// Outliers are samples outside `mean ± MARGIN * stdev`.
const MARGIN: f64 = 2.0;

/// An append-only series of timing samples.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Statistics {
    data: Vec<f64>,
}

impl Statistics {
    /// Create an empty series.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap an existing series of samples.
    pub fn from_samples(data: Vec<f64>) -> Self {
        Self { data }
    }

    /// Append one sample. Values are not validated.
    pub fn add(&mut self, delta: f64) -> &mut Self {
        self.data.push(delta);
        self
    }

    /// Raw samples in collection order.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Arithmetic mean.
    pub fn mean(&self) -> BenchResult<f64> {
        self.require(1, "mean")?;
        Ok(self.data.iter().sum::<f64>() / self.data.len() as f64)
    }

    /// Median; the mean of the two middle samples for an even-length series.
    pub fn median(&self) -> BenchResult<f64> {
        self.require(1, "median")?;
        let mut sorted = self.data.clone();
        sorted.sort_by(f64::total_cmp);

        let mid = sorted.len() / 2;
        if sorted.len() % 2 == 1 {
            Ok(sorted[mid])
        } else {
            Ok((sorted[mid - 1] + sorted[mid]) / 2.0)
        }
    }

    pub fn min(&self) -> BenchResult<f64> {
        self.require(1, "min")?;
        Ok(self.data.iter().copied().fold(f64::INFINITY, f64::min))
    }

    pub fn max(&self) -> BenchResult<f64> {
        self.require(1, "max")?;
        Ok(self.data.iter().copied().fold(f64::NEG_INFINITY, f64::max))
    }

    /// Sample standard deviation (Bessel-corrected).
    pub fn stdev(&self) -> BenchResult<f64> {
        self.require(2, "stdev")?;
        Ok(self.variance()?.sqrt())
    }

    /// Sample variance, divisor `n - 1`.
    pub fn variance(&self) -> BenchResult<f64> {
        self.require(2, "variance")?;
        Ok(self.sum_of_squares()? / (self.data.len() - 1) as f64)
    }

    /// Population variance, divisor `n`.
    pub fn pvariance(&self) -> BenchResult<f64> {
        self.require(1, "pvariance")?;
        Ok(self.sum_of_squares()? / self.data.len() as f64)
    }

    /// Return a new series without outliers.
    ///
    /// A sample is kept only if it lies strictly inside
    /// `(mean - 2 * stdev, mean + 2 * stdev)`; samples exactly on a bound are
    /// dropped. The result may be empty, in which case any statistic on it
    /// fails with [`BenchError::EmptySeries`].
    pub fn sanitize(&self) -> BenchResult<Statistics> {
        self.require(2, "sanitize")?;
        let mean = self.mean()?;
        let delta = MARGIN * self.stdev()?;
        let (low, high) = (mean - delta, mean + delta);

        let data: Vec<f64> = self
            .data
            .iter()
            .copied()
            .filter(|&x| low < x && x < high)
            .collect();

        tracing::debug!(
            dropped = self.data.len() - data.len(),
            low,
            high,
            "dropped points with sanitization"
        );

        Ok(Statistics { data })
    }

    /// Write every sample, one per line, in collection order.
    pub fn write<W: Write>(&self, sink: &mut W) -> BenchResult<()> {
        for value in &self.data {
            writeln!(sink, "{}", value).map_err(BenchError::io("writing samples"))?;
        }
        Ok(())
    }

    /// Write every sample to the file at `path`, replacing its contents.
    pub fn write_to_file(&self, path: impl AsRef<Path>) -> BenchResult<()> {
        let file = File::create(path).map_err(BenchError::io("creating sample file"))?;
        let mut writer = BufWriter::new(file);
        self.write(&mut writer)?;
        writer.flush().map_err(BenchError::io("flushing sample file"))
    }

    fn sum_of_squares(&self) -> BenchResult<f64> {
        let mean = self.mean()?;
        Ok(self.data.iter().map(|x| (x - mean) * (x - mean)).sum())
    }

    fn require(&self, required: usize, statistic: &'static str) -> BenchResult<()> {
        let actual = self.data.len();
        if actual < required {
            if required == 1 {
                return Err(BenchError::EmptySeries { statistic });
            }
            return Err(BenchError::InsufficientSamples {
                statistic,
                required,
                actual,
            });
        }
        Ok(())
    }
}

impl FromIterator<f64> for Statistics {
    fn from_iter<I: IntoIterator<Item = f64>>(iter: I) -> Self {
        Self::from_samples(iter.into_iter().collect())
    }
}
