// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Error types for the benchmark harness.
//!
//! Statistical and execution errors are explicit enum variants. Nothing in the
//! harness downgrades them to defaults: an empty series never reports a zero
//! mean, and a failing operation always aborts the benchmark it belongs to.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for the harness.
#[derive(Debug, Error)]
pub enum BenchError {
    // =========================================================================
    // Statistics Errors
    // =========================================================================
    #[error("Cannot compute {statistic} of an empty sample series")]
    EmptySeries { statistic: &'static str },

    #[error("Cannot compute {statistic}: need at least {required} samples, have {actual}")]
    InsufficientSamples {
        statistic: &'static str,
        required: usize,
        actual: usize,
    },

    #[error("No benchmark results to report")]
    EmptyResultSet,

    // =========================================================================
    // Execution Errors - never caught or retried
    // =========================================================================
    #[error("{step} failed during {phase} iteration {iteration}: {source}")]
    Operation {
        phase: Phase,
        step: Step,
        iteration: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("Benchmark '{name}' failed: {source}")]
    BenchmarkFailed {
        name: String,
        #[source]
        source: Box<BenchError>,
    },

    #[error("Invalid benchmark filter: {0}")]
    InvalidPattern(#[from] regex::Error),

    // =========================================================================
    // Configuration Errors
    // =========================================================================
    #[error("Invalid configuration value: {field} = {value} - {reason}")]
    InvalidConfig {
        field: &'static str,
        value: String,
        reason: String,
    },

    #[error("Configuration file not found: {path}")]
    ConfigNotFound { path: PathBuf },

    #[error("Configuration parse error: {message}")]
    ConfigParse { message: String },

    // =========================================================================
    // Output Errors
    // =========================================================================
    #[error("IO error: {context} - {source}")]
    Io {
        context: &'static str,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize report: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl BenchError {
    /// Name of the benchmark that failed, if this error came out of a suite run.
    pub fn benchmark_name(&self) -> Option<&str> {
        match self {
            BenchError::BenchmarkFailed { name, .. } => Some(name),
            _ => None,
        }
    }

    pub(crate) fn io(context: &'static str) -> impl FnOnce(std::io::Error) -> Self {
        move |source| BenchError::Io { context, source }
    }
}

/// Phase of a benchmark run in which an operation failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Warmup,
    Measure,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Warmup => write!(f, "warmup"),
            Phase::Measure => write!(f, "measurement"),
        }
    }
}

/// Part of a three-phase operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Pre,
    Action,
    Post,
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Pre => write!(f, "pre"),
            Step::Action => write!(f, "action"),
            Step::Post => write!(f, "post"),
        }
    }
}

/// Result type alias using BenchError.
pub type BenchResult<T> = Result<T, BenchError>;
