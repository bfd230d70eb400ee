// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! Suite configuration with strict validation.
//!
//! A [`SuiteConfig`] is fixed once built: the runner and the reporter read it
//! but never change it. It can be built directly or loaded from YAML.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BenchError, BenchResult};
use crate::microbench::{MicroBench, DEFAULT_ITERATIONS, DEFAULT_WARMUP};
use crate::timer::Clock;

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawSuiteConfig {
    #[serde(default = "default_warmup")]
    warmup: u64,
    #[serde(default = "default_iterations")]
    iterations: u64,
    #[serde(default = "default_scale")]
    scale: f64,
    #[serde(default)]
    sanitize: bool,
}

fn default_warmup() -> u64 {
    DEFAULT_WARMUP
}

fn default_iterations() -> u64 {
    DEFAULT_ITERATIONS
}

fn default_scale() -> f64 {
    1.0
}

/// Validated, immutable suite configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSuiteConfig")]
pub struct SuiteConfig {
    warmup: u64,
    iterations: u64,
    scale: f64,
    sanitize: bool,
}

impl SuiteConfig {
    /// Build a configuration, rejecting values the runner cannot honour.
    pub fn new(warmup: u64, iterations: u64, scale: f64, sanitize: bool) -> BenchResult<Self> {
        if iterations == 0 {
            return Err(BenchError::InvalidConfig {
                field: "iterations",
                value: iterations.to_string(),
                reason: "at least one measured iteration is required".to_string(),
            });
        }

        if !scale.is_finite() || scale <= 0.0 {
            return Err(BenchError::InvalidConfig {
                field: "scale",
                value: scale.to_string(),
                reason: "scale must be a finite positive number".to_string(),
            });
        }

        Ok(Self {
            warmup,
            iterations,
            scale,
            sanitize,
        })
    }

    /// Untimed cycles before measurement.
    pub fn warmup(&self) -> u64 {
        self.warmup
    }

    /// Measured cycles per benchmark.
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Multiplier applied to reported time values.
    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Whether results are sanitized before they are stored.
    pub fn sanitize(&self) -> bool {
        self.sanitize
    }

    /// Runner configured with this warmup and iteration count.
    pub fn micro_bench(&self) -> MicroBench {
        MicroBench::new(self.warmup, self.iterations)
    }

    /// Runner configured with this warmup and iteration count, timed by `clock`.
    pub fn micro_bench_with_clock<C: Clock>(&self, clock: C) -> MicroBench<C> {
        MicroBench::with_clock(self.warmup, self.iterations, clock)
    }
}

impl TryFrom<RawSuiteConfig> for SuiteConfig {
    type Error = BenchError;

    fn try_from(raw: RawSuiteConfig) -> BenchResult<Self> {
        Self::new(raw.warmup, raw.iterations, raw.scale, raw.sanitize)
    }
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            warmup: DEFAULT_WARMUP,
            iterations: DEFAULT_ITERATIONS,
            scale: default_scale(),
            sanitize: false,
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> BenchResult<SuiteConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(BenchError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(BenchError::io("reading config file"))?;

        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> BenchResult<SuiteConfig> {
        let raw: RawSuiteConfig =
            serde_yaml::from_str(content).map_err(|e| BenchError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        SuiteConfig::try_from(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SuiteConfig::default();
        assert_eq!(config.warmup(), 15);
        assert_eq!(config.iterations(), 100);
        assert_eq!(config.scale(), 1.0);
        assert!(!config.sanitize());

        let bench = config.micro_bench();
        assert_eq!(bench.warmup(), 15);
        assert_eq!(bench.iterations(), 100);
    }

    #[test]
    fn test_zero_iterations_rejected() {
        let err = SuiteConfig::new(0, 0, 1.0, false).unwrap_err();
        assert!(matches!(
            err,
            BenchError::InvalidConfig {
                field: "iterations",
                ..
            }
        ));
    }

    #[test]
    fn test_bad_scale_rejected() {
        for scale in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = SuiteConfig::new(0, 1, scale, false).unwrap_err();
            assert!(matches!(err, BenchError::InvalidConfig { field: "scale", .. }));
        }
    }

    #[test]
    fn test_zero_warmup_allowed() {
        let config = SuiteConfig::new(0, 1, 1000.0, true).unwrap();
        assert_eq!(config.warmup(), 0);
        assert!(config.sanitize());
    }

    #[test]
    fn test_load_string() {
        let yaml = r#"
warmup: 2
iterations: 50
scale: 1000
sanitize: true
"#;
        let config = ConfigLoader::load_string(yaml).unwrap();
        assert_eq!(config, SuiteConfig::new(2, 50, 1000.0, true).unwrap());
    }

    #[test]
    fn test_load_string_partial() {
        let config = ConfigLoader::load_string("sanitize: true\n").unwrap();
        assert_eq!(config.warmup(), 15);
        assert_eq!(config.iterations(), 100);
        assert!(config.sanitize());
    }

    #[test]
    fn test_load_string_rejects_unknown_keys() {
        let err = ConfigLoader::load_string("iterationz: 5\n").unwrap_err();
        assert!(matches!(err, BenchError::ConfigParse { .. }));
    }

    #[test]
    fn test_load_string_validates() {
        let err = ConfigLoader::load_string("iterations: 0\n").unwrap_err();
        assert!(matches!(err, BenchError::InvalidConfig { .. }));
    }

    #[test]
    fn test_deserialize_validates() {
        let config: SuiteConfig =
            serde_json::from_str(r#"{"warmup":1,"iterations":2,"scale":1.0,"sanitize":false}"#)
                .unwrap();
        assert_eq!(config.iterations(), 2);

        let invalid = serde_json::from_str::<SuiteConfig>(r#"{"iterations":0}"#);
        assert!(invalid.is_err());
    }

    #[test]
    fn test_load_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("hbench.yaml");
        std::fs::write(&path, "warmup: 1\niterations: 3\n").unwrap();

        let config = ConfigLoader::load_file(&path).unwrap();
        assert_eq!(config.iterations(), 3);

        let missing = ConfigLoader::load_file(dir.path().join("missing.yaml"));
        assert!(matches!(missing, Err(BenchError::ConfigNotFound { .. })));
    }
}
