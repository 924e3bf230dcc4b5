use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid top_n: {0}. Must be at least 1")]
    InvalidTopN(usize),

    #[error("Invalid n_samples: {0}. Must be at least 1")]
    InvalidSampleCount(usize),

    #[error("Invalid score_threshold: {0}. Must be finite")]
    InvalidThreshold(f64),

    #[error("Invalid noise_std: {0}. Must be finite and non-negative")]
    InvalidNoise(f64),

    #[error("Invalid id_jitter: {0}. Cannot be negative")]
    InvalidIdJitter(i64),

    #[error("Invalid test_fraction: {0}. Must be in [0, 1)")]
    InvalidTestFraction(f64),

    #[error("Invalid epochs: {0}. Must be at least 1")]
    InvalidEpochs(usize),

    #[error("Invalid learning_rate: {0}. Must be positive")]
    InvalidLearningRate(f64),

    #[error("Invalid hovering band: hover_low ({0}) must be less than hover_high ({1})")]
    InvalidHoverBand(f64, f64),

    #[error("Invalid top_k: {0}. Must be at least 1")]
    InvalidTopK(usize),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidRotation(String),

    #[error("Path '{0}' cannot be empty")]
    EmptyPath(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. fieldloop.yaml in the working directory
    /// 3. fieldloop.local.yaml (local overrides, optional)
    /// 4. Environment variables (FIELDLOOP_* prefix, `__` separates sections)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("fieldloop.yaml"))
            .merge(Yaml::file("fieldloop.local.yaml"))
            .merge(Env::prefixed("FIELDLOOP_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file; environment variables still win
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        anyhow::ensure!(path.exists(), "Config file {} does not exist", path.display());

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed("FIELDLOOP_").split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        let cycle = &config.cycle;
        if cycle.top_n == 0 {
            return Err(ConfigError::InvalidTopN(cycle.top_n));
        }
        if cycle.n_samples == 0 {
            return Err(ConfigError::InvalidSampleCount(cycle.n_samples));
        }
        if !cycle.score_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold(cycle.score_threshold));
        }

        let generator = &config.generator;
        if !generator.noise_std.is_finite() || generator.noise_std < 0.0 {
            return Err(ConfigError::InvalidNoise(generator.noise_std));
        }
        if generator.id_jitter < 0 {
            return Err(ConfigError::InvalidIdJitter(generator.id_jitter));
        }

        let training = &config.training;
        if !(0.0..1.0).contains(&training.test_fraction) {
            return Err(ConfigError::InvalidTestFraction(training.test_fraction));
        }
        if training.epochs == 0 {
            return Err(ConfigError::InvalidEpochs(training.epochs));
        }
        if !training.learning_rate.is_finite() || training.learning_rate <= 0.0 {
            return Err(ConfigError::InvalidLearningRate(training.learning_rate));
        }

        let analytics = &config.analytics;
        if analytics.hover_low.is_nan()
            || analytics.hover_high.is_nan()
            || analytics.hover_low >= analytics.hover_high
        {
            return Err(ConfigError::InvalidHoverBand(
                analytics.hover_low,
                analytics.hover_high,
            ));
        }
        if analytics.top_k == 0 {
            return Err(ConfigError::InvalidTopK(analytics.top_k));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidRotation(config.logging.rotation.clone()));
        }

        let paths = &config.paths;
        for (name, path) in [
            ("store", &paths.store),
            ("known_positives", &paths.known_positives),
            ("known_negatives", &paths.known_negatives),
            ("calibration", &paths.calibration),
            ("score_log", &paths.score_log),
            ("newly_integrated", &paths.newly_integrated),
            ("extrapolated", &paths.extrapolated),
            ("analytics_dir", &paths.analytics_dir),
        ] {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::EmptyPath(name));
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.cycle.top_n, 100);
        assert_eq!(config.cycle.n_samples, 300);
        assert!((config.cycle.score_threshold - 0.75).abs() < f64::EPSILON);
        assert_eq!(config.training.seed, 42);
        assert_eq!(config.logging.level, "info");
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
cycle:
  top_n: 10
  score_threshold: 0.8
  seed: 7
generator:
  noise_std: 0.5
paths:
  store: /data/store.csv
logging:
  level: debug
  format: json
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.cycle.top_n, 10);
        assert_eq!(config.cycle.n_samples, 300, "unset fields keep defaults");
        assert_eq!(config.cycle.seed, Some(7));
        assert!((config.generator.noise_std - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.generator.id_jitter, 100);
        assert_eq!(config.paths.store, PathBuf::from("/data/store.csv"));
        assert_eq!(config.logging.format, "json");

        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_zero_top_n() {
        let mut config = Config::default();
        config.cycle.top_n = 0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTopN(0)
        ));
    }

    #[test]
    fn test_validate_non_finite_threshold() {
        let mut config = Config::default();
        config.cycle.score_threshold = f64::NAN;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidThreshold(_)
        ));
    }

    #[test]
    fn test_validate_negative_noise() {
        let mut config = Config::default();
        config.generator.noise_std = -1.0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidNoise(_)
        ));
    }

    #[test]
    fn test_validate_negative_jitter() {
        let mut config = Config::default();
        config.generator.id_jitter = -3;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidIdJitter(-3)
        ));
    }

    #[test]
    fn test_validate_test_fraction_range() {
        let mut config = Config::default();
        config.training.test_fraction = 1.0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidTestFraction(_)
        ));

        config.training.test_fraction = 0.0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_learning_rate() {
        let mut config = Config::default();
        config.training.learning_rate = 0.0;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLearningRate(_)
        ));
    }

    #[test]
    fn test_validate_inverted_hover_band() {
        let mut config = Config::default();
        config.analytics.hover_low = 0.9;
        config.analytics.hover_high = 0.8;
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidHoverBand(_, _)
        ));
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "invalid".to_string();

        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "invalid"),
            other => panic!("Expected InvalidLogLevel error, got {other}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::InvalidLogFormat(_)
        ));
    }

    #[test]
    fn test_validate_empty_path() {
        let mut config = Config::default();
        config.paths.score_log = PathBuf::new();
        assert!(matches!(
            ConfigLoader::validate(&config).unwrap_err(),
            ConfigError::EmptyPath("score_log")
        ));
    }

    #[test]
    fn test_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldloop.yaml");
        std::fs::write(&path, "cycle:\n  top_n: 10\n  n_samples: 50\n").unwrap();

        let config = temp_env::with_vars(
            [
                ("FIELDLOOP_CYCLE__TOP_N", Some("25")),
                ("FIELDLOOP_LOGGING__LEVEL", Some("debug")),
            ],
            || ConfigLoader::load_from_file(&path),
        )
        .unwrap();

        assert_eq!(config.cycle.top_n, 25, "env should win over file");
        assert_eq!(config.cycle.n_samples, 50, "file should win over defaults");
        assert_eq!(config.logging.level, "debug");
    }

    #[test]
    fn test_load_from_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(ConfigLoader::load_from_file(dir.path().join("absent.yaml")).is_err());
    }

    #[test]
    fn test_invalid_file_values_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fieldloop.yaml");
        std::fs::write(&path, "analytics:\n  top_k: 0\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(err.to_string().contains("top_k"));
    }

    #[test]
    fn test_hierarchical_merging() {
        use std::io::Write;
        use tempfile::NamedTempFile;

        let mut base_file = NamedTempFile::new().unwrap();
        writeln!(
            base_file,
            "cycle:\n  top_n: 5\nlogging:\n  level: info\n  format: json"
        )
        .unwrap();
        base_file.flush().unwrap();

        let mut override_file = NamedTempFile::new().unwrap();
        writeln!(override_file, "cycle:\n  top_n: 15\nlogging:\n  level: debug").unwrap();
        override_file.flush().unwrap();

        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(base_file.path()))
            .merge(Yaml::file(override_file.path()))
            .extract()
            .unwrap();

        assert_eq!(config.cycle.top_n, 15, "Override should win");
        assert_eq!(
            config.logging.level, "debug",
            "Override should win for nested fields"
        );
        assert_eq!(
            config.logging.format, "json",
            "Base value should persist when not overridden"
        );
    }
}
