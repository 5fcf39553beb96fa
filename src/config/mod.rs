// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Engine configuration loaded from YAML.
//!
//! The engine itself takes [`EngineOptions`](crate::engine::EngineOptions)
//! programmatically; this module is the file-backed layer the demo binary
//! (and any embedding process) uses to obtain those options.
//!
//! # Example
//! ```yaml
//! engine:
//!   max_concurrency: 8
//! ```

use crate::engine::EngineOptions;
use serde::Deserialize;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Top-level configuration file structure.
#[derive(Debug, Deserialize, Default)]
pub struct EngineConfig {
    #[serde(default)]
    pub engine: EngineSection,
}

/// Engine tuning options as they appear in the file.
///
/// # Fields
/// * `max_concurrency` - Cap on concurrent unit invocations (optional;
///   unbounded when absent)
#[derive(Debug, Deserialize, Default)]
pub struct EngineSection {
    pub max_concurrency: Option<usize>,
}

impl EngineConfig {
    pub fn engine_options(&self) -> EngineOptions {
        EngineOptions {
            max_concurrency: self.engine.max_concurrency,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// Load a config from a YAML file.
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<EngineConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let cfg: EngineConfig = serde_yaml::from_str(&content)?;
    validate(&cfg)?;
    Ok(cfg)
}

fn validate(cfg: &EngineConfig) -> Result<(), ConfigError> {
    if cfg.engine.max_concurrency == Some(0) {
        return Err(ConfigError::Invalid(
            "engine.max_concurrency must be at least 1 when set".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_basic_config() {
        let yaml = r#"
engine:
  max_concurrency: 8
"#;
        let cfg: EngineConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.engine.max_concurrency, Some(8));
        assert_eq!(cfg.engine_options().max_concurrency, Some(8));
    }

    #[test]
    fn test_missing_sections_default() {
        let cfg: EngineConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(cfg.engine.max_concurrency, None);
    }

    #[test]
    fn test_load_config_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  max_concurrency: 2").unwrap();

        let cfg = load_config(file.path()).unwrap();
        assert_eq!(cfg.engine.max_concurrency, Some(2));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "engine:\n  max_concurrency: 0").unwrap();

        let err = load_config(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid(_)));
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_config("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
