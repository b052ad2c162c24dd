// ABOUTME: Configuration management for the view-interpolate CLI
// ABOUTME: Handles loading configuration from YAML files and environment variable overrides

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::scene::FilterSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_true")]
    pub builtin_filters: bool,

    #[serde(default)]
    pub pretty_json: bool,

    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            builtin_filters: true,
            pretty_json: false,
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from file path or default locations
    pub fn load(path: Option<PathBuf>) -> Result<Self> {
        let config_path = match path {
            Some(p) => p,
            None => Self::find_config_file(),
        };

        let mut config = if config_path.exists() {
            let contents = std::fs::read_to_string(&config_path)?;
            serde_yaml::from_str(&contents)?
        } else {
            Config::default()
        };

        config.merge_env()?;
        Ok(config)
    }

    /// Find configuration file in standard locations
    fn find_config_file() -> PathBuf {
        let possible_paths = [
            PathBuf::from("view-interpolate.yaml"),
            PathBuf::from("view-interpolate.yml"),
            PathBuf::from(".view-interpolate.yaml"),
            PathBuf::from(".view-interpolate.yml"),
        ];

        for path in possible_paths {
            if path.exists() {
                return path;
            }
        }

        if let Some(home_dir) = dirs::home_dir() {
            let home_config = home_dir.join(".view-interpolate").join("config.yaml");
            if home_config.exists() {
                return home_config;
            }
        }

        // Default path (may not exist)
        PathBuf::from("view-interpolate.yaml")
    }

    /// Merge environment variables into configuration
    fn merge_env(&mut self) -> Result<()> {
        if let Ok(level) = std::env::var("VIEW_INTERPOLATE_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Ok(format) = std::env::var("VIEW_INTERPOLATE_LOG_FORMAT") {
            self.logging.format = format;
        }
        if let Ok(builtin) = std::env::var("VIEW_INTERPOLATE_BUILTIN_FILTERS") {
            self.builtin_filters = builtin.parse()?;
        }

        Ok(())
    }

    /// Filter set used when a scene does not choose one
    pub fn default_filters(&self) -> FilterSet {
        if self.builtin_filters {
            FilterSet::Builtin
        } else {
            FilterSet::None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.builtin_filters);
        assert!(!config.pretty_json);
        assert_eq!(config.logging.level, "warn");
        assert_eq!(config.default_filters(), FilterSet::Builtin);
    }

    #[test]
    fn test_load_from_file() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("view-interpolate.yaml");

        let config_content = r#"
builtin_filters: false
pretty_json: true
logging:
  level: debug
  format: compact
"#;
        fs::write(&config_path, config_content).unwrap();

        let config = Config::load(Some(config_path)).unwrap();
        assert!(!config.builtin_filters);
        assert!(config.pretty_json);
        assert_eq!(config.logging.format, "compact");
        assert_eq!(config.default_filters(), FilterSet::None);
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config = Config::load(Some(temp_dir.path().join("absent.yaml"))).unwrap();
        assert!(!config.pretty_json);
    }
}
