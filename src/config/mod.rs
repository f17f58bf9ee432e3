use crate::error::{Result, TraderdError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Dashboard configuration: the supervised trader command, the telemetry
/// files it produces, and the HTTP bind address.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the trader executable
    #[serde(default = "default_command")]
    pub command: PathBuf,

    /// Command-line arguments (the reference launch passes none)
    #[serde(default)]
    pub args: Vec<String>,

    /// Working directory for the trader process
    #[serde(default)]
    pub cwd: Option<PathBuf>,

    /// Grace period before force kill (in seconds)
    #[serde(default = "default_stop_timeout")]
    pub stop_timeout_secs: u64,

    /// Text log file written by the trader
    #[serde(default = "default_log_file")]
    pub log_file: PathBuf,

    /// Line-delimited JSON account history written by the trader
    #[serde(default = "default_history_file")]
    pub history_file: PathBuf,

    /// Numeric field charted from each history record
    #[serde(default = "default_value_field")]
    pub value_field: String,

    /// How many trailing bytes of the log file to serve
    #[serde(default = "default_log_tail_bytes")]
    pub log_tail_bytes: u64,

    /// How many trailing history records to chart
    #[serde(default = "default_chart_points")]
    pub chart_points: usize,

    /// HTTP bind address
    #[serde(default = "default_bind")]
    pub bind: String,

    /// HTTP port
    #[serde(default = "default_port")]
    pub port: u16,
}

// Default value functions for serde
fn default_command() -> PathBuf {
    PathBuf::from("./pt-trader")
}

fn default_stop_timeout() -> u64 {
    5
}

fn default_log_file() -> PathBuf {
    PathBuf::from("trainer.log")
}

fn default_history_file() -> PathBuf {
    PathBuf::from("hub_data/account_value_history.jsonl")
}

fn default_value_field() -> String {
    "total_account_value".to_string()
}

fn default_log_tail_bytes() -> u64 {
    10_000
}

fn default_chart_points() -> usize {
    200
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    5000
}

impl Default for Config {
    fn default() -> Self {
        Self {
            command: default_command(),
            args: Vec::new(),
            cwd: None,
            stop_timeout_secs: default_stop_timeout(),
            log_file: default_log_file(),
            history_file: default_history_file(),
            value_field: default_value_field(),
            log_tail_bytes: default_log_tail_bytes(),
            chart_points: default_chart_points(),
            bind: default_bind(),
            port: default_port(),
        }
    }
}

impl Config {
    /// Load configuration from a file (supports TOML and JSON)
    pub fn from_file(path: &Path) -> Result<Config> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| TraderdError::Config(format!("Failed to read config file: {}", e)))?;

        // Determine format based on file extension
        let extension = path.extension().and_then(|s| s.to_str()).unwrap_or("");

        let config = match extension {
            "toml" => Self::parse_toml(&contents)?,
            "json" => Self::parse_json(&contents)?,
            _ => {
                return Err(TraderdError::InvalidConfig(format!(
                    "Unsupported file format: {}. Use .toml or .json",
                    extension
                )))
            }
        };

        config.validate()?;

        Ok(config)
    }

    /// Parse TOML configuration
    fn parse_toml(contents: &str) -> Result<Config> {
        toml::from_str(contents)
            .map_err(|e| TraderdError::InvalidConfig(format!("Failed to parse TOML: {}", e)))
    }

    /// Parse JSON configuration
    fn parse_json(contents: &str) -> Result<Config> {
        serde_json::from_str(contents)
            .map_err(|e| TraderdError::InvalidConfig(format!("Failed to parse JSON: {}", e)))
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.command.as_os_str().is_empty() {
            return Err(TraderdError::MissingConfigField("command".to_string()));
        }

        if self.log_tail_bytes == 0 {
            return Err(TraderdError::ConfigValidation(
                "log_tail_bytes must be at least 1".to_string(),
            ));
        }

        if self.chart_points == 0 {
            return Err(TraderdError::ConfigValidation(
                "chart_points must be at least 1".to_string(),
            ));
        }

        if self.bind.is_empty() {
            return Err(TraderdError::MissingConfigField("bind".to_string()));
        }

        // Validate working directory exists if specified
        if let Some(ref cwd) = self.cwd {
            if !cwd.is_dir() {
                return Err(TraderdError::ConfigValidation(format!(
                    "Working directory is not a directory: {}",
                    cwd.display()
                )));
            }
        }

        Ok(())
    }

    /// Get stop timeout as Duration
    pub fn stop_timeout(&self) -> Duration {
        Duration::from_secs(self.stop_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();

        assert_eq!(config.command, PathBuf::from("./pt-trader"));
        assert!(config.args.is_empty());
        assert_eq!(config.stop_timeout_secs, 5);
        assert_eq!(config.log_file, PathBuf::from("trainer.log"));
        assert_eq!(
            config.history_file,
            PathBuf::from("hub_data/account_value_history.jsonl")
        );
        assert_eq!(config.value_field, "total_account_value");
        assert_eq!(config.log_tail_bytes, 10_000);
        assert_eq!(config.chart_points, 200);
        assert_eq!(config.port, 5000);
    }

    #[test]
    fn test_validate_valid_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_empty_command() {
        let config = Config {
            command: PathBuf::new(),
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TraderdError::MissingConfigField(_))
        ));
    }

    #[test]
    fn test_validate_zero_chart_points() {
        let config = Config {
            chart_points: 0,
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TraderdError::ConfigValidation(_))
        ));
    }

    #[test]
    fn test_validate_missing_cwd() {
        let config = Config {
            cwd: Some(PathBuf::from("/nonexistent/directory")),
            ..Config::default()
        };

        assert!(matches!(
            config.validate(),
            Err(TraderdError::ConfigValidation(_))
        ));
    }

    #[test]
    fn test_parse_toml() {
        let toml_content = r#"
            command = "/usr/local/bin/pt-trader"
            stop_timeout_secs = 10
            port = 8080
        "#;

        let config = Config::parse_toml(toml_content).unwrap();
        assert_eq!(config.command, PathBuf::from("/usr/local/bin/pt-trader"));
        assert_eq!(config.stop_timeout_secs, 10);
        assert_eq!(config.port, 8080);
        // Unspecified fields fall back to defaults
        assert_eq!(config.chart_points, 200);
    }

    #[test]
    fn test_parse_json() {
        let json_content = r#"
            {
                "command": "/usr/local/bin/pt-trader",
                "log_tail_bytes": 4096
            }
        "#;

        let config = Config::parse_json(json_content).unwrap();
        assert_eq!(config.command, PathBuf::from("/usr/local/bin/pt-trader"));
        assert_eq!(config.log_tail_bytes, 4096);
        assert_eq!(config.value_field, "total_account_value");
    }

    #[test]
    fn test_from_file_toml() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("traderd.toml");

        let toml_content = r#"
            command = "/bin/echo"
            args = ["hello"]
        "#;

        fs::write(&config_path, toml_content).unwrap();

        let config = Config::from_file(&config_path).unwrap();
        assert_eq!(config.command, PathBuf::from("/bin/echo"));
        assert_eq!(config.args, vec!["hello".to_string()]);
    }

    #[test]
    fn test_from_file_unsupported_format() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("traderd.yaml");

        fs::write(&config_path, "command: test").unwrap();

        let result = Config::from_file(&config_path);
        assert!(matches!(result, Err(TraderdError::InvalidConfig(_))));
    }

    #[test]
    fn test_stop_timeout_duration() {
        let config = Config {
            stop_timeout_secs: 3,
            ..Config::default()
        };
        assert_eq!(config.stop_timeout(), Duration::from_secs(3));
    }
}
