use crate::error::{AppError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub network: NetworkConfig,

    #[serde(default)]
    pub console: ConsoleConfig,

    #[serde(default)]
    pub performance: PerformanceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    #[serde(default = "default_network_capacity")]
    pub capacity: usize,

    #[serde(default = "default_redacted_headers")]
    pub redacted_headers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    #[serde(default = "default_console_capacity")]
    pub capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceConfig {
    #[serde(default = "default_frame_window")]
    pub frame_window: usize,

    #[serde(default = "default_snapshot_capacity")]
    pub snapshot_capacity: usize,

    #[serde(default = "default_snapshot_interval", with = "humantime_duration")]
    pub snapshot_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            network: NetworkConfig::default(),
            console: ConsoleConfig::default(),
            performance: PerformanceConfig::default(),
        }
    }
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            capacity: default_network_capacity(),
            redacted_headers: default_redacted_headers(),
        }
    }
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            capacity: default_console_capacity(),
        }
    }
}

impl Default for PerformanceConfig {
    fn default() -> Self {
        Self {
            frame_window: default_frame_window(),
            snapshot_capacity: default_snapshot_capacity(),
            snapshot_interval: default_snapshot_interval(),
        }
    }
}

impl Config {
    pub fn from_toml_str(input: &str) -> Result<Self> {
        let config: Config = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let input = std::fs::read_to_string(path)?;
        Self::from_toml_str(&input)
    }

    /// Loads `path` when given, else the per-user config file if it exists,
    /// else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "loading config");
                Self::from_file(&path)
            }
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.performance.frame_window < 2 {
            return Err(AppError::Config(
                "performance.frame_window must hold at least 2 samples".to_string(),
            ));
        }
        if self.performance.snapshot_interval.is_zero() {
            return Err(AppError::Config(
                "performance.snapshot_interval must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

pub fn default_config_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("com", "devlens", "devlens")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

fn default_enabled() -> bool {
    true
}

fn default_network_capacity() -> usize {
    500
}

fn default_redacted_headers() -> Vec<String> {
    ["authorization", "cookie", "set-cookie", "x-api-key"]
        .into_iter()
        .map(str::to_string)
        .collect()
}

fn default_console_capacity() -> usize {
    1000
}

fn default_frame_window() -> usize {
    120
}

fn default_snapshot_capacity() -> usize {
    300
}

fn default_snapshot_interval() -> Duration {
    Duration::from_secs(1)
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert!(config.enabled);
        assert_eq!(config.network.capacity, 500);
        assert_eq!(config.console.capacity, 1000);
        assert_eq!(config.performance.frame_window, 120);
        assert_eq!(config.performance.snapshot_interval, Duration::from_secs(1));
        assert!(config
            .network
            .redacted_headers
            .contains(&"authorization".to_string()));
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml_str(
            r#"
            enabled = false

            [network]
            capacity = 50

            [performance]
            snapshot_interval = "500ms"
            "#,
        )
        .unwrap();

        assert!(!config.enabled);
        assert_eq!(config.network.capacity, 50);
        assert_eq!(config.network.redacted_headers.len(), 4);
        assert_eq!(config.console.capacity, 1000);
        assert_eq!(
            config.performance.snapshot_interval,
            Duration::from_millis(500)
        );
    }

    #[test]
    fn test_toml_round_trip() {
        let config = Config::default();
        let text = toml::to_string(&config).unwrap();
        assert!(text.contains("snapshot_interval = \"1s\""));
        assert_eq!(Config::from_toml_str(&text).unwrap(), config);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = Config::from_toml_str("[performance]\nframe_window = 1\n").unwrap_err();
        assert!(matches!(err, AppError::Config(_)));

        let err = Config::from_toml_str("[performance]\nsnapshot_interval = \"soon\"\n")
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigParse(_)));
    }
}
