//! Configuration loading and management for wikisumma.
//!
//! Loads settings from `wikisumma.toml` with environment variable overrides.
//! A missing file is not an error: every setting has a default.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable overriding the configured language
pub const LANG_ENV: &str = "WIKISUMMA_LANG";

const CONFIG_FILE: &str = "wikisumma.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// HTTP client settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    /// Upper bound on a single fetch, in seconds
    pub timeout_secs: u64,
    /// User-Agent sent to the Wikipedia API
    pub user_agent: String,
}

/// Display surface settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Column at which summaries are reflowed
    pub fill_column: usize,
    /// Directory that receives new summary surfaces
    pub output_dir: PathBuf,
}

/// Root configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Wikipedia language code, used as the host prefix (e.g. "en", "fr")
    pub language: String,
    pub http: HttpConfig,
    pub display: DisplayConfig,
}

impl Config {
    /// Load configuration from the default location (wikisumma.toml in cwd or home)
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = match Self::find_config_file() {
            Some(path) => Self::read(&path)?,
            None => {
                tracing::debug!("no config file found, using defaults");
                Self::default()
            }
        };
        config.apply_env();
        Ok(config)
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::read(path)?;
        config.apply_env();
        Ok(config)
    }

    fn read(path: &Path) -> Result<Self, ConfigError> {
        tracing::debug!(path = %path.display(), "loading config");
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    fn apply_env(&mut self) {
        if let Ok(lang) = std::env::var(LANG_ENV) {
            if !lang.trim().is_empty() {
                self.language = lang.trim().to_string();
            }
        }
    }

    /// Find the config file in standard locations
    fn find_config_file() -> Option<PathBuf> {
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            return Some(local_config);
        }

        let home_config = dirs::home_dir()?
            .join(".config")
            .join("wikisumma")
            .join(CONFIG_FILE);
        home_config.exists().then_some(home_config)
    }

    /// Fetch timeout as a `Duration`
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.http.timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            language: "en".to_string(),
            http: HttpConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!(
                "wikisumma/",
                env!("CARGO_PKG_VERSION"),
                " (https://github.com/cladam/wikisumma)"
            )
            .to_string(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            fill_column: 70,
            output_dir: PathBuf::from("./summaries"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_to_english() {
        let config = Config::default();
        assert_eq!(config.language, "en");
        assert_eq!(config.display.fill_column, 70);
        assert_eq!(config.timeout(), Duration::from_secs(30));
    }

    #[test]
    fn partial_file_keeps_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
language = "fr"

[display]
fill_column = 60
"#,
        )
        .unwrap();
        assert_eq!(config.language, "fr");
        assert_eq!(config.display.fill_column, 60);
        assert_eq!(config.display.output_dir, PathBuf::from("./summaries"));
        assert_eq!(config.http.timeout_secs, 30);
    }

    #[test]
    fn read_reports_parse_errors() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "language = [").unwrap();
        let err = Config::read(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn read_reports_missing_file() {
        let err = Config::read(Path::new("/nonexistent/wikisumma.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::ReadError(_)));
    }
}
