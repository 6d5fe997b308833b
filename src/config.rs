use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::cli::OutputFormat;
use crate::error::ClientError;

pub const DEFAULT_API_URL: &str = "https://api.linear.app/graphql";
pub const API_KEY_VAR: &str = "LINEAR_API_KEY";
pub const API_URL_VAR: &str = "LINEAR_API_URL";
pub const CONFIG_PATH_VAR: &str = "LINEAR_CONFIG";

/// Credential and endpoint, resolved once at startup and handed to the client.
#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub api_url: String,
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("api_url", &self.api_url)
            .finish()
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ClientError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ClientError> {
        let api_key = lookup(API_KEY_VAR)
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty())
            .ok_or(ClientError::MissingCredential)?;
        let api_url = lookup(API_URL_VAR)
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        Ok(Self { api_key, api_url })
    }
}

/// Optional per-user defaults read from `config.toml`.
#[derive(Debug, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub defaults: Defaults,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq)]
pub struct Defaults {
    pub team: Option<String>,
    pub format: Option<OutputFormat>,
    pub limit: Option<u32>,
}

fn settings_path() -> Option<PathBuf> {
    if let Ok(path) = std::env::var(CONFIG_PATH_VAR) {
        return Some(PathBuf::from(path));
    }
    dirs::config_dir().map(|dir| dir.join("linear").join("config.toml"))
}

/// A broken defaults file is reported and skipped; it never blocks a command.
pub fn load_settings() -> Settings {
    let Some(path) = settings_path() else {
        return Settings::default();
    };
    match load_settings_from(&path) {
        Ok(settings) => settings,
        Err(e) => {
            warn!("ignoring {}: {e:#}", path.display());
            Settings::default()
        }
    }
}

pub fn load_settings_from(path: &Path) -> Result<Settings> {
    if !path.exists() {
        debug!(path = %path.display(), "no defaults file");
        return Ok(Settings::default());
    }
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    let settings: Settings =
        toml::from_str(&contents).with_context(|| "Failed to parse config.toml")?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn missing_key_is_fatal() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let err = Config::from_lookup(lookup(&[(API_KEY_VAR, "   ")])).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredential));
    }

    #[test]
    fn default_endpoint_and_override() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "lin_api_x")])).unwrap();
        assert_eq!(config.api_url, DEFAULT_API_URL);

        let config = Config::from_lookup(lookup(&[
            (API_KEY_VAR, "lin_api_x"),
            (API_URL_VAR, "http://localhost:8080/graphql"),
        ]))
        .unwrap();
        assert_eq!(config.api_url, "http://localhost:8080/graphql");
    }

    #[test]
    fn debug_output_hides_the_key() {
        let config = Config::from_lookup(lookup(&[(API_KEY_VAR, "lin_api_secret")])).unwrap();
        let shown = format!("{config:?}");
        assert!(!shown.contains("secret"));
    }

    #[test]
    fn missing_settings_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let settings = load_settings_from(&dir.path().join("config.toml")).unwrap();
        assert_eq!(settings.defaults, Defaults::default());
    }

    #[test]
    fn parses_defaults_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\nteam = \"ENG\"\nformat = \"json\"\nlimit = 25\n").unwrap();
        let settings = load_settings_from(&path).unwrap();
        assert_eq!(settings.defaults.team.as_deref(), Some("ENG"));
        assert_eq!(settings.defaults.format, Some(OutputFormat::Json));
        assert_eq!(settings.defaults.limit, Some(25));
    }

    #[test]
    fn malformed_settings_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults\nteam = ").unwrap();
        let err = load_settings_from(&path).unwrap_err();
        assert!(err.to_string().contains("Failed to parse"));
    }
}
