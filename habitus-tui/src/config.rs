use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

const API_URL_ENV: &str = "HABITUS_API_URL";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitusConfig {
    /// Base URL of the Habitus API, e.g. "http://localhost:3333"
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Prefix for keys in the local session store.
    #[serde(default = "default_storage_prefix")]
    pub storage_prefix: String,

    /// Local port that receives the OAuth callback during `habitus login`.
    #[serde(default = "default_callback_port")]
    pub callback_port: u16,

    /// Length of one timer "minute" in seconds. Lower it to try a session quickly.
    #[serde(default = "default_minute_seconds")]
    pub minute_seconds: u32,
}

fn default_api_url() -> String {
    "http://localhost:3333".to_string()
}

fn default_storage_prefix() -> String {
    "habitus".to_string()
}

fn default_callback_port() -> u16 {
    9876
}

fn default_minute_seconds() -> u32 {
    60
}

impl Default for HabitusConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            storage_prefix: default_storage_prefix(),
            callback_port: default_callback_port(),
            minute_seconds: default_minute_seconds(),
        }
    }
}

impl HabitusConfig {
    pub fn root_dir() -> Result<PathBuf> {
        Ok(dirs::config_dir()
            .context("Cannot determine config directory")?
            .join("habitus"))
    }

    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::root_dir()?.join("config.toml"))
    }

    pub fn log_path() -> Result<PathBuf> {
        Ok(Self::root_dir()?.join("habitus.log"))
    }

    /// Load config from disk, then apply environment overrides.
    /// Returns the default config if the file doesn't exist.
    pub fn load() -> Result<Self> {
        let path = Self::config_path()?;
        let mut config = if path.exists() {
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config at {}", path.display()))?;
            Self::parse(&raw)
                .with_context(|| format!("Failed to parse config at {}", path.display()))?
        } else {
            Self::default()
        };

        if let Ok(url) = std::env::var(API_URL_ENV) {
            if !url.trim().is_empty() {
                config.api_url = url.trim().to_string();
            }
        }
        Ok(config)
    }

    fn parse(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Write the default config if none exists yet. Returns the config path.
    pub fn ensure_exists() -> Result<PathBuf> {
        let path = Self::config_path()?;
        if !path.exists() {
            Self::default().save()?;
        }
        Ok(path)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let raw = toml::to_string_pretty(self)?;
        std::fs::write(&path, raw)?;
        Ok(())
    }

    pub fn user_key(&self) -> String {
        format!("{}:userData", self.storage_prefix)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let config = HabitusConfig::parse("api_url = \"https://habits.example.com\"").unwrap();
        assert_eq!(config.api_url, "https://habits.example.com");
        assert_eq!(config.callback_port, 9876);
        assert_eq!(config.minute_seconds, 60);
    }

    #[test]
    fn round_trips_through_toml() {
        let config = HabitusConfig {
            minute_seconds: 1,
            ..HabitusConfig::default()
        };
        let raw = toml::to_string_pretty(&config).unwrap();
        assert_eq!(HabitusConfig::parse(&raw).unwrap(), config);
    }

    #[test]
    fn user_key_uses_prefix() {
        let config = HabitusConfig {
            storage_prefix: "dev".to_string(),
            ..HabitusConfig::default()
        };
        assert_eq!(config.user_key(), "dev:userData");
    }
}
