//! Application configuration management.
//!
//! Holds the backend bridge URL and the last email used to sign in.
//! Configuration is stored at `<config dir>/reelboard/config.json`; the
//! `REELBOARD_BACKEND_URL` environment variable overrides the stored URL.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Application name used for config/cache directory paths
const APP_NAME: &str = "reelboard";

/// Config file name
const CONFIG_FILE: &str = "config.json";

/// Environment variable that overrides `backend_url`
pub const BACKEND_URL_ENV: &str = "REELBOARD_BACKEND_URL";

/// Where the desktop shell's bridge listens by default
pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:8765";

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    pub backend_url: Option<String>,
    pub last_email: Option<String>,
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &std::path::Path) -> Result<Self> {
        if path.exists() {
            let contents = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read config file {}", path.display()))?;
            Ok(serde_json::from_str(&contents).context("Failed to parse config file")?)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &std::path::Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find config directory"))?;
        Ok(config_dir.join(APP_NAME).join(CONFIG_FILE))
    }

    /// Bridge URL: environment first, then the config file, then the default.
    pub fn backend_url(&self) -> String {
        std::env::var(BACKEND_URL_ENV)
            .ok()
            .filter(|v| !v.trim().is_empty())
            .or_else(|| self.backend_url.clone())
            .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
    }

    /// Directory for the remembered session and log files.
    pub fn cache_dir(&self) -> Result<PathBuf> {
        let cache_dir = dirs::cache_dir()
            .ok_or_else(|| anyhow::anyhow!("Could not find cache directory"))?;
        Ok(cache_dir.join(APP_NAME))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_is_default() {
        let path = std::env::temp_dir().join(format!("reelboard-config-missing-{}.json", std::process::id()));
        let config = Config::load_from(&path).unwrap();
        assert!(config.backend_url.is_none());
        assert!(config.last_email.is_none());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("reelboard-config-{}", std::process::id()));
        let path = dir.join("nested").join(CONFIG_FILE);
        let config = Config {
            backend_url: Some("http://bridge:9000".to_string()),
            last_email: Some("malee@rcp.co".to_string()),
        };
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded.backend_url.as_deref(), Some("http://bridge:9000"));
        assert_eq!(loaded.last_email.as_deref(), Some("malee@rcp.co"));

        let _ = std::fs::remove_dir_all(dir);
    }
}
