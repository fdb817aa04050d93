use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{Result, SpontyError};

/// Environment variable overriding the configured project URL.
pub const URL_ENV: &str = "SPONTYUP_URL";
/// Environment variable overriding the configured anon key.
pub const ANON_KEY_ENV: &str = "SPONTYUP_ANON_KEY";

/// Connection settings for the hosted backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendConfig {
    /// Project base URL, e.g. https://abcdefgh.supabase.co
    pub url: String,
    /// Public anon key, sent as the `apikey` header on every request
    pub anon_key: String,
}

impl BackendConfig {
    pub fn new(url: impl Into<String>, anon_key: impl Into<String>) -> Self {
        Self {
            url: normalize_url(url.into()),
            anon_key: anon_key.into(),
        }
    }

    /// Load configuration: environment variables win over the config file.
    ///
    /// Fails hard with an actionable error when neither source is complete.
    pub fn load() -> Result<Self> {
        let from_file = Self::read_file(&Self::config_path())?;
        Self::resolve(
            env::var(URL_ENV).ok(),
            env::var(ANON_KEY_ENV).ok(),
            from_file,
        )
    }

    fn resolve(
        env_url: Option<String>,
        env_anon_key: Option<String>,
        from_file: Option<Self>,
    ) -> Result<Self> {
        let url = env_url
            .filter(|v| !v.is_empty())
            .or_else(|| from_file.as_ref().map(|c| c.url.clone()));
        let anon_key = env_anon_key
            .filter(|v| !v.is_empty())
            .or_else(|| from_file.as_ref().map(|c| c.anon_key.clone()));

        match (url, anon_key) {
            (Some(url), Some(anon_key)) => Ok(Self::new(url, anon_key)),
            _ => Err(SpontyError::config(format!(
                "backend not configured; set {URL_ENV} and {ANON_KEY_ENV} or run: spontyctl config init"
            ))),
        }
    }

    /// Config file path: ~/.spontyctl/config.toml
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Config directory: ~/.spontyctl
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".spontyctl")
    }

    fn read_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| SpontyError::invalid_config(path, e.to_string()))?;
        debug!(path = %path.display(), "loaded backend config");
        Ok(Some(config))
    }

    /// Save to ~/.spontyctl/config.toml, creating the directory if needed.
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path())
    }

    fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let toml_str = toml::to_string_pretty(self)
            .map_err(|e| SpontyError::config(format!("failed to serialize config: {e}")))?;
        fs::write(path, toml_str)?;
        Ok(())
    }
}

fn normalize_url(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
