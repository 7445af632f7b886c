//! Client settings: defaults, optional `client.toml`, then environment.

use std::{
    fs, io,
    path::{Path, PathBuf},
    time::Duration,
};

use serde::Deserialize;
use shared::protocol::SearchFilters;
use thiserror::Error;
use url::Url;

use crate::GREETING;

pub const DEFAULT_API_URL: &str = "http://localhost:8000";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
pub const SETTINGS_FILE_NAME: &str = "client.toml";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file '{}': {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse settings file '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid api url '{value}': {source}")]
    InvalidUrl {
        value: String,
        #[source]
        source: url::ParseError,
    },
    #[error("api url '{0}' must use http or https")]
    UnsupportedScheme(String),
    #[error("request timeout must be a positive number of seconds, got '{0}'")]
    InvalidTimeout(String),
}

#[derive(Debug, Clone)]
pub struct ClientSettings {
    /// Validated base url without a trailing slash.
    pub api_url: String,
    pub request_timeout: Duration,
    pub greeting: String,
    pub filters: SearchFilters,
}

#[derive(Debug, Default, Deserialize)]
struct FileSettings {
    api_url: Option<String>,
    request_timeout_secs: Option<u64>,
    greeting: Option<String>,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            greeting: GREETING.to_string(),
            filters: SearchFilters::unrestricted(),
        }
    }
}

impl ClientSettings {
    /// Defaults, then `path` (or `./client.toml` when present), then process
    /// environment. An explicit path must exist; the implicit one is optional.
    pub fn load_from(path: Option<&Path>) -> Result<Self, SettingsError> {
        let mut settings = Self::default();

        match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|source| SettingsError::Read {
                    path: path.to_path_buf(),
                    source,
                })?;
                settings.apply_file(path, &raw)?;
            }
            None => {
                let implicit = Path::new(SETTINGS_FILE_NAME);
                if let Ok(raw) = fs::read_to_string(implicit) {
                    settings.apply_file(implicit, &raw)?;
                }
            }
        }

        settings.apply_env_with(|name| std::env::var(name).ok())?;
        Ok(settings)
    }

    pub fn apply_file(&mut self, path: &Path, raw: &str) -> Result<(), SettingsError> {
        let file_cfg: FileSettings = toml::from_str(raw).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        if let Some(v) = file_cfg.api_url {
            self.api_url = parse_api_url(&v)?;
        }
        if let Some(v) = file_cfg.request_timeout_secs {
            if v == 0 {
                return Err(SettingsError::InvalidTimeout(v.to_string()));
            }
            self.request_timeout = Duration::from_secs(v);
        }
        if let Some(v) = file_cfg.greeting.filter(|v| !v.trim().is_empty()) {
            self.greeting = v;
        }
        Ok(())
    }

    /// Applies environment overrides through `lookup`; blank values are ignored.
    pub fn apply_env_with(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), SettingsError> {
        let non_blank = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(v) = non_blank("VACHANAMRUT_API_URL") {
            self.api_url = parse_api_url(&v)?;
        }
        if let Some(v) = non_blank("APP__API_URL") {
            self.api_url = parse_api_url(&v)?;
        }
        if let Some(v) = non_blank("APP__REQUEST_TIMEOUT_SECS") {
            let secs = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| SettingsError::InvalidTimeout(v.clone()))?;
            self.request_timeout = Duration::from_secs(secs);
        }
        Ok(())
    }

    pub fn with_api_url(mut self, raw: &str) -> Result<Self, SettingsError> {
        self.api_url = parse_api_url(raw)?;
        Ok(self)
    }

    /// Absolute URL for a backend route such as `ask`.
    pub fn endpoint(&self, route: &str) -> String {
        format!(
            "{}/{}",
            self.api_url,
            route.trim_start_matches('/')
        )
    }
}

/// Validates `raw` as an http(s) base url and strips trailing slashes.
pub fn parse_api_url(raw: &str) -> Result<String, SettingsError> {
    let trimmed = raw.trim();
    let url = Url::parse(trimmed).map_err(|source| SettingsError::InvalidUrl {
        value: trimmed.to_string(),
        source,
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(SettingsError::UnsupportedScheme(trimmed.to_string()));
    }
    Ok(url.as_str().trim_end_matches('/').to_string())
}

#[cfg(test)]
#[path = "tests/settings_tests.rs"]
mod tests;
