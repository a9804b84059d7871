use std::time::Duration;

use serde::{Deserialize, Serialize};
use url::Url;

/// Environment variable selecting the backend base URL.
pub const API_URL_ENV: &str = "CHORRUS_API_URL";

/// Backend used when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_api_prefix")]
    pub api_prefix: String,
    /// Transport timeout; none by default.
    #[serde(default)]
    pub request_timeout_ms: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub firebase: FirebaseSettings,
}

impl ClientConfig {
    pub fn validate(&self) -> Result<(), String> {
        let url = Url::parse(&self.api_url)
            .map_err(|e| format!("api_url '{}' is not a valid URL: {e}", self.api_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(format!(
                "api_url must use http or https (got '{}')",
                url.scheme()
            ));
        }
        if !self.api_prefix.is_empty() && !self.api_prefix.starts_with('/') {
            return Err(format!(
                "api_prefix must start with '/' (got '{}')",
                self.api_prefix
            ));
        }
        if self.request_timeout_ms == Some(0) {
            return Err("request_timeout_ms must be > 0".to_string());
        }
        Ok(())
    }

    /// Server root, without trailing slash.
    pub fn root_url(&self) -> String {
        self.api_url.trim_end_matches('/').to_string()
    }

    /// Base of every API path, e.g. `http://localhost:8000/api/v1`.
    pub fn api_base_url(&self) -> String {
        format!(
            "{}{}",
            self.root_url(),
            self.api_prefix.trim_end_matches('/')
        )
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_ms.map(Duration::from_millis)
    }

    #[must_use]
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            api_prefix: default_api_prefix(),
            request_timeout_ms: None,
            logging: LoggingConfig::default(),
            firebase: FirebaseSettings::default(),
        }
    }
}

fn default_api_url() -> String {
    DEFAULT_API_URL.into()
}
fn default_api_prefix() -> String {
    "/api/v1".into()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}
fn default_log_level() -> String {
    "info".into()
}
impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

/// Firebase project settings for email/password sign-in.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FirebaseSettings {
    #[serde(default)]
    pub api_key: Option<String>,
    /// Override for the Identity Toolkit endpoint (emulators).
    #[serde(default)]
    pub identity_toolkit_url: Option<String>,
    /// Override for the Secure Token endpoint (emulators).
    #[serde(default)]
    pub secure_token_url: Option<String>,
}

pub mod loader {
    use super::{API_URL_ENV, ClientConfig};
    use config::{Config, Environment, File};
    use std::path::Path;

    pub const DEFAULT_CONFIG_FILE: &str = "chorrus.toml";

    /// Loads `chorrus.toml` (or `path`), then `CHORRUS__*` variables, then
    /// `CHORRUS_API_URL`.
    ///
    /// Only the implicit `chorrus.toml` may be absent; an explicit `path`
    /// that does not exist is an error.
    pub fn load_config(path: Option<&str>) -> Result<ClientConfig, String> {
        let mut builder = Config::builder();
        match path {
            Some(explicit) => {
                if !Path::new(explicit).is_file() {
                    return Err(format!("config file '{explicit}' not found"));
                }
                builder = builder.add_source(File::from(Path::new(explicit)));
            }
            None => {
                if Path::new(DEFAULT_CONFIG_FILE).exists() {
                    builder = builder.add_source(File::from(Path::new(DEFAULT_CONFIG_FILE)));
                }
            }
        }
        // Nested overrides, e.g. CHORRUS__LOGGING__LEVEL=debug
        builder = builder.add_source(
            Environment::with_prefix("CHORRUS")
                .try_parsing(true)
                .separator("__"),
        );
        if let Ok(api_url) = std::env::var(API_URL_ENV)
            && !api_url.trim().is_empty()
        {
            builder = builder
                .set_override("api_url", api_url)
                .map_err(|e| format!("config override error: {e}"))?;
        }
        let cfg = builder
            .build()
            .map_err(|e| format!("config build error: {e}"))?;
        let merged: ClientConfig = cfg
            .try_deserialize()
            .map_err(|e| format!("config deserialize error: {e}"))?;
        merged.validate()?;
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = ClientConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.api_base_url(), "http://localhost:8000/api/v1");
        assert_eq!(cfg.request_timeout(), None);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_trailing_slashes_are_trimmed() {
        let cfg = ClientConfig::default().with_api_url("https://chores.example.com/");
        assert_eq!(cfg.api_base_url(), "https://chores.example.com/api/v1");
        assert_eq!(cfg.root_url(), "https://chores.example.com");
    }

    #[test]
    fn test_validation_errors() {
        let bad_scheme = ClientConfig::default().with_api_url("ftp://example.com");
        assert!(bad_scheme.validate().unwrap_err().contains("http or https"));

        let not_a_url = ClientConfig::default().with_api_url("localhost:8000/api");
        assert!(not_a_url.validate().is_err());

        let bad_prefix = ClientConfig {
            api_prefix: "api/v1".into(),
            ..Default::default()
        };
        assert!(bad_prefix.validate().unwrap_err().contains("api_prefix"));

        let zero_timeout = ClientConfig {
            request_timeout_ms: Some(0),
            ..Default::default()
        };
        assert!(zero_timeout.validate().is_err());
    }
}
