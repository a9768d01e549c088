//! Runtime configuration
//!
//! Built once at startup from environment variables and passed down
//! explicitly. The server binary loads `.env` first when one exists.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub const DEFAULT_MODEL: &str = "deepseek/deepseek-r1:free";
pub const DEFAULT_STORE_PATH: &str = "output.csv";
pub const DEFAULT_PORT: u16 = 8501;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub store_path: PathBuf,
    pub port: u16,
    pub provider: ProviderConfig,
    /// None disables publishing.
    pub sync: Option<SyncConfig>,
}

/// OpenAI-compatible chat-completions endpoint.
#[derive(Clone)]
pub struct ProviderConfig {
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub timeout: Option<Duration>,
}

// Keeps the key out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key: None,
            timeout: None,
        }
    }
}

/// Local git working copy that holds the store file, and where to push it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncConfig {
    pub repo_dir: PathBuf,
    pub remote: String,
    /// None pushes the current branch (`HEAD`).
    pub branch: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let provider = ProviderConfig {
            base_url: get("PROVIDER_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            model: get("PROVIDER_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            api_key: get("API_KEY"),
            timeout: get("PROVIDER_TIMEOUT_SECS")
                .and_then(|raw| parse_setting("PROVIDER_TIMEOUT_SECS", &raw))
                .map(Duration::from_secs),
        };

        let sync = get("SYNC_REPO_DIR").map(|dir| SyncConfig {
            repo_dir: PathBuf::from(dir),
            remote: get("SYNC_REMOTE").unwrap_or_else(|| "origin".to_string()),
            branch: get("SYNC_BRANCH"),
        });

        Self {
            store_path: get("STORE_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_STORE_PATH)),
            port: get("PORT")
                .and_then(|raw| parse_setting("PORT", &raw))
                .unwrap_or(DEFAULT_PORT),
            provider,
            sync,
        }
    }
}

/// Parse a set value; an unparseable one is logged and treated as unset.
fn parse_setting<T: FromStr>(key: &str, raw: &str) -> Option<T> {
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!(key, value = %raw, "ignoring invalid setting, using default");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> AppConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.store_path, PathBuf::from("output.csv"));
        assert_eq!(config.port, 8501);
        assert_eq!(config.provider.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.provider.model, DEFAULT_MODEL);
        assert!(config.provider.api_key.is_none());
        assert!(config.provider.timeout.is_none());
        assert!(config.sync.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("API_KEY", "sk-test"),
            ("PROVIDER_MODEL", "mistral/small"),
            ("PROVIDER_TIMEOUT_SECS", "90"),
            ("STORE_PATH", "/srv/plants.csv"),
            ("PORT", "3000"),
            ("SYNC_REPO_DIR", "/srv/repo"),
            ("SYNC_BRANCH", "main"),
        ]);

        assert_eq!(config.provider.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.provider.model, "mistral/small");
        assert_eq!(config.provider.timeout, Some(Duration::from_secs(90)));
        assert_eq!(config.store_path, PathBuf::from("/srv/plants.csv"));
        assert_eq!(config.port, 3000);
        assert_eq!(
            config.sync,
            Some(SyncConfig {
                repo_dir: PathBuf::from("/srv/repo"),
                remote: "origin".to_string(),
                branch: Some("main".to_string()),
            })
        );
    }

    #[test]
    fn test_blank_and_invalid_values_fall_back() {
        let config = config_from(&[("PORT", "not-a-port"), ("SYNC_REPO_DIR", "  "), ("API_KEY", "")]);
        assert_eq!(config.port, DEFAULT_PORT);
        assert!(config.sync.is_none());
        assert!(config.provider.api_key.is_none());
    }

    #[test]
    fn test_invalid_timeout_is_unset() {
        let config = config_from(&[("PROVIDER_TIMEOUT_SECS", "ninety")]);
        assert!(config.provider.timeout.is_none());
        assert_eq!(parse_setting::<u64>("PROVIDER_TIMEOUT_SECS", "ninety"), None);
        assert_eq!(parse_setting::<u16>("PORT", "8080"), Some(8080));
        assert_eq!(parse_setting::<u16>("PORT", "70000"), None);
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = config_from(&[("API_KEY", "sk-secret")]);
        let rendered = format!("{:?}", config.provider);
        assert!(!rendered.contains("sk-secret"));
        assert!(rendered.contains("<redacted>"));
    }
}
