use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::domain::{UpdateSelection, WILDCARD};
use crate::error::{PollerError, Result};
use crate::poller::{DEFAULT_LIMIT, DEFAULT_TIMEOUT_SECS, PollConfig};
use crate::transport::DEFAULT_BASE_URL;

/// Environment variable consulted when no access token is configured
pub const ACCESS_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

const REDACTED: &str = "<redacted>";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub log_level: Option<String>,
    pub credentials: CredentialsConfig,
    pub polling: PollingConfig,
    pub http: HttpConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CredentialsConfig {
    pub base_url: String,
    pub access_token: Option<String>,
}

impl Default for CredentialsConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            access_token: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollingConfig {
    pub offset: i64,
    pub limit: u32,
    pub timeout: u32,
    pub updates: Vec<String>,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_LIMIT,
            timeout: DEFAULT_TIMEOUT_SECS,
            updates: vec![WILDCARD.to_string()],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpConfig {
    pub connect_timeout_ms: u64,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout_ms: 10000,
        }
    }
}

impl HttpConfig {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_millis(self.connect_timeout_ms)
    }
}

/// Outcome of walking the implicit config locations
#[derive(Debug, Clone)]
pub struct ConfigLoad {
    pub config: Config,
    /// File the config came from; `None` means defaults
    pub source: Option<PathBuf>,
    pub skipped: Vec<SkippedConfig>,
}

/// A config file that existed but could not be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedConfig {
    pub path: PathBuf,
    pub error: String,
}

/// Command-line values layered over the loaded file
#[derive(Debug, Clone, Default)]
pub struct PollingOverrides {
    pub offset: Option<i64>,
    pub limit: Option<u32>,
    pub timeout: Option<u32>,
    pub updates: Option<Vec<String>>,
    pub base_url: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: Some("info".to_string()),
            credentials: CredentialsConfig::default(),
            polling: PollingConfig::default(),
            http: HttpConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // An explicit path must load
        if let Some(path) = config_path {
            return Self::load_from_file(path);
        }

        Ok(Self::load_from_candidates(&Self::default_candidates()).config)
    }

    /// Implicit locations, in order: ~/.config/<project>/<project>.yml, ./<project>.yml
    pub fn default_candidates() -> Vec<PathBuf> {
        let project_name = env!("CARGO_PKG_NAME");
        let file_name = format!("{}.yml", project_name);

        let mut candidates = Vec::new();
        if let Some(config_dir) = dirs::config_dir() {
            candidates.push(config_dir.join(project_name).join(&file_name));
        }
        candidates.push(PathBuf::from(file_name));
        candidates
    }

    /// First candidate that exists and parses wins; broken ones are logged
    /// and skipped. Defaults when none loads.
    pub fn load_from_candidates(candidates: &[PathBuf]) -> ConfigLoad {
        let mut skipped = Vec::new();

        for candidate in candidates.iter().filter(|path| path.exists()) {
            match Self::load_from_file(candidate) {
                Ok(config) => {
                    return ConfigLoad {
                        config,
                        source: Some(candidate.clone()),
                        skipped,
                    };
                }
                Err(e) => {
                    log::warn!("Failed to load config from {}: {}", candidate.display(), e);
                    skipped.push(SkippedConfig {
                        path: candidate.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        log::info!("No usable config file found, using defaults");
        ConfigLoad {
            config: Self::default(),
            source: None,
            skipped,
        }
    }

    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)?;
        let config = Self::from_yaml(&content)?;
        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(content)?)
    }

    pub fn apply_overrides(&mut self, overrides: &PollingOverrides) {
        if let Some(offset) = overrides.offset {
            self.polling.offset = offset;
        }
        if let Some(limit) = overrides.limit {
            self.polling.limit = limit;
        }
        if let Some(timeout) = overrides.timeout {
            self.polling.timeout = timeout;
        }
        if let Some(updates) = &overrides.updates {
            self.polling.updates = updates.clone();
        }
        if let Some(base_url) = &overrides.base_url {
            self.credentials.base_url = base_url.clone();
        }
    }

    /// Configured token, else the environment
    pub fn access_token(&self) -> Option<String> {
        resolve_access_token(
            self.credentials.access_token.as_deref(),
            std::env::var(ACCESS_TOKEN_ENV).ok(),
        )
    }

    /// Validated parameters for one poll loop
    pub fn poll_config(&self) -> Result<PollConfig> {
        let access_token = self.access_token().ok_or_else(|| {
            PollerError::Config(format!(
                "no access token: set credentials.access_token or {}",
                ACCESS_TOKEN_ENV
            ))
        })?;
        let selection = UpdateSelection::from_names(&self.polling.updates)?;

        let config = PollConfig::new(self.credentials.base_url.clone(), access_token)
            .with_offset(self.polling.offset)
            .with_limit(self.polling.limit)
            .with_timeout(self.polling.timeout)
            .with_selection(selection);
        config.validate()?;
        Ok(config)
    }

    /// Copy safe to print
    pub fn redacted(&self) -> Self {
        let mut config = self.clone();
        if config.credentials.access_token.is_some() {
            config.credentials.access_token = Some(REDACTED.to_string());
        }
        config
    }
}

fn resolve_access_token(configured: Option<&str>, from_env: Option<String>) -> Option<String> {
    configured
        .map(str::to_string)
        .or(from_env)
        .filter(|token| !token.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_token(yaml: &str) -> String {
        format!("credentials:\n  access_token: \"123:secret\"\n{}", yaml)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.credentials.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.polling.limit, 100);
        assert_eq!(config.polling.timeout, 60);
        assert_eq!(config.polling.updates, vec!["*".to_string()]);
        assert_eq!(config.http.connect_timeout(), Duration::from_secs(10));
    }

    #[test]
    fn test_partial_yaml_uses_defaults() {
        let config = Config::from_yaml("polling:\n  limit: 10\n").unwrap();
        assert_eq!(config.polling.limit, 10);
        assert_eq!(config.polling.timeout, 60);
        assert_eq!(config.credentials.base_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn test_poll_config_from_yaml() {
        let yaml = with_token(
            "polling:\n  offset: -3\n  limit: 50\n  timeout: 0\n  updates: [message, callback_query]\n",
        );
        let poll_config = Config::from_yaml(&yaml).unwrap().poll_config().unwrap();

        assert_eq!(poll_config.offset, -3);
        assert_eq!(poll_config.limit, 50);
        assert_eq!(poll_config.timeout, 0);
        assert_eq!(poll_config.access_token, "123:secret");
        assert_eq!(
            poll_config.selection,
            UpdateSelection::only(["message", "callback_query"])
        );
    }

    #[test]
    fn test_non_numeric_limit_rejected() {
        let result = Config::from_yaml("polling:\n  limit: lots\n");
        assert!(matches!(result, Err(PollerError::Yaml(_))));
    }

    #[test]
    fn test_negative_timeout_rejected() {
        let result = Config::from_yaml("polling:\n  timeout: -1\n");
        assert!(matches!(result, Err(PollerError::Yaml(_))));
    }

    #[test]
    fn test_non_array_updates_rejected() {
        let result = Config::from_yaml("polling:\n  updates: message\n");
        assert!(matches!(result, Err(PollerError::Yaml(_))));
    }

    #[test]
    fn test_limit_out_of_range_rejected() {
        let config = Config::from_yaml(&with_token("polling:\n  limit: 500\n")).unwrap();
        assert!(matches!(config.poll_config(), Err(PollerError::Config(_))));
    }

    #[test]
    fn test_empty_updates_rejected() {
        let config = Config::from_yaml(&with_token("polling:\n  updates: []\n")).unwrap();
        assert!(matches!(config.poll_config(), Err(PollerError::Config(_))));
    }

    #[test]
    fn test_overrides() {
        let mut config = Config::default();
        config.apply_overrides(&PollingOverrides {
            offset: Some(-1),
            limit: Some(5),
            timeout: None,
            updates: Some(vec!["poll".to_string()]),
            base_url: Some("http://localhost:8081".to_string()),
        });

        assert_eq!(config.polling.offset, -1);
        assert_eq!(config.polling.limit, 5);
        assert_eq!(config.polling.timeout, 60);
        assert_eq!(config.polling.updates, vec!["poll".to_string()]);
        assert_eq!(config.credentials.base_url, "http://localhost:8081");
    }

    #[test]
    fn test_resolve_access_token() {
        assert_eq!(
            resolve_access_token(Some("cfg"), Some("env".to_string())),
            Some("cfg".to_string())
        );
        assert_eq!(
            resolve_access_token(None, Some("env".to_string())),
            Some("env".to_string())
        );
        assert_eq!(resolve_access_token(Some("  "), None), None);
        assert_eq!(resolve_access_token(None, None), None);
    }

    #[test]
    fn test_redacted() {
        let config = Config::from_yaml(&with_token("")).unwrap();
        let yaml = serde_yaml::to_string(&config.redacted()).unwrap();
        assert!(!yaml.contains("secret"));
        assert!(yaml.contains(REDACTED));
    }
}
