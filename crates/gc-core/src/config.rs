//! Configuration management
//!
//! Settings are resolved in this order of precedence:
//! 1. Environment variables
//! 2. `gcontacts.toml` configuration file
//! 3. Defaults
//!
//! `${VAR_NAME}` references inside the configuration file are expanded from
//! the environment before parsing.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

use crate::Error;

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "gcontacts.toml";

/// People API endpoint configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PeopleApiConfig {
    /// Base URL every relative API path is joined onto
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Scopes requested when a call does not name its own
    #[serde(default = "default_scopes")]
    pub default_scopes: Vec<String>,

    /// Field mask used for `personFields` / `readMask`
    #[serde(default = "default_read_mask")]
    pub read_mask: String,

    /// Source filter for directory lookups
    #[serde(default = "default_directory_source")]
    pub directory_source: String,

    /// Per-request timeout applied by the HTTP transport
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for PeopleApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            default_scopes: default_scopes(),
            read_mask: default_read_mask(),
            directory_source: default_directory_source(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

/// Credentials used to obtain bearer tokens
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthConfig {
    /// Pre-issued access token (takes precedence over the refresh grant)
    #[serde(default)]
    pub access_token: Option<String>,

    /// OAuth2 client ID
    #[serde(default)]
    pub client_id: Option<String>,

    /// OAuth2 client secret
    #[serde(default)]
    pub client_secret: Option<String>,

    /// Long-lived OAuth2 refresh token
    #[serde(default)]
    pub refresh_token: Option<String>,

    /// Token endpoint for the refresh grant
    #[serde(default = "default_token_url")]
    pub token_url: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            client_id: None,
            client_secret: None,
            refresh_token: None,
            token_url: default_token_url(),
        }
    }
}

impl AuthConfig {
    /// Whether all three values of the refresh grant are present
    pub fn has_refresh_credentials(&self) -> bool {
        [&self.client_id, &self.client_secret, &self.refresh_token]
            .iter()
            .all(|v| v.as_deref().is_some_and(|s| !s.is_empty()))
    }
}

fn default_base_url() -> String {
    "https://people.googleapis.com/v1".to_string()
}

fn default_scopes() -> Vec<String> {
    vec!["contacts".to_string()]
}

fn default_read_mask() -> String {
    "names,emailAddresses,phoneNumbers".to_string()
}

fn default_directory_source() -> String {
    "DIRECTORY_SOURCE_TYPE_DOMAIN_PROFILE".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_token_url() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Main configuration for gcontacts
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Config {
    /// People API settings
    #[serde(default)]
    pub people: PeopleApiConfig,

    /// Authentication settings
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Expand `${VAR_NAME}` references with environment values.
    ///
    /// Unknown variables expand to an empty string.
    fn expand_env_vars(value: &str) -> String {
        let mut result = String::new();
        let mut chars = value.chars().peekable();

        while let Some(c) = chars.next() {
            if c == '$' && chars.peek() == Some(&'{') {
                chars.next();

                let mut var_name = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    var_name.push(c);
                }

                if let Ok(env_value) = std::env::var(&var_name) {
                    result.push_str(&env_value);
                }
            } else {
                result.push(c);
            }
        }

        result
    }

    /// Parse configuration from TOML text (after env expansion).
    pub fn from_toml_str(content: &str) -> crate::Result<Self> {
        let expanded = Self::expand_env_vars(content);
        let config: Config = toml::from_str(&expanded)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, then apply environment overrides.
    pub fn from_toml_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read config file {}: {}", path.display(), e)))?;

        let mut config = Self::from_toml_str(&content)?;
        config.apply_env_overrides();
        config.validate()?;

        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load configuration from environment variables on top of defaults
    pub fn from_env() -> crate::Result<Self> {
        let mut config = Self::default();
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from `path`, or from `./gcontacts.toml` if present,
    /// or from the environment alone.
    pub fn load(path: Option<&Path>) -> crate::Result<Self> {
        if let Some(path) = path {
            return Self::from_toml_file(path);
        }

        if Path::new(DEFAULT_CONFIG_FILE).exists() {
            return Self::from_toml_file(DEFAULT_CONFIG_FILE);
        }

        Self::from_env()
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from a key lookup. Empty values are ignored.
    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(url) = get("PEOPLE_API_BASE_URL") {
            self.people.base_url = url;
        }
        if let Some(scopes) = get("PEOPLE_API_SCOPES") {
            let scopes: Vec<String> = scopes
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
            if !scopes.is_empty() {
                self.people.default_scopes = scopes;
            }
        }
        if let Some(mask) = get("PEOPLE_API_READ_MASK") {
            self.people.read_mask = mask;
        }
        if let Some(secs) = get("PEOPLE_API_TIMEOUT_SECS") {
            if let Ok(secs) = secs.trim().parse() {
                self.people.timeout_secs = secs;
            }
        }

        if let Some(token) = get("GOOGLE_ACCESS_TOKEN") {
            self.auth.access_token = Some(token);
        }
        if let Some(id) = get("GOOGLE_CLIENT_ID") {
            self.auth.client_id = Some(id);
        }
        if let Some(secret) = get("GOOGLE_CLIENT_SECRET") {
            self.auth.client_secret = Some(secret);
        }
        if let Some(token) = get("GOOGLE_REFRESH_TOKEN") {
            self.auth.refresh_token = Some(token);
        }
        if let Some(url) = get("GOOGLE_TOKEN_URL") {
            self.auth.token_url = url;
        }
    }

    fn validate(&self) -> crate::Result<()> {
        if self.people.base_url.trim().is_empty() {
            return Err(Error::Config("people.base_url must not be empty".to_string()));
        }
        if self.people.default_scopes.iter().all(|s| s.trim().is_empty()) {
            return Err(Error::Config("people.default_scopes must name at least one scope".to_string()));
        }
        Ok(())
    }
}
