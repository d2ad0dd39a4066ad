//! Configuration loading and management
//!
//! Configuration comes from an optional YAML file, then environment
//! overrides. It is read once at startup and injected from there on; nothing
//! else in the crate looks at the environment.

use crate::core::auth::is_cookie_safe;
use crate::core::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable holding the access token
pub const ENV_ACCESS_TOKEN: &str = "ACCESS_TOKEN";
pub const ENV_BIND: &str = "LINKVAULT_BIND";
pub const ENV_DATA_FILE: &str = "LINKVAULT_DATA_FILE";
pub const ENV_SECURE_COOKIES: &str = "LINKVAULT_SECURE_COOKIES";
/// Environment variable pointing at the YAML config file
pub const ENV_CONFIG: &str = "LINKVAULT_CONFIG";

/// Complete configuration for a linkvault server
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VaultConfig {
    /// Address the HTTP server binds to
    pub bind_addr: String,

    /// Location of the link document
    pub data_file: PathBuf,

    /// The one valid credential; `None` locks every protected operation
    pub access_token: Option<String>,

    /// Mark the session cookie `Secure` (HTTPS deployments)
    pub secure_cookies: bool,

    /// Lifetime of the session cookie
    pub session_max_age_days: u32,
}

impl Default for VaultConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3000".to_string(),
            data_file: PathBuf::from("data/links.json"),
            access_token: None,
            secure_cookies: false,
            session_max_age_days: 30,
        }
    }
}

impl std::fmt::Debug for VaultConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VaultConfig")
            .field("bind_addr", &self.bind_addr)
            .field("data_file", &self.data_file)
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("secure_cookies", &self.secure_cookies)
            .field("session_max_age_days", &self.session_max_age_days)
            .finish()
    }
}

impl VaultConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::IoError {
            path: path.to_string(),
            source,
        })?;
        serde_yaml::from_str(&content).map_err(|e| ConfigError::ParseError {
            file: Some(path.to_string()),
            message: e.to_string(),
        })
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    /// Load from `LINKVAULT_CONFIG` if set, then apply the process environment
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var(ENV_CONFIG) {
            Ok(path) if !path.is_empty() => Self::from_yaml_file(&path)?,
            _ => Self::default(),
        };
        base.with_env_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an environment lookup
    ///
    /// Takes the lookup as a function so tests can pass a fixed map. The
    /// resulting token, from either source, must be usable as a cookie value.
    pub fn with_env_overrides(
        mut self,
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        if let Some(token) = env(ENV_ACCESS_TOKEN) {
            self.access_token = Some(token);
        }
        if let Some(bind) = env(ENV_BIND) {
            self.bind_addr = bind;
        }
        if let Some(path) = env(ENV_DATA_FILE) {
            self.data_file = PathBuf::from(path);
        }
        if let Some(secure) = env(ENV_SECURE_COOKIES) {
            self.secure_cookies = parse_bool(ENV_SECURE_COOKIES, &secure)?;
        }
        self.access_token = self.access_token.filter(|t| !t.is_empty());
        if self.access_token.as_deref().is_some_and(|t| !is_cookie_safe(t)) {
            return Err(ConfigError::InvalidCredential);
        }
        Ok(self)
    }

    /// Session cookie lifetime in seconds
    pub fn session_max_age_secs(&self) -> u64 {
        u64::from(self.session_max_age_days) * 24 * 60 * 60
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        other => Err(ConfigError::ParseError {
            file: None,
            message: format!("{} must be a boolean, got '{}'", key, other),
        }),
    }
}
