//! Configuration types for the alarm relay

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use tracing::Level;

/// Main configuration structure
#[derive(Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub authorization: AuthorizationConfig,
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default)]
    pub mode: RuntimeMode,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            telegram: TelegramConfig::default(),
            authorization: AuthorizationConfig::default(),
            request_timeout_seconds: default_request_timeout(),
            mode: RuntimeMode::default(),
        }
    }
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("server", &self.server)
            .field("telegram", &self.telegram)
            .field("authorization", &self.authorization)
            .field("request_timeout_seconds", &self.request_timeout_seconds)
            .field("mode", &self.mode)
            .finish()
    }
}

/// Inbound HTTP listener
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Telegram Bot API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct TelegramConfig {
    #[serde(default)]
    pub bot_token: String,
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
    #[serde(default = "default_parse_mode")]
    pub parse_mode: String,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_telegram_api_base(),
            parse_mode: default_parse_mode(),
        }
    }
}

impl std::fmt::Debug for TelegramConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TelegramConfig")
            .field("api_base", &self.api_base)
            .field("parse_mode", &self.parse_mode)
            .finish_non_exhaustive()
    }
}

/// Tenant authorization API settings
#[derive(Clone, Serialize, Deserialize)]
pub struct AuthorizationConfig {
    #[serde(default)]
    pub base_url: String,
    #[serde(default)]
    pub port: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default = "default_tenant")]
    pub tenant: String,
    #[serde(default = "default_probe_username")]
    pub username: String,
    #[serde(default = "default_probe_address")]
    pub probe_address: String,
    #[serde(default = "default_probe_type")]
    pub probe_type: u8,
    /// Token the API must echo back in `param.token`
    #[serde(default)]
    pub shared_secret: String,
    #[serde(default)]
    pub auth_code: String,
    #[serde(default)]
    pub auth_token: String,
}

impl Default for AuthorizationConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            port: String::new(),
            domain: String::new(),
            tenant: default_tenant(),
            username: default_probe_username(),
            probe_address: default_probe_address(),
            probe_type: default_probe_type(),
            shared_secret: String::new(),
            auth_code: String::new(),
            auth_token: String::new(),
        }
    }
}

impl std::fmt::Debug for AuthorizationConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthorizationConfig")
            .field("url", &self.url())
            .field("tenant", &self.tenant)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl AuthorizationConfig {
    /// Endpoint of the validation API, `{base_url}:{port}/{domain}`
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        let domain = self.domain.trim_start_matches('/');
        if self.port.is_empty() {
            format!("{}/{}", base, domain)
        } else {
            format!("{}:{}/{}", base, self.port, domain)
        }
    }
}

/// Runtime mode, selects the default log verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuntimeMode {
    #[default]
    Production,
    Development,
}

impl RuntimeMode {
    pub fn default_log_level(self) -> Level {
        match self {
            RuntimeMode::Production => Level::INFO,
            RuntimeMode::Development => Level::DEBUG,
        }
    }
}

impl std::str::FromStr for RuntimeMode {
    type Err = crate::RelayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(RuntimeMode::Production),
            "development" | "dev" | "debug" => Ok(RuntimeMode::Development),
            other => Err(crate::RelayError::Config(format!(
                "Unknown runtime mode '{}'",
                other
            ))),
        }
    }
}

impl Config {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// Fill secrets and endpoints from the process environment
    pub fn resolve_secrets(&mut self) -> crate::Result<()> {
        self.resolve_secrets_with(|key| std::env::var(key).ok())
    }

    /// Fill secrets from `lookup`; non-empty values override the file
    pub fn resolve_secrets_with<F>(&mut self, lookup: F) -> crate::Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        if let Some(v) = get("TELEGRAM_TOKEN") {
            self.telegram.bot_token = v;
        }
        if let Some(v) = get("IP_TOKEN") {
            self.authorization.shared_secret = v;
        }
        if let Some(v) = get("DEFAULT_IP") {
            self.authorization.base_url = v;
        }
        if let Some(v) = get("DEFAULT_PORT") {
            self.authorization.port = v;
        }
        if let Some(v) = get("REST_DOMAIN") {
            self.authorization.domain = v;
        }
        if let Some(v) = get("AUTH_CODE") {
            self.authorization.auth_code = v;
        }
        if let Some(v) = get("AUTH_TOKEN") {
            self.authorization.auth_token = v;
        }
        if let Some(v) = get("RELAY_MODE") {
            self.mode = v.parse()?;
        }

        self.check()
    }

    fn check(&self) -> crate::Result<()> {
        let required = [
            ("TELEGRAM_TOKEN", &self.telegram.bot_token),
            ("IP_TOKEN", &self.authorization.shared_secret),
            ("DEFAULT_IP", &self.authorization.base_url),
        ];
        for (name, value) in required {
            if value.is_empty() {
                return Err(crate::RelayError::Config(format!(
                    "{} is not set",
                    name
                )));
            }
        }
        if self.request_timeout_seconds == 0 {
            return Err(crate::RelayError::Config(
                "request_timeout_seconds must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    5000
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

fn default_parse_mode() -> String {
    "MarkdownV2".to_string()
}

fn default_tenant() -> String {
    "alif".to_string()
}

fn default_probe_username() -> String {
    "test1".to_string()
}

fn default_probe_address() -> String {
    "172.0.0.1".to_string()
}

fn default_probe_type() -> u8 {
    1
}

fn default_request_timeout() -> u64 {
    5
}

/// Load configuration from a JSON file
pub fn load_config(path: &Path) -> crate::Result<Config> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        crate::RelayError::Config(format!("Failed to read config file {:?}: {}", path, e))
    })?;
    let config: Config = serde_json::from_str(&content)?;
    Ok(config)
}
