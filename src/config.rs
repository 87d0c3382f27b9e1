use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    #[default]
    Stdout,
    Noop,
    Http,
}

impl std::fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandlerKind::Stdout => write!(f, "stdout"),
            HandlerKind::Noop => write!(f, "noop"),
            HandlerKind::Http => write!(f, "http"),
        }
    }
}

#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Debug,
    #[default]
    Info,
    #[serde(alias = "warn")]
    Warning,
    Error,
}

impl LogLevel {
    /// The directive understood by `tracing_subscriber::EnvFilter`.
    pub fn as_directive(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warning => "warn",
            LogLevel::Error => "error",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "debug"),
            LogLevel::Info => write!(f, "info"),
            LogLevel::Warning => write!(f, "warning"),
            LogLevel::Error => write!(f, "error"),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub telegram: TelegramConfig,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub handler: HandlerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramConfig {
    pub bot_token: String,
    pub webhook_secret: String,
    /// Public URL registered with Telegram by `set-webhook`. Not used by the server.
    #[serde(default)]
    pub webhook_url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u8,
    #[serde(default = "default_drop_pending")]
    pub drop_pending_updates: bool,
}

#[derive(Debug, Deserialize, Clone)]
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

#[derive(Debug, Deserialize, Clone)]
pub struct HandlerConfig {
    #[serde(rename = "type", default)]
    pub kind: HandlerKind,
    #[serde(default = "default_handler_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default)]
    pub http: Option<HttpHandlerConfig>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            kind: HandlerKind::default(),
            timeout_secs: default_handler_timeout_secs(),
            http: None,
        }
    }
}

impl HandlerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct HttpHandlerConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct LoggingConfig {
    #[serde(default)]
    pub level: LogLevel,
}

fn default_max_connections() -> u8 {
    40
}

fn default_drop_pending() -> bool {
    true
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_handler_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Address the webhook server binds to, e.g. `0.0.0.0:8000`.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config = Self::from_toml(&content)?;

        // Secrets may come from the environment instead of the file.
        if let Ok(token) = std::env::var("BOT_TOKEN") {
            config.telegram.bot_token = token;
        }
        if let Ok(secret) = std::env::var("TG_WEBHOOK_SECRET") {
            config.telegram.webhook_secret = secret;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse without touching the environment or validating.
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse config file")
    }

    pub fn validate(&self) -> Result<()> {
        validate_bot_token(&self.telegram.bot_token)?;
        validate_webhook_secret(&self.telegram.webhook_secret)?;

        if !(1..=100).contains(&self.telegram.max_connections) {
            anyhow::bail!("telegram.max_connections must be between 1 and 100");
        }
        if self.handler.timeout_secs == 0 {
            anyhow::bail!("handler.timeout_secs must be greater than zero");
        }
        Ok(())
    }
}

/// Token format: `123456789:AAxxxxxxxx`
fn validate_bot_token(token: &str) -> Result<()> {
    let valid = match token.split_once(':') {
        Some((id, key)) => {
            !id.is_empty()
                && id.chars().all(|c| c.is_ascii_digit())
                && !key.is_empty()
                && key.chars().all(is_token_char)
        }
        None => false,
    };
    if !valid {
        anyhow::bail!("Invalid bot token format. Expected format: 123456789:AAxxxx...");
    }
    Ok(())
}

/// Telegram accepts 1-256 characters from `A-Z a-z 0-9 _ -` as a secret token.
fn validate_webhook_secret(secret: &str) -> Result<()> {
    if secret.is_empty() {
        anyhow::bail!("Webhook secret cannot be empty");
    }
    if secret.len() > 256 {
        anyhow::bail!("Webhook secret must be 256 characters or less");
    }
    if !secret.chars().all(is_token_char) {
        anyhow::bail!("Webhook secret can only contain A-Z, a-z, 0-9, _ and -");
    }
    Ok(())
}

fn is_token_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}
