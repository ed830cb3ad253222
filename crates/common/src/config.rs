use serde::Deserialize;

/// Default Telegram Bot API origin.
pub const DEFAULT_TELEGRAM_API_URL: &str = "https://api.telegram.org";

/// Origin used to resolve relative product image paths when `BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Settings for order notification delivery.
///
/// Loaded once at startup and handed to the dispatcher; never re-read afterwards.
#[derive(Debug, Clone, Deserialize)]
pub struct NotifierConfig {
    /// Telegram bot token (sending is disabled when absent)
    pub telegram_bot_token: Option<String>,

    /// Destination chat or group id (sending is disabled when absent)
    pub telegram_chat_id: Option<String>,

    /// Bot API origin, overridable for a self-hosted Bot API server
    pub telegram_api_url: String,

    /// Public storefront origin, without trailing slash
    pub base_url: String,

    /// Per-request timeout for outbound provider calls (default: 10)
    pub request_timeout_secs: u64,

    /// Pause between successive product image sends (default: 300)
    pub image_send_delay_ms: u64,
}

impl NotifierConfig {
    /// Load notifier settings from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            telegram_bot_token: non_empty_var("TELEGRAM_BOT_TOKEN"),
            telegram_chat_id: non_empty_var("TELEGRAM_CHAT_ID"),
            telegram_api_url: non_empty_var("TELEGRAM_API_URL")
                .unwrap_or_else(|| DEFAULT_TELEGRAM_API_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            base_url: non_empty_var("BASE_URL")
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            request_timeout_secs: parse_timeout_secs(
                &std::env::var("NOTIFY_TIMEOUT_SECS").unwrap_or_else(|_| "10".to_string()),
            )?,
            image_send_delay_ms: std::env::var("NOTIFY_IMAGE_DELAY_MS")
                .unwrap_or_else(|_| "300".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("NOTIFY_IMAGE_DELAY_MS must be a valid u64"))?,
        })
    }

    /// Both the bot token and the chat id are present.
    pub fn is_enabled(&self) -> bool {
        self.telegram_bot_token.is_some() && self.telegram_chat_id.is_some()
    }
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            telegram_bot_token: None,
            telegram_chat_id: None,
            telegram_api_url: DEFAULT_TELEGRAM_API_URL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            request_timeout_secs: 10,
            image_send_delay_ms: 300,
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// HTTP listen port (default: 3000)
    pub port: u16,

    /// Maximum number of PostgreSQL connections in the pool (default: 20)
    pub db_max_connections: u32,

    /// Order notification settings
    pub notifier: NotifierConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid u16"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "20".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
            notifier: NotifierConfig::from_env()?,
        })
    }
}

/// Read an env var, treating an empty value the same as an unset one.
fn non_empty_var(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Parse `NOTIFY_TIMEOUT_SECS`; a zero timeout is rejected.
fn parse_timeout_secs(raw: &str) -> anyhow::Result<u64> {
    let secs: u64 = raw
        .trim()
        .parse()
        .map_err(|_| anyhow::anyhow!("NOTIFY_TIMEOUT_SECS must be a valid u64"))?;
    if secs == 0 {
        anyhow::bail!("NOTIFY_TIMEOUT_SECS must be a positive number of seconds");
    }
    Ok(secs)
}
