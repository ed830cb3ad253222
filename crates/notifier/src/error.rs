use thiserror::Error;

/// Errors raised while rendering or delivering an order notification.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The order could not be rendered (undecodable items, empty message).
    #[error("Format error: {0}")]
    Format(String),

    /// DNS, connect, timeout, or an unreadable response body.
    ///
    /// The request URL is stripped before wrapping since it embeds the bot token.
    #[error("Transport error: {0}")]
    Transport(#[source] reqwest::Error),

    /// The provider answered with `ok: false`.
    #[error("Provider error: {description}")]
    Provider { description: String },

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, NotifyError>;

impl From<reqwest::Error> for NotifyError {
    fn from(err: reqwest::Error) -> Self {
        NotifyError::Transport(err.without_url())
    }
}
