use thiserror::Error;

#[derive(Debug, Error)]
pub enum BotError {
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    #[error("Failed to access Telegram Bot API: {0}")]
    BotApiError(String),

    #[error("Failed to read channel: {0}")]
    ChannelError(String),

    #[error("Failed to access completion API: {0}")]
    CompletionError(String),

    #[error("Failed to send HTTP request: {0}")]
    HttpError(String),

    #[error("I/O error: {0}")]
    IoError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl From<reqwest::Error> for BotError {
    fn from(error: reqwest::Error) -> Self {
        BotError::HttpError(error.to_string())
    }
}

impl From<teloxide::RequestError> for BotError {
    fn from(error: teloxide::RequestError) -> Self {
        BotError::BotApiError(error.to_string())
    }
}

impl From<std::io::Error> for BotError {
    fn from(error: std::io::Error) -> Self {
        BotError::IoError(error.to_string())
    }
}

impl From<anyhow::Error> for BotError {
    fn from(error: anyhow::Error) -> Self {
        BotError::InternalError(format!("{error:#}"))
    }
}

impl From<CompletionError> for BotError {
    fn from(error: CompletionError) -> Self {
        BotError::CompletionError(error.to_string())
    }
}

/// Why a completion request produced no summary.
///
/// Carried inside [`crate::core::models::SummaryOutcome::Failed`] so callers can branch on the
/// kind of failure instead of inspecting strings.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompletionError {
    /// The endpoint answered with a non-success status.
    #[error("{message} (code: {code})")]
    Api { code: String, message: String },

    /// The request never produced a usable response (connection, TLS, body decoding).
    #[error("{0}")]
    Transport(String),

    #[error("the model returned no text")]
    EmptyResponse,
}

impl CompletionError {
    #[must_use]
    pub fn is_api(&self) -> bool {
        matches!(self, CompletionError::Api { .. })
    }
}
