/// PostInsight - a Telegram bot that analyses the most-reacted posts of a public channel
/// with a cloud language model.
///
/// A user sends the bot a channel name. The bot reads the channel's recent history through an
/// MTProto user session, keeps the posts with the most reactions, asks an OpenAI-compatible
/// completion endpoint for an analysis, and replies with links to the posts followed by the
/// analysis, split into chunks that fit Telegram's message limit.
///
/// # Architecture
///
/// The system uses:
/// - teloxide for the Bot API front end
/// - grammers for reading channel history as a user
/// - reqwest and openai-api-rs types for the completion endpoint
/// - Tokio for async runtime
///
/// # Example
///
/// ```no_run
/// use std::sync::Arc;
/// use postinsight::core::config::AppConfig;
/// use postinsight::telegram::{ChannelClient, run_bot};
/// use postinsight::worker::RequestHandler;
/// use postinsight::worker::summarize::LlmSummarizer;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     postinsight::setup_logging();
///
///     let config = AppConfig::from_env()?;
///     let channels = ChannelClient::from_config(&config);
///     channels.ensure_authorized().await?;
///
///     let handler = RequestHandler::new(
///         Arc::new(channels),
///         Arc::new(LlmSummarizer::from_config(&config)),
///     );
///     run_bot(teloxide::Bot::new(config.bot_token.clone()), Arc::new(handler)).await;
///     Ok(())
/// }
/// ```
// Module declarations
pub mod ai;
pub mod core;
pub mod errors;
pub mod prompt;
pub mod telegram;
pub mod worker;

pub use errors::{BotError, CompletionError};

/// Configure structured logging.
///
/// Installs a JSON formatter filtered by `RUST_LOG` (default `info`). Calling it more than
/// once is harmless; only the first call installs the subscriber.
///
/// # Example
///
/// ```
/// postinsight::setup_logging();
/// ```
pub fn setup_logging() {
    use tracing_subscriber::EnvFilter;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = tracing_subscriber::fmt::layer().json().with_target(true);

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init();
}
