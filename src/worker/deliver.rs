use async_trait::async_trait;
use tracing::info;

use crate::errors::BotError;

/// How the chat should render a reply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextFormat {
    Plain,
    /// Telegram's HTML subset (`<b>`, `<a href>`).
    Html,
}

/// Identifies a reply that was already sent so it can be edited later.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SentMessage(pub i32);

/// The conversation a request came from.
#[async_trait]
pub trait Replier: Send + Sync {
    async fn reply(&self, text: &str, format: TextFormat) -> Result<SentMessage, BotError>;

    /// Replaces the text of an earlier plain reply.
    async fn edit(&self, message: SentMessage, text: &str) -> Result<(), BotError>;
}

/// Sends every chunk as its own HTML reply, in order. Stops at the first failure.
pub async fn deliver_chunks(replier: &dyn Replier, chunks: &[String]) -> Result<usize, BotError> {
    for (i, chunk) in chunks.iter().enumerate() {
        replier.reply(chunk, TextFormat::Html).await?;
        info!(
            chunk = i + 1,
            total = chunks.len(),
            chars = chunk.chars().count(),
            "Delivered result chunk"
        );
    }
    Ok(chunks.len())
}
