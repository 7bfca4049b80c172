use std::sync::Arc;

use async_trait::async_trait;
use teloxide::payloads::SendMessageSetters;
use teloxide::prelude::*;
use teloxide::types::{ChatId, MessageId, ParseMode};
use tracing::{error, info};

use crate::errors::BotError;
use crate::worker::RequestHandler;
use crate::worker::deliver::{Replier, SentMessage, TextFormat};

/// Replies into the chat an inbound message came from.
pub struct TelegramReplier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramReplier {
    #[must_use]
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl Replier for TelegramReplier {
    async fn reply(&self, text: &str, format: TextFormat) -> Result<SentMessage, BotError> {
        let request = self.bot.send_message(self.chat_id, text);
        let sent = match format {
            TextFormat::Plain => request.await?,
            TextFormat::Html => request.parse_mode(ParseMode::Html).await?,
        };
        Ok(SentMessage(sent.id.0))
    }

    async fn edit(&self, message: SentMessage, text: &str) -> Result<(), BotError> {
        self.bot
            .edit_message_text(self.chat_id, MessageId(message.0), text)
            .await?;
        Ok(())
    }
}

/// What an inbound text asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inbound<'a> {
    Start,
    /// Any other bot command; ignored.
    OtherCommand,
    ChannelRequest(&'a str),
}

/// Classifies inbound text. `/start` may carry a bot mention (`/start@my_bot`) and arguments.
#[must_use]
pub fn classify_text(text: &str) -> Inbound<'_> {
    let trimmed = text.trim();
    match trimmed.strip_prefix('/') {
        Some(rest) => {
            let command = rest
                .split_whitespace()
                .next()
                .unwrap_or("")
                .split('@')
                .next()
                .unwrap_or("");
            if command.eq_ignore_ascii_case("start") {
                Inbound::Start
            } else {
                Inbound::OtherCommand
            }
        }
        None => Inbound::ChannelRequest(trimmed),
    }
}

/// Long-polls the Bot API until interrupted. Each text message is handled on its own task.
pub async fn run_bot(bot: Bot, handler: Arc<RequestHandler>) {
    if let Ok(me) = bot.get_me().await {
        if let Some(username) = &me.user.username {
            info!(username = %username, "Bot identity resolved");
        }
    }

    teloxide::repl(bot, move |bot: Bot, msg: Message| {
        let handler = handler.clone();
        async move {
            let Some(text) = msg.text().map(str::to_string) else {
                return Ok(());
            };
            let user_id = msg.from.as_ref().map_or(0, |u| u.id.0);
            let chat_id = msg.chat.id;
            info!(
                user_id = user_id,
                chat_id = chat_id.0,
                message_content = %text,
                "Received message"
            );

            tokio::spawn(async move {
                let replier = TelegramReplier::new(bot, chat_id);
                match classify_text(&text) {
                    Inbound::Start => {
                        if let Err(e) = handler.handle_start(&replier).await {
                            error!(error = %e, chat_id = chat_id.0, "Failed to send start message");
                        }
                    }
                    Inbound::OtherCommand => {}
                    Inbound::ChannelRequest(input) => {
                        handler.handle_channel_request(&replier, input).await;
                    }
                }
            });

            Ok(())
        }
    })
    .await;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_start_variants() {
        assert_eq!(classify_text("/start"), Inbound::Start);
        assert_eq!(classify_text("/start@postinsight_bot"), Inbound::Start);
        assert_eq!(classify_text("/start hello"), Inbound::Start);
    }

    #[test]
    fn test_classify_other_commands_ignored() {
        assert_eq!(classify_text("/help"), Inbound::OtherCommand);
        assert_eq!(classify_text("/"), Inbound::OtherCommand);
    }

    #[test]
    fn test_classify_channel_request_trimmed() {
        assert_eq!(classify_text("  @habr \n"), Inbound::ChannelRequest("@habr"));
        assert_eq!(
            classify_text("https://t.me/foo"),
            Inbound::ChannelRequest("https://t.me/foo")
        );
    }
}
