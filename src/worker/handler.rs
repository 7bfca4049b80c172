use std::sync::Arc;

use tracing::{Instrument, error, info, info_span, warn};
use uuid::Uuid;

use super::collect::{DEFAULT_FETCH_LIMIT, PostSource, fetch_top_posts};
use super::deliver::{Replier, SentMessage, TextFormat, deliver_chunks};
use super::summarize::Summarizer;
use crate::core::models::ChannelRef;
use crate::errors::BotError;
use crate::telegram::message_formatter::format_analysis;

/// Reply to `/start`.
pub const START_MESSAGE: &str = "🤖 Hi! I'm PostInsight Bot!\n\n\
    I analyse popular posts from Telegram channels with a cloud language model.\n\
    Send me a channel name (for example: @telegram)\n\n\
    📝 Examples:\n\
    @telegram\n\
    @breakingnews\n\
    @habr";

/// Where a request was when it finished or failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestStage {
    Normalizing,
    Fetching,
    Summarizing,
    Formatting,
    Delivering,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestOutcome {
    Delivered {
        posts: usize,
        chunks: usize,
        summary_generated: bool,
    },
    /// The channel yielded nothing; the user got the diagnostic message.
    NoPosts,
    Failed {
        stage: RequestStage,
        error: String,
    },
}

#[must_use]
pub fn processing_message(channel: &ChannelRef) -> String {
    format!("🔍 Analysing channel: {channel}\n🕐 This may take 1-2 minutes...")
}

#[must_use]
pub fn no_posts_message(channel: &ChannelRef) -> String {
    format!(
        "❌ Could not fetch posts from channel {channel}.\n\n\
         Please check:\n\
         • that the channel name is correct\n\
         • that the channel is public\n\
         • that the channel is not blocked"
    )
}

#[must_use]
pub fn progress_message(post_count: usize, model_name: &str) -> String {
    format!(
        "✅ Found {post_count} posts for analysis.\n\
         🧠 Starting analysis with the cloud model ({model_name})..."
    )
}

#[must_use]
pub fn error_message(error: &BotError) -> String {
    format!("❌ An error occurred: {error}")
}

/// Runs fetch → summarize → format → deliver for one inbound message.
///
/// Holds only shared read-only collaborators, so one instance serves all chats concurrently.
pub struct RequestHandler {
    source: Arc<dyn PostSource>,
    summarizer: Arc<dyn Summarizer>,
    fetch_limit: usize,
}

impl RequestHandler {
    #[must_use]
    pub fn new(source: Arc<dyn PostSource>, summarizer: Arc<dyn Summarizer>) -> Self {
        Self {
            source,
            summarizer,
            fetch_limit: DEFAULT_FETCH_LIMIT,
        }
    }

    #[must_use]
    pub fn with_fetch_limit(mut self, fetch_limit: usize) -> Self {
        self.fetch_limit = fetch_limit;
        self
    }

    /// # Errors
    ///
    /// Returns an error if the reply cannot be sent.
    pub async fn handle_start(&self, replier: &dyn Replier) -> Result<(), BotError> {
        replier.reply(START_MESSAGE, TextFormat::Plain).await?;
        Ok(())
    }

    /// Handles free text interpreted as a channel identifier.
    ///
    /// Errors never escape: they are logged and reported to the user, and the returned
    /// [`RequestOutcome`] records the stage that failed.
    pub async fn handle_channel_request(&self, replier: &dyn Replier, input: &str) -> RequestOutcome {
        let correlation_id = Uuid::new_v4();
        let span = info_span!("channel_request", %correlation_id);

        async {
            let mut stage = RequestStage::Normalizing;
            let mut ack: Option<SentMessage> = None;

            match self.process(replier, input, &mut stage, &mut ack).await {
                Ok(outcome) => {
                    info!(outcome = ?outcome, "Channel request finished");
                    outcome
                }
                Err(e) => {
                    error!(stage = ?stage, error = ?e, "Channel request failed: {}", e);
                    report_failure(replier, ack, &e).await;
                    RequestOutcome::Failed {
                        stage,
                        error: e.to_string(),
                    }
                }
            }
        }
        .instrument(span)
        .await
    }

    async fn process(
        &self,
        replier: &dyn Replier,
        input: &str,
        stage: &mut RequestStage,
        ack: &mut Option<SentMessage>,
    ) -> Result<RequestOutcome, BotError> {
        let channel = ChannelRef::parse(input);
        info!(input = %input.trim(), channel = %channel, "Received channel request");

        let sent = replier
            .reply(&processing_message(&channel), TextFormat::Plain)
            .await?;
        *ack = Some(sent);

        *stage = RequestStage::Fetching;
        let posts = fetch_top_posts(self.source.as_ref(), &channel, self.fetch_limit).await;
        if posts.is_empty() {
            warn!(channel = %channel, "No posts available for analysis");
            replier.edit(sent, &no_posts_message(&channel)).await?;
            return Ok(RequestOutcome::NoPosts);
        }

        replier
            .edit(
                sent,
                &progress_message(posts.len(), self.summarizer.model_name()),
            )
            .await?;

        *stage = RequestStage::Summarizing;
        let summary = self.summarizer.summarize(&posts).await;

        *stage = RequestStage::Formatting;
        let chunks = format_analysis(&channel, &posts, &summary.display_text());

        *stage = RequestStage::Delivering;
        let delivered = deliver_chunks(replier, &chunks).await?;

        Ok(RequestOutcome::Delivered {
            posts: posts.len(),
            chunks: delivered,
            summary_generated: summary.is_generated(),
        })
    }
}

/// Shows the failure in the acknowledgment message, or in a new reply when there is none
/// or it can no longer be edited.
async fn report_failure(replier: &dyn Replier, ack: Option<SentMessage>, error: &BotError) {
    let text = error_message(error);

    if let Some(sent) = ack {
        match replier.edit(sent, &text).await {
            Ok(()) => return,
            Err(e) => warn!(error = %e, "Failed to edit acknowledgment with error"),
        }
    }

    if let Err(e) = replier.reply(&text, TextFormat::Plain).await {
        error!(error = %e, "Failed to report error to user");
    }
}
