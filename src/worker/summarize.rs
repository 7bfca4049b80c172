use async_trait::async_trait;
use tracing::{error, info};

use crate::ai::LlmClient;
use crate::core::config::AppConfig;
use crate::core::models::{Post, SummaryOutcome};
use crate::prompt::build_analysis_prompt;

/// Produces an analysis of ranked posts. Never fails outright: problems are reported as
/// [`SummaryOutcome::Failed`].
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, posts: &[Post]) -> SummaryOutcome;

    /// Shown to the user while the analysis runs.
    fn model_name(&self) -> &str;
}

/// Summarizer backed by the completion endpoint.
pub struct LlmSummarizer {
    client: LlmClient,
    language: String,
}

impl LlmSummarizer {
    #[must_use]
    pub fn new(client: LlmClient, language: String) -> Self {
        Self { client, language }
    }

    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            LlmClient::from_config(config),
            config.summary_language.clone(),
        )
    }
}

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(&self, posts: &[Post]) -> SummaryOutcome {
        let prompt = build_analysis_prompt(posts, &self.language);

        match self.client.complete(&prompt).await {
            Ok(text) => {
                info!(posts = posts.len(), "Analysis generated");
                SummaryOutcome::Generated(text)
            }
            Err(e) => {
                error!(error = ?e, api_error = e.is_api(), "Analysis failed: {}", e);
                SummaryOutcome::Failed(e)
            }
        }
    }

    fn model_name(&self) -> &str {
        self.client.model_name()
    }
}
