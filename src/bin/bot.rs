// Entry point for the PostInsight Telegram bot

use std::sync::Arc;

use anyhow::{Context, Result};
use postinsight::core::config::AppConfig;
use postinsight::telegram::{ChannelClient, run_bot};
use postinsight::worker::RequestHandler;
use postinsight::worker::summarize::LlmSummarizer;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    postinsight::setup_logging();
    info!("Starting PostInsight bot");

    let config = AppConfig::from_env().map_err(|e| {
        error!("Config error: {}", e);
        e
    })?;
    info!(
        model = %config.cloud_model_name,
        base_url = %config.cloud_api_base_url,
        language = %config.summary_language,
        "Using cloud model"
    );

    let channels = ChannelClient::from_config(&config);
    channels
        .ensure_authorized()
        .await
        .context("Failed to authorize the channel reader session")?;

    let handler = RequestHandler::new(
        Arc::new(channels),
        Arc::new(LlmSummarizer::from_config(&config)),
    );

    let bot = teloxide::Bot::new(config.bot_token.clone());
    info!("Telegram bot is running, press Ctrl+C to stop");
    run_bot(bot, Arc::new(handler)).await;

    info!("PostInsight bot stopped");
    Ok(())
}
