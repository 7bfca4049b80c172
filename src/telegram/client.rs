//! MTProto user client for reading channel history.
//!
//! Every fetch opens its own connection through [`ChannelClient::open_session`]. The returned
//! [`ChannelSession`] owns the connection and releases it when dropped, so early returns and
//! errors never leave a connection behind.

use std::path::PathBuf;

use async_trait::async_trait;
use grammers_client::types::Message;
use grammers_client::{Client, Config, InitParams, SignInError};
use grammers_session::Session;
use grammers_tl_types as tl;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::core::config::AppConfig;
use crate::core::models::{ChannelRef, RawPost};
use crate::errors::BotError;
use crate::worker::collect::PostSource;

/// Adds up per-emoji reaction counts. Negative counts are treated as zero.
#[must_use]
pub fn sum_reaction_counts<I>(counts: I) -> u32
where
    I: IntoIterator<Item = i32>,
{
    counts
        .into_iter()
        .map(|c| u32::try_from(c).unwrap_or(0))
        .fold(0u32, u32::saturating_add)
}

fn total_reactions(message: &Message) -> u32 {
    let Some(reactions) = message.raw.reactions.clone() else {
        return 0;
    };
    let reactions: tl::types::MessageReactions = reactions.into();
    sum_reaction_counts(reactions.results.into_iter().map(|result| {
        let result: tl::types::ReactionCount = result.into();
        result.count
    }))
}

/// Connection settings for the channel-reading user account.
#[derive(Debug, Clone)]
pub struct ChannelClient {
    api_id: i32,
    api_hash: String,
    phone: String,
    session_file: PathBuf,
}

impl ChannelClient {
    #[must_use]
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api_id: config.telegram_api_id,
            api_hash: config.telegram_api_hash.clone(),
            phone: config.telegram_phone.clone(),
            session_file: config.telegram_session_file.clone(),
        }
    }

    /// Connects using the stored session file, creating it when missing.
    ///
    /// # Errors
    ///
    /// Returns an error if the session file cannot be read or the connection fails.
    pub async fn open_session(&self) -> Result<ChannelSession, BotError> {
        let session = Session::load_file_or_create(&self.session_file)?;
        let client = Client::connect(Config {
            session,
            api_id: self.api_id,
            api_hash: self.api_hash.clone(),
            params: InitParams::default(),
        })
        .await
        .map_err(|e| BotError::ChannelError(format!("Failed to connect to Telegram: {e}")))?;

        debug!(session_file = %self.session_file.display(), "Channel session opened");
        Ok(ChannelSession {
            client,
            session_file: self.session_file.clone(),
        })
    }

    /// Makes sure the stored session is logged in, asking for the login code (and the
    /// two-factor password when enabled) on the terminal if it is not.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection, the login or saving the session fails.
    pub async fn ensure_authorized(&self) -> Result<(), BotError> {
        let session = self.open_session().await?;
        if session.is_authorized().await? {
            info!("Channel reader session already authorized");
            return Ok(());
        }

        info!(phone = %self.phone, "Channel reader session not authorized, signing in");
        session.sign_in_interactive(&self.phone).await?;
        session.save()?;
        info!("Channel reader signed in");
        Ok(())
    }
}

#[async_trait]
impl PostSource for ChannelClient {
    async fn recent_posts(
        &self,
        channel: &ChannelRef,
        limit: usize,
    ) -> Result<Vec<RawPost>, BotError> {
        let session = self.open_session().await?;
        if !session.is_authorized().await? {
            return Err(BotError::ChannelError(
                "channel reader session is not authorized".to_string(),
            ));
        }
        session.recent_posts(&channel.username(), limit).await
    }
}

/// A live MTProto connection, closed when dropped.
pub struct ChannelSession {
    client: Client,
    session_file: PathBuf,
}

impl ChannelSession {
    async fn is_authorized(&self) -> Result<bool, BotError> {
        self.client
            .is_authorized()
            .await
            .map_err(|e| BotError::ChannelError(format!("Failed to check authorization: {e}")))
    }

    /// Reads up to `limit` of the newest messages of the channel named `username`.
    ///
    /// # Errors
    ///
    /// Returns an error if the channel cannot be resolved or its history cannot be read.
    pub async fn recent_posts(
        &self,
        username: &str,
        limit: usize,
    ) -> Result<Vec<RawPost>, BotError> {
        let chat = self
            .client
            .resolve_username(username)
            .await
            .map_err(|e| BotError::ChannelError(format!("Failed to resolve @{username}: {e}")))?
            .ok_or_else(|| BotError::ChannelError(format!("Channel @{username} not found")))?;

        let mut messages = self.client.iter_messages(chat.pack()).limit(limit);
        let mut posts = Vec::new();
        while let Some(message) = messages.next().await.map_err(|e| {
            BotError::ChannelError(format!("Failed to read history of @{username}: {e}"))
        })? {
            posts.push(RawPost {
                id: message.id(),
                text: message.text().to_string(),
                reactions: total_reactions(&message),
                date: Some(message.date()),
            });
        }

        debug!(username, messages = posts.len(), "Read channel history");
        Ok(posts)
    }

    async fn sign_in_interactive(&self, phone: &str) -> Result<(), BotError> {
        let token = self
            .client
            .request_login_code(phone)
            .await
            .map_err(|e| BotError::ChannelError(format!("Failed to request login code: {e}")))?;
        let code = prompt_line("Enter the login code Telegram sent you: ").await?;

        match self.client.sign_in(&token, &code).await {
            Ok(_) => Ok(()),
            Err(SignInError::PasswordRequired(password_token)) => {
                let password = prompt_line("Enter the two-step verification password: ").await?;
                self.client
                    .check_password(password_token, password.as_bytes())
                    .await
                    .map_err(|e| BotError::ChannelError(format!("Password check failed: {e}")))?;
                Ok(())
            }
            Err(e) => Err(BotError::ChannelError(format!("Sign in failed: {e}"))),
        }
    }

    fn save(&self) -> Result<(), BotError> {
        self.client.session().save_to_file(&self.session_file)?;
        Ok(())
    }
}

impl Drop for ChannelSession {
    fn drop(&mut self) {
        // Persist the auth key and datacenter the server may have moved us to.
        if let Err(e) = self.save() {
            warn!(error = %e, "Failed to save channel session");
        }
        debug!("Channel session released");
    }
}

async fn prompt_line(prompt: &str) -> Result<String, BotError> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(prompt.as_bytes()).await?;
    stdout.flush().await?;

    let mut line = String::new();
    BufReader::new(tokio::io::stdin())
        .read_line(&mut line)
        .await?;
    Ok(line.trim().to_string())
}
