use chrono::{DateTime, Utc};
use url::Url;

use crate::errors::CompletionError;

/// Longest post text kept for analysis, in characters.
pub const POST_TEXT_LIMIT: usize = 500;

pub const TELEGRAM_URL_PREFIX: &str = "https://t.me/";

/// A channel message as the channel source yields it, before filtering and truncation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawPost {
    pub id: i32,
    pub text: String,
    pub reactions: u32,
    pub date: Option<DateTime<Utc>>,
}

/// A text post retained for ranking. The text never exceeds [`POST_TEXT_LIMIT`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Post {
    pub id: i32,
    pub text: String,
    pub reactions: u32,
    pub date: Option<DateTime<Utc>>,
}

impl Post {
    /// Returns `None` for messages without text (media, service messages).
    #[must_use]
    pub fn from_raw(raw: RawPost) -> Option<Self> {
        if raw.text.is_empty() {
            return None;
        }
        Some(Self {
            id: raw.id,
            text: truncate_chars(&raw.text, POST_TEXT_LIMIT).to_string(),
            reactions: raw.reactions,
            date: raw.date,
        })
    }
}

/// Result of asking the completion endpoint for an analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SummaryOutcome {
    Generated(String),
    Failed(CompletionError),
}

impl SummaryOutcome {
    #[must_use]
    pub fn is_generated(&self) -> bool {
        matches!(self, SummaryOutcome::Generated(_))
    }

    /// Text shown to the user in the analysis section. Failures are rendered in place of
    /// the summary; the request still completes.
    #[must_use]
    pub fn display_text(&self) -> String {
        match self {
            SummaryOutcome::Generated(text) => text.clone(),
            SummaryOutcome::Failed(err @ CompletionError::Api { .. }) => {
                format!("❌ API error during analysis: {err}")
            }
            SummaryOutcome::Failed(err) => {
                format!("❌ Error during analysis with the cloud model: {err}")
            }
        }
    }
}

/// A user-supplied channel identifier after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelRef {
    display: String,
}

impl ChannelRef {
    #[must_use]
    pub fn parse(input: &str) -> Self {
        Self {
            display: normalize_channel_input(input),
        }
    }

    /// The identifier as shown to the user: `@name` or a `https://t.me/` URL.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.display
    }

    /// Bare username used to resolve the channel and build post links.
    #[must_use]
    pub fn username(&self) -> String {
        if let Some(name) = self.display.strip_prefix('@') {
            return name.to_string();
        }
        Url::parse(&self.display)
            .ok()
            .and_then(|url| {
                let mut segments = url
                    .path_segments()?
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect::<Vec<_>>();
                // Web preview links look like https://t.me/s/<name>
                if segments.len() > 1 && segments[0] == "s" {
                    segments.remove(0);
                }
                segments.into_iter().next()
            })
            .unwrap_or_else(|| self.display.clone())
    }

    #[must_use]
    pub fn post_link(&self, post_id: i32) -> String {
        format!("{TELEGRAM_URL_PREFIX}{}/{post_id}", self.username())
    }
}

impl std::fmt::Display for ChannelRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display)
    }
}

/// Prefixes `@` unless the input already is a handle or a `https://t.me/` link.
#[must_use]
pub fn normalize_channel_input(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.starts_with('@') || trimmed.starts_with(TELEGRAM_URL_PREFIX) {
        trimmed.to_string()
    } else {
        format!("@{trimmed}")
    }
}

/// Returns the first `max_chars` characters of `text` without splitting a code point.
#[must_use]
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}
