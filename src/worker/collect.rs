use async_trait::async_trait;
use tracing::{error, info};

use crate::core::models::{ChannelRef, Post, RawPost};
use crate::errors::BotError;

/// How many recent messages are scanned per request.
pub const DEFAULT_FETCH_LIMIT: usize = 50;

/// How many posts survive ranking.
pub const TOP_POSTS: usize = 15;

/// Anything that can list the most recent messages of a channel.
#[async_trait]
pub trait PostSource: Send + Sync {
    /// Returns up to `limit` of the newest messages, newest first.
    async fn recent_posts(
        &self,
        channel: &ChannelRef,
        limit: usize,
    ) -> Result<Vec<RawPost>, BotError>;
}

/// Keeps text posts, orders them by reactions (descending, ties keep source order) and
/// returns the first [`TOP_POSTS`].
#[must_use]
pub fn rank_top_posts(raw_posts: Vec<RawPost>) -> Vec<Post> {
    let mut posts: Vec<Post> = raw_posts.into_iter().filter_map(Post::from_raw).collect();
    posts.sort_by(|a, b| b.reactions.cmp(&a.reactions));
    posts.truncate(TOP_POSTS);
    posts
}

/// Fetch recent messages from a channel and rank them by engagement.
///
/// Failures are logged and reported as an empty list; callers treat empty as "could not
/// fetch".
pub async fn fetch_top_posts(
    source: &dyn PostSource,
    channel: &ChannelRef,
    limit: usize,
) -> Vec<Post> {
    info!(channel = %channel, limit, "Fetching posts from channel");

    match source.recent_posts(channel, limit).await {
        Ok(raw_posts) => {
            let scanned = raw_posts.len();
            let top = rank_top_posts(raw_posts);
            info!(
                channel = %channel,
                scanned,
                selected = top.len(),
                "Ranked posts for analysis"
            );
            top
        }
        Err(e) => {
            error!(channel = %channel, error = ?e, "Failed to fetch channel posts: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(id: i32, text: &str, reactions: u32) -> RawPost {
        RawPost {
            id,
            text: text.to_string(),
            reactions,
            date: None,
        }
    }

    #[test]
    fn test_rank_orders_by_reactions_desc() {
        let ranked = rank_top_posts(vec![raw(1, "a", 10), raw(2, "b", 50), raw(3, "c", 5)]);
        let reactions: Vec<u32> = ranked.iter().map(|p| p.reactions).collect();
        assert_eq!(reactions, vec![50, 10, 5]);
        assert_eq!(ranked[0].id, 2);
    }

    #[test]
    fn test_rank_truncates_to_top_posts() {
        let posts = (0..40).map(|i| raw(i, "text", i as u32 * 3)).collect();
        let ranked = rank_top_posts(posts);
        assert_eq!(ranked.len(), TOP_POSTS);
        assert!(ranked.windows(2).all(|w| w[0].reactions > w[1].reactions));
        assert_eq!(ranked[0].reactions, 39 * 3);
    }

    #[test]
    fn test_rank_skips_posts_without_text() {
        let ranked = rank_top_posts(vec![raw(1, "", 100), raw(2, "kept", 1)]);
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].id, 2);
    }

    #[test]
    fn test_rank_ties_keep_source_order() {
        let ranked = rank_top_posts(vec![raw(9, "newer", 7), raw(8, "older", 7)]);
        assert_eq!(ranked.iter().map(|p| p.id).collect::<Vec<_>>(), vec![9, 8]);
    }
}
