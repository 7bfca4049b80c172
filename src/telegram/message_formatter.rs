//! Builds the HTML replies for an analysed channel.
//!
//! Telegram rejects messages longer than [`MAX_MESSAGE_LENGTH`] characters, so the result is
//! returned as chunks. Splits happen on line boundaries where possible so that a `<b>` or
//! `<a>` tag is not cut in half.

use crate::core::models::{ChannelRef, Post, truncate_chars};

pub const MAX_MESSAGE_LENGTH: usize = 4096;

/// Characters of post text shown next to each link.
pub const PREVIEW_LENGTH: usize = 200;

const ELLIPSIS: &str = "...";

/// Byte length of the longest entity [`escape_html`] emits.
const LONGEST_ENTITY: usize = "&amp;".len();

/// Escapes the three characters Telegram's HTML parse mode treats as markup.
#[must_use]
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '&' => out.push_str("&amp;"),
            other => out.push(other),
        }
    }
    out
}

/// First [`PREVIEW_LENGTH`] characters on a single line, with `...` when the text was cut.
#[must_use]
pub fn preview_text(text: &str) -> String {
    let mut preview = truncate_chars(text, PREVIEW_LENGTH).replace('\n', " ");
    if text.chars().count() > PREVIEW_LENGTH {
        preview.push_str(ELLIPSIS);
    }
    preview
}

#[must_use]
pub fn format_header(channel: &ChannelRef, post_count: usize) -> String {
    format!(
        "📊 <b>Channel analysis {}</b>\n\n📈 <b>Top {post_count} posts by reactions:</b>\n",
        escape_html(channel.as_str())
    )
}

#[must_use]
pub fn format_post_line(rank: usize, channel: &ChannelRef, post: &Post) -> String {
    format!(
        "{rank}. <a href='{}'>Reactions: {}</a> - {}\n",
        channel.post_link(post.id),
        post.reactions,
        escape_html(&preview_text(&post.text))
    )
}

#[must_use]
pub fn format_analysis_section(post_count: usize, summary: &str) -> String {
    format!(
        "\n🧠 <b>Overall analysis of {post_count} posts:</b>\n{}",
        escape_html(summary)
    )
}

/// Splits `text` into pieces of at most `limit` characters.
///
/// Each cut is made at the last newline before the limit; the newline starts the next piece,
/// so concatenating the pieces yields `text` again. Without a usable newline the text is cut
/// at exactly `limit` characters.
#[must_use]
pub fn split_message(text: &str, limit: usize) -> Vec<String> {
    let limit = limit.max(1);
    let mut chunks = Vec::new();
    let mut rest = text;

    while rest.chars().count() > limit {
        let hard_cut = rest
            .char_indices()
            .nth(limit)
            .map_or(rest.len(), |(idx, _)| idx);
        // A newline at index 0 would produce an empty chunk and never advance.
        let split_at = match rest[..hard_cut].rfind('\n') {
            Some(idx) if idx > 0 => idx,
            _ => entity_safe_cut(rest, hard_cut),
        };
        chunks.push(rest[..split_at].to_string());
        rest = &rest[split_at..];
    }

    if !rest.is_empty() {
        chunks.push(rest.to_string());
    }
    chunks
}

/// Moves a hard cut back to the start of an entity (`&amp;`) it would otherwise split.
fn entity_safe_cut(text: &str, cut: usize) -> usize {
    let head = &text[..cut];
    match head.rfind('&') {
        Some(amp)
            if amp > 0
                && cut - amp < LONGEST_ENTITY
                && !head[amp..].contains(';')
                && text[amp..].find(';').is_some_and(|end| end < LONGEST_ENTITY) =>
        {
            amp
        }
        _ => cut,
    }
}

/// Renders the ranked posts and the analysis as one or more HTML messages.
///
/// Everything goes into a single message when it fits. Otherwise the post list and the
/// analysis are sent as separate sections, each split further if needed.
#[must_use]
pub fn format_analysis(channel: &ChannelRef, posts: &[Post], summary: &str) -> Vec<String> {
    let header = format_header(channel, posts.len());
    let list: String = posts
        .iter()
        .enumerate()
        .map(|(i, post)| format_post_line(i + 1, channel, post))
        .collect();
    let analysis = format_analysis_section(posts.len(), summary);

    let full = format!("{header}{list}{analysis}");
    if full.chars().count() <= MAX_MESSAGE_LENGTH {
        return vec![full];
    }

    let mut chunks = split_message(&format!("{header}{list}"), MAX_MESSAGE_LENGTH);
    chunks.extend(split_message(&analysis, MAX_MESSAGE_LENGTH));
    chunks
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_html("plain"), "plain");
    }

    #[test]
    fn test_preview_short_text_unchanged() {
        assert_eq!(preview_text("line one\nline two"), "line one line two");
    }

    #[test]
    fn test_preview_long_text_truncated_with_ellipsis() {
        let text = "x".repeat(PREVIEW_LENGTH + 1);
        let preview = preview_text(&text);
        assert!(preview.ends_with(ELLIPSIS));
        assert_eq!(preview.chars().count(), PREVIEW_LENGTH + ELLIPSIS.len());

        let exact = "y".repeat(PREVIEW_LENGTH);
        assert_eq!(preview_text(&exact), exact);
    }

    #[test]
    fn test_split_prefers_newlines() {
        let text = "aaaa\nbbbb\ncccc";
        let chunks = split_message(text, 7);
        assert_eq!(chunks, vec!["aaaa", "\nbbbb", "\ncccc"]);
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_hard_cut_without_newline() {
        let text = "abcdefghij";
        let chunks = split_message(text, 4);
        assert_eq!(chunks, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_split_hard_cut_keeps_entities_whole() {
        let text = escape_html(&"&".repeat(20));
        let chunks = split_message(&text, 12);
        assert_eq!(chunks[0], "&amp;&amp;");
        assert!(chunks.iter().all(|c| c.starts_with("&amp;") && c.ends_with(';')));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_hard_cut_outside_entity_unchanged() {
        let chunks = split_message("ab&amp;cdefgh", 9);
        assert_eq!(chunks, vec!["ab&amp;cd", "efgh"]);
    }

    #[test]
    fn test_split_leading_newline_still_progresses() {
        let text = format!("\n{}", "z".repeat(10));
        let chunks = split_message(&text, 5);
        assert!(chunks.iter().all(|c| c.chars().count() <= 5));
        assert_eq!(chunks.concat(), text);
    }

    #[test]
    fn test_split_counts_characters_not_bytes() {
        let text = "я".repeat(10);
        let chunks = split_message(&text, 4);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].chars().count(), 4);
    }

    #[test]
    fn test_split_short_text_single_chunk() {
        assert_eq!(split_message("hi", 4096), vec!["hi"]);
        assert!(split_message("", 4096).is_empty());
    }
}
