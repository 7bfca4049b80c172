use crate::core::models::Post;

/// Questions the model answers about the selected posts, in order.
pub const ANALYSIS_QUESTIONS: [&str; 3] = [
    "What are these posts about overall?",
    "What are the main themes and ideas?",
    "What is the overall tone and mood?",
];

/// Joins posts into the block the model reads: `Post N (reactions: R):` followed by the text.
#[must_use]
pub fn combine_posts(posts: &[Post]) -> String {
    posts
        .iter()
        .enumerate()
        .map(|(i, post)| {
            format!(
                "Post {} (reactions: {}):\n{}",
                i + 1,
                post.reactions,
                sanitize_post_text(&post.text)
            )
        })
        .collect::<Vec<_>>()
        .join("\n\n")
}

/// Builds the single user message sent to the completion endpoint.
#[must_use]
pub fn build_analysis_prompt(posts: &[Post], language: &str) -> String {
    let questions = ANALYSIS_QUESTIONS
        .iter()
        .enumerate()
        .map(|(i, q)| format!("{}. {q}", i + 1))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "Analyze the following {count} popular posts from a Telegram channel.\n\
         Answer in {language}, briefly and to the point:\n\n\
         {questions}\n\n\
         {combined}",
        count = posts.len(),
        combined = combine_posts(posts),
    )
}

/// Remove control characters except line breaks and tabs
pub fn sanitize_post_text(raw: &str) -> String {
    raw.chars()
        .filter(|&c| c == '\n' || c == '\t' || !c.is_control())
        .collect()
}
