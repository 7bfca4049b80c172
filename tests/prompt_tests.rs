use postinsight::core::models::Post;
use postinsight::prompt::{ANALYSIS_QUESTIONS, build_analysis_prompt, combine_posts, sanitize_post_text};

fn post(id: i32, text: &str, reactions: u32) -> Post {
    Post {
        id,
        text: text.to_string(),
        reactions,
        date: None,
    }
}

#[test]
fn test_combine_posts_numbering_and_reactions() {
    let posts = vec![post(10, "first post", 50), post(11, "second post", 7)];
    let combined = combine_posts(&posts);
    assert_eq!(
        combined,
        "Post 1 (reactions: 50):\nfirst post\n\nPost 2 (reactions: 7):\nsecond post"
    );
}

#[test]
fn test_prompt_contains_questions_language_and_posts() {
    let posts = vec![post(1, "Rust 2024 edition is out", 120)];
    let prompt = build_analysis_prompt(&posts, "Russian");

    for question in ANALYSIS_QUESTIONS {
        assert!(prompt.contains(question), "Prompt should ask: {question}");
    }
    assert!(prompt.contains("Answer in Russian"));
    assert!(prompt.contains("following 1 popular posts"));
    assert!(prompt.contains("Post 1 (reactions: 120):\nRust 2024 edition is out"));

    // Questions come before the posts
    let question_pos = prompt.find(ANALYSIS_QUESTIONS[2]).unwrap();
    let post_pos = prompt.find("Post 1 (reactions").unwrap();
    assert!(question_pos < post_pos);
}

#[test]
fn test_sanitize_post_text() {
    // Test control character removal, keeping line breaks and tabs
    let input = "line\u{0000} one\nline\ttwo\u{007F}";
    assert_eq!(sanitize_post_text(input), "line one\nline\ttwo");
}
