//! Text helpers for item excerpts.
//!
//! Excerpts are returned as HTML, so every path through here ends in
//! ammonia: hand-written excerpts keep safe formatting tags, generated ones
//! are reduced to escaped text.

use std::collections::HashSet;

/// Words kept in a generated excerpt.
pub const EXCERPT_WORDS: usize = 55;

/// Appended to a generated excerpt that was cut short.
pub const EXCERPT_MORE: &str = "&hellip;";

/// Sanitize HTML input using ammonia with default settings.
pub fn sanitize_html(input: &str) -> String {
    ammonia::clean(input)
}

/// Remove all markup, keeping escaped text only.
///
/// Script and style bodies are dropped along with their tags.
pub fn strip_tags(input: &str) -> String {
    ammonia::Builder::empty()
        .clean_content_tags(HashSet::from(["script", "style"]))
        .clean(input)
        .to_string()
}

/// Build the excerpt for an item.
///
/// A non-blank hand-written excerpt wins and is sanitized. Otherwise the
/// first [`EXCERPT_WORDS`] words of the stripped content are used.
pub fn excerpt_for(excerpt: Option<&str>, content: &str) -> String {
    if let Some(text) = excerpt.filter(|e| !e.trim().is_empty()) {
        return sanitize_html(text.trim());
    }
    trim_words(&strip_tags(content), EXCERPT_WORDS)
}

/// Keep the first `limit` whitespace-separated words of `text`.
pub fn trim_words(text: &str, limit: usize) -> String {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.len() <= limit {
        return words.join(" ");
    }
    format!("{}{EXCERPT_MORE}", words[..limit].join(" "))
}
