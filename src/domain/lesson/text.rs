use html2text::from_read;
use regex::Regex;
use std::sync::LazyLock;

static URL_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"https?://[^\s]+").unwrap());
static WHITESPACE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Clean sentence text: strip HTML, drop URLs, collapse whitespace
pub fn clean_text(text: &str) -> String {
    let plain_text = if text.contains('<') {
        from_read(text.as_bytes(), usize::MAX)
    } else {
        text.to_string()
    };

    let without_urls = URL_PATTERN.replace_all(&plain_text, "");
    let normalized = WHITESPACE_PATTERN.replace_all(&without_urls, " ");

    normalized.trim().to_string()
}
