// src/util/text.rs
use html_escape::{decode_html_entities, encode_text};
use regex::Regex;
use std::sync::LazyLock;

use crate::constants::PREVIEW_MAX_CHARS;

static BLOCK_TAG_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"</?(p|div|br|li|ul|ol|blockquote|pre|h[1-6])[^>]*>").expect("valid regex")
});
static TAG_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]+>").expect("valid regex"));

/// Extract the first line of plain text from HTML content.
///
/// This function:
/// 1. Decodes HTML entities (e.g., &amp; → &)
/// 2. Removes all HTML tags
/// 3. Extracts the first non-empty line
/// 4. Trims whitespace
///
/// # Examples
///
/// ```
/// use snappad::util::text::extract_first_line;
///
/// let html = "<p>Buy milk</p><p>Second line</p>";
/// assert_eq!(extract_first_line(html), "Buy milk");
/// ```
pub fn extract_first_line(html: &str) -> String {
    // Tags go first so an encoded "&lt;b&gt;" survives as literal text
    let with_newlines = BLOCK_TAG_RE.replace_all(html, "\n");
    let no_tags = TAG_RE.replace_all(&with_newlines, "");
    let decoded = decode_html_entities(&no_tags);

    decoded
        .lines()
        .map(|line| line.trim())
        .find(|line| !line.is_empty())
        .unwrap_or("")
        .to_string()
}

/// One-line preview of note content for the dashboard list.
///
/// The first line is cut to 50 characters and gets a trailing `...` once it
/// reaches that length; notes without text read "Empty note".
pub fn note_preview(html: &str) -> String {
    let first_line = extract_first_line(html);
    if first_line.is_empty() {
        return "Empty note".to_string();
    }
    let preview: String = first_line.chars().take(PREVIEW_MAX_CHARS).collect();
    if preview.chars().count() < PREVIEW_MAX_CHARS {
        preview
    } else {
        format!("{preview}...")
    }
}

/// Wrap plain-text lines as paragraphs so they can be stored as note markup
pub fn plain_text_to_html(text: &str) -> String {
    text.lines()
        .map(|line| format!("<p>{}</p>", encode_text(line)))
        .collect()
}

/// Rough password strength from 0 to 4: length ≥ 8, an uppercase letter,
/// a digit and a symbol each add one point.
pub fn password_strength(password: &str) -> u8 {
    let checks = [
        password.chars().count() >= 8,
        password.chars().any(|c| c.is_ascii_uppercase()),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_ascii_alphanumeric()),
    ];
    checks.iter().filter(|&&passed| passed).count() as u8
}
