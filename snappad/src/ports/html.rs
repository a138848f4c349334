// src/ports/html.rs
use crate::domain::Note;
use html_escape::{encode_double_quoted_attribute, encode_text};
use regex::Regex;
use std::sync::LazyLock;
use tracing::instrument;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script\s*>").expect("valid regex")
});
static EVENT_ATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)\s+on[a-z]+\s*=\s*("[^"]*"|'[^']*'|[^\s>]+)"#).expect("valid regex")
});

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M UTC";

#[derive(Debug, Default)]
pub struct HtmlPresenter;

impl HtmlPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Note content is editor markup; only executable parts are removed
    #[instrument(level = "debug", skip(self), ret)]
    fn process_content(&self, content: &str) -> String {
        let without_scripts = SCRIPT_RE.replace_all(content, "");
        EVENT_ATTR_RE.replace_all(&without_scripts, "").into_owned()
    }

    pub fn render(&self, note: &Note) -> String {
        let title = encode_text(note.display_title());
        let content = self.process_content(&note.content);
        let font_color = encode_double_quoted_attribute(&note.font_color);
        let background_color = encode_double_quoted_attribute(&note.background_color);

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <style>
        body {{
            font-family: -apple-system, BlinkMacSystemFont, "Segoe UI", Roboto, sans-serif;
            line-height: 1.6;
            max-width: 800px;
            margin: 2rem auto;
            padding: 0 1rem;
            background-color: #f5f5f5;
        }}
        .note {{
            border-radius: 8px;
            padding: 2rem;
            box-shadow: 0 2px 4px rgba(0,0,0,0.1);
        }}
        .note-title {{
            margin-top: 0;
            padding-bottom: 1rem;
            border-bottom: 2px solid rgba(0,0,0,0.08);
        }}
        .pin {{
            display: inline-block;
            background: #e9ecef;
            padding: 2px 8px;
            border-radius: 4px;
            font-size: 0.8em;
            color: #333;
        }}
        .note-info {{
            margin-top: 1rem;
            padding-top: 1rem;
            border-top: 1px solid rgba(0,0,0,0.08);
            font-size: 0.9em;
            opacity: 0.7;
        }}
    </style>
</head>
<body>
    <div class="note" style="color: {font_color}; background-color: {background_color};">
        <h1 class="note-title">{title}</h1>{pin}
        <div class="note-content">{content}</div>
        <div class="note-info">
            <div>Note ID: {note_id}</div>
            <div>Created: {created}</div>
            <div>Updated: {updated}</div>
        </div>
    </div>
</body>
</html>"#,
            pin = if note.is_pinned {
                "\n        <span class=\"pin\">Pinned</span>"
            } else {
                ""
            },
            note_id = note.id,
            created = note.created_at.format(TIMESTAMP_FORMAT),
            updated = note.updated_at.format(TIMESTAMP_FORMAT),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::testing::note;
    use rstest::rstest;

    #[rstest]
    #[case("<p>plain</p>", "<p>plain</p>")]
    #[case("<p>a</p><script>alert(1)</script><p>b</p>", "<p>a</p><p>b</p>")]
    #[case("<SCRIPT type=\"x\">\nbad()\n</SCRIPT>", "")]
    #[case(r#"<img src="x.png" onerror="steal()">"#, r#"<img src="x.png">"#)]
    #[case("<p>one &amp; two</p>", "<p>one &amp; two</p>")]
    fn given_content_when_processing_then_strips_executable_markup(
        #[case] input: &str,
        #[case] expected: &str,
    ) {
        let presenter = HtmlPresenter::new();
        assert_eq!(presenter.process_content(input), expected);
    }

    #[test]
    fn given_blank_title_when_rendering_then_uses_placeholder() {
        let presenter = HtmlPresenter::new();
        let note = Note {
            title: "  ".to_string(),
            ..note(1, false)
        };

        let html = presenter.render(&note);

        assert!(html.contains("<title>Untitled Note</title>"));
        assert!(!html.contains("class=\"pin\""));
    }
}
