// src/ports/terminal.rs
use std::fmt::Write;

use crate::application::NoteSections;
use crate::domain::Note;
use crate::util::text::note_preview;

/// Plain-text rendering of the dashboard for the terminal
#[derive(Debug, Default)]
pub struct TerminalPresenter;

impl TerminalPresenter {
    pub fn new() -> Self {
        Self
    }

    /// Pinned group first, then the rest; `active` marks the open note with `*`
    pub fn render_sections(&self, sections: &NoteSections, active: Option<i64>) -> String {
        if sections.is_empty() {
            return "No notes yet\nCreate your first note to get started\n".to_string();
        }

        let mut out = String::new();
        if !sections.pinned.is_empty() {
            self.render_group(&mut out, "Pinned", &sections.pinned, active);
            out.push('\n');
        }
        self.render_group(&mut out, "All Notes", &sections.unpinned, active);
        out
    }

    fn render_group(&self, out: &mut String, label: &str, notes: &[Note], active: Option<i64>) {
        let _ = writeln!(out, "{label} ({})", notes.len());
        for note in notes {
            let marker = if active == Some(note.id) { '*' } else { ' ' };
            let _ = writeln!(
                out,
                "{marker} {:>6}  {}  {}",
                note.id,
                note.display_title(),
                note_preview(&note.content)
            );
        }
    }

    pub fn render_note(&self, note: &Note) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "{}", note.display_title());
        let _ = writeln!(
            out,
            "id: {}  pinned: {}  colors: {} on {}",
            note.id,
            if note.is_pinned { "yes" } else { "no" },
            note.font_color,
            note.background_color
        );
        let _ = writeln!(out, "updated: {}", note.updated_at.to_rfc3339());
        let _ = writeln!(out);
        let _ = writeln!(out, "{}", note_preview(&note.content));
        out
    }
}
