use std::io::{self, IsTerminal};

use crate::domain::note::Note;
use crate::domain::sort::SortPolicy;
use crate::listing::NoteMatch;
use crate::menu::MenuChoice;

const RULE_WIDTH: usize = 30;

pub fn format_menu(palette: &Palette) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&palette.heading("--- Personal Notebook Manager ---"));
    out.push('\n');
    for choice in MenuChoice::ALL {
        out.push_str(&format!("{}. {}\n", choice.key(), choice.label()));
    }
    out
}

pub fn format_sort_menu(palette: &Palette) -> String {
    let mut out = String::new();
    out.push('\n');
    out.push_str(&palette.heading("--- Sort Notes ---"));
    out.push('\n');
    for policy in SortPolicy::ALL {
        out.push_str(&format!("{}. {}\n", policy.menu_key(), policy.label()));
    }
    out
}

pub fn section_heading(palette: &Palette, title: &str) -> String {
    format!("\n{}\n", palette.heading(&format!("--- {title} ---")))
}

/// Renders the whole collection, or the empty-state line.
pub fn format_note_list(notes: &[Note], palette: &Palette) -> String {
    if notes.is_empty() {
        return format!("{}\n", palette.dim("No notes yet."));
    }
    notes
        .iter()
        .enumerate()
        .map(|(idx, note)| format_note_block(idx + 1, note, palette))
        .collect()
}

pub fn format_matches(matches: &[NoteMatch<'_>], palette: &Palette) -> String {
    matches
        .iter()
        .map(|found| format_note_block(found.position, found.note, palette))
        .collect()
}

pub fn format_note_block(position: usize, note: &Note, palette: &Palette) -> String {
    let rule = palette.dim(&"-".repeat(RULE_WIDTH));
    let mut out = String::new();
    out.push_str(&format!(
        "\n{} {}\n",
        palette.position(&format!("[{position}]")),
        palette.title(&note.title)
    ));
    out.push_str(&format!("Date: {}\n", note.date));
    if !note.tags.is_empty() {
        out.push_str(&format!("Tags: {}\n", palette.tags(&note.tags.join(", "))));
    }
    out.push_str(&rule);
    out.push('\n');
    out.push_str(&note.content);
    out.push('\n');
    out.push_str(&rule);
    out.push('\n');
    out
}

pub struct Palette {
    enabled: bool,
}

impl Palette {
    pub fn auto() -> Self {
        let enabled = std::env::var_os("NO_COLOR").is_none() && io::stdout().is_terminal();
        Self { enabled }
    }

    #[cfg(test)]
    pub fn plain() -> Self {
        Self { enabled: false }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.enabled {
            format!("\x1b[{code}m{text}\x1b[0m")
        } else {
            text.to_string()
        }
    }

    pub fn heading(&self, text: &str) -> String {
        self.paint("1;36", text)
    }

    pub fn dim(&self, text: &str) -> String {
        self.paint("2", text)
    }

    pub fn position(&self, text: &str) -> String {
        self.paint("1;94", text)
    }

    pub fn title(&self, text: &str) -> String {
        self.paint("1", text)
    }

    pub fn tags(&self, text: &str) -> String {
        self.paint("35", text)
    }

    pub fn success(&self, text: &str) -> String {
        self.paint("32", text)
    }

    pub fn warning(&self, text: &str) -> String {
        self.paint("33", text)
    }
}

#[cfg(test)]
#[path = "ui_tests_ext.rs"]
mod tests;
