use serde::{Deserialize, Serialize};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::OffsetDateTime;

/// Creation stamp layout. Fixed width, so lexicographic order matches time order.
pub const DATE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Note {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub date: String,
}

/// User input for a new note, before it is stamped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoteDraft {
    pub title: String,
    pub content: String,
    pub tags: Vec<String>,
}

/// Replacement values for an existing note. `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotePatch {
    pub title: Option<String>,
    pub content: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl Note {
    pub fn from_draft(draft: NoteDraft, date: String) -> Self {
        Self {
            title: draft.title.trim().to_string(),
            content: draft.content.trim().to_string(),
            tags: draft.tags,
            date,
        }
    }

    pub fn apply(&mut self, patch: NotePatch) {
        if let Some(title) = patch.title {
            self.title = title;
        }
        if let Some(content) = patch.content {
            self.content = content;
        }
        if let Some(tags) = patch.tags {
            self.tags = tags;
        }
    }

    pub fn has_tag(&self, wanted_lower: &str) -> bool {
        self.tags.iter().any(|tag| tag.to_lowercase() == wanted_lower)
    }
}

impl NoteDraft {
    pub fn from_input(title: &str, content: &str, raw_tags: &str) -> Self {
        Self {
            title: title.trim().to_string(),
            content: content.trim().to_string(),
            tags: parse_tags(raw_tags),
        }
    }
}

impl NotePatch {
    /// Builds a patch from raw edit answers; blank answers keep the field.
    /// A non-blank tags answer replaces the whole list, even if it parses to nothing.
    pub fn from_answers(title: &str, content: &str, raw_tags: &str) -> Self {
        Self {
            title: non_empty(title).map(str::to_string),
            content: non_empty(content).map(str::to_string),
            tags: non_empty(raw_tags).map(parse_tags),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none() && self.tags.is_none()
    }
}

/// Splits comma separated tags, trimming each and dropping empty tokens.
/// Duplicates are kept.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn now_stamp() -> String {
    let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
    format_stamp(now)
}

pub fn format_stamp(value: OffsetDateTime) -> String {
    value
        .format(DATE_FORMAT)
        .unwrap_or_else(|_| value.date().to_string())
}

fn non_empty(raw: &str) -> Option<&str> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;
    use time::PrimitiveDateTime;

    fn sample_note() -> Note {
        Note {
            title: "Groceries".to_string(),
            content: "milk, eggs".to_string(),
            tags: vec!["home".to_string(), "Errands".to_string()],
            date: "2026-03-01 09:15".to_string(),
        }
    }

    #[test]
    fn parse_tags_trims_and_drops_empty_tokens() {
        assert_eq!(parse_tags("a, b"), vec!["a", "b"]);
        assert_eq!(parse_tags(" work ,, school,  "), vec!["work", "school"]);
        assert!(parse_tags("").is_empty());
        assert!(parse_tags(" , ,").is_empty());
    }

    #[test]
    fn parse_tags_keeps_duplicates_and_case() {
        assert_eq!(parse_tags("Todo,todo,Todo"), vec!["Todo", "todo", "Todo"]);
    }

    #[test]
    fn format_stamp_is_fixed_width() {
        let stamp = format_stamp(datetime!(2026-01-05 07:03 UTC));
        assert_eq!(stamp, "2026-01-05 07:03");
    }

    #[test]
    fn now_stamp_parses_back_with_the_same_layout() {
        let stamp = now_stamp();
        assert_eq!(stamp.len(), 16);
        PrimitiveDateTime::parse(&stamp, DATE_FORMAT).expect("stamp should parse");
    }

    #[test]
    fn draft_from_input_trims_fields() {
        let draft = NoteDraft::from_input("  T ", " C  ", "a, b");
        assert_eq!(draft.title, "T");
        assert_eq!(draft.content, "C");
        assert_eq!(draft.tags, vec!["a", "b"]);
    }

    #[test]
    fn blank_answers_produce_an_empty_patch() {
        let patch = NotePatch::from_answers("", "   ", "");
        assert!(patch.is_empty());

        let mut note = sample_note();
        note.apply(patch);
        assert_eq!(note, sample_note());
    }

    #[test]
    fn tags_answer_replaces_instead_of_merging() {
        let mut note = sample_note();
        note.apply(NotePatch::from_answers("", "", "new"));
        assert_eq!(note.tags, vec!["new"]);

        note.apply(NotePatch::from_answers("", "", " , "));
        assert!(note.tags.is_empty());
    }

    #[test]
    fn has_tag_is_case_insensitive_and_exact() {
        let note = sample_note();
        assert!(note.has_tag("errands"));
        assert!(note.has_tag("home"));
        assert!(!note.has_tag("err"));
    }

    #[test]
    fn missing_tags_and_date_default_on_deserialize() {
        let note: Note = serde_json::from_str(r#"{"title":"t","content":"c"}"#)
            .expect("note should deserialize");
        assert!(note.tags.is_empty());
        assert_eq!(note.date, "");
    }
}
