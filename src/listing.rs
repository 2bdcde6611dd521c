use crate::domain::note::Note;

/// A note together with its 1-based position in the whole collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteMatch<'a> {
    pub position: usize,
    pub note: &'a Note,
}

/// Case-insensitive substring search over title and content.
/// A blank keyword matches nothing.
pub fn search<'a>(notes: &'a [Note], keyword: &str) -> Vec<NoteMatch<'a>> {
    let Some(keyword) = normalize_term(keyword) else {
        return Vec::new();
    };
    collect_matches(notes, |note| matches_keyword(note, &keyword))
}

/// Case-insensitive exact match against any tag. A blank tag matches nothing.
pub fn filter_by_tag<'a>(notes: &'a [Note], tag: &str) -> Vec<NoteMatch<'a>> {
    let Some(tag) = normalize_term(tag) else {
        return Vec::new();
    };
    collect_matches(notes, |note| note.has_tag(&tag))
}

pub fn normalize_term(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

fn matches_keyword(note: &Note, keyword_lower: &str) -> bool {
    note.title.to_lowercase().contains(keyword_lower)
        || note.content.to_lowercase().contains(keyword_lower)
}

fn collect_matches<'a, F>(notes: &'a [Note], mut keep: F) -> Vec<NoteMatch<'a>>
where
    F: FnMut(&Note) -> bool,
{
    notes
        .iter()
        .enumerate()
        .filter(|(_, note)| keep(note))
        .map(|(idx, note)| NoteMatch {
            position: idx + 1,
            note,
        })
        .collect()
}

#[cfg(test)]
#[path = "listing_tests_ext.rs"]
mod tests;
