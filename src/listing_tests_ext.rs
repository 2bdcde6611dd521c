use super::{filter_by_tag, normalize_term, search};
use crate::domain::note::Note;

fn note(title: &str, content: &str, tags: &[&str]) -> Note {
    Note {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|value| (*value).to_string()).collect(),
        date: "2026-02-23 10:00".to_string(),
    }
}

fn sample() -> Vec<Note> {
    vec![
        note("Groceries", "milk and bread", &["home"]),
        note("Monday", "Project Plan review", &["work", "Q1"]),
        note("Reading list", "Rust book", &["books", "workshop"]),
    ]
}

#[test]
fn search_matches_content_case_insensitively_and_keeps_positions() {
    let notes = sample();
    let found = search(&notes, "proj");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].position, 2);
    assert_eq!(found[0].note, &notes[1]);
}

#[test]
fn search_matches_title_and_preserves_order() {
    let notes = sample();
    let found = search(&notes, "  R ");
    let positions: Vec<usize> = found.iter().map(|m| m.position).collect();
    assert_eq!(positions, vec![1, 2, 3]);
}

#[test]
fn blank_keyword_matches_nothing() {
    let notes = sample();
    assert!(search(&notes, "").is_empty());
    assert!(search(&notes, "   ").is_empty());
}

#[test]
fn filter_requires_exact_tag_match_ignoring_case() {
    let notes = sample();
    let found = filter_by_tag(&notes, "Work");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].position, 2);

    assert_eq!(filter_by_tag(&notes, "q1")[0].position, 2);
    assert!(filter_by_tag(&notes, "wor").is_empty());
    assert!(filter_by_tag(&notes, "").is_empty());
}

#[test]
fn filter_matches_every_note_carrying_the_tag() {
    let notes = vec![
        note("a", "", &["Todo"]),
        note("b", "", &[]),
        note("c", "", &["misc", "todo"]),
    ];
    let positions: Vec<usize> = filter_by_tag(&notes, "TODO")
        .iter()
        .map(|m| m.position)
        .collect();
    assert_eq!(positions, vec![1, 3]);
}

#[test]
fn normalize_term_trims_and_lowers() {
    assert_eq!(normalize_term("  Work "), Some("work".to_string()));
    assert_eq!(normalize_term(" \t"), None);
}
