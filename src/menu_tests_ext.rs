use std::io::Cursor;

use super::{MenuChoice, Session};
use crate::console::Console;
use crate::domain::note::Note;
use crate::storage::MemoryStorage;
use crate::store::NoteStore;
use crate::ui::Palette;

type TestSession = Session<MemoryStorage, Cursor<Vec<u8>>, Vec<u8>>;

fn note(title: &str, content: &str, tags: &[&str], date: &str) -> Note {
    Note {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|value| (*value).to_string()).collect(),
        date: date.to_string(),
    }
}

fn abc() -> Vec<Note> {
    vec![
        note("A", "alpha", &["work"], "2026-01-01 09:00"),
        note("B", "Project Plan", &[], "2026-01-02 09:00"),
        note("C", "gamma", &["home"], "2026-01-03 09:00"),
    ]
}

fn session(notes: Vec<Note>, input: &str) -> TestSession {
    let store = NoteStore::open(MemoryStorage::with_notes(notes)).expect("store should open");
    let console = Console::new(
        Cursor::new(input.as_bytes().to_vec()),
        Vec::new(),
        Palette::plain(),
    );
    Session::new(store, console)
}

fn run(notes: Vec<Note>, input: &str) -> (NoteStore<MemoryStorage>, String) {
    let mut session = session(notes, input);
    session.run().expect("session should finish cleanly");
    let (store, console) = session.into_parts();
    let output = String::from_utf8(console.into_output()).expect("output should be utf8");
    (store, output)
}

fn titles(store: &NoteStore<MemoryStorage>) -> Vec<&str> {
    store.notes().iter().map(|n| n.title.as_str()).collect()
}

#[test]
fn menu_keys_round_trip() {
    for choice in MenuChoice::ALL {
        assert_eq!(MenuChoice::from_key(choice.key()), Some(choice));
    }
    assert_eq!(MenuChoice::from_key(" 7 "), Some(MenuChoice::Sort));
    assert_eq!(MenuChoice::from_key("8"), None);
    assert_eq!(MenuChoice::from_key(""), None);
}

#[test]
fn exit_persists_and_says_goodbye() {
    let (store, output) = run(abc(), "0\n");
    assert!(output.contains("--- Personal Notebook Manager ---"));
    assert!(output.ends_with("Goodbye!\n"));
    assert_eq!(store.storage().saves, 1);
    assert_eq!(store.storage().saved, abc());
}

#[test]
fn end_of_input_ends_the_session_like_exit() {
    let (store, output) = run(abc(), "");
    assert!(output.ends_with("Goodbye!\n"));
    assert_eq!(store.storage().saves, 1);

    let (store, output) = run(abc(), "1\nhalf-typed title\n");
    assert!(output.ends_with("Goodbye!\n"));
    assert_eq!(store.len(), 3);
}

#[test]
fn invalid_choice_returns_to_menu() {
    let (_, output) = run(abc(), "9\n0\n");
    assert!(output.contains("Invalid choice, try again."));
    assert_eq!(output.matches("--- Personal Notebook Manager ---").count(), 2);
}

#[test]
fn add_reprompts_for_title_and_parses_tags() {
    let (store, output) = run(Vec::new(), "1\n\n   \nT\nC\na, b\n0\n");
    assert_eq!(output.matches("Title cannot be empty.").count(), 2);
    assert!(output.contains("Note added successfully!"));
    assert_eq!(store.len(), 1);
    let added = &store.notes()[0];
    assert_eq!(added.title, "T");
    assert_eq!(added.content, "C");
    assert_eq!(added.tags, vec!["a", "b"]);
    assert_eq!(added.date.len(), 16);
    assert_eq!(store.storage().saved, store.notes());
}

#[test]
fn list_shows_notes_or_empty_state() {
    let (_, output) = run(Vec::new(), "2\n0\n");
    assert!(output.contains("--- All Notes ---"));
    assert!(output.contains("No notes yet."));

    let (_, output) = run(abc(), "2\n0\n");
    assert!(output.contains("[1] A"));
    assert!(output.contains("Tags: work"));
    assert!(output.contains("[3] C"));
}

#[test]
fn delete_requires_exact_y() {
    let (store, output) = run(abc(), "6\n2\ny\n0\n");
    assert!(output.contains("Are you sure you want to delete 'B'? (y/n): "));
    assert!(output.contains("Note deleted."));
    assert_eq!(titles(&store), vec!["A", "C"]);
    assert_eq!(store.storage().saved, store.notes());

    for answer in ["n", "Y", "yes", ""] {
        let (store, output) = run(abc(), &format!("6\n2\n{answer}\n0\n"));
        assert!(output.contains("Delete cancelled."), "answer {answer:?}");
        assert_eq!(titles(&store), vec!["A", "B", "C"]);
    }
}

#[test]
fn edit_and_delete_reject_bad_numbers_without_mutation() {
    let (store, output) = run(abc(), "5\nabc\n5\n4\n6\n0\n0\n");
    assert!(output.contains("Invalid number."));
    assert_eq!(output.matches("Note number out of range.").count(), 2);
    assert_eq!(titles(&store), vec!["A", "B", "C"]);
    assert_eq!(store.storage().saves, 1);
}

#[test]
fn oversized_note_number_is_out_of_range_not_invalid() {
    let (store, output) = run(abc(), "6\n99999999999999999999\n0\n");
    assert!(output.contains("Note number out of range."));
    assert!(!output.contains("Invalid number."));
    assert_eq!(titles(&store), vec!["A", "B", "C"]);
}

#[test]
fn edit_and_delete_on_empty_collection_explain_themselves() {
    let (_, output) = run(Vec::new(), "5\n6\n0\n");
    assert!(output.contains("No notes to edit."));
    assert!(output.contains("No notes to delete."));
}

#[test]
fn edit_with_blank_answers_keeps_note_and_persists() {
    let (store, output) = run(abc(), "5\n1\n\n\n\n0\n");
    assert!(output.contains("Editing note [1] - A"));
    assert!(output.contains("New title (Enter to keep: 'A'): "));
    assert!(output.contains("(Enter to keep: work): "));
    assert!(output.contains("Note updated successfully!"));
    assert_eq!(store.notes(), abc().as_slice());
    assert_eq!(store.storage().saves, 2);
}

#[test]
fn edit_replaces_tags_wholesale() {
    let (store, _) = run(abc(), "5\n1\nRenamed\n\nx, y\n0\n");
    let edited = &store.notes()[0];
    assert_eq!(edited.title, "Renamed");
    assert_eq!(edited.content, "alpha");
    assert_eq!(edited.tags, vec!["x", "y"]);
    assert_eq!(edited.date, "2026-01-01 09:00");
}

#[test]
fn search_lists_matches_with_global_positions() {
    let (store, output) = run(abc(), "3\nproj\n\n0\n");
    assert!(output.contains("Found 1 note(s):"));
    assert!(output.contains("[2] B"));
    assert!(!output.contains("[1] A"));
    assert_eq!(store.storage().saves, 1);
}

#[test]
fn search_without_keyword_or_matches_reports_it() {
    let (_, output) = run(abc(), "3\n  \n3\nzzz\n0\n");
    assert!(output.contains("No keyword entered."));
    assert!(output.contains("No notes found for this keyword."));
}

#[test]
fn search_follow_up_deletes_by_global_position() {
    let (store, output) = run(abc(), "3\ngamma\nd\n3\ny\n0\n");
    assert!(output.contains("Are you sure you want to delete 'C'? (y/n): "));
    assert_eq!(titles(&store), vec!["A", "B"]);
}

#[test]
fn search_follow_up_edits_by_global_position() {
    let (store, _) = run(abc(), "3\nplan\ne\n2\n\nDone\n\n0\n");
    assert_eq!(store.notes()[1].content, "Done");
    assert_eq!(store.notes()[1].title, "B");
}

#[test]
fn search_follow_up_rejects_positions_outside_results() {
    let (store, output) = run(abc(), "3\nplan\nd\n1\n0\n");
    assert!(output.contains("That note is not among the search results."));
    assert_eq!(titles(&store), vec!["A", "B", "C"]);

    let (_, output) = run(abc(), "3\nplan\nx\n0\n");
    assert!(output.contains("Invalid option."));
}

#[test]
fn filter_matches_exact_tag_ignoring_case() {
    let (_, output) = run(abc(), "4\nWork\n0\n");
    assert!(output.contains("Found 1 note(s) with tag 'work':"));
    assert!(output.contains("[1] A"));

    let (_, output) = run(abc(), "4\nwor\n4\n\n0\n");
    assert!(output.contains("No notes with this tag."));
    assert!(output.contains("No tag entered."));
}

#[test]
fn sort_reorders_and_persists() {
    let notes = vec![
        note("banana", "", &[], "2026-01-02 09:00"),
        note("Apple", "", &[], "2026-01-01 09:00"),
    ];
    let (store, output) = run(notes.clone(), "7\n1\n0\n");
    assert!(output.contains("Notes sorted: By title (A-Z)."));
    assert_eq!(titles(&store), vec!["Apple", "banana"]);

    let (store, _) = run(notes.clone(), "7\n3\n0\n");
    assert_eq!(titles(&store), vec!["banana", "Apple"]);

    let (store, output) = run(notes, "7\n5\n0\n");
    assert!(output.contains("Invalid sort option."));
    assert_eq!(titles(&store), vec!["banana", "Apple"]);
    assert_eq!(store.storage().saves, 1);
}

#[test]
fn storage_failure_stops_the_session() {
    let mut storage = MemoryStorage::with_notes(abc());
    storage.fail_saves = true;
    let store = NoteStore::open(storage).expect("store should open");
    let console = Console::new(
        Cursor::new(b"7\n1\n0\n".to_vec()),
        Vec::new(),
        Palette::plain(),
    );
    let mut session = Session::new(store, console);
    let err = session.run().expect_err("save failure should be fatal");
    assert!(err.to_string().contains("save disabled"));
}
