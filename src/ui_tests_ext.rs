use super::{format_matches, format_menu, format_note_block, format_note_list, Palette};
use crate::domain::note::Note;
use crate::listing::NoteMatch;

fn sample_note(tags: &[&str]) -> Note {
    Note {
        title: "Weekly sync".to_string(),
        content: "Agenda: roadmap".to_string(),
        tags: tags.iter().map(|value| (*value).to_string()).collect(),
        date: "2026-02-27 10:00".to_string(),
    }
}

#[test]
fn note_block_has_position_date_tags_and_ruled_content() {
    let block = format_note_block(2, &sample_note(&["work", "meetings"]), &Palette::plain());
    let rule = "-".repeat(30);
    assert_eq!(
        block,
        format!(
            "\n[2] Weekly sync\nDate: 2026-02-27 10:00\nTags: work, meetings\n{rule}\nAgenda: roadmap\n{rule}\n"
        )
    );
}

#[test]
fn note_block_omits_tags_line_when_untagged() {
    let block = format_note_block(1, &sample_note(&[]), &Palette::plain());
    assert!(!block.contains("Tags:"));
}

#[test]
fn empty_list_renders_empty_state() {
    assert_eq!(format_note_list(&[], &Palette::plain()), "No notes yet.\n");
}

#[test]
fn list_numbers_notes_from_one() {
    let notes = vec![sample_note(&[]), sample_note(&[])];
    let rendered = format_note_list(&notes, &Palette::plain());
    assert!(rendered.contains("[1] Weekly sync"));
    assert!(rendered.contains("[2] Weekly sync"));
}

#[test]
fn matches_keep_global_positions() {
    let note = sample_note(&[]);
    let found = vec![NoteMatch {
        position: 7,
        note: &note,
    }];
    assert!(format_matches(&found, &Palette::plain()).contains("[7] Weekly sync"));
}

#[test]
fn menu_lists_every_choice_in_order() {
    let menu = format_menu(&Palette::plain());
    let add = menu.find("1. Add a new note").expect("add entry");
    let sort = menu.find("7. Sort notes").expect("sort entry");
    let exit = menu.find("0. Exit").expect("exit entry");
    assert!(add < sort && sort < exit);
}

#[test]
fn plain_palette_never_emits_escape_codes() {
    let block = format_note_block(1, &sample_note(&["x"]), &Palette::plain());
    assert!(!block.contains('\x1b'));
}
