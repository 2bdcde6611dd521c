use std::path::PathBuf;

use uuid::Uuid;

use super::{encode_notes, JsonFileStorage, NoteStorage};
use crate::domain::note::Note;

fn unique_workspace() -> PathBuf {
    let root = std::env::temp_dir().join(format!("notebook-storage-test-{}", Uuid::now_v7()));
    std::fs::create_dir_all(&root).expect("temp workspace should be creatable");
    root
}

fn note(title: &str, content: &str, tags: &[&str], date: &str) -> Note {
    Note {
        title: title.to_string(),
        content: content.to_string(),
        tags: tags.iter().map(|tag| (*tag).to_string()).collect(),
        date: date.to_string(),
    }
}

fn sample_notes() -> Vec<Note> {
    vec![
        note("Shopping", "milk", &["home"], "2026-02-01 08:00"),
        note("Café plan", "crème brûlée", &[], "2026-02-02 09:30"),
    ]
}

#[test]
fn missing_file_loads_as_empty() {
    let root = unique_workspace();
    let storage = JsonFileStorage::new(root.join("notes.json"));
    let notes = storage.load().expect("missing file should not fail");
    assert!(notes.is_empty());
}

#[test]
fn corrupt_file_loads_as_empty() {
    let root = unique_workspace();
    let path = root.join("notes.json");
    std::fs::write(&path, "[{\"title\": \"half").expect("fixture should be writable");
    let storage = JsonFileStorage::new(&path);
    assert!(storage.load().expect("corrupt file should not fail").is_empty());

    std::fs::write(&path, [0xff, 0xfe, 0x00]).expect("fixture should be writable");
    assert!(storage.load().expect("non-utf8 file should not fail").is_empty());

    std::fs::write(&path, "{\"title\": \"not a list\"}").expect("fixture should be writable");
    assert!(storage.load().expect("wrong shape should not fail").is_empty());
}

#[test]
fn save_then_load_returns_the_same_notes() {
    let root = unique_workspace();
    let mut storage = JsonFileStorage::new(root.join("nested/dir/notes.json"));
    storage.save(&sample_notes()).expect("save should succeed");
    assert_eq!(storage.load().expect("load should succeed"), sample_notes());
}

#[test]
fn repeated_save_of_loaded_notes_is_byte_identical() {
    let root = unique_workspace();
    let path = root.join("notes.json");
    let mut storage = JsonFileStorage::new(&path);
    storage.save(&sample_notes()).expect("first save should succeed");
    let first = std::fs::read(&path).expect("file should exist");

    let loaded = storage.load().expect("load should succeed");
    storage.save(&loaded).expect("second save should succeed");
    let reloaded = storage.load().expect("reload should succeed");
    storage.save(&reloaded).expect("third save should succeed");
    let third = std::fs::read(&path).expect("file should exist");

    assert_eq!(first, third);
}

#[test]
fn save_leaves_no_temp_files_behind() {
    let root = unique_workspace();
    let mut storage = JsonFileStorage::new(root.join("notes.json"));
    storage.save(&sample_notes()).expect("save should succeed");
    storage.save(&[]).expect("empty save should succeed");

    let names: Vec<String> = std::fs::read_dir(&root)
        .expect("workspace should be readable")
        .map(|entry| {
            entry
                .expect("entry should be readable")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    assert_eq!(names, vec!["notes.json".to_string()]);
    assert!(storage.load().expect("load should succeed").is_empty());
}

#[test]
fn encoding_uses_four_space_indent_and_keeps_unicode() {
    let encoded = encode_notes(&sample_notes()).expect("encode should succeed");
    let text = String::from_utf8(encoded).expect("encoding should be utf8");
    assert!(text.starts_with("[\n    {\n        \"title\": \"Shopping\""));
    assert!(text.contains("\"tags\": []"));
    assert!(text.contains("crème brûlée"));
    let title_at = text.find("\"title\"").expect("title key");
    let content_at = text.find("\"content\"").expect("content key");
    let tags_at = text.find("\"tags\"").expect("tags key");
    let date_at = text.find("\"date\"").expect("date key");
    assert!(title_at < content_at && content_at < tags_at && tags_at < date_at);
}

#[test]
fn unreadable_path_is_a_storage_error() {
    let root = unique_workspace();
    let storage = JsonFileStorage::new(&root);
    let err = storage
        .load()
        .expect_err("a directory is not a readable notes file");
    assert!(err.to_string().contains("notes file I/O error"));
}
