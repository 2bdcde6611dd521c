use std::error::Error;
use std::fmt;
use std::io::{self, BufRead, Write};

use log::{debug, info};

use crate::console::Console;
use crate::domain::note::{NoteDraft, NotePatch};
use crate::domain::sort::SortPolicy;
use crate::listing::normalize_term;
use crate::storage::NoteStorage;
use crate::store::{NoteStore, Position, StoreError};
use crate::ui;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuChoice {
    Add,
    List,
    Search,
    Filter,
    Edit,
    Delete,
    Sort,
    Exit,
}

impl MenuChoice {
    pub const ALL: [MenuChoice; 8] = [
        MenuChoice::Add,
        MenuChoice::List,
        MenuChoice::Search,
        MenuChoice::Filter,
        MenuChoice::Edit,
        MenuChoice::Delete,
        MenuChoice::Sort,
        MenuChoice::Exit,
    ];

    pub fn key(self) -> &'static str {
        match self {
            MenuChoice::Add => "1",
            MenuChoice::List => "2",
            MenuChoice::Search => "3",
            MenuChoice::Filter => "4",
            MenuChoice::Edit => "5",
            MenuChoice::Delete => "6",
            MenuChoice::Sort => "7",
            MenuChoice::Exit => "0",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            MenuChoice::Add => "Add a new note",
            MenuChoice::List => "List all notes",
            MenuChoice::Search => "Search notes",
            MenuChoice::Filter => "Filter notes by tag",
            MenuChoice::Edit => "Edit a note",
            MenuChoice::Delete => "Delete a note",
            MenuChoice::Sort => "Sort notes",
            MenuChoice::Exit => "Exit",
        }
    }

    pub fn from_key(raw: &str) -> Option<Self> {
        let key = raw.trim();
        Self::ALL.into_iter().find(|choice| choice.key() == key)
    }
}

/// What to do with a note picked from search results.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FollowUp {
    Edit,
    Delete,
}

#[derive(Debug)]
pub enum SessionError {
    Io(io::Error),
    InputClosed,
    Store(StoreError),
}

impl fmt::Display for SessionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionError::Io(err) => write!(f, "terminal I/O error: {}", err),
            SessionError::InputClosed => write!(f, "input closed"),
            SessionError::Store(err) => write!(f, "{}", err),
        }
    }
}

impl Error for SessionError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            SessionError::Io(err) => Some(err),
            SessionError::InputClosed => None,
            SessionError::Store(err) => Some(err),
        }
    }
}

impl From<io::Error> for SessionError {
    fn from(value: io::Error) -> Self {
        SessionError::Io(value)
    }
}

impl From<StoreError> for SessionError {
    fn from(value: StoreError) -> Self {
        SessionError::Store(value)
    }
}

/// The menu loop: reads a choice, runs one operation, and comes back.
pub struct Session<S: NoteStorage, R, W> {
    store: NoteStore<S>,
    console: Console<R, W>,
}

impl<S: NoteStorage, R: BufRead, W: Write> Session<S, R, W> {
    pub fn new(store: NoteStore<S>, console: Console<R, W>) -> Self {
        Self { store, console }
    }

    /// Runs until Exit or end of input. Both persist once more before returning.
    pub fn run(&mut self) -> Result<(), SessionError> {
        loop {
            let menu = ui::format_menu(self.console.palette());
            self.console.print(&menu)?;
            let Some(raw) = self.console.ask("Enter your choice: ")? else {
                return self.finish();
            };

            let Some(choice) = MenuChoice::from_key(&raw) else {
                self.console.warn("Invalid choice, try again.")?;
                continue;
            };
            debug!("event=menu_choice choice={}", choice.key());

            let outcome = match choice {
                MenuChoice::Add => self.add(),
                MenuChoice::List => self.list(),
                MenuChoice::Search => self.search(),
                MenuChoice::Filter => self.filter(),
                MenuChoice::Edit => self.edit(),
                MenuChoice::Delete => self.delete(),
                MenuChoice::Sort => self.sort(),
                MenuChoice::Exit => return self.finish(),
            };
            match outcome {
                Ok(()) => {}
                Err(SessionError::InputClosed) => return self.finish(),
                Err(err) => return Err(err),
            }
        }
    }

    #[cfg(test)]
    pub fn into_parts(self) -> (NoteStore<S>, Console<R, W>) {
        (self.store, self.console)
    }

    fn finish(&mut self) -> Result<(), SessionError> {
        self.store.persist()?;
        info!("event=session_end count={}", self.store.len());
        self.console.say("Goodbye!")?;
        Ok(())
    }

    fn ask(&mut self, prompt: &str) -> Result<String, SessionError> {
        self.console.ask(prompt)?.ok_or(SessionError::InputClosed)
    }

    fn heading(&mut self, title: &str) -> Result<(), SessionError> {
        let heading = ui::section_heading(self.console.palette(), title);
        self.console.print(&heading)?;
        Ok(())
    }

    fn add(&mut self) -> Result<(), SessionError> {
        self.heading("Add a New Note")?;
        let mut title = self.ask("Title: ")?;
        while title.trim().is_empty() {
            self.console.warn("Title cannot be empty.")?;
            title = self.ask("Title: ")?;
        }
        let content = self.ask("Content: ")?;
        let tags = self.ask("Tags (separated by commas, e.g. work,school,todo): ")?;

        let result = self.store.add(NoteDraft::from_input(&title, &content, &tags));
        if recover(&mut self.console, result)?.is_some() {
            self.console.success("Note added successfully!")?;
        }
        Ok(())
    }

    fn list(&mut self) -> Result<(), SessionError> {
        self.heading("All Notes")?;
        self.print_all()
    }

    fn print_all(&mut self) -> Result<(), SessionError> {
        let rendered = ui::format_note_list(self.store.notes(), self.console.palette());
        self.console.print(&rendered)?;
        Ok(())
    }

    fn search(&mut self) -> Result<(), SessionError> {
        self.heading("Search Notes")?;
        let keyword = self.ask("Enter keyword: ")?;
        if normalize_term(&keyword).is_none() {
            self.console.warn("No keyword entered.")?;
            return Ok(());
        }

        let matches = self.store.search(&keyword);
        if matches.is_empty() {
            self.console.say("No notes found for this keyword.")?;
            return Ok(());
        }
        let rendered = ui::format_matches(&matches, self.console.palette());
        let positions: Vec<usize> = matches.iter().map(|found| found.position).collect();
        self.console
            .say(&format!("\nFound {} note(s):", positions.len()))?;
        self.console.print(&rendered)?;

        self.search_follow_up(&positions)
    }

    /// Lets the user edit or delete one of the notes just found, by its global number.
    fn search_follow_up(&mut self, found: &[usize]) -> Result<(), SessionError> {
        let answer =
            self.ask("\nEdit or delete one of these notes? (e = edit, d = delete, Enter to skip): ")?;
        let action = match answer.trim().to_lowercase().as_str() {
            "" => return Ok(()),
            "e" | "edit" => FollowUp::Edit,
            "d" | "delete" => FollowUp::Delete,
            _ => {
                self.console.warn("Invalid option.")?;
                return Ok(());
            }
        };

        let raw = self.ask("Enter the note number: ")?;
        let result = self.store.parse_position(&raw);
        let Some(position) = recover(&mut self.console, result)? else {
            return Ok(());
        };
        if !found.contains(&position.get()) {
            self.console
                .warn("That note is not among the search results.")?;
            return Ok(());
        }

        match action {
            FollowUp::Edit => self.edit_at(position),
            FollowUp::Delete => self.delete_at(position),
        }
    }

    fn filter(&mut self) -> Result<(), SessionError> {
        self.heading("Filter Notes by Tag")?;
        let raw = self.ask("Enter tag: ")?;
        let Some(tag) = normalize_term(&raw) else {
            self.console.warn("No tag entered.")?;
            return Ok(());
        };

        let matches = self.store.filter_by_tag(&tag);
        if matches.is_empty() {
            self.console.say("No notes with this tag.")?;
            return Ok(());
        }
        let rendered = ui::format_matches(&matches, self.console.palette());
        let count = matches.len();
        self.console
            .say(&format!("\nFound {count} note(s) with tag '{tag}':"))?;
        self.console.print(&rendered)?;
        Ok(())
    }

    fn edit(&mut self) -> Result<(), SessionError> {
        self.heading("Edit a Note")?;
        let Some(position) = self.pick_position("No notes to edit.", "Enter the note number to edit: ")?
        else {
            return Ok(());
        };
        self.edit_at(position)
    }

    fn delete(&mut self) -> Result<(), SessionError> {
        self.heading("Delete a Note")?;
        let Some(position) =
            self.pick_position("No notes to delete.", "Enter the note number to delete: ")?
        else {
            return Ok(());
        };
        self.delete_at(position)
    }

    /// Shows every note and asks for a number; `None` means the operation was aborted.
    fn pick_position(
        &mut self,
        empty_message: &str,
        prompt: &str,
    ) -> Result<Option<Position>, SessionError> {
        if self.store.is_empty() {
            self.console.say(empty_message)?;
            return Ok(None);
        }
        self.heading("All Notes")?;
        self.print_all()?;

        let raw = self.ask(prompt)?;
        let result = self.store.parse_position(&raw);
        recover(&mut self.console, result)
    }

    fn edit_at(&mut self, position: Position) -> Result<(), SessionError> {
        let Some(note) = self.store.get(position) else {
            return Ok(());
        };
        let title = note.title.clone();
        let tags = note.tags.join(", ");

        self.console
            .say(&format!("\nEditing note [{position}] - {title}"))?;
        let new_title = self.ask(&format!("New title (Enter to keep: '{title}'): "))?;
        let new_content = self.ask("New content (Enter to keep current): ")?;
        let new_tags = self.ask(&format!(
            "New tags (comma separated) (Enter to keep: {tags}): "
        ))?;

        let patch = NotePatch::from_answers(&new_title, &new_content, &new_tags);
        let result = self.store.edit(position, patch);
        if recover(&mut self.console, result)?.is_some() {
            self.console.success("Note updated successfully!")?;
        }
        Ok(())
    }

    fn delete_at(&mut self, position: Position) -> Result<(), SessionError> {
        let Some(note) = self.store.get(position) else {
            return Ok(());
        };
        let title = note.title.clone();

        let confirm = self.ask(&format!(
            "Are you sure you want to delete '{title}'? (y/n): "
        ))?;
        if confirm.trim() != "y" {
            self.console.say("Delete cancelled.")?;
            return Ok(());
        }

        let result = self.store.delete(position);
        if recover(&mut self.console, result)?.is_some() {
            self.console.success("Note deleted.")?;
        }
        Ok(())
    }

    fn sort(&mut self) -> Result<(), SessionError> {
        let menu = ui::format_sort_menu(self.console.palette());
        self.console.print(&menu)?;
        let raw = self.ask("Choose sort option: ")?;
        let policy = match raw.parse::<SortPolicy>() {
            Ok(policy) => policy,
            Err(err) => {
                debug!("event=sort_rejected reason=\"{err}\"");
                self.console.warn("Invalid sort option.")?;
                return Ok(());
            }
        };

        let result = self.store.sort(policy);
        if recover(&mut self.console, result)?.is_some() {
            self.console
                .success(&format!("Notes sorted: {}.", policy.label()))?;
        }
        Ok(())
    }
}

/// Turns input-validation failures into a user message; storage failures propagate.
fn recover<T, R: BufRead, W: Write>(
    console: &mut Console<R, W>,
    result: Result<T, StoreError>,
) -> Result<Option<T>, SessionError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_validation() => {
            match &err {
                StoreError::OutOfRange { value, len } => {
                    debug!("event=position_rejected value={value} len={len}");
                }
                StoreError::InvalidNumber(raw) => {
                    debug!(
                        "event=position_rejected reason=not_a_number chars={}",
                        raw.chars().count()
                    );
                }
                _ => {}
            }
            console.warn(&err.to_string())?;
            Ok(None)
        }
        Err(err) => Err(err.into()),
    }
}

#[cfg(test)]
#[path = "menu_tests_ext.rs"]
mod tests;
