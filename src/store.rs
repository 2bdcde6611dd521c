use std::error::Error;
use std::fmt;

use log::info;

use crate::domain::note::{now_stamp, Note, NoteDraft, NotePatch};
use crate::domain::sort::SortPolicy;
use crate::listing::{self, NoteMatch};
use crate::storage::{NoteStorage, StorageError};

/// The in-memory note collection. Every mutation is persisted before it returns.
pub struct NoteStore<S: NoteStorage> {
    notes: Vec<Note>,
    storage: S,
}

/// A 1-based note number that was in range when it was checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Position(usize);

impl Position {
    pub fn get(self) -> usize {
        self.0
    }

    fn index(self) -> usize {
        self.0 - 1
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl<S: NoteStorage> NoteStore<S> {
    pub fn open(storage: S) -> Result<Self, StoreError> {
        let notes = storage.load()?;
        Ok(Self { notes, storage })
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    #[cfg(test)]
    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn get(&self, position: Position) -> Option<&Note> {
        self.notes.get(position.index())
    }

    /// Parses a user-typed note number and checks it against the current size.
    pub fn parse_position(&self, raw: &str) -> Result<Position, StoreError> {
        let trimmed = raw.trim();
        let value = match trimmed.parse::<i64>() {
            Ok(value) => value,
            Err(_) => return Err(self.unparsed_number(trimmed)),
        };
        let value = usize::try_from(value).map_err(|_| StoreError::OutOfRange {
            value,
            len: self.notes.len(),
        })?;
        self.position(value)
    }

    /// Integers too wide for `i64` are still integers: they are out of range, not invalid.
    fn unparsed_number(&self, trimmed: &str) -> StoreError {
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };
        if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
            return StoreError::InvalidNumber(trimmed.to_string());
        }
        StoreError::OutOfRange {
            value: if negative { i64::MIN } else { i64::MAX },
            len: self.notes.len(),
        }
    }

    pub fn position(&self, value: usize) -> Result<Position, StoreError> {
        if value == 0 || value > self.notes.len() {
            return Err(StoreError::OutOfRange {
                value: i64::try_from(value).unwrap_or(i64::MAX),
                len: self.notes.len(),
            });
        }
        Ok(Position(value))
    }

    pub fn add(&mut self, draft: NoteDraft) -> Result<&Note, StoreError> {
        if draft.title.trim().is_empty() {
            return Err(StoreError::EmptyTitle);
        }
        let note = Note::from_draft(draft, now_stamp());
        self.notes.push(note);
        self.persist()?;
        info!("event=note_add status=ok count={}", self.notes.len());
        let last = self.notes.len() - 1;
        Ok(&self.notes[last])
    }

    pub fn search(&self, keyword: &str) -> Vec<NoteMatch<'_>> {
        listing::search(&self.notes, keyword)
    }

    pub fn filter_by_tag(&self, tag: &str) -> Vec<NoteMatch<'_>> {
        listing::filter_by_tag(&self.notes, tag)
    }

    /// Applies the patch and persists, even when the patch changes nothing.
    pub fn edit(&mut self, position: Position, patch: NotePatch) -> Result<&Note, StoreError> {
        let position = self.position(position.get())?;
        let changed = !patch.is_empty();
        self.notes[position.index()].apply(patch);
        self.persist()?;
        info!("event=note_edit status=ok position={position} changed={changed}");
        Ok(&self.notes[position.index()])
    }

    pub fn delete(&mut self, position: Position) -> Result<Note, StoreError> {
        let position = self.position(position.get())?;
        let removed = self.notes.remove(position.index());
        self.persist()?;
        info!(
            "event=note_delete status=ok position={position} count={}",
            self.notes.len()
        );
        Ok(removed)
    }

    /// Stable reorder of the whole collection. Earlier positions are meaningless afterwards.
    pub fn sort(&mut self, policy: SortPolicy) -> Result<(), StoreError> {
        self.notes.sort_by(|left, right| policy.compare(left, right));
        self.persist()?;
        info!(
            "event=note_sort status=ok policy={policy} count={}",
            self.notes.len()
        );
        Ok(())
    }

    pub fn persist(&mut self) -> Result<(), StoreError> {
        self.storage.save(&self.notes)?;
        Ok(())
    }
}

#[derive(Debug)]
pub enum StoreError {
    Storage(StorageError),
    EmptyTitle,
    InvalidNumber(String),
    OutOfRange { value: i64, len: usize },
}

impl StoreError {
    /// Input problems the user can retry; everything else ends the session.
    pub fn is_validation(&self) -> bool {
        !matches!(self, StoreError::Storage(_))
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Storage(err) => write!(f, "{}", err),
            StoreError::EmptyTitle => write!(f, "Title cannot be empty."),
            StoreError::InvalidNumber(_) => write!(f, "Invalid number."),
            StoreError::OutOfRange { .. } => write!(f, "Note number out of range."),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Storage(err) => Some(err),
            StoreError::EmptyTitle => None,
            StoreError::InvalidNumber(_) => None,
            StoreError::OutOfRange { .. } => None,
        }
    }
}

impl From<StorageError> for StoreError {
    fn from(value: StorageError) -> Self {
        StoreError::Storage(value)
    }
}
