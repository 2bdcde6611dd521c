use std::error::Error;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use log::{debug, info, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use uuid::Uuid;

use crate::domain::note::Note;

const JSON_INDENT: &[u8] = b"    ";

/// Whole-collection persistence. `save` replaces everything `load` would return.
pub trait NoteStorage {
    fn load(&self) -> Result<Vec<Note>, StorageError>;
    fn save(&mut self, notes: &[Note]) -> Result<(), StorageError>;
}

#[derive(Debug)]
pub enum StorageError {
    Io { path: PathBuf, source: std::io::Error },
    Serialize(serde_json::Error),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io { path, source } => {
                write!(f, "notes file I/O error at {}: {}", path.display(), source)
            }
            StorageError::Serialize(err) => write!(f, "failed to encode notes: {}", err),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StorageError::Io { source, .. } => Some(source),
            StorageError::Serialize(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(value: serde_json::Error) -> Self {
        StorageError::Serialize(value)
    }
}

/// Pretty JSON array on disk, rewritten through a temp file and rename.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .and_then(|value| value.to_str())
            .unwrap_or("notes.json");
        let temp_name = format!(".{name}.tmp-{}", Uuid::now_v7().simple());
        match self.path.parent() {
            Some(parent) => parent.join(temp_name),
            None => PathBuf::from(temp_name),
        }
    }
}

impl NoteStorage for JsonFileStorage {
    fn load(&self) -> Result<Vec<Note>, StorageError> {
        let raw = match fs::read(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    "event=notes_load status=missing path={}",
                    self.path.display()
                );
                return Ok(Vec::new());
            }
            Err(err) => return Err(self.io_error(err)),
        };

        match serde_json::from_slice::<Vec<Note>>(&raw) {
            Ok(notes) => {
                info!(
                    "event=notes_load status=ok path={} count={}",
                    self.path.display(),
                    notes.len()
                );
                Ok(notes)
            }
            Err(err) => {
                warn!(
                    "event=notes_load status=unparseable path={} line={} column={}",
                    self.path.display(),
                    err.line(),
                    err.column()
                );
                Ok(Vec::new())
            }
        }
    }

    fn save(&mut self, notes: &[Note]) -> Result<(), StorageError> {
        let encoded = encode_notes(notes)?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|err| self.io_error(err))?;
        }

        let temp_path = self.temp_path();
        let written = write_synced(&temp_path, &encoded)
            .and_then(|()| fs::rename(&temp_path, &self.path));
        if let Err(err) = written {
            let _ = fs::remove_file(&temp_path);
            return Err(self.io_error(err));
        }

        debug!(
            "event=notes_save status=ok path={} count={} bytes={}",
            self.path.display(),
            notes.len(),
            encoded.len()
        );
        Ok(())
    }
}

/// Encodes notes the way they are stored: 4-space indented JSON, UTF-8 kept as-is.
pub fn encode_notes(notes: &[Note]) -> Result<Vec<u8>, serde_json::Error> {
    let mut out = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    notes.serialize(&mut serializer)?;
    Ok(out)
}

fn write_synced(path: &Path, bytes: &[u8]) -> std::io::Result<()> {
    let mut file = OpenOptions::new()
        .create_new(true)
        .write(true)
        .open(path)?;
    file.write_all(bytes)?;
    file.sync_all()
}

/// Keeps the persisted copy in memory; used to test the store without touching disk.
#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    pub saved: Vec<Note>,
    pub saves: usize,
    pub fail_saves: bool,
}

#[cfg(test)]
impl MemoryStorage {
    pub fn with_notes(notes: Vec<Note>) -> Self {
        Self {
            saved: notes,
            ..Self::default()
        }
    }
}

#[cfg(test)]
impl NoteStorage for MemoryStorage {
    fn load(&self) -> Result<Vec<Note>, StorageError> {
        Ok(self.saved.clone())
    }

    fn save(&mut self, notes: &[Note]) -> Result<(), StorageError> {
        if self.fail_saves {
            return Err(StorageError::Io {
                path: PathBuf::from("<memory>"),
                source: std::io::Error::new(ErrorKind::Other, "save disabled"),
            });
        }
        self.saved = notes.to_vec();
        self.saves += 1;
        Ok(())
    }
}

#[cfg(test)]
#[path = "storage_tests_ext.rs"]
mod tests;
