use std::error::Error;
use std::fmt;
use std::io::{BufRead, Write};

use log::info;

use crate::cli::Cli;
use crate::config::{Config, ConfigError};
use crate::console::Console;
use crate::gate::{AccessGate, GateOutcome};
use crate::logging;
use crate::menu::{Session, SessionError};
use crate::storage::JsonFileStorage;
use crate::store::{NoteStore, StoreError};

/// Loads config, starts logging, passes the gate, then hands the terminal to the menu.
pub fn run<R: BufRead, W: Write>(cli: &Cli, mut console: Console<R, W>) -> Result<(), AppError> {
    let config = match cli.config.as_deref() {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(dir) = config.logging.dir.as_deref() {
        logging::init_logging(&config.logging.level, dir).map_err(AppError::Logging)?;
    }

    if let Some(gate) = AccessGate::from_config(&config.access) {
        if gate.challenge(&mut console)? == GateOutcome::Denied {
            return Err(AppError::AccessDenied);
        }
    }

    let notes_path = config.notes_path(cli.file.as_deref());
    info!("event=session_start notes_path={}", notes_path.display());
    let store = NoteStore::open(JsonFileStorage::new(notes_path))?;
    Session::new(store, console).run()?;
    Ok(())
}

#[derive(Debug)]
pub enum AppError {
    Io(std::io::Error),
    Config(ConfigError),
    Logging(String),
    Store(StoreError),
    Session(SessionError),
    AccessDenied,
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Io(err) => write!(f, "I/O error: {}", err),
            AppError::Config(err) => write!(f, "{}", err),
            AppError::Logging(message) => write!(f, "logging setup failed: {}", message),
            AppError::Store(err) => write!(f, "{}", err),
            AppError::Session(err) => write!(f, "{}", err),
            AppError::AccessDenied => write!(f, "access denied"),
        }
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            AppError::Io(err) => Some(err),
            AppError::Config(err) => Some(err),
            AppError::Logging(_) => None,
            AppError::Store(err) => Some(err),
            AppError::Session(err) => Some(err),
            AppError::AccessDenied => None,
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        AppError::Io(value)
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        AppError::Config(value)
    }
}

impl From<StoreError> for AppError {
    fn from(value: StoreError) -> Self {
        AppError::Store(value)
    }
}

impl From<SessionError> for AppError {
    fn from(value: SessionError) -> Self {
        AppError::Session(value)
    }
}
