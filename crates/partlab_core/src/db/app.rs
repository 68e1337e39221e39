//! Connection factory configured from [`Settings`].

use super::{open_db, open_db_in_memory, DbResult};
use crate::config::Settings;
use rusqlite::Connection;

/// Hands out one freshly bootstrapped connection per request.
#[derive(Debug, Clone)]
pub struct DatabaseApp {
    settings: Settings,
}

impl DatabaseApp {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Opens the configured database file, or a private in-memory database
    /// when no path is configured.
    pub fn connect(&self) -> DbResult<Connection> {
        match self.settings.database_path.as_deref() {
            Some(path) => open_db(path),
            None => open_db_in_memory(),
        }
    }
}
