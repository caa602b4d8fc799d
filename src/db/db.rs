use super::migrations::init_with_migrations;
use crate::libs::auth::ensure_admin;
use crate::libs::config::Config;
use crate::libs::data_storage::DataStorage;
use anyhow::Result;
use rusqlite::Connection;
use std::env;
use std::path::{Path, PathBuf};

pub const DB_FILE_NAME: &str = "mecs.db";

/// Environment variable overriding every other database location.
pub const DB_PATH_ENV: &str = "MECS_DB";

/// One open SQLite file with foreign keys enforced and the schema migrated.
///
/// Repositories borrow the connection for the duration of a call, so a single
/// `Db` per process serves every screen.
pub struct Db {
    pub conn: Connection,
}

impl Db {
    /// Opens the installation database, creating the bootstrap administrator
    /// when no account exists.
    pub fn new(config: &Config) -> Result<Db> {
        let db = Self::open(Self::resolve_path(config)?)?;
        ensure_admin(&db)?;
        Ok(db)
    }

    /// `MECS_DB`, then the configured path, then `mecs.db` in the data directory.
    pub fn resolve_path(config: &Config) -> Result<PathBuf> {
        if let Ok(path) = env::var(DB_PATH_ENV) {
            if !path.trim().is_empty() {
                return Ok(PathBuf::from(path));
            }
        }
        if let Some(path) = &config.database_path {
            return Ok(path.clone());
        }
        Ok(DataStorage::new().get_path(DB_FILE_NAME)?)
    }

    pub fn open(path: impl AsRef<Path>) -> Result<Db> {
        let mut conn = Connection::open(path.as_ref())?;
        Self::configure(&conn)?;
        init_with_migrations(&mut conn)?;
        tracing::debug!("database opened at {}", path.as_ref().display());
        Ok(Db { conn })
    }

    pub fn open_in_memory() -> Result<Db> {
        let mut conn = Connection::open_in_memory()?;
        Self::configure(&conn)?;
        init_with_migrations(&mut conn)?;
        Ok(Db { conn })
    }

    /// Raw connection for schema inspection; pending migrations are not applied.
    pub fn new_without_migrations(config: &Config) -> Result<Connection> {
        let conn = Connection::open(Self::resolve_path(config)?)?;
        Self::configure(&conn)?;
        Ok(conn)
    }

    fn configure(conn: &Connection) -> rusqlite::Result<()> {
        conn.pragma_update(None, "foreign_keys", "ON")
    }
}
