//! The logged-in identity, persisted between command invocations.

use super::auth::AuthenticatedUser;
use super::data_storage::DataStorage;
use crate::libs::messages::Message;
use crate::msg_error_anyhow;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const SESSION_FILE_NAME: &str = "session.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub user: AuthenticatedUser,
    pub login: String,
}

impl Session {
    pub fn path() -> Result<PathBuf> {
        Ok(DataStorage::new().get_path(SESSION_FILE_NAME)?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(&file, self)?;
        Ok(())
    }

    pub fn load_from(path: &Path) -> Result<Option<Session>> {
        if !path.exists() {
            return Ok(None);
        }
        let raw = fs::read_to_string(path)?;
        match serde_json::from_str(&raw) {
            Ok(session) => Ok(Some(session)),
            Err(e) => {
                tracing::warn!("discarding unreadable session file: {}", e);
                Ok(None)
            }
        }
    }

    /// Removes the session file. Returns whether a session existed.
    pub fn clear_at(path: &Path) -> Result<bool> {
        if path.exists() {
            fs::remove_file(path)?;
            return Ok(true);
        }
        Ok(false)
    }

    pub fn current() -> Result<Option<Session>> {
        Self::load_from(&Self::path()?)
    }

    /// The current session, or an error asking the user to log in.
    pub fn require() -> Result<Session> {
        Self::current()?.ok_or_else(|| msg_error_anyhow!(Message::LoginRequired))
    }

    /// The current session when it carries the administrative level.
    pub fn require_admin() -> Result<Session> {
        let session = Self::require()?;
        if !session.user.is_admin() {
            return Err(msg_error_anyhow!(Message::AdminRequired));
        }
        Ok(session)
    }
}
