use rusqlite::ffi;
use thiserror::Error;

pub type StoreResult<T> = Result<T, StoreError>;

/// Failures surfaced by the repositories.
///
/// Constraint violations are classified from the SQLite extended result code
/// so that callers can tell a duplicate login from a duplicate e-mail, or a
/// vehicle still used by trips from a plain driver failure.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("{entity} #{id} not found")]
    NotFound { entity: &'static str, id: i64 },

    /// UNIQUE or PRIMARY KEY violation on `table.column`.
    #[error("duplicate value for {0}")]
    Duplicate(String),

    /// Delete refused because other rows still reference the record.
    #[error("{0} is still referenced")]
    InUse(&'static str),

    #[error("referenced record does not exist")]
    ForeignKey,

    #[error("invalid {field}: '{value}'")]
    Invalid { field: &'static str, value: String },

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl StoreError {
    pub fn not_found(entity: &'static str, id: i64) -> Self {
        StoreError::NotFound { entity, id }
    }

    /// True when the duplicate concerns `column` (`table.column`).
    pub fn is_duplicate_of(&self, column: &str) -> bool {
        matches!(self, StoreError::Duplicate(c) if c.split(',').any(|c| c.trim() == column))
    }

    /// Reinterprets a foreign key failure on delete as "still in use".
    pub fn in_use(self, entity: &'static str) -> Self {
        match self {
            StoreError::ForeignKey => StoreError::InUse(entity),
            other => other,
        }
    }
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        if let rusqlite::Error::SqliteFailure(code, message) = &err {
            match code.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return StoreError::Duplicate(constraint_columns(message.as_deref()));
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => return StoreError::ForeignKey,
                _ => {}
            }
        }
        StoreError::Sqlite(err)
    }
}

/// Extracts `table.column` from "UNIQUE constraint failed: table.column".
fn constraint_columns(message: Option<&str>) -> String {
    message
        .and_then(|m| m.split_once("failed:"))
        .map(|(_, columns)| columns.trim().to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_constraint_columns() {
        assert_eq!(constraint_columns(Some("UNIQUE constraint failed: users.email")), "users.email");
        assert_eq!(constraint_columns(None), "");
    }

    #[test]
    fn duplicate_matches_composite_keys() {
        let err = StoreError::Duplicate("daily_presence.date, daily_presence.young_id".into());
        assert!(err.is_duplicate_of("daily_presence.young_id"));
        assert!(!err.is_duplicate_of("users.email"));
    }

    #[test]
    fn foreign_key_becomes_in_use() {
        assert!(matches!(StoreError::ForeignKey.in_use("vehicle"), StoreError::InUse("vehicle")));
    }
}
