//! SQLite persistence for every MECS record.
//!
//! [`db::Db`] owns the connection and applies migrations on open. Each
//! record family has a borrowed repository (`Youngs::new(&db)`, `Events::new(&db)`,
//! ...) returning [`error::StoreError`] on failure.

/// Connection setup and pragmas.
pub mod db;

/// Typed store errors and their mapping from SQLite codes.
pub mod error;

/// Versioned schema migrations.
pub mod migrations;

/// Many-to-many link tables between residents and events, trips and transmissions.
pub mod links;

pub mod contacts;
pub mod daily_life;
pub mod events;
pub mod projets;
pub mod reports;
pub mod services;
pub mod tasks;
pub mod tasks_hebdo;
pub mod transmissions;
pub mod trips;
pub mod users;
pub mod vehicles;
pub mod youngs;
