//! # Mecs
//!
//! Case management for a residential youth-care facility (MECS): residents
//! and their families, staff and services, the shared agenda, shift
//! handoffs, reports, personalised projects, vehicle trips, and the daily
//! presence and meal sheets.
//!
//! Everything lives in one SQLite file opened through [`db::db::Db`]; the
//! repositories under [`db`] are the only code that writes SQL.
//!
//! ```rust,no_run
//! use mecs::commands::Cli;
//!
//! fn main() -> anyhow::Result<()> {
//!     Cli::menu()
//! }
//! ```

pub mod commands;
pub mod db;
pub mod libs;
