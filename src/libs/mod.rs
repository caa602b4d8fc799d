//! Domain types and the logic that sits between the CLI and the store.

pub mod agenda;
pub mod auth;
pub mod config;
pub mod dashboard;
pub mod data_storage;
pub mod dates;
pub mod export;
pub mod formatter;
pub mod meals;
pub mod messages;
pub mod session;
pub mod task;
pub mod view;
pub mod vocabulary;
