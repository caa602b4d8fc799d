use crate::{
    commands::store_failure,
    db::db::Db,
    libs::{
        auth::{ensure_admin, DEFAULT_ADMIN_LOGIN, DEFAULT_ADMIN_PASSWORD},
        config::Config,
        messages::Message,
    },
    msg_info, msg_success, msg_warning,
};
use anyhow::Result;

/// Creates the database file and its schema, then the first administrator
/// when no account exists yet.
pub fn cmd() -> Result<()> {
    let config = Config::read()?;
    let path = Db::resolve_path(&config)?;
    let db = Db::open(&path)?;
    msg_success!(Message::DatabaseReady(path.display().to_string()));

    if ensure_admin(&db).map_err(store_failure)? {
        msg_success!(Message::DefaultAdminCreated(DEFAULT_ADMIN_LOGIN.to_string()));
        msg_warning!(Message::ChangeDefaultPassword(DEFAULT_ADMIN_PASSWORD.to_string()));
    } else {
        msg_info!(Message::UsersAlreadyPresent);
    }
    Ok(())
}
