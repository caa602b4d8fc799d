use crate::{
    db::{
        db::Db,
        migrations::{get_db_version, needs_migration, MigrationManager},
    },
    libs::{config::Config, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MigrationsArgs {
    #[command(subcommand)]
    command: MigrationsCommand,
}

#[derive(Debug, Subcommand)]
enum MigrationsCommand {
    /// Current schema version and whether migrations are pending
    Status,
    /// Applied migrations
    History,
    /// Apply pending migrations
    Run,
}

pub fn cmd(args: MigrationsArgs) -> Result<()> {
    let config = Config::read()?;
    let mut conn = Db::new_without_migrations(&config)?;

    match args.command {
        MigrationsCommand::Status => {
            let version = get_db_version(&conn)?;
            msg_print!(Message::DatabaseVersion(version, MigrationManager::new().latest_version()));
            if needs_migration(&conn)? {
                msg_info!(Message::DatabaseNeedsUpdate);
            } else {
                msg_info!(Message::DatabaseUpToDate);
            }
        }
        MigrationsCommand::History => {
            let history = MigrationManager::new().get_migration_history(&conn)?;
            if history.is_empty() {
                msg_info!(Message::NoMigrationsApplied);
                return Ok(());
            }
            msg_print!(Message::MigrationHistory, true);
            View::migrations(&history)?;
        }
        MigrationsCommand::Run => MigrationManager::new().run_migrations(&mut conn)?,
    }

    Ok(())
}
