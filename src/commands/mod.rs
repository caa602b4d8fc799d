pub mod agenda;
pub mod contact;
pub mod dashboard;
pub mod event;
pub mod export;
pub mod hebdo;
pub mod init;
pub mod login;
pub mod logout;
pub mod meals;
pub mod migrations;
pub mod presence;
pub mod projet;
pub mod prompt;
pub mod report;
pub mod service;
pub mod settings;
pub mod task;
pub mod transmission;
pub mod trip;
pub mod user;
pub mod vehicle;
pub mod young;

use crate::db::db::Db;
use crate::db::error::StoreError;
use crate::db::users::Users;
use crate::libs::config::Config;
use crate::libs::messages::Message;
use crate::libs::session::Session;
use crate::msg_error_anyhow;
use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Debug, Subcommand)]
enum Commands {
    #[command(about = "Create the database and the default administrator account")]
    Init,
    #[command(about = "Log in as a staff member")]
    Login(login::LoginArgs),
    #[command(about = "Forget the logged-in staff member")]
    Logout,
    #[command(about = "Show the logged-in staff member")]
    Whoami,
    #[command(about = "Show or change display settings")]
    Settings(settings::SettingsArgs),
    #[command(about = "Today's events, urgent tasks and latest transmissions")]
    Dashboard(dashboard::DashboardArgs),
    #[command(about = "Manage services (administrators)")]
    Service(service::ServiceArgs),
    #[command(about = "Manage staff accounts (administrators)")]
    User(user::UserArgs),
    #[command(about = "Manage residents")]
    Young(young::YoungArgs),
    #[command(about = "Manage a resident's family contacts")]
    Contact(contact::ContactArgs),
    #[command(about = "Manage agenda events")]
    Event(event::EventArgs),
    #[command(about = "Show the weekly or daily agenda")]
    Agenda(agenda::AgendaArgs),
    #[command(about = "Manage one-off tasks")]
    Task(task::TaskArgs),
    #[command(about = "Manage recurring weekly tasks")]
    Hebdo(hebdo::HebdoArgs),
    #[command(about = "Write and read shift handoff notes")]
    Transmission(transmission::TransmissionArgs),
    #[command(about = "Write, validate and list reports")]
    Report(report::ReportArgs),
    #[command(about = "Manage personalised care projects")]
    Projet(projet::ProjetArgs),
    #[command(about = "Manage vehicles (administrators)")]
    Vehicle(vehicle::VehicleArgs),
    #[command(about = "Record vehicle trips")]
    Trip(trip::TripArgs),
    #[command(about = "Daily presence of residents")]
    Presence(presence::PresenceArgs),
    #[command(about = "Staff meals and meal headcounts")]
    Meals(meals::MealsArgs),
    #[command(about = "Export a report, a project or a period summary")]
    Export(export::ExportArgs),
    #[command(about = "Database migration management")]
    Migrations(migrations::MigrationsArgs),
}

#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
#[command(arg_required_else_help(true))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn menu() -> Result<()> {
        let cli = Self::parse();
        match cli.command {
            Commands::Init => init::cmd(),
            Commands::Login(args) => login::cmd(args),
            Commands::Logout => logout::cmd(),
            Commands::Whoami => login::whoami(),
            Commands::Settings(args) => settings::cmd(args),
            Commands::Dashboard(args) => dashboard::cmd(args),
            Commands::Service(args) => service::cmd(args),
            Commands::User(args) => user::cmd(args),
            Commands::Young(args) => young::cmd(args),
            Commands::Contact(args) => contact::cmd(args),
            Commands::Event(args) => event::cmd(args),
            Commands::Agenda(args) => agenda::cmd(args),
            Commands::Task(args) => task::cmd(args),
            Commands::Hebdo(args) => hebdo::cmd(args),
            Commands::Transmission(args) => transmission::cmd(args),
            Commands::Report(args) => report::cmd(args),
            Commands::Projet(args) => projet::cmd(args),
            Commands::Vehicle(args) => vehicle::cmd(args),
            Commands::Trip(args) => trip::cmd(args),
            Commands::Presence(args) => presence::cmd(args),
            Commands::Meals(args) => meals::cmd(args),
            Commands::Export(args) => export::cmd(args),
            Commands::Migrations(args) => migrations::cmd(args),
        }
    }
}

/// Opens the database configured for this installation.
pub(crate) fn open_db() -> Result<Db> {
    Db::new(&Config::read()?)
}

/// The logged-in staff member and the service they belong to.
pub(crate) struct Viewer {
    pub session: Session,
    pub service_id: Option<i64>,
}

impl Viewer {
    pub fn require(db: &Db) -> Result<Self> {
        Self::resolve(db, Session::require()?)
    }

    pub fn require_admin(db: &Db) -> Result<Self> {
        Self::resolve(db, Session::require_admin()?)
    }

    fn resolve(db: &Db, session: Session) -> Result<Self> {
        let user = Users::new(db)
            .get(session.user.id)
            .map_err(store_failure)?
            .ok_or_else(|| msg_error_anyhow!(Message::LoginRequired))?;
        Ok(Self {
            service_id: user.service_id,
            session,
        })
    }

    pub fn user_id(&self) -> i64 {
        self.session.user.id
    }

    /// `--all` lifts the default narrowing to the viewer's own service.
    pub fn service_filter(&self, all: bool) -> Option<i64> {
        service_scope(self.service_id, None, all)
    }

    /// Like [`Viewer::service_filter`], with `--service <id>` picking any
    /// other service.
    pub fn scope(&self, service: Option<i64>, all: bool) -> Option<i64> {
        service_scope(self.service_id, service, all)
    }
}

/// Service a listing is narrowed to: the chosen one, none with `all`, the
/// viewer's own otherwise.
pub fn service_scope(own: Option<i64>, chosen: Option<i64>, all: bool) -> Option<i64> {
    match (chosen, all) {
        (Some(service), _) => Some(service),
        (None, true) => None,
        (None, false) => own,
    }
}

/// Turns a data-layer failure into the message shown to the user. Anything
/// that is not a known constraint case is logged and reported generically.
pub(crate) fn store_failure(err: StoreError) -> anyhow::Error {
    let message = match &err {
        StoreError::Duplicate(_) if err.is_duplicate_of("users.identifiant") => Message::DuplicateLogin,
        StoreError::Duplicate(_) if err.is_duplicate_of("users.email") => Message::DuplicateEmail,
        StoreError::Duplicate(_) if err.is_duplicate_of("services.nom_service") => Message::DuplicateServiceName,
        StoreError::Duplicate(_) if err.is_duplicate_of("vehicles.plaque_immatriculation") => Message::DuplicatePlate,
        StoreError::Duplicate(_) if err.is_duplicate_of("projet_p.young_id") => Message::DuplicateProjet,
        StoreError::Duplicate(column) => Message::DuplicateRecord(column.clone()),
        StoreError::InUse("vehicle") => Message::VehicleInUse,
        StoreError::InUse(entity) => Message::RecordInUse(entity.to_string()),
        StoreError::NotFound { entity, id } => Message::RecordNotFound(entity.to_string(), *id),
        StoreError::ForeignKey => Message::MissingReference,
        StoreError::Invalid { field, value } => Message::InvalidValue(field.to_string(), value.clone()),
        StoreError::Sqlite(e) => {
            tracing::error!(error = %e, "database operation failed");
            Message::OperationFailed
        }
    };
    msg_error_anyhow!(message)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chosen_service_overrides_own() {
        assert_eq!(service_scope(Some(1), Some(2), false), Some(2));
        assert_eq!(service_scope(None, Some(2), false), Some(2));
    }

    #[test]
    fn all_lifts_own_service() {
        assert_eq!(service_scope(Some(1), None, true), None);
        assert_eq!(service_scope(Some(1), None, false), Some(1));
        assert_eq!(service_scope(None, None, false), None);
    }
}
