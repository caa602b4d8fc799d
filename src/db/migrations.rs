//! Database schema migration management and versioning.
//!
//! Migrations are registered in order, recorded in a `migrations` table and
//! applied together inside one transaction when a database is opened.
//!
//! ```rust,no_run
//! use mecs::db::migrations::{init_with_migrations, get_db_version};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open("mecs.db")?;
//! init_with_migrations(&mut conn)?;
//! let version = get_db_version(&conn)?;
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::libs::messages::Message;
use crate::{msg_debug, msg_error};
use anyhow::Result;
use rusqlite::{params, Connection, Transaction};

const MIGRATIONS_TABLE: &str = "
CREATE TABLE IF NOT EXISTS migrations (
    id INTEGER PRIMARY KEY,
    version INTEGER NOT NULL UNIQUE,
    name TEXT NOT NULL,
    applied_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
)";

/// Base schema. Optional references to services, users and referents are
/// nulled on delete; link tables and per-person daily rows cascade; trips keep
/// a plain reference so a vehicle, driver or service used by a trip cannot be
/// deleted.
const SCHEMA: &[&str] = &[
    "CREATE TABLE IF NOT EXISTS services (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nom_service TEXT NOT NULL UNIQUE,
        adresse TEXT,
        telephone TEXT
    )",
    "CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nom TEXT NOT NULL,
        prenom TEXT NOT NULL,
        identifiant TEXT NOT NULL UNIQUE,
        mot_de_passe TEXT NOT NULL,
        niveau_authentification TEXT NOT NULL DEFAULT 'standard',
        adresse TEXT,
        telephone TEXT,
        email TEXT UNIQUE,
        service_id INTEGER,
        FOREIGN KEY (service_id) REFERENCES services(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS youngs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nom TEXT NOT NULL,
        prenom TEXT NOT NULL,
        date_naissance DATE,
        lieu_naissance TEXT,
        date_entree DATE,
        type_placement TEXT,
        type_accompagnement TEXT,
        statut_accueil TEXT NOT NULL,
        referent_id INTEGER,
        co_referent_id INTEGER,
        date_echeance_placement DATE,
        date_audience DATE,
        date_synthese_pec DATE,
        date_echeance_cjm DATE,
        date_sortie DATE,
        service_id INTEGER,
        FOREIGN KEY (referent_id) REFERENCES users(id) ON DELETE SET NULL,
        FOREIGN KEY (co_referent_id) REFERENCES users(id) ON DELETE SET NULL,
        FOREIGN KEY (service_id) REFERENCES services(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS young_contacts (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        young_id INTEGER NOT NULL,
        nom TEXT NOT NULL,
        prenom TEXT,
        lien_parente TEXT,
        adresse TEXT,
        telephone TEXT,
        email TEXT,
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS events (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        nom_evenement TEXT NOT NULL,
        debut_datetime DATETIME NOT NULL,
        fin_datetime DATETIME NOT NULL,
        type_evenement TEXT,
        user_id INTEGER,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS event_young_link (
        event_id INTEGER NOT NULL,
        young_id INTEGER NOT NULL,
        PRIMARY KEY (event_id, young_id),
        FOREIGN KEY (event_id) REFERENCES events(id) ON DELETE CASCADE,
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS tasks (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        tache_a_realiser TEXT NOT NULL,
        date_limite DATE,
        statut TEXT NOT NULL DEFAULT 'à faire',
        user_id INTEGER,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS task_young_link (
        task_id INTEGER NOT NULL,
        young_id INTEGER NOT NULL,
        PRIMARY KEY (task_id, young_id),
        FOREIGN KEY (task_id) REFERENCES tasks(id) ON DELETE CASCADE,
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS tasks_hebdo (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        jour_semaine TEXT NOT NULL,
        tache_hebdomadaire TEXT NOT NULL,
        service_id INTEGER NOT NULL,
        FOREIGN KEY (service_id) REFERENCES services(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS reports (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        type_rapport TEXT NOT NULL,
        date_redaction DATE,
        young_id INTEGER NOT NULL,
        redacteur_id INTEGER NOT NULL,
        validateur_id INTEGER,
        rappel_situation TEXT,
        accueil TEXT,
        scolarite TEXT,
        soin_sante TEXT,
        famille TEXT,
        psychologique TEXT,
        preconisations TEXT,
        statut TEXT NOT NULL DEFAULT 'en attente',
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE,
        FOREIGN KEY (redacteur_id) REFERENCES users(id) ON DELETE CASCADE,
        FOREIGN KEY (validateur_id) REFERENCES users(id) ON DELETE SET NULL
    )",
    "CREATE TABLE IF NOT EXISTS projet_p (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date_projet DATE NOT NULL,
        young_id INTEGER NOT NULL UNIQUE,
        rappel_situation TEXT,
        attentes_jeune TEXT,
        attentes_famille TEXT,
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS projet_p_objectifs (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        projet_p_id INTEGER NOT NULL,
        objectif TEXT NOT NULL,
        categorie TEXT,
        evaluation TEXT,
        FOREIGN KEY (projet_p_id) REFERENCES projet_p(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS projet_p_moyens (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        objectif_id INTEGER NOT NULL,
        moyen TEXT NOT NULL,
        FOREIGN KEY (objectif_id) REFERENCES projet_p_objectifs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS transmissions (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        service_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        datetime_transmission DATETIME NOT NULL,
        categorie TEXT,
        contenu TEXT NOT NULL,
        couleur TEXT NOT NULL DEFAULT 'gris',
        FOREIGN KEY (service_id) REFERENCES services(id) ON DELETE CASCADE,
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS transmission_young_link (
        transmission_id INTEGER NOT NULL,
        young_id INTEGER NOT NULL,
        PRIMARY KEY (transmission_id, young_id),
        FOREIGN KEY (transmission_id) REFERENCES transmissions(id) ON DELETE CASCADE,
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS vehicles (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        marque TEXT NOT NULL,
        modele TEXT NOT NULL,
        plaque_immatriculation TEXT NOT NULL UNIQUE,
        nombre_places INTEGER,
        puissance_fiscale INTEGER
    )",
    "CREATE TABLE IF NOT EXISTS trips (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date_trajet DATE NOT NULL,
        heure_depart TIME NOT NULL,
        heure_retour TIME,
        motif TEXT,
        service_id INTEGER NOT NULL,
        user_id INTEGER NOT NULL,
        vehicle_id INTEGER NOT NULL,
        km_depart INTEGER NOT NULL,
        km_retour INTEGER,
        FOREIGN KEY (service_id) REFERENCES services(id),
        FOREIGN KEY (user_id) REFERENCES users(id),
        FOREIGN KEY (vehicle_id) REFERENCES vehicles(id)
    )",
    "CREATE TABLE IF NOT EXISTS trip_young_link (
        trip_id INTEGER NOT NULL,
        young_id INTEGER NOT NULL,
        PRIMARY KEY (trip_id, young_id),
        FOREIGN KEY (trip_id) REFERENCES trips(id) ON DELETE CASCADE,
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS daily_presence (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date DATE NOT NULL,
        young_id INTEGER NOT NULL,
        presence_status TEXT NOT NULL,
        repas_midi TEXT,
        repas_soir TEXT,
        UNIQUE (date, young_id),
        FOREIGN KEY (young_id) REFERENCES youngs(id) ON DELETE CASCADE
    )",
    "CREATE TABLE IF NOT EXISTS professional_meals (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date DATE NOT NULL,
        user_id INTEGER NOT NULL,
        repas_midi TEXT,
        repas_soir TEXT,
        UNIQUE (date, user_id),
        FOREIGN KEY (user_id) REFERENCES users(id) ON DELETE CASCADE
    )",
];

const INDICES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_users_service ON users(service_id)",
    "CREATE INDEX IF NOT EXISTS idx_youngs_service ON youngs(service_id)",
    "CREATE INDEX IF NOT EXISTS idx_young_contacts_young ON young_contacts(young_id)",
    "CREATE INDEX IF NOT EXISTS idx_events_debut ON events(debut_datetime)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_date_limite ON tasks(date_limite)",
    "CREATE INDEX IF NOT EXISTS idx_tasks_hebdo_service_day ON tasks_hebdo(service_id, jour_semaine)",
    "CREATE INDEX IF NOT EXISTS idx_reports_young ON reports(young_id)",
    "CREATE INDEX IF NOT EXISTS idx_transmissions_datetime ON transmissions(datetime_transmission)",
    "CREATE INDEX IF NOT EXISTS idx_trips_date ON trips(date_trajet)",
    "CREATE INDEX IF NOT EXISTS idx_trips_vehicle ON trips(vehicle_id)",
    "CREATE INDEX IF NOT EXISTS idx_daily_presence_date ON daily_presence(date)",
    "CREATE INDEX IF NOT EXISTS idx_professional_meals_date ON professional_meals(date)",
];

#[derive(Debug, Clone)]
struct Migration {
    version: u32,
    name: &'static str,
    up: fn(&Transaction) -> Result<()>,
}

/// Ordered registry of schema changes.
pub struct MigrationManager {
    migrations: Vec<Migration>,
}

impl MigrationManager {
    pub fn new() -> Self {
        let mut manager = Self { migrations: Vec::new() };
        manager.register_migrations();
        manager
    }

    fn register_migrations(&mut self) {
        self.add_migration(1, "create_facility_tables", |tx| {
            for statement in SCHEMA {
                tx.execute(statement, [])?;
            }
            Ok(())
        });

        self.add_migration(2, "add_lookup_indices", |tx| {
            for statement in INDICES {
                tx.execute(statement, [])?;
            }
            Ok(())
        });
    }

    fn add_migration(&mut self, version: u32, name: &'static str, up: fn(&Transaction) -> Result<()>) {
        self.migrations.push(Migration { version, name, up });
    }

    pub fn latest_version(&self) -> u32 {
        self.migrations.last().map(|m| m.version).unwrap_or(0)
    }

    pub fn run_migrations(&self, conn: &mut Connection) -> Result<()> {
        conn.execute(MIGRATIONS_TABLE, [])?;

        let current_version = self.get_current_version(conn)?;
        let pending: Vec<&Migration> = self.migrations.iter().filter(|m| m.version > current_version).collect();

        if pending.is_empty() {
            msg_debug!(Message::DatabaseUpToDate);
            return Ok(());
        }

        msg_debug!(Message::MigrationsFound(pending.len()));

        let tx = conn.transaction()?;
        for migration in pending {
            msg_debug!(Message::RunningMigration(migration.version, migration.name.to_string()));

            if let Err(e) = (migration.up)(&tx) {
                msg_error!(Message::MigrationFailed(migration.version, e.to_string()));
                return Err(e);
            }
            tx.execute(
                "INSERT INTO migrations (version, name) VALUES (?1, ?2)",
                params![migration.version, migration.name],
            )?;
        }
        tx.commit()?;
        tracing::info!(from = current_version, to = self.latest_version(), "{}", Message::AllMigrationsCompleted);

        Ok(())
    }

    fn get_current_version(&self, conn: &Connection) -> Result<u32> {
        let version: Option<u32> = conn.query_row("SELECT MAX(version) FROM migrations", [], |row| row.get(0)).unwrap_or(Some(0));
        Ok(version.unwrap_or(0))
    }

    pub fn is_migration_applied(&self, conn: &Connection, version: u32) -> Result<bool> {
        let count: i32 = conn.query_row("SELECT COUNT(*) FROM migrations WHERE version = ?1", params![version], |row| row.get(0))?;
        Ok(count > 0)
    }

    /// `(version, name, applied_at)` for every recorded migration.
    pub fn get_migration_history(&self, conn: &Connection) -> Result<Vec<(u32, String, String)>> {
        conn.execute(MIGRATIONS_TABLE, [])?;
        let mut stmt = conn.prepare("SELECT version, name, applied_at FROM migrations ORDER BY version")?;
        let history = stmt
            .query_map([], |row| Ok((row.get::<_, u32>(0)?, row.get::<_, String>(1)?, row.get::<_, String>(2)?)))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(history)
    }
}

impl Default for MigrationManager {
    fn default() -> Self {
        Self::new()
    }
}

pub fn init_with_migrations(conn: &mut Connection) -> Result<()> {
    MigrationManager::new().run_migrations(conn)
}

pub fn get_db_version(conn: &Connection) -> Result<u32> {
    MigrationManager::new().get_current_version(conn)
}

pub fn needs_migration(conn: &Connection) -> Result<bool> {
    let manager = MigrationManager::new();
    Ok(manager.get_current_version(conn)? < manager.latest_version())
}
