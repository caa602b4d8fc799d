use super::db::Db;
use super::error::{StoreError, StoreResult};
use crate::libs::auth::hash_password;
use crate::libs::formatter::full_name;
use crate::libs::vocabulary::PermissionLevel;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const USER_COLUMNS: &str = "u.id, u.nom, u.prenom, u.identifiant, u.niveau_authentification,
    u.adresse, u.telephone, u.email, u.service_id, COALESCE(s.nom_service, 'N/A')";
const INSERT_USER: &str = "INSERT INTO users
    (nom, prenom, identifiant, mot_de_passe, niveau_authentification, adresse, telephone, email, service_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_USER: &str = "UPDATE users SET nom = ?2, prenom = ?3, identifiant = ?4, niveau_authentification = ?5,
    adresse = ?6, telephone = ?7, email = ?8, service_id = ?9 WHERE id = ?1";
const UPDATE_PASSWORD: &str = "UPDATE users SET mot_de_passe = ?2 WHERE id = ?1";
const DELETE_USER: &str = "DELETE FROM users WHERE id = ?1";
const SELECT_CREDENTIALS: &str = "SELECT id, mot_de_passe, niveau_authentification FROM users WHERE identifiant = ?1";
const COUNT_USERS: &str = "SELECT COUNT(*) FROM users";

/// A staff account. The password hash never leaves the repository.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<i64>,
    pub last_name: String,
    pub first_name: String,
    pub login: String,
    pub level: PermissionLevel,
    pub address: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub service_id: Option<i64>,
    /// Filled on reads; `N/A` when the user has no service.
    #[serde(skip_deserializing)]
    pub service_name: Option<String>,
}

impl User {
    pub fn new(last_name: &str, first_name: &str, login: &str, level: PermissionLevel) -> Self {
        Self {
            id: None,
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            login: login.to_string(),
            level,
            address: None,
            phone: None,
            email: None,
            service_id: None,
            service_name: None,
        }
    }

    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            last_name: row.get(1)?,
            first_name: row.get(2)?,
            login: row.get(3)?,
            level: row.get(4)?,
            address: row.get(5)?,
            phone: row.get(6)?,
            email: row.get(7)?,
            service_id: row.get(8)?,
            service_name: row.get(9)?,
        })
    }

    /// Blank e-mails are stored as NULL so they never collide on the unique index.
    fn stored_email(&self) -> Option<&str> {
        self.email.as_deref().map(str::trim).filter(|e| !e.is_empty())
    }
}

/// Stored credentials used by the login check.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub id: i64,
    pub password_hash: String,
    pub level: PermissionLevel,
}

pub struct Users<'a> {
    conn: &'a Connection,
}

impl<'a> Users<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Users sorted by last then first name, optionally restricted to one service.
    pub fn list(&self, service_id: Option<i64>) -> StoreResult<Vec<User>> {
        let sql = format!(
            "SELECT {} FROM users u LEFT JOIN services s ON u.service_id = s.id
             WHERE (?1 IS NULL OR u.service_id = ?1)
             ORDER BY u.nom, u.prenom",
            USER_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let users = stmt.query_map(params![service_id], User::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(users)
    }

    pub fn list_for_service(&self, service_id: i64) -> StoreResult<Vec<User>> {
        self.list(Some(service_id))
    }

    /// `(id, "Prénom NOM")` pairs for selection lists.
    pub fn list_for_form(&self) -> StoreResult<Vec<(i64, String)>> {
        Ok(self
            .list(None)?
            .into_iter()
            .filter_map(|u| u.id.map(|id| (id, u.display_name())))
            .collect())
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<User>> {
        let sql = format!(
            "SELECT {} FROM users u LEFT JOIN services s ON u.service_id = s.id WHERE u.id = ?1",
            USER_COLUMNS
        );
        Ok(self.conn.query_row(&sql, params![id], User::from_row).optional()?)
    }

    pub fn credentials(&self, login: &str) -> StoreResult<Option<Credentials>> {
        Ok(self
            .conn
            .query_row(SELECT_CREDENTIALS, params![login], |row| {
                Ok(Credentials {
                    id: row.get(0)?,
                    password_hash: row.get(1)?,
                    level: row.get(2)?,
                })
            })
            .optional()?)
    }

    pub fn count(&self) -> StoreResult<i64> {
        Ok(self.conn.query_row(COUNT_USERS, [], |row| row.get(0))?)
    }

    /// Creates the account with a hashed password. A taken login reports
    /// `Duplicate("users.identifiant")`, a taken e-mail `Duplicate("users.email")`.
    pub fn insert(&self, user: &User, password: &str) -> StoreResult<i64> {
        self.conn.execute(
            INSERT_USER,
            params![
                user.last_name,
                user.first_name,
                user.login,
                hash_password(password),
                user.level,
                user.address,
                user.phone,
                user.stored_email(),
                user.service_id
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Updates the profile; the password is re-hashed only when one is given.
    pub fn update(&self, id: i64, user: &User, password: Option<&str>) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(
            UPDATE_USER,
            params![
                id,
                user.last_name,
                user.first_name,
                user.login,
                user.level,
                user.address,
                user.phone,
                user.stored_email(),
                user.service_id
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("user", id));
        }
        if let Some(password) = password.filter(|p| !p.is_empty()) {
            tx.execute(UPDATE_PASSWORD, params![id, hash_password(password)])?;
        }
        tx.commit()?;
        Ok(())
    }

    /// A user still driving recorded trips cannot be deleted.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let affected = self
            .conn
            .execute(DELETE_USER, params![id])
            .map_err(|e| StoreError::from(e).in_use("user"))?;
        if affected == 0 {
            return Err(StoreError::not_found("user", id));
        }
        Ok(())
    }
}
