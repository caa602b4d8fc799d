use super::db::Db;
use super::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_SERVICE: &str = "INSERT INTO services (nom_service, adresse, telephone) VALUES (?1, ?2, ?3)";
const UPDATE_SERVICE: &str = "UPDATE services SET nom_service = ?2, adresse = ?3, telephone = ?4 WHERE id = ?1";
const DELETE_SERVICE: &str = "DELETE FROM services WHERE id = ?1";
const DETACH_USERS: &str = "UPDATE users SET service_id = NULL WHERE service_id = ?1";
const DETACH_YOUNGS: &str = "UPDATE youngs SET service_id = NULL WHERE service_id = ?1";
const SELECT_SERVICES: &str = "SELECT id, nom_service, adresse, telephone FROM services ORDER BY nom_service";
const SELECT_SERVICE_BY_ID: &str = "SELECT id, nom_service, adresse, telephone FROM services WHERE id = ?1";
const SELECT_SERVICE_BY_NAME: &str = "SELECT id, nom_service, adresse, telephone FROM services WHERE nom_service = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Service {
    pub id: Option<i64>,
    pub name: String,
    pub address: Option<String>,
    pub phone: Option<String>,
}

impl Service {
    pub fn new(name: &str) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            address: None,
            phone: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            address: row.get(2)?,
            phone: row.get(3)?,
        })
    }
}

pub struct Services<'a> {
    conn: &'a Connection,
}

impl<'a> Services<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// All services ordered by name.
    pub fn list(&self) -> StoreResult<Vec<Service>> {
        let mut stmt = self.conn.prepare(SELECT_SERVICES)?;
        let services = stmt.query_map([], Service::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(services)
    }

    /// `(id, name)` pairs for selection lists.
    pub fn list_for_form(&self) -> StoreResult<Vec<(i64, String)>> {
        Ok(self
            .list()?
            .into_iter()
            .filter_map(|s| s.id.map(|id| (id, s.name)))
            .collect())
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Service>> {
        Ok(self.conn.query_row(SELECT_SERVICE_BY_ID, params![id], Service::from_row).optional()?)
    }

    pub fn get_by_name(&self, name: &str) -> StoreResult<Option<Service>> {
        Ok(self.conn.query_row(SELECT_SERVICE_BY_NAME, params![name], Service::from_row).optional()?)
    }

    /// Fails with `Duplicate("services.nom_service")` when the name is taken.
    pub fn insert(&self, service: &Service) -> StoreResult<i64> {
        self.conn.execute(INSERT_SERVICE, params![service.name, service.address, service.phone])?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, service: &Service) -> StoreResult<()> {
        let affected = self.conn.execute(UPDATE_SERVICE, params![id, service.name, service.address, service.phone])?;
        if affected == 0 {
            return Err(StoreError::not_found("service", id));
        }
        Ok(())
    }

    /// Detaches users and youngs from the service, then removes it. A service
    /// still referenced by trips is reported as in use and nothing changes.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(DETACH_USERS, params![id])?;
        tx.execute(DETACH_YOUNGS, params![id])?;
        let affected = tx.execute(DELETE_SERVICE, params![id]).map_err(|e| StoreError::from(e).in_use("service"))?;
        if affected == 0 {
            return Err(StoreError::not_found("service", id));
        }
        tx.commit()?;
        tracing::info!(service_id = id, "service deleted");
        Ok(())
    }
}
