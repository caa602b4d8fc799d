use super::db::Db;
use super::error::{StoreError, StoreResult};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const VEHICLE_COLUMNS: &str = "id, marque, modele, plaque_immatriculation, nombre_places, puissance_fiscale";
const INSERT_VEHICLE: &str = "INSERT INTO vehicles (marque, modele, plaque_immatriculation, nombre_places, puissance_fiscale)
    VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_VEHICLE: &str = "UPDATE vehicles SET marque = ?2, modele = ?3, plaque_immatriculation = ?4,
    nombre_places = ?5, puissance_fiscale = ?6 WHERE id = ?1";
const DELETE_VEHICLE: &str = "DELETE FROM vehicles WHERE id = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Option<i64>,
    pub brand: String,
    pub model: String,
    pub plate: String,
    pub seats: Option<i64>,
    pub fiscal_power: Option<i64>,
}

impl Vehicle {
    pub fn new(brand: &str, model: &str, plate: &str) -> Self {
        Self {
            id: None,
            brand: brand.to_string(),
            model: model.to_string(),
            plate: plate.to_string(),
            seats: None,
            fiscal_power: None,
        }
    }

    /// "Marque Modèle (PLAQUE)".
    pub fn label(&self) -> String {
        format!("{} {} ({})", self.brand, self.model, self.plate)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            brand: row.get(1)?,
            model: row.get(2)?,
            plate: row.get(3)?,
            seats: row.get(4)?,
            fiscal_power: row.get(5)?,
        })
    }
}

pub struct Vehicles<'a> {
    conn: &'a Connection,
}

impl<'a> Vehicles<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    pub fn list(&self) -> StoreResult<Vec<Vehicle>> {
        let sql = format!("SELECT {} FROM vehicles ORDER BY marque, modele", VEHICLE_COLUMNS);
        let mut stmt = self.conn.prepare(&sql)?;
        let vehicles = stmt.query_map([], Vehicle::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(vehicles)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Vehicle>> {
        let sql = format!("SELECT {} FROM vehicles WHERE id = ?1", VEHICLE_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], Vehicle::from_row).optional()?)
    }

    /// Fails with `Duplicate("vehicles.plaque_immatriculation")` on a known plate.
    pub fn insert(&self, vehicle: &Vehicle) -> StoreResult<i64> {
        self.conn.execute(
            INSERT_VEHICLE,
            params![vehicle.brand, vehicle.model, vehicle.plate, vehicle.seats, vehicle.fiscal_power],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, vehicle: &Vehicle) -> StoreResult<()> {
        let affected = self.conn.execute(
            UPDATE_VEHICLE,
            params![id, vehicle.brand, vehicle.model, vehicle.plate, vehicle.seats, vehicle.fiscal_power],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("vehicle", id));
        }
        Ok(())
    }

    /// A vehicle used by any trip is kept and reported as `InUse`.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let affected = self
            .conn
            .execute(DELETE_VEHICLE, params![id])
            .map_err(|e| StoreError::from(e).in_use("vehicle"))?;
        if affected == 0 {
            return Err(StoreError::not_found("vehicle", id));
        }
        Ok(())
    }
}
