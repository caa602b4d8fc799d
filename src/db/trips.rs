use super::db::Db;
use super::error::{StoreError, StoreResult};
use super::links::TRIP_YOUNGS;
use crate::libs::formatter::full_name;
use chrono::{NaiveDate, NaiveTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Label used when nobody was transported.
pub const NO_PASSENGER: &str = "Aucun";

const TRIP_COLUMNS: &str = "t.id, t.date_trajet, t.heure_depart, t.heure_retour, t.motif, t.service_id, t.user_id,
    t.vehicle_id, t.km_depart, t.km_retour";
const INSERT_TRIP: &str = "INSERT INTO trips (date_trajet, heure_depart, heure_retour, motif, service_id, user_id,
    vehicle_id, km_depart, km_retour) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)";
const UPDATE_TRIP: &str = "UPDATE trips SET date_trajet = ?2, heure_depart = ?3, heure_retour = ?4, motif = ?5,
    service_id = ?6, user_id = ?7, vehicle_id = ?8, km_depart = ?9, km_retour = ?10 WHERE id = ?1";
const DELETE_TRIP: &str = "DELETE FROM trips WHERE id = ?1";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub departure: NaiveTime,
    pub return_time: Option<NaiveTime>,
    pub purpose: Option<String>,
    pub service_id: i64,
    /// Driver.
    pub user_id: i64,
    pub vehicle_id: i64,
    pub km_start: i64,
    pub km_end: Option<i64>,
}

impl Trip {
    pub fn new(date: NaiveDate, departure: NaiveTime, service_id: i64, user_id: i64, vehicle_id: i64, km_start: i64) -> Self {
        Self {
            id: None,
            date,
            departure,
            return_time: None,
            purpose: None,
            service_id,
            user_id,
            vehicle_id,
            km_start,
            km_end: None,
        }
    }

    /// Kilometres driven, once the return odometer reading is known.
    pub fn distance(&self) -> Option<i64> {
        self.km_end.map(|end| end - self.km_start)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            departure: row.get(2)?,
            return_time: row.get(3)?,
            purpose: row.get(4)?,
            service_id: row.get(5)?,
            user_id: row.get(6)?,
            vehicle_id: row.get(7)?,
            km_start: row.get(8)?,
            km_end: row.get(9)?,
        })
    }

    fn validate(&self) -> StoreResult<()> {
        if let Some(end) = self.km_end {
            if end < self.km_start {
                return Err(StoreError::Invalid {
                    field: "km_retour",
                    value: end.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TripItem {
    pub trip: Trip,
    pub driver_name: String,
    pub vehicle_label: String,
    pub service_name: String,
    pub young_names: Vec<String>,
}

impl TripItem {
    pub fn passengers(&self) -> String {
        if self.young_names.is_empty() {
            NO_PASSENGER.to_string()
        } else {
            self.young_names.join(", ")
        }
    }
}

pub struct Trips<'a> {
    conn: &'a Connection,
}

impl<'a> Trips<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Trips newest first with driver, vehicle, service and passengers.
    pub fn list(&self) -> StoreResult<Vec<TripItem>> {
        let sql = format!(
            "SELECT {}, u.prenom, u.nom, v.marque, v.modele, s.nom_service
             FROM trips t
             JOIN users u ON t.user_id = u.id
             JOIN vehicles v ON t.vehicle_id = v.id
             JOIN services s ON t.service_id = s.id
             ORDER BY t.date_trajet DESC, t.heure_depart DESC",
            TRIP_COLUMNS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let mut items = stmt
            .query_map([], |row| {
                let first: String = row.get(10)?;
                let last: String = row.get(11)?;
                let brand: String = row.get(12)?;
                let model: String = row.get(13)?;
                Ok(TripItem {
                    trip: Trip::from_row(row)?,
                    driver_name: full_name(&first, &last),
                    vehicle_label: format!("{} {}", brand, model),
                    service_name: row.get(14)?,
                    young_names: Vec::new(),
                })
            })?
            .collect::<Result<Vec<TripItem>, _>>()?;
        for item in &mut items {
            if let Some(id) = item.trip.id {
                item.young_names = TRIP_YOUNGS.young_names(self.conn, id)?;
            }
        }
        Ok(items)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<(Trip, Vec<i64>)>> {
        let sql = format!("SELECT {} FROM trips t WHERE t.id = ?1", TRIP_COLUMNS);
        let trip = self.conn.query_row(&sql, params![id], Trip::from_row).optional()?;
        match trip {
            Some(trip) => Ok(Some((trip, TRIP_YOUNGS.young_ids(self.conn, id)?))),
            None => Ok(None),
        }
    }

    pub fn insert(&self, trip: &Trip, young_ids: &[i64]) -> StoreResult<i64> {
        trip.validate()?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_TRIP,
            params![
                trip.date,
                trip.departure,
                trip.return_time,
                trip.purpose,
                trip.service_id,
                trip.user_id,
                trip.vehicle_id,
                trip.km_start,
                trip.km_end
            ],
        )?;
        let id = tx.last_insert_rowid();
        TRIP_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn update(&self, id: i64, trip: &Trip, young_ids: &[i64]) -> StoreResult<()> {
        trip.validate()?;
        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(
            UPDATE_TRIP,
            params![
                id,
                trip.date,
                trip.departure,
                trip.return_time,
                trip.purpose,
                trip.service_id,
                trip.user_id,
                trip.vehicle_id,
                trip.km_start,
                trip.km_end
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("trip", id));
        }
        TRIP_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_TRIP, params![id])? == 0 {
            return Err(StoreError::not_found("trip", id));
        }
        Ok(())
    }
}
