use super::db::Db;
use super::error::{StoreError, StoreResult};
use super::links::TRANSMISSION_YOUNGS;
use crate::libs::formatter::full_name;
use crate::libs::vocabulary::{optional_column, Importance, TransmissionCategory};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

/// Label used when a transmission concerns the whole group.
pub const GENERAL: &str = "Général";

/// Number of notes shown on the dashboard.
pub const LATEST_LIMIT: usize = 15;

const INSERT_TRANSMISSION: &str = "INSERT INTO transmissions
    (service_id, user_id, datetime_transmission, categorie, contenu, couleur)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6)";
const UPDATE_TRANSMISSION: &str = "UPDATE transmissions SET service_id = ?2, user_id = ?3, datetime_transmission = ?4,
    categorie = ?5, contenu = ?6, couleur = ?7 WHERE id = ?1";
const DELETE_TRANSMISSION: &str = "DELETE FROM transmissions WHERE id = ?1";
const SELECT_TRANSMISSION_BY_ID: &str = "SELECT id, service_id, user_id, datetime_transmission, categorie, contenu, couleur
    FROM transmissions WHERE id = ?1";
const SELECT_TRANSMISSION_ITEMS: &str = "
    SELECT t.id, t.service_id, t.user_id, t.datetime_transmission, t.categorie, t.contenu, t.couleur,
           u.prenom, u.nom, s.nom_service
    FROM transmissions t
    JOIN users u ON t.user_id = u.id
    JOIN services s ON t.service_id = s.id";

/// A shift-handoff note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transmission {
    pub id: Option<i64>,
    pub service_id: i64,
    /// Author.
    pub user_id: i64,
    pub written_at: NaiveDateTime,
    pub category: Option<TransmissionCategory>,
    pub content: String,
    pub importance: Importance,
}

impl Transmission {
    pub fn new(service_id: i64, user_id: i64, written_at: NaiveDateTime, content: &str) -> Self {
        Self {
            id: None,
            service_id,
            user_id,
            written_at,
            category: None,
            content: content.to_string(),
            importance: Importance::default(),
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            service_id: row.get(1)?,
            user_id: row.get(2)?,
            written_at: row.get(3)?,
            category: optional_column(row, 4)?,
            content: row.get(5)?,
            importance: row.get(6)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TransmissionItem {
    pub transmission: Transmission,
    pub author_name: String,
    pub service_name: String,
    pub young_names: Vec<String>,
}

impl TransmissionItem {
    /// Linked youngs, or "Général" when the note concerns everyone.
    pub fn concerned(&self) -> String {
        if self.young_names.is_empty() {
            GENERAL.to_string()
        } else {
            self.young_names.join(", ")
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let first: String = row.get(7)?;
        let last: String = row.get(8)?;
        Ok(Self {
            transmission: Transmission::from_row(row)?,
            author_name: full_name(&first, &last),
            service_name: row.get(9)?,
            young_names: Vec::new(),
        })
    }
}

pub struct Transmissions<'a> {
    conn: &'a Connection,
}

impl<'a> Transmissions<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Notes written between two dates (inclusive), newest first.
    pub fn for_period(&self, start: NaiveDate, end: NaiveDate, service_id: Option<i64>) -> StoreResult<Vec<TransmissionItem>> {
        let sql = format!(
            "{} WHERE DATE(t.datetime_transmission) BETWEEN ?1 AND ?2 AND (?3 IS NULL OR t.service_id = ?3)
             ORDER BY t.datetime_transmission DESC, t.id DESC",
            SELECT_TRANSMISSION_ITEMS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![start, end, service_id], TransmissionItem::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        self.with_young_names(items)
    }

    pub fn for_young(&self, young_id: i64) -> StoreResult<Vec<TransmissionItem>> {
        let sql = format!(
            "{} WHERE t.id IN (SELECT transmission_id FROM transmission_young_link WHERE young_id = ?1)
             ORDER BY t.datetime_transmission DESC, t.id DESC",
            SELECT_TRANSMISSION_ITEMS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt.query_map(params![young_id], TransmissionItem::from_row)?.collect::<Result<Vec<_>, _>>()?;
        self.with_young_names(items)
    }

    pub fn latest(&self, limit: usize, service_id: Option<i64>) -> StoreResult<Vec<TransmissionItem>> {
        let sql = format!(
            "{} WHERE (?1 IS NULL OR t.service_id = ?1)
             ORDER BY t.datetime_transmission DESC, t.id DESC LIMIT ?2",
            SELECT_TRANSMISSION_ITEMS
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let items = stmt
            .query_map(params![service_id, limit as i64], TransmissionItem::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        self.with_young_names(items)
    }

    fn with_young_names(&self, mut items: Vec<TransmissionItem>) -> StoreResult<Vec<TransmissionItem>> {
        for item in &mut items {
            if let Some(id) = item.transmission.id {
                item.young_names = TRANSMISSION_YOUNGS.young_names(self.conn, id)?;
            }
        }
        Ok(items)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<(Transmission, Vec<i64>)>> {
        let transmission = self
            .conn
            .query_row(SELECT_TRANSMISSION_BY_ID, params![id], Transmission::from_row)
            .optional()?;
        match transmission {
            Some(t) => Ok(Some((t, TRANSMISSION_YOUNGS.young_ids(self.conn, id)?))),
            None => Ok(None),
        }
    }

    pub fn insert(&self, transmission: &Transmission, young_ids: &[i64]) -> StoreResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_TRANSMISSION,
            params![
                transmission.service_id,
                transmission.user_id,
                transmission.written_at,
                transmission.category,
                transmission.content,
                transmission.importance
            ],
        )?;
        let id = tx.last_insert_rowid();
        TRANSMISSION_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(id)
    }

    pub fn update(&self, id: i64, transmission: &Transmission, young_ids: &[i64]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(
            UPDATE_TRANSMISSION,
            params![
                id,
                transmission.service_id,
                transmission.user_id,
                transmission.written_at,
                transmission.category,
                transmission.content,
                transmission.importance
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("transmission", id));
        }
        TRANSMISSION_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_TRANSMISSION, params![id])? == 0 {
            return Err(StoreError::not_found("transmission", id));
        }
        Ok(())
    }
}
