use super::db::Db;
use super::error::{StoreError, StoreResult};
use super::links::EVENT_YOUNGS;
use crate::libs::vocabulary::{optional_column, EventType};
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_EVENT: &str = "INSERT INTO events (nom_evenement, debut_datetime, fin_datetime, type_evenement, user_id)
    VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_EVENT: &str = "UPDATE events SET nom_evenement = ?2, debut_datetime = ?3, fin_datetime = ?4,
    type_evenement = ?5, user_id = ?6 WHERE id = ?1";
const DELETE_EVENT: &str = "DELETE FROM events WHERE id = ?1";
const SELECT_EVENT_BY_ID: &str = "SELECT id, nom_evenement, debut_datetime, fin_datetime, type_evenement, user_id
    FROM events WHERE id = ?1";

/// Events starting within a date range, with the first names of the linked
/// youngs. With a service filter, an event is kept when it concerns nobody in
/// particular or when at least one linked young belongs to the service.
const SELECT_EVENTS_FOR_PERIOD: &str = "
    SELECT e.id, e.nom_evenement, e.debut_datetime, e.fin_datetime, e.type_evenement, e.user_id,
           GROUP_CONCAT(y.prenom, ', ')
    FROM events e
    LEFT JOIN event_young_link l ON e.id = l.event_id
    LEFT JOIN youngs y ON l.young_id = y.id
    WHERE DATE(e.debut_datetime) BETWEEN ?1 AND ?2
    GROUP BY e.id
    HAVING ?3 IS NULL
        OR COUNT(y.id) = 0
        OR MAX(CASE WHEN y.service_id = ?3 THEN 1 ELSE 0 END) = 1
    ORDER BY e.debut_datetime, e.id";
const SELECT_EVENTS_FOR_YOUNG: &str = "
    SELECT e.id, e.nom_evenement, e.debut_datetime, e.fin_datetime, e.type_evenement, e.user_id,
           (SELECT GROUP_CONCAT(y.prenom, ', ')
            FROM event_young_link l2 JOIN youngs y ON l2.young_id = y.id
            WHERE l2.event_id = e.id)
    FROM events e
    JOIN event_young_link l ON e.id = l.event_id
    WHERE l.young_id = ?1
    ORDER BY e.debut_datetime DESC";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: Option<i64>,
    pub name: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub event_type: Option<EventType>,
    /// Staff member in charge.
    pub user_id: Option<i64>,
}

impl Event {
    pub fn new(name: &str, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            id: None,
            name: name.to_string(),
            start,
            end,
            event_type: None,
            user_id: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            start: row.get(2)?,
            end: row.get(3)?,
            event_type: optional_column(row, 4)?,
            user_id: row.get(5)?,
        })
    }

    fn validate(&self) -> StoreResult<()> {
        if self.end < self.start {
            return Err(StoreError::Invalid {
                field: "fin_datetime",
                value: self.end.to_string(),
            });
        }
        Ok(())
    }
}

/// An event as shown in the agenda.
#[derive(Debug, Clone, Serialize)]
pub struct AgendaEvent {
    pub event: Event,
    pub young_names: Vec<String>,
}

impl AgendaEvent {
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let names: Option<String> = row.get(6)?;
        Ok(Self {
            event: Event::from_row(row)?,
            young_names: split_names(names),
        })
    }
}

pub(crate) fn split_names(names: Option<String>) -> Vec<String> {
    names
        .map(|n| n.split(", ").map(str::to_string).filter(|s| !s.is_empty()).collect())
        .unwrap_or_default()
}

pub struct Events<'a> {
    conn: &'a Connection,
}

impl<'a> Events<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    pub fn for_period(&self, start: NaiveDate, end: NaiveDate, service_id: Option<i64>) -> StoreResult<Vec<AgendaEvent>> {
        let mut stmt = self.conn.prepare(SELECT_EVENTS_FOR_PERIOD)?;
        let events = stmt
            .query_map(params![start, end, service_id], AgendaEvent::from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// Events concerning one young, newest first.
    pub fn for_young(&self, young_id: i64) -> StoreResult<Vec<AgendaEvent>> {
        let mut stmt = self.conn.prepare(SELECT_EVENTS_FOR_YOUNG)?;
        let events = stmt.query_map(params![young_id], AgendaEvent::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(events)
    }

    /// The event and the ids of the youngs it is linked to.
    pub fn get(&self, id: i64) -> StoreResult<Option<(Event, Vec<i64>)>> {
        let event = self.conn.query_row(SELECT_EVENT_BY_ID, params![id], Event::from_row).optional()?;
        match event {
            Some(event) => Ok(Some((event, EVENT_YOUNGS.young_ids(self.conn, id)?))),
            None => Ok(None),
        }
    }

    pub fn insert(&self, event: &Event, young_ids: &[i64]) -> StoreResult<i64> {
        event.validate()?;
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_EVENT,
            params![event.name, event.start, event.end, event.event_type, event.user_id],
        )?;
        let id = tx.last_insert_rowid();
        EVENT_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(id)
    }

    /// Rewrites the event and replaces its linked youngs.
    pub fn update(&self, id: i64, event: &Event, young_ids: &[i64]) -> StoreResult<()> {
        event.validate()?;
        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(
            UPDATE_EVENT,
            params![id, event.name, event.start, event.end, event.event_type, event.user_id],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("event", id));
        }
        EVENT_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_EVENT, params![id])? == 0 {
            return Err(StoreError::not_found("event", id));
        }
        Ok(())
    }
}
