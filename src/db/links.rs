//! Many-to-many links between a record and the youngs it concerns.
//!
//! Events, tasks, transmissions and trips each own one link table keyed on
//! `(parent_id, young_id)`. Writes always replace the whole set inside the
//! caller's transaction.

use super::error::StoreResult;
use crate::libs::formatter::full_name;
use rusqlite::{params, Connection};

#[derive(Debug, Clone, Copy)]
pub struct LinkTable {
    table: &'static str,
    parent_column: &'static str,
}

pub const EVENT_YOUNGS: LinkTable = LinkTable {
    table: "event_young_link",
    parent_column: "event_id",
};
pub const TASK_YOUNGS: LinkTable = LinkTable {
    table: "task_young_link",
    parent_column: "task_id",
};
pub const TRANSMISSION_YOUNGS: LinkTable = LinkTable {
    table: "transmission_young_link",
    parent_column: "transmission_id",
};
pub const TRIP_YOUNGS: LinkTable = LinkTable {
    table: "trip_young_link",
    parent_column: "trip_id",
};

impl LinkTable {
    /// Replaces the linked youngs of `parent_id`. Duplicate ids in
    /// `young_ids` are stored once.
    pub fn replace(&self, conn: &Connection, parent_id: i64, young_ids: &[i64]) -> StoreResult<()> {
        conn.execute(
            &format!("DELETE FROM {} WHERE {} = ?1", self.table, self.parent_column),
            params![parent_id],
        )?;
        let mut stmt = conn.prepare(&format!(
            "INSERT OR IGNORE INTO {} ({}, young_id) VALUES (?1, ?2)",
            self.table, self.parent_column
        ))?;
        for young_id in young_ids {
            stmt.execute(params![parent_id, young_id])?;
        }
        Ok(())
    }

    pub fn young_ids(&self, conn: &Connection, parent_id: i64) -> StoreResult<Vec<i64>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT young_id FROM {} WHERE {} = ?1 ORDER BY young_id",
            self.table, self.parent_column
        ))?;
        let ids = stmt.query_map(params![parent_id], |row| row.get(0))?.collect::<Result<Vec<i64>, _>>()?;
        Ok(ids)
    }

    /// "Prénom NOM" of the linked youngs in the order they were linked.
    pub fn young_names(&self, conn: &Connection, parent_id: i64) -> StoreResult<Vec<String>> {
        let mut stmt = conn.prepare(&format!(
            "SELECT y.prenom, y.nom FROM {} l JOIN youngs y ON l.young_id = y.id
             WHERE l.{} = ?1 ORDER BY l.rowid",
            self.table, self.parent_column
        ))?;
        let names = stmt
            .query_map(params![parent_id], |row| {
                let first: String = row.get(0)?;
                let last: String = row.get(1)?;
                Ok(full_name(&first, &last))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
