use super::db::Db;
use super::error::{StoreError, StoreResult};
use crate::libs::vocabulary::Weekday;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_WEEKLY_TASK: &str = "INSERT INTO tasks_hebdo (jour_semaine, tache_hebdomadaire, service_id) VALUES (?1, ?2, ?3)";
const UPDATE_WEEKLY_TASK: &str = "UPDATE tasks_hebdo SET jour_semaine = ?2, tache_hebdomadaire = ?3 WHERE id = ?1";
const DELETE_WEEKLY_TASK: &str = "DELETE FROM tasks_hebdo WHERE id = ?1";
const SELECT_WEEKLY_TASK_BY_ID: &str = "
    SELECT h.id, h.jour_semaine, h.tache_hebdomadaire, h.service_id, s.nom_service
    FROM tasks_hebdo h LEFT JOIN services s ON h.service_id = s.id
    WHERE h.id = ?1";
const SELECT_WEEKLY_TASKS_FOR_DAY: &str = "
    SELECT h.id, h.jour_semaine, h.tache_hebdomadaire, h.service_id, s.nom_service
    FROM tasks_hebdo h LEFT JOIN services s ON h.service_id = s.id
    WHERE h.jour_semaine = ?1 AND h.service_id = ?2
    ORDER BY h.id";
const SELECT_WEEKLY_TASKS: &str = "
    SELECT h.id, h.jour_semaine, h.tache_hebdomadaire, h.service_id, s.nom_service
    FROM tasks_hebdo h LEFT JOIN services s ON h.service_id = s.id
    WHERE (?1 IS NULL OR h.service_id = ?1)";

/// A task repeated every week on the same day for one service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyTask {
    pub id: Option<i64>,
    pub day: Weekday,
    pub description: String,
    pub service_id: i64,
    #[serde(skip_deserializing)]
    pub service_name: Option<String>,
}

impl WeeklyTask {
    pub fn new(day: Weekday, description: &str, service_id: i64) -> Self {
        Self {
            id: None,
            day,
            description: description.to_string(),
            service_id,
            service_name: None,
        }
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            day: row.get(1)?,
            description: row.get(2)?,
            service_id: row.get(3)?,
            service_name: row.get(4)?,
        })
    }
}

pub struct WeeklyTasks<'a> {
    conn: &'a Connection,
}

impl<'a> WeeklyTasks<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    pub fn for_day(&self, day: Weekday, service_id: i64) -> StoreResult<Vec<WeeklyTask>> {
        let mut stmt = self.conn.prepare(SELECT_WEEKLY_TASKS_FOR_DAY)?;
        let tasks = stmt.query_map(params![day, service_id], WeeklyTask::from_row)?.collect::<Result<Vec<_>, _>>()?;
        Ok(tasks)
    }

    /// Every weekly task, Monday first.
    pub fn list(&self, service_id: Option<i64>) -> StoreResult<Vec<WeeklyTask>> {
        let mut stmt = self.conn.prepare(SELECT_WEEKLY_TASKS)?;
        let mut tasks = stmt.query_map(params![service_id], WeeklyTask::from_row)?.collect::<Result<Vec<_>, _>>()?;
        tasks.sort_by(|a, b| a.day.cmp(&b.day).then(a.id.cmp(&b.id)));
        Ok(tasks)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<WeeklyTask>> {
        Ok(self.conn.query_row(SELECT_WEEKLY_TASK_BY_ID, params![id], WeeklyTask::from_row).optional()?)
    }

    pub fn insert(&self, task: &WeeklyTask) -> StoreResult<i64> {
        self.conn.execute(INSERT_WEEKLY_TASK, params![task.day, task.description, task.service_id])?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Changes day and description; the service stays the same.
    pub fn update(&self, id: i64, day: Weekday, description: &str) -> StoreResult<()> {
        if self.conn.execute(UPDATE_WEEKLY_TASK, params![id, day, description])? == 0 {
            return Err(StoreError::not_found("weekly task", id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_WEEKLY_TASK, params![id])? == 0 {
            return Err(StoreError::not_found("weekly task", id));
        }
        Ok(())
    }
}
