use super::db::Db;
use super::error::{StoreError, StoreResult};
use super::events::split_names;
use super::links::TASK_YOUNGS;
use crate::libs::formatter::full_name;
use crate::libs::task::{derive_status, TaskFilter, EVERYONE};
use crate::libs::vocabulary::TaskStatus;
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_TASK: &str = "INSERT INTO tasks (tache_a_realiser, date_limite, statut, user_id) VALUES (?1, ?2, ?3, ?4)";
const UPDATE_TASK: &str = "UPDATE tasks SET tache_a_realiser = ?2, date_limite = ?3, user_id = ?4 WHERE id = ?1";
const UPDATE_TASK_STATUS: &str = "UPDATE tasks SET statut = ?2 WHERE id = ?1";
const DELETE_TASK: &str = "DELETE FROM tasks WHERE id = ?1";
const SELECT_TASK_BY_ID: &str = "SELECT id, tache_a_realiser, date_limite, statut, user_id FROM tasks WHERE id = ?1";
const SELECT_TASKS: &str = "
    SELECT t.id, t.tache_a_realiser, t.date_limite, t.statut, t.user_id, u.prenom, u.nom,
           (SELECT GROUP_CONCAT(y.prenom, ', ')
            FROM task_young_link l JOIN youngs y ON l.young_id = y.id
            WHERE l.task_id = t.id)
    FROM tasks t
    LEFT JOIN users u ON t.user_id = u.id
    WHERE (?1 = 1 OR t.statut != 'réalisée')
      AND (?2 IS NULL OR t.user_id IS NULL OR t.user_id IN (SELECT id FROM users WHERE service_id = ?2))
    ORDER BY t.statut = 'réalisée', t.date_limite IS NULL, t.date_limite, t.id";

/// A one-off task as stored. `status` is either `à faire` or `réalisée`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub description: String,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    /// `None` means the task is for everyone.
    pub user_id: Option<i64>,
}

impl Task {
    pub fn new(description: &str, due_date: Option<NaiveDate>, user_id: Option<i64>) -> Self {
        Self {
            id: None,
            description: description.to_string(),
            due_date,
            status: TaskStatus::Todo,
            user_id,
        }
    }

    pub fn is_done(&self) -> bool {
        self.status == TaskStatus::Done
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            description: row.get(1)?,
            due_date: row.get(2)?,
            status: row.get(3)?,
            user_id: row.get(4)?,
        })
    }
}

/// A task line with its derived status.
#[derive(Debug, Clone, Serialize)]
pub struct TaskItem {
    pub task: Task,
    pub status: TaskStatus,
    pub assignee: String,
    pub young_names: Vec<String>,
}

pub struct Tasks<'a> {
    conn: &'a Connection,
}

impl<'a> Tasks<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Open tasks (and completed ones when asked) ordered by due date, each
    /// with the status derived against `today`.
    pub fn list(&self, filter: TaskFilter, today: NaiveDate) -> StoreResult<Vec<TaskItem>> {
        let mut stmt = self.conn.prepare(SELECT_TASKS)?;
        let items = stmt
            .query_map(params![filter.include_done, filter.service_id], |row| {
                let task = Task::from_row(row)?;
                let first: Option<String> = row.get(5)?;
                let last: Option<String> = row.get(6)?;
                let names: Option<String> = row.get(7)?;
                Ok(TaskItem {
                    status: derive_status(task.status, task.due_date, today),
                    assignee: match (first, last) {
                        (Some(first), Some(last)) => full_name(&first, &last),
                        _ => EVERYONE.to_string(),
                    },
                    young_names: split_names(names),
                    task,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn urgent(&self, service_id: Option<i64>, today: NaiveDate) -> StoreResult<Vec<TaskItem>> {
        let mut items = self.list(TaskFilter::for_service(service_id), today)?;
        items.retain(|item| item.status == TaskStatus::Urgent);
        Ok(items)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<(Task, Vec<i64>)>> {
        let task = self.conn.query_row(SELECT_TASK_BY_ID, params![id], Task::from_row).optional()?;
        match task {
            Some(task) => Ok(Some((task, TASK_YOUNGS.young_ids(self.conn, id)?))),
            None => Ok(None),
        }
    }

    /// New tasks always start as `à faire`.
    pub fn insert(&self, task: &Task, young_ids: &[i64]) -> StoreResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        tx.execute(
            INSERT_TASK,
            params![task.description, task.due_date, TaskStatus::Todo, task.user_id],
        )?;
        let id = tx.last_insert_rowid();
        TASK_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(id)
    }

    /// Rewrites description, due date and assignee and replaces the linked
    /// youngs. The completion state is left alone.
    pub fn update(&self, id: i64, task: &Task, young_ids: &[i64]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        let affected = tx.execute(UPDATE_TASK, params![id, task.description, task.due_date, task.user_id])?;
        if affected == 0 {
            return Err(StoreError::not_found("task", id));
        }
        TASK_YOUNGS.replace(&tx, id, young_ids)?;
        tx.commit()?;
        Ok(())
    }

    pub fn mark_done(&self, id: i64) -> StoreResult<()> {
        self.set_status(id, TaskStatus::Done)
    }

    pub fn unmark_done(&self, id: i64) -> StoreResult<()> {
        self.set_status(id, TaskStatus::Todo)
    }

    fn set_status(&self, id: i64, status: TaskStatus) -> StoreResult<()> {
        if self.conn.execute(UPDATE_TASK_STATUS, params![id, status])? == 0 {
            return Err(StoreError::not_found("task", id));
        }
        Ok(())
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_TASK, params![id])? == 0 {
            return Err(StoreError::not_found("task", id));
        }
        Ok(())
    }
}
