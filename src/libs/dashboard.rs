use crate::db::db::Db;
use crate::db::error::StoreResult;
use crate::db::events::{AgendaEvent, Events};
use crate::db::tasks::{TaskItem, Tasks};
use crate::db::transmissions::{TransmissionItem, Transmissions, LATEST_LIMIT};
use chrono::NaiveDate;
use serde::Serialize;

/// Home screen content for one viewer.
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub date: NaiveDate,
    pub events: Vec<AgendaEvent>,
    pub urgent_tasks: Vec<TaskItem>,
    pub transmissions: Vec<TransmissionItem>,
}

impl Dashboard {
    /// Everything is narrowed to `service_id` when the viewer has one.
    pub fn load(db: &Db, today: NaiveDate, service_id: Option<i64>) -> StoreResult<Self> {
        Ok(Self {
            date: today,
            events: Events::new(db).for_period(today, today, service_id)?,
            urgent_tasks: Tasks::new(db).urgent(service_id, today)?,
            transmissions: Transmissions::new(db).latest(LATEST_LIMIT, service_id)?,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.urgent_tasks.is_empty() && self.transmissions.is_empty()
    }
}
