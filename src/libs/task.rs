use super::vocabulary::TaskStatus;
use chrono::{Duration, NaiveDate};

/// A task due within this many days is shown as urgent.
pub const URGENT_WITHIN_DAYS: i64 = 3;

/// Display label for a task assigned to nobody in particular.
pub const EVERYONE: &str = "Tout le monde";

/// Read-time status of a task: completed tasks stay completed, open tasks due
/// on or before `today + 3 days` (overdue included) become urgent.
pub fn derive_status(stored: TaskStatus, due_date: Option<NaiveDate>, today: NaiveDate) -> TaskStatus {
    if stored == TaskStatus::Done {
        return TaskStatus::Done;
    }
    match due_date {
        Some(due) if due <= today + Duration::days(URGENT_WITHIN_DAYS) => TaskStatus::Urgent,
        _ => TaskStatus::Todo,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    /// Keep tasks assigned to a member of this service or to everyone.
    pub service_id: Option<i64>,
    pub include_done: bool,
}

impl TaskFilter {
    pub fn for_service(service_id: Option<i64>) -> Self {
        Self {
            service_id,
            include_done: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn due_soon_is_urgent() {
        let today = ymd(2024, 5, 10);
        assert_eq!(derive_status(TaskStatus::Todo, Some(ymd(2024, 5, 13)), today), TaskStatus::Urgent);
        assert_eq!(derive_status(TaskStatus::Todo, Some(ymd(2024, 5, 1)), today), TaskStatus::Urgent);
        assert_eq!(derive_status(TaskStatus::Todo, Some(ymd(2024, 5, 14)), today), TaskStatus::Todo);
    }

    #[test]
    fn done_and_undated_tasks() {
        let today = ymd(2024, 5, 10);
        assert_eq!(derive_status(TaskStatus::Done, Some(today), today), TaskStatus::Done);
        assert_eq!(derive_status(TaskStatus::Todo, None, today), TaskStatus::Todo);
        assert_eq!(derive_status(TaskStatus::Urgent, None, today), TaskStatus::Todo);
    }
}
