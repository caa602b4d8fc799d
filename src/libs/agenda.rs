//! Week and day views that merge recurring weekly tasks with dated events.

use super::dates::{days_between, week_bounds};
use super::vocabulary::Weekday;
use crate::db::db::Db;
use crate::db::error::StoreResult;
use crate::db::events::{AgendaEvent, Events};
use crate::db::tasks_hebdo::{WeeklyTask, WeeklyTasks};
use chrono::NaiveDate;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct AgendaDay {
    pub date: NaiveDate,
    pub weekday: Weekday,
    pub weekly_tasks: Vec<WeeklyTask>,
    /// Sorted by start time.
    pub events: Vec<AgendaEvent>,
}

impl AgendaDay {
    pub fn is_empty(&self) -> bool {
        self.weekly_tasks.is_empty() && self.events.is_empty()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Agenda {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<AgendaDay>,
}

impl Agenda {
    /// Monday to Sunday around `any_day`.
    ///
    /// `filter_service` narrows events to those concerning a young of that
    /// service (or nobody in particular). Weekly tasks always come from
    /// `viewer_service`; a viewer without a service sees none.
    pub fn week(db: &Db, any_day: NaiveDate, filter_service: Option<i64>, viewer_service: Option<i64>) -> StoreResult<Self> {
        let (start, end) = week_bounds(any_day);
        Self::period(db, start, end, filter_service, viewer_service)
    }

    pub fn day(db: &Db, date: NaiveDate, filter_service: Option<i64>, viewer_service: Option<i64>) -> StoreResult<AgendaDay> {
        let agenda = Self::period(db, date, date, filter_service, viewer_service)?;
        Ok(agenda.days.into_iter().next().unwrap_or_else(|| AgendaDay {
            date,
            weekday: Weekday::of(&date),
            weekly_tasks: Vec::new(),
            events: Vec::new(),
        }))
    }

    fn period(db: &Db, start: NaiveDate, end: NaiveDate, filter_service: Option<i64>, viewer_service: Option<i64>) -> StoreResult<Self> {
        let events = Events::new(db).for_period(start, end, filter_service)?;
        let weekly_tasks = match viewer_service {
            Some(service_id) => WeeklyTasks::new(db).list(Some(service_id))?,
            None => Vec::new(),
        };
        tracing::debug!(%start, %end, events = events.len(), weekly = weekly_tasks.len(), "agenda loaded");
        Ok(Self {
            start,
            end,
            days: assemble(&days_between(start, end), events, &weekly_tasks),
        })
    }

    pub fn event_count(&self) -> usize {
        self.days.iter().map(|d| d.events.len()).sum()
    }
}

/// Distributes events on the day they start and weekly tasks on every date
/// falling on their weekday. Events starting outside `dates` are dropped.
pub fn assemble(dates: &[NaiveDate], events: Vec<AgendaEvent>, weekly_tasks: &[WeeklyTask]) -> Vec<AgendaDay> {
    let mut days: Vec<AgendaDay> = dates
        .iter()
        .map(|date| {
            let weekday = Weekday::of(date);
            AgendaDay {
                date: *date,
                weekday,
                weekly_tasks: weekly_tasks.iter().filter(|t| t.day == weekday).cloned().collect(),
                events: Vec::new(),
            }
        })
        .collect();

    for event in events {
        let date = event.event.start.date();
        if let Some(day) = days.iter_mut().find(|d| d.date == date) {
            day.events.push(event);
        }
    }
    for day in days.iter_mut() {
        day.events.sort_by_key(|e| e.event.start);
    }
    days
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::events::Event;

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .and_then(|d| d.and_hms_opt(hour, 0, 0))
            .expect("valid datetime")
    }

    fn event(name: &str, day: u32, hour: u32) -> AgendaEvent {
        AgendaEvent {
            event: Event::new(name, at(day, hour), at(day, hour + 1)),
            young_names: Vec::new(),
        }
    }

    #[test]
    fn week_has_seven_days_from_monday() {
        // 2024-03-13 is a Wednesday
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2024, 3, 13).expect("date"));
        let days = assemble(&days_between(start, end), Vec::new(), &[]);
        assert_eq!(days.len(), 7);
        assert_eq!(days[0].weekday, Weekday::Monday);
        assert_eq!(days[0].date, NaiveDate::from_ymd_opt(2024, 3, 11).expect("date"));
        assert_eq!(days[6].weekday, Weekday::Sunday);
    }

    #[test]
    fn events_land_on_their_day_in_time_order() {
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2024, 3, 11).expect("date"));
        let days = assemble(
            &days_between(start, end),
            vec![event("Dentiste", 12, 15), event("Réunion", 12, 9), event("Sortie", 14, 10)],
            &[],
        );
        let tuesday: Vec<&str> = days[1].events.iter().map(|e| e.event.name.as_str()).collect();
        assert_eq!(tuesday, vec!["Réunion", "Dentiste"]);
        assert_eq!(days[3].events.len(), 1);
        assert!(days[0].events.is_empty());
    }

    #[test]
    fn weekly_tasks_repeat_on_matching_weekday() {
        let (start, end) = week_bounds(NaiveDate::from_ymd_opt(2024, 3, 11).expect("date"));
        let tasks = vec![
            WeeklyTask::new(Weekday::Monday, "Courses", 1),
            WeeklyTask::new(Weekday::Friday, "Ménage", 1),
        ];
        let days = assemble(&days_between(start, end), Vec::new(), &tasks);
        assert_eq!(days[0].weekly_tasks.len(), 1);
        assert_eq!(days[4].weekly_tasks[0].description, "Ménage");
        assert!(days[2].is_empty());
    }
}
