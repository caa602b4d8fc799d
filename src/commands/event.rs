use crate::{
    commands::{open_db, prompt, store_failure, young, Viewer},
    db::{
        db::Db,
        events::{Event, Events},
        users::Users,
    },
    libs::{
        dates::{parse_date, parse_datetime, today, week_bounds},
        messages::Message,
        view::View,
        vocabulary::EventType,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{Duration, NaiveDate};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct EventArgs {
    #[command(subcommand)]
    command: Option<EventCommand>,
}

#[derive(Debug, Args)]
struct EventFields {
    #[arg(long)]
    name: Option<String>,
    /// Start, as "AAAA-MM-JJ HH:MM"
    #[arg(long)]
    start: Option<String>,
    /// End, as "AAAA-MM-JJ HH:MM"
    #[arg(long)]
    end: Option<String>,
    #[arg(long = "type", value_enum)]
    event_type: Option<EventType>,
    /// Staff member in charge
    #[arg(long)]
    user: Option<i64>,
    /// Concerned residents (repeatable)
    #[arg(long = "young")]
    youngs: Vec<i64>,
}

impl EventFields {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.start.is_none()
            && self.end.is_none()
            && self.event_type.is_none()
            && self.user.is_none()
            && self.youngs.is_empty()
    }
}

#[derive(Debug, Subcommand)]
enum EventCommand {
    /// Events of a period, the current week by default
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        /// Events of another service
        #[arg(long, conflicts_with = "all")]
        service: Option<i64>,
        /// Events of every service
        #[arg(long)]
        all: bool,
    },
    /// Events concerning one resident
    Young { id: Option<i64> },
    Add(EventFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: EventFields,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: EventArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(EventCommand::List {
        from: None,
        to: None,
        service: None,
        all: false,
    }) {
        EventCommand::List { from, to, service, all } => {
            handle_list(&db, from, to, viewer.scope(service, all))
        }
        EventCommand::Young { id } => handle_young(&db, &viewer, id),
        EventCommand::Add(fields) => handle_add(&db, &viewer, fields),
        EventCommand::Edit { id, fields } => handle_edit(&db, &viewer, id, fields),
        EventCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

/// `--from`/`--to` bounds, defaulting to the current week.
pub(crate) fn period(from: Option<String>, to: Option<String>) -> Result<(NaiveDate, NaiveDate)> {
    let (monday, sunday) = week_bounds(today());
    let start = from.as_deref().map(parse_date).transpose()?.unwrap_or(monday);
    let end = match to.as_deref() {
        Some(to) => parse_date(to)?,
        None if start == monday => sunday,
        None => start + Duration::days(6),
    };
    Ok((start, end))
}

fn handle_list(db: &Db, from: Option<String>, to: Option<String>, service_id: Option<i64>) -> Result<()> {
    let (start, end) = period(from, to)?;
    let events = Events::new(db)
        .for_period(start, end, service_id)
        .map_err(store_failure)?;
    if events.is_empty() {
        msg_info!(Message::NoEventsFound);
        return Ok(());
    }
    msg_print!(Message::EventsHeader(start, end), true);
    View::events(&events)
}

fn handle_young(db: &Db, viewer: &Viewer, id: Option<i64>) -> Result<()> {
    let young = match young::select(db, viewer, id, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(()),
    };
    let events = Events::new(db)
        .for_young(young.id.unwrap_or_default())
        .map_err(store_failure)?;
    if events.is_empty() {
        msg_info!(Message::NoEventsFound);
        return Ok(());
    }
    msg_print!(Message::YoungEventsHeader(young.display_name()), true);
    View::events(&events)
}

fn collect(db: &Db, viewer: &Viewer, fields: EventFields, current: &Event, linked: &[i64], interactive: bool) -> Result<(Event, Vec<i64>)> {
    if !interactive {
        let event = Event {
            id: current.id,
            name: fields.name.unwrap_or_else(|| current.name.clone()),
            start: fields.start.as_deref().map(parse_datetime).transpose()?.unwrap_or(current.start),
            end: fields.end.as_deref().map(parse_datetime).transpose()?.unwrap_or(current.end),
            event_type: fields.event_type.or(current.event_type),
            user_id: fields.user.or(current.user_id),
        };
        let youngs = if fields.youngs.is_empty() { linked.to_vec() } else { fields.youngs };
        return Ok((event, youngs));
    }

    let users = Users::new(db).list_for_form().map_err(store_failure)?;
    let residents = young::choices(db, viewer.service_id)?;
    let name = prompt::text(Message::PromptEventName, fields.name, prompt::non_empty(&current.name))?;
    let start = prompt::datetime(Message::PromptEventStart, fields.start, Some(current.start))?;
    let end = prompt::datetime(Message::PromptEventEnd, fields.end, Some(current.end.max(start)))?;
    let event = Event {
        id: current.id,
        name,
        start,
        end,
        event_type: prompt::optional_choice(Message::SelectEventType, fields.event_type, EventType::ALL, current.event_type)?,
        user_id: prompt::optional_record(Message::SelectResponsible, fields.user, &users, current.user_id)?,
    };
    let youngs = prompt::records(Message::SelectConcernedYoungs, fields.youngs, &residents, linked)?;
    Ok((event, youngs))
}

fn handle_add(db: &Db, viewer: &Viewer, fields: EventFields) -> Result<()> {
    let interactive = fields.name.is_none() || fields.start.is_none() || fields.end.is_none();
    let now = chrono::Local::now().naive_local();
    let mut blank = Event::new("", now, now + Duration::hours(1));
    blank.user_id = Some(viewer.user_id());
    let (event, youngs) = collect(db, viewer, fields, &blank, &[], interactive)?;

    Events::new(db).insert(&event, &youngs).map_err(store_failure)?;
    msg_success!(Message::EventCreated(event.name));
    Ok(())
}

fn get(db: &Db, id: i64) -> Result<Option<(Event, Vec<i64>)>> {
    let found = Events::new(db).get(id).map_err(store_failure)?;
    if found.is_none() {
        msg_info!(Message::RecordNotFound("event".into(), id));
    }
    Ok(found)
}

fn handle_edit(db: &Db, viewer: &Viewer, id: i64, fields: EventFields) -> Result<()> {
    let (current, linked) = match get(db, id)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let (event, youngs) = collect(db, viewer, fields, &current, &linked, interactive)?;
    if event == current && youngs == linked {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Events::new(db).update(id, &event, &youngs).map_err(store_failure)?;
    msg_success!(Message::EventUpdated(event.name));
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    let (event, _) = match get(db, id)? {
        Some(found) => found,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteEvent(event.name.clone()), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Events::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::EventDeleted(event.name));
    Ok(())
}
