use crate::{
    commands::{open_db, prompt, store_failure, Viewer},
    db::{
        db::Db,
        services::Services,
        tasks_hebdo::{WeeklyTask, WeeklyTasks},
    },
    libs::{messages::Message, view::View, vocabulary::Weekday},
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct HebdoArgs {
    #[command(subcommand)]
    command: Option<HebdoCommand>,
}

#[derive(Debug, Subcommand)]
enum HebdoCommand {
    List {
        #[arg(long, conflicts_with = "all")]
        service: Option<i64>,
        /// Weekly tasks of every service
        #[arg(long)]
        all: bool,
    },
    /// Weekly tasks falling on one day
    Day {
        #[arg(value_enum)]
        day: Weekday,
    },
    Add {
        #[arg(long, value_enum)]
        day: Option<Weekday>,
        #[arg(long)]
        description: Option<String>,
        /// Defaults to the logged-in user's service
        #[arg(long)]
        service: Option<i64>,
    },
    Edit {
        id: i64,
        #[arg(long, value_enum)]
        day: Option<Weekday>,
        #[arg(long)]
        description: Option<String>,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: HebdoArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(HebdoCommand::List { service: None, all: false }) {
        HebdoCommand::List { service, all } => handle_list(&db, viewer.scope(service, all)),
        HebdoCommand::Day { day } => handle_day(&db, &viewer, day),
        HebdoCommand::Add {
            day,
            description,
            service,
        } => handle_add(&db, &viewer, day, description, service),
        HebdoCommand::Edit { id, day, description } => handle_edit(&db, id, day, description),
        HebdoCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn handle_list(db: &Db, service: Option<i64>) -> Result<()> {
    let tasks = WeeklyTasks::new(db).list(service).map_err(store_failure)?;
    if tasks.is_empty() {
        msg_info!(Message::NoWeeklyTasksFound);
        return Ok(());
    }
    msg_print!(Message::WeeklyTasksHeader, true);
    View::weekly_tasks(&tasks)
}

fn handle_day(db: &Db, viewer: &Viewer, day: Weekday) -> Result<()> {
    let service_id = viewer
        .service_id
        .ok_or_else(|| msg_error_anyhow!(Message::NoServiceAssigned))?;
    let tasks = WeeklyTasks::new(db).for_day(day, service_id).map_err(store_failure)?;
    if tasks.is_empty() {
        msg_info!(Message::NoWeeklyTasksFound);
        return Ok(());
    }
    View::weekly_tasks(&tasks)
}

fn handle_add(db: &Db, viewer: &Viewer, day: Option<Weekday>, description: Option<String>, service: Option<i64>) -> Result<()> {
    let services = Services::new(db).list_for_form().map_err(store_failure)?;
    let service_id = match service.or(viewer.service_id) {
        Some(id) => id,
        None => prompt::record(Message::SelectService, None, &services)?
            .ok_or_else(|| msg_error_anyhow!(Message::NoServicesFound))?,
    };
    let day = prompt::choice(Message::SelectWeekday, day, Weekday::ALL, None)?;
    let description = prompt::text(Message::PromptTaskDescription, description, None)?;

    let task = WeeklyTask::new(day, &description, service_id);
    WeeklyTasks::new(db).insert(&task).map_err(store_failure)?;
    msg_success!(Message::WeeklyTaskCreated(day.to_string()));
    Ok(())
}

fn get(db: &Db, id: i64) -> Result<Option<WeeklyTask>> {
    let task = WeeklyTasks::new(db).get(id).map_err(store_failure)?;
    if task.is_none() {
        msg_info!(Message::RecordNotFound("weekly task".into(), id));
    }
    Ok(task)
}

fn handle_edit(db: &Db, id: i64, day: Option<Weekday>, description: Option<String>) -> Result<()> {
    let current = match get(db, id)? {
        Some(task) => task,
        None => return Ok(()),
    };
    let (day, description) = if day.is_none() && description.is_none() {
        (
            prompt::choice(Message::SelectWeekday, None, Weekday::ALL, Some(current.day))?,
            prompt::text(Message::PromptTaskDescription, None, Some(&current.description))?,
        )
    } else {
        (day.unwrap_or(current.day), description.unwrap_or_else(|| current.description.clone()))
    };
    if day == current.day && description == current.description {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    WeeklyTasks::new(db).update(id, day, &description).map_err(store_failure)?;
    msg_success!(Message::WeeklyTaskUpdated(id));
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    let task = match get(db, id)? {
        Some(task) => task,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteWeeklyTask(task.description), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    WeeklyTasks::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::WeeklyTaskDeleted(id));
    Ok(())
}
