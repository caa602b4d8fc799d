use crate::{
    commands::{open_db, prompt, store_failure, young, Viewer},
    db::{
        db::Db,
        tasks::{Task, Tasks},
        users::Users,
    },
    libs::{
        dates::{parse_date, today},
        messages::Message,
        task::TaskFilter,
        view::View,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TaskArgs {
    #[command(subcommand)]
    command: Option<TaskCommand>,
}

#[derive(Debug, Args)]
struct TaskFields {
    #[arg(long)]
    description: Option<String>,
    #[arg(long)]
    due: Option<String>,
    /// Assignee; leave empty for everyone
    #[arg(long)]
    user: Option<i64>,
    #[arg(long = "young")]
    youngs: Vec<i64>,
}

impl TaskFields {
    fn is_empty(&self) -> bool {
        self.description.is_none() && self.due.is_none() && self.user.is_none() && self.youngs.is_empty()
    }
}

#[derive(Debug, Subcommand)]
enum TaskCommand {
    List {
        /// Tasks of every service
        #[arg(long)]
        all: bool,
        /// Include completed tasks
        #[arg(long)]
        done: bool,
    },
    Add(TaskFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TaskFields,
    },
    /// Mark a task as completed
    Done { id: i64 },
    /// Reopen a completed task
    Undo { id: i64 },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TaskArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(TaskCommand::List { all: false, done: false }) {
        TaskCommand::List { all, done } => handle_list(&db, &viewer, all, done),
        TaskCommand::Add(fields) => handle_add(&db, &viewer, fields),
        TaskCommand::Edit { id, fields } => handle_edit(&db, &viewer, id, fields),
        TaskCommand::Done { id } => {
            Tasks::new(&db).mark_done(id).map_err(store_failure)?;
            msg_success!(Message::TaskCompleted(id));
            Ok(())
        }
        TaskCommand::Undo { id } => {
            Tasks::new(&db).unmark_done(id).map_err(store_failure)?;
            msg_success!(Message::TaskReopened(id));
            Ok(())
        }
        TaskCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn handle_list(db: &Db, viewer: &Viewer, all: bool, done: bool) -> Result<()> {
    let filter = TaskFilter {
        service_id: viewer.service_filter(all),
        include_done: done,
    };
    let tasks = Tasks::new(db).list(filter, today()).map_err(store_failure)?;
    if tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
        return Ok(());
    }
    msg_print!(Message::TasksHeader, true);
    View::tasks(&tasks)
}

fn collect(db: &Db, viewer: &Viewer, fields: TaskFields, current: &Task, linked: &[i64], interactive: bool) -> Result<(Task, Vec<i64>)> {
    if !interactive {
        let task = Task {
            id: current.id,
            description: fields.description.unwrap_or_else(|| current.description.clone()),
            due_date: fields.due.as_deref().map(parse_date).transpose()?.or(current.due_date),
            status: current.status,
            user_id: fields.user.or(current.user_id),
        };
        let youngs = if fields.youngs.is_empty() { linked.to_vec() } else { fields.youngs };
        return Ok((task, youngs));
    }

    let users = Users::new(db).list_for_form().map_err(store_failure)?;
    let residents = young::choices(db, viewer.service_id)?;
    let task = Task {
        id: current.id,
        description: prompt::text(
            Message::PromptTaskDescription,
            fields.description,
            prompt::non_empty(&current.description),
        )?,
        due_date: prompt::optional_date(Message::PromptDueDate, fields.due, current.due_date)?,
        status: current.status,
        user_id: prompt::optional_record(Message::SelectAssignee, fields.user, &users, current.user_id)?,
    };
    let youngs = prompt::records(Message::SelectConcernedYoungs, fields.youngs, &residents, linked)?;
    Ok((task, youngs))
}

fn handle_add(db: &Db, viewer: &Viewer, fields: TaskFields) -> Result<()> {
    let interactive = fields.description.is_none();
    let blank = Task::new("", None, None);
    let (task, youngs) = collect(db, viewer, fields, &blank, &[], interactive)?;

    Tasks::new(db).insert(&task, &youngs).map_err(store_failure)?;
    msg_success!(Message::TaskCreated(task.description));
    Ok(())
}

fn get(db: &Db, id: i64) -> Result<Option<(Task, Vec<i64>)>> {
    let found = Tasks::new(db).get(id).map_err(store_failure)?;
    if found.is_none() {
        msg_info!(Message::RecordNotFound("task".into(), id));
    }
    Ok(found)
}

fn handle_edit(db: &Db, viewer: &Viewer, id: i64, fields: TaskFields) -> Result<()> {
    let (current, linked) = match get(db, id)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let (task, youngs) = collect(db, viewer, fields, &current, &linked, interactive)?;
    if task == current && youngs == linked {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Tasks::new(db).update(id, &task, &youngs).map_err(store_failure)?;
    msg_success!(Message::TaskUpdated(id));
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    let (task, _) = match get(db, id)? {
        Some(found) => found,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteTask(task.description), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Tasks::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::TaskDeleted(id));
    Ok(())
}
