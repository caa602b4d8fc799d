use crate::{
    commands::{event::period, open_db, prompt, store_failure, young, Viewer},
    db::{
        db::Db,
        services::Services,
        transmissions::{Transmission, Transmissions, LATEST_LIMIT},
    },
    libs::{
        dates::parse_datetime,
        messages::Message,
        view::View,
        vocabulary::{Importance, TransmissionCategory},
    },
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TransmissionArgs {
    #[command(subcommand)]
    command: Option<TransmissionCommand>,
}

#[derive(Debug, Args)]
struct TransmissionFields {
    #[arg(long)]
    content: Option<String>,
    #[arg(long, value_enum)]
    category: Option<TransmissionCategory>,
    #[arg(long, value_enum)]
    importance: Option<Importance>,
    /// Written at, as "AAAA-MM-JJ HH:MM"; now by default
    #[arg(long)]
    at: Option<String>,
    /// Defaults to the logged-in user's service
    #[arg(long)]
    service: Option<i64>,
    #[arg(long = "young")]
    youngs: Vec<i64>,
}

impl TransmissionFields {
    fn is_empty(&self) -> bool {
        self.content.is_none()
            && self.category.is_none()
            && self.importance.is_none()
            && self.at.is_none()
            && self.service.is_none()
            && self.youngs.is_empty()
    }
}

#[derive(Debug, Subcommand)]
enum TransmissionCommand {
    /// Notes of a period, the current week by default
    List {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Every note about one resident
    Young { id: Option<i64> },
    /// Most recent notes
    Latest {
        #[arg(long, default_value_t = LATEST_LIMIT)]
        limit: usize,
        #[arg(long)]
        all: bool,
    },
    Add(TransmissionFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TransmissionFields,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TransmissionArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(TransmissionCommand::Latest {
        limit: LATEST_LIMIT,
        all: false,
    }) {
        TransmissionCommand::List { from, to, all } => {
            let (start, end) = period(from, to)?;
            let items = Transmissions::new(&db)
                .for_period(start, end, viewer.service_filter(all))
                .map_err(store_failure)?;
            show(&items, Message::TransmissionsHeader(start, end))
        }
        TransmissionCommand::Young { id } => {
            let young = match young::select(&db, &viewer, id, Message::SelectYoung)? {
                Some(young) => young,
                None => return Ok(()),
            };
            let items = Transmissions::new(&db)
                .for_young(young.id.unwrap_or_default())
                .map_err(store_failure)?;
            show(&items, Message::YoungTransmissionsHeader(young.display_name()))
        }
        TransmissionCommand::Latest { limit, all } => {
            let items = Transmissions::new(&db)
                .latest(limit, viewer.service_filter(all))
                .map_err(store_failure)?;
            show(&items, Message::LatestTransmissionsHeader)
        }
        TransmissionCommand::Add(fields) => handle_add(&db, &viewer, fields),
        TransmissionCommand::Edit { id, fields } => handle_edit(&db, &viewer, id, fields),
        TransmissionCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn show(items: &[crate::db::transmissions::TransmissionItem], header: Message) -> Result<()> {
    if items.is_empty() {
        msg_info!(Message::NoTransmissionsFound);
        return Ok(());
    }
    msg_print!(header, true);
    View::transmissions(items)
}

fn collect(
    db: &Db,
    viewer: &Viewer,
    fields: TransmissionFields,
    current: &Transmission,
    linked: &[i64],
    interactive: bool,
) -> Result<(Transmission, Vec<i64>)> {
    let written_at = fields.at.as_deref().map(parse_datetime).transpose()?.unwrap_or(current.written_at);
    if !interactive {
        let transmission = Transmission {
            id: current.id,
            service_id: fields.service.unwrap_or(current.service_id),
            user_id: current.user_id,
            written_at,
            category: fields.category.or(current.category),
            content: fields.content.unwrap_or_else(|| current.content.clone()),
            importance: fields.importance.unwrap_or(current.importance),
        };
        let youngs = if fields.youngs.is_empty() { linked.to_vec() } else { fields.youngs };
        return Ok((transmission, youngs));
    }

    let residents = young::choices(db, viewer.service_id)?;
    let transmission = Transmission {
        id: current.id,
        service_id: fields.service.unwrap_or(current.service_id),
        user_id: current.user_id,
        written_at,
        category: prompt::optional_choice(
            Message::SelectTransmissionCategory,
            fields.category,
            TransmissionCategory::ALL,
            current.category,
        )?,
        content: prompt::text(Message::PromptTransmissionContent, fields.content, prompt::non_empty(&current.content))?,
        importance: prompt::choice(Message::SelectImportance, fields.importance, Importance::ALL, Some(current.importance))?,
    };
    let youngs = prompt::records(Message::SelectConcernedYoungs, fields.youngs, &residents, linked)?;
    Ok((transmission, youngs))
}

fn handle_add(db: &Db, viewer: &Viewer, fields: TransmissionFields) -> Result<()> {
    let service_id = match fields.service.or(viewer.service_id) {
        Some(id) => id,
        None => {
            let services = Services::new(db).list_for_form().map_err(store_failure)?;
            prompt::record(Message::SelectService, None, &services)?
                .ok_or_else(|| msg_error_anyhow!(Message::NoServicesFound))?
        }
    };
    let interactive = fields.content.is_none();
    let now = chrono::Local::now().naive_local();
    let blank = Transmission::new(service_id, viewer.user_id(), now, "");
    let (transmission, youngs) = collect(db, viewer, fields, &blank, &[], interactive)?;

    Transmissions::new(db).insert(&transmission, &youngs).map_err(store_failure)?;
    msg_success!(Message::TransmissionCreated);
    Ok(())
}

fn get(db: &Db, id: i64) -> Result<Option<(Transmission, Vec<i64>)>> {
    let found = Transmissions::new(db).get(id).map_err(store_failure)?;
    if found.is_none() {
        msg_info!(Message::RecordNotFound("transmission".into(), id));
    }
    Ok(found)
}

fn handle_edit(db: &Db, viewer: &Viewer, id: i64, fields: TransmissionFields) -> Result<()> {
    let (current, linked) = match get(db, id)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let (transmission, youngs) = collect(db, viewer, fields, &current, &linked, interactive)?;
    if transmission == current && youngs == linked {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Transmissions::new(db).update(id, &transmission, &youngs).map_err(store_failure)?;
    msg_success!(Message::TransmissionUpdated(id));
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    if get(db, id)?.is_none() {
        return Ok(());
    }
    if !prompt::confirm(Message::ConfirmDeleteTransmission(id), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Transmissions::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::TransmissionDeleted(id));
    Ok(())
}
