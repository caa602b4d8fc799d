use crate::{
    commands::{open_db, prompt, store_failure, Viewer},
    db::{
        contacts::Contacts,
        db::Db,
        services::Services,
        users::Users,
        youngs::{Young, Youngs},
    },
    libs::{
        dates::parse_date,
        formatter::{date_or_not_provided, or_not_provided},
        messages::Message,
        view::View,
        vocabulary::{AccompanimentType, AdmissionStatus, PlacementType},
    },
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct YoungArgs {
    #[command(subcommand)]
    command: Option<YoungCommand>,
}

#[derive(Debug, Args)]
struct YoungFields {
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    /// Birth date (JJ/MM/AAAA or AAAA-MM-JJ)
    #[arg(long)]
    birth_date: Option<String>,
    #[arg(long)]
    birth_place: Option<String>,
    #[arg(long)]
    entry_date: Option<String>,
    #[arg(long, value_enum)]
    placement: Option<PlacementType>,
    #[arg(long, value_enum)]
    accompaniment: Option<AccompanimentType>,
    #[arg(long, value_enum)]
    status: Option<AdmissionStatus>,
    #[arg(long)]
    referent: Option<i64>,
    #[arg(long)]
    co_referent: Option<i64>,
    #[arg(long)]
    placement_end_date: Option<String>,
    #[arg(long)]
    hearing_date: Option<String>,
    #[arg(long)]
    care_synthesis_date: Option<String>,
    #[arg(long)]
    contract_end_date: Option<String>,
    #[arg(long)]
    exit_date: Option<String>,
    #[arg(long)]
    service: Option<i64>,
}

impl YoungFields {
    fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.birth_date.is_none()
            && self.birth_place.is_none()
            && self.entry_date.is_none()
            && self.placement.is_none()
            && self.accompaniment.is_none()
            && self.status.is_none()
            && self.referent.is_none()
            && self.co_referent.is_none()
            && self.placement_end_date.is_none()
            && self.hearing_date.is_none()
            && self.care_synthesis_date.is_none()
            && self.contract_end_date.is_none()
            && self.exit_date.is_none()
            && self.service.is_none()
    }
}

#[derive(Debug, Subcommand)]
enum YoungCommand {
    List {
        #[arg(long, conflicts_with = "all")]
        service: Option<i64>,
        /// Residents of every service
        #[arg(long)]
        all: bool,
    },
    /// Full record with family contacts
    Show { id: Option<i64> },
    Add(YoungFields),
    Edit {
        id: Option<i64>,
        #[command(flatten)]
        fields: YoungFields,
    },
    Delete {
        id: Option<i64>,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: YoungArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(YoungCommand::List { service: None, all: false }) {
        YoungCommand::List { service, all } => handle_list(&db, viewer.scope(service, all)),
        YoungCommand::Show { id } => handle_show(&db, &viewer, id),
        YoungCommand::Add(fields) => handle_add(&db, &viewer, fields),
        YoungCommand::Edit { id, fields } => handle_edit(&db, &viewer, id, fields),
        YoungCommand::Delete { id, yes } => handle_delete(&db, &viewer, id, yes),
    }
}

/// `(id, name)` pairs of the residents of `service_id` (or every resident).
pub(crate) fn choices(db: &Db, service_id: Option<i64>) -> Result<Vec<(i64, String)>> {
    let youngs = Youngs::new(db).list(service_id).map_err(store_failure)?;
    Ok(youngs.into_iter().map(|y| (y.id, y.display_name())).collect())
}

/// Resolves one resident, prompting among the viewer's residents when `id` is missing.
pub(crate) fn select(db: &Db, viewer: &Viewer, id: Option<i64>, prompt_message: Message) -> Result<Option<Young>> {
    let items = if id.is_none() { choices(db, viewer.service_id)? } else { Vec::new() };
    let id = match prompt::record(prompt_message, id, &items)? {
        Some(id) => id,
        None => {
            msg_info!(Message::NoYoungsFound);
            return Ok(None);
        }
    };
    match Youngs::new(db).get(id).map_err(store_failure)? {
        Some(young) => Ok(Some(young)),
        None => {
            msg_info!(Message::RecordNotFound("young".into(), id));
            Ok(None)
        }
    }
}

fn handle_list(db: &Db, service: Option<i64>) -> Result<()> {
    let youngs = Youngs::new(db).list(service).map_err(store_failure)?;
    if youngs.is_empty() {
        msg_info!(Message::NoYoungsFound);
        return Ok(());
    }
    msg_print!(Message::YoungsHeader, true);
    View::youngs(&youngs)
}

fn user_name(db: &Db, id: Option<i64>) -> Result<String> {
    let user = match id {
        Some(id) => Users::new(db).get(id).map_err(store_failure)?,
        None => None,
    };
    Ok(or_not_provided(user.map(|u| u.display_name()).as_deref()))
}

fn handle_show(db: &Db, viewer: &Viewer, id: Option<i64>) -> Result<()> {
    let young = match select(db, viewer, id, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(()),
    };
    let service = match young.service_id {
        Some(id) => Services::new(db).get(id).map_err(store_failure)?.map(|s| s.name),
        None => None,
    };

    View::details(&[
        ("Nom", young.display_name()),
        ("Date de naissance", date_or_not_provided(young.birth_date)),
        ("Lieu de naissance", or_not_provided(young.birth_place.as_deref())),
        ("Date d'entrée", date_or_not_provided(young.entry_date)),
        ("Type de placement", or_not_provided(young.placement_type.map(|t| t.as_str()))),
        ("Accompagnement", or_not_provided(young.accompaniment_type.map(|t| t.as_str()))),
        ("Statut", young.admission_status.to_string()),
        ("Référent", user_name(db, young.referent_id)?),
        ("Co-référent", user_name(db, young.co_referent_id)?),
        ("Échéance placement", date_or_not_provided(young.placement_end_date)),
        ("Audience", date_or_not_provided(young.hearing_date)),
        ("Synthèse PEC", date_or_not_provided(young.care_synthesis_date)),
        ("Échéance CJM", date_or_not_provided(young.young_adult_contract_end_date)),
        ("Date de sortie", date_or_not_provided(young.exit_date)),
        ("Service", or_not_provided(service.as_deref())),
    ])?;

    let contacts = Contacts::new(db)
        .list_for_young(young.id.unwrap_or_default())
        .map_err(store_failure)?;
    if contacts.is_empty() {
        msg_info!(Message::NoContactsFound);
        return Ok(());
    }
    msg_print!(Message::ContactsHeader(young.display_name()), true);
    View::contacts(&contacts)
}

fn flag_date(value: Option<String>) -> Result<Option<chrono::NaiveDate>> {
    value.as_deref().map(parse_date).transpose()
}

fn collect(db: &Db, fields: YoungFields, current: &Young, interactive: bool) -> Result<Young> {
    if !interactive {
        return Ok(Young {
            id: current.id,
            last_name: fields.last_name.unwrap_or_else(|| current.last_name.clone()),
            first_name: fields.first_name.unwrap_or_else(|| current.first_name.clone()),
            birth_date: flag_date(fields.birth_date)?.or(current.birth_date),
            birth_place: fields.birth_place.or_else(|| current.birth_place.clone()),
            entry_date: flag_date(fields.entry_date)?.or(current.entry_date),
            placement_type: fields.placement.or(current.placement_type),
            accompaniment_type: fields.accompaniment.or(current.accompaniment_type),
            admission_status: fields.status.unwrap_or(current.admission_status),
            referent_id: fields.referent.or(current.referent_id),
            co_referent_id: fields.co_referent.or(current.co_referent_id),
            placement_end_date: flag_date(fields.placement_end_date)?.or(current.placement_end_date),
            hearing_date: flag_date(fields.hearing_date)?.or(current.hearing_date),
            care_synthesis_date: flag_date(fields.care_synthesis_date)?.or(current.care_synthesis_date),
            young_adult_contract_end_date: flag_date(fields.contract_end_date)?
                .or(current.young_adult_contract_end_date),
            exit_date: flag_date(fields.exit_date)?.or(current.exit_date),
            service_id: fields.service.or(current.service_id),
        });
    }

    let referents = Youngs::new(db).referents_for_form().map_err(store_failure)?;
    let services = Services::new(db).list_for_form().map_err(store_failure)?;
    Ok(Young {
        id: current.id,
        last_name: prompt::text(Message::PromptLastName, fields.last_name, prompt::non_empty(&current.last_name))?,
        first_name: prompt::text(Message::PromptFirstName, fields.first_name, prompt::non_empty(&current.first_name))?,
        birth_date: prompt::optional_date(Message::PromptBirthDate, fields.birth_date, current.birth_date)?,
        birth_place: prompt::optional_text(Message::PromptBirthPlace, fields.birth_place, current.birth_place.as_deref())?,
        entry_date: prompt::optional_date(Message::PromptEntryDate, fields.entry_date, current.entry_date)?,
        placement_type: prompt::optional_choice(
            Message::SelectPlacementType,
            fields.placement,
            PlacementType::ALL,
            current.placement_type,
        )?,
        accompaniment_type: prompt::optional_choice(
            Message::SelectAccompanimentType,
            fields.accompaniment,
            AccompanimentType::ALL,
            current.accompaniment_type,
        )?,
        admission_status: prompt::choice(
            Message::SelectAdmissionStatus,
            fields.status,
            AdmissionStatus::ALL,
            Some(current.admission_status),
        )?,
        referent_id: prompt::optional_record(Message::SelectReferent, fields.referent, &referents, current.referent_id)?,
        co_referent_id: prompt::optional_record(
            Message::SelectCoReferent,
            fields.co_referent,
            &referents,
            current.co_referent_id,
        )?,
        placement_end_date: prompt::optional_date(
            Message::PromptPlacementEndDate,
            fields.placement_end_date,
            current.placement_end_date,
        )?,
        hearing_date: prompt::optional_date(Message::PromptHearingDate, fields.hearing_date, current.hearing_date)?,
        care_synthesis_date: prompt::optional_date(
            Message::PromptCareSynthesisDate,
            fields.care_synthesis_date,
            current.care_synthesis_date,
        )?,
        young_adult_contract_end_date: prompt::optional_date(
            Message::PromptContractEndDate,
            fields.contract_end_date,
            current.young_adult_contract_end_date,
        )?,
        exit_date: prompt::optional_date(Message::PromptExitDate, fields.exit_date, current.exit_date)?,
        service_id: prompt::optional_record(Message::SelectService, fields.service, &services, current.service_id)?,
    })
}

fn handle_add(db: &Db, viewer: &Viewer, fields: YoungFields) -> Result<()> {
    let interactive = fields.last_name.is_none() || fields.first_name.is_none();
    let mut blank = Young::new("", "", AdmissionStatus::Pending);
    blank.service_id = viewer.service_id;
    let young = collect(db, fields, &blank, interactive)?;

    Youngs::new(db).insert(&young).map_err(store_failure)?;
    msg_success!(Message::YoungCreated(young.display_name()));
    Ok(())
}

fn handle_edit(db: &Db, viewer: &Viewer, id: Option<i64>, fields: YoungFields) -> Result<()> {
    let current = match select(db, viewer, id, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let young = collect(db, fields, &current, interactive)?;
    if young == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Youngs::new(db)
        .update(current.id.unwrap_or_default(), &young)
        .map_err(store_failure)?;
    msg_success!(Message::YoungUpdated(young.display_name()));
    Ok(())
}

fn handle_delete(db: &Db, viewer: &Viewer, id: Option<i64>, yes: bool) -> Result<()> {
    let young = match select(db, viewer, id, Message::SelectYoungToDelete)? {
        Some(young) => young,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteYoung(young.display_name()), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Youngs::new(db).delete(young.id.unwrap_or_default()).map_err(store_failure)?;
    msg_success!(Message::YoungDeleted(young.display_name()));
    Ok(())
}
