use crate::{
    commands::{open_db, prompt, store_failure, young, Viewer},
    db::{
        db::Db,
        reports::{Report, ReportSections, Reports},
    },
    libs::{
        dates::today,
        formatter::{date_or_not_provided, or_not_provided},
        messages::Message,
        view::View,
        vocabulary::{ReportStatus, ReportType},
    },
    msg_error_anyhow, msg_info, msg_print, msg_success, msg_warning,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ReportArgs {
    #[command(subcommand)]
    command: Option<ReportCommand>,
}

#[derive(Debug, Args)]
struct SectionFields {
    #[arg(long, value_enum)]
    r#type: Option<ReportType>,
    #[arg(long)]
    situation: Option<String>,
    #[arg(long)]
    reception: Option<String>,
    #[arg(long)]
    schooling: Option<String>,
    #[arg(long)]
    health: Option<String>,
    #[arg(long)]
    family: Option<String>,
    #[arg(long)]
    psychological: Option<String>,
    #[arg(long)]
    recommendations: Option<String>,
}

impl SectionFields {
    fn is_empty(&self) -> bool {
        self.r#type.is_none()
            && self.situation.is_none()
            && self.reception.is_none()
            && self.schooling.is_none()
            && self.health.is_none()
            && self.family.is_none()
            && self.psychological.is_none()
            && self.recommendations.is_none()
    }
}

#[derive(Debug, Subcommand)]
enum ReportCommand {
    List {
        /// Only the reports about this resident
        #[arg(long)]
        young: Option<i64>,
    },
    Show { id: i64 },
    Add {
        #[arg(long)]
        young: Option<i64>,
        #[command(flatten)]
        fields: SectionFields,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        fields: SectionFields,
    },
    /// Validate a pending report (administrators)
    Validate { id: i64 },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: ReportArgs) -> Result<()> {
    let db = open_db()?;

    match args.command.unwrap_or(ReportCommand::List { young: None }) {
        ReportCommand::List { young } => {
            Viewer::require(&db)?;
            handle_list(&db, young)
        }
        ReportCommand::Show { id } => {
            Viewer::require(&db)?;
            handle_show(&db, id)
        }
        ReportCommand::Add { young, fields } => handle_add(&db, &Viewer::require(&db)?, young, fields),
        ReportCommand::Edit { id, fields } => {
            Viewer::require(&db)?;
            handle_edit(&db, id, fields)
        }
        ReportCommand::Validate { id } => handle_validate(&db, &Viewer::require_admin(&db)?, id),
        ReportCommand::Delete { id, yes } => {
            Viewer::require(&db)?;
            handle_delete(&db, id, yes)
        }
    }
}

fn handle_list(db: &Db, young: Option<i64>) -> Result<()> {
    let reports = Reports::new(db).list(young).map_err(store_failure)?;
    if reports.is_empty() {
        msg_info!(Message::NoReportsFound);
        return Ok(());
    }
    msg_print!(Message::ReportsHeader, true);
    View::reports(&reports)
}

fn handle_show(db: &Db, id: i64) -> Result<()> {
    let details = Reports::new(db)
        .details(id)
        .map_err(store_failure)?
        .ok_or_else(|| msg_error_anyhow!(Message::RecordNotFound("report".into(), id)))?;
    let report = &details.report;

    let mut fields = vec![
        ("Jeune", details.young.display_name()),
        ("Type", report.report_type.to_string()),
        ("Statut", report.status.to_string()),
        ("Rédacteur", details.author_name.clone()),
        ("Validateur", or_not_provided(details.validator_name.as_deref())),
        ("Date de validation", date_or_not_provided(report.written_on)),
    ];
    for (title, body) in report.sections.titled() {
        fields.push((title, or_not_provided(body)));
    }
    View::details(&fields)
}

fn collect(fields: SectionFields, current: &Report, interactive: bool) -> Result<(ReportType, ReportSections)> {
    let sections = &current.sections;
    if !interactive {
        return Ok((
            fields.r#type.unwrap_or(current.report_type),
            ReportSections {
                situation: fields.situation.or_else(|| sections.situation.clone()),
                reception: fields.reception.or_else(|| sections.reception.clone()),
                schooling: fields.schooling.or_else(|| sections.schooling.clone()),
                health: fields.health.or_else(|| sections.health.clone()),
                family: fields.family.or_else(|| sections.family.clone()),
                psychological: fields.psychological.or_else(|| sections.psychological.clone()),
                recommendations: fields.recommendations.or_else(|| sections.recommendations.clone()),
            },
        ));
    }

    let report_type = prompt::choice(Message::SelectReportType, fields.r#type, ReportType::ALL, Some(current.report_type))?;
    let section = |title: &str, given: Option<String>, current: &Option<String>| {
        prompt::optional_text(Message::PromptSection(title.to_string()), given, current.as_deref())
    };
    Ok((
        report_type,
        ReportSections {
            situation: section("Rappel de la situation", fields.situation, &sections.situation)?,
            reception: section("Accueil", fields.reception, &sections.reception)?,
            schooling: section("Scolarité", fields.schooling, &sections.schooling)?,
            health: section("Soin / Santé", fields.health, &sections.health)?,
            family: section("Famille", fields.family, &sections.family)?,
            psychological: section("Psychologique", fields.psychological, &sections.psychological)?,
            recommendations: section("Préconisations", fields.recommendations, &sections.recommendations)?,
        },
    ))
}

fn handle_add(db: &Db, viewer: &Viewer, young_id: Option<i64>, fields: SectionFields) -> Result<()> {
    let young = match young::select(db, viewer, young_id, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(()),
    };
    let interactive = fields.r#type.is_none();
    let blank = Report::new(ReportType::Synthesis, young.id.unwrap_or_default(), viewer.user_id());
    let (report_type, sections) = collect(fields, &blank, interactive)?;

    let report = Report {
        report_type,
        sections,
        ..blank
    };
    let id = Reports::new(db).insert(&report).map_err(store_failure)?;
    msg_success!(Message::ReportCreated(id, young.display_name()));
    Ok(())
}

fn get(db: &Db, id: i64) -> Result<Report> {
    Reports::new(db)
        .get(id)
        .map_err(store_failure)?
        .ok_or_else(|| msg_error_anyhow!(Message::RecordNotFound("report".into(), id)))
}

fn handle_edit(db: &Db, id: i64, fields: SectionFields) -> Result<()> {
    let current = get(db, id)?;
    if current.is_validated() {
        msg_warning!(Message::EditingValidatedReport(id));
    }
    let interactive = fields.is_empty();
    let (report_type, sections) = collect(fields, &current, interactive)?;
    if report_type == current.report_type && sections == current.sections {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Reports::new(db).update(id, report_type, &sections).map_err(store_failure)?;
    msg_success!(Message::ReportUpdated(id));
    Ok(())
}

fn handle_validate(db: &Db, viewer: &Viewer, id: i64) -> Result<()> {
    let report = get(db, id)?;
    if report.status == ReportStatus::Validated {
        msg_info!(Message::ReportAlreadyValidated(id));
        return Ok(());
    }
    let validated = Reports::new(db)
        .validate(id, viewer.user_id(), today())
        .map_err(store_failure)?;
    if validated {
        msg_success!(Message::ReportValidated(id, viewer.session.login.clone()));
    } else {
        msg_info!(Message::ReportAlreadyValidated(id));
    }
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    get(db, id)?;
    if !prompt::confirm(Message::ConfirmDeleteReport(id), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Reports::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::ReportDeleted(id));
    Ok(())
}
