use crate::{
    commands::{event::period, open_db, store_failure, young, Viewer},
    db::{daily_life::DailyLife, projets::Projets, reports::Reports},
    libs::{
        export::{Document, ExportFormat, Exporter, Table},
        messages::Message,
    },
    msg_error_anyhow, msg_info,
};
use anyhow::Result;
use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct ExportArgs {
    #[command(subcommand)]
    command: ExportCommand,
}

#[derive(Debug, Args)]
struct OutputArgs {
    #[arg(short, long, value_enum, default_value_t = ExportFormat::Text)]
    format: ExportFormat,
    /// Destination file; a dated name in the current directory by default
    #[arg(short, long)]
    output: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum SummaryKind {
    Presence,
    Meals,
}

#[derive(Debug, Subcommand)]
enum ExportCommand {
    /// A validated report
    Report {
        id: i64,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// A resident's personalised project
    Projet {
        #[arg(long)]
        young: Option<i64>,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Presence or meal summary over a period
    Summary {
        #[arg(value_enum)]
        kind: SummaryKind,
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        all: bool,
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Csv)]
        format: ExportFormat,
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

pub fn cmd(args: ExportArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command {
        ExportCommand::Report { id, output } => {
            let details = Reports::new(&db)
                .details(id)
                .map_err(store_failure)?
                .ok_or_else(|| msg_error_anyhow!(Message::RecordNotFound("report".into(), id)))?;
            let document = Document::report(&details)?;
            Exporter::for_document(output.format, output.output, &document).export(&document)?;
        }
        ExportCommand::Projet { young, output } => {
            let young = match young::select(&db, &viewer, young, Message::SelectYoung)? {
                Some(young) => young,
                None => return Ok(()),
            };
            let details = match Projets::new(&db)
                .for_young(young.id.unwrap_or_default())
                .map_err(store_failure)?
            {
                Some(details) => details,
                None => {
                    msg_info!(Message::NoProjetForYoung(young.display_name()));
                    return Ok(());
                }
            };
            let document = Document::projet(&details);
            Exporter::for_document(output.format, output.output, &document).export(&document)?;
        }
        ExportCommand::Summary {
            kind,
            from,
            to,
            all,
            format,
            output,
        } => {
            let (start, end) = period(from, to)?;
            let daily = DailyLife::new(&db);
            let service = viewer.service_filter(all);
            let table = match kind {
                SummaryKind::Presence => {
                    let rows = daily.presence_summary(start, end, service).map_err(store_failure)?;
                    Table::presence_summary(start, end, &rows)
                }
                SummaryKind::Meals => {
                    let summary = daily.weekly_meal_summary(start, end, service).map_err(store_failure)?;
                    Table::meal_summary(start, end, &summary)
                }
            };
            Exporter::for_table(format, output, &table).export_table(&table)?;
        }
    }
    Ok(())
}
