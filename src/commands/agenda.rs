use crate::{
    commands::{open_db, store_failure, Viewer},
    libs::{
        agenda::Agenda,
        dates::{parse_date, today},
        messages::Message,
        view::View,
    },
    msg_info, msg_print,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct AgendaArgs {
    #[command(subcommand)]
    command: Option<AgendaCommand>,
}

#[derive(Debug, Subcommand)]
enum AgendaCommand {
    /// Monday to Sunday around a date
    Week {
        #[arg(long)]
        date: Option<String>,
        /// Events of another service
        #[arg(long, conflicts_with = "all")]
        service: Option<i64>,
        /// Events of every service
        #[arg(long)]
        all: bool,
    },
    /// One day
    Day {
        #[arg(long)]
        date: Option<String>,
        #[arg(long, conflicts_with = "all")]
        service: Option<i64>,
        #[arg(long)]
        all: bool,
    },
}

pub fn cmd(args: AgendaArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(AgendaCommand::Week {
        date: None,
        service: None,
        all: false,
    }) {
        AgendaCommand::Week { date, service, all } => {
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
            let agenda =
                Agenda::week(&db, date, viewer.scope(service, all), viewer.service_id).map_err(store_failure)?;
            msg_print!(Message::AgendaWeekHeader(agenda.start, agenda.end), true);
            View::agenda(&agenda)?;
            if agenda.event_count() == 0 {
                msg_info!(Message::NoEventsFound);
            }
            Ok(())
        }
        AgendaCommand::Day { date, service, all } => {
            let date = date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today);
            let day = Agenda::day(&db, date, viewer.scope(service, all), viewer.service_id).map_err(store_failure)?;
            if day.is_empty() {
                msg_info!(Message::AgendaDayEmpty(date));
                return Ok(());
            }
            msg_print!(Message::AgendaDayHeader(date), true);
            View::agenda_day(&day)
        }
    }
}
