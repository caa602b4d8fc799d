use crate::{
    commands::{open_db, store_failure, Viewer},
    libs::{dashboard::Dashboard, dates::today, messages::Message, view::View},
    msg_info, msg_print,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct DashboardArgs {
    /// Every service instead of the logged-in user's own
    #[arg(long)]
    all: bool,
}

pub fn cmd(args: DashboardArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;
    let dashboard = Dashboard::load(&db, today(), viewer.service_filter(args.all)).map_err(store_failure)?;

    msg_print!(Message::DashboardHeader(dashboard.date, viewer.session.login.clone()), true);
    if dashboard.is_empty() {
        msg_info!(Message::DashboardEmpty);
        return Ok(());
    }

    msg_print!(Message::TodayEventsHeader, true);
    if dashboard.events.is_empty() {
        msg_info!(Message::NoEventsFound);
    } else {
        View::events(&dashboard.events)?;
    }

    msg_print!(Message::UrgentTasksHeader, true);
    if dashboard.urgent_tasks.is_empty() {
        msg_info!(Message::NoTasksFound);
    } else {
        View::tasks(&dashboard.urgent_tasks)?;
    }

    msg_print!(Message::LatestTransmissionsHeader, true);
    if dashboard.transmissions.is_empty() {
        msg_info!(Message::NoTransmissionsFound);
    } else {
        View::transmissions(&dashboard.transmissions)?;
    }
    Ok(())
}
