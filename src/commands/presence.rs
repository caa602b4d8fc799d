use crate::{
    commands::{event::period, open_db, prompt, store_failure, Viewer},
    db::{
        daily_life::{DailyLife, PresenceEntry},
        db::Db,
    },
    libs::{
        dates::{parse_date, today},
        messages::Message,
        view::View,
        vocabulary::{MealType, PresenceStatus},
    },
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct PresenceArgs {
    #[command(subcommand)]
    command: Option<PresenceCommand>,
}

#[derive(Debug, Subcommand)]
enum PresenceCommand {
    /// Presence and meals of every resident for a day
    Show {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Record one resident, or walk through every resident when none is given
    Set {
        young: Option<i64>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum)]
        status: Option<PresenceStatus>,
        #[arg(long, value_enum)]
        lunch: Option<MealType>,
        #[arg(long, value_enum)]
        dinner: Option<MealType>,
        #[arg(long)]
        all: bool,
    },
    /// Days per status over a period, the current week by default
    Summary {
        #[arg(long)]
        from: Option<String>,
        #[arg(long)]
        to: Option<String>,
        #[arg(long)]
        all: bool,
    },
}

pub fn cmd(args: PresenceArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(PresenceCommand::Show { date: None, all: false }) {
        PresenceCommand::Show { date, all } => handle_show(&db, day(date)?, viewer.service_filter(all)),
        PresenceCommand::Set {
            young,
            date,
            status,
            lunch,
            dinner,
            all,
        } => {
            let date = day(date)?;
            let service = viewer.service_filter(all);
            match young {
                Some(young_id) => handle_set_one(&db, date, service, young_id, status, lunch, dinner),
                None => handle_set_day(&db, date, service),
            }
        }
        PresenceCommand::Summary { from, to, all } => {
            let (start, end) = period(from, to)?;
            handle_summary(&db, start, end, viewer.service_filter(all))
        }
    }
}

pub(crate) fn day(date: Option<String>) -> Result<NaiveDate> {
    Ok(date.as_deref().map(parse_date).transpose()?.unwrap_or_else(today))
}

fn handle_show(db: &Db, date: NaiveDate, service: Option<i64>) -> Result<()> {
    let rows = DailyLife::new(db).presence_for_date(date, service).map_err(store_failure)?;
    if rows.is_empty() {
        msg_info!(Message::NoYoungsFound);
        return Ok(());
    }
    msg_print!(Message::PresenceHeader(date), true);
    View::presence(&rows)
}

fn handle_set_one(
    db: &Db,
    date: NaiveDate,
    service: Option<i64>,
    young_id: i64,
    status: Option<PresenceStatus>,
    lunch: Option<MealType>,
    dinner: Option<MealType>,
) -> Result<()> {
    let daily = DailyLife::new(db);
    let rows = daily.presence_for_date(date, service).map_err(store_failure)?;
    let row = rows
        .iter()
        .find(|r| r.entry.young_id == young_id)
        .ok_or_else(|| msg_error_anyhow!(Message::RecordNotFound("young".into(), young_id)))?;

    let entry = if status.is_none() && lunch.is_none() && dinner.is_none() {
        ask(&row.name, row.entry)?
    } else {
        PresenceEntry {
            young_id,
            status: status.unwrap_or(row.entry.status),
            lunch: lunch.unwrap_or(row.entry.lunch),
            dinner: dinner.unwrap_or(row.entry.dinner),
        }
    };
    daily.save_day_presence(date, &[entry]).map_err(store_failure)?;
    msg_success!(Message::PresenceSaved(date, 1));
    Ok(())
}

fn ask(name: &str, current: PresenceEntry) -> Result<PresenceEntry> {
    let status = prompt::choice(
        Message::SelectPresenceStatus(name.to_string()),
        None,
        PresenceStatus::ALL,
        Some(current.status),
    )?;
    let lunch = if status.allows_lunch() {
        prompt::choice(Message::SelectLunch, None, MealType::ALL, Some(current.lunch))?
    } else {
        MealType::NoMeal
    };
    let dinner = if status.allows_dinner() {
        prompt::choice(Message::SelectDinner, None, MealType::ALL, Some(current.dinner))?
    } else {
        MealType::NoMeal
    };
    Ok(PresenceEntry {
        young_id: current.young_id,
        status,
        lunch,
        dinner,
    })
}

fn handle_set_day(db: &Db, date: NaiveDate, service: Option<i64>) -> Result<()> {
    let daily = DailyLife::new(db);
    let rows = daily.presence_for_date(date, service).map_err(store_failure)?;
    if rows.is_empty() {
        msg_info!(Message::NoYoungsFound);
        return Ok(());
    }
    msg_print!(Message::PresenceHeader(date), true);

    let entries = rows
        .iter()
        .map(|row| ask(&row.name, row.entry))
        .collect::<Result<Vec<_>>>()?;
    daily.save_day_presence(date, &entries).map_err(store_failure)?;
    msg_success!(Message::PresenceSaved(date, entries.len()));
    Ok(())
}

fn handle_summary(db: &Db, start: NaiveDate, end: NaiveDate, service: Option<i64>) -> Result<()> {
    let rows = DailyLife::new(db)
        .presence_summary(start, end, service)
        .map_err(store_failure)?;
    if rows.is_empty() {
        msg_info!(Message::NoYoungsFound);
        return Ok(());
    }
    msg_print!(Message::PresenceSummaryHeader(start, end), true);
    View::presence_summary(&rows)
}
