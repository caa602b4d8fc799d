use crate::{
    commands::{open_db, presence::day, prompt, store_failure, Viewer},
    db::{
        daily_life::{DailyLife, ProfessionalMealEntry},
        db::Db,
    },
    libs::{dates::week_bounds, messages::Message, view::View, vocabulary::MealType},
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct MealsArgs {
    #[command(subcommand)]
    command: Option<MealsCommand>,
}

#[derive(Debug, Subcommand)]
enum MealsCommand {
    /// Staff meal choices for a day
    Staff {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Record staff meals; the logged-in user by default, every staff member with --everyone
    StaffSet {
        #[arg(long)]
        user: Option<i64>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long, value_enum)]
        lunch: Option<MealType>,
        #[arg(long, value_enum)]
        dinner: Option<MealType>,
        #[arg(long)]
        everyone: bool,
    },
    /// Meal headcount for the kitchen
    Counts {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        all: bool,
    },
    /// Daily headcounts over the week containing the date
    Week {
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        all: bool,
    },
}

pub fn cmd(args: MealsArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(MealsCommand::Counts { date: None, all: false }) {
        MealsCommand::Staff { date, all } => handle_staff(&db, day(date)?, viewer.service_filter(all)),
        MealsCommand::StaffSet {
            user,
            date,
            lunch,
            dinner,
            everyone,
        } => {
            let date = day(date)?;
            if everyone {
                handle_staff_set_all(&db, date, viewer.service_id)
            } else {
                handle_staff_set_one(&db, date, user.unwrap_or(viewer.user_id()), lunch, dinner)
            }
        }
        MealsCommand::Counts { date, all } => {
            let date = day(date)?;
            let counts = DailyLife::new(&db)
                .meal_counts_for_date(date, viewer.service_filter(all))
                .map_err(store_failure)?;
            msg_print!(Message::MealCountsHeader(date), true);
            View::meal_counts(&counts)
        }
        MealsCommand::Week { date, all } => {
            let (start, end) = week_bounds(day(date)?);
            let summary = DailyLife::new(&db)
                .weekly_meal_summary(start, end, viewer.service_filter(all))
                .map_err(store_failure)?;
            msg_print!(Message::WeeklyMealsHeader(start, end), true);
            View::weekly_meals(&summary)
        }
    }
}

fn handle_staff(db: &Db, date: NaiveDate, service: Option<i64>) -> Result<()> {
    let rows = DailyLife::new(db)
        .professional_meals_for_date(date, service)
        .map_err(store_failure)?;
    if rows.is_empty() {
        msg_info!(Message::NoUsersFound);
        return Ok(());
    }
    msg_print!(Message::StaffMealsHeader(date), true);
    View::professional_meals(&rows)
}

fn ask(name: &str, current: ProfessionalMealEntry) -> Result<ProfessionalMealEntry> {
    msg_print!(Message::StaffMealsFor(name.to_string()));
    Ok(ProfessionalMealEntry {
        user_id: current.user_id,
        lunch: prompt::choice(Message::SelectLunch, None, MealType::ALL, Some(current.lunch))?,
        dinner: prompt::choice(Message::SelectDinner, None, MealType::ALL, Some(current.dinner))?,
    })
}

fn handle_staff_set_one(db: &Db, date: NaiveDate, user_id: i64, lunch: Option<MealType>, dinner: Option<MealType>) -> Result<()> {
    let daily = DailyLife::new(db);
    let rows = daily.professional_meals_for_date(date, None).map_err(store_failure)?;
    let row = rows
        .iter()
        .find(|r| r.entry.user_id == user_id)
        .ok_or_else(|| msg_error_anyhow!(Message::RecordNotFound("user".into(), user_id)))?;

    let entry = if lunch.is_none() && dinner.is_none() {
        ask(&row.name, row.entry)?
    } else {
        ProfessionalMealEntry {
            user_id,
            lunch: lunch.unwrap_or(row.entry.lunch),
            dinner: dinner.unwrap_or(row.entry.dinner),
        }
    };
    daily.save_professional_meals(date, &[entry]).map_err(store_failure)?;
    msg_success!(Message::StaffMealsSaved(date, 1));
    Ok(())
}

fn handle_staff_set_all(db: &Db, date: NaiveDate, service: Option<i64>) -> Result<()> {
    let daily = DailyLife::new(db);
    let rows = daily.professional_meals_for_date(date, service).map_err(store_failure)?;
    if rows.is_empty() {
        msg_info!(Message::NoUsersFound);
        return Ok(());
    }
    let entries = rows
        .iter()
        .map(|row| ask(&row.name, row.entry))
        .collect::<Result<Vec<_>>>()?;
    daily.save_professional_meals(date, &entries).map_err(store_failure)?;
    msg_success!(Message::StaffMealsSaved(date, entries.len()));
    Ok(())
}
