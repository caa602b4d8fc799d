use crate::{
    commands::{open_db, prompt, store_failure, vehicle, young, Viewer},
    db::{
        db::Db,
        services::Services,
        trips::{Trip, Trips},
        users::Users,
    },
    libs::{
        dates::{parse_date, parse_time, today},
        messages::Message,
        view::View,
    },
    msg_error_anyhow, msg_info, msg_print, msg_success,
};
use anyhow::Result;
use chrono::{NaiveTime, Timelike};
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct TripArgs {
    #[command(subcommand)]
    command: Option<TripCommand>,
}

#[derive(Debug, Args)]
struct TripFields {
    #[arg(long)]
    date: Option<String>,
    /// Departure time, HH:MM
    #[arg(long)]
    departure: Option<String>,
    #[arg(long = "return")]
    return_time: Option<String>,
    #[arg(long)]
    purpose: Option<String>,
    #[arg(long)]
    service: Option<i64>,
    /// Driver; defaults to the logged-in user
    #[arg(long)]
    driver: Option<i64>,
    #[arg(long)]
    vehicle: Option<i64>,
    #[arg(long)]
    km_start: Option<i64>,
    #[arg(long)]
    km_end: Option<i64>,
    #[arg(long = "young")]
    youngs: Vec<i64>,
}

impl TripFields {
    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.departure.is_none()
            && self.return_time.is_none()
            && self.purpose.is_none()
            && self.service.is_none()
            && self.driver.is_none()
            && self.vehicle.is_none()
            && self.km_start.is_none()
            && self.km_end.is_none()
            && self.youngs.is_empty()
    }
}

#[derive(Debug, Subcommand)]
enum TripCommand {
    List,
    Add(TripFields),
    Edit {
        id: i64,
        #[command(flatten)]
        fields: TripFields,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: TripArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(TripCommand::List) {
        TripCommand::List => handle_list(&db),
        TripCommand::Add(fields) => handle_add(&db, &viewer, fields),
        TripCommand::Edit { id, fields } => handle_edit(&db, &viewer, id, fields),
        TripCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn handle_list(db: &Db) -> Result<()> {
    let trips = Trips::new(db).list().map_err(store_failure)?;
    if trips.is_empty() {
        msg_info!(Message::NoTripsFound);
        return Ok(());
    }
    msg_print!(Message::TripsHeader, true);
    View::trips(&trips)
}

fn flag_time(value: Option<String>) -> Result<Option<NaiveTime>> {
    value.as_deref().map(parse_time).transpose()
}

fn collect(db: &Db, viewer: &Viewer, fields: TripFields, current: &Trip, linked: &[i64], interactive: bool) -> Result<(Trip, Vec<i64>)> {
    if !interactive {
        let trip = Trip {
            id: current.id,
            date: fields.date.as_deref().map(parse_date).transpose()?.unwrap_or(current.date),
            departure: flag_time(fields.departure)?.unwrap_or(current.departure),
            return_time: flag_time(fields.return_time)?.or(current.return_time),
            purpose: fields.purpose.or_else(|| current.purpose.clone()),
            service_id: fields.service.unwrap_or(current.service_id),
            user_id: fields.driver.unwrap_or(current.user_id),
            vehicle_id: fields.vehicle.unwrap_or(current.vehicle_id),
            km_start: fields.km_start.unwrap_or(current.km_start),
            km_end: fields.km_end.or(current.km_end),
        };
        let youngs = if fields.youngs.is_empty() { linked.to_vec() } else { fields.youngs };
        return Ok((trip, youngs));
    }

    let services = Services::new(db).list_for_form().map_err(store_failure)?;
    let users = Users::new(db).list_for_form().map_err(store_failure)?;
    let vehicles = vehicle::choices(db)?;
    let residents = young::choices(db, viewer.service_id)?;

    let pick = |message: Message, given: Option<i64>, items: &[(i64, String)], current: i64, empty: Message| -> Result<i64> {
        match given {
            Some(id) => Ok(id),
            None if current != 0 && items.iter().any(|(id, _)| *id == current) => {
                Ok(prompt::optional_record(message, None, items, Some(current))?.unwrap_or(current))
            }
            None => prompt::record(message, None, items)?.ok_or_else(|| msg_error_anyhow!(empty)),
        }
    };

    let trip = Trip {
        id: current.id,
        date: prompt::date(Message::PromptTripDate, fields.date, Some(current.date))?,
        departure: prompt::time(Message::PromptDepartureTime, fields.departure, Some(current.departure))?,
        return_time: prompt::optional_time(Message::PromptReturnTime, fields.return_time, current.return_time)?,
        purpose: prompt::optional_text(Message::PromptPurpose, fields.purpose, current.purpose.as_deref())?,
        service_id: pick(Message::SelectService, fields.service, &services, current.service_id, Message::NoServicesFound)?,
        user_id: pick(Message::SelectDriver, fields.driver, &users, current.user_id, Message::NoUsersFound)?,
        vehicle_id: pick(Message::SelectVehicle, fields.vehicle, &vehicles, current.vehicle_id, Message::NoVehiclesFound)?,
        km_start: prompt::number(Message::PromptKmStart, fields.km_start, Some(current.km_start))?,
        km_end: prompt::optional_number(Message::PromptKmEnd, fields.km_end, current.km_end)?,
    };
    let youngs = prompt::records(Message::SelectPassengers, fields.youngs, &residents, linked)?;
    Ok((trip, youngs))
}

fn handle_add(db: &Db, viewer: &Viewer, fields: TripFields) -> Result<()> {
    let interactive = fields.vehicle.is_none() || fields.km_start.is_none();
    let now = chrono::Local::now().time();
    let departure = NaiveTime::from_hms_opt(now.hour(), now.minute(), 0).unwrap_or(now);
    let blank = Trip::new(
        today(),
        departure,
        viewer.service_id.unwrap_or_default(),
        viewer.user_id(),
        0,
        0,
    );
    let (trip, youngs) = collect(db, viewer, fields, &blank, &[], interactive)?;
    if trip.service_id == 0 {
        return Err(msg_error_anyhow!(Message::NoServiceAssigned));
    }

    let id = Trips::new(db).insert(&trip, &youngs).map_err(store_failure)?;
    msg_success!(Message::TripCreated(id));
    Ok(())
}

fn get(db: &Db, id: i64) -> Result<Option<(Trip, Vec<i64>)>> {
    let found = Trips::new(db).get(id).map_err(store_failure)?;
    if found.is_none() {
        msg_info!(Message::RecordNotFound("trip".into(), id));
    }
    Ok(found)
}

fn handle_edit(db: &Db, viewer: &Viewer, id: i64, fields: TripFields) -> Result<()> {
    let (current, linked) = match get(db, id)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let (trip, youngs) = collect(db, viewer, fields, &current, &linked, interactive)?;
    if trip == current && youngs == linked {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Trips::new(db).update(id, &trip, &youngs).map_err(store_failure)?;
    msg_success!(Message::TripUpdated(id));
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    if get(db, id)?.is_none() {
        return Ok(());
    }
    if !prompt::confirm(Message::ConfirmDeleteTrip(id), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Trips::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::TripDeleted(id));
    Ok(())
}
