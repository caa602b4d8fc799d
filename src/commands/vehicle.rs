use crate::{
    commands::{open_db, prompt, store_failure, Viewer},
    db::{
        db::Db,
        vehicles::{Vehicle, Vehicles},
    },
    libs::{messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct VehicleArgs {
    #[command(subcommand)]
    command: Option<VehicleCommand>,
}

#[derive(Debug, Args)]
struct VehicleFields {
    #[arg(long)]
    brand: Option<String>,
    #[arg(long)]
    model: Option<String>,
    #[arg(long)]
    plate: Option<String>,
    #[arg(long)]
    seats: Option<i64>,
    #[arg(long)]
    fiscal_power: Option<i64>,
}

impl VehicleFields {
    fn is_empty(&self) -> bool {
        self.brand.is_none() && self.model.is_none() && self.plate.is_none() && self.seats.is_none() && self.fiscal_power.is_none()
    }
}

#[derive(Debug, Subcommand)]
enum VehicleCommand {
    List,
    Add(VehicleFields),
    Edit {
        id: Option<i64>,
        #[command(flatten)]
        fields: VehicleFields,
    },
    /// Refused while trips still use the vehicle
    Delete {
        id: Option<i64>,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: VehicleArgs) -> Result<()> {
    let db = open_db()?;
    Viewer::require_admin(&db)?;

    match args.command.unwrap_or(VehicleCommand::List) {
        VehicleCommand::List => handle_list(&db),
        VehicleCommand::Add(fields) => handle_add(&db, fields),
        VehicleCommand::Edit { id, fields } => handle_edit(&db, id, fields),
        VehicleCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

/// `(id, label)` pairs for selection lists.
pub(crate) fn choices(db: &Db) -> Result<Vec<(i64, String)>> {
    let vehicles = Vehicles::new(db).list().map_err(store_failure)?;
    Ok(vehicles
        .into_iter()
        .filter_map(|v| v.id.map(|id| (id, v.label())))
        .collect())
}

fn select(db: &Db, id: Option<i64>, prompt_message: Message) -> Result<Option<Vehicle>> {
    let items = if id.is_none() { choices(db)? } else { Vec::new() };
    let id = match prompt::record(prompt_message, id, &items)? {
        Some(id) => id,
        None => {
            msg_info!(Message::NoVehiclesFound);
            return Ok(None);
        }
    };
    let vehicle = Vehicles::new(db).get(id).map_err(store_failure)?;
    if vehicle.is_none() {
        msg_info!(Message::RecordNotFound("vehicle".into(), id));
    }
    Ok(vehicle)
}

fn handle_list(db: &Db) -> Result<()> {
    let vehicles = Vehicles::new(db).list().map_err(store_failure)?;
    if vehicles.is_empty() {
        msg_info!(Message::NoVehiclesFound);
        return Ok(());
    }
    msg_print!(Message::VehiclesHeader, true);
    View::vehicles(&vehicles)
}

fn collect(fields: VehicleFields, current: &Vehicle, interactive: bool) -> Result<Vehicle> {
    if !interactive {
        return Ok(Vehicle {
            id: current.id,
            brand: fields.brand.unwrap_or_else(|| current.brand.clone()),
            model: fields.model.unwrap_or_else(|| current.model.clone()),
            plate: fields.plate.unwrap_or_else(|| current.plate.clone()),
            seats: fields.seats.or(current.seats),
            fiscal_power: fields.fiscal_power.or(current.fiscal_power),
        });
    }
    Ok(Vehicle {
        id: current.id,
        brand: prompt::text(Message::PromptBrand, fields.brand, prompt::non_empty(&current.brand))?,
        model: prompt::text(Message::PromptModel, fields.model, prompt::non_empty(&current.model))?,
        plate: prompt::text(Message::PromptPlate, fields.plate, prompt::non_empty(&current.plate))?,
        seats: prompt::optional_number(Message::PromptSeats, fields.seats, current.seats)?,
        fiscal_power: prompt::optional_number(Message::PromptFiscalPower, fields.fiscal_power, current.fiscal_power)?,
    })
}

fn handle_add(db: &Db, fields: VehicleFields) -> Result<()> {
    let interactive = fields.brand.is_none() || fields.model.is_none() || fields.plate.is_none();
    let vehicle = collect(fields, &Vehicle::new("", "", ""), interactive)?;

    Vehicles::new(db).insert(&vehicle).map_err(store_failure)?;
    msg_success!(Message::VehicleCreated(vehicle.label()));
    Ok(())
}

fn handle_edit(db: &Db, id: Option<i64>, fields: VehicleFields) -> Result<()> {
    let current = match select(db, id, Message::SelectVehicle)? {
        Some(vehicle) => vehicle,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let vehicle = collect(fields, &current, interactive)?;
    if vehicle == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Vehicles::new(db)
        .update(current.id.unwrap_or_default(), &vehicle)
        .map_err(store_failure)?;
    msg_success!(Message::VehicleUpdated(vehicle.label()));
    Ok(())
}

fn handle_delete(db: &Db, id: Option<i64>, yes: bool) -> Result<()> {
    let vehicle = match select(db, id, Message::SelectVehicleToDelete)? {
        Some(vehicle) => vehicle,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteVehicle(vehicle.label()), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Vehicles::new(db)
        .delete(vehicle.id.unwrap_or_default())
        .map_err(store_failure)?;
    msg_success!(Message::VehicleDeleted(vehicle.label()));
    Ok(())
}
