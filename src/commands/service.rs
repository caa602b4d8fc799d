use crate::{
    commands::{open_db, prompt, store_failure, Viewer},
    db::{
        db::Db,
        services::{Service, Services},
        users::Users,
    },
    libs::{messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ServiceArgs {
    #[command(subcommand)]
    command: Option<ServiceCommand>,
}

#[derive(Debug, Subcommand)]
enum ServiceCommand {
    List,
    /// Service details and its staff
    Show { id: Option<i64> },
    Add {
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    Edit {
        id: Option<i64>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        address: Option<String>,
        #[arg(long)]
        phone: Option<String>,
    },
    /// Delete a service; its staff and residents are kept without service
    Delete {
        id: Option<i64>,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: ServiceArgs) -> Result<()> {
    let db = open_db()?;
    Viewer::require_admin(&db)?;

    match args.command.unwrap_or(ServiceCommand::List) {
        ServiceCommand::List => handle_list(&db),
        ServiceCommand::Show { id } => handle_show(&db, id),
        ServiceCommand::Add { name, address, phone } => handle_add(&db, name, address, phone),
        ServiceCommand::Edit { id, name, address, phone } => handle_edit(&db, id, name, address, phone),
        ServiceCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn select(db: &Db, id: Option<i64>, prompt_message: Message) -> Result<Option<Service>> {
    let services = Services::new(db);
    let items = services.list_for_form().map_err(store_failure)?;
    let id = match prompt::record(prompt_message, id, &items)? {
        Some(id) => id,
        None => {
            msg_info!(Message::NoServicesFound);
            return Ok(None);
        }
    };
    match services.get(id).map_err(store_failure)? {
        Some(service) => Ok(Some(service)),
        None => {
            msg_info!(Message::RecordNotFound("service".into(), id));
            Ok(None)
        }
    }
}

fn handle_list(db: &Db) -> Result<()> {
    let services = Services::new(db).list().map_err(store_failure)?;
    if services.is_empty() {
        msg_info!(Message::NoServicesFound);
        return Ok(());
    }
    msg_print!(Message::ServicesHeader, true);
    View::services(&services)
}

fn handle_show(db: &Db, id: Option<i64>) -> Result<()> {
    let service = match select(db, id, Message::SelectService)? {
        Some(service) => service,
        None => return Ok(()),
    };
    View::services(std::slice::from_ref(&service))?;

    let staff = Users::new(db)
        .list_for_service(service.id.unwrap_or_default())
        .map_err(store_failure)?;
    if staff.is_empty() {
        msg_info!(Message::NoUsersFound);
    } else {
        msg_print!(Message::ServiceStaffHeader(service.name.clone()), true);
        View::users(&staff)?;
    }
    Ok(())
}

fn handle_add(db: &Db, name: Option<String>, address: Option<String>, phone: Option<String>) -> Result<()> {
    let interactive = name.is_none();
    let mut service = Service::new(&prompt::text(Message::PromptServiceName, name, None)?);
    if interactive {
        service.address = prompt::optional_text(Message::PromptAddress, address, None)?;
        service.phone = prompt::optional_text(Message::PromptPhone, phone, None)?;
    } else {
        service.address = address;
        service.phone = phone;
    }

    Services::new(db).insert(&service).map_err(store_failure)?;
    msg_success!(Message::ServiceCreated(service.name));
    Ok(())
}

fn handle_edit(db: &Db, id: Option<i64>, name: Option<String>, address: Option<String>, phone: Option<String>) -> Result<()> {
    let interactive = name.is_none() && address.is_none() && phone.is_none();
    let current = match select(db, id, Message::SelectService)? {
        Some(service) => service,
        None => return Ok(()),
    };
    let id = current.id.unwrap_or_default();

    let updated = if interactive {
        Service {
            id: current.id,
            name: prompt::text(Message::PromptServiceName, None, Some(&current.name))?,
            address: prompt::optional_text(Message::PromptAddress, None, current.address.as_deref())?,
            phone: prompt::optional_text(Message::PromptPhone, None, current.phone.as_deref())?,
        }
    } else {
        Service {
            id: current.id,
            name: name.unwrap_or_else(|| current.name.clone()),
            address: address.or_else(|| current.address.clone()),
            phone: phone.or_else(|| current.phone.clone()),
        }
    };

    if updated == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }

    Services::new(db).update(id, &updated).map_err(store_failure)?;
    msg_success!(Message::ServiceUpdated(updated.name));
    Ok(())
}

fn handle_delete(db: &Db, id: Option<i64>, yes: bool) -> Result<()> {
    let service = match select(db, id, Message::SelectServiceToDelete)? {
        Some(service) => service,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteService(service.name.clone()), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Services::new(db).delete(service.id.unwrap_or_default()).map_err(store_failure)?;
    msg_success!(Message::ServiceDeleted(service.name));
    Ok(())
}
