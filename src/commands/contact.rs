use crate::{
    commands::{open_db, prompt, store_failure, young, Viewer},
    db::{
        contacts::{Contact, Contacts},
        db::Db,
    },
    libs::{formatter::full_name, messages::Message, view::View},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct ContactArgs {
    #[command(subcommand)]
    command: ContactCommand,
}

#[derive(Debug, Args)]
struct ContactFields {
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    /// Relationship to the resident (mère, oncle, ...)
    #[arg(long)]
    relationship: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    email: Option<String>,
}

impl ContactFields {
    fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.relationship.is_none()
            && self.address.is_none()
            && self.phone.is_none()
            && self.email.is_none()
    }
}

#[derive(Debug, Subcommand)]
enum ContactCommand {
    /// Contacts of one resident
    List {
        #[arg(long)]
        young: Option<i64>,
    },
    Add {
        #[arg(long)]
        young: Option<i64>,
        #[command(flatten)]
        fields: ContactFields,
    },
    Edit {
        id: i64,
        #[command(flatten)]
        fields: ContactFields,
    },
    Delete {
        id: i64,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: ContactArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command {
        ContactCommand::List { young } => handle_list(&db, &viewer, young),
        ContactCommand::Add { young, fields } => handle_add(&db, &viewer, young, fields),
        ContactCommand::Edit { id, fields } => handle_edit(&db, id, fields),
        ContactCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn label(contact: &Contact) -> String {
    full_name(contact.first_name.as_deref().unwrap_or_default(), &contact.last_name)
}

fn get(db: &Db, id: i64) -> Result<Option<Contact>> {
    let contact = Contacts::new(db).get(id).map_err(store_failure)?;
    if contact.is_none() {
        msg_info!(Message::RecordNotFound("contact".into(), id));
    }
    Ok(contact)
}

fn handle_list(db: &Db, viewer: &Viewer, young_id: Option<i64>) -> Result<()> {
    let young = match young::select(db, viewer, young_id, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(()),
    };
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

fn collect(fields: ContactFields, current: &Contact, interactive: bool) -> Result<Contact> {
    if !interactive {
        return Ok(Contact {
            id: current.id,
            young_id: current.young_id,
            last_name: fields.last_name.unwrap_or_else(|| current.last_name.clone()),
            first_name: fields.first_name.or_else(|| current.first_name.clone()),
            relationship: fields.relationship.or_else(|| current.relationship.clone()),
            address: fields.address.or_else(|| current.address.clone()),
            phone: fields.phone.or_else(|| current.phone.clone()),
            email: fields.email.or_else(|| current.email.clone()),
        });
    }
    Ok(Contact {
        id: current.id,
        young_id: current.young_id,
        last_name: prompt::text(Message::PromptLastName, fields.last_name, prompt::non_empty(&current.last_name))?,
        first_name: prompt::optional_text(Message::PromptFirstName, fields.first_name, current.first_name.as_deref())?,
        relationship: prompt::optional_text(
            Message::PromptRelationship,
            fields.relationship,
            current.relationship.as_deref(),
        )?,
        address: prompt::optional_text(Message::PromptAddress, fields.address, current.address.as_deref())?,
        phone: prompt::optional_text(Message::PromptPhone, fields.phone, current.phone.as_deref())?,
        email: prompt::optional_text(Message::PromptEmail, fields.email, current.email.as_deref())?,
    })
}

fn handle_add(db: &Db, viewer: &Viewer, young_id: Option<i64>, fields: ContactFields) -> Result<()> {
    let young = match young::select(db, viewer, young_id, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(()),
    };
    let interactive = fields.last_name.is_none();
    let blank = Contact::new(young.id.unwrap_or_default(), "");
    let contact = collect(fields, &blank, interactive)?;

    Contacts::new(db).insert(&contact).map_err(store_failure)?;
    msg_success!(Message::ContactCreated(label(&contact), young.display_name()));
    Ok(())
}

fn handle_edit(db: &Db, id: i64, fields: ContactFields) -> Result<()> {
    let current = match get(db, id)? {
        Some(contact) => contact,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let contact = collect(fields, &current, interactive)?;
    if contact == current {
        msg_info!(Message::NoChangesDetected);
        return Ok(());
    }
    Contacts::new(db).update(id, &contact).map_err(store_failure)?;
    msg_success!(Message::ContactUpdated(label(&contact)));
    Ok(())
}

fn handle_delete(db: &Db, id: i64, yes: bool) -> Result<()> {
    let contact = match get(db, id)? {
        Some(contact) => contact,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteContact(label(&contact)), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Contacts::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::ContactDeleted(label(&contact)));
    Ok(())
}
