use crate::{
    commands::{open_db, prompt, store_failure, Viewer},
    db::{
        db::Db,
        services::Services,
        users::{User, Users},
        youngs::Youngs,
    },
    libs::{formatter::join_names, messages::Message, view::View, vocabulary::PermissionLevel},
    msg_info, msg_print, msg_success,
};
use anyhow::Result;
use clap::{Args, Subcommand};

#[derive(Debug, Args)]
pub struct UserArgs {
    #[command(subcommand)]
    command: Option<UserCommand>,
}

#[derive(Debug, Args)]
struct UserFields {
    #[arg(long)]
    last_name: Option<String>,
    #[arg(long)]
    first_name: Option<String>,
    #[arg(long)]
    login: Option<String>,
    #[arg(long, value_enum)]
    level: Option<PermissionLevel>,
    #[arg(long)]
    service: Option<i64>,
    #[arg(long)]
    email: Option<String>,
    #[arg(long)]
    phone: Option<String>,
    #[arg(long)]
    address: Option<String>,
    #[arg(long)]
    password: Option<String>,
}

impl UserFields {
    fn is_empty(&self) -> bool {
        self.last_name.is_none()
            && self.first_name.is_none()
            && self.login.is_none()
            && self.level.is_none()
            && self.service.is_none()
            && self.email.is_none()
            && self.phone.is_none()
            && self.address.is_none()
            && self.password.is_none()
    }
}

#[derive(Debug, Subcommand)]
enum UserCommand {
    List {
        /// Only staff of this service
        #[arg(long)]
        service: Option<i64>,
    },
    /// Account details and the residents the user follows
    Show { id: Option<i64> },
    Add(UserFields),
    Edit {
        id: Option<i64>,
        #[command(flatten)]
        fields: UserFields,
    },
    Delete {
        id: Option<i64>,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: UserArgs) -> Result<()> {
    let db = open_db()?;
    Viewer::require_admin(&db)?;

    match args.command.unwrap_or(UserCommand::List { service: None }) {
        UserCommand::List { service } => handle_list(&db, service),
        UserCommand::Show { id } => handle_show(&db, id),
        UserCommand::Add(fields) => handle_add(&db, fields),
        UserCommand::Edit { id, fields } => handle_edit(&db, id, fields),
        UserCommand::Delete { id, yes } => handle_delete(&db, id, yes),
    }
}

fn select(db: &Db, id: Option<i64>, prompt_message: Message) -> Result<Option<User>> {
    let users = Users::new(db);
    let items = users.list_for_form().map_err(store_failure)?;
    let id = match prompt::record(prompt_message, id, &items)? {
        Some(id) => id,
        None => {
            msg_info!(Message::NoUsersFound);
            return Ok(None);
        }
    };
    match users.get(id).map_err(store_failure)? {
        Some(user) => Ok(Some(user)),
        None => {
            msg_info!(Message::RecordNotFound("user".into(), id));
            Ok(None)
        }
    }
}

fn handle_list(db: &Db, service: Option<i64>) -> Result<()> {
    let users = Users::new(db).list(service).map_err(store_failure)?;
    if users.is_empty() {
        msg_info!(Message::NoUsersFound);
        return Ok(());
    }
    msg_print!(Message::UsersHeader, true);
    View::users(&users)
}

fn handle_show(db: &Db, id: Option<i64>) -> Result<()> {
    let user = match select(db, id, Message::SelectUser)? {
        Some(user) => user,
        None => return Ok(()),
    };
    let caseload = Youngs::new(db)
        .for_professional(user.id.unwrap_or_default())
        .map_err(store_failure)?;

    View::details(&[
        ("Nom", user.display_name()),
        ("Identifiant", user.login.clone()),
        ("Niveau", user.level.to_string()),
        ("Service", user.service_name.clone().unwrap_or_else(|| "N/A".into())),
        ("Email", user.email.clone().unwrap_or_default()),
        ("Téléphone", user.phone.clone().unwrap_or_default()),
        ("Adresse", user.address.clone().unwrap_or_default()),
        ("Référent de", join_names(&caseload.referent_of, "-")),
        ("Co-référent de", join_names(&caseload.co_referent_of, "-")),
    ])
}

/// Fills a user from flags, prompting for what is missing when `interactive`.
fn collect(db: &Db, fields: UserFields, current: &User, interactive: bool) -> Result<(User, Option<String>)> {
    if !interactive {
        let user = User {
            id: current.id,
            last_name: fields.last_name.unwrap_or_else(|| current.last_name.clone()),
            first_name: fields.first_name.unwrap_or_else(|| current.first_name.clone()),
            login: fields.login.unwrap_or_else(|| current.login.clone()),
            level: fields.level.unwrap_or(current.level),
            address: fields.address.or_else(|| current.address.clone()),
            phone: fields.phone.or_else(|| current.phone.clone()),
            email: fields.email.or_else(|| current.email.clone()),
            service_id: fields.service.or(current.service_id),
            service_name: None,
        };
        return Ok((user, fields.password));
    }

    let services = Services::new(db).list_for_form().map_err(store_failure)?;
    let user = User {
        id: current.id,
        last_name: prompt::text(Message::PromptLastName, fields.last_name, prompt::non_empty(&current.last_name))?,
        first_name: prompt::text(Message::PromptFirstName, fields.first_name, prompt::non_empty(&current.first_name))?,
        login: prompt::text(Message::PromptLogin, fields.login, prompt::non_empty(&current.login))?,
        level: prompt::choice(Message::SelectPermissionLevel, fields.level, PermissionLevel::ALL, Some(current.level))?,
        service_id: prompt::optional_record(Message::SelectService, fields.service, &services, current.service_id)?,
        email: prompt::optional_text(Message::PromptEmail, fields.email, current.email.as_deref())?,
        phone: prompt::optional_text(Message::PromptPhone, fields.phone, current.phone.as_deref())?,
        address: prompt::optional_text(Message::PromptAddress, fields.address, current.address.as_deref())?,
        service_name: None,
    };
    let password = match fields.password {
        Some(password) => Some(password),
        None if current.id.is_none() => Some(prompt::password(Message::PromptPassword, true, false)?),
        None => Some(prompt::password(Message::PromptNewPassword, true, true)?).filter(|p| !p.is_empty()),
    };
    Ok((user, password))
}

fn handle_add(db: &Db, fields: UserFields) -> Result<()> {
    let interactive = fields.login.is_none() || fields.password.is_none();
    let blank = User::new("", "", "", PermissionLevel::Standard);
    let (user, password) = collect(db, fields, &blank, interactive)?;
    let password = password.unwrap_or_default();

    Users::new(db).insert(&user, &password).map_err(store_failure)?;
    msg_success!(Message::UserCreated(user.display_name(), user.login));
    Ok(())
}

fn handle_edit(db: &Db, id: Option<i64>, fields: UserFields) -> Result<()> {
    let current = match select(db, id, Message::SelectUser)? {
        Some(user) => user,
        None => return Ok(()),
    };
    let interactive = fields.is_empty();
    let (user, password) = collect(db, fields, &current, interactive)?;

    Users::new(db)
        .update(current.id.unwrap_or_default(), &user, password.as_deref())
        .map_err(store_failure)?;
    msg_success!(Message::UserUpdated(user.display_name()));
    Ok(())
}

fn handle_delete(db: &Db, id: Option<i64>, yes: bool) -> Result<()> {
    let user = match select(db, id, Message::SelectUserToDelete)? {
        Some(user) => user,
        None => return Ok(()),
    };
    if !prompt::confirm(Message::ConfirmDeleteUser(user.display_name()), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Users::new(db).delete(user.id.unwrap_or_default()).map_err(store_failure)?;
    msg_success!(Message::UserDeleted(user.display_name()));
    Ok(())
}
