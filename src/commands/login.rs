use crate::{
    commands::{open_db, prompt, store_failure},
    db::users::Users,
    libs::{auth::check_user, messages::Message, session::Session, view::View},
    msg_bail_anyhow, msg_info, msg_success,
};
use anyhow::Result;
use clap::Args;

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Login identifier
    login: Option<String>,
    /// Password; prompted when omitted
    #[arg(short, long)]
    password: Option<String>,
}

pub fn cmd(args: LoginArgs) -> Result<()> {
    let db = open_db()?;
    let login = prompt::text(Message::PromptLogin, args.login, None)?;
    let password = match args.password {
        Some(password) => password,
        None => prompt::password(Message::PromptPassword, false, false)?,
    };

    let user = match check_user(&db, &login, &password).map_err(store_failure)? {
        Some(user) => user,
        None => {
            tracing::warn!(%login, "rejected login");
            msg_bail_anyhow!(Message::LoginFailed);
        }
    };

    let session = Session { user, login };
    session.save_to(&Session::path()?)?;

    let name = Users::new(&db)
        .get(user.id)
        .map_err(store_failure)?
        .map(|u| u.display_name())
        .unwrap_or_else(|| session.login.clone());
    msg_success!(Message::LoggedIn(name, user.level.to_string()));
    Ok(())
}

pub fn whoami() -> Result<()> {
    let session = match Session::current()? {
        Some(session) => session,
        None => {
            msg_info!(Message::NotLoggedIn);
            return Ok(());
        }
    };
    let db = open_db()?;
    let user = Users::new(&db).get(session.user.id).map_err(store_failure)?;
    View::details(&[
        ("Identifiant", session.login.clone()),
        ("Nom", user.as_ref().map(|u| u.display_name()).unwrap_or_default()),
        ("Niveau", session.user.level.to_string()),
        (
            "Service",
            user.and_then(|u| u.service_name).unwrap_or_else(|| "N/A".to_string()),
        ),
    ])
}
