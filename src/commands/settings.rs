use crate::{
    libs::{
        config::{AppearanceMode, ColorTheme, Config},
        messages::Message,
        view::View,
    },
    msg_success,
};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct SettingsArgs {
    /// Print the current settings without changing them
    #[arg(long)]
    show: bool,
    #[arg(long, value_enum)]
    appearance: Option<AppearanceMode>,
    #[arg(long, value_enum)]
    theme: Option<ColorTheme>,
    /// Database file; an empty value restores the default location
    #[arg(long)]
    database: Option<String>,
}

pub fn cmd(args: SettingsArgs) -> Result<()> {
    let path = Config::path()?;

    if args.show {
        let config = Config::read_from(&path);
        return View::details(&[
            ("Fichier", path.display().to_string()),
            ("Apparence", config.appearance_mode.to_string()),
            ("Thème", config.color_theme.to_string()),
            (
                "Base de données",
                config.database_path.map(|p| p.display().to_string()).unwrap_or_else(|| "par défaut".into()),
            ),
        ]);
    }

    let config = if args.appearance.is_none() && args.theme.is_none() && args.database.is_none() {
        Config::init()?
    } else {
        let mut config = Config::read_from(&path);
        if let Some(mode) = args.appearance {
            config.appearance_mode = mode;
        }
        if let Some(theme) = args.theme {
            config.color_theme = theme;
        }
        if let Some(database) = args.database {
            config.database_path = Some(database.trim())
                .filter(|d| !d.is_empty())
                .map(PathBuf::from);
        }
        config
    };

    config.save_to(&path)?;
    msg_success!(Message::SettingsSaved(path.display().to_string()));
    Ok(())
}
