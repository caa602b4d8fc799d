//! Application settings stored as a small JSON document.
//!
//! The file lives next to the database in the data directory and holds the
//! two display preferences plus an optional database location. Reading never
//! fails on bad content: a missing or malformed file yields defaults, and an
//! unknown value for one field falls back to that field's default only.

use super::data_storage::DataStorage;
use super::vocabulary::vocabulary;
use crate::libs::messages::Message;
use crate::msg_print;
use anyhow::Result;
use dialoguer::{theme::ColorfulTheme, Input, Select};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

pub const CONFIG_FILE_NAME: &str = "settings.json";

vocabulary! {
    /// Light/dark preference of the front end.
    AppearanceMode {
        Light => "Light", "light";
        Dark => "Dark", "dark";
        System => "System", "system";
    }
}

vocabulary! {
    /// Accent colour theme.
    ColorTheme {
        Blue => "blue", "blue";
        DarkBlue => "dark-blue", "dark_blue";
        Green => "green", "green";
    }
}

impl Default for AppearanceMode {
    fn default() -> Self {
        AppearanceMode::System
    }
}

impl Default for ColorTheme {
    fn default() -> Self {
        ColorTheme::Blue
    }
}

#[derive(Serialize, Clone, Debug, PartialEq, Default)]
pub struct Config {
    pub appearance_mode: AppearanceMode,
    pub color_theme: ColorTheme,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

/// On-disk shape before normalisation. Every field is optional and untyped so
/// that one bad value does not discard the rest of the file.
#[derive(Deserialize, Default)]
#[serde(default)]
struct RawConfig {
    appearance_mode: Option<String>,
    color_theme: Option<String>,
    database_path: Option<PathBuf>,
}

impl RawConfig {
    fn normalized(self) -> Config {
        Config {
            appearance_mode: self.appearance_mode.and_then(|v| v.parse().ok()).unwrap_or_default(),
            color_theme: self.color_theme.and_then(|v| v.parse().ok()).unwrap_or_default(),
            database_path: self.database_path.filter(|p| !p.as_os_str().is_empty()),
        }
    }
}

impl Config {
    pub fn path() -> Result<PathBuf> {
        Ok(DataStorage::new().get_path(CONFIG_FILE_NAME)?)
    }

    pub fn read() -> Result<Config> {
        Ok(Self::read_from(&Self::path()?))
    }

    /// Loads settings from `path`, falling back to defaults for anything
    /// missing or unreadable.
    pub fn read_from(path: &Path) -> Config {
        if !path.exists() {
            return Config::default();
        }
        let raw = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) => {
                tracing::warn!("cannot read settings file {}: {}", path.display(), e);
                return Config::default();
            }
        };
        match serde_json::from_str::<RawConfig>(&raw) {
            Ok(config) => config.normalized(),
            Err(e) => {
                tracing::warn!("invalid settings file {}: {}", path.display(), e);
                Config::default()
            }
        }
    }

    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let config_file = File::create(path)?;
        serde_json::to_writer_pretty(&config_file, &self)?;
        Ok(())
    }

    /// Interactive settings wizard seeded with the current values.
    pub fn init() -> Result<Self> {
        let current = Self::read()?;
        let theme = ColorfulTheme::default();

        msg_print!(Message::SettingsHeader, true);

        let modes: Vec<&str> = AppearanceMode::ALL.iter().map(|m| m.as_str()).collect();
        let mode_index = Select::with_theme(&theme)
            .with_prompt(Message::PromptAppearanceMode.to_string())
            .items(&modes)
            .default(AppearanceMode::ALL.iter().position(|m| *m == current.appearance_mode).unwrap_or(0))
            .interact()?;

        let themes: Vec<&str> = ColorTheme::ALL.iter().map(|t| t.as_str()).collect();
        let theme_index = Select::with_theme(&theme)
            .with_prompt(Message::PromptColorTheme.to_string())
            .items(&themes)
            .default(ColorTheme::ALL.iter().position(|t| *t == current.color_theme).unwrap_or(0))
            .interact()?;

        let database_path: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptDatabasePath.to_string())
            .default(current.database_path.as_ref().map(|p| p.display().to_string()).unwrap_or_default())
            .allow_empty(true)
            .interact_text()?;

        Ok(Config {
            appearance_mode: AppearanceMode::ALL[mode_index],
            color_theme: ColorTheme::ALL[theme_index],
            database_path: if database_path.trim().is_empty() {
                None
            } else {
                Some(PathBuf::from(database_path.trim()))
            },
        })
    }
}
