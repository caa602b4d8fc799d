//! Small dialoguer wrappers shared by the entity commands.
//!
//! Every helper takes the value given on the command line first and only
//! prompts when it is missing.

use crate::libs::dates::{parse_date, parse_datetime, parse_time, to_french};
use crate::libs::messages::Message;
use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use dialoguer::{theme::ColorfulTheme, Confirm, Input, MultiSelect, Password, Select};

pub fn text(prompt: Message, given: Option<String>, default: Option<&str>) -> Result<String> {
    if let Some(value) = given {
        return Ok(value);
    }
    let theme = ColorfulTheme::default();
    let mut input = Input::<String>::with_theme(&theme).with_prompt(prompt.to_string());
    if let Some(default) = default {
        input = input.default(default.to_string());
    }
    Ok(input.interact_text()?.trim().to_string())
}

/// `Some(value)` unless blank, for use as a prompt default.
pub fn non_empty(value: &str) -> Option<&str> {
    Some(value).filter(|v| !v.trim().is_empty())
}

/// Free text that may stay empty. Blank answers become `None`.
pub fn optional_text(prompt: Message, given: Option<String>, default: Option<&str>) -> Result<Option<String>> {
    if given.is_some() {
        return Ok(given.filter(|v| !v.trim().is_empty()));
    }
    let value: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(default.unwrap_or_default().to_string())
        .allow_empty(true)
        .interact_text()?;
    let value = value.trim();
    Ok(if value.is_empty() { None } else { Some(value.to_string()) })
}

/// `allow_empty` lets the user keep the current password by answering blank.
pub fn password(prompt: Message, confirm: bool, allow_empty: bool) -> Result<String> {
    let theme = ColorfulTheme::default();
    let mut input = Password::with_theme(&theme)
        .with_prompt(prompt.to_string())
        .allow_empty_password(allow_empty);
    if confirm {
        input = input.with_confirmation(Message::PromptPasswordConfirm.to_string(), Message::PasswordMismatch.to_string());
    }
    Ok(input.interact()?)
}

pub fn date(prompt: Message, given: Option<String>, default: Option<NaiveDate>) -> Result<NaiveDate> {
    let raw = text(prompt, given, default.map(|d| to_french(&d)).as_deref())?;
    parse_date(&raw)
}

pub fn optional_date(prompt: Message, given: Option<String>, default: Option<NaiveDate>) -> Result<Option<NaiveDate>> {
    let default = default.map(|d| to_french(&d));
    match optional_text(prompt, given, default.as_deref())? {
        Some(raw) => Ok(Some(parse_date(&raw)?)),
        None => Ok(None),
    }
}

pub fn datetime(prompt: Message, given: Option<String>, default: Option<NaiveDateTime>) -> Result<NaiveDateTime> {
    let default = default.map(|d| d.format("%Y-%m-%d %H:%M").to_string());
    let raw = text(prompt, given, default.as_deref())?;
    parse_datetime(&raw)
}

pub fn time(prompt: Message, given: Option<String>, default: Option<NaiveTime>) -> Result<NaiveTime> {
    let default = default.map(|t| t.format("%H:%M").to_string());
    let raw = text(prompt, given, default.as_deref())?;
    parse_time(&raw)
}

pub fn optional_time(prompt: Message, given: Option<String>, default: Option<NaiveTime>) -> Result<Option<NaiveTime>> {
    let default = default.map(|t| t.format("%H:%M").to_string());
    match optional_text(prompt, given, default.as_deref())? {
        Some(raw) => Ok(Some(parse_time(&raw)?)),
        None => Ok(None),
    }
}

pub fn number(prompt: Message, given: Option<i64>, default: Option<i64>) -> Result<i64> {
    if let Some(value) = given {
        return Ok(value);
    }
    let theme = ColorfulTheme::default();
    let mut input = Input::<i64>::with_theme(&theme).with_prompt(prompt.to_string());
    if let Some(default) = default {
        input = input.default(default);
    }
    Ok(input.interact_text()?)
}

pub fn optional_number(prompt: Message, given: Option<i64>, default: Option<i64>) -> Result<Option<i64>> {
    let raw = optional_text(prompt, given.map(|v| v.to_string()), default.map(|v| v.to_string()).as_deref())?;
    match raw {
        Some(raw) => Ok(Some(raw.parse()?)),
        None => Ok(None),
    }
}

/// One of `values`, shown by their display text.
pub fn choice<T: Copy + PartialEq + std::fmt::Display>(prompt: Message, given: Option<T>, values: &[T], default: Option<T>) -> Result<T> {
    if let Some(value) = given {
        return Ok(value);
    }
    let labels: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(&labels)
        .default(default.and_then(|d| values.iter().position(|v| *v == d)).unwrap_or(0))
        .interact()?;
    Ok(values[index])
}

/// Like [`choice`] with an extra "none" entry in first position.
pub fn optional_choice<T: Copy + PartialEq + std::fmt::Display>(
    prompt: Message,
    given: Option<T>,
    values: &[T],
    default: Option<T>,
) -> Result<Option<T>> {
    if given.is_some() {
        return Ok(given);
    }
    let mut labels = vec![Message::NoneChoice.to_string()];
    labels.extend(values.iter().map(|v| v.to_string()));
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(&labels)
        .default(default.and_then(|d| values.iter().position(|v| *v == d)).map(|i| i + 1).unwrap_or(0))
        .interact()?;
    Ok(if index == 0 { None } else { Some(values[index - 1]) })
}

/// Picks one record id from `(id, label)` pairs.
pub fn record(prompt: Message, given: Option<i64>, items: &[(i64, String)]) -> Result<Option<i64>> {
    if given.is_some() {
        return Ok(given);
    }
    if items.is_empty() {
        return Ok(None);
    }
    let labels: Vec<&str> = items.iter().map(|(_, label)| label.as_str()).collect();
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(&labels)
        .interact()?;
    Ok(Some(items[index].0))
}

/// Picks an optional record id; the first entry means "none".
pub fn optional_record(prompt: Message, given: Option<i64>, items: &[(i64, String)], default: Option<i64>) -> Result<Option<i64>> {
    if given.is_some() {
        return Ok(given);
    }
    let mut labels = vec![Message::NoneChoice.to_string()];
    labels.extend(items.iter().map(|(_, label)| label.clone()));
    let index = Select::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(&labels)
        .default(default.and_then(|d| items.iter().position(|(id, _)| *id == d)).map(|i| i + 1).unwrap_or(0))
        .interact()?;
    Ok(if index == 0 { None } else { Some(items[index - 1].0) })
}

/// Multi-selection of record ids, pre-checking `selected`.
pub fn records(prompt: Message, given: Vec<i64>, items: &[(i64, String)], selected: &[i64]) -> Result<Vec<i64>> {
    if !given.is_empty() || items.is_empty() {
        return Ok(given);
    }
    let labels: Vec<&str> = items.iter().map(|(_, label)| label.as_str()).collect();
    let defaults: Vec<bool> = items.iter().map(|(id, _)| selected.contains(id)).collect();
    let indices = MultiSelect::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .items(&labels)
        .defaults(&defaults)
        .interact()?;
    Ok(indices.into_iter().map(|i| items[i].0).collect())
}

/// Asks before a destructive action unless `assume_yes` is set.
pub fn confirm(prompt: Message, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    Ok(Confirm::with_theme(&ColorfulTheme::default())
        .with_prompt(prompt.to_string())
        .default(false)
        .interact()?)
}
