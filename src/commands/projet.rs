use crate::{
    commands::{open_db, prompt, store_failure, young, Viewer},
    db::{
        db::Db,
        projets::{Objective, Projet, ProjetDetails, Projets},
    },
    libs::{
        dates::{parse_date, to_french, today},
        formatter::or_not_provided,
        messages::Message,
        view::View,
        vocabulary::ObjectiveCategory,
    },
    msg_info, msg_print, msg_success,
};
use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use dialoguer::{theme::ColorfulTheme, Input};
use std::{fs, path::PathBuf};

#[derive(Debug, Args)]
pub struct ProjetArgs {
    #[command(subcommand)]
    command: Option<ProjetCommand>,
}

#[derive(Debug, Subcommand)]
enum ProjetCommand {
    List,
    /// The project of one resident, objectives included
    Show {
        #[arg(long)]
        young: Option<i64>,
    },
    /// Create or replace a resident's project
    Save {
        #[arg(long)]
        young: Option<i64>,
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        situation: Option<String>,
        #[arg(long)]
        young_expectations: Option<String>,
        #[arg(long)]
        family_expectations: Option<String>,
        /// JSON file holding the objectives with their means
        #[arg(long)]
        objectives: Option<PathBuf>,
    },
    Delete {
        #[arg(long)]
        young: Option<i64>,
        #[arg(short, long)]
        yes: bool,
    },
}

pub fn cmd(args: ProjetArgs) -> Result<()> {
    let db = open_db()?;
    let viewer = Viewer::require(&db)?;

    match args.command.unwrap_or(ProjetCommand::List) {
        ProjetCommand::List => handle_list(&db),
        ProjetCommand::Show { young } => handle_show(&db, &viewer, young),
        ProjetCommand::Save {
            young,
            date,
            situation,
            young_expectations,
            family_expectations,
            objectives,
        } => handle_save(
            &db,
            &viewer,
            young,
            SaveFields {
                date,
                situation,
                young_expectations,
                family_expectations,
                objectives,
            },
        ),
        ProjetCommand::Delete { young, yes } => handle_delete(&db, &viewer, young, yes),
    }
}

struct SaveFields {
    date: Option<String>,
    situation: Option<String>,
    young_expectations: Option<String>,
    family_expectations: Option<String>,
    objectives: Option<PathBuf>,
}

impl SaveFields {
    fn is_empty(&self) -> bool {
        self.date.is_none()
            && self.situation.is_none()
            && self.young_expectations.is_none()
            && self.family_expectations.is_none()
            && self.objectives.is_none()
    }
}

fn handle_list(db: &Db) -> Result<()> {
    let projets = Projets::new(db).list().map_err(store_failure)?;
    if projets.is_empty() {
        msg_info!(Message::NoProjetsFound);
        return Ok(());
    }
    msg_print!(Message::ProjetsHeader, true);
    View::projets(&projets)
}

fn find(db: &Db, viewer: &Viewer, young: Option<i64>) -> Result<Option<(crate::db::youngs::Young, Option<ProjetDetails>)>> {
    let young = match young::select(db, viewer, young, Message::SelectYoung)? {
        Some(young) => young,
        None => return Ok(None),
    };
    let details = Projets::new(db)
        .for_young(young.id.unwrap_or_default())
        .map_err(store_failure)?;
    Ok(Some((young, details)))
}

fn handle_show(db: &Db, viewer: &Viewer, young: Option<i64>) -> Result<()> {
    let (young, details) = match find(db, viewer, young)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let details = match details {
        Some(details) => details,
        None => {
            msg_info!(Message::NoProjetForYoung(young.display_name()));
            return Ok(());
        }
    };
    let projet = &details.projet;

    let mut fields = vec![
        ("Jeune", young.display_name()),
        ("Date du projet", to_french(&projet.date)),
        ("Prochain projet", to_french(&projet.next_project_date())),
        ("Rappel de la situation", or_not_provided(projet.situation.as_deref())),
        ("Attentes du jeune", or_not_provided(projet.young_expectations.as_deref())),
        ("Attentes de la famille", or_not_provided(projet.family_expectations.as_deref())),
    ];
    for (index, objective) in details.objectives.iter().enumerate() {
        let category = objective.category.map(|c| format!(" [{}]", c)).unwrap_or_default();
        let means = objective.means.iter().map(|m| format!("\n  - {}", m)).collect::<String>();
        let evaluation = objective
            .evaluation
            .as_deref()
            .map(|e| format!("\n  Évaluation : {}", e))
            .unwrap_or_default();
        fields.push(("Objectif", format!("{}. {}{}{}{}", index + 1, objective.text, category, means, evaluation)));
    }
    View::details(&fields)
}

fn prompt_objectives(current: &[Objective]) -> Result<Vec<Objective>> {
    if !current.is_empty() && prompt::confirm(Message::ConfirmKeepObjectives(current.len()), false)? {
        return Ok(current.to_vec());
    }

    let theme = ColorfulTheme::default();
    let mut objectives = Vec::new();
    loop {
        let text: String = Input::with_theme(&theme)
            .with_prompt(Message::PromptObjective(objectives.len() + 1).to_string())
            .allow_empty(true)
            .interact_text()?;
        if text.trim().is_empty() {
            break;
        }
        let category = prompt::optional_choice(Message::SelectObjectiveCategory, None, ObjectiveCategory::ALL, None)?;
        let mut means = Vec::new();
        loop {
            let mean: String = Input::with_theme(&theme)
                .with_prompt(Message::PromptMean(means.len() + 1).to_string())
                .allow_empty(true)
                .interact_text()?;
            if mean.trim().is_empty() {
                break;
            }
            means.push(mean.trim().to_string());
        }
        let evaluation = prompt::optional_text(Message::PromptEvaluation, None, None)?;
        objectives.push(Objective {
            id: None,
            text: text.trim().to_string(),
            category,
            evaluation,
            means,
        });
    }
    Ok(objectives)
}

fn read_objectives(path: &PathBuf) -> Result<Vec<Objective>> {
    let raw = fs::read_to_string(path).with_context(|| format!("cannot read {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("invalid objectives file {}", path.display()))
}

fn handle_save(db: &Db, viewer: &Viewer, young: Option<i64>, fields: SaveFields) -> Result<()> {
    let (young, existing) = match find(db, viewer, young)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let young_id = young.id.unwrap_or_default();
    let (current, current_objectives) = match existing {
        Some(details) => (details.projet, details.objectives),
        None => (Projet::new(young_id, today()), Vec::new()),
    };

    let (projet, objectives) = if fields.is_empty() {
        let projet = Projet {
            date: prompt::date(Message::PromptProjetDate, None, Some(current.date))?,
            situation: prompt::optional_text(Message::PromptSection("Rappel de la situation".into()), None, current.situation.as_deref())?,
            young_expectations: prompt::optional_text(
                Message::PromptSection("Attentes du jeune".into()),
                None,
                current.young_expectations.as_deref(),
            )?,
            family_expectations: prompt::optional_text(
                Message::PromptSection("Attentes de la famille".into()),
                None,
                current.family_expectations.as_deref(),
            )?,
            ..current.clone()
        };
        (projet, prompt_objectives(&current_objectives)?)
    } else {
        let projet = Projet {
            date: fields.date.as_deref().map(parse_date).transpose()?.unwrap_or(current.date),
            situation: fields.situation.or_else(|| current.situation.clone()),
            young_expectations: fields.young_expectations.or_else(|| current.young_expectations.clone()),
            family_expectations: fields.family_expectations.or_else(|| current.family_expectations.clone()),
            ..current.clone()
        };
        let objectives = match &fields.objectives {
            Some(path) => read_objectives(path)?,
            None => current_objectives,
        };
        (projet, objectives)
    };

    let id = Projets::new(db).save(&projet, &objectives).map_err(store_failure)?;
    msg_success!(Message::ProjetSaved(id, young.display_name()));
    Ok(())
}

fn handle_delete(db: &Db, viewer: &Viewer, young: Option<i64>, yes: bool) -> Result<()> {
    let (young, details) = match find(db, viewer, young)? {
        Some(found) => found,
        None => return Ok(()),
    };
    let id = match details.and_then(|d| d.projet.id) {
        Some(id) => id,
        None => {
            msg_info!(Message::NoProjetForYoung(young.display_name()));
            return Ok(());
        }
    };
    if !prompt::confirm(Message::ConfirmDeleteProjet(young.display_name()), yes)? {
        msg_info!(Message::OperationCancelled);
        return Ok(());
    }
    Projets::new(db).delete(id).map_err(store_failure)?;
    msg_success!(Message::ProjetDeleted(young.display_name()));
    Ok(())
}
