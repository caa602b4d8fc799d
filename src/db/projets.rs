use super::db::Db;
use super::error::{StoreError, StoreResult};
use super::youngs::{Young, Youngs};
use crate::libs::dates::one_year_after;
use crate::libs::formatter::full_name;
use crate::libs::vocabulary::{optional_column, ObjectiveCategory};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const INSERT_PROJET: &str = "INSERT INTO projet_p (date_projet, young_id, rappel_situation, attentes_jeune, attentes_famille)
    VALUES (?1, ?2, ?3, ?4, ?5)";
const UPDATE_PROJET: &str = "UPDATE projet_p SET date_projet = ?2, young_id = ?3, rappel_situation = ?4,
    attentes_jeune = ?5, attentes_famille = ?6 WHERE id = ?1";
const DELETE_PROJET: &str = "DELETE FROM projet_p WHERE id = ?1";
const DELETE_OBJECTIVES: &str = "DELETE FROM projet_p_objectifs WHERE projet_p_id = ?1";
const INSERT_OBJECTIVE: &str = "INSERT INTO projet_p_objectifs (projet_p_id, objectif, categorie, evaluation) VALUES (?1, ?2, ?3, ?4)";
const INSERT_MEAN: &str = "INSERT INTO projet_p_moyens (objectif_id, moyen) VALUES (?1, ?2)";
const SELECT_PROJET_BY_ID: &str = "SELECT id, date_projet, young_id, rappel_situation, attentes_jeune, attentes_famille
    FROM projet_p WHERE id = ?1";
const SELECT_PROJET_BY_YOUNG: &str = "SELECT id, date_projet, young_id, rappel_situation, attentes_jeune, attentes_famille
    FROM projet_p WHERE young_id = ?1";
const SELECT_OBJECTIVES: &str = "SELECT id, objectif, categorie, evaluation FROM projet_p_objectifs
    WHERE projet_p_id = ?1 ORDER BY id";
const SELECT_MEANS: &str = "SELECT moyen FROM projet_p_moyens WHERE objectif_id = ?1 ORDER BY id";
const SELECT_PROJET_ITEMS: &str = "
    SELECT p.id, p.date_projet, p.young_id, y.prenom, y.nom
    FROM projet_p p JOIN youngs y ON p.young_id = y.id
    ORDER BY p.date_projet DESC, y.nom";

/// A resident's personalised care project. At most one per young.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Projet {
    pub id: Option<i64>,
    pub date: NaiveDate,
    pub young_id: i64,
    pub situation: Option<String>,
    pub young_expectations: Option<String>,
    pub family_expectations: Option<String>,
}

impl Projet {
    pub fn new(young_id: i64, date: NaiveDate) -> Self {
        Self {
            id: None,
            date,
            young_id,
            situation: None,
            young_expectations: None,
            family_expectations: None,
        }
    }

    /// Date at which the project is due for renewal.
    pub fn next_project_date(&self) -> NaiveDate {
        one_year_after(self.date)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            date: row.get(1)?,
            young_id: row.get(2)?,
            situation: row.get(3)?,
            young_expectations: row.get(4)?,
            family_expectations: row.get(5)?,
        })
    }
}

/// One objective with its ordered means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Objective {
    pub id: Option<i64>,
    pub text: String,
    pub category: Option<ObjectiveCategory>,
    pub evaluation: Option<String>,
    pub means: Vec<String>,
}

impl Objective {
    pub fn new(text: &str, category: Option<ObjectiveCategory>, means: &[&str]) -> Self {
        Self {
            id: None,
            text: text.to_string(),
            category,
            evaluation: None,
            means: means.iter().map(|m| m.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjetDetails {
    pub projet: Projet,
    pub young: Young,
    pub objectives: Vec<Objective>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjetItem {
    pub id: i64,
    pub date: NaiveDate,
    pub young_id: i64,
    pub young_name: String,
}

pub struct Projets<'a> {
    db: &'a Db,
    conn: &'a Connection,
}

impl<'a> Projets<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db, conn: &db.conn }
    }

    /// Projects newest first with the young's name.
    pub fn list(&self) -> StoreResult<Vec<ProjetItem>> {
        let mut stmt = self.conn.prepare(SELECT_PROJET_ITEMS)?;
        let items = stmt
            .query_map([], |row| {
                let first: String = row.get(3)?;
                let last: String = row.get(4)?;
                Ok(ProjetItem {
                    id: row.get(0)?,
                    date: row.get(1)?,
                    young_id: row.get(2)?,
                    young_name: full_name(&first, &last),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<ProjetDetails>> {
        let projet = self.conn.query_row(SELECT_PROJET_BY_ID, params![id], Projet::from_row).optional()?;
        self.with_objectives(projet)
    }

    pub fn for_young(&self, young_id: i64) -> StoreResult<Option<ProjetDetails>> {
        let projet = self.conn.query_row(SELECT_PROJET_BY_YOUNG, params![young_id], Projet::from_row).optional()?;
        self.with_objectives(projet)
    }

    fn with_objectives(&self, projet: Option<Projet>) -> StoreResult<Option<ProjetDetails>> {
        let projet = match projet {
            Some(projet) => projet,
            None => return Ok(None),
        };
        let young = Youngs::new(self.db)
            .get(projet.young_id)?
            .ok_or_else(|| StoreError::not_found("young", projet.young_id))?;
        let id = projet.id.unwrap_or_default();
        Ok(Some(ProjetDetails {
            objectives: self.objectives(id)?,
            projet,
            young,
        }))
    }

    fn objectives(&self, projet_id: i64) -> StoreResult<Vec<Objective>> {
        let mut stmt = self.conn.prepare(SELECT_OBJECTIVES)?;
        let mut objectives = stmt
            .query_map(params![projet_id], |row| {
                Ok(Objective {
                    id: row.get(0)?,
                    text: row.get(1)?,
                    category: optional_column(row, 2)?,
                    evaluation: row.get(3)?,
                    means: Vec::new(),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        let mut means_stmt = self.conn.prepare(SELECT_MEANS)?;
        for objective in objectives.iter_mut() {
            objective.means = means_stmt
                .query_map(params![objective.id], |row| row.get(0))?
                .collect::<Result<Vec<String>, _>>()?;
        }
        Ok(objectives)
    }

    /// Inserts the project, or updates it when `projet.id` is set, and
    /// replaces its objectives and means in the same transaction. Objectives
    /// and means with blank text are dropped. A second project for the same
    /// young fails with `Duplicate("projet_p.young_id")`.
    pub fn save(&self, projet: &Projet, objectives: &[Objective]) -> StoreResult<i64> {
        let tx = self.conn.unchecked_transaction()?;
        let id = match projet.id {
            Some(id) => {
                let affected = tx.execute(
                    UPDATE_PROJET,
                    params![
                        id,
                        projet.date,
                        projet.young_id,
                        projet.situation,
                        projet.young_expectations,
                        projet.family_expectations
                    ],
                )?;
                if affected == 0 {
                    return Err(StoreError::not_found("projet", id));
                }
                tx.execute(DELETE_OBJECTIVES, params![id])?;
                id
            }
            None => {
                tx.execute(
                    INSERT_PROJET,
                    params![
                        projet.date,
                        projet.young_id,
                        projet.situation,
                        projet.young_expectations,
                        projet.family_expectations
                    ],
                )?;
                tx.last_insert_rowid()
            }
        };

        for objective in objectives.iter().filter(|o| !o.text.trim().is_empty()) {
            tx.execute(
                INSERT_OBJECTIVE,
                params![id, objective.text.trim(), objective.category, objective.evaluation],
            )?;
            let objective_id = tx.last_insert_rowid();
            for mean in objective.means.iter().map(|m| m.trim()).filter(|m| !m.is_empty()) {
                tx.execute(INSERT_MEAN, params![objective_id, mean])?;
            }
        }

        tx.commit()?;
        Ok(id)
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_PROJET, params![id])? == 0 {
            return Err(StoreError::not_found("projet", id));
        }
        Ok(())
    }
}
