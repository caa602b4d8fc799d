use super::db::Db;
use super::error::{StoreError, StoreResult};
use crate::libs::formatter::full_name;
use crate::libs::vocabulary::{optional_column, AccompanimentType, AdmissionStatus, PlacementType};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const YOUNG_COLUMNS: &str = "id, nom, prenom, date_naissance, lieu_naissance, date_entree, type_placement,
    type_accompagnement, statut_accueil, referent_id, co_referent_id, date_echeance_placement, date_audience,
    date_synthese_pec, date_echeance_cjm, date_sortie, service_id";
const INSERT_YOUNG: &str = "INSERT INTO youngs (nom, prenom, date_naissance, lieu_naissance, date_entree,
    type_placement, type_accompagnement, statut_accueil, referent_id, co_referent_id, date_echeance_placement,
    date_audience, date_synthese_pec, date_echeance_cjm, date_sortie, service_id)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16)";
const UPDATE_YOUNG: &str = "UPDATE youngs SET nom = ?2, prenom = ?3, date_naissance = ?4, lieu_naissance = ?5,
    date_entree = ?6, type_placement = ?7, type_accompagnement = ?8, statut_accueil = ?9, referent_id = ?10,
    co_referent_id = ?11, date_echeance_placement = ?12, date_audience = ?13, date_synthese_pec = ?14,
    date_echeance_cjm = ?15, date_sortie = ?16, service_id = ?17 WHERE id = ?1";
const DELETE_YOUNG: &str = "DELETE FROM youngs WHERE id = ?1";
const SELECT_YOUNG_SUMMARIES: &str = "
    SELECT y.id, y.nom, y.prenom, y.date_naissance, y.statut_accueil,
           u.prenom, u.nom, s.nom_service
    FROM youngs y
    LEFT JOIN users u ON y.referent_id = u.id
    LEFT JOIN services s ON y.service_id = s.id
    WHERE (?1 IS NULL OR y.service_id = ?1)
    ORDER BY y.nom, y.prenom";
const SELECT_REFERENTS: &str = "SELECT id, prenom, nom FROM users ORDER BY nom, prenom";
const SELECT_REFERENT_OF: &str = "SELECT prenom, nom FROM youngs WHERE referent_id = ?1 ORDER BY nom, prenom";
const SELECT_CO_REFERENT_OF: &str = "SELECT prenom, nom FROM youngs WHERE co_referent_id = ?1 ORDER BY nom, prenom";

/// A resident's full record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Young {
    pub id: Option<i64>,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: Option<NaiveDate>,
    pub birth_place: Option<String>,
    pub entry_date: Option<NaiveDate>,
    pub placement_type: Option<PlacementType>,
    pub accompaniment_type: Option<AccompanimentType>,
    pub admission_status: AdmissionStatus,
    pub referent_id: Option<i64>,
    pub co_referent_id: Option<i64>,
    pub placement_end_date: Option<NaiveDate>,
    pub hearing_date: Option<NaiveDate>,
    pub care_synthesis_date: Option<NaiveDate>,
    pub young_adult_contract_end_date: Option<NaiveDate>,
    pub exit_date: Option<NaiveDate>,
    pub service_id: Option<i64>,
}

impl Young {
    pub fn new(last_name: &str, first_name: &str, admission_status: AdmissionStatus) -> Self {
        Self {
            id: None,
            last_name: last_name.to_string(),
            first_name: first_name.to_string(),
            birth_date: None,
            birth_place: None,
            entry_date: None,
            placement_type: None,
            accompaniment_type: None,
            admission_status,
            referent_id: None,
            co_referent_id: None,
            placement_end_date: None,
            hearing_date: None,
            care_synthesis_date: None,
            young_adult_contract_end_date: None,
            exit_date: None,
            service_id: None,
        }
    }

    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            last_name: row.get(1)?,
            first_name: row.get(2)?,
            birth_date: row.get(3)?,
            birth_place: row.get(4)?,
            entry_date: row.get(5)?,
            placement_type: optional_column(row, 6)?,
            accompaniment_type: optional_column(row, 7)?,
            admission_status: row.get(8)?,
            referent_id: row.get(9)?,
            co_referent_id: row.get(10)?,
            placement_end_date: row.get(11)?,
            hearing_date: row.get(12)?,
            care_synthesis_date: row.get(13)?,
            young_adult_contract_end_date: row.get(14)?,
            exit_date: row.get(15)?,
            service_id: row.get(16)?,
        })
    }
}

/// One line of the residents list.
#[derive(Debug, Clone, Serialize)]
pub struct YoungSummary {
    pub id: i64,
    pub last_name: String,
    pub first_name: String,
    pub birth_date: Option<NaiveDate>,
    pub admission_status: AdmissionStatus,
    pub referent_name: Option<String>,
    pub service_name: Option<String>,
}

impl YoungSummary {
    pub fn display_name(&self) -> String {
        full_name(&self.first_name, &self.last_name)
    }
}

/// Residents a staff member is responsible for.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Caseload {
    pub referent_of: Vec<String>,
    pub co_referent_of: Vec<String>,
}

pub struct Youngs<'a> {
    conn: &'a Connection,
}

impl<'a> Youngs<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// Residents sorted by name, optionally restricted to one service.
    pub fn list(&self, service_id: Option<i64>) -> StoreResult<Vec<YoungSummary>> {
        let mut stmt = self.conn.prepare(SELECT_YOUNG_SUMMARIES)?;
        let youngs = stmt
            .query_map(params![service_id], |row| {
                let referent_first: Option<String> = row.get(5)?;
                let referent_last: Option<String> = row.get(6)?;
                Ok(YoungSummary {
                    id: row.get(0)?,
                    last_name: row.get(1)?,
                    first_name: row.get(2)?,
                    birth_date: row.get(3)?,
                    admission_status: row.get(4)?,
                    referent_name: match (referent_first, referent_last) {
                        (Some(first), Some(last)) => Some(full_name(&first, &last)),
                        _ => None,
                    },
                    service_name: row.get(7)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(youngs)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Young>> {
        let sql = format!("SELECT {} FROM youngs WHERE id = ?1", YOUNG_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], Young::from_row).optional()?)
    }

    /// Full records of the given residents, in the order of `ids`; unknown
    /// ids are skipped.
    pub fn get_many(&self, ids: &[i64]) -> StoreResult<Vec<Young>> {
        let mut youngs = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(young) = self.get(*id)? {
                youngs.push(young);
            }
        }
        Ok(youngs)
    }

    pub fn insert(&self, young: &Young) -> StoreResult<i64> {
        self.conn.execute(
            INSERT_YOUNG,
            params![
                young.last_name,
                young.first_name,
                young.birth_date,
                young.birth_place,
                young.entry_date,
                young.placement_type,
                young.accompaniment_type,
                young.admission_status,
                young.referent_id,
                young.co_referent_id,
                young.placement_end_date,
                young.hearing_date,
                young.care_synthesis_date,
                young.young_adult_contract_end_date,
                young.exit_date,
                young.service_id
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    pub fn update(&self, id: i64, young: &Young) -> StoreResult<()> {
        let affected = self.conn.execute(
            UPDATE_YOUNG,
            params![
                id,
                young.last_name,
                young.first_name,
                young.birth_date,
                young.birth_place,
                young.entry_date,
                young.placement_type,
                young.accompaniment_type,
                young.admission_status,
                young.referent_id,
                young.co_referent_id,
                young.placement_end_date,
                young.hearing_date,
                young.care_synthesis_date,
                young.young_adult_contract_end_date,
                young.exit_date,
                young.service_id
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("young", id));
        }
        Ok(())
    }

    /// Removes the resident together with contacts, links, reports, project
    /// and presence rows.
    pub fn delete(&self, id: i64) -> StoreResult<()> {
        let affected = self.conn.execute(DELETE_YOUNG, params![id])?;
        if affected == 0 {
            return Err(StoreError::not_found("young", id));
        }
        Ok(())
    }

    /// Staff members selectable as referent, as `(id, "Prénom NOM")`.
    pub fn referents_for_form(&self) -> StoreResult<Vec<(i64, String)>> {
        let mut stmt = self.conn.prepare(SELECT_REFERENTS)?;
        let referents = stmt
            .query_map([], |row| {
                let first: String = row.get(1)?;
                let last: String = row.get(2)?;
                Ok((row.get(0)?, full_name(&first, &last)))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(referents)
    }

    pub fn for_professional(&self, user_id: i64) -> StoreResult<Caseload> {
        Ok(Caseload {
            referent_of: self.names(SELECT_REFERENT_OF, user_id)?,
            co_referent_of: self.names(SELECT_CO_REFERENT_OF, user_id)?,
        })
    }

    fn names(&self, sql: &str, user_id: i64) -> StoreResult<Vec<String>> {
        let mut stmt = self.conn.prepare(sql)?;
        let names = stmt
            .query_map(params![user_id], |row| {
                let first: String = row.get(0)?;
                let last: String = row.get(1)?;
                Ok(full_name(&first, &last))
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }
}
