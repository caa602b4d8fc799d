use super::db::Db;
use super::error::{StoreError, StoreResult};
use super::users::Users;
use super::youngs::{Young, Youngs};
use crate::libs::formatter::full_name;
use crate::libs::vocabulary::{ReportStatus, ReportType};
use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row};
use serde::{Deserialize, Serialize};

const REPORT_COLUMNS: &str = "id, type_rapport, date_redaction, young_id, redacteur_id, validateur_id,
    rappel_situation, accueil, scolarite, soin_sante, famille, psychologique, preconisations, statut";
const INSERT_REPORT: &str = "INSERT INTO reports (type_rapport, young_id, redacteur_id, rappel_situation, accueil,
    scolarite, soin_sante, famille, psychologique, preconisations, statut)
    VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const UPDATE_REPORT: &str = "UPDATE reports SET type_rapport = ?2, rappel_situation = ?3, accueil = ?4, scolarite = ?5,
    soin_sante = ?6, famille = ?7, psychologique = ?8, preconisations = ?9 WHERE id = ?1";
const VALIDATE_REPORT: &str = "UPDATE reports SET statut = ?2, validateur_id = ?3, date_redaction = ?4
    WHERE id = ?1 AND statut = ?5";
const DELETE_REPORT: &str = "DELETE FROM reports WHERE id = ?1";
const SELECT_REPORT_ITEMS: &str = "
    SELECT r.id, r.type_rapport, r.date_redaction, r.statut, r.young_id, y.prenom, y.nom, u.prenom, u.nom
    FROM reports r
    JOIN youngs y ON r.young_id = y.id
    JOIN users u ON r.redacteur_id = u.id
    WHERE (?1 IS NULL OR r.young_id = ?1)
    ORDER BY r.date_redaction IS NULL DESC, r.date_redaction DESC, y.nom, r.id DESC";

/// Free-text sections of a report, in document order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReportSections {
    pub situation: Option<String>,
    pub reception: Option<String>,
    pub schooling: Option<String>,
    pub health: Option<String>,
    pub family: Option<String>,
    pub psychological: Option<String>,
    pub recommendations: Option<String>,
}

impl ReportSections {
    /// `(heading, body)` pairs as printed in the exported document.
    pub fn titled(&self) -> [(&'static str, Option<&str>); 7] {
        [
            ("Rappel de la situation", self.situation.as_deref()),
            ("Accueil", self.reception.as_deref()),
            ("Scolarité", self.schooling.as_deref()),
            ("Soin / Santé", self.health.as_deref()),
            ("Famille", self.family.as_deref()),
            ("Psychologique", self.psychological.as_deref()),
            ("Préconisations", self.recommendations.as_deref()),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub id: Option<i64>,
    pub report_type: ReportType,
    /// Set when the report is validated.
    pub written_on: Option<NaiveDate>,
    pub young_id: i64,
    pub author_id: i64,
    pub validator_id: Option<i64>,
    pub sections: ReportSections,
    pub status: ReportStatus,
}

impl Report {
    pub fn new(report_type: ReportType, young_id: i64, author_id: i64) -> Self {
        Self {
            id: None,
            report_type,
            written_on: None,
            young_id,
            author_id,
            validator_id: None,
            sections: ReportSections::default(),
            status: ReportStatus::Pending,
        }
    }

    pub fn is_validated(&self) -> bool {
        self.status == ReportStatus::Validated
    }

    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            report_type: row.get(1)?,
            written_on: row.get(2)?,
            young_id: row.get(3)?,
            author_id: row.get(4)?,
            validator_id: row.get(5)?,
            sections: ReportSections {
                situation: row.get(6)?,
                reception: row.get(7)?,
                schooling: row.get(8)?,
                health: row.get(9)?,
                family: row.get(10)?,
                psychological: row.get(11)?,
                recommendations: row.get(12)?,
            },
            status: row.get(13)?,
        })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportItem {
    pub id: i64,
    pub report_type: ReportType,
    pub written_on: Option<NaiveDate>,
    pub status: ReportStatus,
    pub young_id: i64,
    pub young_name: String,
    pub author_name: String,
}

/// A report with the people it mentions, ready for export.
#[derive(Debug, Clone, Serialize)]
pub struct ReportDetails {
    pub report: Report,
    pub young: Young,
    pub author_name: String,
    pub validator_name: Option<String>,
}

pub struct Reports<'a> {
    db: &'a Db,
    conn: &'a Connection,
}

impl<'a> Reports<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { db, conn: &db.conn }
    }

    /// Reports newest first, optionally for one young only.
    pub fn list(&self, young_id: Option<i64>) -> StoreResult<Vec<ReportItem>> {
        let mut stmt = self.conn.prepare(SELECT_REPORT_ITEMS)?;
        let items = stmt
            .query_map(params![young_id], |row| {
                let young_first: String = row.get(5)?;
                let young_last: String = row.get(6)?;
                let author_first: String = row.get(7)?;
                let author_last: String = row.get(8)?;
                Ok(ReportItem {
                    id: row.get(0)?,
                    report_type: row.get(1)?,
                    written_on: row.get(2)?,
                    status: row.get(3)?,
                    young_id: row.get(4)?,
                    young_name: full_name(&young_first, &young_last),
                    author_name: full_name(&author_first, &author_last),
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(items)
    }

    pub fn get(&self, id: i64) -> StoreResult<Option<Report>> {
        let sql = format!("SELECT {} FROM reports WHERE id = ?1", REPORT_COLUMNS);
        Ok(self.conn.query_row(&sql, params![id], Report::from_row).optional()?)
    }

    pub fn details(&self, id: i64) -> StoreResult<Option<ReportDetails>> {
        let report = match self.get(id)? {
            Some(report) => report,
            None => return Ok(None),
        };
        let young = Youngs::new(self.db)
            .get(report.young_id)?
            .ok_or_else(|| StoreError::not_found("young", report.young_id))?;
        let users = Users::new(self.db);
        let author_name = users
            .get(report.author_id)?
            .map(|u| u.display_name())
            .ok_or_else(|| StoreError::not_found("user", report.author_id))?;
        let validator_name = match report.validator_id {
            Some(validator_id) => users.get(validator_id)?.map(|u| u.display_name()),
            None => None,
        };
        Ok(Some(ReportDetails {
            report,
            young,
            author_name,
            validator_name,
        }))
    }

    /// Stores a new draft report and returns its id.
    pub fn insert(&self, report: &Report) -> StoreResult<i64> {
        let s = &report.sections;
        self.conn.execute(
            INSERT_REPORT,
            params![
                report.report_type,
                report.young_id,
                report.author_id,
                s.situation,
                s.reception,
                s.schooling,
                s.health,
                s.family,
                s.psychological,
                s.recommendations,
                ReportStatus::Pending
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Rewrites the type and the text sections. Status, date and validator
    /// are only changed through [`Reports::validate`].
    pub fn update(&self, id: i64, report_type: ReportType, sections: &ReportSections) -> StoreResult<()> {
        let affected = self.conn.execute(
            UPDATE_REPORT,
            params![
                id,
                report_type,
                sections.situation,
                sections.reception,
                sections.schooling,
                sections.health,
                sections.family,
                sections.psychological,
                sections.recommendations
            ],
        )?;
        if affected == 0 {
            return Err(StoreError::not_found("report", id));
        }
        Ok(())
    }

    /// Moves a pending report to validated, stamping `validated_on` and the
    /// validator. Returns `false` without touching the row when the report
    /// was already validated.
    pub fn validate(&self, id: i64, validator_id: i64, validated_on: NaiveDate) -> StoreResult<bool> {
        let affected = self.conn.execute(
            VALIDATE_REPORT,
            params![id, ReportStatus::Validated, validator_id, validated_on, ReportStatus::Pending],
        )?;
        if affected == 1 {
            tracing::info!(report_id = id, validator_id, "report validated");
            return Ok(true);
        }
        match self.get(id)? {
            Some(_) => Ok(false),
            None => Err(StoreError::not_found("report", id)),
        }
    }

    pub fn delete(&self, id: i64) -> StoreResult<()> {
        if self.conn.execute(DELETE_REPORT, params![id])? == 0 {
            return Err(StoreError::not_found("report", id));
        }
        Ok(())
    }
}
