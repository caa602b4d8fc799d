use super::db::Db;
use super::error::StoreResult;
use crate::libs::dates::days_between;
use crate::libs::formatter::full_name;
use crate::libs::meals::{MealCounts, PresenceSummaryRow};
use crate::libs::vocabulary::{optional_column, AdmissionStatus, MealType, PresenceStatus};
use chrono::NaiveDate;
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

const SELECT_PRESENCE_FOR_DATE: &str = "
    SELECT y.id, y.prenom, y.nom, dp.presence_status, dp.repas_midi, dp.repas_soir
    FROM youngs y
    LEFT JOIN daily_presence dp ON dp.young_id = y.id AND dp.date = ?1
    WHERE y.statut_accueil != ?2 AND (?3 IS NULL OR y.service_id = ?3)
    ORDER BY y.nom, y.prenom";
const SELECT_PROFESSIONAL_MEALS_FOR_DATE: &str = "
    SELECT u.id, u.prenom, u.nom, pm.repas_midi, pm.repas_soir
    FROM users u
    LEFT JOIN professional_meals pm ON pm.user_id = u.id AND pm.date = ?1
    WHERE (?2 IS NULL OR u.service_id = ?2)
    ORDER BY u.nom, u.prenom";
const UPSERT_PRESENCE: &str = "
    INSERT INTO daily_presence (date, young_id, presence_status, repas_midi, repas_soir)
    VALUES (?1, ?2, ?3, ?4, ?5)
    ON CONFLICT (date, young_id) DO UPDATE SET
        presence_status = excluded.presence_status,
        repas_midi = excluded.repas_midi,
        repas_soir = excluded.repas_soir";
const UPSERT_PROFESSIONAL_MEAL: &str = "
    INSERT INTO professional_meals (date, user_id, repas_midi, repas_soir)
    VALUES (?1, ?2, ?3, ?4)
    ON CONFLICT (date, user_id) DO UPDATE SET
        repas_midi = excluded.repas_midi,
        repas_soir = excluded.repas_soir";
const SELECT_YOUNG_MEALS: &str = "
    SELECT dp.repas_midi, dp.repas_soir
    FROM daily_presence dp JOIN youngs y ON dp.young_id = y.id
    WHERE dp.date = ?1 AND (?2 IS NULL OR y.service_id = ?2)";
const SELECT_PROFESSIONAL_MEALS: &str = "
    SELECT pm.repas_midi, pm.repas_soir
    FROM professional_meals pm JOIN users u ON pm.user_id = u.id
    WHERE pm.date = ?1 AND (?2 IS NULL OR u.service_id = ?2)";
const SELECT_PRESENCE_OVER_PERIOD: &str = "
    SELECT y.id, y.prenom, y.nom, dp.presence_status
    FROM youngs y
    LEFT JOIN daily_presence dp ON dp.young_id = y.id AND dp.date BETWEEN ?1 AND ?2
    WHERE y.statut_accueil != ?3 AND (?4 IS NULL OR y.service_id = ?4)
    ORDER BY y.nom, y.prenom, dp.date";

/// One young's presence and meals for a day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PresenceEntry {
    pub young_id: i64,
    pub status: PresenceStatus,
    pub lunch: MealType,
    pub dinner: MealType,
}

impl PresenceEntry {
    /// Default for a young without a record: present all day, normal meals.
    pub fn default_for(young_id: i64) -> Self {
        Self {
            young_id,
            status: PresenceStatus::default(),
            lunch: MealType::default(),
            dinner: MealType::default(),
        }
    }

    /// Drops meals the presence status rules out: lunch needs a day or
    /// midday presence, dinner a day or evening presence.
    pub fn gated(self) -> Self {
        Self {
            lunch: if self.status.allows_lunch() { self.lunch } else { MealType::NoMeal },
            dinner: if self.status.allows_dinner() { self.dinner } else { MealType::NoMeal },
            ..self
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PresenceRow {
    pub name: String,
    pub entry: PresenceEntry,
    /// False when the entry holds defaults rather than a saved record.
    pub recorded: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfessionalMealEntry {
    pub user_id: i64,
    pub lunch: MealType,
    pub dinner: MealType,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfessionalMealRow {
    pub name: String,
    pub entry: ProfessionalMealEntry,
    pub recorded: bool,
}

pub struct DailyLife<'a> {
    conn: &'a Connection,
}

impl<'a> DailyLife<'a> {
    pub fn new(db: &'a Db) -> Self {
        Self { conn: &db.conn }
    }

    /// One row per young still in care, with the saved entry or defaults.
    pub fn presence_for_date(&self, date: NaiveDate, service_id: Option<i64>) -> StoreResult<Vec<PresenceRow>> {
        let mut stmt = self.conn.prepare(SELECT_PRESENCE_FOR_DATE)?;
        let rows = stmt
            .query_map(params![date, AdmissionStatus::Exited, service_id], |row| {
                let young_id: i64 = row.get(0)?;
                let first: String = row.get(1)?;
                let last: String = row.get(2)?;
                let status: Option<PresenceStatus> = optional_column(row, 3)?;
                let defaults = PresenceEntry::default_for(young_id);
                Ok(PresenceRow {
                    name: full_name(&first, &last),
                    recorded: status.is_some(),
                    entry: PresenceEntry {
                        young_id,
                        status: status.unwrap_or(defaults.status),
                        lunch: optional_column(row, 4)?.unwrap_or(defaults.lunch),
                        dinner: optional_column(row, 5)?.unwrap_or(defaults.dinner),
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// One row per staff member, with the saved meals or no meal at all.
    pub fn professional_meals_for_date(&self, date: NaiveDate, service_id: Option<i64>) -> StoreResult<Vec<ProfessionalMealRow>> {
        let mut stmt = self.conn.prepare(SELECT_PROFESSIONAL_MEALS_FOR_DATE)?;
        let rows = stmt
            .query_map(params![date, service_id], |row| {
                let first: String = row.get(1)?;
                let last: String = row.get(2)?;
                let lunch: Option<MealType> = optional_column(row, 3)?;
                let dinner: Option<MealType> = optional_column(row, 4)?;
                Ok(ProfessionalMealRow {
                    name: full_name(&first, &last),
                    recorded: lunch.is_some() || dinner.is_some(),
                    entry: ProfessionalMealEntry {
                        user_id: row.get(0)?,
                        lunch: lunch.unwrap_or(MealType::NoMeal),
                        dinner: dinner.unwrap_or(MealType::NoMeal),
                    },
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }

    /// Upserts every entry for `date` in one transaction. Meals that the
    /// presence status rules out are stored as `aucun`.
    pub fn save_day_presence(&self, date: NaiveDate, entries: &[PresenceEntry]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_PRESENCE)?;
            for entry in entries.iter().map(|e| e.gated()) {
                stmt.execute(params![date, entry.young_id, entry.status, entry.lunch, entry.dinner])?;
            }
        }
        tx.commit()?;
        tracing::debug!(%date, count = entries.len(), "presence saved");
        Ok(())
    }

    pub fn save_professional_meals(&self, date: NaiveDate, entries: &[ProfessionalMealEntry]) -> StoreResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare(UPSERT_PROFESSIONAL_MEAL)?;
            for entry in entries {
                stmt.execute(params![date, entry.user_id, entry.lunch, entry.dinner])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    /// Meal headcount for one day. Counts follow the recorded meal
    /// selections only; the presence status is not consulted.
    pub fn meal_counts_for_date(&self, date: NaiveDate, service_id: Option<i64>) -> StoreResult<MealCounts> {
        let mut counts = MealCounts::default();

        let mut stmt = self.conn.prepare(SELECT_YOUNG_MEALS)?;
        let mut rows = stmt.query(params![date, service_id])?;
        while let Some(row) = rows.next()? {
            counts.youngs.record(optional_column(row, 0)?, optional_column(row, 1)?);
        }

        let mut stmt = self.conn.prepare(SELECT_PROFESSIONAL_MEALS)?;
        let mut rows = stmt.query(params![date, service_id])?;
        while let Some(row) = rows.next()? {
            counts.professionals.record(optional_column(row, 0)?, optional_column(row, 1)?);
        }

        Ok(counts)
    }

    /// Days per presence kind for each young still in care, over
    /// `start..=end`. The three "present" statuses count as one.
    pub fn presence_summary(&self, start: NaiveDate, end: NaiveDate, service_id: Option<i64>) -> StoreResult<Vec<PresenceSummaryRow>> {
        let mut stmt = self.conn.prepare(SELECT_PRESENCE_OVER_PERIOD)?;
        let mut rows = stmt.query(params![start, end, AdmissionStatus::Exited, service_id])?;

        let mut summary: Vec<PresenceSummaryRow> = Vec::new();
        let mut index: HashMap<i64, usize> = HashMap::new();
        while let Some(row) = rows.next()? {
            let young_id: i64 = row.get(0)?;
            let position = match index.get(&young_id) {
                Some(position) => *position,
                None => {
                    let first: String = row.get(1)?;
                    let last: String = row.get(2)?;
                    summary.push(PresenceSummaryRow::new(young_id, full_name(&first, &last)));
                    index.insert(young_id, summary.len() - 1);
                    summary.len() - 1
                }
            };
            if let Some(status) = optional_column::<PresenceStatus>(row, 3)? {
                summary[position].add(status.kind());
            }
        }
        Ok(summary)
    }

    /// The daily headcount repeated for every date of the range.
    pub fn weekly_meal_summary(&self, start: NaiveDate, end: NaiveDate, service_id: Option<i64>) -> StoreResult<BTreeMap<NaiveDate, MealCounts>> {
        let mut summary = BTreeMap::new();
        for date in days_between(start, end) {
            summary.insert(date, self.meal_counts_for_date(date, service_id)?);
        }
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gating_follows_presence() {
        let entry = PresenceEntry {
            young_id: 1,
            status: PresenceStatus::PresentEvening,
            lunch: MealType::Vegetarian,
            dinner: MealType::NoPork,
        };
        let gated = entry.gated();
        assert_eq!(gated.lunch, MealType::NoMeal);
        assert_eq!(gated.dinner, MealType::NoPork);

        let away = PresenceEntry {
            status: PresenceStatus::FamilyLeave,
            ..entry
        }
        .gated();
        assert_eq!((away.lunch, away.dinner), (MealType::NoMeal, MealType::NoMeal));
    }
}
