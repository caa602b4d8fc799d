//! Headcount tables built from the daily presence and meal records.
//!
//! The shape is fixed: {youngs, professionals} × {lunch, dinner} ×
//! {normal, no pork, vegetarian, total}. A selection of `aucun` or a missing
//! selection is not counted, and `total` is always the sum of the three typed
//! counts.

use super::vocabulary::{MealType, PresenceKind};
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealTally {
    pub normal: u32,
    pub no_pork: u32,
    pub vegetarian: u32,
    pub total: u32,
}

impl MealTally {
    pub fn add(&mut self, meal: Option<MealType>) {
        let bucket = match meal {
            Some(MealType::Normal) => &mut self.normal,
            Some(MealType::NoPork) => &mut self.no_pork,
            Some(MealType::Vegetarian) => &mut self.vegetarian,
            Some(MealType::NoMeal) | None => return,
        };
        *bucket += 1;
        self.total += 1;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MomentCounts {
    pub lunch: MealTally,
    pub dinner: MealTally,
}

impl MomentCounts {
    pub fn record(&mut self, lunch: Option<MealType>, dinner: Option<MealType>) {
        self.lunch.add(lunch);
        self.dinner.add(dinner);
    }
}

/// Meal counts for one day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MealCounts {
    pub youngs: MomentCounts,
    pub professionals: MomentCounts,
}

impl MealCounts {
    /// Everyone eating lunch, youngs and staff together.
    pub fn lunch_total(&self) -> u32 {
        self.youngs.lunch.total + self.professionals.lunch.total
    }

    pub fn dinner_total(&self) -> u32 {
        self.youngs.dinner.total + self.professionals.dinner.total
    }
}

/// Days per presence kind for one young over a period.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PresenceSummaryRow {
    pub young_id: i64,
    pub name: String,
    pub present: u32,
    pub absent: u32,
    pub family_leave: u32,
    pub runaway: u32,
    pub hospital: u32,
}

impl PresenceSummaryRow {
    pub fn new(young_id: i64, name: String) -> Self {
        Self {
            young_id,
            name,
            ..Default::default()
        }
    }

    pub fn add(&mut self, kind: PresenceKind) {
        match kind {
            PresenceKind::Present => self.present += 1,
            PresenceKind::Absent => self.absent += 1,
            PresenceKind::FamilyLeave => self.family_leave += 1,
            PresenceKind::Runaway => self.runaway += 1,
            PresenceKind::Hospital => self.hospital += 1,
        }
    }

    pub fn recorded_days(&self) -> u32 {
        self.present + self.absent + self.family_leave + self.runaway + self.hospital
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tally_ignores_no_meal() {
        let mut tally = MealTally::default();
        for meal in [
            Some(MealType::Normal),
            Some(MealType::Normal),
            Some(MealType::NoPork),
            Some(MealType::Vegetarian),
            Some(MealType::NoMeal),
            None,
        ] {
            tally.add(meal);
        }
        assert_eq!(
            tally,
            MealTally {
                normal: 2,
                no_pork: 1,
                vegetarian: 1,
                total: 4
            }
        );
        assert_eq!(tally.total, tally.normal + tally.no_pork + tally.vegetarian);
    }

    #[test]
    fn lunch_and_dinner_are_independent() {
        let mut counts = MomentCounts::default();
        counts.record(Some(MealType::Vegetarian), Some(MealType::NoMeal));
        assert_eq!(counts.lunch.vegetarian, 1);
        assert_eq!(counts.dinner.total, 0);
    }

    #[test]
    fn summary_counts_each_kind() {
        let mut row = PresenceSummaryRow::new(1, "Paul MARTIN".into());
        row.add(PresenceKind::Present);
        row.add(PresenceKind::Present);
        row.add(PresenceKind::Runaway);
        assert_eq!((row.present, row.runaway, row.recorded_days()), (2, 1, 3));
    }
}
