//! Closed vocabularies used throughout the facility records.
//!
//! Every value keeps the French text stored in the database (and shown to the
//! staff) plus a plain ASCII alias that is easier to type on the command line.
//! Parsing accepts either spelling, case-insensitively.

use crate::db::error::StoreError;
use chrono::Datelike;

macro_rules! vocabulary {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($variant:ident => $text:literal, $alias:literal;)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stored and displayed text.
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }

            pub fn alias(&self) -> &'static str {
                match self {
                    $($name::$variant => $alias),+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::db::error::StoreError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let needle = s.trim().to_lowercase();
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.as_str().to_lowercase() == needle || v.alias().to_lowercase() == needle)
                    .ok_or_else(|| $crate::db::error::StoreError::Invalid {
                        field: stringify!($name),
                        value: s.to_string(),
                    })
            }
        }

        impl rusqlite::types::ToSql for $name {
            fn to_sql(&self) -> rusqlite::Result<rusqlite::types::ToSqlOutput<'_>> {
                Ok(rusqlite::types::ToSqlOutput::from(self.as_str()))
            }
        }

        impl rusqlite::types::FromSql for $name {
            fn column_result(value: rusqlite::types::ValueRef<'_>) -> rusqlite::types::FromSqlResult<Self> {
                value
                    .as_str()?
                    .parse()
                    .map_err(|e: $crate::db::error::StoreError| rusqlite::types::FromSqlError::Other(Box::new(e)))
            }
        }

        impl serde::Serialize for $name {
            fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> serde::Deserialize<'de> for $name {
            fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                raw.parse().map_err(serde::de::Error::custom)
            }
        }

        impl clap::ValueEnum for $name {
            fn value_variants<'a>() -> &'a [Self] {
                Self::ALL
            }

            fn to_possible_value(&self) -> Option<clap::builder::PossibleValue> {
                Some(clap::builder::PossibleValue::new(self.alias()).alias(self.as_str()).help(self.as_str()))
            }
        }
    };
}

pub(crate) use vocabulary;

vocabulary! {
    /// Access level of a staff account.
    PermissionLevel {
        Standard => "standard", "standard";
        Administrative => "gestion administrative", "admin";
    }
}

vocabulary! {
    AdmissionStatus {
        Pending => "en attente", "pending";
        Admitted => "admission validée", "admitted";
        Exited => "sorti", "exited";
    }
}

vocabulary! {
    PlacementType {
        Emergency => "accueil d’urgence", "emergency";
        Reception72h => "accueil 72h", "72h";
        Provisional => "placement provisoire", "provisional";
        Judicial => "mesure judiciaire", "judicial";
        Administrative => "mesure administrative", "administrative";
    }
}

vocabulary! {
    AccompanimentType {
        AemoRh => "AEMO-RH", "aemo-rh";
        RespiteStay => "séjour de répit (AEMO-RH)", "respite";
        Boarding => "internat", "boarding";
        Studio => "studio", "studio";
    }
}

vocabulary! {
    EventType {
        Health => "soin, santé", "health";
        School => "scolarité", "school";
        Family => "famille", "family";
        FollowUp => "suivi", "follow-up";
        Outing => "activités extérieure", "outing";
        Other => "autres", "other";
    }
}

vocabulary! {
    /// `Urgent` is never stored; it is derived when a task is read.
    TaskStatus {
        Todo => "à faire", "todo";
        Urgent => "urgent", "urgent";
        Done => "réalisée", "done";
    }
}

vocabulary! {
    Weekday {
        Monday => "lundi", "monday";
        Tuesday => "mardi", "tuesday";
        Wednesday => "mercredi", "wednesday";
        Thursday => "jeudi", "thursday";
        Friday => "vendredi", "friday";
        Saturday => "samedi", "saturday";
        Sunday => "dimanche", "sunday";
    }
}

impl Weekday {
    pub fn of(date: &impl Datelike) -> Weekday {
        Weekday::from(date.weekday())
    }
}

impl From<chrono::Weekday> for Weekday {
    fn from(day: chrono::Weekday) -> Self {
        Weekday::ALL[day.num_days_from_monday() as usize]
    }
}

vocabulary! {
    TransmissionCategory {
        Information => "information", "information";
        School => "scolarité", "school";
        Family => "famille", "family";
        Behaviour => "comportement", "behaviour";
        Health => "soin/santé", "health";
        DailyLife => "quotidien", "daily";
        Outing => "activités extérieures", "outing";
        Other => "autres", "other";
    }
}

vocabulary! {
    /// Colour tag of a transmission.
    Importance {
        Normal => "gris", "normal";
        Positive => "vert", "positive";
        Attention => "orange", "attention";
        Urgent => "rouge", "urgent";
    }
}

impl Default for Importance {
    fn default() -> Self {
        Importance::Normal
    }
}

vocabulary! {
    ReportType {
        EmergencyEvaluation => "rapport d’évaluation accueil d’urgence", "emergency";
        Evaluation72h => "rapport d’évaluation accueil 72h", "72h";
        ProvisionalEvaluation => "rapport d’évaluation placement provisoire", "provisional";
        Synthesis => "rapport de synthèse", "synthesis";
    }
}

vocabulary! {
    ReportStatus {
        Pending => "en attente", "pending";
        Validated => "validé", "validated";
    }
}

vocabulary! {
    ObjectiveCategory {
        Educational => "éducatif", "educational";
        School => "scolarité", "school";
        Health => "soin/santé", "health";
        Family => "famille", "family";
        Outing => "activités extérieures", "outing";
        Other => "autres", "other";
    }
}

vocabulary! {
    PresenceStatus {
        PresentDay => "Présent (journée)", "present";
        PresentLunch => "Présent (midi)", "present-lunch";
        PresentEvening => "Présent (soir)", "present-evening";
        AbsentDay => "Absent (journée)", "absent";
        FamilyLeave => "Permis famille", "family-leave";
        Runaway => "Fugue", "runaway";
        Hospital => "Hôpital", "hospital";
    }
}

impl Default for PresenceStatus {
    fn default() -> Self {
        PresenceStatus::PresentDay
    }
}

/// Presence status with the three "present" variants merged, used by the
/// period summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PresenceKind {
    Present,
    Absent,
    FamilyLeave,
    Runaway,
    Hospital,
}

impl PresenceStatus {
    pub fn kind(&self) -> PresenceKind {
        match self {
            PresenceStatus::PresentDay | PresenceStatus::PresentLunch | PresenceStatus::PresentEvening => PresenceKind::Present,
            PresenceStatus::AbsentDay => PresenceKind::Absent,
            PresenceStatus::FamilyLeave => PresenceKind::FamilyLeave,
            PresenceStatus::Runaway => PresenceKind::Runaway,
            PresenceStatus::Hospital => PresenceKind::Hospital,
        }
    }

    pub fn allows_lunch(&self) -> bool {
        matches!(self, PresenceStatus::PresentDay | PresenceStatus::PresentLunch)
    }

    pub fn allows_dinner(&self) -> bool {
        matches!(self, PresenceStatus::PresentDay | PresenceStatus::PresentEvening)
    }
}

vocabulary! {
    MealType {
        Normal => "normal", "normal";
        NoPork => "sans_porc", "no-pork";
        Vegetarian => "vegetarien", "vegetarian";
        NoMeal => "aucun", "none";
    }
}

impl Default for MealType {
    fn default() -> Self {
        MealType::Normal
    }
}

impl MealType {
    pub fn is_served(&self) -> bool {
        !matches!(self, MealType::NoMeal)
    }
}

/// Parses an optional free-text column into a vocabulary value, treating
/// empty strings as absent.
pub fn parse_optional<T: std::str::FromStr<Err = StoreError>>(value: Option<&str>) -> Result<Option<T>, StoreError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some),
    }
}

/// Reads a nullable text column holding a vocabulary value. Blank text is
/// read as `None`.
pub fn optional_column<T: std::str::FromStr<Err = StoreError>>(row: &rusqlite::Row, idx: usize) -> rusqlite::Result<Option<T>> {
    let raw: Option<String> = row.get(idx)?;
    parse_optional(raw.as_deref())
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn parses_text_and_alias() {
        assert_eq!("gestion administrative".parse::<PermissionLevel>().unwrap(), PermissionLevel::Administrative);
        assert_eq!("ADMIN".parse::<PermissionLevel>().unwrap(), PermissionLevel::Administrative);
        assert_eq!("Présent (midi)".parse::<PresenceStatus>().unwrap(), PresenceStatus::PresentLunch);
        assert!("maybe".parse::<MealType>().is_err());
    }

    #[test]
    fn french_weekday_from_date() {
        let wednesday = NaiveDate::from_ymd_opt(2024, 5, 15).unwrap();
        assert_eq!(Weekday::of(&wednesday), Weekday::Wednesday);
        assert_eq!(Weekday::of(&wednesday).as_str(), "mercredi");
    }

    #[test]
    fn presence_gates_meals() {
        assert!(PresenceStatus::PresentDay.allows_lunch() && PresenceStatus::PresentDay.allows_dinner());
        assert!(PresenceStatus::PresentLunch.allows_lunch() && !PresenceStatus::PresentLunch.allows_dinner());
        assert!(!PresenceStatus::PresentEvening.allows_lunch() && PresenceStatus::PresentEvening.allows_dinner());
        assert!(!PresenceStatus::Hospital.allows_lunch() && !PresenceStatus::Hospital.allows_dinner());
    }

    #[test]
    fn present_variants_collapse() {
        assert_eq!(PresenceStatus::PresentEvening.kind(), PresenceKind::Present);
        assert_eq!(PresenceStatus::Runaway.kind(), PresenceKind::Runaway);
    }

    #[test]
    fn parse_optional_skips_blank() {
        assert_eq!(parse_optional::<ReportStatus>(Some("  ")).unwrap(), None);
        assert_eq!(parse_optional::<ReportStatus>(Some("validé")).unwrap(), Some(ReportStatus::Validated));
    }
}
