use chrono::NaiveDate;

/// Placeholder shown wherever an optional field is empty.
pub const NOT_PROVIDED: &str = "Non renseigné";

/// "Prénom NOM", the way staff and residents are named on every screen.
pub fn full_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim().to_uppercase())
}

pub fn or_not_provided(value: Option<&str>) -> String {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => NOT_PROVIDED.to_string(),
    }
}

pub fn date_or_not_provided(date: Option<NaiveDate>) -> String {
    date.map(|d| super::dates::to_french(&d)).unwrap_or_else(|| NOT_PROVIDED.to_string())
}

/// Joins names with ", " or returns `empty` when there are none.
pub fn join_names(names: &[String], empty: &str) -> String {
    if names.is_empty() {
        empty.to_string()
    } else {
        names.join(", ")
    }
}

/// Truncates long free text for table cells.
pub fn ellipsize(text: &str, max_chars: usize) -> String {
    let single_line = text.replace('\n', " ");
    if single_line.chars().count() <= max_chars {
        return single_line;
    }
    let cut: String = single_line.chars().take(max_chars.saturating_sub(1)).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_displayed_first_then_upper_last() {
        assert_eq!(full_name("Paul", "Martin"), "Paul MARTIN");
    }

    #[test]
    fn empty_values_are_not_provided() {
        assert_eq!(or_not_provided(Some("  ")), NOT_PROVIDED);
        assert_eq!(or_not_provided(None), NOT_PROVIDED);
        assert_eq!(or_not_provided(Some("ok")), "ok");
    }

    #[test]
    fn ellipsize_keeps_short_text() {
        assert_eq!(ellipsize("court", 10), "court");
        assert_eq!(ellipsize("un texte beaucoup trop long", 8), "un text…");
    }
}
