//! Printable documents for validated reports and personalised projects.
//!
//! A [`Document`] is built once from the stored record using a fixed section
//! template, then written by an [`Exporter`] as a paginated text file, JSON or
//! an Excel workbook.

use super::dates::{to_french, today};
use super::formatter::{date_or_not_provided, or_not_provided};
use super::meals::{MealCounts, PresenceSummaryRow};
use super::messages::Message;
use crate::db::projets::ProjetDetails;
use crate::db::reports::ReportDetails;
use crate::db::youngs::Young;
use crate::{msg_bail_anyhow, msg_success};
use anyhow::Result;
use chrono::NaiveDate;
use rust_xlsxwriter::{Color, Format, Workbook};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

pub const REPORT_TITLE: &str = "Rapport Éducatif";
pub const PROJET_TITLE: &str = "Projet Personnalisé";
/// Body text of a section left blank.
pub const EMPTY_SECTION: &str = "Non renseigné.";
/// Body lines per text page, header and footer excluded.
pub const LINES_PER_PAGE: usize = 50;
pub const LINE_WIDTH: usize = 80;
const PAGE_BREAK: char = '\u{000C}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    /// Paginated plain text
    Text,
    /// Comma separated values, for tables only
    Csv,
    Json,
    Excel,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Text => "txt",
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Excel => "xlsx",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Section {
    pub title: String,
    pub lines: Vec<String>,
}

impl Section {
    fn text(title: &str, body: Option<&str>) -> Self {
        let body = body.map(str::trim).filter(|b| !b.is_empty()).unwrap_or(EMPTY_SECTION);
        Self {
            title: title.to_string(),
            lines: body.lines().map(str::to_string).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    pub title: String,
    /// File name without date or extension, e.g. `Rapport_Paul_MARTIN`.
    #[serde(skip)]
    pub file_stem: String,
    pub info: Vec<(String, String)>,
    pub sections: Vec<Section>,
}

impl Document {
    /// Only validated reports can be printed.
    pub fn report(details: &ReportDetails) -> Result<Self> {
        let report = &details.report;
        if !report.is_validated() {
            msg_bail_anyhow!(Message::ReportNotValidated(report.id.unwrap_or_default()));
        }
        let young_name = details.young.display_name();

        let mut info = young_info(&details.young);
        info.push(("Type de rapport".into(), report.report_type.to_string()));
        info.push(("Date de validation".into(), date_or_not_provided(report.written_on)));
        info.push(("Rédigé par".into(), details.author_name.clone()));
        info.push((
            "Validé par".into(),
            details.validator_name.clone().unwrap_or_else(|| "Non validé".to_string()),
        ));

        Ok(Self {
            title: REPORT_TITLE.to_string(),
            file_stem: format!("Rapport_{}", young_name.replace(' ', "_")),
            info,
            sections: report
                .sections
                .titled()
                .iter()
                .map(|(title, body)| Section::text(title, *body))
                .collect(),
        })
    }

    pub fn projet(details: &ProjetDetails) -> Self {
        let projet = &details.projet;
        let young_name = details.young.display_name();

        let mut info = young_info(&details.young);
        info.push(("Date du projet".into(), to_french(&projet.date)));
        info.push(("Prochain projet".into(), to_french(&projet.next_project_date())));

        let mut sections = vec![
            Section::text("Rappel de la situation", projet.situation.as_deref()),
            Section::text("Attentes du jeune", projet.young_expectations.as_deref()),
            Section::text("Attentes de la famille", projet.family_expectations.as_deref()),
        ];

        if !details.objectives.is_empty() {
            let mut lines = Vec::new();
            for objective in &details.objectives {
                let category = objective.category.map(|c| capitalize(c.as_str())).unwrap_or_else(|| "N/A".into());
                lines.push(format!("Catégorie : {}", category));
                lines.push(format!("Objectif : {}", objective.text));
                if !objective.means.is_empty() {
                    lines.push("Moyens associés :".into());
                    lines.extend(objective.means.iter().map(|m| format!("  - {}", m)));
                }
                if let Some(evaluation) = objective.evaluation.as_deref().filter(|e| !e.trim().is_empty()) {
                    lines.push("Évaluation :".into());
                    lines.extend(evaluation.lines().map(str::to_string));
                }
                lines.push(String::new());
            }
            sections.push(Section {
                title: "Objectifs".into(),
                lines,
            });
        }

        Self {
            title: PROJET_TITLE.to_string(),
            file_stem: format!("Projet_{}", young_name.replace(' ', "_")),
            info,
            sections,
        }
    }

    /// `<stem>_<YYYY-MM-DD>.<ext>`.
    pub fn default_file_name(&self, date: NaiveDate, format: ExportFormat) -> String {
        format!("{}_{}.{}", self.file_stem, date.format("%Y-%m-%d"), format.extension())
    }

    /// Pages of body lines, each at most `LINES_PER_PAGE` long, wrapped to
    /// `LINE_WIDTH`.
    pub fn pages(&self) -> Vec<Vec<String>> {
        let mut body = vec!["== Informations Générales ==".to_string()];
        for (label, value) in &self.info {
            body.extend(wrap(&format!("{}: {}", label, value), LINE_WIDTH));
        }
        for section in &self.sections {
            body.push(String::new());
            body.push(format!("== {} ==", section.title));
            for line in &section.lines {
                body.extend(wrap(line, LINE_WIDTH));
            }
        }
        body.chunks(LINES_PER_PAGE).map(|c| c.to_vec()).collect()
    }

    /// Title header on every page, `Page N` footer, pages separated by a
    /// form feed.
    pub fn render_text(&self) -> String {
        let pages = self.pages();
        let mut out = String::new();
        for (index, lines) in pages.iter().enumerate() {
            if index > 0 {
                out.push(PAGE_BREAK);
            }
            out.push_str(&center(&self.title, LINE_WIDTH));
            out.push_str("\n\n");
            for line in lines {
                out.push_str(line);
                out.push('\n');
            }
            out.push('\n');
            out.push_str(&center(&format!("Page {}", index + 1), LINE_WIDTH));
            out.push('\n');
        }
        out
    }
}

fn young_info(young: &Young) -> Vec<(String, String)> {
    vec![
        ("Jeune concerné".into(), young.display_name()),
        ("Date de naissance".into(), date_or_not_provided(young.birth_date)),
        ("Date d'entrée".into(), date_or_not_provided(young.entry_date)),
        (
            "Type de placement".into(),
            or_not_provided(young.placement_type.map(|p| p.as_str())),
        ),
    ]
}

fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn center(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        return text.to_string();
    }
    format!("{}{}", " ".repeat((width - len) / 2), text)
}

/// Greedy word wrap on character count. Words longer than `width` are kept
/// whole on their own line. An empty input gives one empty line.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() { 0 } else { current.chars().count() + 1 };
        if needed > 0 && needed + word.chars().count() > width {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    let indent: String = text.chars().take_while(|c| *c == ' ').collect();
    if !current.is_empty() || lines.is_empty() {
        lines.push(current);
    }
    if !indent.is_empty() {
        if let Some(first) = lines.first_mut() {
            first.insert_str(0, &indent);
        }
    }
    lines
}

/// A flat table such as the presence or meal summary of a period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub title: String,
    #[serde(skip)]
    pub file_stem: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn presence_summary(start: NaiveDate, end: NaiveDate, rows: &[PresenceSummaryRow]) -> Self {
        Self {
            title: format!("Présences du {} au {}", to_french(&start), to_french(&end)),
            file_stem: format!("Presences_{}_{}", start, end),
            headers: ["Jeune", "Présent", "Absent", "Permis famille", "Fugue", "Hôpital"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows: rows
                .iter()
                .map(|r| {
                    vec![
                        r.name.clone(),
                        r.present.to_string(),
                        r.absent.to_string(),
                        r.family_leave.to_string(),
                        r.runaway.to_string(),
                        r.hospital.to_string(),
                    ]
                })
                .collect(),
        }
    }

    /// One line per date and meal moment with the typed counts.
    pub fn meal_summary(start: NaiveDate, end: NaiveDate, summary: &BTreeMap<NaiveDate, MealCounts>) -> Self {
        let mut rows = Vec::new();
        for (date, counts) in summary {
            let moments = [
                ("Jeunes", "Midi", &counts.youngs.lunch),
                ("Jeunes", "Soir", &counts.youngs.dinner),
                ("Professionnels", "Midi", &counts.professionals.lunch),
                ("Professionnels", "Soir", &counts.professionals.dinner),
            ];
            for (who, moment, tally) in moments {
                rows.push(vec![
                    to_french(date),
                    who.to_string(),
                    moment.to_string(),
                    tally.normal.to_string(),
                    tally.no_pork.to_string(),
                    tally.vegetarian.to_string(),
                    tally.total.to_string(),
                ]);
            }
        }
        Self {
            title: format!("Repas du {} au {}", to_french(&start), to_french(&end)),
            file_stem: format!("Repas_{}_{}", start, end),
            headers: ["Date", "Convives", "Repas", "Normal", "Sans porc", "Végétarien", "Total"]
                .iter()
                .map(|h| h.to_string())
                .collect(),
            rows,
        }
    }

    pub fn default_file_name(&self, format: ExportFormat) -> String {
        format!("{}.{}", self.file_stem, format.extension())
    }
}

pub struct Exporter {
    format: ExportFormat,
    output_path: PathBuf,
}

impl Exporter {
    /// Without an explicit path the document's default file name is used in
    /// the current directory.
    pub fn for_document(format: ExportFormat, output_path: Option<PathBuf>, document: &Document) -> Self {
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(document.default_file_name(today(), format)));
        Self { format, output_path }
    }

    pub fn for_table(format: ExportFormat, output_path: Option<PathBuf>, table: &Table) -> Self {
        let output_path = output_path.unwrap_or_else(|| PathBuf::from(table.default_file_name(format)));
        Self { format, output_path }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn export(&self, document: &Document) -> Result<PathBuf> {
        match self.format {
            ExportFormat::Text => File::create(&self.output_path)?.write_all(document.render_text().as_bytes())?,
            ExportFormat::Csv => msg_bail_anyhow!(Message::ExportFormatUnsupported("csv".into())),
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(document)?;
                File::create(&self.output_path)?.write_all(json.as_bytes())?;
            }
            ExportFormat::Excel => self.export_excel(document)?,
        }
        tracing::info!(path = %self.output_path.display(), title = %document.title, "document exported");
        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(self.output_path.clone())
    }

    pub fn export_table(&self, table: &Table) -> Result<PathBuf> {
        match self.format {
            ExportFormat::Text => msg_bail_anyhow!(Message::ExportFormatUnsupported("text".into())),
            ExportFormat::Csv => {
                let mut wtr = csv::Writer::from_path(&self.output_path)?;
                wtr.write_record(&table.headers)?;
                for row in &table.rows {
                    wtr.write_record(row)?;
                }
                wtr.flush()?;
            }
            ExportFormat::Json => {
                let json = serde_json::to_string_pretty(table)?;
                File::create(&self.output_path)?.write_all(json.as_bytes())?;
            }
            ExportFormat::Excel => {
                let mut workbook = Workbook::new();
                let worksheet = workbook.add_worksheet();
                let header_format = Format::new().set_bold().set_background_color(Color::Gray);

                worksheet.write_string_with_format(0, 0, &table.title, &Format::new().set_bold())?;
                for (col, header) in table.headers.iter().enumerate() {
                    worksheet.write_string_with_format(2, col as u16, header, &header_format)?;
                }
                for (index, row) in table.rows.iter().enumerate() {
                    for (col, value) in row.iter().enumerate() {
                        let (r, c) = (index as u32 + 3, col as u16);
                        match value.parse::<f64>() {
                            Ok(number) => worksheet.write_number(r, c, number)?,
                            Err(_) => worksheet.write_string(r, c, value)?,
                        };
                    }
                }
                worksheet.autofit();
                workbook.save(&self.output_path)?;
            }
        }
        tracing::info!(path = %self.output_path.display(), rows = table.rows.len(), "table exported");
        msg_success!(Message::ExportCompleted(self.output_path.display().to_string()));
        Ok(self.output_path.clone())
    }

    fn export_excel(&self, document: &Document) -> Result<()> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();

        let title_format = Format::new().set_bold().set_font_size(15);
        let header_format = Format::new().set_bold().set_background_color(Color::Gray);
        let label_format = Format::new().set_bold();
        let wrap_format = Format::new().set_text_wrap();

        worksheet.write_string_with_format(0, 0, &document.title, &title_format)?;
        worksheet.write_string_with_format(2, 0, "Informations Générales", &header_format)?;

        let mut row = 3;
        for (label, value) in &document.info {
            worksheet.write_string_with_format(row, 0, label, &label_format)?;
            worksheet.write_string(row, 1, value)?;
            row += 1;
        }

        for section in &document.sections {
            row += 1;
            worksheet.write_string_with_format(row, 0, &section.title, &header_format)?;
            row += 1;
            for line in &section.lines {
                worksheet.write_string_with_format(row, 1, line, &wrap_format)?;
                row += 1;
            }
        }

        worksheet.set_column_width(0, 28)?;
        worksheet.set_column_width(1, 90)?;
        workbook.save(&self.output_path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_respects_width() {
        let lines = wrap("un deux trois quatre cinq", 10);
        assert_eq!(lines, vec!["un deux", "trois", "quatre", "cinq"]);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
    }

    #[test]
    fn wrap_keeps_blank_lines_and_indent() {
        assert_eq!(wrap("", 10), vec![String::new()]);
        assert_eq!(wrap("  - moyen", 40), vec!["  - moyen".to_string()]);
    }

    #[test]
    fn empty_section_is_marked() {
        assert_eq!(Section::text("Famille", Some("   ")).lines, vec![EMPTY_SECTION.to_string()]);
        assert_eq!(Section::text("Famille", None).lines, vec![EMPTY_SECTION.to_string()]);
    }

    #[test]
    fn pages_are_numbered_and_separated() {
        let document = Document {
            title: REPORT_TITLE.into(),
            file_stem: "Rapport_Paul_MARTIN".into(),
            info: Vec::new(),
            sections: vec![Section {
                title: "Accueil".into(),
                lines: (0..LINES_PER_PAGE).map(|i| format!("ligne {}", i)).collect(),
            }],
        };
        let text = document.render_text();
        assert_eq!(document.pages().len(), 2);
        assert_eq!(text.matches(PAGE_BREAK).count(), 1);
        assert!(text.contains("Page 1"));
        assert!(text.contains("Page 2"));
        assert_eq!(text.matches(REPORT_TITLE).count(), 2);
    }

    #[test]
    fn default_file_name_has_date_and_extension() {
        let document = Document {
            title: PROJET_TITLE.into(),
            file_stem: "Projet_Paul_MARTIN".into(),
            info: Vec::new(),
            sections: Vec::new(),
        };
        let date = NaiveDate::from_ymd_opt(2024, 3, 1).expect("date");
        assert_eq!(
            document.default_file_name(date, ExportFormat::Text),
            "Projet_Paul_MARTIN_2024-03-01.txt"
        );
    }

    #[test]
    fn capitalize_handles_accents() {
        assert_eq!(capitalize("éducatif"), "Éducatif");
        assert_eq!(capitalize(""), "");
    }
}
