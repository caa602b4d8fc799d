#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mecs::db::daily_life::{DailyLife, PresenceEntry};
    use mecs::db::db::Db;
    use mecs::db::projets::{Objective, Projet, Projets};
    use mecs::db::reports::{Report, Reports};
    use mecs::db::users::{User, Users};
    use mecs::db::youngs::{Young, Youngs};
    use mecs::libs::export::{Document, ExportFormat, Exporter, Table, EMPTY_SECTION, PROJET_TITLE, REPORT_TITLE};
    use mecs::libs::vocabulary::{AdmissionStatus, MealType, ObjectiveCategory, PermissionLevel, PresenceStatus, ReportType};
    use std::fs;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct ExportTestContext {
        temp_dir: TempDir,
        db: Db,
        author: i64,
        paul: i64,
    }

    impl TestContext for ExportTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("mecs.db")).unwrap();
            let author = Users::new(&db)
                .insert(&User::new("Dupont", "Jean", "jdupont", PermissionLevel::Administrative), "secret")
                .unwrap();
            let mut paul = Young::new("Martin", "Paul", AdmissionStatus::Admitted);
            paul.birth_date = NaiveDate::from_ymd_opt(2009, 4, 12);
            let paul = Youngs::new(&db).insert(&paul).unwrap();
            ExportTestContext {
                temp_dir,
                db,
                author,
                paul,
            }
        }
    }

    fn report(ctx: &ExportTestContext, validated: bool) -> i64 {
        let reports = Reports::new(&ctx.db);
        let mut report = Report::new(ReportType::Synthesis, ctx.paul, ctx.author);
        report.sections.situation = Some("Accueilli depuis septembre.\nScolarisé en 4e.".into());
        let id = reports.insert(&report).unwrap();
        if validated {
            reports
                .validate(id, ctx.author, NaiveDate::from_ymd_opt(2024, 3, 15).unwrap())
                .unwrap();
        }
        id
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_pending_report_cannot_be_exported(ctx: &mut ExportTestContext) {
        let id = report(ctx, false);
        let details = Reports::new(&ctx.db).details(id).unwrap().unwrap();
        assert!(Document::report(&details).is_err());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_report_document_content(ctx: &mut ExportTestContext) {
        let id = report(ctx, true);
        let details = Reports::new(&ctx.db).details(id).unwrap().unwrap();
        let document = Document::report(&details).unwrap();

        assert_eq!(document.title, REPORT_TITLE);
        assert_eq!(document.file_stem, "Rapport_Paul_MARTIN");
        assert_eq!(document.sections.len(), 7);
        assert_eq!(document.sections[0].lines.len(), 2);
        assert_eq!(document.sections[1].lines, vec![EMPTY_SECTION.to_string()]);
        assert!(document
            .info
            .contains(&("Date de validation".to_string(), "15-03-2024".to_string())));
        assert!(document
            .info
            .contains(&("Date de naissance".to_string(), "12-04-2009".to_string())));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_report_export_formats(ctx: &mut ExportTestContext) {
        let id = report(ctx, true);
        let details = Reports::new(&ctx.db).details(id).unwrap().unwrap();
        let document = Document::report(&details).unwrap();

        let text_path = ctx.temp_dir.path().join("rapport.txt");
        Exporter::for_document(ExportFormat::Text, Some(text_path.clone()), &document)
            .export(&document)
            .unwrap();
        let text = fs::read_to_string(&text_path).unwrap();
        assert!(text.contains(REPORT_TITLE));
        assert!(text.contains("== Rappel de la situation =="));
        assert!(text.contains("Page 1"));

        let json_path = ctx.temp_dir.path().join("rapport.json");
        Exporter::for_document(ExportFormat::Json, Some(json_path.clone()), &document)
            .export(&document)
            .unwrap();
        let json: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(json["title"], REPORT_TITLE);
        assert_eq!(json["sections"].as_array().unwrap().len(), 7);

        let excel_path = ctx.temp_dir.path().join("rapport.xlsx");
        Exporter::for_document(ExportFormat::Excel, Some(excel_path.clone()), &document)
            .export(&document)
            .unwrap();
        assert!(fs::metadata(&excel_path).unwrap().len() > 0);

        let csv_path = ctx.temp_dir.path().join("rapport.csv");
        assert!(Exporter::for_document(ExportFormat::Csv, Some(csv_path.clone()), &document)
            .export(&document)
            .is_err());
        assert!(!csv_path.exists());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_projet_document(ctx: &mut ExportTestContext) {
        let projets = Projets::new(&ctx.db);
        let mut objective = Objective::new("Reprendre le sport", Some(ObjectiveCategory::Outing), &["Club de foot"]);
        objective.evaluation = Some("Inscrit en octobre".into());
        projets
            .save(&Projet::new(ctx.paul, NaiveDate::from_ymd_opt(2024, 2, 1).unwrap()), &[objective])
            .unwrap();
        let details = projets.for_young(ctx.paul).unwrap().unwrap();
        let document = Document::projet(&details);

        assert_eq!(document.title, PROJET_TITLE);
        assert!(document
            .info
            .contains(&("Prochain projet".to_string(), "01-02-2025".to_string())));
        let objectives = document.sections.last().unwrap();
        assert_eq!(objectives.title, "Objectifs");
        assert!(objectives.lines.contains(&"Catégorie : Activités extérieures".to_string()));
        assert!(objectives.lines.contains(&"  - Club de foot".to_string()));
        assert!(objectives.lines.contains(&"Inscrit en octobre".to_string()));
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_presence_summary_table(ctx: &mut ExportTestContext) {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        let daily = DailyLife::new(&ctx.db);
        daily
            .save_day_presence(
                start,
                &[PresenceEntry {
                    young_id: ctx.paul,
                    status: PresenceStatus::Runaway,
                    lunch: MealType::Normal,
                    dinner: MealType::Normal,
                }],
            )
            .unwrap();
        let table = Table::presence_summary(start, end, &daily.presence_summary(start, end, None).unwrap());
        assert_eq!(table.headers.len(), 6);
        assert_eq!(table.rows, vec![vec!["Paul MARTIN", "0", "0", "0", "1", "0"]]);

        let csv_path = ctx.temp_dir.path().join("presences.csv");
        Exporter::for_table(ExportFormat::Csv, Some(csv_path.clone()), &table)
            .export_table(&table)
            .unwrap();
        let csv = fs::read_to_string(&csv_path).unwrap();
        let mut lines = csv.lines();
        assert_eq!(lines.next(), Some("Jeune,Présent,Absent,Permis famille,Fugue,Hôpital"));
        assert_eq!(lines.next(), Some("Paul MARTIN,0,0,0,1,0"));

        let text_path = ctx.temp_dir.path().join("presences.txt");
        assert!(Exporter::for_table(ExportFormat::Text, Some(text_path), &table)
            .export_table(&table)
            .is_err());
    }

    #[test_context(ExportTestContext)]
    #[test]
    fn test_meal_summary_table(ctx: &mut ExportTestContext) {
        let start = NaiveDate::from_ymd_opt(2024, 3, 4).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let summary = DailyLife::new(&ctx.db).weekly_meal_summary(start, end, None).unwrap();
        let table = Table::meal_summary(start, end, &summary);
        // Two days, four moments each
        assert_eq!(table.rows.len(), 8);

        let path = ctx.temp_dir.path().join("repas.xlsx");
        Exporter::for_table(ExportFormat::Excel, Some(path.clone()), &table)
            .export_table(&table)
            .unwrap();
        assert!(path.exists());
    }
}
