#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mecs::db::db::Db;
    use mecs::db::error::StoreError;
    use mecs::db::projets::{Objective, Projet, Projets};
    use mecs::db::reports::{Report, ReportSections, Reports};
    use mecs::db::services::{Service, Services};
    use mecs::db::transmissions::{Transmission, Transmissions, GENERAL};
    use mecs::db::users::{User, Users};
    use mecs::db::youngs::{Young, Youngs};
    use mecs::libs::vocabulary::{
        AdmissionStatus, Importance, ObjectiveCategory, PermissionLevel, ReportStatus, ReportType, TransmissionCategory,
    };
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct RecordsTestContext {
        _temp_dir: TempDir,
        db: Db,
        service_id: i64,
        author: i64,
        director: i64,
        paul: i64,
    }

    impl TestContext for RecordsTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("mecs.db")).unwrap();
            let service_id = Services::new(&db).insert(&Service::new("Pavillon A")).unwrap();

            let users = Users::new(&db);
            let mut author = User::new("Dupont", "Jean", "jdupont", PermissionLevel::Standard);
            author.service_id = Some(service_id);
            let author = users.insert(&author, "secret").unwrap();
            let director = users
                .insert(&User::new("Leroy", "Anne", "aleroy", PermissionLevel::Administrative), "secret")
                .unwrap();

            let mut paul = Young::new("Martin", "Paul", AdmissionStatus::Admitted);
            paul.service_id = Some(service_id);
            let paul = Youngs::new(&db).insert(&paul).unwrap();

            RecordsTestContext {
                _temp_dir: temp_dir,
                db,
                service_id,
                author,
                director,
                paul,
            }
        }
    }

    fn date(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, month, day).unwrap()
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_transmissions_latest_and_by_young(ctx: &mut RecordsTestContext) {
        let transmissions = Transmissions::new(&ctx.db);
        for hour in 8..12 {
            let written_at = date(3, 4).and_hms_opt(hour, 0, 0).unwrap();
            let mut note = Transmission::new(ctx.service_id, ctx.author, written_at, &format!("Note de {}h", hour));
            note.category = Some(TransmissionCategory::DailyLife);
            let young_ids = if hour == 9 { vec![ctx.paul] } else { vec![] };
            transmissions.insert(&note, &young_ids).unwrap();
        }

        let latest = transmissions.latest(2, None).unwrap();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].transmission.content, "Note de 11h");
        assert_eq!(latest[0].concerned(), GENERAL);
        assert_eq!(latest[0].author_name, "Jean DUPONT");
        assert_eq!(latest[0].service_name, "Pavillon A");

        let for_paul = transmissions.for_young(ctx.paul).unwrap();
        assert_eq!(for_paul.len(), 1);
        assert_eq!(for_paul[0].concerned(), "Paul MARTIN");

        assert_eq!(transmissions.for_period(date(3, 4), date(3, 4), Some(ctx.service_id)).unwrap().len(), 4);
        assert!(transmissions.for_period(date(3, 5), date(3, 10), None).unwrap().is_empty());
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_concerned_youngs_use_display_names(ctx: &mut RecordsTestContext) {
        let zoe = Youngs::new(&ctx.db)
            .insert(&Young::new("Émond", "Zoé", AdmissionStatus::Admitted))
            .unwrap();
        let transmissions = Transmissions::new(&ctx.db);
        let written_at = date(3, 4).and_hms_opt(18, 0, 0).unwrap();
        transmissions
            .insert(&Transmission::new(ctx.service_id, ctx.author, written_at, "Retour de week-end"), &[zoe, ctx.paul])
            .unwrap();

        let latest = transmissions.latest(1, None).unwrap();
        let paul = Youngs::new(&ctx.db).get(ctx.paul).unwrap().unwrap();
        assert_eq!(latest[0].young_names, vec!["Zoé ÉMOND".to_string(), paul.display_name()]);
        assert_eq!(latest[0].concerned(), "Zoé ÉMOND, Paul MARTIN");
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_transmission_update_and_delete(ctx: &mut RecordsTestContext) {
        let transmissions = Transmissions::new(&ctx.db);
        let written_at = date(3, 4).and_hms_opt(20, 30, 0).unwrap();
        let id = transmissions
            .insert(&Transmission::new(ctx.service_id, ctx.author, written_at, "Fugue signalée"), &[])
            .unwrap();

        let (mut note, _) = transmissions.get(id).unwrap().unwrap();
        assert_eq!(note.importance, Importance::Normal);
        note.importance = Importance::Urgent;
        transmissions.update(id, &note, &[ctx.paul]).unwrap();

        let (stored, young_ids) = transmissions.get(id).unwrap().unwrap();
        assert_eq!(stored.importance, Importance::Urgent);
        assert_eq!(young_ids, vec![ctx.paul]);

        transmissions.delete(id).unwrap();
        assert!(transmissions.get(id).unwrap().is_none());
        assert!(matches!(transmissions.delete(id), Err(StoreError::NotFound { .. })));
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_report_validated_once(ctx: &mut RecordsTestContext) {
        let reports = Reports::new(&ctx.db);
        let mut report = Report::new(ReportType::Synthesis, ctx.paul, ctx.author);
        report.sections.situation = Some("Accueilli depuis septembre.".into());
        let id = reports.insert(&report).unwrap();

        let draft = reports.get(id).unwrap().unwrap();
        assert_eq!(draft.status, ReportStatus::Pending);
        assert_eq!(draft.written_on, None);
        assert_eq!(draft.validator_id, None);

        assert!(reports.validate(id, ctx.director, date(3, 15)).unwrap());
        let validated = reports.get(id).unwrap().unwrap();
        assert_eq!(validated.status, ReportStatus::Validated);
        assert_eq!(validated.written_on, Some(date(3, 15)));
        assert_eq!(validated.validator_id, Some(ctx.director));

        assert!(!reports.validate(id, ctx.author, date(3, 20)).unwrap());
        let unchanged = reports.get(id).unwrap().unwrap();
        assert_eq!(unchanged.written_on, Some(date(3, 15)));
        assert_eq!(unchanged.validator_id, Some(ctx.director));

        assert!(matches!(reports.validate(id + 100, ctx.director, date(3, 15)), Err(StoreError::NotFound { .. })));
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_report_update_keeps_status(ctx: &mut RecordsTestContext) {
        let reports = Reports::new(&ctx.db);
        let id = reports.insert(&Report::new(ReportType::Evaluation72h, ctx.paul, ctx.author)).unwrap();
        reports.validate(id, ctx.director, date(3, 15)).unwrap();

        let sections = ReportSections {
            health: Some("Suivi orthophonie.".into()),
            ..ReportSections::default()
        };
        reports.update(id, ReportType::Synthesis, &sections).unwrap();

        let details = reports.details(id).unwrap().unwrap();
        assert_eq!(details.report.report_type, ReportType::Synthesis);
        assert_eq!(details.report.sections.health.as_deref(), Some("Suivi orthophonie."));
        assert!(details.report.is_validated());
        assert_eq!(details.author_name, "Jean DUPONT");
        assert_eq!(details.validator_name.as_deref(), Some("Anne LEROY"));
        assert_eq!(details.young.display_name(), "Paul MARTIN");

        let listed = reports.list(Some(ctx.paul)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].young_name, "Paul MARTIN");

        reports.delete(id).unwrap();
        assert!(reports.details(id).unwrap().is_none());
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_projet_round_trip(ctx: &mut RecordsTestContext) {
        let projets = Projets::new(&ctx.db);
        let mut projet = Projet::new(ctx.paul, date(2, 1));
        projet.young_expectations = Some("Passer le brevet".into());
        let objectives = vec![
            Objective::new(
                "Stabiliser la scolarité",
                Some(ObjectiveCategory::School),
                &["Aide aux devoirs", "Lien avec le professeur principal"],
            ),
            Objective::new(
                "Renouer avec la mère",
                Some(ObjectiveCategory::Family),
                &["Visites médiatisées", "Appels hebdomadaires"],
            ),
        ];
        let id = projets.save(&projet, &objectives).unwrap();

        let details = projets.for_young(ctx.paul).unwrap().unwrap();
        assert_eq!(details.projet.id, Some(id));
        assert_eq!(details.projet.young_expectations.as_deref(), Some("Passer le brevet"));
        assert_eq!(details.projet.next_project_date(), date(2, 1) + chrono::Duration::days(366));
        assert_eq!(details.objectives.len(), 2);
        for (stored, expected) in details.objectives.iter().zip(&objectives) {
            assert_eq!(stored.text, expected.text);
            assert_eq!(stored.category, expected.category);
            assert_eq!(stored.means, expected.means);
        }
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_projet_resave_replaces_objectives(ctx: &mut RecordsTestContext) {
        let projets = Projets::new(&ctx.db);
        let id = projets
            .save(
                &Projet::new(ctx.paul, date(2, 1)),
                &[Objective::new("Premier", None, &["a", "b"])],
            )
            .unwrap();

        let mut projet = projets.get(id).unwrap().unwrap().projet;
        projet.situation = Some("Mise à jour".into());
        let mut kept = Objective::new("Second", Some(ObjectiveCategory::Health), &["  ", "Bilan"]);
        kept.evaluation = Some("En cours".into());
        projets.save(&projet, &[kept, Objective::new("   ", None, &[])]).unwrap();

        let details = projets.get(id).unwrap().unwrap();
        assert_eq!(details.projet.situation.as_deref(), Some("Mise à jour"));
        assert_eq!(details.objectives.len(), 1);
        assert_eq!(details.objectives[0].text, "Second");
        assert_eq!(details.objectives[0].evaluation.as_deref(), Some("En cours"));
        assert_eq!(details.objectives[0].means, vec!["Bilan".to_string()]);
        assert_eq!(projets.list().unwrap().len(), 1);
    }

    #[test_context(RecordsTestContext)]
    #[test]
    fn test_one_projet_per_young(ctx: &mut RecordsTestContext) {
        let projets = Projets::new(&ctx.db);
        let id = projets.save(&Projet::new(ctx.paul, date(2, 1)), &[]).unwrap();
        let err = projets.save(&Projet::new(ctx.paul, date(3, 1)), &[]).unwrap_err();
        assert!(err.is_duplicate_of("projet_p.young_id"), "{:?}", err);

        projets.delete(id).unwrap();
        assert!(projets.for_young(ctx.paul).unwrap().is_none());
    }
}
