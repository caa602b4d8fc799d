#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use mecs::db::daily_life::{DailyLife, PresenceEntry, ProfessionalMealEntry};
    use mecs::db::db::Db;
    use mecs::db::services::{Service, Services};
    use mecs::db::users::{User, Users};
    use mecs::db::youngs::{Young, Youngs};
    use mecs::libs::vocabulary::{AdmissionStatus, MealType, PermissionLevel, PresenceStatus};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct DailyTestContext {
        _temp_dir: TempDir,
        db: Db,
        service_id: i64,
        youngs: Vec<i64>,
        staff: Vec<i64>,
    }

    impl TestContext for DailyTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("mecs.db")).unwrap();
            let service_id = Services::new(&db).insert(&Service::new("Pavillon A")).unwrap();

            let youngs = [("Martin", "Paul"), ("Roux", "Léa"), ("Bernard", "Hugo"), ("Petit", "Inès")]
                .iter()
                .map(|(last, first)| {
                    let mut young = Young::new(last, first, AdmissionStatus::Admitted);
                    young.service_id = Some(service_id);
                    Youngs::new(&db).insert(&young).unwrap()
                })
                .collect();
            let staff = [("Dupont", "Jean", "jdupont"), ("Leroy", "Anne", "aleroy")]
                .iter()
                .map(|(last, first, login)| {
                    let mut user = User::new(last, first, login, PermissionLevel::Standard);
                    user.service_id = Some(service_id);
                    Users::new(&db).insert(&user, "secret").unwrap()
                })
                .collect();

            DailyTestContext {
                _temp_dir: temp_dir,
                db,
                service_id,
                youngs,
                staff,
            }
        }
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    fn entry(young_id: i64, status: PresenceStatus, lunch: MealType, dinner: MealType) -> PresenceEntry {
        PresenceEntry {
            young_id,
            status,
            lunch,
            dinner,
        }
    }

    #[test]
    fn test_end_to_end_service_filter() {
        let temp_dir = tempfile::tempdir().unwrap();
        let db = Db::open(temp_dir.path().join("scenario.db")).unwrap();

        let pavillon_a = Services::new(&db).insert(&Service::new("Pavillon A")).unwrap();
        Services::new(&db).insert(&Service::new("Pavillon B")).unwrap();

        let mut jean = User::new("Dupont", "Jean", "jdupont", PermissionLevel::Standard);
        jean.service_id = Some(pavillon_a);
        let jean = Users::new(&db).insert(&jean, "secret").unwrap();

        let mut paul = Young::new("Martin", "Paul", AdmissionStatus::Admitted);
        paul.referent_id = Some(jean);
        paul.service_id = Some(pavillon_a);
        Youngs::new(&db).insert(&paul).unwrap();
        Youngs::new(&db)
            .insert(&Young::new("Roux", "Léa", AdmissionStatus::Pending))
            .unwrap();

        let service_id = Services::new(&db).get_by_name("Pavillon A").unwrap().unwrap().id;
        let listed = Youngs::new(&db).list(service_id).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].display_name(), "Paul MARTIN");
        assert_eq!(listed[0].referent_name.as_deref(), Some("Jean DUPONT"));
        assert_eq!(listed[0].service_name.as_deref(), Some("Pavillon A"));
    }

    #[test_context(DailyTestContext)]
    #[test]
    fn test_presence_defaults_and_upsert(ctx: &mut DailyTestContext) {
        let daily = DailyLife::new(&ctx.db);

        let rows = daily.presence_for_date(date(4), Some(ctx.service_id)).unwrap();
        assert_eq!(rows.len(), 4);
        assert!(rows.iter().all(|r| !r.recorded));
        assert!(rows.iter().all(|r| r.entry == PresenceEntry::default_for(r.entry.young_id)));

        let paul = ctx.youngs[0];
        daily
            .save_day_presence(date(4), &[entry(paul, PresenceStatus::Hospital, MealType::Normal, MealType::Normal)])
            .unwrap();
        daily
            .save_day_presence(
                date(4),
                &[entry(paul, PresenceStatus::PresentLunch, MealType::Vegetarian, MealType::Normal)],
            )
            .unwrap();

        let rows = daily.presence_for_date(date(4), None).unwrap();
        let saved = rows.iter().find(|r| r.entry.young_id == paul).unwrap();
        assert!(saved.recorded);
        assert_eq!(saved.entry.status, PresenceStatus::PresentLunch);
        assert_eq!(saved.entry.lunch, MealType::Vegetarian);
        // Dinner is ruled out by a midday-only presence
        assert_eq!(saved.entry.dinner, MealType::NoMeal);

        assert!(daily.presence_for_date(date(5), None).unwrap().iter().all(|r| !r.recorded));
    }

    #[test_context(DailyTestContext)]
    #[test]
    fn test_exited_youngs_are_not_listed(ctx: &mut DailyTestContext) {
        let youngs = Youngs::new(&ctx.db);
        let mut hugo = youngs.get(ctx.youngs[2]).unwrap().unwrap();
        hugo.admission_status = AdmissionStatus::Exited;
        youngs.update(ctx.youngs[2], &hugo).unwrap();

        let daily = DailyLife::new(&ctx.db);
        assert_eq!(daily.presence_for_date(date(4), None).unwrap().len(), 3);
        assert_eq!(daily.presence_summary(date(4), date(10), None).unwrap().len(), 3);
    }

    #[test_context(DailyTestContext)]
    #[test]
    fn test_meal_counts_for_date(ctx: &mut DailyTestContext) {
        let daily = DailyLife::new(&ctx.db);
        let [paul, lea, hugo, ines] = [ctx.youngs[0], ctx.youngs[1], ctx.youngs[2], ctx.youngs[3]];
        daily
            .save_day_presence(
                date(4),
                &[
                    entry(paul, PresenceStatus::PresentDay, MealType::Normal, MealType::Normal),
                    entry(lea, PresenceStatus::PresentDay, MealType::NoPork, MealType::NoPork),
                    entry(hugo, PresenceStatus::PresentDay, MealType::Vegetarian, MealType::Normal),
                    entry(ines, PresenceStatus::PresentDay, MealType::Normal, MealType::NoMeal),
                ],
            )
            .unwrap();
        daily
            .save_professional_meals(
                date(4),
                &[
                    ProfessionalMealEntry {
                        user_id: ctx.staff[0],
                        lunch: MealType::Normal,
                        dinner: MealType::NoMeal,
                    },
                    ProfessionalMealEntry {
                        user_id: ctx.staff[1],
                        lunch: MealType::Vegetarian,
                        dinner: MealType::Vegetarian,
                    },
                ],
            )
            .unwrap();

        let counts = daily.meal_counts_for_date(date(4), Some(ctx.service_id)).unwrap();
        let lunch = counts.youngs.lunch;
        assert_eq!((lunch.normal, lunch.no_pork, lunch.vegetarian), (2, 1, 1));
        assert_eq!(lunch.total, 4);
        assert_eq!(lunch.total, lunch.normal + lunch.no_pork + lunch.vegetarian);
        let dinner = counts.youngs.dinner;
        assert_eq!((dinner.normal, dinner.no_pork, dinner.vegetarian, dinner.total), (2, 1, 0, 3));

        assert_eq!(counts.professionals.lunch.total, 2);
        assert_eq!(counts.professionals.dinner.vegetarian, 1);
        assert_eq!(counts.lunch_total(), 6);
        assert_eq!(counts.dinner_total(), 4);

        let empty = daily.meal_counts_for_date(date(5), None).unwrap();
        assert_eq!(empty.lunch_total() + empty.dinner_total(), 0);
    }

    #[test_context(DailyTestContext)]
    #[test]
    fn test_weekly_meal_summary(ctx: &mut DailyTestContext) {
        let daily = DailyLife::new(&ctx.db);
        let paul = ctx.youngs[0];
        for day in [4, 6] {
            daily
                .save_day_presence(
                    date(day),
                    &[entry(paul, PresenceStatus::PresentDay, MealType::Normal, MealType::Normal)],
                )
                .unwrap();
        }

        let summary = daily.weekly_meal_summary(date(4), date(10), None).unwrap();
        assert_eq!(summary.len(), 7);
        assert_eq!(summary[&date(4)].youngs.lunch.total, 1);
        assert_eq!(summary[&date(5)].youngs.lunch.total, 0);
        assert_eq!(summary[&date(6)].youngs.dinner.normal, 1);
    }

    #[test_context(DailyTestContext)]
    #[test]
    fn test_presence_summary_merges_present_statuses(ctx: &mut DailyTestContext) {
        let daily = DailyLife::new(&ctx.db);
        let paul = ctx.youngs[0];
        let statuses = [
            (4, PresenceStatus::PresentDay),
            (5, PresenceStatus::PresentLunch),
            (6, PresenceStatus::PresentEvening),
            (7, PresenceStatus::FamilyLeave),
            (8, PresenceStatus::Runaway),
            (9, PresenceStatus::AbsentDay),
        ];
        for (day, status) in statuses {
            daily
                .save_day_presence(date(day), &[entry(paul, status, MealType::Normal, MealType::Normal)])
                .unwrap();
        }
        // Outside the period
        daily
            .save_day_presence(date(11), &[entry(paul, PresenceStatus::Hospital, MealType::Normal, MealType::Normal)])
            .unwrap();

        let summary = daily.presence_summary(date(4), date(10), Some(ctx.service_id)).unwrap();
        assert_eq!(summary.len(), 4);
        let row = summary.iter().find(|r| r.young_id == paul).unwrap();
        assert_eq!(row.name, "Paul MARTIN");
        assert_eq!(row.present, 3);
        assert_eq!(row.family_leave, 1);
        assert_eq!(row.runaway, 1);
        assert_eq!(row.absent, 1);
        assert_eq!(row.hospital, 0);
        assert_eq!(row.recorded_days(), 6);

        let lea = summary.iter().find(|r| r.young_id == ctx.youngs[1]).unwrap();
        assert_eq!(lea.recorded_days(), 0);
    }

    #[test_context(DailyTestContext)]
    #[test]
    fn test_professional_meals_default_then_saved(ctx: &mut DailyTestContext) {
        let daily = DailyLife::new(&ctx.db);
        let rows = daily.professional_meals_for_date(date(4), Some(ctx.service_id)).unwrap();
        assert_eq!(rows.len(), 2);
        assert!(rows.iter().all(|r| !r.recorded && r.entry.lunch == MealType::NoMeal));

        daily
            .save_professional_meals(
                date(4),
                &[ProfessionalMealEntry {
                    user_id: ctx.staff[0],
                    lunch: MealType::NoMeal,
                    dinner: MealType::NoPork,
                }],
            )
            .unwrap();
        let rows = daily.professional_meals_for_date(date(4), None).unwrap();
        let jean = rows.iter().find(|r| r.entry.user_id == ctx.staff[0]).unwrap();
        assert!(jean.recorded);
        assert_eq!(jean.entry.dinner, MealType::NoPork);
        assert_eq!(jean.name, "Jean DUPONT");
    }
}
