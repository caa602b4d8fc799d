#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveDateTime};
    use mecs::db::db::Db;
    use mecs::db::error::StoreError;
    use mecs::db::events::{Event, Events};
    use mecs::db::services::{Service, Services};
    use mecs::db::tasks::{Task, Tasks};
    use mecs::db::tasks_hebdo::{WeeklyTask, WeeklyTasks};
    use mecs::db::users::{User, Users};
    use mecs::db::youngs::{Young, Youngs};
    use mecs::libs::agenda::Agenda;
    use mecs::libs::task::TaskFilter;
    use mecs::libs::vocabulary::{AdmissionStatus, EventType, PermissionLevel, TaskStatus, Weekday};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    /// Two services with one young each; Monday 2024-03-04 starts the week.
    struct AgendaTestContext {
        _temp_dir: TempDir,
        db: Db,
        service_a: i64,
        service_b: i64,
        paul: i64,
        lea: i64,
        educator: i64,
    }

    impl TestContext for AgendaTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("mecs.db")).unwrap();

            let service_a = Services::new(&db).insert(&Service::new("Pavillon A")).unwrap();
            let service_b = Services::new(&db).insert(&Service::new("Pavillon B")).unwrap();

            let mut user = User::new("Dupont", "Jean", "jdupont", PermissionLevel::Standard);
            user.service_id = Some(service_a);
            let educator = Users::new(&db).insert(&user, "secret").unwrap();

            let mut paul = Young::new("Martin", "Paul", AdmissionStatus::Admitted);
            paul.service_id = Some(service_a);
            let paul = Youngs::new(&db).insert(&paul).unwrap();
            let mut lea = Young::new("Roux", "Léa", AdmissionStatus::Admitted);
            lea.service_id = Some(service_b);
            let lea = Youngs::new(&db).insert(&lea).unwrap();

            AgendaTestContext {
                _temp_dir: temp_dir,
                db,
                service_a,
                service_b,
                paul,
                lea,
                educator,
            }
        }
    }

    fn at(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, day).unwrap()
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_event_crud_with_links(ctx: &mut AgendaTestContext) {
        let events = Events::new(&ctx.db);
        let mut event = Event::new("Rendez-vous orthodontiste", at(5, 10), at(5, 11));
        event.event_type = Some(EventType::Health);
        event.user_id = Some(ctx.educator);
        let id = events.insert(&event, &[ctx.paul]).unwrap();

        let (stored, young_ids) = events.get(id).unwrap().unwrap();
        assert_eq!(stored.name, "Rendez-vous orthodontiste");
        assert_eq!(stored.event_type, Some(EventType::Health));
        assert_eq!(young_ids, vec![ctx.paul]);

        events.update(id, &stored, &[ctx.paul, ctx.lea]).unwrap();
        let (_, young_ids) = events.get(id).unwrap().unwrap();
        assert_eq!(young_ids.len(), 2);

        assert_eq!(events.for_young(ctx.lea).unwrap().len(), 1);

        events.delete(id).unwrap();
        assert!(events.get(id).unwrap().is_none());
        assert!(events.for_young(ctx.paul).unwrap().is_empty());
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_event_end_before_start_is_rejected(ctx: &mut AgendaTestContext) {
        let event = Event::new("Sortie", at(6, 15), at(6, 14));
        let err = Events::new(&ctx.db).insert(&event, &[]).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { .. }));
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_period_service_filter(ctx: &mut AgendaTestContext) {
        let events = Events::new(&ctx.db);
        events.insert(&Event::new("Réunion d'équipe", at(4, 9), at(4, 10)), &[]).unwrap();
        events.insert(&Event::new("Audience Paul", at(5, 14), at(5, 15)), &[ctx.paul]).unwrap();
        events.insert(&Event::new("Visite Léa", at(6, 14), at(6, 15)), &[ctx.lea]).unwrap();
        events
            .insert(&Event::new("Sortie piscine", at(7, 14), at(7, 17)), &[ctx.paul, ctx.lea])
            .unwrap();
        events.insert(&Event::new("Semaine suivante", at(12, 9), at(12, 10)), &[]).unwrap();

        let all = events.for_period(date(4), date(10), None).unwrap();
        assert_eq!(all.len(), 4);

        let names = |service: i64| -> Vec<String> {
            events
                .for_period(date(4), date(10), Some(service))
                .unwrap()
                .into_iter()
                .map(|e| e.event.name)
                .collect()
        };
        assert_eq!(names(ctx.service_a), vec!["Réunion d'équipe", "Audience Paul", "Sortie piscine"]);
        assert_eq!(names(ctx.service_b), vec!["Réunion d'équipe", "Visite Léa", "Sortie piscine"]);

        let outing = all.iter().find(|e| e.event.name == "Sortie piscine").unwrap();
        assert_eq!(outing.young_names.len(), 2);
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_week_merges_weekly_tasks(ctx: &mut AgendaTestContext) {
        let weekly = WeeklyTasks::new(&ctx.db);
        weekly
            .insert(&WeeklyTask::new(Weekday::Wednesday, "Courses", ctx.service_a))
            .unwrap();
        weekly
            .insert(&WeeklyTask::new(Weekday::Friday, "Ménage des chambres", ctx.service_b))
            .unwrap();
        Events::new(&ctx.db)
            .insert(&Event::new("Audience Paul", at(6, 14), at(6, 15)), &[ctx.paul])
            .unwrap();
        Events::new(&ctx.db)
            .insert(&Event::new("Appel famille", at(6, 9), at(6, 10)), &[ctx.paul])
            .unwrap();

        // Thursday in the middle of the week
        let agenda = Agenda::week(&ctx.db, date(7), None, Some(ctx.service_a)).unwrap();
        assert_eq!(agenda.start, date(4));
        assert_eq!(agenda.end, date(10));
        assert_eq!(agenda.days.len(), 7);
        assert_eq!(agenda.event_count(), 2);

        let wednesday = &agenda.days[2];
        assert_eq!(wednesday.weekday, Weekday::Wednesday);
        assert_eq!(wednesday.weekly_tasks.len(), 1);
        assert_eq!(wednesday.events[0].event.name, "Appel famille");
        assert!(agenda.days[4].weekly_tasks.is_empty());

        let without_service = Agenda::day(&ctx.db, date(6), None, None).unwrap();
        assert!(without_service.weekly_tasks.is_empty());
        assert_eq!(without_service.events.len(), 2);
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_week_of_another_service(ctx: &mut AgendaTestContext) {
        WeeklyTasks::new(&ctx.db)
            .insert(&WeeklyTask::new(Weekday::Wednesday, "Courses", ctx.service_a))
            .unwrap();
        let events = Events::new(&ctx.db);
        events.insert(&Event::new("Audience Paul", at(6, 14), at(6, 15)), &[ctx.paul]).unwrap();
        events.insert(&Event::new("Visite Léa", at(6, 9), at(6, 10)), &[ctx.lea]).unwrap();

        // A Pavillon A educator looking at Pavillon B
        let agenda = Agenda::week(&ctx.db, date(6), Some(ctx.service_b), Some(ctx.service_a)).unwrap();
        let wednesday = &agenda.days[2];
        let names: Vec<&str> = wednesday.events.iter().map(|e| e.event.name.as_str()).collect();
        assert_eq!(names, vec!["Visite Léa"]);
        assert_eq!(wednesday.weekly_tasks.len(), 1);

        let listed = events.for_period(date(4), date(10), Some(ctx.service_b)).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].event.name, "Visite Léa");
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_weekly_task_crud(ctx: &mut AgendaTestContext) {
        let weekly = WeeklyTasks::new(&ctx.db);
        let id = weekly
            .insert(&WeeklyTask::new(Weekday::Sunday, "Préparer la semaine", ctx.service_a))
            .unwrap();
        weekly.insert(&WeeklyTask::new(Weekday::Monday, "Courses", ctx.service_a)).unwrap();

        let list = weekly.list(Some(ctx.service_a)).unwrap();
        assert_eq!(list[0].day, Weekday::Monday);
        assert_eq!(list[1].service_name.as_deref(), Some("Pavillon A"));

        weekly.update(id, Weekday::Saturday, "Préparer le week-end").unwrap();
        assert_eq!(weekly.for_day(Weekday::Saturday, ctx.service_a).unwrap().len(), 1);
        assert!(weekly.for_day(Weekday::Sunday, ctx.service_a).unwrap().is_empty());

        weekly.delete(id).unwrap();
        assert!(matches!(weekly.delete(id), Err(StoreError::NotFound { .. })));
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_task_status_is_derived(ctx: &mut AgendaTestContext) {
        let tasks = Tasks::new(&ctx.db);
        let today = date(4);
        let soon = tasks
            .insert(&Task::new("Dossier MDPH", Some(date(6)), Some(ctx.educator)), &[ctx.paul])
            .unwrap();
        let later = tasks.insert(&Task::new("Inscription collège", Some(date(20)), None), &[]).unwrap();
        let undated = tasks.insert(&Task::new("Ranger la lingerie", None, None), &[]).unwrap();

        let items = tasks.list(TaskFilter::default(), today).unwrap();
        let status = |id: i64| items.iter().find(|i| i.task.id == Some(id)).unwrap().status;
        assert_eq!(status(soon), TaskStatus::Urgent);
        assert_eq!(status(later), TaskStatus::Todo);
        assert_eq!(status(undated), TaskStatus::Todo);
        assert_eq!(items[0].task.id, Some(soon));
        assert_eq!(items[0].assignee, "Jean DUPONT");

        assert_eq!(tasks.urgent(None, today).unwrap().len(), 1);

        tasks.mark_done(soon).unwrap();
        assert!(tasks.urgent(None, today).unwrap().is_empty());
        assert_eq!(tasks.list(TaskFilter::default(), today).unwrap().len(), 2);
        let everything = TaskFilter {
            include_done: true,
            ..TaskFilter::default()
        };
        assert_eq!(tasks.list(everything, today).unwrap().len(), 3);

        tasks.unmark_done(soon).unwrap();
        let (task, young_ids) = tasks.get(soon).unwrap().unwrap();
        assert!(!task.is_done());
        assert_eq!(young_ids, vec![ctx.paul]);
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_task_service_filter(ctx: &mut AgendaTestContext) {
        let tasks = Tasks::new(&ctx.db);
        let mut other = User::new("Roux", "Marc", "mroux", PermissionLevel::Standard);
        other.service_id = Some(ctx.service_b);
        let other = Users::new(&ctx.db).insert(&other, "secret").unwrap();

        tasks.insert(&Task::new("Pour Jean", None, Some(ctx.educator)), &[]).unwrap();
        tasks.insert(&Task::new("Pour Marc", None, Some(other)), &[]).unwrap();
        tasks.insert(&Task::new("Pour tous", None, None), &[]).unwrap();

        let service_a = tasks.list(TaskFilter::for_service(Some(ctx.service_a)), date(4)).unwrap();
        let descriptions: Vec<&str> = service_a.iter().map(|i| i.task.description.as_str()).collect();
        assert_eq!(descriptions.len(), 2);
        assert!(descriptions.contains(&"Pour Jean"));
        assert!(descriptions.contains(&"Pour tous"));
    }

    #[test_context(AgendaTestContext)]
    #[test]
    fn test_task_update_and_delete(ctx: &mut AgendaTestContext) {
        let tasks = Tasks::new(&ctx.db);
        let id = tasks.insert(&Task::new("Appeler l'école", None, None), &[ctx.paul]).unwrap();

        let (mut task, _) = tasks.get(id).unwrap().unwrap();
        task.due_date = Some(date(8));
        tasks.update(id, &task, &[]).unwrap();

        let (stored, young_ids) = tasks.get(id).unwrap().unwrap();
        assert_eq!(stored.due_date, Some(date(8)));
        assert!(young_ids.is_empty());

        tasks.delete(id).unwrap();
        assert!(tasks.get(id).unwrap().is_none());
        assert!(matches!(tasks.mark_done(id), Err(StoreError::NotFound { .. })));
    }
}
