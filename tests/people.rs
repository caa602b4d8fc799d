#[cfg(test)]
mod tests {
    use mecs::db::contacts::{Contact, Contacts};
    use mecs::db::db::Db;
    use mecs::db::error::StoreError;
    use mecs::db::services::{Service, Services};
    use mecs::db::users::{User, Users};
    use mecs::db::youngs::{Young, Youngs};
    use mecs::libs::auth::{check_user, ensure_admin, DEFAULT_ADMIN_LOGIN, DEFAULT_ADMIN_PASSWORD};
    use mecs::libs::vocabulary::{AdmissionStatus, PermissionLevel, PlacementType};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct PeopleTestContext {
        _temp_dir: TempDir,
        db: Db,
    }

    impl TestContext for PeopleTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("mecs.db")).unwrap();
            PeopleTestContext { _temp_dir: temp_dir, db }
        }
    }

    fn staff(db: &Db, login: &str, service_id: Option<i64>) -> i64 {
        let mut user = User::new("Durand", "Claire", login, PermissionLevel::Standard);
        user.service_id = service_id;
        Users::new(db).insert(&user, "secret").unwrap()
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_service_crud(ctx: &mut PeopleTestContext) {
        let services = Services::new(&ctx.db);
        let id = services.insert(&Service::new("Pavillon A")).unwrap();

        let mut service = services.get(id).unwrap().unwrap();
        assert_eq!(service.name, "Pavillon A");

        service.phone = Some("01 23 45 67 89".into());
        services.update(id, &service).unwrap();
        assert_eq!(services.get(id).unwrap().unwrap().phone.as_deref(), Some("01 23 45 67 89"));
        assert_eq!(services.get_by_name("Pavillon A").unwrap().unwrap().id, Some(id));

        services.delete(id).unwrap();
        assert!(services.get(id).unwrap().is_none());
        assert!(matches!(services.delete(id), Err(StoreError::NotFound { .. })));
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_duplicate_service_name(ctx: &mut PeopleTestContext) {
        let services = Services::new(&ctx.db);
        services.insert(&Service::new("Pavillon A")).unwrap();
        let err = services.insert(&Service::new("Pavillon A")).unwrap_err();
        assert!(err.is_duplicate_of("services.nom_service"), "{:?}", err);
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_service_delete_detaches_members(ctx: &mut PeopleTestContext) {
        let service_id = Services::new(&ctx.db).insert(&Service::new("Pavillon B")).unwrap();
        let user_id = staff(&ctx.db, "cdurand", Some(service_id));
        let mut young = Young::new("Martin", "Paul", AdmissionStatus::Admitted);
        young.service_id = Some(service_id);
        let young_id = Youngs::new(&ctx.db).insert(&young).unwrap();

        Services::new(&ctx.db).delete(service_id).unwrap();

        let user = Users::new(&ctx.db).get(user_id).unwrap().unwrap();
        assert_eq!(user.service_id, None);
        assert_eq!(user.service_name.as_deref(), Some("N/A"));
        assert_eq!(Youngs::new(&ctx.db).get(young_id).unwrap().unwrap().service_id, None);
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_user_crud_and_password(ctx: &mut PeopleTestContext) {
        let users = Users::new(&ctx.db);
        let id = staff(&ctx.db, "cdurand", None);

        assert!(check_user(&ctx.db, "cdurand", "secret").unwrap().is_some());
        assert!(check_user(&ctx.db, "cdurand", "wrong").unwrap().is_none());
        assert!(check_user(&ctx.db, "nobody", "secret").unwrap().is_none());

        let mut user = users.get(id).unwrap().unwrap();
        user.phone = Some("06 00 00 00 00".into());
        users.update(id, &user, None).unwrap();
        assert!(check_user(&ctx.db, "cdurand", "secret").unwrap().is_some());

        users.update(id, &user, Some("changed")).unwrap();
        assert!(check_user(&ctx.db, "cdurand", "secret").unwrap().is_none());
        assert!(check_user(&ctx.db, "cdurand", "changed").unwrap().is_some());

        users.delete(id).unwrap();
        assert!(users.get(id).unwrap().is_none());
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_duplicate_login_and_email(ctx: &mut PeopleTestContext) {
        let users = Users::new(&ctx.db);
        let mut first = User::new("Durand", "Claire", "cdurand", PermissionLevel::Standard);
        first.email = Some("claire@mecs.fr".into());
        users.insert(&first, "secret").unwrap();

        let err = users
            .insert(&User::new("Durand", "Marc", "cdurand", PermissionLevel::Standard), "secret")
            .unwrap_err();
        assert!(err.is_duplicate_of("users.identifiant"), "{:?}", err);

        let mut second = User::new("Petit", "Marc", "mpetit", PermissionLevel::Standard);
        second.email = Some("claire@mecs.fr".into());
        let err = users.insert(&second, "secret").unwrap_err();
        assert!(err.is_duplicate_of("users.email"), "{:?}", err);

        // Blank e-mails never collide
        let mut blank_a = User::new("A", "A", "a", PermissionLevel::Standard);
        blank_a.email = Some("  ".into());
        let mut blank_b = User::new("B", "B", "b", PermissionLevel::Standard);
        blank_b.email = Some(String::new());
        users.insert(&blank_a, "x").unwrap();
        users.insert(&blank_b, "x").unwrap();
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_bootstrap_admin(ctx: &mut PeopleTestContext) {
        assert!(ensure_admin(&ctx.db).unwrap());
        assert!(!ensure_admin(&ctx.db).unwrap());
        assert_eq!(Users::new(&ctx.db).count().unwrap(), 1);

        let admin = check_user(&ctx.db, DEFAULT_ADMIN_LOGIN, DEFAULT_ADMIN_PASSWORD)
            .unwrap()
            .unwrap();
        assert!(admin.is_admin());
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_young_crud_and_caseload(ctx: &mut PeopleTestContext) {
        let service_id = Services::new(&ctx.db).insert(&Service::new("Pavillon A")).unwrap();
        let referent = staff(&ctx.db, "cdurand", Some(service_id));
        let youngs = Youngs::new(&ctx.db);

        let mut young = Young::new("Martin", "Paul", AdmissionStatus::Pending);
        young.placement_type = Some(PlacementType::Judicial);
        young.referent_id = Some(referent);
        young.service_id = Some(service_id);
        young.birth_date = chrono::NaiveDate::from_ymd_opt(2009, 4, 12);
        let id = youngs.insert(&young).unwrap();

        let stored = youngs.get(id).unwrap().unwrap();
        assert_eq!(stored.placement_type, Some(PlacementType::Judicial));
        assert_eq!(stored.birth_date, young.birth_date);

        let mut updated = stored.clone();
        updated.admission_status = AdmissionStatus::Admitted;
        youngs.update(id, &updated).unwrap();

        let list = youngs.list(Some(service_id)).unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].admission_status, AdmissionStatus::Admitted);
        assert_eq!(list[0].referent_name.as_deref(), Some("Claire DURAND"));
        assert!(youngs.list(Some(service_id + 1)).unwrap().is_empty());

        let caseload = youngs.for_professional(referent).unwrap();
        assert_eq!(caseload.referent_of, vec!["Paul MARTIN".to_string()]);
        assert!(caseload.co_referent_of.is_empty());
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_referent_delete_clears_link(ctx: &mut PeopleTestContext) {
        let referent = staff(&ctx.db, "cdurand", None);
        let mut young = Young::new("Martin", "Paul", AdmissionStatus::Admitted);
        young.referent_id = Some(referent);
        young.co_referent_id = Some(referent);
        let id = Youngs::new(&ctx.db).insert(&young).unwrap();

        Users::new(&ctx.db).delete(referent).unwrap();

        let stored = Youngs::new(&ctx.db).get(id).unwrap().unwrap();
        assert_eq!(stored.referent_id, None);
        assert_eq!(stored.co_referent_id, None);
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_contacts_follow_their_young(ctx: &mut PeopleTestContext) {
        let young_id = Youngs::new(&ctx.db)
            .insert(&Young::new("Martin", "Paul", AdmissionStatus::Admitted))
            .unwrap();
        let contacts = Contacts::new(&ctx.db);

        let mut mother = Contact::new(young_id, "Martin");
        mother.first_name = Some("Sophie".into());
        mother.relationship = Some("mère".into());
        let mother_id = contacts.insert(&mother).unwrap();
        contacts.insert(&Contact::new(young_id, "Bernard")).unwrap();

        let mut stored = contacts.get(mother_id).unwrap().unwrap();
        stored.phone = Some("06 11 22 33 44".into());
        contacts.update(mother_id, &stored).unwrap();
        assert_eq!(contacts.list_for_young(young_id).unwrap().len(), 2);

        contacts.delete(mother_id).unwrap();
        assert_eq!(contacts.list_for_young(young_id).unwrap().len(), 1);

        Youngs::new(&ctx.db).delete(young_id).unwrap();
        assert!(contacts.list_for_young(young_id).unwrap().is_empty());
    }

    #[test_context(PeopleTestContext)]
    #[test]
    fn test_contact_for_unknown_young(ctx: &mut PeopleTestContext) {
        let err = Contacts::new(&ctx.db).insert(&Contact::new(999, "Martin")).unwrap_err();
        assert!(matches!(err, StoreError::ForeignKey));
    }
}
