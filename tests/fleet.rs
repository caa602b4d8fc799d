#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, NaiveTime};
    use mecs::db::db::Db;
    use mecs::db::error::StoreError;
    use mecs::db::services::{Service, Services};
    use mecs::db::trips::{Trip, Trips, NO_PASSENGER};
    use mecs::db::users::{User, Users};
    use mecs::db::vehicles::{Vehicle, Vehicles};
    use mecs::db::youngs::{Young, Youngs};
    use mecs::libs::vocabulary::{AdmissionStatus, PermissionLevel};
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct FleetTestContext {
        _temp_dir: TempDir,
        db: Db,
        service_id: i64,
        driver: i64,
        vehicle_id: i64,
    }

    impl TestContext for FleetTestContext {
        fn setup() -> Self {
            let temp_dir = tempfile::tempdir().unwrap();
            let db = Db::open(temp_dir.path().join("mecs.db")).unwrap();
            let service_id = Services::new(&db).insert(&Service::new("Pavillon A")).unwrap();
            let mut driver = User::new("Dupont", "Jean", "jdupont", PermissionLevel::Standard);
            driver.service_id = Some(service_id);
            let driver = Users::new(&db).insert(&driver, "secret").unwrap();
            let mut vehicle = Vehicle::new("Renault", "Trafic", "AB-123-CD");
            vehicle.seats = Some(9);
            let vehicle_id = Vehicles::new(&db).insert(&vehicle).unwrap();
            FleetTestContext {
                _temp_dir: temp_dir,
                db,
                service_id,
                driver,
                vehicle_id,
            }
        }
    }

    fn trip(ctx: &FleetTestContext, day: u32, km_start: i64) -> Trip {
        Trip::new(
            NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
            ctx.service_id,
            ctx.driver,
            ctx.vehicle_id,
            km_start,
        )
    }

    #[test_context(FleetTestContext)]
    #[test]
    fn test_vehicle_crud(ctx: &mut FleetTestContext) {
        let vehicles = Vehicles::new(&ctx.db);
        let mut vehicle = vehicles.get(ctx.vehicle_id).unwrap().unwrap();
        assert_eq!(vehicle.seats, Some(9));

        vehicle.fiscal_power = Some(7);
        vehicles.update(ctx.vehicle_id, &vehicle).unwrap();
        assert_eq!(vehicles.get(ctx.vehicle_id).unwrap().unwrap().fiscal_power, Some(7));

        let second = vehicles.insert(&Vehicle::new("Peugeot", "208", "EF-456-GH")).unwrap();
        assert_eq!(vehicles.list().unwrap().len(), 2);
        vehicles.delete(second).unwrap();
        assert_eq!(vehicles.list().unwrap().len(), 1);
    }

    #[test_context(FleetTestContext)]
    #[test]
    fn test_duplicate_plate(ctx: &mut FleetTestContext) {
        let err = Vehicles::new(&ctx.db)
            .insert(&Vehicle::new("Citroën", "Berlingo", "AB-123-CD"))
            .unwrap_err();
        assert!(err.is_duplicate_of("vehicles.plaque_immatriculation"), "{:?}", err);
    }

    #[test_context(FleetTestContext)]
    #[test]
    fn test_vehicle_used_by_trip_is_kept(ctx: &mut FleetTestContext) {
        Trips::new(&ctx.db).insert(&trip(ctx, 4, 12000), &[]).unwrap();

        let err = Vehicles::new(&ctx.db).delete(ctx.vehicle_id).unwrap_err();
        assert!(matches!(err, StoreError::InUse("vehicle")), "{:?}", err);
        assert!(Vehicles::new(&ctx.db).get(ctx.vehicle_id).unwrap().is_some());

        let err = Users::new(&ctx.db).delete(ctx.driver).unwrap_err();
        assert!(matches!(err, StoreError::InUse("user")), "{:?}", err);
        let err = Services::new(&ctx.db).delete(ctx.service_id).unwrap_err();
        assert!(matches!(err, StoreError::InUse("service")), "{:?}", err);
        // The refused delete must not have detached the driver
        assert_eq!(
            Users::new(&ctx.db).get(ctx.driver).unwrap().unwrap().service_id,
            Some(ctx.service_id)
        );
    }

    #[test_context(FleetTestContext)]
    #[test]
    fn test_trip_with_passengers(ctx: &mut FleetTestContext) {
        let youngs = Youngs::new(&ctx.db);
        let paul = youngs.insert(&Young::new("Martin", "Paul", AdmissionStatus::Admitted)).unwrap();
        let lea = youngs.insert(&Young::new("Roux", "Léa", AdmissionStatus::Admitted)).unwrap();
        let trips = Trips::new(&ctx.db);

        let mut outbound = trip(ctx, 4, 12000);
        outbound.purpose = Some("Collège".into());
        let id = trips.insert(&outbound, &[paul, lea]).unwrap();
        trips.insert(&trip(ctx, 5, 12040), &[]).unwrap();

        let list = trips.list().unwrap();
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].passengers(), NO_PASSENGER);
        assert_eq!(list[1].passengers(), "Paul MARTIN, Léa ROUX");
        assert_eq!(list[1].driver_name, "Jean DUPONT");
        assert_eq!(list[1].vehicle_label, "Renault Trafic");
        assert_eq!(list[1].trip.distance(), None);

        let (mut stored, passengers) = trips.get(id).unwrap().unwrap();
        assert_eq!(passengers, vec![paul, lea]);
        stored.return_time = NaiveTime::from_hms_opt(10, 15, 0);
        stored.km_end = Some(12035);
        trips.update(id, &stored, &[paul]).unwrap();

        let (updated, passengers) = trips.get(id).unwrap().unwrap();
        assert_eq!(updated.distance(), Some(35));
        assert_eq!(passengers, vec![paul]);

        trips.delete(id).unwrap();
        assert!(trips.get(id).unwrap().is_none());
    }

    #[test_context(FleetTestContext)]
    #[test]
    fn test_return_km_below_departure(ctx: &mut FleetTestContext) {
        let mut bad = trip(ctx, 4, 12000);
        bad.km_end = Some(11990);
        let err = Trips::new(&ctx.db).insert(&bad, &[]).unwrap_err();
        assert!(matches!(err, StoreError::Invalid { field: "km_retour", .. }));
        assert!(Trips::new(&ctx.db).list().unwrap().is_empty());
    }
}
