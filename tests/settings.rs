#[cfg(test)]
mod tests {
    use mecs::db::db::Db;
    use mecs::db::migrations::{get_db_version, needs_migration, MigrationManager};
    use mecs::db::users::Users;
    use mecs::libs::auth::{check_user, AuthenticatedUser, DEFAULT_ADMIN_LOGIN, DEFAULT_ADMIN_PASSWORD};
    use mecs::libs::config::{AppearanceMode, ColorTheme, Config, CONFIG_FILE_NAME};
    use mecs::libs::session::{Session, SESSION_FILE_NAME};
    use mecs::libs::vocabulary::PermissionLevel;
    use rusqlite::Connection;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::TempDir;
    use test_context::{test_context, TestContext};

    struct SettingsTestContext {
        temp_dir: TempDir,
    }

    impl SettingsTestContext {
        fn file(&self, name: &str) -> PathBuf {
            self.temp_dir.path().join(name)
        }
    }

    impl TestContext for SettingsTestContext {
        fn setup() -> Self {
            SettingsTestContext {
                temp_dir: tempfile::tempdir().unwrap(),
            }
        }
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_missing_config_gives_defaults(ctx: &mut SettingsTestContext) {
        let config = Config::read_from(&ctx.file(CONFIG_FILE_NAME));
        assert_eq!(config.appearance_mode, AppearanceMode::System);
        assert_eq!(config.color_theme, ColorTheme::Blue);
        assert_eq!(config.database_path, None);
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_malformed_config_gives_defaults(ctx: &mut SettingsTestContext) {
        let path = ctx.file(CONFIG_FILE_NAME);
        fs::write(&path, "{ appearance_mode: dark").unwrap();
        assert_eq!(Config::read_from(&path), Config::default());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_unknown_value_falls_back_per_field(ctx: &mut SettingsTestContext) {
        let path = ctx.file(CONFIG_FILE_NAME);
        fs::write(&path, r#"{"appearance_mode": "Dark", "color_theme": "purple", "database_path": ""}"#).unwrap();
        let config = Config::read_from(&path);
        assert_eq!(config.appearance_mode, AppearanceMode::Dark);
        assert_eq!(config.color_theme, ColorTheme::Blue);
        assert_eq!(config.database_path, None);
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_config_save_and_read(ctx: &mut SettingsTestContext) {
        let path = ctx.file("nested").join(CONFIG_FILE_NAME);
        let config = Config {
            appearance_mode: AppearanceMode::Light,
            color_theme: ColorTheme::DarkBlue,
            database_path: Some(ctx.file("mecs.db")),
        };
        config.save_to(&path).unwrap();
        assert_eq!(Config::read_from(&path), config);
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_session_lifecycle(ctx: &mut SettingsTestContext) {
        let path = ctx.file(SESSION_FILE_NAME);
        assert!(Session::load_from(&path).unwrap().is_none());
        assert!(!Session::clear_at(&path).unwrap());

        let session = Session {
            user: AuthenticatedUser {
                id: 7,
                level: PermissionLevel::Administrative,
            },
            login: "aleroy".into(),
        };
        session.save_to(&path).unwrap();

        let loaded = Session::load_from(&path).unwrap().unwrap();
        assert_eq!(loaded.user, session.user);
        assert_eq!(loaded.login, "aleroy");
        assert!(loaded.user.is_admin());

        assert!(Session::clear_at(&path).unwrap());
        assert!(Session::load_from(&path).unwrap().is_none());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_unreadable_session_is_ignored(ctx: &mut SettingsTestContext) {
        let path = ctx.file(SESSION_FILE_NAME);
        fs::write(&path, "not json").unwrap();
        assert!(Session::load_from(&path).unwrap().is_none());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_migrations_on_fresh_connection(ctx: &mut SettingsTestContext) {
        let manager = MigrationManager::new();
        let mut conn = Connection::open(ctx.file("raw.db")).unwrap();
        assert!(needs_migration(&conn).unwrap());

        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(get_db_version(&conn).unwrap(), manager.latest_version());
        assert!(!needs_migration(&conn).unwrap());
        assert!(manager.is_migration_applied(&conn, 1).unwrap());

        let history = manager.get_migration_history(&conn).unwrap();
        let names: Vec<&str> = history.iter().map(|(_, name, _)| name.as_str()).collect();
        assert_eq!(names, vec!["create_facility_tables", "add_lookup_indices"]);

        // A second run finds nothing to apply
        manager.run_migrations(&mut conn).unwrap();
        assert_eq!(manager.get_migration_history(&conn).unwrap().len(), history.len());
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_reopening_database_keeps_version(ctx: &mut SettingsTestContext) {
        let path = ctx.file("mecs.db");
        drop(Db::open(&path).unwrap());
        let db = Db::open(&path).unwrap();
        assert_eq!(get_db_version(&db.conn).unwrap(), MigrationManager::new().latest_version());
        assert_eq!(MigrationManager::new().get_migration_history(&db.conn).unwrap().len(), 2);
    }

    #[test_context(SettingsTestContext)]
    #[test]
    fn test_configured_database_has_an_administrator(ctx: &mut SettingsTestContext) {
        let config = Config {
            database_path: Some(ctx.file("installation.db")),
            ..Config::default()
        };
        let db = Db::new(&config).unwrap();
        let admin = check_user(&db, DEFAULT_ADMIN_LOGIN, DEFAULT_ADMIN_PASSWORD).unwrap().unwrap();
        assert!(admin.is_admin());
        drop(db);

        let db = Db::new(&config).unwrap();
        assert_eq!(Users::new(&db).count().unwrap(), 1);
    }
}
