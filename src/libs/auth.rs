//! Credential checks against the users table.

use crate::db::db::Db;
use crate::db::error::StoreResult;
use crate::db::users::{User, Users};
use crate::libs::vocabulary::PermissionLevel;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Salt appended to every password before hashing. Existing databases were
/// populated with this value, so changing it invalidates every account.
pub const STATIC_SALT: &str = "un_salt_secret_pour_la_securite";

pub const DEFAULT_ADMIN_LOGIN: &str = "admin";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";

/// Lowercase hex SHA-256 of `password + STATIC_SALT`.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(STATIC_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    pub id: i64,
    pub level: PermissionLevel,
}

impl AuthenticatedUser {
    pub fn is_admin(&self) -> bool {
        self.level == PermissionLevel::Administrative
    }
}

pub fn check_user(db: &Db, login: &str, password: &str) -> StoreResult<Option<AuthenticatedUser>> {
    let credentials = Users::new(db).credentials(login.trim())?;
    Ok(credentials
        .filter(|c| c.password_hash == hash_password(password))
        .map(|c| AuthenticatedUser { id: c.id, level: c.level }))
}

/// Creates the bootstrap administrator when no account exists yet.
/// Returns whether an account was created.
pub fn ensure_admin(db: &Db) -> StoreResult<bool> {
    let users = Users::new(db);
    if users.count()? > 0 {
        return Ok(false);
    }
    let admin = User::new("Admin", "System", DEFAULT_ADMIN_LOGIN, PermissionLevel::Administrative);
    users.insert(&admin, DEFAULT_ADMIN_PASSWORD)?;
    tracing::info!("bootstrap administrator account created");
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_is_salted_sha256_hex() {
        let hash = hash_password("admin123");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
        assert_eq!(hash, hash_password("admin123"));
        assert_ne!(hash, hash_password("admin124"));
    }

    #[test]
    fn hash_matches_existing_databases() {
        assert_eq!(
            hash_password(DEFAULT_ADMIN_PASSWORD),
            "0e64e894806c3d9b8e3cf25e8564e6ded5e1efee8e5ab500e41fedde446e5d30"
        );
    }
}
