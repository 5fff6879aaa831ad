use argon2::{
    Argon2,
    password_hash::{
        Error as PasswordHashError, PasswordHash, PasswordHasher, PasswordVerifier, SaltString,
        rand_core::OsRng,
    },
};
use sea_orm::{DatabaseConnection, EntityTrait};
use thiserror::Error;

use crate::entities::user;
use crate::entities::user::Role;

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("missing or malformed credentials")]
    MissingCredentials,
    #[error("no user with such username")]
    UnknownUser,
    #[error("wrong password")]
    WrongPassword,
    #[error("password hash error: {0}")]
    Hash(String),
    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),
}

/// Look up `username` and check `password` against the stored hash.
/// Returns the user's role on success.
pub async fn authenticate(
    conn: &DatabaseConnection,
    username: &str,
    password: &str,
) -> Result<Role, AuthError> {
    let user = user::Entity::find_by_id(username)
        .one(conn)
        .await?
        .ok_or(AuthError::UnknownUser)?;

    if !verify_password(password, &user.password_hash)? {
        return Err(AuthError::WrongPassword);
    }

    Ok(user.role)
}

/// Hash a password with Argon2 and a fresh random salt.
pub fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|err| AuthError::Hash(err.to_string()))?;
    Ok(hash.to_string())
}

/// Verify a password against a stored PHC-format hash string.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, AuthError> {
    let parsed = PasswordHash::new(hash).map_err(|err| AuthError::Hash(err.to_string()))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(PasswordHashError::Password) => Ok(false),
        Err(err) => Err(AuthError::Hash(err.to_string())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::test_db;
    use sea_orm::{ActiveModelTrait, Set};

    #[test]
    fn hash_and_verify_password() {
        let hash = hash_password("hunter2").unwrap();
        assert_ne!(hash, "hunter2");
        assert!(verify_password("hunter2", &hash).unwrap());
        assert!(!verify_password("hunter3", &hash).unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let first = hash_password("hunter2").unwrap();
        let second = hash_password("hunter2").unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn verify_rejects_garbage_hash() {
        assert!(verify_password("hunter2", "not-a-phc-string").is_err());
    }

    #[test]
    fn only_admin_can_write() {
        assert!(Role::Admin.can_write());
        assert!(!Role::Client.can_write());
    }

    async fn insert_user(conn: &sea_orm::DatabaseConnection, username: &str, password: &str, role: Role) {
        user::ActiveModel {
            username: Set(username.to_owned()),
            password_hash: Set(hash_password(password).unwrap()),
            role: Set(role),
        }
        .insert(conn)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn authenticate_returns_role() {
        let db = test_db().await;
        insert_user(&db.conn, "admin", "admin", Role::Admin).await;
        insert_user(&db.conn, "client", "client", Role::Client).await;

        let role = authenticate(&db.conn, "admin", "admin").await.unwrap();
        assert_eq!(role, Role::Admin);
        let role = authenticate(&db.conn, "client", "client").await.unwrap();
        assert_eq!(role, Role::Client);
    }

    #[tokio::test]
    async fn authenticate_rejects_wrong_password() {
        let db = test_db().await;
        insert_user(&db.conn, "admin", "admin", Role::Admin).await;

        let err = authenticate(&db.conn, "admin", "nope").await.unwrap_err();
        assert!(matches!(err, AuthError::WrongPassword));
    }

    #[tokio::test]
    async fn authenticate_rejects_unknown_user() {
        let db = test_db().await;

        let err = authenticate(&db.conn, "ghost", "boo").await.unwrap_err();
        assert!(matches!(err, AuthError::UnknownUser));
    }
}
