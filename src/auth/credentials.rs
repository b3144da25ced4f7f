//! Credential Store
//! Mission: Persist user identities and their bcrypt password hashes

use crate::auth::models::{Profile, User, USER_COLUMNS};
use crate::db::{is_unique_violation, Database};
use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Minimum password length in bytes
pub const MIN_PASSWORD_LEN: usize = 7;

#[derive(Debug, Error)]
pub enum CredentialError {
    /// Client-facing message describing the rejected field
    #[error("{0}")]
    InvalidInput(String),

    #[error("email already exists")]
    DuplicateEmail,

    #[error("user not found")]
    NotFound,

    #[error("incorrect password")]
    BadCredential,

    #[error("storage failure: {0}")]
    Storage(#[from] rusqlite::Error),

    #[error("password hashing failed: {0}")]
    Hashing(String),
}

impl CredentialError {
    fn invalid_email() -> Self {
        Self::InvalidInput("Invalid Email Address".to_string())
    }

    fn short_password() -> Self {
        Self::InvalidInput("Password must be greater than 6 characters".to_string())
    }
}

/// Syntactic `local@domain.tld` check.
///
/// Every part must be non-empty and drawn from `[A-Za-z0-9._%+-]`.
pub fn is_valid_email(email: &str) -> bool {
    fn allowed(part: &str) -> bool {
        !part.is_empty()
            && part
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '%' | '+' | '-'))
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    let Some((host, tld)) = domain.rsplit_once('.') else {
        return false;
    };

    allowed(local) && allowed(host) && allowed(tld)
}

/// User storage on the shared SQLite handle
pub struct CredentialStore {
    db: Database,
    bcrypt_cost: u32,
}

impl CredentialStore {
    pub fn new(db: Database, bcrypt_cost: u32) -> Self {
        Self { db, bcrypt_cost }
    }

    /// Register a new identity
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        profile: &Profile,
    ) -> Result<User, CredentialError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(CredentialError::invalid_email());
        }
        if password.len() < MIN_PASSWORD_LEN {
            return Err(CredentialError::short_password());
        }

        if self.find_by_email(email).await?.is_some() {
            return Err(CredentialError::DuplicateEmail);
        }

        let password_hash = self.hash_password(password).await?;

        let user = User {
            id: Uuid::new_v4(),
            first_name: profile.first_name.trim().to_string(),
            last_name: profile.last_name.trim().to_string(),
            email: email.to_string(),
            phone: profile.phone.trim().to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        let conn = self.db.lock().await;
        conn.execute(
            "INSERT INTO users (id, first_name, last_name, email, phone, password_hash, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                user.id.to_string(),
                user.first_name,
                user.last_name,
                user.email,
                user.phone,
                password_hash,
                user.created_at,
            ],
        )
        .map_err(|e| {
            // Lost a race with a concurrent registration for the same email
            if is_unique_violation(&e) {
                CredentialError::DuplicateEmail
            } else {
                CredentialError::Storage(e)
            }
        })?;

        info!(user_id = %user.id, email = %user.email, "registered user");
        Ok(user)
    }

    /// Check an email/password pair and return the matching identity
    pub async fn verify(&self, email: &str, password: &str) -> Result<User, CredentialError> {
        let (user, password_hash) = self
            .find_by_email(email.trim())
            .await?
            .ok_or(CredentialError::NotFound)?;

        let password = password.to_string();
        let valid = tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .map_err(|e| CredentialError::Hashing(e.to_string()))?;

        if !valid {
            warn!(user_id = %user.id, "password verification failed");
            return Err(CredentialError::BadCredential);
        }

        debug!(user_id = %user.id, "password verified");
        Ok(user)
    }

    /// Get user by ID
    pub async fn get(&self, id: Uuid) -> Result<User, CredentialError> {
        let conn = self.db.lock().await;
        conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.to_string()],
            |row| User::from_row(row, 0),
        )
        .optional()?
        .ok_or(CredentialError::NotFound)
    }

    /// Overwrite the editable profile fields of a user
    pub async fn update_profile(&self, id: Uuid, profile: &Profile) -> Result<User, CredentialError> {
        let email = profile.email.trim();
        if !is_valid_email(email) {
            return Err(CredentialError::invalid_email());
        }

        let conn = self.db.lock().await;
        if let Some(owner) = email_owner(&conn, email)? {
            if owner != id {
                return Err(CredentialError::DuplicateEmail);
            }
        }

        let updated = conn
            .execute(
                "UPDATE users SET first_name = ?2, last_name = ?3, email = ?4, phone = ?5
                 WHERE id = ?1",
                params![
                    id.to_string(),
                    profile.first_name.trim(),
                    profile.last_name.trim(),
                    email,
                    profile.phone.trim(),
                ],
            )
            .map_err(|e| {
                if is_unique_violation(&e) {
                    CredentialError::DuplicateEmail
                } else {
                    CredentialError::Storage(e)
                }
            })?;

        if updated == 0 {
            return Err(CredentialError::NotFound);
        }

        let user = conn.query_row(
            &format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"),
            params![id.to_string()],
            |row| User::from_row(row, 0),
        )?;

        info!(user_id = %id, "updated user profile");
        Ok(user)
    }

    /// Delete a user; posts, comments and follow edges cascade
    pub async fn delete(&self, id: Uuid) -> Result<(), CredentialError> {
        let conn = self.db.lock().await;
        let rows_affected = conn.execute("DELETE FROM users WHERE id = ?1", params![id.to_string()])?;

        if rows_affected == 0 {
            return Err(CredentialError::NotFound);
        }

        info!(user_id = %id, "deleted user");
        Ok(())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<(User, String)>, CredentialError> {
        let conn = self.db.lock().await;
        let found = conn
            .query_row(
                &format!("SELECT {USER_COLUMNS}, password_hash FROM users WHERE email = ?1"),
                params![email],
                |row| Ok((User::from_row(row, 0)?, row.get::<_, String>(6)?)),
            )
            .optional()?;
        Ok(found)
    }

    async fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let password = password.to_string();
        let cost = self.bcrypt_cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .map_err(|e| CredentialError::Hashing(e.to_string()))?
            .map_err(|e| CredentialError::Hashing(e.to_string()))
    }
}

fn email_owner(conn: &Connection, email: &str) -> rusqlite::Result<Option<Uuid>> {
    conn.query_row(
        "SELECT id FROM users WHERE email = ?1",
        params![email],
        |row| crate::db::uuid_column(row, 0),
    )
    .optional()
}
