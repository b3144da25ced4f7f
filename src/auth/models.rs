//! Authentication Models
//! Mission: Define user identity, token claims and auth request/response shapes

use rusqlite::Row;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::db::uuid_column;

/// Registered account.
///
/// The password hash deliberately has no field here; it never leaves the
/// credential store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub created_at: String,
}

/// Column list matching [`User::from_row`], unqualified.
pub(crate) const USER_COLUMNS: &str = "id, first_name, last_name, email, phone, created_at";

impl User {
    /// Build a user from six consecutive columns starting at `start`
    pub(crate) fn from_row(row: &Row<'_>, start: usize) -> rusqlite::Result<Self> {
        Ok(Self {
            id: uuid_column(row, start)?,
            first_name: row.get(start + 1)?,
            last_name: row.get(start + 2)?,
            email: row.get(start + 3)?,
            phone: row.get(start + 4)?,
            created_at: row.get(start + 5)?,
        })
    }
}

/// Editable profile fields, shared by registration and profile updates
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Profile {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
}

/// JWT Claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String, // subject (user_id)
    pub iat: i64,
    pub exp: i64, // expiration timestamp
}

/// Registration form body
#[derive(Debug, Default, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub phone: String,
}

impl RegisterForm {
    pub fn profile(&self) -> Profile {
        Profile {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
        }
    }
}

/// Login form body
#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub user: User,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub message: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct UserUpdatedResponse {
    pub message: String,
    pub user: User,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_serialization_has_no_secret() {
        let user = User {
            id: Uuid::new_v4(),
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
            phone: "555".to_string(),
            created_at: "2025-01-01T00:00:00Z".to_string(),
        };

        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["email"], "ada@example.com");
        assert!(json.get("password_hash").is_none());
        assert!(json.get("password").is_none());
    }

    #[test]
    fn test_register_form_profile() {
        let form = RegisterForm {
            email: "a@b.com".to_string(),
            password: "secret1".to_string(),
            first_name: "A".to_string(),
            last_name: "B".to_string(),
            phone: "1".to_string(),
        };

        let profile = form.profile();
        assert_eq!(profile.email, "a@b.com");
        assert_eq!(profile.first_name, "A");
        assert_eq!(profile.phone, "1");
    }

    #[test]
    fn test_profile_missing_fields_default_to_empty() {
        let profile: Profile = serde_json::from_str(r#"{"email":"x@y.io"}"#).unwrap();
        assert_eq!(profile.email, "x@y.io");
        assert!(profile.first_name.is_empty());
    }
}
