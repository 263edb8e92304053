use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

/// Login input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Domain user (business view)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
    pub is_active: bool,
    pub date_joined: DateTime<Utc>,
}

impl From<models::user::Model> for AuthUser {
    fn from(u: models::user::Model) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            first_name: u.first_name,
            last_name: u.last_name,
            is_staff: u.is_staff,
            is_active: u.is_active,
            date_joined: u.date_joined.with_timezone(&Utc),
        }
    }
}

/// Fields for a user row that does not exist yet.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub is_staff: bool,
}

/// Domain credentials (hashed)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Credentials {
    pub user_id: Uuid,
    pub password_hash: String,
    pub password_algorithm: String,
}

/// The single bearer token bound to a user.
#[derive(Debug, Clone, PartialEq)]
pub struct IssuedToken {
    pub key: String,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<models::auth_token::Model> for IssuedToken {
    fn from(t: models::auth_token::Model) -> Self {
        Self { key: t.key, user_id: t.user_id, created_at: t.created_at.with_timezone(&Utc) }
    }
}

/// Result of a successful registration.
#[derive(Debug, Clone, Serialize)]
pub struct Registration {
    pub token: String,
    pub user: AuthUser,
}

/// Result of a successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginSession {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
}

/// Partial profile update; `None` leaves the field untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Who is calling, as established by the token gate.
#[derive(Debug, Clone)]
pub struct AuthContext {
    pub user: AuthUser,
    pub token: String,
}

/// Privilege required by an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessLevel {
    Authenticated,
    Administrator,
}

impl AccessLevel {
    pub fn permits(self, user: &AuthUser) -> bool {
        match self {
            AccessLevel::Authenticated => user.is_active,
            AccessLevel::Administrator => user.is_active && user.is_staff,
        }
    }
}
