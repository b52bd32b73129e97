use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;

pub const ROLE_ADMIN: i32 = 1;
pub const ROLE_MEMBER: i32 = 2;

/// User record in the database.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct User {
    pub id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339::option", skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<OffsetDateTime>,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub pass_word: String, // Argon2 digest, never plaintext
    pub role: i32,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == ROLE_ADMIN
    }
}

/// Account about to be inserted. `pass_word` holds plaintext until the
/// create path swaps it for a digest.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub user_name: String,
    pub pass_word: String,
    pub role: i32,
}

/// The two columns the edit path may touch.
#[derive(Debug, Clone)]
pub struct UserFields {
    pub user_name: String,
    pub role: i32,
}

#[derive(Debug, Clone)]
pub struct UserPage {
    pub items: Vec<User>,
    pub total: i64,
}
