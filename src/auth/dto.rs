use serde::{Deserialize, Serialize};

use crate::users::repo_types::User;

/// Request body for both login routes.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub user_name: String,
    pub pass_word: String,
}

/// Payload returned after a successful login.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}
