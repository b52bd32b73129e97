use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::response::Envelope;

/// Business status carried in every response envelope.
///
/// The numeric values are part of the client contract and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    Success,
    Error,
    UsernameUsed,
    PasswordWrong,
    UserNotExist,
    UserNoRight,
    PasswordTooShort,
    InvalidUsername,
    InvalidPassword,
    InvalidParams,
    BookNotExist,
}

impl Code {
    pub fn value(self) -> u16 {
        match self {
            Code::Success => 200,
            Code::Error => 500,
            Code::UsernameUsed => 1001,
            Code::PasswordWrong => 1002,
            Code::UserNotExist => 1003,
            Code::UserNoRight => 1008,
            Code::PasswordTooShort => 1009,
            Code::InvalidUsername => 1010,
            Code::InvalidPassword => 1011,
            Code::InvalidParams => 1012,
            Code::BookNotExist => 2001,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Code::Success => "OK",
            Code::Error => "FAIL",
            Code::UsernameUsed => "username already taken",
            Code::PasswordWrong => "wrong password",
            Code::UserNotExist => "user does not exist",
            Code::UserNoRight => "user has no rights",
            Code::PasswordTooShort => "password shorter than 6 characters",
            Code::InvalidUsername => "username must be 4 to 12 characters",
            Code::InvalidPassword => "password longer than 120 characters",
            Code::InvalidParams => "invalid request parameters",
            Code::BookNotExist => "book does not exist",
        }
    }

    pub fn http_status(self) -> StatusCode {
        match self {
            Code::Success => StatusCode::OK,
            Code::Error => StatusCode::INTERNAL_SERVER_ERROR,
            Code::UsernameUsed => StatusCode::CONFLICT,
            Code::PasswordWrong => StatusCode::UNAUTHORIZED,
            Code::UserNoRight => StatusCode::FORBIDDEN,
            Code::UserNotExist | Code::BookNotExist => StatusCode::NOT_FOUND,
            Code::PasswordTooShort
            | Code::InvalidUsername
            | Code::InvalidPassword
            | Code::InvalidParams => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Code {
    fn into_response(self) -> Response {
        Envelope::<()>::status(self).into_response()
    }
}

/// Failures raised by the persistence layer.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Database(sqlx::Error),

    /// A live record already holds the username.
    #[error("username already taken")]
    Conflict,
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return StoreError::Conflict;
            }
        }
        StoreError::Database(err)
    }
}

impl From<StoreError> for Code {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => Code::UsernameUsed,
            StoreError::Database(e) => {
                tracing::error!(error = %e, "store operation failed");
                Code::Error
            }
        }
    }
}
