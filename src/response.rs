use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::error::Code;

/// JSON body shared by every endpoint.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub status: u16,
    pub message: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<i64>,
    #[serde(skip)]
    code: Code,
}

impl<T> Envelope<T> {
    pub fn status(code: Code) -> Self {
        Self {
            status: code.value(),
            message: code.message(),
            data: None,
            total: None,
            code,
        }
    }

    pub fn ok(data: T) -> Self {
        Self {
            data: Some(data),
            ..Self::status(Code::Success)
        }
    }

    pub fn with_total(mut self, total: i64) -> Self {
        self.total = Some(total);
        self
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        (self.code.http_status(), Json(self)).into_response()
    }
}
