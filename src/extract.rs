//! Extractors whose rejections answer with the JSON envelope instead of
//! axum's plain-text bodies.

use axum::extract::{
    rejection::{JsonRejection, PathRejection, QueryRejection},
    FromRequest, FromRequestParts,
};
use tracing::warn;

use crate::error::Code;

#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(Code))]
pub struct Json<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(Code))]
pub struct Path<T>(pub T);

#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(Code))]
pub struct Query<T>(pub T);

impl From<JsonRejection> for Code {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected json body");
        Code::InvalidParams
    }
}

impl From<PathRejection> for Code {
    fn from(rejection: PathRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected path parameters");
        Code::InvalidParams
    }
}

impl From<QueryRejection> for Code {
    fn from(rejection: QueryRejection) -> Self {
        warn!(error = %rejection.body_text(), "rejected query string");
        Code::InvalidParams
    }
}
