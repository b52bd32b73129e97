use axum::{extract::State, routing::post, Router};
use serde::Deserialize;
use tracing::{instrument, warn};

use crate::{
    books::repo::Book, error::Code, extract::Json, response::Envelope, state::AppState,
};

#[derive(Debug, Deserialize)]
pub struct BookLookup {
    pub id: i64,
}

pub fn book_routes() -> Router<AppState> {
    Router::new().route("/book", post(get_book))
}

#[instrument(skip(state))]
pub async fn get_book(
    State(state): State<AppState>,
    Json(q): Json<BookLookup>,
) -> Result<Envelope<Book>, Code> {
    match state.books.find_by_id(q.id).await? {
        Some(book) => Ok(Envelope::ok(book)),
        None => {
            warn!(book_id = q.id, "book not found");
            Err(Code::BookNotExist)
        }
    }
}
