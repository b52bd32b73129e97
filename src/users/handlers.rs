use axum::{
    extract::State,
    routing::{get, post, put},
    Router,
};
use tracing::{instrument, warn};

use crate::{
    error::Code,
    extract::{Json, Path, Query},
    response::Envelope,
    state::AppState,
    users::{
        dto::{ChangePasswordRequest, EditUserRequest, JoinRequest, ListQuery},
        repo_types::{NewUser, User, UserFields},
        services::is_valid_username,
    },
};

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/user/joinup", post(join))
        .route("/user/", get(list))
        .route("/user/:id", put(edit).delete(delete))
        .route("/user/:id/password", put(change_password))
}

#[instrument(skip(state, payload), fields(user_name = %payload.user_name))]
pub async fn join(
    State(state): State<AppState>,
    Json(payload): Json<JoinRequest>,
) -> Result<Envelope<User>, Code> {
    if !payload.user_name.is_empty() && !is_valid_username(&payload.user_name) {
        warn!("invalid username on join");
        return Err(Code::InvalidUsername);
    }

    let mut candidate = NewUser {
        user_name: payload.user_name,
        pass_word: payload.pass_word,
        role: payload.role,
    };
    state.users.check_availability(&mut candidate).await?;
    let user = state.users.create(candidate).await?;
    Ok(Envelope::ok(user))
}

#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(q): Query<ListQuery>,
) -> Result<Envelope<Vec<User>>, Code> {
    let page = state
        .users
        .list(&q.user_name, q.page_size(), q.page_num())
        .await?;
    Ok(Envelope::ok(page.items).with_total(page.total))
}

#[instrument(skip(state))]
pub async fn edit(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<EditUserRequest>,
) -> Result<Envelope<()>, Code> {
    if !is_valid_username(&payload.user_name) {
        return Err(Code::InvalidUsername);
    }
    state.users.check_rename(id, &payload.user_name).await?;
    state
        .users
        .edit_fields(
            id,
            UserFields {
                user_name: payload.user_name,
                role: payload.role,
            },
        )
        .await?;
    Ok(Envelope::status(Code::Success))
}

#[instrument(skip(state, payload))]
pub async fn change_password(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ChangePasswordRequest>,
) -> Result<Envelope<()>, Code> {
    state.users.change_password(id, &payload.pass_word).await?;
    Ok(Envelope::status(Code::Success))
}

#[instrument(skip(state))]
pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Envelope<()>, Code> {
    state.users.soft_delete(id).await?;
    Ok(Envelope::status(Code::Success))
}
