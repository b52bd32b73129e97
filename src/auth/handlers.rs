use axum::{
    extract::{FromRef, State},
    routing::post,
    Router,
};
use tracing::{error, info, instrument};

use crate::{
    auth::{
        dto::{LoginRequest, LoginResponse},
        jwt::JwtKeys,
    },
    error::Code,
    extract::Json,
    response::Envelope,
    state::AppState,
    users::repo_types::User,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login/", post(login))
        .route("/login/front", post(login_front))
}

#[instrument(skip(state, payload), fields(user_name = %payload.user_name))]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Envelope<LoginResponse>, Code> {
    let user = state
        .auth
        .check_login(&payload.user_name, &payload.pass_word)
        .await?;
    issue_token(&state, user)
}

#[instrument(skip(state, payload), fields(user_name = %payload.user_name))]
pub async fn login_front(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> Result<Envelope<LoginResponse>, Code> {
    let user = state
        .auth
        .check_login_front(&payload.user_name, &payload.pass_word)
        .await?;
    issue_token(&state, user)
}

fn issue_token(state: &AppState, user: User) -> Result<Envelope<LoginResponse>, Code> {
    let token = JwtKeys::from_ref(state).sign(&user).map_err(|e| {
        error!(error = %e, "jwt sign failed");
        Code::Error
    })?;

    info!(user_id = user.id, role = user.role, "user logged in");
    Ok(Envelope::ok(LoginResponse { token, user }))
}
