use axum::{
    extract::State,
    response::Json,
    routing::{get, post},
    Router,
};

use super::routes::AppState;
use crate::auth::{AuthError, AuthResponse, CurrentUser, LoginRequest, RegisterRequest};
use crate::models::UserResponse;

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/me", get(me))
}

pub async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth.register(request).await?;
    tracing::info!(user_id = %response.user.id, "registered new user");
    Ok(Json(response))
}

pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<AuthResponse>, AuthError> {
    let response = state.auth.login(request).await?;
    Ok(Json(response))
}

pub async fn me(
    State(state): State<AppState>,
    CurrentUser(session): CurrentUser,
) -> Result<Json<UserResponse>, AuthError> {
    let user = state
        .auth
        .get_user_by_id(session.user_id)
        .await?
        .ok_or(AuthError::InvalidToken)?;

    Ok(Json(user.into()))
}
