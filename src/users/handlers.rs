//! Account routes: registration, login and profile updates.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post, put},
    Json, Router,
};
use tracing::info;

use super::{
    auth::AuthUser,
    models::{LoginInput, ProfileInput, RegisterInput, User},
    password::{hash_password, verify_password},
};
use crate::{
    cart::models::SessionUser, db::StoreError, error::AppError, state::SharedState,
};

pub fn routes() -> Router<SharedState> {
    Router::new()
        .route("/api/users/register", post(register))
        .route("/api/users/login", post(login))
        .route("/api/users/profile", put(update_profile))
        .route("/api/keys/google", get(google_key))
}

fn email_taken(err: StoreError) -> AppError {
    match err {
        StoreError::Duplicate(_) => AppError::Conflict(
            "The Email provided is already tied to an Account. Please try another or Reset your password."
                .into(),
        ),
        other => other.into(),
    }
}

/// Endpoint: POST /api/users/register
async fn register(
    State(state): State<SharedState>,
    Json(input): Json<RegisterInput>,
) -> Result<(StatusCode, Json<SessionUser>), AppError> {
    if input.name.trim().is_empty() || input.email.trim().is_empty() || input.password.is_empty()
    {
        return Err(AppError::BadRequest(
            "Name, email and password are required".into(),
        ));
    }

    let user = User::new(
        input.name,
        input.email,
        hash_password(&input.password).await?,
        false,
    );
    let user = state.users.insert(user).map_err(email_taken)?;
    info!("Registered user {}", user.id);

    Ok((StatusCode::CREATED, Json(state.tokens.session_for(&user)?)))
}

/// Endpoint: POST /api/users/login
async fn login(
    State(state): State<SharedState>,
    Json(input): Json<LoginInput>,
) -> Result<Json<SessionUser>, AppError> {
    let invalid = || AppError::Unauthorized("Invalid Email or Password".into());
    let user = state.users.find_by_email(&input.email).ok_or_else(invalid)?;
    if !verify_password(&input.password, &user.password_hash).await {
        return Err(invalid());
    }

    Ok(Json(state.tokens.session_for(&user)?))
}

/// Endpoint: PUT /api/users/profile
/// Returns a freshly signed payload so the client can replace its `userInfo`.
async fn update_profile(
    State(state): State<SharedState>,
    AuthUser(claims): AuthUser,
    Json(input): Json<ProfileInput>,
) -> Result<Json<SessionUser>, AppError> {
    let mut user = state
        .users
        .get(&claims.id)
        .ok_or_else(|| AppError::not_found("User"))?;

    user.name = input.name;
    user.email = input.email;
    if let Some(password) = input.password.filter(|p| !p.is_empty()) {
        user.password_hash = hash_password(&password).await?;
    }

    let user = state
        .users
        .update(user)
        .map_err(email_taken)?
        .ok_or_else(|| AppError::not_found("User"))?;

    Ok(Json(state.tokens.session_for(&user)?))
}

/// Endpoint: GET /api/keys/google
async fn google_key(State(state): State<SharedState>, _user: AuthUser) -> Json<String> {
    Json(state.config.google_api_key.clone().unwrap_or_default())
}
