//! Registration, login, and profile handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use marquee_auth::{AuthError, CurrentUser, User, UserPatch};
use marquee_core::{Mask, SimpleUser};

use crate::error::{ApiError, ApiResult};
use crate::handlers::Data;
use crate::password;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub name: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub name: Option<String>,
    pub password: Option<String>,
}

fn invalid_credentials() -> ApiError {
    // Same answer for unknown email and wrong password.
    AuthError::unauthorized("invalid email or password").into()
}

/// POST /v1/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<Data<TokenResponse>>)> {
    let email = req.email.trim().to_string();
    if !email.contains('@') {
        return Err(ApiError::invalid("email is not valid"));
    }
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::invalid("name must not be empty"));
    }
    if req.password.len() < 8 {
        return Err(ApiError::invalid("password must be at least 8 characters"));
    }

    let user = User::builder(email)
        .name(name)
        .password_hash(password::hash(&req.password)?)
        .build();
    let created = state.user_store.create(&user).await?;
    tracing::info!(user_id = created.id, "user registered");

    let token = state.tokens.issue(&created)?;
    Ok((
        StatusCode::CREATED,
        Json(Data::new(TokenResponse { token })),
    ))
}

/// POST /v1/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<Data<TokenResponse>>> {
    let user = match state.users.get_by_email(req.email.trim()).await {
        Ok(user) => user,
        Err(AuthError::UserNotFound) => return Err(invalid_credentials()),
        Err(err) => return Err(err.into()),
    };

    let Some(hash) = &user.password_hash else {
        return Err(invalid_credentials());
    };
    if !password::verify(&req.password, hash) {
        return Err(invalid_credentials());
    }
    if !user.is_active() {
        return Err(AuthError::unauthorized("User is inactive").into());
    }

    let token = state.tokens.issue(&user)?;
    Ok(Json(Data::new(TokenResponse { token })))
}

/// GET /v1/profile
pub async fn get_profile(CurrentUser(requester): CurrentUser) -> Json<Data<SimpleUser>> {
    let mut profile = requester.user().to_simple();
    profile.mask(requester.is_privileged());
    Json(Data::new(profile))
}

/// PUT /v1/profile
pub async fn update_profile(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(req): Json<UpdateProfileRequest>,
) -> ApiResult<Json<Data<SimpleUser>>> {
    let mut patch = UserPatch::default();
    if let Some(name) = req.name {
        let name = name.trim().to_string();
        if name.is_empty() {
            return Err(ApiError::invalid("name must not be empty"));
        }
        patch.name = Some(name);
    }
    if let Some(new_password) = req.password {
        if new_password.len() < 8 {
            return Err(ApiError::invalid("password must be at least 8 characters"));
        }
        patch.password_hash = Some(password::hash(&new_password)?);
    }

    // The cache evicts both key namespaces for this user before returning.
    let updated = state.users.update(requester.user_id(), &patch).await?;

    let mut profile = updated.to_simple();
    profile.mask(requester.is_privileged());
    Ok(Json(Data::new(profile)))
}
