//! Auditorium handlers.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use marquee_auth::CurrentUser;
use marquee_core::{Auditorium, EntityKind, Mask, SimpleCinema, decode_public_id};
use marquee_storage::AuditoriumCreate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::Data;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateAuditoriumRequest {
    pub name: String,
    pub seats: i32,
    /// Public cinema identifier.
    pub cinema_id: String,
}

/// POST /v1/auditoriums (roles: admin, cinema_owner)
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(req): Json<CreateAuditoriumRequest>,
) -> ApiResult<(StatusCode, Json<Data<Auditorium>>)> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::invalid("name must not be empty"));
    }
    if req.seats <= 0 {
        return Err(ApiError::invalid("seats must be > 0"));
    }

    let cinema_id = decode_public_id(EntityKind::Cinema, &req.cinema_id)
        .map_err(|_| ApiError::not_found("Cinema"))?;
    let cinema = state
        .cinemas
        .find_by_id(cinema_id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cinema"))?;

    let mut room = state
        .auditoriums
        .create(AuditoriumCreate {
            cinema_id,
            name,
            seats: req.seats,
        })
        .await?;
    tracing::info!(auditorium_id = room.id, cinema_id, "auditorium created");

    room.cinema = Some(SimpleCinema::from(&cinema));
    room.mask(requester.is_privileged());
    Ok((StatusCode::CREATED, Json(Data::new(room))))
}

/// GET /v1/auditoriums/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<Auditorium>>> {
    let id = decode_public_id(EntityKind::Auditorium, &id)
        .map_err(|_| ApiError::not_found("Auditorium"))?;
    let mut room = state
        .auditoriums
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Auditorium"))?;

    if let Some(cinema) = state.cinemas.find_by_id(room.cinema_id).await? {
        room.cinema = Some(SimpleCinema::from(&cinema));
    }
    room.mask(false);
    Ok(Json(Data::new(room)))
}
