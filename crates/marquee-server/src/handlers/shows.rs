//! Show handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use time::OffsetDateTime;

use marquee_auth::CurrentUser;
use marquee_core::{EntityKind, Mask, Paging, Show, SimpleCinema, decode_public_id};
use marquee_storage::ShowCreate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::{Data, Paged};
use crate::state::AppState;

/// Attaches the auditorium and its cinema so masking covers the whole
/// ownership chain.
async fn hydrate_auditorium(state: &AppState, show: &mut Show) -> ApiResult<()> {
    let Some(mut room) = state.auditoriums.find_by_id(show.auditorium_id).await? else {
        return Ok(());
    };
    if let Some(cinema) = state.cinemas.find_by_id(room.cinema_id).await? {
        room.cinema = Some(SimpleCinema::from(&cinema));
    }
    show.auditorium = Some(room);
    Ok(())
}

/// GET /v1/shows
pub async fn list(
    State(state): State<AppState>,
    Query(mut paging): Query<Paging>,
) -> ApiResult<Json<Paged<Show>>> {
    paging.normalize();
    let (mut shows, total) = state.shows.list(&paging).await?;
    for show in &mut shows {
        hydrate_auditorium(&state, show).await?;
        show.mask(false);
    }
    paging.total = Some(total);
    Ok(Json(Paged {
        data: shows,
        paging,
    }))
}

/// GET /v1/shows/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<Show>>> {
    let id = decode_public_id(EntityKind::Show, &id).map_err(|_| ApiError::not_found("Show"))?;
    let mut show = state
        .shows
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Show"))?;
    hydrate_auditorium(&state, &mut show).await?;
    show.mask(false);
    Ok(Json(Data::new(show)))
}

#[derive(Debug, Deserialize)]
pub struct CreateShowRequest {
    /// Public auditorium identifier.
    pub auditorium_id: String,
    pub imdb_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ends_at: OffsetDateTime,
}

/// POST /v1/shows (any authenticated user)
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(req): Json<CreateShowRequest>,
) -> ApiResult<(StatusCode, Json<Data<Show>>)> {
    if req.imdb_id.trim().is_empty() {
        return Err(ApiError::invalid("imdb_id must not be empty"));
    }
    if req.starts_at >= req.ends_at {
        return Err(ApiError::invalid("starts_at must be before ends_at"));
    }

    let auditorium_id = decode_public_id(EntityKind::Auditorium, &req.auditorium_id)
        .map_err(|_| ApiError::not_found("Auditorium"))?;
    if state
        .auditoriums
        .find_by_id(auditorium_id)
        .await?
        .is_none()
    {
        return Err(ApiError::not_found("Auditorium"));
    }

    let mut show = state
        .shows
        .create(ShowCreate {
            auditorium_id,
            imdb_id: req.imdb_id.trim().to_string(),
            starts_at: req.starts_at,
            ends_at: req.ends_at,
        })
        .await?;
    tracing::info!(show_id = show.id, auditorium_id, "show created");

    hydrate_auditorium(&state, &mut show).await?;
    show.mask(requester.is_privileged());
    Ok((StatusCode::CREATED, Json(Data::new(show))))
}
