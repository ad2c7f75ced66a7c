//! Cinema handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;

use marquee_auth::{AuthError, CurrentUser};
use marquee_core::{Auditorium, Cinema, EntityKind, Mask, Paging, SimpleCinema, decode_public_id};
use marquee_storage::CinemaCreate;

use crate::error::{ApiError, ApiResult};
use crate::handlers::{Data, Paged};
use crate::state::AppState;

/// Attaches the owning user, resolved through the read-through cache. A
/// deleted owner leaves the slot empty rather than failing the read.
async fn hydrate_owner(state: &AppState, cinema: &mut Cinema) -> ApiResult<()> {
    match state.users.get_by_id(cinema.owner_id).await {
        Ok(owner) => {
            cinema.owner = Some(owner.to_simple());
            Ok(())
        }
        Err(AuthError::UserNotFound) => Ok(()),
        Err(err) => Err(err.into()),
    }
}

/// GET /v1/cinemas
pub async fn list(
    State(state): State<AppState>,
    Query(mut paging): Query<Paging>,
) -> ApiResult<Json<Paged<Cinema>>> {
    paging.normalize();
    let (mut cinemas, total) = state.cinemas.list(&paging).await?;
    for cinema in &mut cinemas {
        hydrate_owner(&state, cinema).await?;
        cinema.mask(false);
    }
    paging.total = Some(total);
    Ok(Json(Paged {
        data: cinemas,
        paging,
    }))
}

/// GET /v1/cinemas/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<Cinema>>> {
    let id =
        decode_public_id(EntityKind::Cinema, &id).map_err(|_| ApiError::not_found("Cinema"))?;
    let mut cinema = state
        .cinemas
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cinema"))?;
    hydrate_owner(&state, &mut cinema).await?;
    cinema.mask(false);
    Ok(Json(Data::new(cinema)))
}

/// GET /v1/cinemas/name/{name}
pub async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Data<Cinema>>> {
    let mut cinema = state
        .cinemas
        .find_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Cinema"))?;
    hydrate_owner(&state, &mut cinema).await?;
    cinema.mask(false);
    Ok(Json(Data::new(cinema)))
}

#[derive(Debug, Deserialize)]
pub struct CreateCinemaRequest {
    pub name: String,
    pub address: String,
    pub capacity: i32,
    pub email: String,
    pub phone_number: String,
}

/// POST /v1/cinemas (roles: admin, cinema_owner)
pub async fn create(
    State(state): State<AppState>,
    CurrentUser(requester): CurrentUser,
    Json(req): Json<CreateCinemaRequest>,
) -> ApiResult<(StatusCode, Json<Data<Cinema>>)> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::invalid("name must not be empty"));
    }
    if req.capacity <= 0 {
        return Err(ApiError::invalid("capacity must be > 0"));
    }

    let mut cinema = state
        .cinemas
        .create(CinemaCreate {
            owner_id: requester.user_id(),
            name,
            address: req.address,
            capacity: req.capacity,
            email: req.email,
            phone_number: req.phone_number,
        })
        .await?;
    tracing::info!(cinema_id = cinema.id, owner_id = requester.user_id(), "cinema created");

    cinema.owner = Some(requester.user().to_simple());
    cinema.mask(requester.is_privileged());
    Ok((StatusCode::CREATED, Json(Data::new(cinema))))
}

async fn masked_auditoriums(state: &AppState, cinema: &Cinema) -> ApiResult<Vec<Auditorium>> {
    let mut rooms = state.auditoriums.list_by_cinema(cinema.id).await?;
    for room in &mut rooms {
        room.cinema = Some(SimpleCinema::from(cinema));
        room.mask(false);
    }
    Ok(rooms)
}

/// GET /v1/cinemas/{id}/auditoriums
pub async fn list_auditoriums(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Data<Vec<Auditorium>>>> {
    let id =
        decode_public_id(EntityKind::Cinema, &id).map_err(|_| ApiError::not_found("Cinema"))?;
    let cinema = state
        .cinemas
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Cinema"))?;
    let rooms = masked_auditoriums(&state, &cinema).await?;
    Ok(Json(Data::new(rooms)))
}

/// GET /v1/cinemas/name/{name}/auditoriums
pub async fn list_auditoriums_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> ApiResult<Json<Data<Vec<Auditorium>>>> {
    let cinema = state
        .cinemas
        .find_by_name(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Cinema"))?;
    let rooms = masked_auditoriums(&state, &cinema).await?;
    Ok(Json(Data::new(rooms)))
}
