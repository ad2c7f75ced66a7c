//! Catalog store traits.
//!
//! Each trait is the fixed interface of an external collaborator. Lookups
//! return `Ok(None)` for absence; errors are reserved for transport and
//! constraint failures. List operations return the page plus the total count.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use marquee_core::{Auditorium, Cinema, Paging, Show};

use crate::error::StoreResult;

// =============================================================================
// Create payloads
// =============================================================================

/// Fields required to create a cinema. The owner id comes from the
/// authenticated requester, never from the request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CinemaCreate {
    pub owner_id: i64,
    pub name: String,
    pub address: String,
    pub capacity: i32,
    pub email: String,
    pub phone_number: String,
}

/// Fields required to create an auditorium.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditoriumCreate {
    pub cinema_id: i64,
    pub name: String,
    pub seats: i32,
}

/// Fields required to create a show.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShowCreate {
    pub auditorium_id: i64,
    pub imdb_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub ends_at: OffsetDateTime,
}

// =============================================================================
// Store traits
// =============================================================================

/// Storage operations for cinemas.
#[async_trait]
pub trait CinemaStore: Send + Sync {
    /// Lists cinemas in id order for the given page.
    ///
    /// Returns the page of cinemas and the total number of cinemas.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list(&self, paging: &Paging) -> StoreResult<(Vec<Cinema>, u64)>;

    /// Finds a cinema by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cinema>>;

    /// Finds a cinema by its exact name.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Cinema>>;

    /// Creates a cinema and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, input: CinemaCreate) -> StoreResult<Cinema>;
}

/// Storage operations for auditoriums.
#[async_trait]
pub trait AuditoriumStore: Send + Sync {
    /// Finds an auditorium by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Auditorium>>;

    /// Lists every auditorium belonging to a cinema, in id order.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list_by_cinema(&self, cinema_id: i64) -> StoreResult<Vec<Auditorium>>;

    /// Creates an auditorium and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, input: AuditoriumCreate) -> StoreResult<Auditorium>;
}

/// Storage operations for shows.
#[async_trait]
pub trait ShowStore: Send + Sync {
    /// Lists shows in id order for the given page.
    ///
    /// Returns the page of shows and the total number of shows.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn list(&self, paging: &Paging) -> StoreResult<(Vec<Show>, u64)>;

    /// Finds a show by its numeric id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Show>>;

    /// Creates a show and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage operation fails.
    async fn create(&self, input: ShowCreate) -> StoreResult<Show>;
}
