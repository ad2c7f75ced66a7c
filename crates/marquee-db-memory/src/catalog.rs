//! In-memory catalog stores.

use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use dashmap::DashMap;
use time::OffsetDateTime;

use marquee_core::{Auditorium, Cinema, Paging, Show};
use marquee_storage::{
    AuditoriumCreate, AuditoriumStore, CinemaCreate, CinemaStore, ShowCreate, ShowStore,
    StoreResult,
};

fn page<T: Clone>(mut items: Vec<(i64, T)>, paging: &Paging) -> (Vec<T>, u64) {
    items.sort_by_key(|(id, _)| *id);
    let total = items.len() as u64;
    let page = items
        .into_iter()
        .skip(paging.offset())
        .take(paging.limit as usize)
        .map(|(_, item)| item)
        .collect();
    (page, total)
}

// =============================================================================
// Cinemas
// =============================================================================

/// Concurrent in-memory cinema store.
pub struct MemoryCinemaStore {
    cinemas: DashMap<i64, Cinema>,
    next_id: AtomicI64,
}

impl MemoryCinemaStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            cinemas: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryCinemaStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CinemaStore for MemoryCinemaStore {
    async fn list(&self, paging: &Paging) -> StoreResult<(Vec<Cinema>, u64)> {
        let items = self
            .cinemas
            .iter()
            .map(|entry| (entry.id, entry.clone()))
            .collect();
        Ok(page(items, paging))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Cinema>> {
        Ok(self.cinemas.get(&id).map(|c| c.clone()))
    }

    async fn find_by_name(&self, name: &str) -> StoreResult<Option<Cinema>> {
        Ok(self
            .cinemas
            .iter()
            .find(|entry| entry.name == name)
            .map(|entry| entry.clone()))
    }

    async fn create(&self, input: CinemaCreate) -> StoreResult<Cinema> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let cinema = Cinema {
            id,
            public_id: None,
            owner_id: input.owner_id,
            owner: None,
            name: input.name,
            address: input.address,
            capacity: input.capacity,
            email: input.email,
            phone_number: input.phone_number,
            created_at: OffsetDateTime::now_utc(),
        };
        self.cinemas.insert(id, cinema.clone());
        Ok(cinema)
    }
}

// =============================================================================
// Auditoriums
// =============================================================================

/// Concurrent in-memory auditorium store.
pub struct MemoryAuditoriumStore {
    auditoriums: DashMap<i64, Auditorium>,
    next_id: AtomicI64,
}

impl MemoryAuditoriumStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            auditoriums: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryAuditoriumStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AuditoriumStore for MemoryAuditoriumStore {
    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Auditorium>> {
        Ok(self.auditoriums.get(&id).map(|a| a.clone()))
    }

    async fn list_by_cinema(&self, cinema_id: i64) -> StoreResult<Vec<Auditorium>> {
        let mut rooms: Vec<Auditorium> = self
            .auditoriums
            .iter()
            .filter(|entry| entry.cinema_id == cinema_id)
            .map(|entry| entry.clone())
            .collect();
        rooms.sort_by_key(|a| a.id);
        Ok(rooms)
    }

    async fn create(&self, input: AuditoriumCreate) -> StoreResult<Auditorium> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let auditorium = Auditorium {
            id,
            public_id: None,
            name: input.name,
            seats: input.seats,
            cinema_id: input.cinema_id,
            cinema: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.auditoriums.insert(id, auditorium.clone());
        Ok(auditorium)
    }
}

// =============================================================================
// Shows
// =============================================================================

/// Concurrent in-memory show store.
pub struct MemoryShowStore {
    shows: DashMap<i64, Show>,
    next_id: AtomicI64,
}

impl MemoryShowStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self {
            shows: DashMap::new(),
            next_id: AtomicI64::new(1),
        }
    }
}

impl Default for MemoryShowStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ShowStore for MemoryShowStore {
    async fn list(&self, paging: &Paging) -> StoreResult<(Vec<Show>, u64)> {
        let items = self
            .shows
            .iter()
            .map(|entry| (entry.id, entry.clone()))
            .collect();
        Ok(page(items, paging))
    }

    async fn find_by_id(&self, id: i64) -> StoreResult<Option<Show>> {
        Ok(self.shows.get(&id).map(|s| s.clone()))
    }

    async fn create(&self, input: ShowCreate) -> StoreResult<Show> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let show = Show {
            id,
            public_id: None,
            imdb_id: input.imdb_id,
            starts_at: input.starts_at,
            ends_at: input.ends_at,
            auditorium_id: input.auditorium_id,
            auditorium: None,
            created_at: OffsetDateTime::now_utc(),
        };
        self.shows.insert(id, show.clone());
        Ok(show)
    }
}

// =============================================================================
// Tests
// =============================================================================
