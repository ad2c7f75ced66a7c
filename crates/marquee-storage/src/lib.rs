//! # marquee-storage
//!
//! Storage trait seams for the Marquee catalog entities.
//!
//! The relational database is an external collaborator: this crate defines
//! the interfaces the rest of the system programs against, plus the storage
//! error taxonomy. Backends (in-memory, SQL) live in their own crates.

pub mod error;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use traits::{
    AuditoriumCreate, AuditoriumStore, CinemaCreate, CinemaStore, ShowCreate, ShowStore,
};
