//! # marquee-db-memory
//!
//! In-memory storage backend for the Marquee server, built on concurrent
//! maps. Implements the `UserStore` trait from `marquee-auth` and the
//! catalog store traits from `marquee-storage`.
//!
//! Used by single-instance deployments and tests; a relational backend plugs
//! into the same traits.

mod catalog;
mod users;

pub use catalog::{MemoryAuditoriumStore, MemoryCinemaStore, MemoryShowStore};
pub use users::MemoryUserStore;
