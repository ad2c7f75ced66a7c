//! # marquee-core
//!
//! Core domain types for the Marquee ticket-booking server.
//!
//! This crate provides:
//! - The outward-facing entity model (cinemas, auditoriums, shows, users)
//! - The opaque public identifier codec that hides numeric row ids
//! - The recursive [`Mask`] step applied to entities before serialization
//! - Paging parameters shared by list endpoints
//!
//! ## Modules
//!
//! - [`model`] - Entity types and the `Mask` capability
//! - [`paging`] - Page/limit normalization for list endpoints
//! - [`uid`] - Type-tagged opaque identifier encoding and decoding

pub mod model;
pub mod paging;
pub mod uid;

pub use model::{Auditorium, Cinema, Mask, Show, SimpleCinema, SimpleUser};
pub use paging::Paging;
pub use uid::{EntityKind, OpaqueId, UidError, decode_public_id};
