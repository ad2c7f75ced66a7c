//! Request handlers.
//!
//! Handlers stay thin: decode public identifiers at the edge, call the
//! stores, hydrate one level of the ownership graph, then mask before
//! serialization. Responses use the `{"data": ...}` envelope.

pub mod auditoriums;
pub mod cinemas;
pub mod shows;
pub mod system;
pub mod users;

use marquee_core::Paging;
use serde::Serialize;

/// Single-object response envelope.
#[derive(Debug, Serialize)]
pub struct Data<T> {
    pub data: T,
}

impl<T> Data<T> {
    pub fn new(data: T) -> Self {
        Self { data }
    }
}

/// Paged list response envelope.
#[derive(Debug, Serialize)]
pub struct Paged<T> {
    pub data: Vec<T>,
    pub paging: Paging,
}
