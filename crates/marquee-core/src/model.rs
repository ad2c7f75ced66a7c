//! Outward-facing entity types and the masking step.
//!
//! Every entity returned to clients carries its raw numeric id in a field
//! that is never serialized, plus a `public_id` slot serialized as `"id"`.
//! [`Mask::mask`] fills that slot through the opaque identifier codec and
//! recurses depth-first into owned entities, so a fully masked graph never
//! exposes a row id. Masking an already-masked entity simply recomputes the
//! same string, which makes the step idempotent.
//!
//! The ownership graph is a tree in this domain (Show -> Auditorium ->
//! SimpleCinema, Cinema -> SimpleUser). If a schema change ever introduces a
//! cycle, masking must grow a visited set keyed by (kind, id).

use serde::Serialize;
use time::OffsetDateTime;

use crate::uid::{EntityKind, OpaqueId};

/// Recursive public-identifier masking.
///
/// `privileged` is propagated through the graph for viewer-dependent
/// redaction; no entity currently attaches field redaction to it.
pub trait Mask {
    /// Replaces the numeric id with an opaque identifier and masks every
    /// owned entity. Safe to call more than once per serialization pass.
    fn mask(&mut self, privileged: bool);
}

// =============================================================================
// Users
// =============================================================================

/// Public view of a user, as nested under owned entities and returned from
/// profile endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct SimpleUser {
    /// Numeric row id; never serialized.
    #[serde(skip)]
    pub id: i64,

    /// Opaque identifier, filled by [`Mask::mask`].
    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<OpaqueId>,

    pub name: String,
    pub email: String,
    pub role: String,
}

impl Mask for SimpleUser {
    fn mask(&mut self, _privileged: bool) {
        self.public_id = Some(OpaqueId::encode(EntityKind::User, self.id));
    }
}

// =============================================================================
// Cinemas
// =============================================================================

/// A cinema with its owner attached.
#[derive(Debug, Clone, Serialize)]
pub struct Cinema {
    #[serde(skip)]
    pub id: i64,

    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<OpaqueId>,

    #[serde(skip)]
    pub owner_id: i64,

    /// Owning user, hydrated by handlers before masking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owner: Option<SimpleUser>,

    pub name: String,
    pub address: String,
    pub capacity: i32,
    pub email: String,
    pub phone_number: String,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Mask for Cinema {
    fn mask(&mut self, privileged: bool) {
        self.public_id = Some(OpaqueId::encode(EntityKind::Cinema, self.id));
        if let Some(owner) = &mut self.owner {
            owner.mask(privileged);
        }
    }
}

/// Trimmed cinema view nested under auditoriums.
#[derive(Debug, Clone, Serialize)]
pub struct SimpleCinema {
    #[serde(skip)]
    pub id: i64,

    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<OpaqueId>,

    #[serde(skip)]
    pub owner_id: i64,

    pub name: String,
}

impl Mask for SimpleCinema {
    fn mask(&mut self, _privileged: bool) {
        self.public_id = Some(OpaqueId::encode(EntityKind::Cinema, self.id));
    }
}

impl From<&Cinema> for SimpleCinema {
    fn from(cinema: &Cinema) -> Self {
        Self {
            id: cinema.id,
            public_id: None,
            owner_id: cinema.owner_id,
            name: cinema.name.clone(),
        }
    }
}

// =============================================================================
// Auditoriums
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Auditorium {
    #[serde(skip)]
    pub id: i64,

    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<OpaqueId>,

    pub name: String,
    pub seats: i32,

    #[serde(skip)]
    pub cinema_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub cinema: Option<SimpleCinema>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Mask for Auditorium {
    fn mask(&mut self, privileged: bool) {
        self.public_id = Some(OpaqueId::encode(EntityKind::Auditorium, self.id));
        if let Some(cinema) = &mut self.cinema {
            cinema.mask(privileged);
        }
    }
}

// =============================================================================
// Shows
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct Show {
    #[serde(skip)]
    pub id: i64,

    #[serde(rename = "id", skip_serializing_if = "Option::is_none")]
    pub public_id: Option<OpaqueId>,

    /// External movie reference; movies key on IMDB ids, not row ids.
    pub imdb_id: String,

    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,

    #[serde(with = "time::serde::rfc3339")]
    pub ends_at: OffsetDateTime,

    #[serde(skip)]
    pub auditorium_id: i64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub auditorium: Option<Auditorium>,

    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Mask for Show {
    fn mask(&mut self, privileged: bool) {
        self.public_id = Some(OpaqueId::encode(EntityKind::Show, self.id));
        if let Some(auditorium) = &mut self.auditorium {
            auditorium.mask(privileged);
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
