//! Type-tagged opaque public identifiers.
//!
//! Numeric row ids are never sent to clients directly: they leak row counts
//! and make every entity enumerable. Instead, each outward id is encoded as a
//! short string that embeds the entity kind, a bijectively mixed form of the
//! id, and an integrity check. Decoding with the wrong expected kind fails
//! closed rather than returning an id from another entity namespace.
//!
//! Encoding is a pure function over `(EntityKind, non-negative id)`: no
//! counters, no I/O, safe to call concurrently from any task.
//!
//! # Example
//!
//! ```
//! use marquee_core::uid::{EntityKind, OpaqueId};
//!
//! let public = OpaqueId::encode(EntityKind::Cinema, 42);
//! assert_eq!(public.decode(EntityKind::Cinema), Ok(42));
//! assert!(public.decode(EntityKind::Auditorium).is_err());
//! ```

use std::fmt;

use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Wire format version byte.
const VERSION: u8 = 1;

/// Raw payload length before base64: version(1) + kind(1) + mixed id(8) + check(2).
const RAW_LEN: usize = 12;

/// Domain separator for the integrity check.
const CHECK_DOMAIN: &[u8] = b"marquee.uid";

// =============================================================================
// Entity Kind
// =============================================================================

/// Entity namespaces covered by the codec.
///
/// Movies key on an external string id (`imdb_id`) and are outside the
/// codec's domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum EntityKind {
    Cinema = 1,
    User = 2,
    Auditorium = 3,
    Show = 4,
}

impl EntityKind {
    /// The wire code embedded in encoded identifiers.
    #[must_use]
    pub fn code(self) -> u8 {
        self as u8
    }

    fn from_code(code: u8) -> Option<Self> {
        match code {
            1 => Some(Self::Cinema),
            2 => Some(Self::User),
            3 => Some(Self::Auditorium),
            4 => Some(Self::Show),
            _ => None,
        }
    }

    /// Human-readable entity name, used in error messages.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Cinema => "Cinema",
            Self::User => "User",
            Self::Auditorium => "Auditorium",
            Self::Show => "Show",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Errors produced when decoding a public identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum UidError {
    /// The identifier is not a value this codec ever produced.
    #[error("malformed identifier")]
    Malformed,

    /// The identifier belongs to a different entity namespace.
    #[error("identifier belongs to {found}, expected {expected}")]
    KindMismatch {
        /// The kind the caller expected.
        expected: EntityKind,
        /// The kind embedded in the identifier.
        found: EntityKind,
    },

    /// The embedded integrity check does not match the payload.
    #[error("identifier failed integrity check")]
    ChecksumMismatch,
}

// =============================================================================
// Opaque Identifier
// =============================================================================

/// A public identifier standing in for an internal numeric key.
///
/// The mapping is a bijection for a fixed `(kind, id)` pair: identical inputs
/// always produce identical strings, and sequential ids do not produce
/// adjacent strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OpaqueId(String);

impl OpaqueId {
    /// Encodes an entity kind and a non-negative numeric id.
    ///
    /// Deterministic and side-effect free. Ids are store-assigned and
    /// non-negative; a negative id is a caller bug.
    #[must_use]
    pub fn encode(kind: EntityKind, id: i64) -> Self {
        debug_assert!(id >= 0, "entity ids are non-negative");

        let mixed = mix64((id as u64) ^ kind_salt(kind));

        let mut raw = [0u8; RAW_LEN];
        raw[0] = VERSION;
        raw[1] = kind.code();
        raw[2..10].copy_from_slice(&mixed.to_be_bytes());
        raw[10..12].copy_from_slice(&checksum(kind, mixed));

        Self(URL_SAFE_NO_PAD.encode(raw))
    }

    /// Decodes the identifier, expecting a specific entity kind.
    ///
    /// # Errors
    ///
    /// Fails when the identifier is malformed, fails the integrity check, or
    /// was produced for a kind other than `expected`.
    pub fn decode(&self, expected: EntityKind) -> Result<i64, UidError> {
        let raw = URL_SAFE_NO_PAD
            .decode(&self.0)
            .map_err(|_| UidError::Malformed)?;

        if raw.len() != RAW_LEN || raw[0] != VERSION {
            return Err(UidError::Malformed);
        }

        let found = EntityKind::from_code(raw[1]).ok_or(UidError::Malformed)?;
        if found != expected {
            return Err(UidError::KindMismatch { expected, found });
        }

        let mut mixed_bytes = [0u8; 8];
        mixed_bytes.copy_from_slice(&raw[2..10]);
        let mixed = u64::from_be_bytes(mixed_bytes);

        if raw[10..12] != checksum(found, mixed) {
            return Err(UidError::ChecksumMismatch);
        }

        let id = unmix64(mixed) ^ kind_salt(found);
        if id > i64::MAX as u64 {
            return Err(UidError::Malformed);
        }
        Ok(id as i64)
    }

    /// The encoded string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OpaqueId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for OpaqueId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for OpaqueId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Decodes a public identifier string, expecting a specific entity kind.
///
/// Convenience for request paths where the identifier arrives as a plain
/// string.
///
/// # Errors
///
/// Same failure modes as [`OpaqueId::decode`].
pub fn decode_public_id(kind: EntityKind, value: &str) -> Result<i64, UidError> {
    OpaqueId::from(value).decode(kind)
}

// =============================================================================
// Mixing
// =============================================================================

/// Per-kind salt so the same row id yields unrelated strings across kinds.
fn kind_salt(kind: EntityKind) -> u64 {
    (kind.code() as u64).wrapping_mul(0x9e37_79b9_7f4a_7c15)
}

/// Bijective 64-bit finalizer (xor-shift/multiply rounds).
///
/// Sequential inputs land far apart in the output space, which keeps encoded
/// identifiers non-enumerable from adjacent row ids.
fn mix64(mut z: u64) -> u64 {
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    z ^ (z >> 31)
}

/// Inverse of [`mix64`].
fn unmix64(mut z: u64) -> u64 {
    z = undo_shift_xor(z, 31);
    z = z.wrapping_mul(0x3196_42b2_d24d_8ec3);
    z = undo_shift_xor(z, 27);
    z = z.wrapping_mul(0x96de_1b17_3f11_9089);
    undo_shift_xor(z, 30)
}

/// Inverts `x ^ (x >> shift)`.
fn undo_shift_xor(value: u64, shift: u32) -> u64 {
    let mut x = value;
    let mut applied = shift;
    while applied < 64 {
        x = value ^ (x >> shift);
        applied += shift;
    }
    x
}

/// Truncated SHA-256 over the versioned payload.
fn checksum(kind: EntityKind, mixed: u64) -> [u8; 2] {
    let mut hasher = Sha256::new();
    hasher.update([VERSION, kind.code()]);
    hasher.update(mixed.to_be_bytes());
    hasher.update(CHECK_DOMAIN);
    let digest = hasher.finalize();
    [digest[0], digest[1]]
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_KINDS: [EntityKind; 4] = [
        EntityKind::Cinema,
        EntityKind::User,
        EntityKind::Auditorium,
        EntityKind::Show,
    ];

    #[test]
    fn test_mix64_roundtrip() {
        for z in [0, 1, 2, 42, u64::from(u32::MAX), i64::MAX as u64, u64::MAX] {
            assert_eq!(unmix64(mix64(z)), z);
        }
    }

    #[test]
    fn test_encode_decode_roundtrip() {
        for kind in ALL_KINDS {
            for id in [0i64, 1, 42, 1_000_000, i64::MAX] {
                let public = OpaqueId::encode(kind, id);
                assert_eq!(public.decode(kind), Ok(id), "kind={kind} id={id}");
            }
        }
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let a = OpaqueId::encode(EntityKind::User, 42);
        let b = OpaqueId::encode(EntityKind::User, 42);
        assert_eq!(a, b);
    }

    #[test]
    fn test_wrong_kind_fails_closed() {
        let public = OpaqueId::encode(EntityKind::User, 42);
        let err = public.decode(EntityKind::Cinema).unwrap_err();
        assert_eq!(
            err,
            UidError::KindMismatch {
                expected: EntityKind::Cinema,
                found: EntityKind::User,
            }
        );
    }

    #[test]
    fn test_same_id_differs_across_kinds() {
        let cinema = OpaqueId::encode(EntityKind::Cinema, 7);
        let user = OpaqueId::encode(EntityKind::User, 7);
        assert_ne!(cinema, user);
    }

    #[test]
    fn test_sequential_ids_are_not_adjacent() {
        // Encodings of consecutive ids should differ in most positions, not
        // just a trailing character.
        let a = OpaqueId::encode(EntityKind::Cinema, 100);
        let b = OpaqueId::encode(EntityKind::Cinema, 101);
        let differing = a
            .as_str()
            .bytes()
            .zip(b.as_str().bytes())
            .filter(|(x, y)| x != y)
            .count();
        assert!(differing > 4, "only {differing} bytes differ");
    }

    #[test]
    fn test_malformed_inputs_rejected() {
        for bad in ["", "not base64 ***", "AAAA", "zzzzzzzzzzzzzzzzzzzzzzzz"] {
            assert!(
                decode_public_id(EntityKind::Cinema, bad).is_err(),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn test_tampered_payload_fails_integrity_check() {
        let public = OpaqueId::encode(EntityKind::Show, 9);
        let mut raw = URL_SAFE_NO_PAD.decode(public.as_str()).unwrap();
        raw[5] ^= 0xff;
        let tampered = OpaqueId::from(URL_SAFE_NO_PAD.encode(&raw));
        assert_eq!(
            tampered.decode(EntityKind::Show),
            Err(UidError::ChecksumMismatch)
        );
    }

    #[test]
    fn test_end_to_end_user_42() {
        let public = OpaqueId::encode(EntityKind::User, 42);
        assert_eq!(public.decode(EntityKind::User), Ok(42));
        assert!(public.decode(EntityKind::Cinema).is_err());
    }
}
