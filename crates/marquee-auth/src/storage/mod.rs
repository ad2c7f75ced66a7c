//! Storage traits for identity data.

mod user;

pub use user::{Role, User, UserBuilder, UserPatch, UserStore};
