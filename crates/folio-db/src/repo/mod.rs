//! Per-entity repositories.
//!
//! Thin async functions over the pool; consistency (slug and email
//! uniqueness, foreign-key integrity) is enforced by the relational
//! layer, not re-checked here. Concurrent writers racing to the same
//! slug are resolved by the UNIQUE constraint, and the loser receives
//! [`folio_core::Error::UniqueViolation`].

pub mod categories;
pub mod photos;
pub mod posts;
pub mod signups;
pub mod subscribers;
pub mod tags;
pub mod users;
