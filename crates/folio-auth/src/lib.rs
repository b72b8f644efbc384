//! Identity and access for the admin surface.
//!
//! Argon2 password hashing behind a [`PasswordHasher`] trait, an
//! in-memory cookie session store, an [`AuthService`] facade over the
//! user/role tables, and the [`RoleGuard`] middleware that gates every
//! admin route on a named role.

pub mod guard;
pub mod hasher;
pub mod service;
pub mod sessions;

pub use guard::RoleGuard;
pub use hasher::{Argon2Hasher, PasswordHasher};
pub use service::AuthService;
pub use sessions::{SESSION_COOKIE, Session, SessionStore};
