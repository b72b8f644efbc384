//! Row types for every entity.
//!
//! These are snapshots of persisted state. Derived fields (slugs) are
//! computed by the repositories; nothing here mutates a slug directly.

pub mod content;
pub mod identity;
pub mod intake;

pub use content::{Category, NewPhoto, NewPost, PhotoModel, Post, Tag, UpdatePost};
pub use identity::{Role, User};
pub use intake::{NewSignup, Signup, Subscriber};
