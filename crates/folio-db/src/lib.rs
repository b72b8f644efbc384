//! Content data model and repositories.
//!
//! Schema and derived-field rules for the site's entities: visitor
//! intake (Signup, Subscriber), identity (User, Role), and content
//! (Category, Post, Tag, PhotoModel). Slugs are derived from titles at
//! creation and on every retitle; they are never written independently,
//! so a persisted slug can never go stale. Uniqueness is delegated to
//! the relational layer and surfaces as
//! [`folio_core::Error::UniqueViolation`].

pub mod models;
pub mod pool;
pub mod repo;

pub use models::{
	Category, NewPhoto, NewPost, NewSignup, PhotoModel, Post, Role, Signup, Subscriber, Tag,
	UpdatePost, User,
};
pub use pool::{connect, connect_in_memory};
