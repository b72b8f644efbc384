//! Content rows: categories, posts, tags and photo attachments.
//!
//! Slug-bearing rows never expose a way to change the source field
//! without recomputing the slug; the repositories' `retitle`/`rename`
//! operations are the only title mutation paths.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A post category with a title-derived slug
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Category {
	pub id: i64,
	pub title: String,
	pub slug: String,
}

/// A blog post
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Post {
	pub id: i64,
	pub title: String,
	pub slug: String,
	pub body: String,
	/// Optional code block shown alongside the body
	pub code: Option<String>,
	pub created_at: DateTime<Utc>,
	pub category_id: Option<i64>,
}

/// Fields for creating a post; the slug is derived, never supplied
#[derive(Debug, Clone, Default)]
pub struct NewPost {
	pub title: String,
	pub body: String,
	pub code: Option<String>,
	pub category_id: Option<i64>,
}

/// Full update of a post; the slug is recomputed from the title
#[derive(Debug, Clone, Default)]
pub struct UpdatePost {
	pub title: String,
	pub body: String,
	pub code: Option<String>,
	pub category_id: Option<i64>,
}

/// A tag with a name-derived slug
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Tag {
	pub id: i64,
	pub name: String,
	pub slug: String,
}

/// An uploaded media file attached to at most one post.
///
/// `path` is the generated storage filename (`<u128-decimal>.<ext>`),
/// never user input; `kind` is the raw extension string as uploaded.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PhotoModel {
	pub id: i64,
	pub name: String,
	pub path: String,
	pub kind: String,
	pub created_at: DateTime<Utc>,
	pub post_id: Option<i64>,
}

/// Fields for creating a photo record
#[derive(Debug, Clone, Default)]
pub struct NewPhoto {
	pub name: String,
	pub path: String,
	pub kind: String,
	pub post_id: Option<i64>,
}
