//! Identity rows used only to gate the admin surface.

use serde::Serialize;
use sqlx::FromRow;

/// A named role; membership is kept in the `roles_users` join table
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Role {
	pub id: i64,
	pub name: String,
	pub description: Option<String>,
}

/// An account that can log in
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
	pub id: i64,
	pub email: String,
	/// Password hash in PHC string format, never the plaintext
	#[serde(skip_serializing)]
	pub password: String,
	pub active: bool,
}
