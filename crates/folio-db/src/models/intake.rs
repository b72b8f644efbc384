//! Visitor intake rows: contact-form submissions and newsletter signups.
//!
//! Both are append-only; there is no update workflow.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;

/// A contact-form submission
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Signup {
	pub id: i64,
	pub name: String,
	pub email: Option<String>,
	pub subject: String,
	pub timestamp: DateTime<Utc>,
	pub message: Option<String>,
}

/// Fields accepted from the public contact form.
///
/// `name` and `subject` stay optional here even though their columns are
/// NOT NULL: an absent field binds NULL and the schema rejects the row,
/// which is the only validation the intake path performs.
#[derive(Debug, Clone)]
pub struct NewSignup {
	pub name: Option<String>,
	pub email: Option<String>,
	pub subject: Option<String>,
	pub timestamp: DateTime<Utc>,
	pub message: Option<String>,
}

/// A newsletter subscription; emails are deliberately not deduplicated
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Subscriber {
	pub id: i64,
	pub email: Option<String>,
}
