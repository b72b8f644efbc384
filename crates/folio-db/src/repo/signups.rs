//! Contact-form submissions. Append-only: insert, read, housekeeping
//! delete; no update.

use folio_core::Result;
use sqlx::SqlitePool;

use crate::models::{NewSignup, Signup};

pub async fn create(pool: &SqlitePool, new: &NewSignup) -> Result<Signup> {
	let signup = sqlx::query_as::<_, Signup>(
		"INSERT INTO signups (name, email, subject, timestamp, message) \
		 VALUES (?, ?, ?, ?, ?) \
		 RETURNING id, name, email, subject, timestamp, message",
	)
	.bind(&new.name)
	.bind(&new.email)
	.bind(&new.subject)
	.bind(new.timestamp)
	.bind(&new.message)
	.fetch_one(pool)
	.await?;
	Ok(signup)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Signup>> {
	let signups = sqlx::query_as::<_, Signup>(
		"SELECT id, name, email, subject, timestamp, message FROM signups ORDER BY id",
	)
	.fetch_all(pool)
	.await?;
	Ok(signups)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
	sqlx::query("DELETE FROM signups WHERE id = ?")
		.bind(id)
		.execute(pool)
		.await?;
	Ok(())
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
	let count = sqlx::query_scalar("SELECT COUNT(*) FROM signups")
		.fetch_one(pool)
		.await?;
	Ok(count)
}
