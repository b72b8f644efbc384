//! Newsletter subscriptions. Append-only and deliberately without
//! deduplication: the same email may subscribe twice.

use folio_core::Result;
use sqlx::SqlitePool;

use crate::models::Subscriber;

pub async fn create(pool: &SqlitePool, email: Option<&str>) -> Result<Subscriber> {
	let subscriber = sqlx::query_as::<_, Subscriber>(
		"INSERT INTO subscribers (email) VALUES (?) RETURNING id, email",
	)
	.bind(email)
	.fetch_one(pool)
	.await?;
	Ok(subscriber)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Subscriber>> {
	let subscribers =
		sqlx::query_as::<_, Subscriber>("SELECT id, email FROM subscribers ORDER BY id")
			.fetch_all(pool)
			.await?;
	Ok(subscribers)
}

pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
	sqlx::query("DELETE FROM subscribers WHERE id = ?")
		.bind(id)
		.execute(pool)
		.await?;
	Ok(())
}

pub async fn count(pool: &SqlitePool) -> Result<i64> {
	let count = sqlx::query_scalar("SELECT COUNT(*) FROM subscribers")
		.fetch_one(pool)
		.await?;
	Ok(count)
}
