//! Connection pool construction and embedded migrations.

use std::str::FromStr;

use folio_core::{Error, Result};
use sqlx::migrate::Migrator;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

/// Schema migrations compiled into the binary
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Open a pool for the given SQLite URL and bring the schema up to date.
///
/// Foreign keys are switched on per connection; the cascade policies in
/// the schema rely on it.
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str(database_url)?
		.create_if_missing(true)
		.foreign_keys(true);
	let pool = SqlitePoolOptions::new().connect_with(options).await?;
	run_migrations(&pool).await?;
	Ok(pool)
}

/// Open an in-memory database, used by the test suites.
///
/// Limited to a single connection: every SQLite `:memory:` connection
/// is otherwise a separate empty database.
pub async fn connect_in_memory() -> Result<SqlitePool> {
	let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
	let pool = SqlitePoolOptions::new()
		.max_connections(1)
		.connect_with(options)
		.await?;
	run_migrations(&pool).await?;
	Ok(pool)
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
	MIGRATOR
		.run(pool)
		.await
		.map_err(|e| Error::Config(format!("migration failed: {}", e)))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn migrations_create_all_tables() {
		let pool = connect_in_memory().await.unwrap();
		let tables: Vec<String> = sqlx::query_scalar(
			"SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name",
		)
		.fetch_all(&pool)
		.await
		.unwrap();

		for expected in [
			"categories",
			"photomodels",
			"post_tags",
			"posts",
			"role",
			"roles_users",
			"signups",
			"subscribers",
			"tags",
			"user",
		] {
			assert!(tables.iter().any(|t| t == expected), "missing {expected}");
		}
	}
}
