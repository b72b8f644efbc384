//! Tags with name-derived slugs.

use folio_core::{Error, Result, slugify};
use sqlx::SqlitePool;

use crate::models::Tag;

pub async fn create(pool: &SqlitePool, name: &str) -> Result<Tag> {
	let tag = sqlx::query_as::<_, Tag>(
		"INSERT INTO tags (name, slug) VALUES (?, ?) RETURNING id, name, slug",
	)
	.bind(name)
	.bind(slugify(name))
	.fetch_one(pool)
	.await?;
	Ok(tag)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Tag>> {
	let tag = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE id = ?")
		.bind(id)
		.fetch_optional(pool)
		.await?;
	Ok(tag)
}

pub async fn by_name(pool: &SqlitePool, name: &str) -> Result<Option<Tag>> {
	let tag = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags WHERE name = ?")
		.bind(name)
		.fetch_optional(pool)
		.await?;
	Ok(tag)
}

/// Fetch a tag by name, creating it when absent
pub async fn ensure(pool: &SqlitePool, name: &str) -> Result<Tag> {
	if let Some(tag) = by_name(pool, name).await? {
		return Ok(tag);
	}
	create(pool, name).await
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Tag>> {
	let tags = sqlx::query_as::<_, Tag>("SELECT id, name, slug FROM tags ORDER BY id")
		.fetch_all(pool)
		.await?;
	Ok(tags)
}

/// Change the name; the slug is recomputed with it
pub async fn rename(pool: &SqlitePool, id: i64, name: &str) -> Result<Tag> {
	sqlx::query_as::<_, Tag>(
		"UPDATE tags SET name = ?, slug = ? WHERE id = ? RETURNING id, name, slug",
	)
	.bind(name)
	.bind(slugify(name))
	.bind(id)
	.fetch_optional(pool)
	.await?
	.ok_or_else(|| Error::NotFound("tag".to_string()))
}

/// Delete a tag; its join rows cascade, posts are untouched
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
	sqlx::query("DELETE FROM tags WHERE id = ?")
		.bind(id)
		.execute(pool)
		.await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn slug_follows_name() {
		let pool = crate::connect_in_memory().await.unwrap();
		let tag = create(&pool, "web dev").await.unwrap();
		assert_eq!(tag.slug, "web-dev");

		let renamed = rename(&pool, tag.id, "web/ops").await.unwrap();
		assert_eq!(renamed.slug, "web-ops");
	}

	#[tokio::test]
	async fn ensure_is_idempotent_by_name() {
		let pool = crate::connect_in_memory().await.unwrap();
		let first = ensure(&pool, "rust").await.unwrap();
		let second = ensure(&pool, "rust").await.unwrap();
		assert_eq!(first.id, second.id);
		assert_eq!(list(&pool).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn names_with_identical_slugs_collide() {
		let pool = crate::connect_in_memory().await.unwrap();
		create(&pool, "a b").await.unwrap();
		let err = create(&pool, "a!b").await.unwrap_err();
		assert!(err.is_unique_violation());
	}
}
