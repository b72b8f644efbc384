//! Post categories with title-derived slugs.

use folio_core::{Error, Result, slugify};
use sqlx::SqlitePool;

use crate::models::Category;

pub async fn create(pool: &SqlitePool, title: &str) -> Result<Category> {
	let category = sqlx::query_as::<_, Category>(
		"INSERT INTO categories (title, slug) VALUES (?, ?) RETURNING id, title, slug",
	)
	.bind(title)
	.bind(slugify(title))
	.fetch_one(pool)
	.await?;
	Ok(category)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Category>> {
	let category =
		sqlx::query_as::<_, Category>("SELECT id, title, slug FROM categories WHERE id = ?")
			.bind(id)
			.fetch_optional(pool)
			.await?;
	Ok(category)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<Category>> {
	let categories =
		sqlx::query_as::<_, Category>("SELECT id, title, slug FROM categories ORDER BY id")
			.fetch_all(pool)
			.await?;
	Ok(categories)
}

/// Change the title; the slug is always recomputed with it.
///
/// This is the only way to change a category title, which is what keeps
/// persisted slugs from going stale.
pub async fn retitle(pool: &SqlitePool, id: i64, title: &str) -> Result<Category> {
	sqlx::query_as::<_, Category>(
		"UPDATE categories SET title = ?, slug = ? WHERE id = ? RETURNING id, title, slug",
	)
	.bind(title)
	.bind(slugify(title))
	.bind(id)
	.fetch_optional(pool)
	.await?
	.ok_or_else(|| Error::NotFound("category".to_string()))
}

/// Delete a category. Posts referencing it keep existing with their
/// category cleared (FK ON DELETE SET NULL).
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<()> {
	sqlx::query("DELETE FROM categories WHERE id = ?")
		.bind(id)
		.execute(pool)
		.await?;
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn slug_is_derived_at_creation() {
		let pool = crate::connect_in_memory().await.unwrap();
		let category = create(&pool, "Systems & Networks").await.unwrap();
		assert_eq!(category.slug, "Systems---Networks");
	}

	#[tokio::test]
	async fn empty_title_gives_empty_slug() {
		let pool = crate::connect_in_memory().await.unwrap();
		let category = create(&pool, "").await.unwrap();
		assert_eq!(category.slug, "");
	}

	#[tokio::test]
	async fn duplicate_slug_is_a_unique_violation() {
		let pool = crate::connect_in_memory().await.unwrap();
		create(&pool, "Rust Notes").await.unwrap();
		// different punctuation, identical slug
		let err = create(&pool, "Rust-Notes").await.unwrap_err();
		assert!(err.is_unique_violation(), "got {err:?}");
	}

	#[tokio::test]
	async fn retitle_recomputes_slug() {
		let pool = crate::connect_in_memory().await.unwrap();
		let category = create(&pool, "Old Title").await.unwrap();
		let renamed = retitle(&pool, category.id, "New Title!").await.unwrap();
		assert_eq!(renamed.title, "New Title!");
		assert_eq!(renamed.slug, "New-Title-");
	}

	#[tokio::test]
	async fn retitle_missing_category_is_not_found() {
		let pool = crate::connect_in_memory().await.unwrap();
		let err = retitle(&pool, 99, "Anything").await.unwrap_err();
		assert!(matches!(err, Error::NotFound(_)));
	}
}
