//! Blog posts: creation, retitling, category/tag lookups and the
//! explicit cascade policy on deletion.

use chrono::Utc;
use folio_core::{Error, Result, slugify};
use sqlx::SqlitePool;

use crate::models::{NewPost, Post, Tag, UpdatePost};

const COLUMNS: &str = "id, title, slug, body, code, created_at, category_id";

pub async fn create(pool: &SqlitePool, new: &NewPost) -> Result<Post> {
	let post = sqlx::query_as::<_, Post>(
		"INSERT INTO posts (title, slug, body, code, created_at, category_id) \
		 VALUES (?, ?, ?, ?, ?, ?) \
		 RETURNING id, title, slug, body, code, created_at, category_id",
	)
	.bind(&new.title)
	.bind(slugify(&new.title))
	.bind(&new.body)
	.bind(&new.code)
	.bind(Utc::now())
	.bind(new.category_id)
	.fetch_one(pool)
	.await?;
	Ok(post)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<Post>> {
	let post = sqlx::query_as::<_, Post>(&format!("SELECT {COLUMNS} FROM posts WHERE id = ?"))
		.bind(id)
		.fetch_optional(pool)
		.await?;
	Ok(post)
}

/// All posts in insertion order (no explicit ordering criterion beyond
/// the primary key)
pub async fn list(pool: &SqlitePool) -> Result<Vec<Post>> {
	let posts = sqlx::query_as::<_, Post>(&format!("SELECT {COLUMNS} FROM posts ORDER BY id"))
		.fetch_all(pool)
		.await?;
	Ok(posts)
}

pub async fn by_category(pool: &SqlitePool, category_id: i64) -> Result<Vec<Post>> {
	let posts = sqlx::query_as::<_, Post>(&format!(
		"SELECT {COLUMNS} FROM posts WHERE category_id = ? ORDER BY id"
	))
	.bind(category_id)
	.fetch_all(pool)
	.await?;
	Ok(posts)
}

pub async fn by_tag(pool: &SqlitePool, tag_id: i64) -> Result<Vec<Post>> {
	let posts = sqlx::query_as::<_, Post>(
		"SELECT p.id, p.title, p.slug, p.body, p.code, p.created_at, p.category_id \
		 FROM posts p JOIN post_tags pt ON pt.post_id = p.id \
		 WHERE pt.tag_id = ? ORDER BY p.id",
	)
	.bind(tag_id)
	.fetch_all(pool)
	.await?;
	Ok(posts)
}

/// Full update; the slug is recomputed from the submitted title, so a
/// retitle can never leave a stale slug behind.
pub async fn update(pool: &SqlitePool, id: i64, upd: &UpdatePost) -> Result<Post> {
	sqlx::query_as::<_, Post>(
		"UPDATE posts SET title = ?, slug = ?, body = ?, code = ?, category_id = ? \
		 WHERE id = ? \
		 RETURNING id, title, slug, body, code, created_at, category_id",
	)
	.bind(&upd.title)
	.bind(slugify(&upd.title))
	.bind(&upd.body)
	.bind(&upd.code)
	.bind(upd.category_id)
	.bind(id)
	.fetch_optional(pool)
	.await?
	.ok_or_else(|| Error::NotFound("post".to_string()))
}

/// Replace the post's tag set with exactly the given tags
pub async fn set_tags(pool: &SqlitePool, post_id: i64, tag_ids: &[i64]) -> Result<()> {
	let mut tx = pool.begin().await?;
	sqlx::query("DELETE FROM post_tags WHERE post_id = ?")
		.bind(post_id)
		.execute(&mut *tx)
		.await?;
	for tag_id in tag_ids {
		sqlx::query("INSERT INTO post_tags (post_id, tag_id) VALUES (?, ?)")
			.bind(post_id)
			.bind(tag_id)
			.execute(&mut *tx)
			.await?;
	}
	tx.commit().await?;
	Ok(())
}

pub async fn tags_for(pool: &SqlitePool, post_id: i64) -> Result<Vec<Tag>> {
	let tags = sqlx::query_as::<_, Tag>(
		"SELECT t.id, t.name, t.slug FROM tags t \
		 JOIN post_tags pt ON pt.tag_id = t.id \
		 WHERE pt.post_id = ? ORDER BY t.id",
	)
	.bind(post_id)
	.fetch_all(pool)
	.await?;
	Ok(tags)
}

/// Delete a post.
///
/// Cascade policy: join rows and the attached photo row go with the
/// post (FK ON DELETE CASCADE); tags and the category survive. Returns
/// the storage path of the attached photo, if there was one, so the
/// caller can unlink the file best-effort — the file write and the row
/// are not transactional.
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Option<String>> {
	let mut tx = pool.begin().await?;
	let photo_path: Option<String> =
		sqlx::query_scalar("SELECT path FROM photomodels WHERE post_id = ?")
			.bind(id)
			.fetch_optional(&mut *tx)
			.await?;
	let result = sqlx::query("DELETE FROM posts WHERE id = ?")
		.bind(id)
		.execute(&mut *tx)
		.await?;
	if result.rows_affected() == 0 {
		return Err(Error::NotFound("post".to_string()));
	}
	tx.commit().await?;
	Ok(photo_path.filter(|p| !p.is_empty()))
}
