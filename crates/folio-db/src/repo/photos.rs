//! Photo/media attachment records. The storage path is generated by the
//! media layer, never taken from user input.

use chrono::Utc;
use folio_core::{Error, Result};
use sqlx::SqlitePool;

use crate::models::{NewPhoto, PhotoModel};

const COLUMNS: &str = "id, name, path, kind, created_at, post_id";

pub async fn create(pool: &SqlitePool, new: &NewPhoto) -> Result<PhotoModel> {
	let photo = sqlx::query_as::<_, PhotoModel>(
		"INSERT INTO photomodels (name, path, kind, created_at, post_id) \
		 VALUES (?, ?, ?, ?, ?) \
		 RETURNING id, name, path, kind, created_at, post_id",
	)
	.bind(&new.name)
	.bind(&new.path)
	.bind(&new.kind)
	.bind(Utc::now())
	.bind(new.post_id)
	.fetch_one(pool)
	.await?;
	Ok(photo)
}

pub async fn get(pool: &SqlitePool, id: i64) -> Result<Option<PhotoModel>> {
	let photo =
		sqlx::query_as::<_, PhotoModel>(&format!("SELECT {COLUMNS} FROM photomodels WHERE id = ?"))
			.bind(id)
			.fetch_optional(pool)
			.await?;
	Ok(photo)
}

pub async fn list(pool: &SqlitePool) -> Result<Vec<PhotoModel>> {
	let photos = sqlx::query_as::<_, PhotoModel>(&format!(
		"SELECT {COLUMNS} FROM photomodels ORDER BY id"
	))
	.fetch_all(pool)
	.await?;
	Ok(photos)
}

/// The post's single attached photo, when one exists (zero or one)
pub async fn for_post(pool: &SqlitePool, post_id: i64) -> Result<Option<PhotoModel>> {
	let photo = sqlx::query_as::<_, PhotoModel>(&format!(
		"SELECT {COLUMNS} FROM photomodels WHERE post_id = ? LIMIT 1"
	))
	.bind(post_id)
	.fetch_optional(pool)
	.await?;
	Ok(photo)
}

/// Update metadata and post linkage. The storage path and kind are only
/// ever replaced by a fresh upload, handled by the media layer.
pub async fn update_meta(
	pool: &SqlitePool,
	id: i64,
	name: &str,
	post_id: Option<i64>,
) -> Result<PhotoModel> {
	sqlx::query_as::<_, PhotoModel>(
		"UPDATE photomodels SET name = ?, post_id = ? WHERE id = ? \
		 RETURNING id, name, path, kind, created_at, post_id",
	)
	.bind(name)
	.bind(post_id)
	.bind(id)
	.fetch_optional(pool)
	.await?
	.ok_or_else(|| Error::NotFound("photo".to_string()))
}

/// Replace the stored file reference after a new upload
pub async fn update_media(
	pool: &SqlitePool,
	id: i64,
	name: &str,
	path: &str,
	kind: &str,
	post_id: Option<i64>,
) -> Result<PhotoModel> {
	sqlx::query_as::<_, PhotoModel>(
		"UPDATE photomodels SET name = ?, path = ?, kind = ?, post_id = ? WHERE id = ? \
		 RETURNING id, name, path, kind, created_at, post_id",
	)
	.bind(name)
	.bind(path)
	.bind(kind)
	.bind(post_id)
	.bind(id)
	.fetch_optional(pool)
	.await?
	.ok_or_else(|| Error::NotFound("photo".to_string()))
}

/// Delete the record, returning the storage path for best-effort unlink
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Option<String>> {
	let path: Option<String> = sqlx::query_scalar("SELECT path FROM photomodels WHERE id = ?")
		.bind(id)
		.fetch_optional(pool)
		.await?;
	sqlx::query("DELETE FROM photomodels WHERE id = ?")
		.bind(id)
		.execute(pool)
		.await?;
	Ok(path.filter(|p| !p.is_empty()))
}
