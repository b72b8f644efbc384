//! Tag administration.

use async_trait::async_trait;
use folio_core::{Error, Result};
use folio_db::repo::tags;
use sqlx::SqlitePool;

use crate::forms::{FormData, FormField};
use crate::media::MediaStorage;
use crate::model::{AdminRow, ModelAdmin};

pub struct TagAdmin;

#[async_trait]
impl ModelAdmin for TagAdmin {
	fn slug(&self) -> &'static str {
		"tags"
	}

	fn title(&self) -> &'static str {
		"Tags"
	}

	fn columns(&self) -> &'static [&'static str] {
		&["Name", "Slug"]
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>> {
		let rows = tags::list(pool)
			.await?
			.into_iter()
			.map(|t| AdminRow {
				id: t.id,
				cells: vec![t.name, t.slug],
			})
			.collect();
		Ok(rows)
	}

	async fn blank_form(&self, _pool: &SqlitePool) -> Result<Vec<FormField>> {
		Ok(vec![FormField::text("name", "Name")])
	}

	async fn edit_form(&self, pool: &SqlitePool, id: i64) -> Result<Vec<FormField>> {
		let tag = tags::get(pool, id)
			.await?
			.ok_or_else(|| Error::NotFound("tag".to_string()))?;
		Ok(vec![FormField::text("name", "Name").with_value(tag.name)])
	}

	async fn save(
		&self,
		pool: &SqlitePool,
		id: Option<i64>,
		form: &FormData,
		_storage: &MediaStorage,
	) -> Result<Option<String>> {
		let name = form.value("name");
		match id {
			None => tags::create(pool, name).await?,
			Some(id) => tags::rename(pool, id, name).await?,
		};
		Ok(None)
	}

	async fn delete(&self, pool: &SqlitePool, id: i64, _storage: &MediaStorage) -> Result<()> {
		tags::delete(pool, id).await
	}
}
