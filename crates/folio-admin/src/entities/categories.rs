//! Category administration.

use async_trait::async_trait;
use folio_core::{Error, Result};
use folio_db::repo::categories;
use sqlx::SqlitePool;

use crate::forms::{FormData, FormField};
use crate::media::MediaStorage;
use crate::model::{AdminRow, ModelAdmin};

pub struct CategoryAdmin;

#[async_trait]
impl ModelAdmin for CategoryAdmin {
	fn slug(&self) -> &'static str {
		"categories"
	}

	fn title(&self) -> &'static str {
		"Categories"
	}

	fn columns(&self) -> &'static [&'static str] {
		&["Title", "Slug"]
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>> {
		let rows = categories::list(pool)
			.await?
			.into_iter()
			.map(|c| AdminRow {
				id: c.id,
				cells: vec![c.title, c.slug],
			})
			.collect();
		Ok(rows)
	}

	async fn blank_form(&self, _pool: &SqlitePool) -> Result<Vec<FormField>> {
		Ok(vec![FormField::text("title", "Title")])
	}

	async fn edit_form(&self, pool: &SqlitePool, id: i64) -> Result<Vec<FormField>> {
		let category = categories::get(pool, id)
			.await?
			.ok_or_else(|| Error::NotFound("category".to_string()))?;
		Ok(vec![FormField::text("title", "Title").with_value(category.title)])
	}

	async fn save(
		&self,
		pool: &SqlitePool,
		id: Option<i64>,
		form: &FormData,
		_storage: &MediaStorage,
	) -> Result<Option<String>> {
		let title = form.value("title");
		match id {
			None => categories::create(pool, title).await?,
			Some(id) => categories::retitle(pool, id, title).await?,
		};
		Ok(None)
	}

	async fn delete(&self, pool: &SqlitePool, id: i64, _storage: &MediaStorage) -> Result<()> {
		categories::delete(pool, id).await
	}
}
