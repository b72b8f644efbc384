//! Newsletter subscribers: read and housekeeping-delete only.

use async_trait::async_trait;
use folio_core::Result;
use folio_db::repo::subscribers;
use sqlx::SqlitePool;

use crate::media::MediaStorage;
use crate::model::{AdminRow, ModelAdmin};

pub struct SubscriberAdmin;

#[async_trait]
impl ModelAdmin for SubscriberAdmin {
	fn slug(&self) -> &'static str {
		"subscribers"
	}

	fn title(&self) -> &'static str {
		"Subscribers"
	}

	fn columns(&self) -> &'static [&'static str] {
		&["Email"]
	}

	fn append_only(&self) -> bool {
		true
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>> {
		let rows = subscribers::list(pool)
			.await?
			.into_iter()
			.map(|s| AdminRow {
				id: s.id,
				cells: vec![s.email.unwrap_or_default()],
			})
			.collect();
		Ok(rows)
	}

	async fn delete(&self, pool: &SqlitePool, id: i64, _storage: &MediaStorage) -> Result<()> {
		subscribers::delete(pool, id).await
	}
}
