//! Contact-form submissions: read and housekeeping-delete only.

use async_trait::async_trait;
use folio_core::Result;
use folio_db::repo::signups;
use sqlx::SqlitePool;

use crate::media::MediaStorage;
use crate::model::{AdminRow, ModelAdmin};

pub struct SignupAdmin;

#[async_trait]
impl ModelAdmin for SignupAdmin {
	fn slug(&self) -> &'static str {
		"signups"
	}

	fn title(&self) -> &'static str {
		"Contact submissions"
	}

	fn columns(&self) -> &'static [&'static str] {
		&["Name", "Email", "Subject", "Received"]
	}

	fn append_only(&self) -> bool {
		true
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>> {
		let rows = signups::list(pool)
			.await?
			.into_iter()
			.map(|s| AdminRow {
				id: s.id,
				cells: vec![
					s.name,
					s.email.unwrap_or_default(),
					s.subject,
					s.timestamp.to_rfc3339(),
				],
			})
			.collect();
		Ok(rows)
	}

	async fn delete(&self, pool: &SqlitePool, id: i64, _storage: &MediaStorage) -> Result<()> {
		signups::delete(pool, id).await
	}
}
