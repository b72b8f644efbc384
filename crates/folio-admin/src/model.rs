//! The per-entity admin contract.

use async_trait::async_trait;
use folio_core::{Error, Result};
use sqlx::SqlitePool;

use crate::forms::{FormData, FormField};
use crate::media::MediaStorage;

/// One row of an admin list view
#[derive(Debug, Clone, serde::Serialize)]
pub struct AdminRow {
	pub id: i64,
	pub cells: Vec<String>,
}

/// Everything the admin site needs to manage one entity.
///
/// Append-only entities (visitor intake) implement only `rows` and
/// `delete`; the form methods keep their read-only defaults.
#[async_trait]
pub trait ModelAdmin: Send + Sync {
	/// URL segment under `/admin/`
	fn slug(&self) -> &'static str;

	/// Human heading for list pages
	fn title(&self) -> &'static str;

	/// Column headings, matching the order of [`AdminRow::cells`]
	fn columns(&self) -> &'static [&'static str];

	/// True when the entity cannot be created or edited from the admin
	fn append_only(&self) -> bool {
		false
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>>;

	async fn blank_form(&self, _pool: &SqlitePool) -> Result<Vec<FormField>> {
		Err(Error::BadRequest(format!("{} cannot be created", self.slug())))
	}

	async fn edit_form(&self, _pool: &SqlitePool, _id: i64) -> Result<Vec<FormField>> {
		Err(Error::BadRequest(format!("{} cannot be edited", self.slug())))
	}

	/// Create (`id` is `None`) or update. Returns an optional notice to
	/// flash on the list page, used for degraded-but-successful saves
	/// such as a failed file attachment.
	async fn save(
		&self,
		_pool: &SqlitePool,
		_id: Option<i64>,
		_form: &FormData,
		_storage: &MediaStorage,
	) -> Result<Option<String>> {
		Err(Error::BadRequest(format!("{} cannot be saved", self.slug())))
	}

	async fn delete(&self, pool: &SqlitePool, id: i64, storage: &MediaStorage) -> Result<()>;
}
