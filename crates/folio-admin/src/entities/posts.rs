//! Post administration: the full form with category select and a
//! comma-separated tag field.

use async_trait::async_trait;
use folio_core::{Error, Result};
use folio_db::models::{NewPost, UpdatePost};
use folio_db::repo::{categories, posts, tags};
use sqlx::SqlitePool;

use crate::forms::{FormData, FormField, SelectOption};
use crate::media::MediaStorage;
use crate::model::{AdminRow, ModelAdmin};

pub struct PostAdmin;

impl PostAdmin {
	async fn category_options(pool: &SqlitePool) -> Result<Vec<SelectOption>> {
		let mut options = vec![SelectOption {
			value: String::new(),
			label: "(none)".to_string(),
		}];
		for category in categories::list(pool).await? {
			options.push(SelectOption {
				value: category.id.to_string(),
				label: category.title,
			});
		}
		Ok(options)
	}

	fn parse_category(form: &FormData) -> Result<Option<i64>> {
		match form.optional("category_id") {
			None => Ok(None),
			Some(raw) => raw
				.parse::<i64>()
				.map(Some)
				.map_err(|_| Error::BadRequest(format!("invalid category id: {}", raw))),
		}
	}

	/// Replace the post's tags from a comma-separated name list,
	/// creating tags that do not exist yet
	async fn apply_tags(pool: &SqlitePool, post_id: i64, raw: &str) -> Result<()> {
		let mut tag_ids = Vec::new();
		for name in raw.split(',').map(str::trim).filter(|n| !n.is_empty()) {
			let tag = tags::ensure(pool, name).await?;
			if !tag_ids.contains(&tag.id) {
				tag_ids.push(tag.id);
			}
		}
		posts::set_tags(pool, post_id, &tag_ids).await
	}
}

#[async_trait]
impl ModelAdmin for PostAdmin {
	fn slug(&self) -> &'static str {
		"posts"
	}

	fn title(&self) -> &'static str {
		"Posts"
	}

	fn columns(&self) -> &'static [&'static str] {
		&["Title", "Slug", "Created"]
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>> {
		let rows = posts::list(pool)
			.await?
			.into_iter()
			.map(|p| AdminRow {
				id: p.id,
				cells: vec![p.title, p.slug, p.created_at.to_rfc3339()],
			})
			.collect();
		Ok(rows)
	}

	async fn blank_form(&self, pool: &SqlitePool) -> Result<Vec<FormField>> {
		Ok(vec![
			FormField::text("title", "Title"),
			FormField::textarea("body", "Body"),
			FormField::textarea("code", "Code block"),
			FormField::select("category_id", "Category", Self::category_options(pool).await?),
			FormField::text("tags", "Tags (comma separated)"),
		])
	}

	async fn edit_form(&self, pool: &SqlitePool, id: i64) -> Result<Vec<FormField>> {
		let post = posts::get(pool, id)
			.await?
			.ok_or_else(|| Error::NotFound("post".to_string()))?;
		let tag_names = posts::tags_for(pool, id)
			.await?
			.into_iter()
			.map(|t| t.name)
			.collect::<Vec<_>>()
			.join(", ");
		let category = post
			.category_id
			.map(|id| id.to_string())
			.unwrap_or_default();

		Ok(vec![
			FormField::text("title", "Title").with_value(post.title),
			FormField::textarea("body", "Body").with_value(post.body),
			FormField::textarea("code", "Code block").with_value(post.code.unwrap_or_default()),
			FormField::select("category_id", "Category", Self::category_options(pool).await?)
				.with_value(category),
			FormField::text("tags", "Tags (comma separated)").with_value(tag_names),
		])
	}

	async fn save(
		&self,
		pool: &SqlitePool,
		id: Option<i64>,
		form: &FormData,
		_storage: &MediaStorage,
	) -> Result<Option<String>> {
		let category_id = Self::parse_category(form)?;
		let code = form.optional("code").map(str::to_string);

		let post_id = match id {
			None => {
				let post = posts::create(
					pool,
					&NewPost {
						title: form.value("title").to_string(),
						body: form.value("body").to_string(),
						code,
						category_id,
					},
				)
				.await?;
				post.id
			}
			Some(id) => {
				posts::update(
					pool,
					id,
					&UpdatePost {
						title: form.value("title").to_string(),
						body: form.value("body").to_string(),
						code,
						category_id,
					},
				)
				.await?;
				id
			}
		};
		Self::apply_tags(pool, post_id, form.value("tags")).await?;
		Ok(None)
	}

	/// Deleting a post removes its join rows and attached photo record;
	/// the orphaned media file is unlinked best-effort
	async fn delete(&self, pool: &SqlitePool, id: i64, storage: &MediaStorage) -> Result<()> {
		if let Some(path) = posts::delete(pool, id).await? {
			storage.remove(&path);
		}
		Ok(())
	}
}
