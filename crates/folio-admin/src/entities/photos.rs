//! Photo administration: metadata plus the actual file upload.

use async_trait::async_trait;
use folio_core::{Error, Result};
use folio_db::models::NewPhoto;
use folio_db::repo::{photos, posts};
use sqlx::SqlitePool;

use crate::forms::{FormData, FormField, SelectOption};
use crate::media::{AttachOutcome, MediaStorage};
use crate::model::{AdminRow, ModelAdmin};

pub struct PhotoAdmin;

impl PhotoAdmin {
	async fn post_options(pool: &SqlitePool) -> Result<Vec<SelectOption>> {
		let mut options = vec![SelectOption {
			value: String::new(),
			label: "(unattached)".to_string(),
		}];
		for post in posts::list(pool).await? {
			options.push(SelectOption {
				value: post.id.to_string(),
				label: post.title,
			});
		}
		Ok(options)
	}

	fn parse_post(form: &FormData) -> Result<Option<i64>> {
		match form.optional("post_id") {
			None => Ok(None),
			Some(raw) => raw
				.parse::<i64>()
				.map(Some)
				.map_err(|_| Error::BadRequest(format!("invalid post id: {}", raw))),
		}
	}
}

#[async_trait]
impl ModelAdmin for PhotoAdmin {
	fn slug(&self) -> &'static str {
		"photos"
	}

	fn title(&self) -> &'static str {
		"Photos"
	}

	fn columns(&self) -> &'static [&'static str] {
		&["Name", "File", "Kind", "Created"]
	}

	async fn rows(&self, pool: &SqlitePool) -> Result<Vec<AdminRow>> {
		let rows = photos::list(pool)
			.await?
			.into_iter()
			.map(|p| AdminRow {
				id: p.id,
				cells: vec![p.name, p.path, p.kind, p.created_at.to_rfc3339()],
			})
			.collect();
		Ok(rows)
	}

	async fn blank_form(&self, pool: &SqlitePool) -> Result<Vec<FormField>> {
		Ok(vec![
			FormField::text("name", "Name"),
			FormField::select("post_id", "Post", Self::post_options(pool).await?),
			FormField::file("file", "File"),
		])
	}

	async fn edit_form(&self, pool: &SqlitePool, id: i64) -> Result<Vec<FormField>> {
		let photo = photos::get(pool, id)
			.await?
			.ok_or_else(|| Error::NotFound("photo".to_string()))?;
		let post = photo.post_id.map(|id| id.to_string()).unwrap_or_default();
		Ok(vec![
			FormField::text("name", "Name").with_value(photo.name),
			FormField::select("post_id", "Post", Self::post_options(pool).await?)
				.with_value(post),
			FormField::file("file", "Replace file"),
		])
	}

	/// A save without a file keeps the stored file as-is (create leaves
	/// it empty); a failed attach still saves the row and flashes a
	/// notice rather than losing the submission.
	async fn save(
		&self,
		pool: &SqlitePool,
		id: Option<i64>,
		form: &FormData,
		storage: &MediaStorage,
	) -> Result<Option<String>> {
		let post_id = Self::parse_post(form)?;
		let outcome = storage.attach(form.file("file"));

		// blank display name falls back to the uploaded filename
		let name = match (form.optional("name"), &outcome) {
			(Some(name), _) => name.to_string(),
			(None, AttachOutcome::Attached(stored)) => stored.name.clone(),
			(None, _) => String::new(),
		};
		let name = name.as_str();

		let notice = match &outcome {
			AttachOutcome::Failed(e) => Some(format!("file was not stored: {}", e)),
			_ => None,
		};

		match id {
			None => {
				let (path, kind) = match &outcome {
					AttachOutcome::Attached(stored) => (stored.path.clone(), stored.kind.clone()),
					_ => (String::new(), String::new()),
				};
				photos::create(
					pool,
					&NewPhoto {
						name: name.to_string(),
						path,
						kind,
						post_id,
					},
				)
				.await?;
			}
			Some(id) => match &outcome {
				AttachOutcome::Attached(stored) => {
					let previous = photos::get(pool, id)
						.await?
						.ok_or_else(|| Error::NotFound("photo".to_string()))?;
					photos::update_media(pool, id, name, &stored.path, &stored.kind, post_id)
						.await?;
					storage.remove(&previous.path);
				}
				_ => {
					photos::update_meta(pool, id, name, post_id).await?;
				}
			},
		}
		Ok(notice)
	}

	async fn delete(&self, pool: &SqlitePool, id: i64, storage: &MediaStorage) -> Result<()> {
		if let Some(path) = photos::delete(pool, id).await? {
			storage.remove(path.as_str());
		}
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::forms::UploadedFile;
	use bytes::Bytes;

	fn storage(dir: &std::path::Path) -> MediaStorage {
		MediaStorage::new(dir, ["jpg".to_string()].into_iter().collect())
	}

	fn form_with_file(name: &str, filename: Option<&str>) -> FormData {
		let mut data = FormData::default();
		data.values.insert("name".to_string(), name.to_string());
		if let Some(filename) = filename {
			data.files.insert(
				"file".to_string(),
				UploadedFile {
					filename: filename.to_string(),
					bytes: Bytes::from_static(b"imagebytes"),
				},
			);
		}
		data
	}

	#[tokio::test]
	async fn create_with_upload_stores_the_file() {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());
		let admin = PhotoAdmin;

		let notice = admin
			.save(&pool, None, &form_with_file("cover", Some("cover.JPG")), &storage)
			.await
			.unwrap();
		assert!(notice.is_none());

		let photo = photos::list(&pool).await.unwrap().remove(0);
		assert_eq!(photo.name, "cover");
		assert_eq!(photo.kind, "JPG");
		assert!(dir.path().join(&photo.path).exists());
	}

	#[tokio::test]
	async fn blank_name_falls_back_to_the_uploaded_filename() {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let admin = PhotoAdmin;

		admin
			.save(&pool, None, &form_with_file("", Some("photo.JPG")), &storage(dir.path()))
			.await
			.unwrap();
		let photo = photos::list(&pool).await.unwrap().remove(0);
		assert_eq!(photo.name, "photo.JPG");
		assert_eq!(photo.kind, "JPG");
	}

	#[tokio::test]
	async fn create_without_upload_leaves_the_path_empty() {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let admin = PhotoAdmin;

		admin
			.save(&pool, None, &form_with_file("pending", None), &storage(dir.path()))
			.await
			.unwrap();
		let photo = photos::list(&pool).await.unwrap().remove(0);
		assert_eq!(photo.path, "");
		assert_eq!(photo.kind, "");
	}

	#[tokio::test]
	async fn failed_attach_saves_the_row_with_a_notice() {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let admin = PhotoAdmin;

		// empty filename fails the store but not the save
		let notice = admin
			.save(&pool, None, &form_with_file("broken", Some("")), &storage(dir.path()))
			.await
			.unwrap();
		assert!(notice.unwrap().contains("no filename"));
		assert_eq!(photos::list(&pool).await.unwrap().len(), 1);
	}

	#[tokio::test]
	async fn replacing_the_file_removes_the_old_one() {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());
		let admin = PhotoAdmin;

		admin
			.save(&pool, None, &form_with_file("v1", Some("a.jpg")), &storage)
			.await
			.unwrap();
		let first = photos::list(&pool).await.unwrap().remove(0);

		admin
			.save(&pool, Some(first.id), &form_with_file("v2", Some("b.jpg")), &storage)
			.await
			.unwrap();
		let second = photos::get(&pool, first.id).await.unwrap().unwrap();

		assert_ne!(first.path, second.path);
		assert!(!dir.path().join(&first.path).exists());
		assert!(dir.path().join(&second.path).exists());
	}

	#[tokio::test]
	async fn delete_unlinks_the_stored_file() {
		let pool = folio_db::connect_in_memory().await.unwrap();
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());
		let admin = PhotoAdmin;

		admin
			.save(&pool, None, &form_with_file("gone", Some("x.jpg")), &storage)
			.await
			.unwrap();
		let photo = photos::list(&pool).await.unwrap().remove(0);

		admin.delete(&pool, photo.id, &storage).await.unwrap();
		assert!(photos::list(&pool).await.unwrap().is_empty());
		assert!(!dir.path().join(&photo.path).exists());
	}
}
