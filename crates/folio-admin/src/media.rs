//! Media file storage.
//!
//! Uploaded files are written under a configured root with a generated
//! `<random-u128>.<ext>` name; the browser-supplied filename is kept only
//! as display metadata. The allowed-extension set is advisory: an upload
//! with an unlisted extension is stored anyway and logged.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use folio_core::Settings;
use tracing::warn;

use crate::forms::UploadedFile;

/// Errors from the media layer; kept separate from the central taxonomy
/// so attach failures can be reported on the form instead of failing the
/// save
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
	#[error("upload has no filename")]
	MissingFilename,

	#[error("failed to write media file: {0}")]
	Write(#[from] std::io::Error),
}

/// A file successfully written to storage
#[derive(Debug, Clone)]
pub struct StoredMedia {
	/// Original filename, display only
	pub name: String,
	/// Generated storage filename
	pub path: String,
	/// Raw extension as uploaded, casing preserved
	pub kind: String,
}

/// What happened to the optional upload of a form submission
#[derive(Debug)]
pub enum AttachOutcome {
	Attached(StoredMedia),
	NoFile,
	Failed(MediaError),
}

/// Writes and removes files under the storage root
#[derive(Debug, Clone)]
pub struct MediaStorage {
	root: PathBuf,
	allowed: HashSet<String>,
}

impl MediaStorage {
	pub fn new(root: impl Into<PathBuf>, allowed: HashSet<String>) -> Self {
		Self {
			root: root.into(),
			allowed,
		}
	}

	pub fn from_settings(settings: &Settings) -> Self {
		Self::new(
			settings.storage_dir.clone(),
			settings.allowed_extensions.clone(),
		)
	}

	pub fn root(&self) -> &Path {
		&self.root
	}

	/// Store an upload, returning the generated file reference.
	///
	/// The extension is everything after the last dot, or the whole
	/// filename when there is none.
	pub fn store(&self, filename: &str, bytes: &[u8]) -> Result<StoredMedia, MediaError> {
		if filename.is_empty() {
			return Err(MediaError::MissingFilename);
		}
		let kind = extension(filename);
		if !self.allowed.contains(&kind.to_ascii_lowercase()) {
			warn!(filename, kind, "storing upload with unlisted extension");
		}
		let stored_name = format!("{}.{}", rand::random::<u128>(), kind);
		std::fs::create_dir_all(&self.root)?;
		std::fs::write(self.root.join(&stored_name), bytes)?;
		Ok(StoredMedia {
			name: filename.to_string(),
			path: stored_name,
			kind: kind.to_string(),
		})
	}

	/// Store the optional upload of a form, never failing the caller
	pub fn attach(&self, upload: Option<&UploadedFile>) -> AttachOutcome {
		let Some(upload) = upload else {
			return AttachOutcome::NoFile;
		};
		match self.store(&upload.filename, &upload.bytes) {
			Ok(stored) => AttachOutcome::Attached(stored),
			Err(e) => {
				warn!(filename = %upload.filename, error = %e, "failed to store upload");
				AttachOutcome::Failed(e)
			}
		}
	}

	/// Best-effort unlink of a stored file; the database row is already
	/// gone by the time this runs
	pub fn remove(&self, path: &str) {
		if path.is_empty() {
			return;
		}
		if let Err(e) = std::fs::remove_file(self.root.join(path)) {
			warn!(path, error = %e, "failed to remove media file");
		}
	}
}

/// Everything after the last `.`, or the whole name without one
fn extension(filename: &str) -> &str {
	filename.rsplit('.').next().unwrap_or(filename)
}

#[cfg(test)]
mod tests {
	use super::*;
	use bytes::Bytes;
	use folio_core::config::DEFAULT_ALLOWED_EXTENSIONS;

	fn storage(dir: &Path) -> MediaStorage {
		MediaStorage::new(
			dir,
			DEFAULT_ALLOWED_EXTENSIONS
				.iter()
				.map(|s| s.to_string())
				.collect(),
		)
	}

	#[test]
	fn extension_is_the_last_dot_segment() {
		assert_eq!(extension("photo.JPG"), "JPG");
		assert_eq!(extension("archive.tar.gz"), "gz");
		assert_eq!(extension("README"), "README");
		assert_eq!(extension("trailing."), "");
	}

	#[test]
	fn store_generates_a_fresh_name_and_writes_bytes() {
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());

		let stored = storage.store("cover.jpg", b"jpegbytes").unwrap();
		assert_eq!(stored.name, "cover.jpg");
		assert_eq!(stored.kind, "jpg");
		assert!(stored.path.ends_with(".jpg"));
		assert_ne!(stored.path, "cover.jpg");

		let on_disk = std::fs::read(dir.path().join(&stored.path)).unwrap();
		assert_eq!(on_disk, b"jpegbytes");
	}

	#[test]
	fn unlisted_extensions_are_stored_anyway() {
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());
		let stored = storage.store("payload.exe", b"mz").unwrap();
		assert_eq!(stored.kind, "exe");
		assert!(dir.path().join(&stored.path).exists());
	}

	#[test]
	fn attach_distinguishes_missing_from_failed() {
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());

		assert!(matches!(storage.attach(None), AttachOutcome::NoFile));

		let upload = UploadedFile {
			filename: String::new(),
			bytes: Bytes::from_static(b"x"),
		};
		assert!(matches!(
			storage.attach(Some(&upload)),
			AttachOutcome::Failed(MediaError::MissingFilename)
		));
	}

	#[test]
	fn remove_is_best_effort() {
		let dir = tempfile::tempdir().unwrap();
		let storage = storage(dir.path());
		let stored = storage.store("a.png", b"png").unwrap();

		storage.remove(&stored.path);
		assert!(!dir.path().join(&stored.path).exists());
		// removing again must not panic
		storage.remove(&stored.path);
		storage.remove("");
	}
}
