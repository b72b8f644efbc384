//! Admin form descriptions and submitted-form parsing.
//!
//! [`FormField`] describes what to render; [`FormData`] is what came
//! back, parsed from either an urlencoded or a multipart body.

use std::collections::HashMap;

use bytes::Bytes;
use folio_core::{Error, Request, Result};
use futures_util::future::ready;
use futures_util::stream::once;
use multer::Multipart;
use serde::Serialize;

/// How a form field renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
	Text,
	TextArea,
	Select,
	File,
}

/// One `<option>` of a select field
#[derive(Debug, Clone, Serialize)]
pub struct SelectOption {
	pub value: String,
	pub label: String,
}

/// A renderable form field with its current value
#[derive(Debug, Clone, Serialize)]
pub struct FormField {
	pub name: String,
	pub label: String,
	pub kind: FieldKind,
	pub value: String,
	pub options: Vec<SelectOption>,
}

impl FormField {
	fn new(name: &str, label: &str, kind: FieldKind) -> Self {
		Self {
			name: name.to_string(),
			label: label.to_string(),
			kind,
			value: String::new(),
			options: Vec::new(),
		}
	}

	pub fn text(name: &str, label: &str) -> Self {
		Self::new(name, label, FieldKind::Text)
	}

	pub fn textarea(name: &str, label: &str) -> Self {
		Self::new(name, label, FieldKind::TextArea)
	}

	pub fn select(name: &str, label: &str, options: Vec<SelectOption>) -> Self {
		let mut field = Self::new(name, label, FieldKind::Select);
		field.options = options;
		field
	}

	pub fn file(name: &str, label: &str) -> Self {
		Self::new(name, label, FieldKind::File)
	}

	pub fn with_value(mut self, value: impl Into<String>) -> Self {
		self.value = value.into();
		self
	}
}

/// A file received through a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
	/// Filename as sent by the browser; used only for display and for
	/// the extension
	pub filename: String,
	pub bytes: Bytes,
}

/// Submitted form values plus any uploaded files
#[derive(Debug, Default)]
pub struct FormData {
	pub values: HashMap<String, String>,
	pub files: HashMap<String, UploadedFile>,
}

impl FormData {
	/// Parse the request body, dispatching on content type.
	///
	/// Multipart file parts with an empty filename (an untouched file
	/// input) are dropped rather than surfaced as empty uploads.
	pub async fn from_request(request: &Request) -> Result<Self> {
		match request.content_type() {
			Some(ct) if ct.starts_with("multipart/form-data") => {
				let content_type = ct.to_string();
				Self::from_multipart(&content_type, request.body.clone()).await
			}
			_ => Ok(Self {
				values: request.form_data()?,
				files: HashMap::new(),
			}),
		}
	}

	async fn from_multipart(content_type: &str, body: Bytes) -> Result<Self> {
		let boundary = multer::parse_boundary(content_type)
			.map_err(|e| Error::BadRequest(format!("malformed multipart boundary: {}", e)))?;
		let stream = once(ready(Ok::<_, std::io::Error>(body)));
		let mut multipart = Multipart::new(stream, boundary);

		let mut data = Self::default();
		while let Some(field) = multipart
			.next_field()
			.await
			.map_err(|e| Error::BadRequest(format!("malformed multipart body: {}", e)))?
		{
			let Some(name) = field.name().map(str::to_string) else {
				continue;
			};
			match field.file_name().map(str::to_string) {
				Some(filename) if !filename.is_empty() => {
					let bytes = field.bytes().await.map_err(|e| {
						Error::BadRequest(format!("truncated upload for {}: {}", name, e))
					})?;
					data.files.insert(name, UploadedFile { filename, bytes });
				}
				Some(_) => {
					// empty file input, discard the part
				}
				None => {
					let value = field.text().await.map_err(|e| {
						Error::BadRequest(format!("malformed field {}: {}", name, e))
					})?;
					data.values.insert(name, value);
				}
			}
		}
		Ok(data)
	}

	/// A field's value, empty string when absent
	pub fn value(&self, name: &str) -> &str {
		self.values.get(name).map(String::as_str).unwrap_or("")
	}

	/// A field's value as an option, `None` when absent or empty
	pub fn optional(&self, name: &str) -> Option<&str> {
		self.values
			.get(name)
			.map(String::as_str)
			.filter(|v| !v.is_empty())
	}

	pub fn file(&self, name: &str) -> Option<&UploadedFile> {
		self.files.get(name)
	}
}

/// Copy submitted values back onto form fields for re-rendering after a
/// validation failure
pub fn refill(mut fields: Vec<FormField>, data: &FormData) -> Vec<FormField> {
	for field in &mut fields {
		if let Some(value) = data.values.get(&field.name) {
			field.value = value.clone();
		}
	}
	fields
}
