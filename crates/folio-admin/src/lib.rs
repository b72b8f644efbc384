//! Role-gated administration surface.
//!
//! A small model-admin registry in the Django mold: each managed entity
//! implements [`ModelAdmin`] (list rows, build forms, save, delete) and
//! [`AdminSite`] routes `/admin/...` requests to the right entity,
//! rendering tera templates. Uploaded files go through [`MediaStorage`],
//! which generates random storage names and never trusts user paths.

pub mod entities;
pub mod forms;
pub mod media;
pub mod model;
pub mod site;

pub use forms::{FieldKind, FormData, FormField, SelectOption, UploadedFile};
pub use media::{AttachOutcome, MediaError, MediaStorage, StoredMedia};
pub use model::{AdminRow, ModelAdmin};
pub use site::AdminSite;
