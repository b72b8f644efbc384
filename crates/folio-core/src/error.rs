//! Central error taxonomy.
//!
//! Everything user-visible flows through [`Error`]: constraint violations
//! from the relational layer keep their own variant so the admin layer can
//! turn them into form messages instead of a 500.

use hyper::StatusCode;

/// Errors produced anywhere in the folio stack
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum Error {
	/// A UNIQUE constraint was violated (duplicate slug, duplicate email).
	/// Surfaces to the admin form layer as a validation message.
	#[error("unique constraint violated: {constraint}")]
	UniqueViolation { constraint: String },

	#[error("database error: {0}")]
	Database(sqlx::Error),

	#[error("template error: {0}")]
	Template(#[from] tera::Error),

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("{0} not found")]
	NotFound(String),

	#[error("permission denied: {0}")]
	PermissionDenied(String),

	#[error("bad request: {0}")]
	BadRequest(String),

	#[error("password hash error: {0}")]
	PasswordHash(String),

	#[error("configuration error: {0}")]
	Config(String),
}

/// Result type used throughout the folio crates
pub type Result<T> = std::result::Result<T, Error>;

impl From<sqlx::Error> for Error {
	fn from(err: sqlx::Error) -> Self {
		if let sqlx::Error::Database(db) = &err
			&& db.is_unique_violation()
		{
			return Error::UniqueViolation {
				constraint: db.message().to_string(),
			};
		}
		Error::Database(err)
	}
}

impl Error {
	/// HTTP status this error maps to at the outer boundary
	///
	/// # Examples
	///
	/// ```
	/// use folio_core::Error;
	/// use hyper::StatusCode;
	///
	/// assert_eq!(Error::NotFound("post".into()).status(), StatusCode::NOT_FOUND);
	/// assert_eq!(Error::BadRequest("nope".into()).status(), StatusCode::BAD_REQUEST);
	/// ```
	pub fn status(&self) -> StatusCode {
		match self {
			Error::NotFound(_) => StatusCode::NOT_FOUND,
			Error::PermissionDenied(_) => StatusCode::FORBIDDEN,
			Error::BadRequest(_) | Error::UniqueViolation { .. } => StatusCode::BAD_REQUEST,
			_ => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	/// True when this is a uniqueness violation from the relational layer
	pub fn is_unique_violation(&self) -> bool {
		matches!(self, Error::UniqueViolation { .. })
	}
}
