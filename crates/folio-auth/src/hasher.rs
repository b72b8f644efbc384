//! Password hashing.

use folio_core::{Error, Result};

/// Password hasher trait
///
/// # Examples
///
/// ```
/// use folio_auth::{Argon2Hasher, PasswordHasher};
///
/// let hasher = Argon2Hasher::new();
/// let hash = hasher.hash("correct horse").unwrap();
/// assert!(hasher.verify("correct horse", &hash).unwrap());
/// assert!(!hasher.verify("wrong horse", &hash).unwrap());
/// ```
pub trait PasswordHasher: Send + Sync {
	/// Hash a plaintext password into a PHC string
	fn hash(&self, password: &str) -> Result<String>;

	/// Verify a plaintext password against a stored hash.
	///
	/// `Ok(false)` means the password does not match; `Err` means the
	/// stored hash could not be parsed or verification itself failed.
	fn verify(&self, password: &str, hash: &str) -> Result<bool>;
}

/// Argon2id hasher, the default for new accounts
#[derive(Debug, Default)]
pub struct Argon2Hasher;

impl Argon2Hasher {
	pub fn new() -> Self {
		Self
	}
}

impl PasswordHasher for Argon2Hasher {
	fn hash(&self, password: &str) -> Result<String> {
		use argon2::Argon2;
		use argon2::password_hash::{PasswordHasher as _, SaltString, rand_core::OsRng};

		let salt = SaltString::generate(&mut OsRng);
		let hash = Argon2::default()
			.hash_password(password.as_bytes(), &salt)
			.map_err(|e| Error::PasswordHash(e.to_string()))?;
		Ok(hash.to_string())
	}

	fn verify(&self, password: &str, hash: &str) -> Result<bool> {
		use argon2::Argon2;
		use argon2::password_hash::{self, PasswordHash, PasswordVerifier as _};

		let parsed = PasswordHash::new(hash).map_err(|e| Error::PasswordHash(e.to_string()))?;
		match Argon2::default().verify_password(password.as_bytes(), &parsed) {
			Ok(()) => Ok(true),
			Err(password_hash::Error::Password) => Ok(false),
			Err(e) => Err(Error::PasswordHash(e.to_string())),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn hashes_are_salted() {
		let hasher = Argon2Hasher::new();
		let first = hasher.hash("secret").unwrap();
		let second = hasher.hash("secret").unwrap();
		assert_ne!(first, second);
		assert!(hasher.verify("secret", &first).unwrap());
		assert!(hasher.verify("secret", &second).unwrap());
	}

	#[test]
	fn garbage_hash_is_an_error_not_a_mismatch() {
		let hasher = Argon2Hasher::new();
		assert!(hasher.verify("secret", "not-a-phc-string").is_err());
	}
}
