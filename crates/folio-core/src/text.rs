//! Text helpers for derived identifiers.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters that may not appear in a slug: anything that is not a word
/// character (letter, digit, underscore) and not `+`. Each offending
/// character is replaced individually, so runs of separators produce runs
/// of hyphens.
static NON_SLUG: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w+]").expect("static slug pattern"));

/// Derive a URL-safe secondary identifier from a display title.
///
/// This is deliberately not a general-purpose slugifier: no lowercasing,
/// no accent folding, no trimming of edge hyphens, and no collapsing of
/// repeated separators. Every character outside `[\w+]` becomes exactly
/// one hyphen, which keeps the mapping stable for existing published URLs.
///
/// Idempotent only for inputs that already satisfy the character class.
///
/// # Examples
///
/// ```
/// use folio_core::slugify;
///
/// assert_eq!(slugify("Hello, World!"), "Hello--World-");
/// assert_eq!(slugify("rust+sqlite"), "rust+sqlite");
/// assert_eq!(slugify(""), "");
/// ```
pub fn slugify(source: &str) -> String {
	NON_SLUG.replace_all(source, "-").into_owned()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn replaces_each_non_word_character_with_one_hyphen() {
		// comma and space are two separate characters, hence two hyphens
		assert_eq!(slugify("Hello, World!"), "Hello--World-");
	}

	#[test]
	fn preserves_case_and_plus() {
		assert_eq!(slugify("C++ Notes"), "C++-Notes");
		assert_eq!(slugify("MiXeD"), "MiXeD");
	}

	#[test]
	fn empty_and_whitespace_inputs() {
		assert_eq!(slugify(""), "");
		assert_eq!(slugify("   "), "---");
	}

	#[test]
	fn idempotent_on_already_valid_slugs() {
		let valid = "already-valid_slug+1";
		assert_eq!(slugify(valid), valid);
		assert_eq!(slugify(&slugify(valid)), slugify(valid));
	}

	#[test]
	fn hyphens_are_not_word_characters() {
		// '-' is outside the class and re-substitutes to itself
		assert_eq!(slugify("a-b"), "a-b");
	}

	#[test]
	fn unicode_word_characters_survive() {
		assert_eq!(slugify("crème brûlée"), "crème-brûlée");
	}
}
