use serde::{Deserialize, Serialize};

/// Stable identifier for a documented trait whose implementors are indexed.
///
/// Keys are fully-qualified trait paths as the producer spells them
/// (e.g. `core::convert::From`). The registry treats them as opaque: equality
/// and hashing are all that matter, and a key is unique per documented trait.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TraitKey(Box<str>);

impl TraitKey {
	/// Creates a key from a trait path.
	pub fn new(path: impl Into<Box<str>>) -> Self {
		Self(path.into())
	}

	/// Returns the trait path as a string slice.
	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl core::fmt::Display for TraitKey {
	fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
		f.write_str(&self.0)
	}
}

impl From<&str> for TraitKey {
	fn from(path: &str) -> Self {
		Self::new(path)
	}
}

impl From<String> for TraitKey {
	fn from(path: String) -> Self {
		Self::new(path)
	}
}
