use serde::{Deserialize, Serialize};

/// One documented type that implements a given trait.
///
/// Entries are produced upstream by the documentation compiler and are
/// immutable once constructed: the rendered markup is carried opaquely and
/// never inspected by the registry.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImplementorEntry {
	/// Fully-qualified path of the implementing type.
	type_path: String,
	/// Rendering-ready description markup, produced upstream.
	rendered: String,
	/// Generic-parameter annotation on the impl, when present.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	generics: Option<String>,
}

impl ImplementorEntry {
	/// Creates an entry without a generic-parameter annotation.
	pub fn new(type_path: impl Into<String>, rendered: impl Into<String>) -> Self {
		Self {
			type_path: type_path.into(),
			rendered: rendered.into(),
			generics: None,
		}
	}

	/// Creates an entry with a generic-parameter annotation (e.g. `<'a>`).
	pub fn with_generics(type_path: impl Into<String>, rendered: impl Into<String>, generics: impl Into<String>) -> Self {
		Self {
			type_path: type_path.into(),
			rendered: rendered.into(),
			generics: Some(generics.into()),
		}
	}

	/// Fully-qualified path of the implementing type.
	pub fn type_path(&self) -> &str {
		&self.type_path
	}

	/// Rendering-ready description markup.
	pub fn rendered(&self) -> &str {
		&self.rendered
	}

	/// Generic-parameter annotation, when present.
	pub fn generics(&self) -> Option<&str> {
		self.generics.as_deref()
	}
}
