use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::entry::ImplementorEntry;
use crate::key::TraitKey;

/// Fragment decoding errors.
#[derive(Debug, Error)]
pub enum FragmentError {
	/// Producer-emitted fragment data failed to deserialize.
	#[error("fragment decode failed: {0}")]
	Decode(#[from] serde_json::Error),
}

/// One producer-emitted contribution unit: a trait and every implementing
/// type known at generation time.
///
/// Fragments are self-contained (no shared state between them) and may be
/// applied in any relative order, which is why loading order never matters
/// to the registry.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Fragment {
	trait_key: TraitKey,
	entries: Vec<ImplementorEntry>,
}

impl Fragment {
	/// Creates a fragment from a trait key and its entry list.
	pub fn new(trait_key: impl Into<TraitKey>, entries: Vec<ImplementorEntry>) -> Self {
		Self {
			trait_key: trait_key.into(),
			entries,
		}
	}

	/// Decodes a fragment from its JSON form.
	pub fn from_json(data: &str) -> Result<Self, FragmentError> {
		Ok(serde_json::from_str(data)?)
	}

	/// The documented trait this fragment contributes to.
	pub fn trait_key(&self) -> &TraitKey {
		&self.trait_key
	}

	/// The implementor entries, in the producer's emission order.
	pub fn entries(&self) -> &[ImplementorEntry] {
		&self.entries
	}

	/// Splits the fragment into the pieces a `contribute` call takes.
	pub fn into_parts(self) -> (TraitKey, Vec<ImplementorEntry>) {
		(self.trait_key, self.entries)
	}
}
