use indexmap::IndexMap;
use rustc_hash::FxBuildHasher;

use crate::entry::ImplementorEntry;
use crate::key::TraitKey;

/// Resolution policy for a repeated contribution under the same [`TraitKey`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum DuplicatePolicy {
	/// Last write wins. Entries are swapped in place and the key keeps its
	/// original position in the index.
	#[default]
	Replace,
	/// Entries not already present are appended in arrival order.
	Union,
}

/// Result of inserting one key's entries into an index.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InsertAction {
	/// Key was new; entries inserted.
	InsertedNew,
	/// Key existed; entries replaced in place.
	ReplacedExisting,
	/// Key existed; missing entries appended to the existing list.
	MergedExisting,
	/// Entry list was empty; index unchanged.
	IgnoredEmpty,
}

/// Insertion-ordered mapping from trait to its implementor list.
///
/// Order reflects the producer's emission order, not any sort. Every key maps
/// to a non-empty entry list: empty contributions are never stored.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImplementorIndex {
	map: IndexMap<TraitKey, Vec<ImplementorEntry>, FxBuildHasher>,
}

impl ImplementorIndex {
	/// Creates an empty index.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an index holding a single key's entries.
	///
	/// Empty entry lists produce an empty index.
	pub fn single(key: TraitKey, entries: Vec<ImplementorEntry>) -> Self {
		let mut index = Self::new();
		index.insert(key, entries, DuplicatePolicy::Replace);
		index
	}

	/// Number of traits in the index.
	pub fn len(&self) -> usize {
		self.map.len()
	}

	/// Returns true when no trait has been recorded.
	pub fn is_empty(&self) -> bool {
		self.map.is_empty()
	}

	/// Returns true when the trait is present.
	pub fn contains(&self, key: &TraitKey) -> bool {
		self.map.contains_key(key)
	}

	/// Returns the entries recorded for a trait.
	pub fn get(&self, key: &TraitKey) -> Option<&[ImplementorEntry]> {
		self.map.get(key).map(Vec::as_slice)
	}

	/// Inserts one key's entries, resolving a repeated key per `policy`.
	pub fn insert(&mut self, key: TraitKey, entries: Vec<ImplementorEntry>, policy: DuplicatePolicy) -> InsertAction {
		if entries.is_empty() {
			return InsertAction::IgnoredEmpty;
		}

		match self.map.entry(key) {
			indexmap::map::Entry::Vacant(slot) => {
				slot.insert(entries);
				InsertAction::InsertedNew
			}
			indexmap::map::Entry::Occupied(mut slot) => match policy {
				DuplicatePolicy::Replace => {
					*slot.get_mut() = entries;
					InsertAction::ReplacedExisting
				}
				DuplicatePolicy::Union => {
					let existing = slot.get_mut();
					for entry in entries {
						if !existing.contains(&entry) {
							existing.push(entry);
						}
					}
					InsertAction::MergedExisting
				}
			},
		}
	}

	/// Folds another index into this one, key by key, per `policy`.
	pub fn merge(&mut self, other: ImplementorIndex, policy: DuplicatePolicy) {
		for (key, entries) in other.map {
			self.insert(key, entries, policy);
		}
	}

	/// Iterates traits and their entries in insertion order.
	pub fn iter(&self) -> impl Iterator<Item = (&TraitKey, &[ImplementorEntry])> {
		self.map.iter().map(|(key, entries)| (key, entries.as_slice()))
	}

	/// Iterates trait keys in insertion order.
	pub fn keys(&self) -> impl Iterator<Item = &TraitKey> {
		self.map.keys()
	}
}
