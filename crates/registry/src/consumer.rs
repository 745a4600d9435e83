use std::sync::Arc;

use implex_index::{DuplicatePolicy, ImplementorIndex};
use parking_lot::Mutex;

/// Receives implementor deliveries from the registry.
///
/// `accept` is called synchronously under the registry lock: once with the
/// accumulated pending buffer when the consumer attaches, then once per
/// subsequent live contribution (a single-key index). Implementations merge
/// deliveries into whatever state they maintain and must not call back into
/// the registry from `accept`.
pub trait Consumer: Send {
	/// Accepts one delivered mapping.
	fn accept(&mut self, index: ImplementorIndex);
}

impl<F> Consumer for F
where
	F: FnMut(ImplementorIndex) + Send,
{
	fn accept(&mut self, index: ImplementorIndex) {
		self(index)
	}
}

/// Consumer that folds every delivery into one cumulative index.
///
/// Live contributions arrive one key at a time; hosts that want the full
/// picture keep a [`CollectedHandle`] and read snapshots from it after the
/// collector has been attached.
pub struct CollectingConsumer {
	policy: DuplicatePolicy,
	collected: Arc<Mutex<ImplementorIndex>>,
}

impl CollectingConsumer {
	/// Creates a collector with the default duplicate policy.
	pub fn new() -> Self {
		Self::with_policy(DuplicatePolicy::default())
	}

	/// Creates a collector resolving repeated keys per `policy`.
	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			policy,
			collected: Arc::new(Mutex::new(ImplementorIndex::new())),
		}
	}

	/// Returns a read handle that stays valid after the collector is attached.
	pub fn handle(&self) -> CollectedHandle {
		CollectedHandle {
			collected: Arc::clone(&self.collected),
		}
	}
}

impl Default for CollectingConsumer {
	fn default() -> Self {
		Self::new()
	}
}

impl Consumer for CollectingConsumer {
	fn accept(&mut self, index: ImplementorIndex) {
		self.collected.lock().merge(index, self.policy);
	}
}

/// Read handle onto a [`CollectingConsumer`]'s cumulative view.
#[derive(Clone)]
pub struct CollectedHandle {
	collected: Arc<Mutex<ImplementorIndex>>,
}

impl CollectedHandle {
	/// Clones the cumulative index as of now.
	pub fn snapshot(&self) -> ImplementorIndex {
		self.collected.lock().clone()
	}

	/// Number of traits collected so far.
	pub fn len(&self) -> usize {
		self.collected.lock().len()
	}

	/// Returns true when nothing has been delivered yet.
	pub fn is_empty(&self) -> bool {
		self.collected.lock().is_empty()
	}
}
