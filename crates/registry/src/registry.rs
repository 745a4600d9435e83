//! Registry state holder and consumer attachment point.
//!
//! The registry is a single tagged slot: `Detached` carries the pending
//! buffer, `Attached` carries the live consumer. Every routing decision is a
//! match over that tag, so the "is there a handler yet?" question is never
//! an ad hoc presence check. The overall lifecycle:
//!
//! - `contribute` while detached accumulates into the pending buffer;
//! - `attach` flushes a non-empty buffer to the consumer in one call and
//!   clears it, at most once per process;
//! - `contribute` while attached delivers immediately, one key per call.
//!
//! There is no terminal state and no teardown; a registry whose consumer
//! never shows up keeps its buffer for the process lifetime, bounded by the
//! number of documented traits.

use std::sync::LazyLock;

use implex_index::{DuplicatePolicy, Fragment, ImplementorEntry, ImplementorIndex, InsertAction, TraitKey};
use parking_lot::Mutex;

use crate::consumer::Consumer;
use crate::error::AttachError;

/// Outcome from routing one contribution.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ContributeOutcome {
	/// Consumer present; delivered synchronously as a single-key index.
	Delivered,
	/// No consumer yet; buffered under a new key.
	Buffered,
	/// No consumer yet; repeated key replaced its buffered entries.
	BufferedReplaced,
	/// No consumer yet; repeated key merged into its buffered entries.
	BufferedMerged,
	/// Empty entry list; nothing recorded, nothing delivered.
	Ignored,
}

/// Coarse registry state for diagnostics.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum RegistryState {
	/// No consumer attached; contributions accumulate in the pending buffer.
	Detached,
	/// Consumer attached; contributions are delivered as they arrive.
	Attached,
}

enum RegistrySlot {
	Detached(ImplementorIndex),
	Attached(Box<dyn Consumer>),
}

/// Process-wide aggregation point for implementor contributions.
///
/// Fragments call [`contribute`](Self::contribute) (directly or through
/// [`apply`](Self::apply)) at unpredictable times relative to the viewer's
/// [`attach`](Self::attach); the registry guarantees that no contribution is
/// lost and that the pending buffer is handed over at most once. All
/// operations are synchronous and take one internal lock, so the registry is
/// safe under a multi-threaded host even though the original execution model
/// is single-threaded.
pub struct ImplementorRegistry {
	policy: DuplicatePolicy,
	slot: Mutex<RegistrySlot>,
}

impl ImplementorRegistry {
	/// Creates a registry with the default duplicate policy.
	pub fn new() -> Self {
		Self::with_policy(DuplicatePolicy::default())
	}

	/// Creates a registry resolving repeated trait keys per `policy`.
	pub fn with_policy(policy: DuplicatePolicy) -> Self {
		Self {
			policy,
			slot: Mutex::new(RegistrySlot::Detached(ImplementorIndex::new())),
		}
	}

	/// Duplicate policy applied to repeated trait keys.
	pub fn policy(&self) -> DuplicatePolicy {
		self.policy
	}

	/// Routes one contribution: an ordered entry list for a documented trait.
	///
	/// With a consumer attached the contribution is delivered immediately as
	/// a single-key index; without one it is merged into the pending buffer.
	/// Empty entry lists are ignored. Safe to call at any time, in any order
	/// relative to other contributions and to `attach`.
	pub fn contribute(&self, key: TraitKey, entries: Vec<ImplementorEntry>) -> ContributeOutcome {
		if entries.is_empty() {
			tracing::debug!(key = %key, "ignoring empty contribution");
			return ContributeOutcome::Ignored;
		}

		let mut slot = self.slot.lock();
		match &mut *slot {
			RegistrySlot::Attached(consumer) => {
				tracing::debug!(key = %key, entries = entries.len(), "delivering live contribution");
				consumer.accept(ImplementorIndex::single(key, entries));
				ContributeOutcome::Delivered
			}
			RegistrySlot::Detached(pending) => {
				tracing::debug!(key = %key, entries = entries.len(), "buffering contribution");
				match pending.insert(key, entries, self.policy) {
					InsertAction::InsertedNew => ContributeOutcome::Buffered,
					InsertAction::ReplacedExisting => ContributeOutcome::BufferedReplaced,
					InsertAction::MergedExisting => ContributeOutcome::BufferedMerged,
					InsertAction::IgnoredEmpty => ContributeOutcome::Ignored,
				}
			}
		}
	}

	/// Attaches the consumer, flushing any pending buffer to it exactly once.
	///
	/// An empty buffer means no delivery happens beyond recording the
	/// consumer. A second attachment fails with
	/// [`AttachError::AlreadyAttached`]; the first consumer stays in place
	/// and nothing is re-delivered.
	pub fn attach(&self, consumer: impl Consumer + 'static) -> Result<(), AttachError> {
		let mut slot = self.slot.lock();
		match std::mem::replace(&mut *slot, RegistrySlot::Detached(ImplementorIndex::new())) {
			RegistrySlot::Attached(existing) => {
				*slot = RegistrySlot::Attached(existing);
				tracing::warn!("rejecting second consumer attachment");
				Err(AttachError::AlreadyAttached)
			}
			RegistrySlot::Detached(pending) => {
				let mut consumer: Box<dyn Consumer> = Box::new(consumer);
				if !pending.is_empty() {
					tracing::debug!(traits = pending.len(), "flushing pending buffer to consumer");
					consumer.accept(pending);
				}
				*slot = RegistrySlot::Attached(consumer);
				Ok(())
			}
		}
	}

	/// Applies one producer-emitted fragment; equivalent to `contribute`.
	pub fn apply(&self, fragment: Fragment) -> ContributeOutcome {
		let (key, entries) = fragment.into_parts();
		self.contribute(key, entries)
	}

	/// Applies a whole loading pass of fragments.
	///
	/// Fragments are self-contained, so any relative order yields the same
	/// buffered index up to key order. Returns one outcome per fragment.
	pub fn apply_all(&self, fragments: impl IntoIterator<Item = Fragment>) -> Vec<ContributeOutcome> {
		fragments.into_iter().map(|fragment| self.apply(fragment)).collect()
	}

	/// Current routing state.
	pub fn state(&self) -> RegistryState {
		match &*self.slot.lock() {
			RegistrySlot::Detached(_) => RegistryState::Detached,
			RegistrySlot::Attached(_) => RegistryState::Attached,
		}
	}

	/// Number of traits waiting in the pending buffer (zero once attached).
	pub fn pending_len(&self) -> usize {
		match &*self.slot.lock() {
			RegistrySlot::Detached(pending) => pending.len(),
			RegistrySlot::Attached(_) => 0,
		}
	}
}

impl Default for ImplementorRegistry {
	fn default() -> Self {
		Self::new()
	}
}

static GLOBAL: LazyLock<ImplementorRegistry> = LazyLock::new(ImplementorRegistry::new);

/// Process-wide registry shared by every fragment loaded into this process.
///
/// Fragments and the viewer agree on this one instance the way generated
/// site fragments agree on a single well-known page slot. Hosts that manage
/// their own lifecycle construct [`ImplementorRegistry`] directly instead.
pub fn global() -> &'static ImplementorRegistry {
	&GLOBAL
}
