//! Implementor index data model.
//!
//! The inert half of the implementor cross-reference subsystem: the types a
//! documentation producer emits (one [`Fragment`] per documented trait) and
//! the insertion-ordered [`ImplementorIndex`] those fragments accumulate
//! into. The live registry that routes fragments to a viewer lives in
//! `implex-registry`; nothing here performs I/O or holds shared state.

mod entry;
mod fragment;
mod index;
mod key;

pub use entry::ImplementorEntry;
pub use fragment::{Fragment, FragmentError};
pub use index::{DuplicatePolicy, ImplementorIndex, InsertAction};
pub use key::TraitKey;
