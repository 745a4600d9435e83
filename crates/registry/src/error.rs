use thiserror::Error;

/// Consumer attachment errors.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Error)]
pub enum AttachError {
	/// A consumer is already attached. The first consumer is kept and
	/// nothing is re-delivered; two competing viewers indicate a host
	/// misconfiguration.
	#[error("a consumer is already attached")]
	AlreadyAttached,
}
