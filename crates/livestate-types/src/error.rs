//! Error types for the LiveState engine.

use std::fmt;

/// Errors surfaced by engine operations and adapter implementations.
///
/// "Not found" style negative answers (an actor that never toggled an item,
/// a presence record that has expired) are regular return values, not
/// errors. Store failures always surface: the engine never substitutes a
/// guessed value for an answer it could not obtain.
#[derive(Debug)]
pub enum Error {
	/// The shared store rejected or failed a command
	StoreError(String),

	/// The shared store is unreachable (connection refused, dropped, timed out)
	ServiceUnavailable(String),

	/// The caller passed invalid input
	ValidationError(String),

	/// Engine-internal invariant violation
	Internal(String),
}

pub type LsResult<T> = std::result::Result<T, Error>;

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::StoreError(msg) => write!(f, "Store error: {}", msg),
			Error::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
			Error::ValidationError(msg) => write!(f, "Validation error: {}", msg),
			Error::Internal(msg) => write!(f, "Internal error: {}", msg),
		}
	}
}

impl std::error::Error for Error {}


// vim: ts=4
