//! Mapping of store errors onto the shared error type

use livestate::error::Error;

/// Maps a Redis error onto the shared error type.
///
/// Connectivity problems become [`Error::ServiceUnavailable`], so callers can
/// tell a store outage apart from a failed operation. Everything else,
/// including scripting and type errors, becomes [`Error::StoreError`].
pub(crate) fn map_redis_err(err: redis::RedisError) -> Error {
	if err.is_connection_refusal() || err.is_timeout() || err.is_connection_dropped() {
		Error::ServiceUnavailable(err.to_string())
	} else {
		Error::StoreError(err.to_string())
	}
}


// vim: ts=4
