//! Utility helpers shared by the LiveState crates.

/// Milliseconds since the Unix epoch
pub fn now_millis() -> u64 {
	std::time::SystemTime::now()
		.duration_since(std::time::SystemTime::UNIX_EPOCH)
		.unwrap_or_default()
		.as_millis() as u64
}

/// Lock a `std::sync::Mutex`, mapping a poisoned lock to `Error::Internal`
/// instead of panicking.
///
/// The optional second argument names the lock in the error message.
#[macro_export]
macro_rules! lock {
	($mutex:expr) => {
		$mutex.lock().map_err(|_| $crate::error::Error::Internal("poisoned lock".to_string()))
	};
	($mutex:expr, $name:expr) => {
		$mutex
			.lock()
			.map_err(|_| $crate::error::Error::Internal(format!("poisoned lock: {}", $name)))
	};
}


// vim: ts=4
