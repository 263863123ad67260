//! Sliding-window rate limits
//!
//! A rule names an action and caps how many requests one identifier may
//! make per window. The window slides continuously: each request is
//! admitted against the exact timestamps of the previous ones, so there are
//! no fixed-bucket burst edges. Checks are atomic; concurrent requests
//! cannot overshoot the cap.

use std::num::NonZeroU32;
use std::time::Duration;

use crate::engine::{check_id, EngineState};
use crate::prelude::*;
use crate::types::RateDecision;

/// A named limit: at most `max_requests` per `window`
#[derive(Clone, Copy, Debug)]
pub struct RateRule {
	/// Action name, keyed on in the store
	pub action: &'static str,
	pub max_requests: NonZeroU32,
	pub window: Duration,
}

impl RateRule {
	pub const fn new(action: &'static str, max_requests: u32, window: Duration) -> Self {
		Self {
			action,
			max_requests: match NonZeroU32::new(max_requests) {
				Some(max) => max,
				None => NonZeroU32::MIN,
			},
			window,
		}
	}

	/// Login attempts: 5 per 5 minutes
	pub const LOGIN: RateRule = RateRule::new("login", 5, Duration::from_secs(300));
	/// Account registrations: 3 per hour
	pub const REGISTRATION: RateRule = RateRule::new("registration", 3, Duration::from_secs(3600));
	/// Guest session grants: 10 per hour
	pub const GUEST_SESSION: RateRule =
		RateRule::new("guest_session", 10, Duration::from_secs(3600));
	/// Message sends: 30 per minute
	pub const MESSAGE_SEND: RateRule = RateRule::new("message_send", 30, Duration::from_secs(60));
}

/// Borrowed component handle, obtained from [`EngineState::rate_limits`]
pub struct RateLimiter<'a> {
	pub(crate) engine: &'a EngineState,
}

impl RateLimiter<'_> {
	/// Admits or rejects one request under the rule
	pub async fn check(&self, rule: &RateRule, identifier: &str) -> LsResult<RateDecision> {
		self.check_and_consume(rule.action, identifier, rule.max_requests.get(), rule.window).await
	}

	/// Raw sliding-window check for call sites without a preset rule. An
	/// admitted request consumes a slot; a rejected one leaves the window
	/// untouched and reports when the caller may retry.
	pub async fn check_and_consume(
		&self,
		action: &str,
		identifier: &str,
		max_requests: u32,
		window: Duration,
	) -> LsResult<RateDecision> {
		check_id(action, "action")?;
		check_id(identifier, "identifier")?;
		if max_requests == 0 {
			return Err(Error::ValidationError("max_requests must be positive".to_string()));
		}
		if window.is_zero() {
			return Err(Error::ValidationError("rate window must be positive".to_string()));
		}
		self.engine.store.rate_check_and_consume(action, identifier, max_requests, window).await
	}

	/// Clears the identifier's whole window for the action, e.g. from a
	/// support tool after a verified lockout
	pub async fn reset(&self, action: &str, identifier: &str) -> LsResult<()> {
		check_id(action, "action")?;
		check_id(identifier, "identifier")?;
		self.engine.store.rate_reset(action, identifier).await
	}
}


// vim: ts=4
