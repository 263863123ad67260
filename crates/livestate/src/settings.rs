//! Engine Settings
//!
//! Policy knobs of the engine components. The storage adapters receive
//! fully resolved values (TTLs, weights, limits); these structs are where
//! that resolution happens.

use std::time::Duration;

use crate::prelude::*;
use crate::types::InteractionKind;

/// Presence policy
#[derive(Clone, Debug)]
pub struct PresenceSettings {
	/// Expected heartbeat cadence of connected clients
	pub heartbeat_interval: Duration,
	/// Online TTL as a multiple of the heartbeat interval, so a single
	/// dropped heartbeat does not flap the actor offline
	pub ttl_multiplier: u32,
	/// How long an explicit sign-off keeps the last-seen time around
	pub offline_retention: Duration,
}

impl PresenceSettings {
	/// TTL of the presence record written by each heartbeat
	pub fn online_ttl(&self) -> Duration {
		self.heartbeat_interval * self.ttl_multiplier
	}
}

impl Default for PresenceSettings {
	fn default() -> Self {
		Self {
			heartbeat_interval: Duration::from_secs(30),
			ttl_multiplier: 2,
			offline_retention: Duration::from_secs(30 * 24 * 3600), // 30 days
		}
	}
}

/// Base score contribution per interaction kind
#[derive(Clone, Debug)]
pub struct InteractionWeights {
	pub view: u32,
	pub like: u32,
	pub comment: u32,
	pub share: u32,
}

impl InteractionWeights {
	pub fn for_kind(&self, kind: InteractionKind) -> u32 {
		match kind {
			InteractionKind::View => self.view,
			InteractionKind::Like => self.like,
			InteractionKind::Comment => self.comment,
			InteractionKind::Share => self.share,
		}
	}
}

impl Default for InteractionWeights {
	fn default() -> Self {
		Self { view: 1, like: 3, comment: 5, share: 7 }
	}
}

/// Trending policy
#[derive(Clone, Debug)]
pub struct TrendingSettings {
	pub weights: InteractionWeights,
	/// Item age at which an interaction's contribution halves
	pub half_life_hours: u32,
	/// Dedup window for high-noise interactions (views)
	pub low_signal_dedup: Duration,
	/// Dedup window for deliberate interactions (likes, comments, shares)
	pub high_signal_dedup: Duration,
}

impl TrendingSettings {
	/// The dedup window applying to one interaction kind
	pub fn dedup_ttl(&self, kind: InteractionKind) -> Duration {
		if kind.is_high_signal() {
			self.high_signal_dedup
		} else {
			self.low_signal_dedup
		}
	}
}

impl Default for TrendingSettings {
	fn default() -> Self {
		Self {
			weights: InteractionWeights::default(),
			half_life_hours: 48,
			low_signal_dedup: Duration::from_secs(3600), // repeat views count hourly
			high_signal_dedup: Duration::from_secs(86400), // one like per day scores
		}
	}
}

/// Main engine settings
#[derive(Clone, Debug, Default)]
pub struct EngineSettings {
	pub presence: PresenceSettings,
	pub trending: TrendingSettings,
}

impl EngineSettings {
	pub(crate) fn validate(&self) -> LsResult<()> {
		if self.presence.heartbeat_interval.is_zero() {
			return Err(Error::ValidationError(
				"presence heartbeat interval must be positive".to_string(),
			));
		}
		if self.presence.ttl_multiplier == 0 {
			return Err(Error::ValidationError(
				"presence ttl multiplier must be at least 1".to_string(),
			));
		}
		if self.presence.offline_retention.is_zero() {
			return Err(Error::ValidationError(
				"presence offline retention must be positive".to_string(),
			));
		}
		if self.trending.half_life_hours == 0 {
			return Err(Error::ValidationError(
				"trending half-life must be at least one hour".to_string(),
			));
		}
		if self.trending.low_signal_dedup.is_zero() || self.trending.high_signal_dedup.is_zero() {
			return Err(Error::ValidationError(
				"trending dedup windows must be positive".to_string(),
			));
		}
		Ok(())
	}
}


// vim: ts=4
