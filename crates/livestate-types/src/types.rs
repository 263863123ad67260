//! Common types used throughout the LiveState engine.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::time::SystemTime;

// Timestamp //
//***********//
/// Unix timestamp in whole seconds
#[derive(Clone, Copy, Debug, Default)]
pub struct Timestamp(pub i64);

impl Timestamp {
	pub fn now() -> Timestamp {
		let res = SystemTime::now().duration_since(SystemTime::UNIX_EPOCH).unwrap_or_default();
		Timestamp(res.as_secs() as i64)
	}

	pub fn as_millis(&self) -> i64 {
		self.0 * 1000
	}
}

impl std::fmt::Display for Timestamp {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.0)
	}
}

impl std::cmp::PartialEq for Timestamp {
	fn eq(&self, other: &Self) -> bool {
		self.0 == other.0
	}
}

impl std::cmp::PartialOrd for Timestamp {
	fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
		self.0.partial_cmp(&other.0)
	}
}

impl std::cmp::Eq for Timestamp {}

impl std::cmp::Ord for Timestamp {
	fn cmp(&self, other: &Self) -> std::cmp::Ordering {
		self.0.cmp(&other.0)
	}
}

impl Serialize for Timestamp {
	fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_i64(self.0)
	}
}

impl<'de> Deserialize<'de> for Timestamp {
	fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		Ok(Timestamp(i64::deserialize(deserializer)?))
	}
}

// Toggle counter //
//****************//
/// Result of one atomic toggle mutation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToggleOutcome {
	/// Membership state after the toggle
	pub is_on: bool,
	/// Member count after the toggle, always equal to the set cardinality
	pub count: u64,
	/// Membership state before the toggle
	pub was_on_before: bool,
}

// Presence //
//**********//
/// Presence snapshot for one actor
#[skip_serializing_none]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Presence {
	pub is_online: bool,
	/// Absent when the presence record has fully expired
	pub last_seen_at: Option<Timestamp>,
}

// Rate limiting //
//***************//
/// Admission decision from one sliding-window check
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateDecision {
	pub allowed: bool,
	/// Requests left in the window after this one (0 when denied)
	pub remaining: u32,
	/// How long until the oldest logged entry leaves the window (0 when allowed)
	pub retry_after_ms: u64,
}

// Trending //
//**********//
/// One entry of a trending page, ordered by descending score
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingEntry {
	pub item_id: Box<str>,
	pub score: i64,
}

/// Result of recording one interaction
#[skip_serializing_none]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendingOutcome {
	/// Current score of the item (0 if the item is not ranked)
	pub score: i64,
	/// 0-based rank by descending score, absent when the item is not ranked
	pub rank: Option<u64>,
}

/// Interaction types recognized by the trending engine.
///
/// The weight attached to each kind is business configuration resolved by
/// the caller (see the engine settings), never baked into the atomic
/// primitives.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InteractionKind {
	View,
	Like,
	Comment,
	Share,
}

impl InteractionKind {
	pub fn as_str(&self) -> &'static str {
		match self {
			InteractionKind::View => "view",
			InteractionKind::Comment => "comment",
			InteractionKind::Like => "like",
			InteractionKind::Share => "share",
		}
	}

	/// High-signal kinds get the long dedup window, views the short one
	pub fn is_high_signal(&self) -> bool {
		!matches!(self, InteractionKind::View)
	}
}

impl std::fmt::Display for InteractionKind {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}", self.as_str())
	}
}


// vim: ts=4
