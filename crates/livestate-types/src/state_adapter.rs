//! Adapter that executes the engine's atomic operations against a shared
//! state store.
//!
//! Every mutating or multi-step operation on this trait must run as one
//! indivisible transaction with respect to all other store clients — a plain
//! read-then-write pair over separate calls is not an acceptable
//! implementation. Policy (TTLs, weights, dedup windows) arrives as resolved
//! arguments; adapters never carry business configuration of their own.

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::time::Duration;

use crate::prelude::*;

/// One scoring event for the trending engine, with policy already resolved
/// by the caller.
#[derive(Clone, Copy, Debug)]
pub struct InteractionEvent<'a> {
	pub item_id: &'a str,
	pub actor_id: &'a str,
	/// Interaction type, also the field name in the per-item analytics hash
	pub kind: &'a str,
	/// Resolved weight of the interaction kind
	pub weight: u32,
	/// Window during which the same (item, kind, actor) must not score again
	pub dedup_ttl: Duration,
	/// Creation time of the item, the anchor of age-based decay
	pub item_created_at: Timestamp,
	/// Interval over which an interaction's contribution halves
	pub half_life_hours: u32,
}

/// Adapter interface for the shared state store.
///
/// Negative answers (not a member, not online, not ranked) are values, not
/// errors; an `Err` always means the answer could not be obtained.
#[async_trait]
pub trait StateAdapter: Debug + Send + Sync {
	/// Round-trip health probe for readiness checks
	async fn ping(&self) -> LsResult<()>;

	/// # Toggle counter
	/// Atomically flips the actor's membership on the item and rebuilds the
	/// counter from the set cardinality
	async fn toggle(&self, item_id: &str, actor_id: &str) -> LsResult<crate::types::ToggleOutcome>;

	/// Whether the actor currently has the toggle on
	async fn toggle_is_on(&self, item_id: &str, actor_id: &str) -> LsResult<bool>;

	/// Current member count of the item (0 for untouched items)
	async fn toggle_count(&self, item_id: &str) -> LsResult<u64>;

	/// One-pass membership check of a single actor across many items
	async fn toggle_is_on_batch(
		&self,
		item_ids: &[&str],
		actor_id: &str,
	) -> LsResult<HashMap<Box<str>, bool>>;

	/// Deletes the member set and the counter of an item
	async fn toggle_invalidate(&self, item_id: &str) -> LsResult<()>;

	/// Replaces the member set and counter wholesale; clears prior state
	/// first so repeated calls are safe
	async fn toggle_seed(
		&self,
		item_id: &str,
		actor_ids: &[&str],
		ttl: Option<Duration>,
	) -> LsResult<u64>;

	/// # Presence
	/// Marks the actor online with the given record TTL; true only on the
	/// offline-to-online transition
	async fn presence_heartbeat(&self, actor_id: &str, online_ttl: Duration) -> LsResult<bool>;

	/// Marks the actor offline, keeping last-seen for the retention period;
	/// true if the actor was online
	async fn presence_offline(&self, actor_id: &str, retention: Duration) -> LsResult<bool>;

	/// Whether the actor's presence record is alive and online
	async fn presence_is_online(&self, actor_id: &str) -> LsResult<bool>;

	/// One-pass liveness check across many actors
	async fn presence_is_online_batch(
		&self,
		actor_ids: &[&str],
	) -> LsResult<HashMap<Box<str>, bool>>;

	/// Presence snapshot; `last_seen_at` is absent once the record expired
	async fn presence_get(&self, actor_id: &str) -> LsResult<crate::types::Presence>;

	/// Actors currently online, validated against their records
	async fn presence_online_actors(&self) -> LsResult<Vec<Box<str>>>;

	/// Number of actors currently online, validated against their records
	async fn presence_online_count(&self) -> LsResult<u64>;

	/// Removes online-set entries whose record has lapsed; returns how many
	/// were removed
	async fn presence_reconcile(&self) -> LsResult<u64>;

	/// # Rate limiting
	/// Sliding-window admission check; consumes one slot when allowed
	async fn rate_check_and_consume(
		&self,
		action: &str,
		identifier: &str,
		max_requests: u32,
		window: Duration,
	) -> LsResult<crate::types::RateDecision>;

	/// Administrative override: drops the whole window log
	async fn rate_reset(&self, action: &str, identifier: &str) -> LsResult<()>;

	/// # Trending
	/// Scores one interaction with dedup and age decay, atomically
	async fn trending_record(
		&self,
		event: &InteractionEvent<'_>,
	) -> LsResult<crate::types::TrendingOutcome>;

	/// Top items by descending score; prunes non-positive scores first
	async fn trending_top(
		&self,
		limit: u32,
		offset: u32,
	) -> LsResult<Vec<crate::types::TrendingEntry>>;

	/// Drops an item's ranked entry and analytics (dedup markers expire on
	/// their own)
	async fn trending_remove(&self, item_id: &str) -> LsResult<()>;

	/// Per-kind counts of scored interactions for one item
	async fn trending_breakdown(&self, item_id: &str) -> LsResult<HashMap<Box<str>, u64>>;
}


// vim: ts=4
