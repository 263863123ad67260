//! Trending scores: what is hot right now
//!
//! Interactions add to an item's score, weighted by kind and damped by item
//! age on a half-life curve, with per-actor dedup so refresh loops and
//! repeat clicks cannot inflate a score. Decay happens at scoring time; an
//! item nobody interacts with simply stops climbing and gets overtaken.

use std::collections::HashMap;

use crate::engine::{check_id, EngineState};
use crate::prelude::*;
use crate::state_adapter::InteractionEvent;
use crate::types::{InteractionKind, TrendingEntry, TrendingOutcome};

/// Borrowed component handle, obtained from [`EngineState::trending`]
pub struct TrendingScores<'a> {
	pub(crate) engine: &'a EngineState,
}

impl TrendingScores<'_> {
	/// Records one interaction and returns the item's standing afterwards.
	/// A repeat of the same interaction within its dedup window changes
	/// nothing and still reports the current standing.
	pub async fn record_interaction(
		&self,
		item_id: &str,
		actor_id: &str,
		kind: InteractionKind,
		item_created_at: Timestamp,
	) -> LsResult<TrendingOutcome> {
		check_id(item_id, "item")?;
		check_id(actor_id, "actor")?;
		let trending = &self.engine.settings.trending;
		let event = InteractionEvent {
			item_id,
			actor_id,
			kind: kind.as_str(),
			weight: trending.weights.for_kind(kind),
			dedup_ttl: trending.dedup_ttl(kind),
			item_created_at,
			half_life_hours: trending.half_life_hours,
		};
		self.engine.store.trending_record(&event).await
	}

	/// One page of the leaderboard, best first
	pub async fn get_trending(&self, limit: u32, offset: u32) -> LsResult<Vec<TrendingEntry>> {
		self.engine.store.trending_top(limit, offset).await
	}

	/// Takes an item off the board and drops its analytics, e.g. after
	/// moderation removed it
	pub async fn remove_item(&self, item_id: &str) -> LsResult<()> {
		check_id(item_id, "item")?;
		self.engine.store.trending_remove(item_id).await
	}

	/// How many interactions of each kind scored on the item
	pub async fn interaction_breakdown(&self, item_id: &str) -> LsResult<HashMap<Box<str>, u64>> {
		check_id(item_id, "item")?;
		self.engine.store.trending_breakdown(item_id).await
	}
}

// vim: ts=4
