//! Toggle counters: per-actor on/off state on items with a public count
//!
//! Backs likes, bookmarks, follows and similar flip-flop interactions. The
//! count always equals the number of actors currently on; flips from
//! different clients interleave without ever skewing it.

use std::collections::HashMap;
use std::time::Duration;

use crate::engine::{check_id, EngineState};
use crate::prelude::*;
use crate::types::ToggleOutcome;

/// Borrowed component handle, obtained from [`EngineState::toggles`]
pub struct ToggleCounter<'a> {
	pub(crate) engine: &'a EngineState,
}

impl ToggleCounter<'_> {
	/// Flips the actor's toggle on the item and reports the state after the
	/// flip. Toggling twice restores the starting state.
	pub async fn toggle(&self, item_id: &str, actor_id: &str) -> LsResult<ToggleOutcome> {
		check_id(item_id, "item")?;
		check_id(actor_id, "actor")?;
		self.engine.store.toggle(item_id, actor_id).await
	}

	/// Whether the actor currently has the toggle on
	pub async fn is_on(&self, item_id: &str, actor_id: &str) -> LsResult<bool> {
		check_id(item_id, "item")?;
		check_id(actor_id, "actor")?;
		self.engine.store.toggle_is_on(item_id, actor_id).await
	}

	/// Number of actors with the toggle on; 0 for unknown items
	pub async fn count(&self, item_id: &str) -> LsResult<u64> {
		check_id(item_id, "item")?;
		self.engine.store.toggle_count(item_id).await
	}

	/// One actor's toggle state across many items in a single pass, e.g.
	/// for rendering a feed page
	pub async fn is_on_batch(
		&self,
		item_ids: &[&str],
		actor_id: &str,
	) -> LsResult<HashMap<Box<str>, bool>> {
		check_id(actor_id, "actor")?;
		for item_id in item_ids {
			check_id(item_id, "item")?;
		}
		self.engine.store.toggle_is_on_batch(item_ids, actor_id).await
	}

	/// Drops all toggle state of an item, e.g. after the item was deleted
	/// in the system of record
	pub async fn invalidate(&self, item_id: &str) -> LsResult<()> {
		check_id(item_id, "item")?;
		self.engine.store.toggle_invalidate(item_id).await
	}

	/// Replaces the item's toggle state wholesale from the system of
	/// record, optionally with a cache lifetime. Returns the member count
	/// after seeding.
	pub async fn seed(
		&self,
		item_id: &str,
		actor_ids: &[&str],
		ttl: Option<Duration>,
	) -> LsResult<u64> {
		check_id(item_id, "item")?;
		for actor_id in actor_ids {
			check_id(actor_id, "actor")?;
		}
		if ttl.is_some_and(|ttl| ttl.is_zero()) {
			return Err(Error::ValidationError("seed ttl must be positive".to_string()));
		}
		self.engine.store.toggle_seed(item_id, actor_ids, ttl).await
	}
}

// vim: ts=4
