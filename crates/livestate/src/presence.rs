//! Presence tracking: who is online right now
//!
//! Clients beat on a fixed cadence; an actor whose record outlives its TTL
//! silently drops to offline, an explicit sign-off records a long-lived
//! last-seen time. Single-actor questions read the authoritative record and
//! are always current. Roster questions go through the online index, which
//! may briefly over-report after a silent disappearance; roster reads prune
//! what they find stale, and [`sweep_loop`] does the same on a schedule for
//! hosts that want an eagerly tight index.

use std::collections::HashMap;
use std::time::Duration;

use crate::engine::{check_id, Engine, EngineState};
use crate::prelude::*;
use crate::types::Presence;

/// Borrowed component handle, obtained from [`EngineState::presence`]
pub struct PresenceTracker<'a> {
	pub(crate) engine: &'a EngineState,
}

impl PresenceTracker<'_> {
	/// Marks the actor online for one TTL period. Returns true only when
	/// this beat brought the actor online, so callers can emit
	/// came-online events without extra reads.
	pub async fn heartbeat(&self, actor_id: &str) -> LsResult<bool> {
		check_id(actor_id, "actor")?;
		let online_ttl = self.engine.settings.presence.online_ttl();
		self.engine.store.presence_heartbeat(actor_id, online_ttl).await
	}

	/// Explicit sign-off. Returns true if the actor was online.
	pub async fn go_offline(&self, actor_id: &str) -> LsResult<bool> {
		check_id(actor_id, "actor")?;
		let retention = self.engine.settings.presence.offline_retention;
		self.engine.store.presence_offline(actor_id, retention).await
	}

	/// Whether the actor is online right now
	pub async fn is_online(&self, actor_id: &str) -> LsResult<bool> {
		check_id(actor_id, "actor")?;
		self.engine.store.presence_is_online(actor_id).await
	}

	/// Liveness of many actors in a single pass, e.g. for a member list
	pub async fn is_online_batch(&self, actor_ids: &[&str]) -> LsResult<HashMap<Box<str>, bool>> {
		for actor_id in actor_ids {
			check_id(actor_id, "actor")?;
		}
		self.engine.store.presence_is_online_batch(actor_ids).await
	}

	/// Presence snapshot of one actor. `last_seen_at` is present for online
	/// actors and signed-off actors within the retention period; an actor
	/// that silently vanished has no last-seen once its record lapsed.
	pub async fn get(&self, actor_id: &str) -> LsResult<Presence> {
		check_id(actor_id, "actor")?;
		self.engine.store.presence_get(actor_id).await
	}

	/// All actors online right now
	pub async fn online_actors(&self) -> LsResult<Vec<Box<str>>> {
		self.engine.store.presence_online_actors().await
	}

	/// How many actors are online right now
	pub async fn online_count(&self) -> LsResult<u64> {
		self.engine.store.presence_online_count().await
	}

	/// One eager pruning pass over the online index; returns how many stale
	/// entries it dropped. Roster reads prune lazily anyway, so this is
	/// only needed when the index should stay tight between reads.
	pub async fn reconcile(&self) -> LsResult<u64> {
		self.engine.store.presence_reconcile().await
	}
}

/// Periodic online-index sweep.
///
/// The engine spawns no background tasks of its own; hosts that want eager
/// pruning run this loop themselves:
///
/// ```no_run
/// # use std::time::Duration;
/// # fn demo(engine: livestate::Engine) {
/// tokio::spawn(livestate::presence::sweep_loop(engine, Duration::from_secs(60)));
/// # }
/// ```
pub async fn sweep_loop(engine: Engine, every: Duration) {
	let mut interval = tokio::time::interval(every);
	loop {
		interval.tick().await;
		match engine.presence().reconcile().await {
			Ok(0) => {}
			Ok(removed) => debug!("Presence sweep pruned {} stale entries", removed),
			Err(err) => warn!("Presence sweep failed: {}", err),
		}
	}
}

// vim: ts=4
