//! In-memory State Adapter
//!
//! Implements the StateAdapter trait on process-local data structures with
//! the same observable behavior as the scripted store adapter: TTL expiry,
//! the counter rebuilt from the member set, the lazily repaired online
//! index, interaction dedup and age decay. Nothing is shared or persisted,
//! so it suits tests and single-process development setups.
//!
//! Expiry is evaluated lazily on access against a monotonic clock. State
//! sits behind one mutex; operations are short and never await while
//! holding it.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;

use livestate::{
	lock,
	prelude::*,
	state_adapter::{InteractionEvent, StateAdapter},
	types::{Presence, RateDecision, ToggleOutcome, TrendingEntry, TrendingOutcome},
	utils::now_millis,
};

#[derive(Debug, Default)]
struct ToggleEntry {
	members: HashSet<Box<str>>,
	expires_at: Option<Instant>,
}

#[derive(Debug)]
struct PresenceEntry {
	online: bool,
	last_seen: Timestamp,
	expires_at: Instant,
}

#[derive(Debug, Default)]
struct MemState {
	toggles: HashMap<Box<str>, ToggleEntry>,
	presence: HashMap<Box<str>, PresenceEntry>,
	online: HashSet<Box<str>>,
	windows: HashMap<(Box<str>, Box<str>), Vec<u64>>,
	scores: HashMap<Box<str>, i64>,
	markers: HashMap<Box<str>, Instant>,
	stats: HashMap<Box<str>, HashMap<Box<str>, u64>>,
}

impl MemState {
	fn drop_toggle_if_expired(&mut self, item_id: &str, now: Instant) {
		let expired = self
			.toggles
			.get(item_id)
			.is_some_and(|entry| entry.expires_at.is_some_and(|at| at <= now));
		if expired {
			self.toggles.remove(item_id);
		}
	}

	fn presence_alive(&self, actor_id: &str, now: Instant) -> Option<&PresenceEntry> {
		self.presence.get(actor_id).filter(|entry| entry.expires_at > now)
	}

	/// Drops online-index entries whose record lapsed or turned offline;
	/// returns how many were dropped
	fn prune_online(&mut self, now: Instant) -> u64 {
		let mut stale = Vec::new();
		for actor in self.online.iter() {
			if !self.presence_alive(actor, now).is_some_and(|entry| entry.online) {
				stale.push(actor.clone());
			}
		}
		for actor in &stale {
			self.online.remove(actor);
		}
		stale.len() as u64
	}

	/// Descending-score rank with the same tie order as the scripted store:
	/// equal scores rank in reverse lexical order of the item id
	fn rank_of(&self, item_id: &str) -> Option<u64> {
		let score = *self.scores.get(item_id)?;
		let ahead = self
			.scores
			.iter()
			.filter(|&(ref other, &s)| s > score || (s == score && &***other > item_id))
			.count();
		Some(ahead as u64)
	}
}

/// Process-local adapter with store-equivalent semantics
#[derive(Debug, Default)]
pub struct StateAdapterMem {
	state: Mutex<MemState>,
}

impl StateAdapterMem {
	pub fn new() -> Self {
		Self::default()
	}
}

#[async_trait]
impl StateAdapter for StateAdapterMem {
	async fn ping(&self) -> LsResult<()> {
		// Nothing to reach; a poisoned lock is the only failure this
		// adapter can report
		let guard = lock!(self.state)?;
		drop(guard);
		Ok(())
	}

	// Toggle counter
	//****************
	async fn toggle(&self, item_id: &str, actor_id: &str) -> LsResult<ToggleOutcome> {
		let mut state = lock!(self.state)?;
		let now = Instant::now();
		state.drop_toggle_if_expired(item_id, now);

		let entry = state.toggles.entry(item_id.into()).or_default();
		let was_on_before = !entry.members.insert(actor_id.into());
		if was_on_before {
			entry.members.remove(actor_id);
		}
		let count = entry.members.len() as u64;
		if count == 0 {
			state.toggles.remove(item_id);
		}
		Ok(ToggleOutcome { is_on: !was_on_before, count, was_on_before })
	}

	async fn toggle_is_on(&self, item_id: &str, actor_id: &str) -> LsResult<bool> {
		let mut state = lock!(self.state)?;
		state.drop_toggle_if_expired(item_id, Instant::now());
		Ok(state.toggles.get(item_id).is_some_and(|entry| entry.members.contains(actor_id)))
	}

	async fn toggle_count(&self, item_id: &str) -> LsResult<u64> {
		let mut state = lock!(self.state)?;
		state.drop_toggle_if_expired(item_id, Instant::now());
		Ok(state.toggles.get(item_id).map_or(0, |entry| entry.members.len() as u64))
	}

	async fn toggle_is_on_batch(
		&self,
		item_ids: &[&str],
		actor_id: &str,
	) -> LsResult<HashMap<Box<str>, bool>> {
		let mut state = lock!(self.state)?;
		let now = Instant::now();
		let mut out = HashMap::with_capacity(item_ids.len());
		for item_id in item_ids {
			state.drop_toggle_if_expired(item_id, now);
			let on =
				state.toggles.get(*item_id).is_some_and(|entry| entry.members.contains(actor_id));
			out.insert((*item_id).into(), on);
		}
		Ok(out)
	}

	async fn toggle_invalidate(&self, item_id: &str) -> LsResult<()> {
		let mut state = lock!(self.state)?;
		state.toggles.remove(item_id);
		Ok(())
	}

	async fn toggle_seed(
		&self,
		item_id: &str,
		actor_ids: &[&str],
		ttl: Option<Duration>,
	) -> LsResult<u64> {
		let mut state = lock!(self.state)?;
		state.toggles.remove(item_id);
		let members: HashSet<Box<str>> = actor_ids.iter().map(|actor| (*actor).into()).collect();
		let count = members.len() as u64;
		if count > 0 {
			let expires_at = ttl.map(|ttl| Instant::now() + ttl);
			state.toggles.insert(item_id.into(), ToggleEntry { members, expires_at });
		}
		Ok(count)
	}

	// Presence
	//**********
	async fn presence_heartbeat(&self, actor_id: &str, online_ttl: Duration) -> LsResult<bool> {
		let mut state = lock!(self.state)?;
		let now = Instant::now();
		let was_online = state.presence_alive(actor_id, now).is_some_and(|entry| entry.online);
		state.presence.insert(
			actor_id.into(),
			PresenceEntry {
				online: true,
				last_seen: Timestamp::now(),
				expires_at: now + online_ttl,
			},
		);
		state.online.insert(actor_id.into());
		Ok(!was_online)
	}

	async fn presence_offline(&self, actor_id: &str, retention: Duration) -> LsResult<bool> {
		let mut state = lock!(self.state)?;
		let now = Instant::now();
		let was_online = state.presence_alive(actor_id, now).is_some_and(|entry| entry.online);
		state.online.remove(actor_id);
		state.presence.insert(
			actor_id.into(),
			PresenceEntry {
				online: false,
				last_seen: Timestamp::now(),
				expires_at: now + retention,
			},
		);
		Ok(was_online)
	}

	async fn presence_is_online(&self, actor_id: &str) -> LsResult<bool> {
		let state = lock!(self.state)?;
		Ok(state.presence_alive(actor_id, Instant::now()).is_some_and(|entry| entry.online))
	}

	async fn presence_is_online_batch(
		&self,
		actor_ids: &[&str],
	) -> LsResult<HashMap<Box<str>, bool>> {
		let state = lock!(self.state)?;
		let now = Instant::now();
		Ok(actor_ids
			.iter()
			.map(|actor| {
				let online = state.presence_alive(actor, now).is_some_and(|entry| entry.online);
				((*actor).into(), online)
			})
			.collect())
	}

	async fn presence_get(&self, actor_id: &str) -> LsResult<Presence> {
		let state = lock!(self.state)?;
		Ok(match state.presence_alive(actor_id, Instant::now()) {
			Some(entry) => {
				Presence { is_online: entry.online, last_seen_at: Some(entry.last_seen) }
			}
			None => Presence { is_online: false, last_seen_at: None },
		})
	}

	async fn presence_online_actors(&self) -> LsResult<Vec<Box<str>>> {
		let mut state = lock!(self.state)?;
		state.prune_online(Instant::now());
		Ok(state.online.iter().cloned().collect())
	}

	async fn presence_online_count(&self) -> LsResult<u64> {
		let mut state = lock!(self.state)?;
		state.prune_online(Instant::now());
		Ok(state.online.len() as u64)
	}

	async fn presence_reconcile(&self) -> LsResult<u64> {
		let mut state = lock!(self.state)?;
		Ok(state.prune_online(Instant::now()))
	}

	// Rate limiting
	//***************
	async fn rate_check_and_consume(
		&self,
		action: &str,
		identifier: &str,
		max_requests: u32,
		window: Duration,
	) -> LsResult<RateDecision> {
		let mut state = lock!(self.state)?;
		let now = now_millis();
		let window_ms = window.as_millis() as u64;

		let key = (action.into(), identifier.into());
		let times = state.windows.entry(key).or_default();
		times.retain(|&at| at + window_ms > now);

		let count = times.len();
		if count < max_requests as usize {
			times.push(now);
			Ok(RateDecision {
				allowed: true,
				remaining: max_requests - count as u32 - 1,
				retry_after_ms: 0,
			})
		} else {
			let oldest = times.first().copied().unwrap_or(now);
			Ok(RateDecision {
				allowed: false,
				remaining: 0,
				retry_after_ms: (oldest + window_ms).saturating_sub(now),
			})
		}
	}

	async fn rate_reset(&self, action: &str, identifier: &str) -> LsResult<()> {
		let mut state = lock!(self.state)?;
		let key: (Box<str>, Box<str>) = (action.into(), identifier.into());
		state.windows.remove(&key);
		Ok(())
	}

	// Trending
	//**********
	async fn trending_record(&self, event: &InteractionEvent<'_>) -> LsResult<TrendingOutcome> {
		let mut state = lock!(self.state)?;
		let now = Instant::now();

		let marker: Box<str> =
			format!("{}:{}:{}", event.item_id, event.kind, event.actor_id).into();
		if state.markers.get(&marker).is_some_and(|&at| at > now) {
			return Ok(match state.scores.get(event.item_id).copied() {
				Some(score) => TrendingOutcome { score, rank: state.rank_of(event.item_id) },
				None => TrendingOutcome { score: 0, rank: None },
			});
		}
		state.markers.insert(marker, now + event.dedup_ttl);

		// Age enters in whole hours, so a fresh item earns the full weight
		let half = u64::from(event.half_life_hours);
		let age_hours = now_millis()
			.saturating_sub(event.item_created_at.as_millis().max(0) as u64)
			/ 3_600_000;
		let increment = ((u64::from(event.weight) * half) / (half + age_hours).max(1)).max(1);

		let score = {
			let entry = state.scores.entry(event.item_id.into()).or_insert(0);
			*entry += increment as i64;
			*entry
		};
		*state
			.stats
			.entry(event.item_id.into())
			.or_default()
			.entry(event.kind.into())
			.or_insert(0) += 1;

		Ok(TrendingOutcome { score, rank: state.rank_of(event.item_id) })
	}

	async fn trending_top(&self, limit: u32, offset: u32) -> LsResult<Vec<TrendingEntry>> {
		if limit == 0 {
			return Ok(Vec::new());
		}
		let mut state = lock!(self.state)?;
		state.scores.retain(|_, score| *score > 0);

		let mut entries: Vec<(Box<str>, i64)> =
			state.scores.iter().map(|(item, &score)| (item.clone(), score)).collect();
		entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| b.0.cmp(&a.0)));
		Ok(entries
			.into_iter()
			.skip(offset as usize)
			.take(limit as usize)
			.map(|(item_id, score)| TrendingEntry { item_id, score })
			.collect())
	}

	async fn trending_remove(&self, item_id: &str) -> LsResult<()> {
		let mut state = lock!(self.state)?;
		state.scores.remove(item_id);
		state.stats.remove(item_id);
		Ok(())
	}

	async fn trending_breakdown(&self, item_id: &str) -> LsResult<HashMap<Box<str>, u64>> {
		let state = lock!(self.state)?;
		Ok(state.stats.get(item_id).cloned().unwrap_or_default())
	}
}


// vim: ts=4
