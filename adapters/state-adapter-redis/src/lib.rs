//! Redis-based State Adapter
//!
//! Implements the StateAdapter trait on top of Redis. Every mutation runs as
//! an atomic server-side Lua script, so multi-key updates (membership plus
//! counter, record plus index, marker plus score) commit as one step and
//! concurrent callers never observe a half-applied state.
//!
//! # Storage Layout
//!
//! All keys carry the configured prefix (`ls:` unless overridden):
//! - `tog:mem:{item}` / `tog:cnt:{item}` - toggle member set and counter
//! - `prs:rec:{actor}` - presence record hash, expires with its TTL
//! - `prs:online` - index set of actors believed online
//! - `rate:{action}:{identifier}` - sliding window of request timestamps
//! - `trend:scores` - sorted set of item scores
//! - `trend:seen:{item}:{kind}:{actor}` - interaction dedup marker
//! - `trend:stats:{item}` - per-kind interaction counters
//!
//! # Script Lifecycle
//!
//! Scripts register lazily on first use and run by cached handle afterwards.
//! A store that lost its script cache answers NOSCRIPT; the adapter then
//! re-registers and retries that invocation once.
//!
//! Requires a Redis 6.0 or newer server.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;

use livestate::{
	prelude::*,
	state_adapter::{InteractionEvent, StateAdapter},
	types::{Presence, RateDecision, ToggleOutcome, TrendingEntry, TrendingOutcome},
};

mod error;
mod keys;
mod presence;
mod rate_limit;
mod script;
mod toggle;
mod trending;

use error::map_redis_err;
use keys::Keys;
use script::{Script, ScriptRunner};

/// Connection settings of the adapter
#[derive(Clone, Debug)]
pub struct AdapterConfig {
	/// Store URL, e.g. `redis://127.0.0.1:6379/`
	pub url: Box<str>,
	/// Prefix prepended to every key
	pub key_prefix: Box<str>,
	/// Upper bound on batch sizes accepted by the batch operations
	pub max_batch: usize,
}

impl Default for AdapterConfig {
	fn default() -> Self {
		Self {
			url: "redis://127.0.0.1:6379/".into(),
			key_prefix: "ls:".into(),
			max_batch: 1024,
		}
	}
}

pub struct StateAdapterRedis {
	conn: ConnectionManager,
	keys: Keys,
	scripts: ScriptRunner,
	max_batch: usize,
}

impl std::fmt::Debug for StateAdapterRedis {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("StateAdapterRedis")
			.field("keys", &self.keys)
			.field("max_batch", &self.max_batch)
			.finish_non_exhaustive()
	}
}

impl StateAdapterRedis {
	pub async fn new(config: AdapterConfig) -> LsResult<Self> {
		let client = redis::Client::open(config.url.as_ref())
			.map_err(|err| Error::ValidationError(format!("invalid store URL: {}", err)))?;
		let conn = client.get_connection_manager().await.map_err(map_redis_err)?;
		info!("State store connected (key prefix {:?})", config.key_prefix);

		Ok(Self {
			conn,
			keys: Keys::new(&config.key_prefix),
			scripts: ScriptRunner::new(&script_table()),
			max_batch: config.max_batch,
		})
	}

	pub(crate) async fn query<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd) -> LsResult<T> {
		let mut conn = self.conn.clone();
		cmd.query_async(&mut conn).await.map_err(map_redis_err)
	}

	fn check_batch(&self, len: usize) -> LsResult<()> {
		if len > self.max_batch {
			Err(Error::ValidationError(format!(
				"batch of {} exceeds the limit of {}",
				len, self.max_batch
			)))
		} else {
			Ok(())
		}
	}
}

fn script_table() -> Vec<Script> {
	vec![
		toggle::FLIP,
		toggle::SEED,
		toggle::MEMBER_OF,
		presence::BEAT,
		presence::OFFLINE,
		presence::LIVENESS,
		presence::ROSTER,
		presence::RECONCILE,
		rate_limit::CHECK,
		trending::RECORD,
		trending::TOP,
		trending::REMOVE,
	]
}

#[async_trait]
impl StateAdapter for StateAdapterRedis {
	async fn ping(&self) -> LsResult<()> {
		self.query::<String>(&redis::cmd("PING")).await?;
		Ok(())
	}

	// Toggle counter
	//****************
	async fn toggle(&self, item_id: &str, actor_id: &str) -> LsResult<ToggleOutcome> {
		toggle::flip(self, item_id, actor_id).await
	}

	async fn toggle_is_on(&self, item_id: &str, actor_id: &str) -> LsResult<bool> {
		toggle::is_on(self, item_id, actor_id).await
	}

	async fn toggle_count(&self, item_id: &str) -> LsResult<u64> {
		toggle::count(self, item_id).await
	}

	async fn toggle_is_on_batch(
		&self,
		item_ids: &[&str],
		actor_id: &str,
	) -> LsResult<HashMap<Box<str>, bool>> {
		self.check_batch(item_ids.len())?;
		toggle::is_on_batch(self, item_ids, actor_id).await
	}

	async fn toggle_invalidate(&self, item_id: &str) -> LsResult<()> {
		toggle::invalidate(self, item_id).await
	}

	async fn toggle_seed(
		&self,
		item_id: &str,
		actor_ids: &[&str],
		ttl: Option<Duration>,
	) -> LsResult<u64> {
		self.check_batch(actor_ids.len())?;
		toggle::seed(self, item_id, actor_ids, ttl).await
	}

	// Presence
	//**********
	async fn presence_heartbeat(&self, actor_id: &str, online_ttl: Duration) -> LsResult<bool> {
		presence::heartbeat(self, actor_id, online_ttl).await
	}

	async fn presence_offline(&self, actor_id: &str, retention: Duration) -> LsResult<bool> {
		presence::offline(self, actor_id, retention).await
	}

	async fn presence_is_online(&self, actor_id: &str) -> LsResult<bool> {
		presence::is_online(self, actor_id).await
	}

	async fn presence_is_online_batch(
		&self,
		actor_ids: &[&str],
	) -> LsResult<HashMap<Box<str>, bool>> {
		self.check_batch(actor_ids.len())?;
		presence::is_online_batch(self, actor_ids).await
	}

	async fn presence_get(&self, actor_id: &str) -> LsResult<Presence> {
		presence::get(self, actor_id).await
	}

	async fn presence_online_actors(&self) -> LsResult<Vec<Box<str>>> {
		presence::online_actors(self).await
	}

	async fn presence_online_count(&self) -> LsResult<u64> {
		let actors = presence::online_actors(self).await?;
		Ok(actors.len() as u64)
	}

	async fn presence_reconcile(&self) -> LsResult<u64> {
		presence::reconcile(self).await
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
		rate_limit::check_and_consume(self, action, identifier, max_requests, window).await
	}

	async fn rate_reset(&self, action: &str, identifier: &str) -> LsResult<()> {
		rate_limit::reset(self, action, identifier).await
	}

	// Trending
	//**********
	async fn trending_record(&self, event: &InteractionEvent<'_>) -> LsResult<TrendingOutcome> {
		trending::record(self, event).await
	}

	async fn trending_top(&self, limit: u32, offset: u32) -> LsResult<Vec<TrendingEntry>> {
		trending::top(self, limit, offset).await
	}

	async fn trending_remove(&self, item_id: &str) -> LsResult<()> {
		trending::remove(self, item_id).await
	}

	async fn trending_breakdown(&self, item_id: &str) -> LsResult<HashMap<Box<str>, u64>> {
		trending::breakdown(self, item_id).await
	}
}

// vim: ts=4
