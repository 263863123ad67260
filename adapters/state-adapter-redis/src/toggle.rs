//! Toggle counter operations
//!
//! Membership lives in a set keyed by item, the public counter in a plain
//! key next to it. Every mutation rebuilds the counter from the set
//! cardinality in the same script, so the two can never drift apart.

use std::collections::HashMap;
use std::time::Duration;

use livestate::prelude::*;
use livestate::types::ToggleOutcome;

use crate::script::Script;
use crate::StateAdapterRedis;

/// KEYS: member set, counter; ARGV: actor id.
/// Replies `{is_on, count, was_on_before}`.
pub(crate) const FLIP: Script = Script {
	name: "toggle.flip",
	source: r"
		local was = redis.call('SISMEMBER', KEYS[1], ARGV[1])
		if was == 1 then
			redis.call('SREM', KEYS[1], ARGV[1])
		else
			redis.call('SADD', KEYS[1], ARGV[1])
		end
		local count = redis.call('SCARD', KEYS[1])
		if count > 0 then
			redis.call('SET', KEYS[2], count, 'KEEPTTL')
		else
			redis.call('DEL', KEYS[2])
		end
		return {1 - was, count, was}
	",
};

/// KEYS: member set, counter; ARGV: ttl in ms (0 keeps the keys forever),
/// then the actor ids. Replies the seeded cardinality.
pub(crate) const SEED: Script = Script {
	name: "toggle.seed",
	source: r"
		redis.call('DEL', KEYS[1], KEYS[2])
		for i = 2, #ARGV do
			redis.call('SADD', KEYS[1], ARGV[i])
		end
		local count = redis.call('SCARD', KEYS[1])
		if count > 0 then
			redis.call('SET', KEYS[2], count)
			local ttl = tonumber(ARGV[1])
			if ttl > 0 then
				redis.call('PEXPIRE', KEYS[1], ttl)
				redis.call('PEXPIRE', KEYS[2], ttl)
			end
		end
		return count
	",
};

/// KEYS: one member set per item; ARGV: actor id.
/// Replies one 0/1 flag per key, in key order.
pub(crate) const MEMBER_OF: Script = Script {
	name: "toggle.member_of",
	source: r"
		local out = {}
		for i = 1, #KEYS do
			out[i] = redis.call('SISMEMBER', KEYS[i], ARGV[1])
		end
		return out
	",
};

pub(crate) async fn flip(
	adapter: &StateAdapterRedis,
	item_id: &str,
	actor_id: &str,
) -> LsResult<ToggleOutcome> {
	let keys = vec![adapter.keys.toggle_members(item_id), adapter.keys.toggle_count(item_id)];
	let args = vec![actor_id.to_string()];
	let (is_on, count, was_on): (i64, i64, i64) =
		adapter.scripts.invoke(&adapter.conn, &FLIP, &keys, &args).await?;
	debug!("Toggle {} by {}: on={} count={}", item_id, actor_id, is_on == 1, count);
	Ok(ToggleOutcome {
		is_on: is_on == 1,
		count: count.max(0) as u64,
		was_on_before: was_on == 1,
	})
}

pub(crate) async fn is_on(
	adapter: &StateAdapterRedis,
	item_id: &str,
	actor_id: &str,
) -> LsResult<bool> {
	let on: i64 = adapter
		.query(redis::cmd("SISMEMBER").arg(adapter.keys.toggle_members(item_id)).arg(actor_id))
		.await?;
	Ok(on == 1)
}

pub(crate) async fn count(adapter: &StateAdapterRedis, item_id: &str) -> LsResult<u64> {
	let count: Option<i64> =
		adapter.query(redis::cmd("GET").arg(adapter.keys.toggle_count(item_id))).await?;
	Ok(count.unwrap_or(0).max(0) as u64)
}

pub(crate) async fn is_on_batch(
	adapter: &StateAdapterRedis,
	item_ids: &[&str],
	actor_id: &str,
) -> LsResult<HashMap<Box<str>, bool>> {
	if item_ids.is_empty() {
		return Ok(HashMap::new());
	}
	let keys: Vec<String> = item_ids.iter().map(|id| adapter.keys.toggle_members(id)).collect();
	let args = vec![actor_id.to_string()];
	let flags: Vec<i64> = adapter.scripts.invoke(&adapter.conn, &MEMBER_OF, &keys, &args).await?;
	Ok(item_ids.iter().zip(flags).map(|(id, flag)| ((*id).into(), flag == 1)).collect())
}

pub(crate) async fn invalidate(adapter: &StateAdapterRedis, item_id: &str) -> LsResult<()> {
	adapter
		.query::<i64>(
			redis::cmd("DEL")
				.arg(adapter.keys.toggle_members(item_id))
				.arg(adapter.keys.toggle_count(item_id)),
		)
		.await?;
	debug!("Toggle state for {} invalidated", item_id);
	Ok(())
}

pub(crate) async fn seed(
	adapter: &StateAdapterRedis,
	item_id: &str,
	actor_ids: &[&str],
	ttl: Option<Duration>,
) -> LsResult<u64> {
	let keys = vec![adapter.keys.toggle_members(item_id), adapter.keys.toggle_count(item_id)];
	let mut args = Vec::with_capacity(actor_ids.len() + 1);
	args.push(ttl.map_or(0, |ttl| ttl.as_millis() as u64).to_string());
	args.extend(actor_ids.iter().map(|actor| (*actor).to_string()));
	let count: i64 = adapter.scripts.invoke(&adapter.conn, &SEED, &keys, &args).await?;
	debug!("Toggle {} seeded with {} members", item_id, count);
	Ok(count.max(0) as u64)
}

// vim: ts=4
