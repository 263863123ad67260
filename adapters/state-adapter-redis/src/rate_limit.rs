//! Sliding-window rate limiting operations
//!
//! Each (action, identifier) pair owns a sorted set of request timestamps.
//! One script trims entries older than the window, decides, and records the
//! new request, so concurrent callers can never overshoot the limit.

use std::time::Duration;

use rand::RngExt;

use livestate::prelude::*;
use livestate::types::RateDecision;
use livestate::utils::now_millis;

use crate::script::Script;
use crate::StateAdapterRedis;

/// KEYS: request window; ARGV: now (epoch ms), window in ms, max requests,
/// request member. Replies `{allowed, remaining, retry_after_ms}`; when the
/// request is denied, `retry_after_ms` is the time until the oldest recorded
/// request leaves the window.
pub(crate) const CHECK: Script = Script {
	name: "rate.check",
	source: r"
		local now = tonumber(ARGV[1])
		local window = tonumber(ARGV[2])
		local max = tonumber(ARGV[3])
		redis.call('ZREMRANGEBYSCORE', KEYS[1], 0, now - window)
		local count = redis.call('ZCARD', KEYS[1])
		if count < max then
			redis.call('ZADD', KEYS[1], now, ARGV[4])
			redis.call('PEXPIRE', KEYS[1], window)
			return {1, max - count - 1, 0}
		end
		local oldest = redis.call('ZRANGE', KEYS[1], 0, 0, 'WITHSCORES')
		local retry = 0
		if oldest[2] then
			retry = math.floor(tonumber(oldest[2]) + window - now)
			if retry < 0 then
				retry = 0
			end
		end
		return {0, 0, retry}
	",
};

pub(crate) async fn check_and_consume(
	adapter: &StateAdapterRedis,
	action: &str,
	identifier: &str,
	max_requests: u32,
	window: Duration,
) -> LsResult<RateDecision> {
	let now = now_millis();
	// Concurrent requests may share a millisecond, so the member carries a
	// nonce to keep every request its own window entry.
	let member = {
		let mut rng = rand::rng();
		format!("{}-{:08x}", now, rng.random_range(0..u64::MAX))
	};

	let keys = vec![adapter.keys.rate_window(action, identifier)];
	let args = vec![
		now.to_string(),
		(window.as_millis() as u64).to_string(),
		max_requests.to_string(),
		member,
	];
	let (allowed, remaining, retry_after): (i64, i64, i64) =
		adapter.scripts.invoke(&adapter.conn, &CHECK, &keys, &args).await?;
	if allowed != 1 {
		debug!("Rate limit {} hit for {}, retry in {}ms", action, identifier, retry_after);
	}
	Ok(RateDecision {
		allowed: allowed == 1,
		remaining: remaining.max(0) as u32,
		retry_after_ms: retry_after.max(0) as u64,
	})
}

pub(crate) async fn reset(
	adapter: &StateAdapterRedis,
	action: &str,
	identifier: &str,
) -> LsResult<()> {
	adapter
		.query::<i64>(redis::cmd("DEL").arg(adapter.keys.rate_window(action, identifier)))
		.await?;
	debug!("Rate limit {} reset for {}", action, identifier);
	Ok(())
}

// vim: ts=4
