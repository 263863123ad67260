//! Trending score operations
//!
//! Scores live in one sorted set, one member per item. An interaction first
//! claims a dedup marker; only a fresh claim scores. The increment decays
//! with item age on a half-life curve but never below one point, so old
//! items still move when people interact with them. Per-item interaction
//! counts by kind sit in a hash next to the scores.

use std::collections::HashMap;

use livestate::prelude::*;
use livestate::state_adapter::InteractionEvent;
use livestate::types::{TrendingEntry, TrendingOutcome};
use livestate::utils::now_millis;

use crate::script::Script;
use crate::StateAdapterRedis;

/// KEYS: dedup marker, score set, stats hash; ARGV: item id, kind, weight,
/// marker ttl in ms, now (epoch ms), item creation (epoch ms), half-life in
/// hours. The increment decays with the item's age in whole hours, so a
/// fresh item always earns the full weight. Replies `{recorded, score,
/// rank}` with a -1 rank for an unranked item; a repeated interaction
/// leaves every key untouched.
pub(crate) const RECORD: Script = Script {
	name: "trend.record",
	source: r"
		local item = ARGV[1]
		if redis.call('EXISTS', KEYS[1]) == 1 then
			local score = redis.call('ZSCORE', KEYS[2], item)
			if score then
				return {0, tonumber(score), redis.call('ZREVRANK', KEYS[2], item)}
			end
			return {0, 0, -1}
		end
		redis.call('SET', KEYS[1], 1, 'PX', tonumber(ARGV[4]))
		local weight = tonumber(ARGV[3])
		local half = tonumber(ARGV[7])
		local age = tonumber(ARGV[5]) - tonumber(ARGV[6])
		if age < 0 then
			age = 0
		end
		age = math.floor(age / 3600000)
		local denom = half + age
		if denom < 1 then
			denom = 1
		end
		local inc = math.floor(weight * half / denom)
		if inc < 1 then
			inc = 1
		end
		local score = redis.call('ZINCRBY', KEYS[2], inc, item)
		redis.call('HINCRBY', KEYS[3], ARGV[2], 1)
		return {1, tonumber(score), redis.call('ZREVRANK', KEYS[2], item)}
	",
};

/// KEYS: score set; ARGV: offset, limit. Drops items without a positive
/// score, then replies the requested page as `{item, score, item, score...}`
/// in descending score order.
pub(crate) const TOP: Script = Script {
	name: "trend.top",
	source: r"
		redis.call('ZREMRANGEBYSCORE', KEYS[1], '-inf', 0)
		local start = tonumber(ARGV[1])
		local stop = start + tonumber(ARGV[2]) - 1
		return redis.call('ZREVRANGE', KEYS[1], start, stop, 'WITHSCORES')
	",
};

/// KEYS: score set, stats hash; ARGV: item id.
pub(crate) const REMOVE: Script = Script {
	name: "trend.remove",
	source: r"
		local removed = redis.call('ZREM', KEYS[1], ARGV[1])
		redis.call('DEL', KEYS[2])
		return removed
	",
};

pub(crate) async fn record(
	adapter: &StateAdapterRedis,
	event: &InteractionEvent<'_>,
) -> LsResult<TrendingOutcome> {
	let keys = vec![
		adapter.keys.trending_marker(event.item_id, event.kind, event.actor_id),
		adapter.keys.trending_scores(),
		adapter.keys.trending_stats(event.item_id),
	];
	let args = vec![
		event.item_id.to_string(),
		event.kind.to_string(),
		event.weight.to_string(),
		(event.dedup_ttl.as_millis() as u64).to_string(),
		now_millis().to_string(),
		event.item_created_at.as_millis().to_string(),
		event.half_life_hours.to_string(),
	];
	let (recorded, score, rank): (i64, i64, i64) =
		adapter.scripts.invoke(&adapter.conn, &RECORD, &keys, &args).await?;
	if recorded == 0 {
		debug!("Duplicate {} on {} by {} ignored", event.kind, event.item_id, event.actor_id);
	}
	Ok(TrendingOutcome { score, rank: (rank >= 0).then_some(rank as u64) })
}

pub(crate) async fn top(
	adapter: &StateAdapterRedis,
	limit: u32,
	offset: u32,
) -> LsResult<Vec<TrendingEntry>> {
	if limit == 0 {
		return Ok(Vec::new());
	}
	let keys = vec![adapter.keys.trending_scores()];
	let args = vec![offset.to_string(), limit.to_string()];
	let entries: Vec<(String, i64)> =
		adapter.scripts.invoke(&adapter.conn, &TOP, &keys, &args).await?;
	Ok(entries
		.into_iter()
		.map(|(item_id, score)| TrendingEntry { item_id: item_id.into(), score })
		.collect())
}

pub(crate) async fn remove(adapter: &StateAdapterRedis, item_id: &str) -> LsResult<()> {
	let keys = vec![adapter.keys.trending_scores(), adapter.keys.trending_stats(item_id)];
	let args = vec![item_id.to_string()];
	let removed: i64 = adapter.scripts.invoke(&adapter.conn, &REMOVE, &keys, &args).await?;
	debug!("Item {} removed from trending (ranked: {})", item_id, removed == 1);
	Ok(())
}

pub(crate) async fn breakdown(
	adapter: &StateAdapterRedis,
	item_id: &str,
) -> LsResult<HashMap<Box<str>, u64>> {
	let counts: HashMap<String, u64> =
		adapter.query(redis::cmd("HGETALL").arg(adapter.keys.trending_stats(item_id))).await?;
	Ok(counts.into_iter().map(|(kind, count)| (kind.into(), count)).collect())
}

// vim: ts=4
