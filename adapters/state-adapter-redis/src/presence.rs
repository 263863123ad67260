//! Presence tracking operations
//!
//! Each actor has a presence record: a hash with `status` and `last_seen`
//! fields. Heartbeats write it with a short TTL, explicit sign-offs with a
//! long one, so a silently vanished actor drops to unknown once the short
//! TTL lapses. The record is authoritative for every liveness question.
//!
//! Next to the records sits one index set of actors believed online. The
//! index can over-report: when a record expires the actor stays in the set
//! until a roster read or a reconcile pass prunes it. Roster reads therefore
//! check every member against its record and drop stale entries on the way.

use std::collections::HashMap;
use std::time::Duration;

use livestate::prelude::*;
use livestate::types::Presence;

use crate::script::Script;
use crate::StateAdapterRedis;

/// KEYS: record, online index; ARGV: now (epoch ms), record ttl in ms,
/// actor id. Replies 1 when the actor was not online before.
pub(crate) const BEAT: Script = Script {
	name: "presence.beat",
	source: r"
		local was = redis.call('HGET', KEYS[1], 'status')
		redis.call('HSET', KEYS[1], 'status', 'online', 'last_seen', ARGV[1])
		redis.call('PEXPIRE', KEYS[1], tonumber(ARGV[2]))
		redis.call('SADD', KEYS[2], ARGV[3])
		if was == 'online' then
			return 0
		end
		return 1
	",
};

/// KEYS: record, online index; ARGV: now (epoch ms), retention in ms,
/// actor id. Replies 1 when the actor was online before.
pub(crate) const OFFLINE: Script = Script {
	name: "presence.offline",
	source: r"
		local was = redis.call('HGET', KEYS[1], 'status')
		redis.call('SREM', KEYS[2], ARGV[3])
		redis.call('HSET', KEYS[1], 'status', 'offline', 'last_seen', ARGV[1])
		redis.call('PEXPIRE', KEYS[1], tonumber(ARGV[2]))
		if was == 'online' then
			return 1
		end
		return 0
	",
};

/// KEYS: one record per actor. Replies one 0/1 flag per key, in key order.
pub(crate) const LIVENESS: Script = Script {
	name: "presence.liveness",
	source: r"
		local out = {}
		for i = 1, #KEYS do
			if redis.call('HGET', KEYS[i], 'status') == 'online' then
				out[i] = 1
			else
				out[i] = 0
			end
		end
		return out
	",
};

/// KEYS: online index; ARGV: record key prefix. Replies the actor ids whose
/// record confirms them online; stale index entries are dropped on the way.
pub(crate) const ROSTER: Script = Script {
	name: "presence.roster",
	source: r"
		local out = {}
		local members = redis.call('SMEMBERS', KEYS[1])
		for i = 1, #members do
			if redis.call('HGET', ARGV[1] .. members[i], 'status') == 'online' then
				out[#out + 1] = members[i]
			else
				redis.call('SREM', KEYS[1], members[i])
			end
		end
		return out
	",
};

/// KEYS: online index; ARGV: record key prefix. Replies the number of stale
/// index entries it removed.
pub(crate) const RECONCILE: Script = Script {
	name: "presence.reconcile",
	source: r"
		local removed = 0
		local members = redis.call('SMEMBERS', KEYS[1])
		for i = 1, #members do
			if redis.call('HGET', ARGV[1] .. members[i], 'status') ~= 'online' then
				redis.call('SREM', KEYS[1], members[i])
				removed = removed + 1
			end
		end
		return removed
	",
};

pub(crate) async fn heartbeat(
	adapter: &StateAdapterRedis,
	actor_id: &str,
	online_ttl: Duration,
) -> LsResult<bool> {
	let keys = vec![adapter.keys.presence_record(actor_id), adapter.keys.presence_online()];
	let args = vec![
		Timestamp::now().to_string(),
		(online_ttl.as_millis() as u64).to_string(),
		actor_id.to_string(),
	];
	let came_online: i64 = adapter.scripts.invoke(&adapter.conn, &BEAT, &keys, &args).await?;
	if came_online == 1 {
		debug!("Actor {} came online", actor_id);
	}
	Ok(came_online == 1)
}

pub(crate) async fn offline(
	adapter: &StateAdapterRedis,
	actor_id: &str,
	retention: Duration,
) -> LsResult<bool> {
	let keys = vec![adapter.keys.presence_record(actor_id), adapter.keys.presence_online()];
	let args = vec![
		Timestamp::now().to_string(),
		(retention.as_millis() as u64).to_string(),
		actor_id.to_string(),
	];
	let went_offline: i64 = adapter.scripts.invoke(&adapter.conn, &OFFLINE, &keys, &args).await?;
	if went_offline == 1 {
		debug!("Actor {} went offline", actor_id);
	}
	Ok(went_offline == 1)
}

pub(crate) async fn is_online(adapter: &StateAdapterRedis, actor_id: &str) -> LsResult<bool> {
	let status: Option<String> = adapter
		.query(redis::cmd("HGET").arg(adapter.keys.presence_record(actor_id)).arg("status"))
		.await?;
	Ok(status.as_deref() == Some("online"))
}

pub(crate) async fn is_online_batch(
	adapter: &StateAdapterRedis,
	actor_ids: &[&str],
) -> LsResult<HashMap<Box<str>, bool>> {
	if actor_ids.is_empty() {
		return Ok(HashMap::new());
	}
	let keys: Vec<String> =
		actor_ids.iter().map(|actor| adapter.keys.presence_record(actor)).collect();
	let flags: Vec<i64> = adapter.scripts.invoke(&adapter.conn, &LIVENESS, &keys, &[]).await?;
	Ok(actor_ids.iter().zip(flags).map(|(actor, flag)| ((*actor).into(), flag == 1)).collect())
}

pub(crate) async fn get(adapter: &StateAdapterRedis, actor_id: &str) -> LsResult<Presence> {
	let (status, last_seen): (Option<String>, Option<i64>) = adapter
		.query(
			redis::cmd("HMGET")
				.arg(adapter.keys.presence_record(actor_id))
				.arg("status")
				.arg("last_seen"),
		)
		.await?;
	Ok(Presence {
		is_online: status.as_deref() == Some("online"),
		last_seen_at: last_seen.map(Timestamp),
	})
}

pub(crate) async fn online_actors(adapter: &StateAdapterRedis) -> LsResult<Vec<Box<str>>> {
	let keys = vec![adapter.keys.presence_online()];
	let args = vec![adapter.keys.presence_record_prefix()];
	let actors: Vec<String> = adapter.scripts.invoke(&adapter.conn, &ROSTER, &keys, &args).await?;
	Ok(actors.into_iter().map(Into::into).collect())
}

pub(crate) async fn reconcile(adapter: &StateAdapterRedis) -> LsResult<u64> {
	let keys = vec![adapter.keys.presence_online()];
	let args = vec![adapter.keys.presence_record_prefix()];
	let removed: i64 = adapter.scripts.invoke(&adapter.conn, &RECONCILE, &keys, &args).await?;
	if removed > 0 {
		debug!("Pruned {} stale entries from the online index", removed);
	}
	Ok(removed.max(0) as u64)
}

// vim: ts=4
