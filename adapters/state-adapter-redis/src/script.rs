//! Server-side transaction scripts.
//!
//! Every mutation of this adapter runs as one Lua script inside the store,
//! so multi-key updates are atomic and no reader observes a half-applied
//! state. Scripts are registered lazily on first use and afterwards invoked
//! by their cached handle. When the store evicts its script cache (restart,
//! `SCRIPT FLUSH`), the next invocation re-registers the script and retries
//! exactly once.

use std::collections::HashMap;

use redis::aio::ConnectionManager;
use tokio::sync::RwLock;

use livestate::prelude::*;

use crate::error::map_redis_err;

/// A named Lua script, embedded at compile time
#[derive(Clone, Copy, Debug)]
pub(crate) struct Script {
	pub(crate) name: &'static str,
	pub(crate) source: &'static str,
}

#[derive(Debug)]
struct ScriptEntry {
	source: &'static str,
	sha: RwLock<Option<Box<str>>>,
}

/// Registers and runs the adapter's scripts
#[derive(Debug)]
pub(crate) struct ScriptRunner {
	scripts: HashMap<&'static str, ScriptEntry>,
}

impl ScriptRunner {
	pub(crate) fn new(scripts: &[Script]) -> Self {
		let scripts = scripts
			.iter()
			.map(|script| {
				(script.name, ScriptEntry { source: script.source, sha: RwLock::new(None) })
			})
			.collect();
		Self { scripts }
	}

	/// Runs a script and decodes its reply.
	///
	/// `keys` and `args` arrive in the script as `KEYS` and `ARGV`. The
	/// script must have been passed to [`ScriptRunner::new`].
	pub(crate) async fn invoke<T: redis::FromRedisValue>(
		&self,
		conn: &ConnectionManager,
		script: &Script,
		keys: &[String],
		args: &[String],
	) -> LsResult<T> {
		let entry = self
			.scripts
			.get(script.name)
			.ok_or_else(|| Error::Internal(format!("unregistered script: {}", script.name)))?;

		let cached = entry.sha.read().await.clone();
		let sha = match cached {
			Some(sha) => sha,
			None => Self::register(conn, entry, script.name).await?,
		};

		match Self::eval(conn, &sha, keys, args).await {
			Err(err) if err.kind() == redis::ErrorKind::Server(redis::ServerErrorKind::NoScript) => {
				warn!("Script {} missing from the store, re-registering", script.name);
				let sha = Self::register(conn, entry, script.name).await?;
				Self::eval(conn, &sha, keys, args).await.map_err(map_redis_err)
			}
			res => res.map_err(map_redis_err),
		}
	}

	async fn eval<T: redis::FromRedisValue>(
		conn: &ConnectionManager,
		sha: &str,
		keys: &[String],
		args: &[String],
	) -> redis::RedisResult<T> {
		let mut conn = conn.clone();
		let mut cmd = redis::cmd("EVALSHA");
		cmd.arg(sha).arg(keys.len());
		for key in keys {
			cmd.arg(key);
		}
		for arg in args {
			cmd.arg(arg);
		}
		cmd.query_async(&mut conn).await
	}

	async fn register(
		conn: &ConnectionManager,
		entry: &ScriptEntry,
		name: &str,
	) -> LsResult<Box<str>> {
		let mut conn = conn.clone();
		let sha: String = redis::cmd("SCRIPT")
			.arg("LOAD")
			.arg(entry.source)
			.query_async(&mut conn)
			.await
			.map_err(map_redis_err)?;
		debug!("Registered script {} as {}", name, sha);
		let sha: Box<str> = sha.into();
		*entry.sha.write().await = Some(sha.clone());
		Ok(sha)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_runner_knows_its_scripts() {
		const PING: Script = Script { name: "test.ping", source: "return 1" };
		let runner = ScriptRunner::new(&[PING]);
		assert!(runner.scripts.contains_key("test.ping"));
		assert!(!runner.scripts.contains_key("test.pong"));
	}
}

// vim: ts=4
