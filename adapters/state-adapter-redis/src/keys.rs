//! Key layout of the adapter inside the shared store.
//!
//! Every key carries the configured prefix so several deployments can share
//! one database. Identifiers always sit at the end of a key, after a fixed
//! namespace segment, so the namespaces cannot collide with each other no
//! matter what identifiers callers pick.

/// Builds the store keys for one configured prefix.
#[derive(Clone, Debug)]
pub(crate) struct Keys {
	prefix: Box<str>,
}

impl Keys {
	pub(crate) fn new(prefix: &str) -> Self {
		Self { prefix: prefix.into() }
	}

	/// Set of actor ids that currently have the toggle on
	pub(crate) fn toggle_members(&self, item_id: &str) -> String {
		format!("{}tog:mem:{}", self.prefix, item_id)
	}

	/// Denormalized toggle counter, kept equal to the member set cardinality
	pub(crate) fn toggle_count(&self, item_id: &str) -> String {
		format!("{}tog:cnt:{}", self.prefix, item_id)
	}

	/// Per-actor presence record (hash with `status` and `last_seen` fields)
	pub(crate) fn presence_record(&self, actor_id: &str) -> String {
		format!("{}{}{}", self.prefix, PRESENCE_RECORD_SEGMENT, actor_id)
	}

	/// Prefix of the presence records, for scripts that derive record keys
	/// from the online index members
	pub(crate) fn presence_record_prefix(&self) -> String {
		format!("{}{}", self.prefix, PRESENCE_RECORD_SEGMENT)
	}

	/// Index set of actors believed to be online
	pub(crate) fn presence_online(&self) -> String {
		format!("{}prs:online", self.prefix)
	}

	/// Sliding window of request timestamps for one action and identifier
	pub(crate) fn rate_window(&self, action: &str, identifier: &str) -> String {
		format!("{}rate:{}:{}", self.prefix, action, identifier)
	}

	/// Sorted set of trending scores, one member per item
	pub(crate) fn trending_scores(&self) -> String {
		format!("{}trend:scores", self.prefix)
	}

	/// Dedup marker for one (item, kind, actor) interaction
	pub(crate) fn trending_marker(&self, item_id: &str, kind: &str, actor_id: &str) -> String {
		format!("{}trend:seen:{}:{}:{}", self.prefix, item_id, kind, actor_id)
	}

	/// Per-item interaction counters by kind
	pub(crate) fn trending_stats(&self, item_id: &str) -> String {
		format!("{}trend:stats:{}", self.prefix, item_id)
	}
}

const PRESENCE_RECORD_SEGMENT: &str = "prs:rec:";


// vim: ts=4
