//! Time-dependent behavior of the in-memory adapter, driven with
//! millisecond TTLs so the suite stays fast.

use std::time::Duration;

use livestate::state_adapter::{InteractionEvent, StateAdapter};
use livestate::types::Timestamp;
use livestate_state_adapter_mem::StateAdapterMem;

fn short_like(item_id: &'static str, actor_id: &'static str) -> InteractionEvent<'static> {
	InteractionEvent {
		item_id,
		actor_id,
		kind: "like",
		weight: 3,
		dedup_ttl: Duration::from_millis(150),
		item_created_at: Timestamp::now(),
		half_life_hours: 48,
	}
}

#[tokio::test]
async fn test_seeded_toggle_expires() {
	let adapter = StateAdapterMem::new();
	adapter
		.toggle_seed("post1", &["alice", "bob"], Some(Duration::from_millis(150)))
		.await
		.unwrap();
	assert_eq!(adapter.toggle_count("post1").await.unwrap(), 2);

	tokio::time::sleep(Duration::from_millis(200)).await;

	assert_eq!(adapter.toggle_count("post1").await.unwrap(), 0);
	assert!(!adapter.toggle_is_on("post1", "alice").await.unwrap());
}

#[tokio::test]
async fn test_toggle_keeps_the_seeded_ttl() {
	let adapter = StateAdapterMem::new();
	adapter
		.toggle_seed("post1", &["alice"], Some(Duration::from_millis(250)))
		.await
		.unwrap();

	// A flip before the deadline must not extend the lifetime
	adapter.toggle("post1", "bob").await.unwrap();
	assert_eq!(adapter.toggle_count("post1").await.unwrap(), 2);

	tokio::time::sleep(Duration::from_millis(300)).await;
	assert_eq!(adapter.toggle_count("post1").await.unwrap(), 0);
}

#[tokio::test]
async fn test_lapsed_presence_record_answers_offline() {
	let adapter = StateAdapterMem::new();
	adapter.presence_heartbeat("alice", Duration::from_millis(150)).await.unwrap();
	assert!(adapter.presence_is_online("alice").await.unwrap());

	tokio::time::sleep(Duration::from_millis(200)).await;

	assert!(!adapter.presence_is_online("alice").await.unwrap());
	let snapshot = adapter.presence_get("alice").await.unwrap();
	assert!(!snapshot.is_online);
	assert!(snapshot.last_seen_at.is_none(), "a lapsed record leaves no last-seen time");

	// The next heartbeat is a fresh transition
	assert!(adapter.presence_heartbeat("alice", Duration::from_millis(150)).await.unwrap());
}

#[tokio::test]
async fn test_roster_reads_prune_lapsed_records() {
	let adapter = StateAdapterMem::new();
	adapter.presence_heartbeat("alice", Duration::from_millis(150)).await.unwrap();
	adapter.presence_heartbeat("bob", Duration::from_secs(60)).await.unwrap();
	assert_eq!(adapter.presence_online_count().await.unwrap(), 2);

	tokio::time::sleep(Duration::from_millis(200)).await;

	let online = adapter.presence_online_actors().await.unwrap();
	let expected: Vec<Box<str>> = vec!["bob".into()];
	assert_eq!(online, expected);
	assert_eq!(adapter.presence_reconcile().await.unwrap(), 0, "the roster read already pruned");
}

#[tokio::test]
async fn test_reconcile_counts_lapsed_entries() {
	let adapter = StateAdapterMem::new();
	adapter.presence_heartbeat("alice", Duration::from_millis(100)).await.unwrap();
	adapter.presence_heartbeat("bob", Duration::from_millis(100)).await.unwrap();
	adapter.presence_heartbeat("carol", Duration::from_secs(60)).await.unwrap();

	tokio::time::sleep(Duration::from_millis(200)).await;

	assert_eq!(adapter.presence_reconcile().await.unwrap(), 2);
	assert_eq!(adapter.presence_online_count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_offline_record_outlives_the_online_ttl() {
	let adapter = StateAdapterMem::new();
	adapter.presence_heartbeat("alice", Duration::from_millis(100)).await.unwrap();
	adapter.presence_offline("alice", Duration::from_secs(3600)).await.unwrap();

	tokio::time::sleep(Duration::from_millis(200)).await;

	let snapshot = adapter.presence_get("alice").await.unwrap();
	assert!(!snapshot.is_online);
	assert!(snapshot.last_seen_at.is_some(), "an explicit sign-off keeps the last-seen time");
}

#[tokio::test]
async fn test_rate_window_slides() {
	let adapter = StateAdapterMem::new();
	let window = Duration::from_millis(300);

	for _ in 0..2 {
		assert!(adapter.rate_check_and_consume("msg", "alice", 2, window).await.unwrap().allowed);
	}
	let denied = adapter.rate_check_and_consume("msg", "alice", 2, window).await.unwrap();
	assert!(!denied.allowed);
	assert!(denied.retry_after_ms <= 300);

	tokio::time::sleep(Duration::from_millis(350)).await;

	assert!(adapter.rate_check_and_consume("msg", "alice", 2, window).await.unwrap().allowed);
}

#[tokio::test]
async fn test_dedup_marker_expires() {
	let adapter = StateAdapterMem::new();
	let first = adapter.trending_record(&short_like("post1", "alice")).await.unwrap();
	assert_eq!(first.score, 3);

	let repeat = adapter.trending_record(&short_like("post1", "alice")).await.unwrap();
	assert_eq!(repeat.score, 3, "a live marker blocks rescoring");

	tokio::time::sleep(Duration::from_millis(200)).await;

	let rescored = adapter.trending_record(&short_like("post1", "alice")).await.unwrap();
	assert_eq!(rescored.score, 6, "a lapsed marker admits the interaction again");

	let breakdown = adapter.trending_breakdown("post1").await.unwrap();
	assert_eq!(breakdown.get("like"), Some(&2));
}

// vim: ts=4
