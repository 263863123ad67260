//! Presence tracking through the engine API

mod common;

use std::time::Duration;

use livestate::error::Error;
use livestate::settings::EngineSettings;

use common::{engine_with, test_engine};

#[tokio::test]
async fn test_heartbeat_reports_transitions_only() {
	let engine = test_engine();
	let presence = engine.presence();

	assert!(presence.heartbeat("alice").await.unwrap(), "First heartbeat is a transition");
	assert!(!presence.heartbeat("alice").await.unwrap(), "Repeated heartbeat is not");
	assert!(presence.is_online("alice").await.unwrap());

	assert!(presence.go_offline("alice").await.unwrap(), "Going offline from online is a transition");
	assert!(!presence.go_offline("alice").await.unwrap(), "Already offline");
	assert!(!presence.is_online("alice").await.unwrap());

	assert!(presence.heartbeat("alice").await.unwrap(), "Coming back is a transition again");
}

#[tokio::test]
async fn test_get_keeps_last_seen_after_sign_off() {
	let engine = test_engine();
	let presence = engine.presence();

	let unknown = presence.get("ghost").await.unwrap();
	assert!(!unknown.is_online);
	assert!(unknown.last_seen_at.is_none(), "Never-seen actors carry no timestamp");

	presence.heartbeat("alice").await.unwrap();
	let online = presence.get("alice").await.unwrap();
	assert!(online.is_online);
	let seen_at = online.last_seen_at.expect("Online actors carry a timestamp");

	presence.go_offline("alice").await.unwrap();
	let offline = presence.get("alice").await.unwrap();
	assert!(!offline.is_online);
	let seen_off = offline.last_seen_at.expect("Sign-off keeps the record readable");
	assert!(seen_off >= seen_at, "Sign-off refreshes the last-seen time");
}

#[tokio::test]
async fn test_silence_expires_into_offline() {
	let mut settings = EngineSettings::default();
	settings.presence.heartbeat_interval = Duration::from_millis(100);
	settings.presence.ttl_multiplier = 2;
	let engine = engine_with(settings);
	let presence = engine.presence();

	presence.heartbeat("alice").await.unwrap();
	presence.heartbeat("bob").await.unwrap();
	assert_eq!(presence.online_count().await.unwrap(), 2);

	tokio::time::sleep(Duration::from_millis(250)).await;

	assert!(!presence.is_online("alice").await.unwrap(), "Silence past the TTL means offline");
	let roster = presence.online_actors().await.unwrap();
	assert!(roster.is_empty(), "Lapsed actors drop off the roster");
	assert_eq!(presence.online_count().await.unwrap(), 0);

	assert!(presence.heartbeat("alice").await.unwrap(), "Returning after a lapse is a transition");
}

#[tokio::test]
async fn test_reconcile_counts_lapsed_entries() {
	let mut settings = EngineSettings::default();
	settings.presence.heartbeat_interval = Duration::from_millis(100);
	settings.presence.ttl_multiplier = 2;
	let engine = engine_with(settings);
	let presence = engine.presence();

	presence.heartbeat("alice").await.unwrap();
	presence.heartbeat("bob").await.unwrap();
	presence.heartbeat("carol").await.unwrap();
	presence.go_offline("carol").await.unwrap();

	tokio::time::sleep(Duration::from_millis(250)).await;
	presence.heartbeat("dave").await.unwrap();

	let removed = presence.reconcile().await.unwrap();
	assert_eq!(removed, 2, "Both lapsed actors get swept");
	assert_eq!(presence.reconcile().await.unwrap(), 0, "Nothing left to sweep");
	let roster = presence.online_actors().await.unwrap();
	assert_eq!(roster.len(), 1);
	assert_eq!(&*roster[0], "dave");
}

#[tokio::test]
async fn test_batch_matches_individual_answers() {
	let engine = test_engine();
	let presence = engine.presence();

	presence.heartbeat("alice").await.unwrap();
	presence.heartbeat("bob").await.unwrap();
	presence.go_offline("bob").await.unwrap();

	let actors = ["alice", "bob", "ghost"];
	let batch = presence.is_online_batch(&actors).await.unwrap();
	assert_eq!(batch.len(), 3);
	for actor in actors {
		let single = presence.is_online(actor).await.unwrap();
		assert_eq!(batch.get(actor), Some(&single), "batch and single disagree on {}", actor);
	}

	let empty = presence.is_online_batch(&[]).await.unwrap();
	assert!(empty.is_empty());
}

#[tokio::test]
async fn test_invalid_inputs_are_rejected() {
	let engine = test_engine();
	let presence = engine.presence();

	assert!(matches!(presence.heartbeat("").await, Err(Error::ValidationError(_))));
	assert!(matches!(presence.go_offline("").await, Err(Error::ValidationError(_))));
	assert!(matches!(
		presence.is_online_batch(&["alice", ""]).await,
		Err(Error::ValidationError(_))
	));
}

// vim: ts=4
