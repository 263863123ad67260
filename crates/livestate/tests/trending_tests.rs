//! Trending scores through the engine API

mod common;

use livestate::error::Error;
use livestate::types::{InteractionKind, Timestamp};

use common::test_engine;

/// A creation time the given number of hours in the past
fn hours_ago(hours: i64) -> Timestamp {
	Timestamp(Timestamp::now().0 - hours * 3600)
}

#[tokio::test]
async fn test_repeat_interactions_are_deduplicated() {
	let engine = test_engine();
	let trending = engine.trending();
	let created = Timestamp::now();

	let first = trending
		.record_interaction("post1", "alice", InteractionKind::Like, created)
		.await
		.unwrap();
	assert_eq!(first.score, 3);
	assert_eq!(first.rank, Some(0));

	let repeat = trending
		.record_interaction("post1", "alice", InteractionKind::Like, created)
		.await
		.unwrap();
	assert_eq!(repeat.score, 3, "A repeat within the dedup window scores nothing");
	assert_eq!(repeat.rank, Some(0));

	// A different kind from the same actor scores, and so does the same
	// kind from another actor
	let view = trending
		.record_interaction("post1", "alice", InteractionKind::View, created)
		.await
		.unwrap();
	assert_eq!(view.score, 4);
	let other = trending
		.record_interaction("post1", "bob", InteractionKind::Like, created)
		.await
		.unwrap();
	assert_eq!(other.score, 7);

	let breakdown = trending.interaction_breakdown("post1").await.unwrap();
	assert_eq!(breakdown.get("like"), Some(&2), "The deduplicated repeat is not counted");
	assert_eq!(breakdown.get("view"), Some(&1));
}

#[tokio::test]
async fn test_kind_weights_add_up() {
	let engine = test_engine();
	let trending = engine.trending();
	let created = Timestamp::now();

	for kind in [
		InteractionKind::View,
		InteractionKind::Like,
		InteractionKind::Comment,
		InteractionKind::Share,
	] {
		trending.record_interaction("post1", "alice", kind, created).await.unwrap();
	}

	let top = trending.get_trending(1, 0).await.unwrap();
	assert_eq!(&*top[0].item_id, "post1");
	assert_eq!(top[0].score, 1 + 3 + 5 + 7);
}

#[tokio::test]
async fn test_older_items_earn_less() {
	let engine = test_engine();
	let trending = engine.trending();

	// One like each; only the item age differs. Default half-life is 48h.
	let fresh = trending
		.record_interaction("fresh", "alice", InteractionKind::Like, Timestamp::now())
		.await
		.unwrap();
	let day_old = trending
		.record_interaction("day", "alice", InteractionKind::Like, hours_ago(24))
		.await
		.unwrap();
	let half_life_old = trending
		.record_interaction("half", "alice", InteractionKind::Like, hours_ago(48))
		.await
		.unwrap();
	let ancient = trending
		.record_interaction("old", "alice", InteractionKind::Like, hours_ago(5000))
		.await
		.unwrap();

	assert_eq!(fresh.score, 3, "A fresh item earns the full weight");
	assert_eq!(day_old.score, 2);
	assert_eq!(half_life_old.score, 1, "At one half-life the weight is halved");
	assert_eq!(ancient.score, 1, "Every interaction earns at least one point");
}

#[tokio::test]
async fn test_leaderboard_orders_and_paginates() {
	let engine = test_engine();
	let trending = engine.trending();
	let created = Timestamp::now();

	trending.record_interaction("post1", "alice", InteractionKind::View, created).await.unwrap();
	trending.record_interaction("post2", "alice", InteractionKind::Like, created).await.unwrap();
	trending.record_interaction("post3", "alice", InteractionKind::Comment, created).await.unwrap();
	trending.record_interaction("post4", "alice", InteractionKind::Share, created).await.unwrap();

	let first = trending.get_trending(2, 0).await.unwrap();
	assert_eq!(first.len(), 2);
	assert_eq!(&*first[0].item_id, "post4");
	assert_eq!(first[0].score, 7);
	assert_eq!(&*first[1].item_id, "post3");

	let second = trending.get_trending(2, 2).await.unwrap();
	assert_eq!(&*second[0].item_id, "post2");
	assert_eq!(&*second[1].item_id, "post1");

	let past_the_end = trending.get_trending(10, 4).await.unwrap();
	assert!(past_the_end.is_empty());
	let nothing = trending.get_trending(0, 0).await.unwrap();
	assert!(nothing.is_empty());
}

#[tokio::test]
async fn test_removed_items_stay_gone() {
	let engine = test_engine();
	let trending = engine.trending();
	let created = Timestamp::now();

	trending.record_interaction("post1", "alice", InteractionKind::Like, created).await.unwrap();
	trending.record_interaction("post2", "alice", InteractionKind::View, created).await.unwrap();

	trending.remove_item("post1").await.unwrap();

	let top = trending.get_trending(10, 0).await.unwrap();
	assert_eq!(top.len(), 1);
	assert_eq!(&*top[0].item_id, "post2");
	assert!(trending.interaction_breakdown("post1").await.unwrap().is_empty());

	// The dedup marker survives removal: a repeat scores nothing and the
	// item stays off the board
	let repeat = trending
		.record_interaction("post1", "alice", InteractionKind::Like, created)
		.await
		.unwrap();
	assert_eq!(repeat.score, 0);
	assert_eq!(repeat.rank, None);
}

#[tokio::test]
async fn test_invalid_inputs_are_rejected() {
	let engine = test_engine();
	let trending = engine.trending();

	assert!(matches!(
		trending.record_interaction("", "alice", InteractionKind::View, Timestamp::now()).await,
		Err(Error::ValidationError(_))
	));
	assert!(matches!(
		trending.record_interaction("post1", "", InteractionKind::View, Timestamp::now()).await,
		Err(Error::ValidationError(_))
	));
	assert!(matches!(trending.remove_item("").await, Err(Error::ValidationError(_))));
}

// vim: ts=4
