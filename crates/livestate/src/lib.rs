//! LiveState is a real-time shared-state engine for social and
//! collaborative applications.
//!
//! # Features
//!
//! - Toggle counters (likes, bookmarks, follows)
//!     - per-actor membership with an always-consistent public count
//!     - cache-style seeding and invalidation against a system of record
//! - Presence tracking
//!     - heartbeat driven, with automatic offline on silence
//!     - explicit sign-off with a long-lived last-seen time
//! - Sliding-window rate limiting with named, preset rules
//! - Trending scores
//!     - per-actor dedup and age-based decay
//!     - leaderboard queries and per-item analytics
//!
//! Every mutation is atomic in the backing store; the engine spawns no
//! background tasks of its own. Storage lives behind the
//! [`state_adapter::StateAdapter`] trait; pick an adapter crate for your
//! deployment and hand it to the [`EngineBuilder`].

// Re-export shared types and the adapter trait from livestate-types
pub use livestate_types::error;
pub use livestate_types::state_adapter;
pub use livestate_types::types;
pub use livestate_types::utils;

// Re-export the lock! macro so `$crate::error::Error` resolves correctly
// for code using `lock!` via livestate_types
pub use livestate_types::lock;

// Local modules
pub mod engine;
pub mod prelude;
pub mod presence;
pub mod rate_limit;
pub mod settings;
pub mod toggle;
pub mod trending;

pub use crate::engine::{Engine, EngineBuilder, EngineState};

// vim: ts=4
