//! Shared types, the adapter trait, and error types for the LiveState engine.
//!
//! This crate contains the foundational types that are shared between the
//! engine facade and all adapter implementations. Extracting these into a
//! separate crate allows adapter crates to compile in parallel with the
//! engine itself.

pub mod error;
pub mod prelude;
pub mod state_adapter;
pub mod types;
pub mod utils;

// vim: ts=4
