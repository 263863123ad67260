//! Convenient imports for code built on the engine

pub use livestate_types::prelude::*;

pub use crate::engine::{Engine, EngineBuilder};

// vim: ts=4
