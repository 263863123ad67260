//! Common test utilities
//!
//! Builds engines over a fresh in-memory store, so the suites run without
//! any external service.

use std::sync::Arc;

use livestate::settings::EngineSettings;
use livestate::{Engine, EngineBuilder};
use livestate_state_adapter_mem::StateAdapterMem;

/// Engine over a fresh store with default settings
pub fn test_engine() -> Engine {
	engine_with(EngineSettings::default())
}

/// Engine over a fresh store with custom settings
pub fn engine_with(settings: EngineSettings) -> Engine {
	let _ = tracing_subscriber::fmt().try_init();
	let mut builder = EngineBuilder::new();
	builder.state_adapter(Arc::new(StateAdapterMem::new())).settings(settings);
	builder.build().expect("Failed to build the test engine")
}
