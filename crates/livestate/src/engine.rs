//! Engine builder - constructs the shared-state engine and hands out
//! component handles

use std::sync::Arc;

use crate::prelude::*;
use crate::presence::PresenceTracker;
use crate::rate_limit::RateLimiter;
use crate::settings::EngineSettings;
use crate::state_adapter::StateAdapter;
use crate::toggle::ToggleCounter;
use crate::trending::TrendingScores;

/// Shared engine state behind the [`Engine`] handle
#[derive(Debug)]
pub struct EngineState {
	pub(crate) store: Arc<dyn StateAdapter>,
	pub(crate) settings: EngineSettings,
}

/// Cheaply cloneable handle to the engine
pub type Engine = Arc<EngineState>;

impl EngineState {
	/// Toggle counters (likes, bookmarks, follows)
	pub fn toggles(&self) -> ToggleCounter<'_> {
		ToggleCounter { engine: self }
	}

	/// Presence tracking
	pub fn presence(&self) -> PresenceTracker<'_> {
		PresenceTracker { engine: self }
	}

	/// Sliding-window rate limits
	pub fn rate_limits(&self) -> RateLimiter<'_> {
		RateLimiter { engine: self }
	}

	/// Trending scores
	pub fn trending(&self) -> TrendingScores<'_> {
		TrendingScores { engine: self }
	}

	/// Round-trip probe of the backing store, for readiness checks
	pub async fn ping(&self) -> LsResult<()> {
		self.store.ping().await
	}

	/// The active settings
	pub fn settings(&self) -> &EngineSettings {
		&self.settings
	}
}

/// Rejects identifiers the store could not key on
pub(crate) fn check_id(value: &str, what: &str) -> LsResult<()> {
	if value.is_empty() {
		Err(Error::ValidationError(format!("{} id must not be empty", what)))
	} else {
		Ok(())
	}
}

pub struct EngineBuilder {
	store: Option<Arc<dyn StateAdapter>>,
	settings: EngineSettings,
}

impl EngineBuilder {
	pub fn new() -> Self {
		EngineBuilder { store: None, settings: EngineSettings::default() }
	}

	/// The storage backend all components run on
	pub fn state_adapter(&mut self, store: Arc<dyn StateAdapter>) -> &mut Self {
		self.store = Some(store);
		self
	}

	pub fn settings(&mut self, settings: EngineSettings) -> &mut Self {
		self.settings = settings;
		self
	}

	pub fn build(&mut self) -> LsResult<Engine> {
		let Some(store) = self.store.take() else {
			error!("No state adapter configured");
			return Err(Error::Internal("No state adapter configured".to_string()));
		};
		let settings = std::mem::take(&mut self.settings);
		settings.validate()?;
		debug!("Engine ready (store: {:?})", store);
		Ok(Arc::new(EngineState { store, settings }))
	}
}

impl Default for EngineBuilder {
	fn default() -> Self {
		Self::new()
	}
}


// vim: ts=4
