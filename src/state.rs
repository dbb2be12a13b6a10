//! Application state management

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::Config;
use crate::html::HighlightInjector;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: Config,
    injector: HighlightInjector,
    passes: AtomicU64,
}

impl AppState {
    /// Create a new application state
    pub fn new(config: Config) -> Self {
        let injector = HighlightInjector::new(config.injector.clone());
        Self {
            inner: Arc::new(AppStateInner {
                config,
                injector,
                passes: AtomicU64::new(0),
            }),
        }
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.inner.config
    }

    /// Get the highlight injector
    pub fn injector(&self) -> &HighlightInjector {
        &self.inner.injector
    }

    /// Count one completed injection pass
    pub fn record_pass(&self) {
        self.inner.passes.fetch_add(1, Ordering::Relaxed);
    }

    /// Injection passes completed since startup
    pub fn passes_served(&self) -> u64 {
        self.inner.passes.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pass_counter_is_shared_between_clones() {
        let state = AppState::new(Config::default());
        let clone = state.clone();

        state.record_pass();
        clone.record_pass();

        assert_eq!(state.passes_served(), 2);
        assert_eq!(clone.passes_served(), 2);
    }
}
