//! ============================================================================
//! Application configuration
//! ============================================================================
//! Values come from the environment (a `.env` file is loaded by the binary).
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

use crate::db::DB_PATH_ENV;
use crate::search::DEFAULT_MOCK_DELAY_MS;

/// Simulated search latency override, in milliseconds
pub const SEARCH_DELAY_ENV: &str = "PANDAROUX_SEARCH_DELAY_MS";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Wardrobe database path; None uses ~/.pandaroux/wardrobe.redb
    pub db_path: Option<String>,
    pub search_delay_ms: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: None,
            search_delay_ms: DEFAULT_MOCK_DELAY_MS,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Malformed values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(path) = lookup(DB_PATH_ENV).filter(|p| !p.trim().is_empty()) {
            config.db_path = Some(path);
        }

        if let Some(raw) = lookup(SEARCH_DELAY_ENV) {
            match raw.trim().parse::<u64>() {
                Ok(ms) => config.search_delay_ms = ms,
                Err(e) => warn!(
                    "Ignoring {}={:?}: {} (using {} ms)",
                    SEARCH_DELAY_ENV, raw, e, config.search_delay_ms
                ),
            }
        }

        config
    }

    pub fn search_delay(&self) -> Duration {
        Duration::from_millis(self.search_delay_ms)
    }
}
