//! ============================================================================
//! PANDAROUX-CORE: wardrobe and navigation core
//! ============================================================================
//! Client-side state for the second-hand wardrobe browser:
//! - Category catalog and listing model
//! - ViewNavigator screen state machine
//! - WardrobeStore of owned items
//! - Search collaborator interface with a mock marketplace
//! - Session controller tying them together, plus optional redb persistence
//! ============================================================================

pub mod catalog;
pub mod config;
pub mod db;
pub mod navigator;
pub mod search;
pub mod session;
pub mod types;
pub mod wardrobe;

// Re-export main types for convenience
pub use types::*;
pub use config::AppConfig;
pub use db::{WardrobeDb, WardrobeDbStats};
pub use navigator::{NavigationState, Screen, ViewNavigator};
pub use search::{MockSearchProvider, SearchProvider, SearchState, SearchTicket};
pub use session::{Session, SessionSnapshot, SharedSession};
pub use wardrobe::{WardrobeGroup, WardrobeStore, WardrobeSummary};
