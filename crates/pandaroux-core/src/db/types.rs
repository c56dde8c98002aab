//! ============================================================================
//! Database Types - Serializable records for redb storage
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::types::Item;

/// Wardrobe entry as stored on disk.
/// `position` preserves insertion order across restarts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoredItem {
    pub item: Item,
    pub position: u64,
    pub added_at: i64,
}

/// Summary of the wardrobe database contents
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardrobeDbStats {
    pub total_items: usize,
    /// Keyed by category token
    pub category_counts: HashMap<String, usize>,
    pub oldest_added_at: Option<i64>,
    pub newest_added_at: Option<i64>,
}
