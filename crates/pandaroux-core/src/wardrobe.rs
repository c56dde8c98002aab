//! ============================================================================
//! Wardrobe Store - owned items for the current session
//! ============================================================================
//! Ordered, unique by item id. Adding an owned id again is a silent no-op.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

use crate::types::{CategoryId, Item, ItemId};

/// Owned items for one category, in insertion order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeGroup {
    pub category_id: CategoryId,
    pub items: Vec<Item>,
}

/// Totals shown on the main screen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct WardrobeSummary {
    pub item_count: usize,
    pub per_category: BTreeMap<CategoryId, usize>,
    /// Sum of savings versus buying new
    pub total_savings: f64,
    pub total_carbon_kg: f64,
}

#[derive(Debug, Clone, Default)]
pub struct WardrobeStore {
    items: Vec<Item>,
}

impl WardrobeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from a list, keeping the first occurrence of each id
    pub fn from_items(items: impl IntoIterator<Item = Item>) -> Self {
        let mut store = Self::new();
        for item in items {
            store.add(item);
        }
        store
    }

    /// Append `item` unless its id is already owned. Always returns true:
    /// the store contains the id after the call.
    pub fn add(&mut self, item: Item) -> bool {
        if self.contains(item.id) {
            debug!("Item {} already in wardrobe, ignoring add", item.id);
        } else {
            info!("Added item {} ({}) to wardrobe", item.id, item.category_id);
            self.items.push(item);
        }
        true
    }

    /// Remove the entry with `item_id`, if any. Returns whether one was removed.
    pub fn remove(&mut self, item_id: ItemId) -> bool {
        let before = self.items.len();
        self.items.retain(|i| i.id != item_id);
        let removed = self.items.len() != before;
        if removed {
            info!("Removed item {} from wardrobe", item_id);
        }
        removed
    }

    pub fn contains(&self, item_id: ItemId) -> bool {
        self.items.iter().any(|i| i.id == item_id)
    }

    pub fn get(&self, item_id: ItemId) -> Option<&Item> {
        self.items.iter().find(|i| i.id == item_id)
    }

    pub fn list_by_category(&self, category_id: CategoryId) -> Vec<Item> {
        self.items
            .iter()
            .filter(|i| i.category_id == category_id)
            .cloned()
            .collect()
    }

    pub fn count(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn clear(&mut self) {
        let count = self.items.len();
        self.items.clear();
        info!("Cleared {} items from wardrobe", count);
    }

    /// Non-empty groups in display order
    pub fn grouped(&self) -> Vec<WardrobeGroup> {
        CategoryId::DISPLAY_ORDER
            .iter()
            .map(|&category_id| WardrobeGroup {
                category_id,
                items: self.list_by_category(category_id),
            })
            .filter(|g| !g.items.is_empty())
            .collect()
    }

    pub fn summary(&self) -> WardrobeSummary {
        let mut summary = WardrobeSummary {
            item_count: self.items.len(),
            ..WardrobeSummary::default()
        };
        for item in &self.items {
            *summary.per_category.entry(item.category_id).or_insert(0) += 1;
            summary.total_savings += item.price_difference.unwrap_or(0.0);
            summary.total_carbon_kg += item.carbon_impact_kg.unwrap_or(0.0);
        }
        summary
    }
}
