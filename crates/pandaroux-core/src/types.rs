//! ============================================================================
//! Core Types for PandaRoux
//! ============================================================================
//! Defines the listing model, categories, and error kinds shared by the
//! navigator, the wardrobe store, and the search collaborator.
//! These types serialize to the same JSON shape the marketplace mocks use.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

/// Fixed PLN -> EUR rate used by the listing cards
pub const PLN_PER_EUR: f64 = 4.3;

/// Clothing class used to scope a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryId {
    Tops,
    Headwear,
    Bottoms,
    Shoes,
    Accessories,
}

impl CategoryId {
    /// Order in which the wardrobe groups owned items
    pub const DISPLAY_ORDER: [CategoryId; 5] = [
        CategoryId::Headwear,
        CategoryId::Tops,
        CategoryId::Bottoms,
        CategoryId::Shoes,
        CategoryId::Accessories,
    ];

    /// Parse a category token. Accepts singular forms too.
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "tops" | "top" => Some(Self::Tops),
            "headwear" => Some(Self::Headwear),
            "bottoms" | "bottom" => Some(Self::Bottoms),
            "shoes" | "shoe" => Some(Self::Shoes),
            "accessories" | "accessory" => Some(Self::Accessories),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tops => "tops",
            Self::Headwear => "headwear",
            Self::Bottoms => "bottoms",
            Self::Shoes => "shoes",
            Self::Accessories => "accessories",
        }
    }
}

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Static catalog entry. Built once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub display_name: String,
    /// Opaque icon token for the presentation layer
    pub icon_ref: String,
    /// CSS-style hex colour
    pub accent_color: String,
}

/// Marketplace listing id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl From<u64> for ItemId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Listing price as reported by the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Price {
    pub amount: f64,
    pub currency_code: String,
}

impl Price {
    pub fn new(amount: f64, currency_code: impl Into<String>) -> Self {
        Self {
            amount,
            currency_code: currency_code.into(),
        }
    }

    /// Convert to euros for display. Only PLN and EUR are known.
    pub fn to_eur(&self) -> Option<f64> {
        match self.currency_code.to_uppercase().as_str() {
            "EUR" => Some(self.amount),
            "PLN" => Some(self.amount / PLN_PER_EUR),
            _ => None,
        }
    }
}

/// A listing: a transient search result, or an owned wardrobe entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    pub price: Price,
    #[serde(rename = "photo")]
    pub photo_url: String,
    #[serde(rename = "url")]
    pub detail_url: String,
    #[serde(default)]
    pub brand: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    /// Savings versus buying new
    #[serde(default)]
    pub price_difference: Option<f64>,
    #[serde(default)]
    pub carbon_impact_kg: Option<f64>,
    #[serde(rename = "type")]
    pub category_id: CategoryId,
}

impl Item {
    /// Check the numeric and textual invariants of a listing
    pub fn validate(&self) -> Result<(), PandaError> {
        if self.title.trim().is_empty() {
            return Err(PandaError::InvalidItem(format!(
                "item {} has an empty title",
                self.id
            )));
        }
        if !self.price.amount.is_finite() || self.price.amount < 0.0 {
            return Err(PandaError::InvalidItem(format!(
                "item {} has invalid price {}",
                self.id, self.price.amount
            )));
        }
        if let Some(diff) = self.price_difference {
            if !diff.is_finite() || diff < 0.0 {
                return Err(PandaError::InvalidItem(format!(
                    "item {} has negative price difference {}",
                    self.id, diff
                )));
            }
        }
        if let Some(kg) = self.carbon_impact_kg {
            if !kg.is_finite() || kg < 0.0 {
                return Err(PandaError::InvalidItem(format!(
                    "item {} has negative carbon impact {}",
                    self.id, kg
                )));
            }
        }
        Ok(())
    }
}

/// Error types for the core
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PandaError {
    #[error("Operation '{operation}' is not permitted on the {screen} screen")]
    InvalidTransition {
        operation: &'static str,
        screen: &'static str,
    },

    #[error("Invalid item: {0}")]
    InvalidItem(String),

    #[error("Unknown category: {0}")]
    UnknownCategory(String),
}

/// Rejection from the search collaborator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, thiserror::Error)]
pub enum SearchFailure {
    #[error("Search service unavailable: {0}")]
    Unavailable(String),

    #[error("Search rejected: {0}")]
    Rejected(String),
}

/// Client-side refusal to start a search
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SearchRefused {
    #[error("Searches can only be started from the search screen")]
    NotOnSearchScreen,

    #[error("Search text is empty")]
    EmptyQuery,

    #[error("A search is already in flight")]
    AlreadyInFlight,
}

#[cfg(test)]
pub(crate) fn sample_item(id: u64, category_id: CategoryId) -> Item {
    Item {
        id: ItemId(id),
        title: format!("Listing {}", id),
        price: Price::new(10.0, "PLN"),
        photo_url: format!("https://images.example/{}.jpeg", id),
        detail_url: format!("https://www.vinted.pl/items/{}", id),
        brand: None,
        size: None,
        price_difference: None,
        carbon_impact_kg: None,
        category_id,
    }
}
