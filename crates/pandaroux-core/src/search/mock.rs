//! ============================================================================
//! Mock Search Provider - static marketplace listings
//! ============================================================================
//! Stands in for the marketplace/LLM backend: waits a fixed latency, then
//! returns the static listings of the requested category. The query text is
//! only logged.
//! ============================================================================

use async_trait::async_trait;
use once_cell::sync::Lazy;
use std::time::Duration;
use tracing::{info, warn};

use super::SearchProvider;
use crate::types::{Category, CategoryId, Item, ItemId, Price, SearchFailure};

/// Simulated backend latency in milliseconds
pub const DEFAULT_MOCK_DELAY_MS: u64 = 1000;

static LISTINGS: Lazy<Vec<Item>> = Lazy::new(|| {
    vec![
        listing(7755500303, "Tricou Avengers mărimea M", 25.22, "Avengers", "M", 15.50, 2.3, CategoryId::Tops),
        listing(7755022824, "Koszulka / T-shirt Marvel Avengers XL | Oversize", 39.0, "Avengers", "XL / 42 / 14", 22.00, 3.1, CategoryId::Tops),
        listing(7754950617, "Koszulki chłopięce r. 152 zestaw 6sztuk", 15.0, "Avengers", "12 years / 152 cm", 8.00, 1.5, CategoryId::Tops),
        listing(7753791658, "Langærmet t-shirt med Avengers", 14.32, "VRS", "10 years / 140 cm", 12.50, 2.0, CategoryId::Tops),
        listing(7751650077, "Iron Man Compression shirt", 186.21, "Under Armour", "L", 35.00, 4.5, CategoryId::Tops),
        listing(7751323834, "T-shirt Avengers", 7.0, "Marvel", "11 years / 146 cm", 11.00, 1.9, CategoryId::Tops),
        listing(7749120455, "Jeansy Levi's 501 W32 L32", 89.0, "Levi's", "W32 L32", 40.00, 11.2, CategoryId::Bottoms),
        listing(7748803312, "Spodnie cargo khaki", 35.5, "Zara", "M", 18.00, 6.4, CategoryId::Bottoms),
        listing(7747450098, "Nike Air Max 90 białe", 159.0, "Nike", "42", 45.00, 13.6, CategoryId::Shoes),
        listing(7746611230, "Czapka beanie wełniana", 12.0, "H&M", "One size", 6.50, 0.9, CategoryId::Headwear),
        listing(7745902114, "Pasek skórzany brązowy", 24.0, "Reserved", "90 cm", 9.00, 1.2, CategoryId::Accessories),
    ]
});

#[allow(clippy::too_many_arguments)]
fn listing(
    id: u64,
    title: &str,
    amount: f64,
    brand: &str,
    size: &str,
    savings: f64,
    carbon_kg: f64,
    category_id: CategoryId,
) -> Item {
    Item {
        id: ItemId(id),
        title: title.to_string(),
        price: Price::new(amount, "PLN"),
        photo_url: format!("https://images1.vinted.net/t/{}/f800.jpeg", id),
        detail_url: format!("https://www.vinted.pl/items/{}", id),
        brand: Some(brand.to_string()),
        size: Some(size.to_string()),
        price_difference: Some(savings),
        carbon_impact_kg: Some(carbon_kg),
        category_id,
    }
}

/// Every static listing, across categories
pub fn mock_listings() -> &'static [Item] {
    &LISTINGS
}

/// Search provider backed by the static listings
#[derive(Debug, Clone)]
pub struct MockSearchProvider {
    delay: Duration,
    failure: Option<SearchFailure>,
}

impl Default for MockSearchProvider {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_MOCK_DELAY_MS))
    }
}

impl MockSearchProvider {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            failure: None,
        }
    }

    /// Provider that always rejects with `failure` after the delay
    pub fn failing(delay: Duration, failure: SearchFailure) -> Self {
        Self {
            delay,
            failure: Some(failure),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

#[async_trait]
impl SearchProvider for MockSearchProvider {
    async fn search(&self, category: &Category, query: &str) -> Result<Vec<Item>, SearchFailure> {
        info!(
            "Mock search: category={}, query=\"{}\"",
            category.id, query
        );

        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }

        if let Some(failure) = &self.failure {
            warn!("Mock search failing: {}", failure);
            return Err(failure.clone());
        }

        Ok(LISTINGS
            .iter()
            .filter(|item| item.category_id == category.id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;

    #[test]
    fn test_listings_are_valid_and_unique() {
        let mut ids = std::collections::HashSet::new();
        for item in mock_listings() {
            assert!(item.validate().is_ok(), "listing {} invalid", item.id);
            assert!(ids.insert(item.id), "duplicate listing {}", item.id);
        }
    }

    #[tokio::test]
    async fn test_search_filters_by_category() {
        let provider = MockSearchProvider::new(Duration::ZERO);
        let tops = catalog::get(CategoryId::Tops);
        let results = provider.search(tops, "avengers").await.unwrap();
        assert!(!results.is_empty());
        assert!(results.iter().all(|i| i.category_id == CategoryId::Tops));

        let expected: Vec<ItemId> = mock_listings()
            .iter()
            .filter(|i| i.category_id == CategoryId::Tops)
            .map(|i| i.id)
            .collect();
        assert_eq!(results.iter().map(|i| i.id).collect::<Vec<_>>(), expected);
    }

    #[tokio::test]
    async fn test_failing_provider() {
        let failure = SearchFailure::Unavailable("offline".into());
        let provider = MockSearchProvider::failing(Duration::ZERO, failure.clone());
        let shoes = catalog::get(CategoryId::Shoes);
        assert_eq!(provider.search(shoes, "nike").await, Err(failure));
    }

    #[tokio::test(start_paused = true)]
    async fn test_search_waits_for_delay() {
        let provider = MockSearchProvider::default();
        let started = tokio::time::Instant::now();
        let hats = catalog::get(CategoryId::Headwear);
        let results = provider.search(hats, "beanie").await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(started.elapsed() >= Duration::from_millis(DEFAULT_MOCK_DELAY_MS));
    }
}
