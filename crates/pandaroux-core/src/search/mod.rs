//! ============================================================================
//! Search Module - the search collaborator seam
//! ============================================================================
//! The core never talks to a marketplace directly. It hands a category and
//! free-text query to a `SearchProvider` and displays whatever comes back,
//! in order, without retrying, caching, or ranking.
//!
//! ## Flow
//! ```text
//! Session::begin_search(query) --> SearchTicket
//!                                      |
//!                        provider.search(category, query).await
//!                                      |
//! Session::complete_search(ticket, outcome) --> applied or discarded
//! ```
//! A ticket is only honoured by the Search-screen activation that issued it,
//! so results arriving after the user navigated away are dropped.
//! ============================================================================

mod mock;

pub use mock::{mock_listings, MockSearchProvider, DEFAULT_MOCK_DELAY_MS};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::{Category, Item, SearchFailure, SearchRefused};

/// External service turning a category + query into candidate listings
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, category: &Category, query: &str) -> Result<Vec<Item>, SearchFailure>;
}

/// Result-display state of the Search screen
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SearchState {
    #[default]
    Idle,
    Pending {
        query: String,
    },
    Loaded {
        query: String,
        items: Vec<Item>,
    },
    /// Shown as "no results / try again"
    Failed {
        query: String,
        failure: SearchFailure,
    },
}

impl SearchState {
    pub fn is_pending(&self) -> bool {
        matches!(self, SearchState::Pending { .. })
    }

    pub fn results(&self) -> &[Item] {
        match self {
            SearchState::Loaded { items, .. } => items,
            _ => &[],
        }
    }

    pub fn query(&self) -> Option<&str> {
        match self {
            SearchState::Idle => None,
            SearchState::Pending { query }
            | SearchState::Loaded { query, .. }
            | SearchState::Failed { query, .. } => Some(query),
        }
    }
}

/// Permission to run one search, bound to the activation that issued it
#[derive(Debug, Clone, PartialEq)]
pub struct SearchTicket {
    pub category: Category,
    pub query: String,
    pub(crate) activation: u64,
}

/// Trim and reject whitespace-only text
pub fn normalize_query(text: &str) -> Result<String, SearchRefused> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(SearchRefused::EmptyQuery);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{sample_item, CategoryId};

    #[test]
    fn test_normalize_query() {
        assert_eq!(normalize_query("  avengers "), Ok("avengers".to_string()));
        assert_eq!(normalize_query(""), Err(SearchRefused::EmptyQuery));
        assert_eq!(normalize_query(" \t\n"), Err(SearchRefused::EmptyQuery));
    }

    #[test]
    fn test_state_accessors() {
        assert!(SearchState::Idle.results().is_empty());
        assert_eq!(SearchState::Idle.query(), None);

        let pending = SearchState::Pending { query: "q".into() };
        assert!(pending.is_pending());
        assert!(pending.results().is_empty());

        let loaded = SearchState::Loaded {
            query: "q".into(),
            items: vec![sample_item(1, CategoryId::Tops)],
        };
        assert!(!loaded.is_pending());
        assert_eq!(loaded.results().len(), 1);
        assert_eq!(loaded.query(), Some("q"));
    }
}
