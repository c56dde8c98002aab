//! ============================================================================
//! Session - single owner of navigation, wardrobe, and search state
//! ============================================================================
//! The presentation layer reads `SessionSnapshot`s and calls the operations
//! below; it never mutates core state directly.
//!
//! Search activations: every time the navigator leaves the Search screen the
//! activation counter advances, so a `SearchTicket` issued earlier can no
//! longer be completed. Going Search -> Details keeps loaded results for the
//! return trip but drops a pending search. Reaching CategoryPick or Main
//! clears the search state entirely.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{debug, info, warn};

use crate::navigator::{NavigationState, Screen, ViewNavigator};
use crate::search::{normalize_query, SearchProvider, SearchState, SearchTicket};
use crate::types::{Category, CategoryId, Item, ItemId, PandaError, SearchFailure, SearchRefused};
use crate::wardrobe::{WardrobeGroup, WardrobeStore, WardrobeSummary};

/// Read-only view handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub screen: Screen,
    pub selected_category: Option<Category>,
    pub selected_item: Option<Item>,
    /// Whether the item on the Details screen is already owned
    pub selected_item_owned: bool,
    pub search: SearchState,
    pub wardrobe: Vec<WardrobeGroup>,
    pub summary: WardrobeSummary,
}

#[derive(Debug, Default)]
pub struct Session {
    navigator: ViewNavigator,
    wardrobe: WardrobeStore,
    search: SearchState,
    activation: u64,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start at Main with an existing wardrobe (e.g. loaded from disk)
    pub fn with_wardrobe(wardrobe: WardrobeStore) -> Self {
        Self {
            wardrobe,
            ..Self::default()
        }
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    pub fn navigation(&self) -> &NavigationState {
        self.navigator.state()
    }

    pub fn screen(&self) -> Screen {
        self.navigator.screen()
    }

    /// Fail with `InvalidTransition` unless the active screen is `expected`
    pub fn expect_screen(&self, expected: Screen, operation: &'static str) -> Result<(), PandaError> {
        let screen = self.navigator.screen();
        if screen == expected {
            Ok(())
        } else {
            Err(PandaError::InvalidTransition {
                operation,
                screen: screen.as_str(),
            })
        }
    }

    pub fn go_to_category_pick(&mut self) -> bool {
        self.navigate(|nav| nav.go_to_category_pick())
    }

    pub fn select_category(&mut self, category: Category) -> bool {
        self.navigate(|nav| nav.select_category(category))
    }

    pub fn select_item(&mut self, item: Item) -> bool {
        self.navigate(|nav| nav.select_item(item))
    }

    pub fn go_back(&mut self) -> bool {
        self.navigate(|nav| nav.go_back())
    }

    pub fn go_home(&mut self) -> bool {
        self.navigate(|nav| nav.go_home())
    }

    fn navigate(&mut self, transition: impl FnOnce(&mut ViewNavigator) -> bool) -> bool {
        let from = self.navigator.screen();
        if !transition(&mut self.navigator) {
            return false;
        }
        let to = self.navigator.screen();
        debug!("Navigated {} -> {}", from, to);

        if from == Screen::Search && to != Screen::Search {
            self.activation += 1;
            if self.search.is_pending() {
                debug!("Dropping pending search on leaving the search screen");
                self.search = SearchState::Idle;
            }
        }
        if matches!(to, Screen::Main | Screen::CategoryPick) {
            self.search = SearchState::Idle;
        }
        true
    }

    // ========================================================================
    // Search
    // ========================================================================

    pub fn search_state(&self) -> &SearchState {
        &self.search
    }

    /// Validate and mark a search as in flight for the current activation
    pub fn begin_search(&mut self, text: &str) -> Result<SearchTicket, SearchRefused> {
        let category = match self.navigator.state() {
            NavigationState::Search { category } => category.clone(),
            _ => return Err(SearchRefused::NotOnSearchScreen),
        };
        if self.search.is_pending() {
            return Err(SearchRefused::AlreadyInFlight);
        }
        let query = normalize_query(text)?;

        info!("Searching {} for \"{}\"", category.id, query);
        self.search = SearchState::Pending {
            query: query.clone(),
        };
        Ok(SearchTicket {
            category,
            query,
            activation: self.activation,
        })
    }

    /// Apply a search outcome. Returns false when the ticket is stale and
    /// the outcome was discarded.
    pub fn complete_search(
        &mut self,
        ticket: SearchTicket,
        outcome: Result<Vec<Item>, SearchFailure>,
    ) -> bool {
        let current = ticket.activation == self.activation
            && self.navigator.screen() == Screen::Search
            && self.search.query() == Some(ticket.query.as_str())
            && self.search.is_pending();
        if !current {
            debug!(
                "Discarding stale search result for \"{}\" (activation {}, now {})",
                ticket.query, ticket.activation, self.activation
            );
            return false;
        }

        self.search = match outcome {
            Ok(items) => {
                info!("Search \"{}\" returned {} items", ticket.query, items.len());
                SearchState::Loaded {
                    query: ticket.query,
                    items,
                }
            }
            Err(failure) => {
                warn!("Search \"{}\" failed: {}", ticket.query, failure);
                SearchState::Failed {
                    query: ticket.query,
                    failure,
                }
            }
        };
        true
    }

    // ========================================================================
    // Wardrobe
    // ========================================================================

    pub fn wardrobe(&self) -> &WardrobeStore {
        &self.wardrobe
    }

    pub fn add_to_wardrobe(&mut self, item: Item) -> bool {
        self.wardrobe.add(item)
    }

    pub fn remove_from_wardrobe(&mut self, item_id: ItemId) -> bool {
        self.wardrobe.remove(item_id)
    }

    pub fn list_by_category(&self, category_id: CategoryId) -> Vec<Item> {
        self.wardrobe.list_by_category(category_id)
    }

    pub fn is_selected_owned(&self) -> bool {
        self.navigator
            .selected_item()
            .is_some_and(|item| self.wardrobe.contains(item.id))
    }

    /// On Details: own the shown item and return to the result list.
    /// Returns the added item, or None when not on Details.
    pub fn add_selected_to_wardrobe(&mut self) -> Option<Item> {
        let item = self.navigator.selected_item()?.clone();
        self.wardrobe.add(item.clone());
        self.go_back();
        Some(item)
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            screen: self.navigator.screen(),
            selected_category: self.navigator.selected_category().cloned(),
            selected_item: self.navigator.selected_item().cloned(),
            selected_item_owned: self.is_selected_owned(),
            search: self.search.clone(),
            wardrobe: self.wardrobe.grouped(),
            summary: self.wardrobe.summary(),
        }
    }
}

/// Session shared between the UI event loop and in-flight searches
#[derive(Debug, Clone, Default)]
pub struct SharedSession {
    inner: Arc<RwLock<Session>>,
}

impl SharedSession {
    pub fn new(session: Session) -> Self {
        Self {
            inner: Arc::new(RwLock::new(session)),
        }
    }

    pub async fn read(&self) -> RwLockReadGuard<'_, Session> {
        self.inner.read().await
    }

    pub async fn write(&self) -> RwLockWriteGuard<'_, Session> {
        self.inner.write().await
    }

    pub async fn snapshot(&self) -> SessionSnapshot {
        self.inner.read().await.snapshot()
    }

    /// Run one search end to end. The lock is released while the provider
    /// works, so navigation stays responsive. Returns whether the outcome
    /// was applied.
    pub async fn run_search(
        &self,
        provider: &dyn SearchProvider,
        text: &str,
    ) -> Result<bool, SearchRefused> {
        let ticket = self.inner.write().await.begin_search(text)?;
        let outcome = provider.search(&ticket.category, &ticket.query).await;
        Ok(self.inner.write().await.complete_search(ticket, outcome))
    }
}
