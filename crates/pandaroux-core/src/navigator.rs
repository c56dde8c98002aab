//! ============================================================================
//! View Navigator - screen state machine
//! ============================================================================
//! Main -> CategoryPick -> Search -> Details, with back and home.
//! Each state carries exactly the context its screen needs, so a Search
//! screen without a category (or Details without an item) cannot exist.
//! Operations called from the wrong screen are no-ops returning `false`.
//! ============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::types::{Category, Item};

/// Screen tag for the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    Main,
    CategoryPick,
    Search,
    Details,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Main => "main",
            Screen::CategoryPick => "category_pick",
            Screen::Search => "search",
            Screen::Details => "details",
        }
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Active screen plus the context carried into it
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "screen", rename_all = "snake_case")]
pub enum NavigationState {
    #[default]
    Main,
    CategoryPick,
    Search {
        category: Category,
    },
    Details {
        category: Category,
        item: Item,
    },
}

impl NavigationState {
    pub fn screen(&self) -> Screen {
        match self {
            NavigationState::Main => Screen::Main,
            NavigationState::CategoryPick => Screen::CategoryPick,
            NavigationState::Search { .. } => Screen::Search,
            NavigationState::Details { .. } => Screen::Details,
        }
    }

    pub fn selected_category(&self) -> Option<&Category> {
        match self {
            NavigationState::Search { category } | NavigationState::Details { category, .. } => {
                Some(category)
            }
            _ => None,
        }
    }

    pub fn selected_item(&self) -> Option<&Item> {
        match self {
            NavigationState::Details { item, .. } => Some(item),
            _ => None,
        }
    }
}

/// Finite state machine tracking the active screen
#[derive(Debug, Clone, Default)]
pub struct ViewNavigator {
    state: NavigationState,
}

impl ViewNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    pub fn screen(&self) -> Screen {
        self.state.screen()
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.state.selected_category()
    }

    pub fn selected_item(&self) -> Option<&Item> {
        self.state.selected_item()
    }

    /// Main -> CategoryPick
    pub fn go_to_category_pick(&mut self) -> bool {
        match self.state {
            NavigationState::Main => {
                self.state = NavigationState::CategoryPick;
                true
            }
            _ => self.refuse("go_to_category_pick"),
        }
    }

    /// CategoryPick -> Search, remembering the category
    pub fn select_category(&mut self, category: Category) -> bool {
        match self.state {
            NavigationState::CategoryPick => {
                self.state = NavigationState::Search { category };
                true
            }
            _ => self.refuse("select_category"),
        }
    }

    /// Search -> Details, remembering the item
    pub fn select_item(&mut self, item: Item) -> bool {
        match std::mem::take(&mut self.state) {
            NavigationState::Search { category } => {
                self.state = NavigationState::Details { category, item };
                true
            }
            other => {
                self.state = other;
                self.refuse("select_item")
            }
        }
    }

    /// One step backwards; Main is terminal.
    pub fn go_back(&mut self) -> bool {
        self.state = match std::mem::take(&mut self.state) {
            NavigationState::Details { category, .. } => NavigationState::Search { category },
            NavigationState::Search { .. } => NavigationState::CategoryPick,
            NavigationState::CategoryPick => NavigationState::Main,
            NavigationState::Main => return self.refuse("go_back"),
        };
        true
    }

    /// Unconditional return to Main, dropping all context
    pub fn go_home(&mut self) -> bool {
        let changed = self.state != NavigationState::Main;
        self.state = NavigationState::Main;
        changed
    }

    fn refuse(&self, operation: &'static str) -> bool {
        debug!(
            "Ignoring {} on the {} screen",
            operation,
            self.state.screen()
        );
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog;
    use crate::types::{sample_item, CategoryId};

    fn tops() -> Category {
        catalog::get(CategoryId::Tops).clone()
    }

    fn at_details() -> ViewNavigator {
        let mut nav = ViewNavigator::new();
        nav.go_to_category_pick();
        nav.select_category(tops());
        nav.select_item(sample_item(42, CategoryId::Tops));
        nav
    }

    #[test]
    fn test_initial_state() {
        let nav = ViewNavigator::new();
        assert_eq!(nav.screen(), Screen::Main);
        assert!(nav.selected_category().is_none());
        assert!(nav.selected_item().is_none());
    }

    #[test]
    fn test_forward_and_back_scenario() {
        let mut nav = ViewNavigator::new();
        assert!(nav.go_to_category_pick());
        assert_eq!(nav.screen(), Screen::CategoryPick);

        assert!(nav.select_category(tops()));
        assert_eq!(nav.screen(), Screen::Search);
        assert_eq!(nav.selected_category().unwrap().id.as_str(), "tops");

        assert!(nav.select_item(sample_item(42, CategoryId::Tops)));
        assert_eq!(nav.screen(), Screen::Details);
        assert_eq!(nav.selected_item().unwrap().id.0, 42);

        assert!(nav.go_back());
        assert_eq!(nav.screen(), Screen::Search);
        assert!(nav.selected_item().is_none());
        assert_eq!(nav.selected_category().unwrap().id, CategoryId::Tops);

        assert!(nav.go_back());
        assert_eq!(nav.screen(), Screen::CategoryPick);
        assert!(nav.selected_category().is_none());

        assert!(nav.go_back());
        assert_eq!(nav.screen(), Screen::Main);
        assert!(!nav.go_back());
        assert_eq!(nav.state(), &NavigationState::Main);
    }

    #[test]
    fn test_select_item_outside_search_is_noop() {
        let mut nav = ViewNavigator::new();
        nav.go_to_category_pick();
        let before = nav.state().clone();
        assert!(!nav.select_item(sample_item(1, CategoryId::Tops)));
        assert_eq!(nav.state(), &before);
    }

    #[test]
    fn test_out_of_order_operations_are_noops() {
        let mut nav = ViewNavigator::new();
        assert!(!nav.select_category(tops()));
        assert!(!nav.select_item(sample_item(1, CategoryId::Tops)));
        assert_eq!(nav.screen(), Screen::Main);

        let mut nav = at_details();
        let before = nav.state().clone();
        assert!(!nav.go_to_category_pick());
        assert!(!nav.select_category(tops()));
        assert!(!nav.select_item(sample_item(7, CategoryId::Tops)));
        assert_eq!(nav.state(), &before);
    }

    #[test]
    fn test_go_home_from_every_screen() {
        let mut from_main = ViewNavigator::new();
        assert!(!from_main.go_home());
        assert_eq!(from_main.state(), &NavigationState::Main);

        let mut from_pick = ViewNavigator::new();
        from_pick.go_to_category_pick();
        let mut from_search = from_pick.clone();
        from_search.select_category(tops());
        let mut from_details = at_details();

        for nav in [&mut from_pick, &mut from_search, &mut from_details] {
            assert!(nav.go_home());
            assert_eq!(nav.state(), &NavigationState::Main);
            assert!(nav.selected_category().is_none());
            assert!(nav.selected_item().is_none());
        }
    }
}
