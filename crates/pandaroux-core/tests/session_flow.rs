use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use pandaroux_core::{
    catalog, Category, CategoryId, Item, ItemId, MockSearchProvider, Price, Screen,
    SearchFailure, SearchProvider, SearchRefused, SearchState, Session, SharedSession,
};
use tokio::sync::Notify;

/// Provider that holds every search until released
struct GatedProvider {
    release: Notify,
    items: Vec<Item>,
}

#[async_trait]
impl SearchProvider for GatedProvider {
    async fn search(&self, _category: &Category, _query: &str) -> Result<Vec<Item>, SearchFailure> {
        self.release.notified().await;
        Ok(self.items.clone())
    }
}

fn item(id: u64, category_id: CategoryId) -> Item {
    Item {
        id: ItemId(id),
        title: format!("Listing {}", id),
        price: Price::new(20.0, "PLN"),
        photo_url: String::new(),
        detail_url: String::new(),
        brand: None,
        size: None,
        price_difference: Some(5.0),
        carbon_impact_kg: Some(1.0),
        category_id,
    }
}

async fn wait_until_pending(shared: &SharedSession) {
    while !shared.read().await.search_state().is_pending() {
        tokio::task::yield_now().await;
    }
}

#[tokio::test]
async fn test_navigation_away_discards_in_flight_search() {
    let shared = SharedSession::new(Session::new());
    {
        let mut session = shared.write().await;
        session.go_to_category_pick();
        session.select_category(catalog::get(CategoryId::Tops).clone());
        session.add_to_wardrobe(item(1, CategoryId::Tops));
    }

    let provider = Arc::new(GatedProvider {
        release: Notify::new(),
        items: vec![item(2, CategoryId::Tops)],
    });

    let task = {
        let shared = shared.clone();
        let provider = Arc::clone(&provider);
        tokio::spawn(async move { shared.run_search(provider.as_ref(), "avengers").await })
    };

    wait_until_pending(&shared).await;
    assert!(shared.write().await.go_back());
    let before = shared.snapshot().await;

    provider.release.notify_one();
    let applied = task.await.unwrap().unwrap();

    assert!(!applied);
    let after = shared.snapshot().await;
    assert_eq!(after, before);
    assert_eq!(after.screen, Screen::CategoryPick);
    assert_eq!(after.search, SearchState::Idle);
    assert_eq!(after.summary.item_count, 1);
}

#[tokio::test]
async fn test_second_search_refused_while_pending() {
    let shared = SharedSession::new(Session::new());
    {
        let mut session = shared.write().await;
        session.go_to_category_pick();
        session.select_category(catalog::get(CategoryId::Shoes).clone());
    }

    let provider = Arc::new(GatedProvider {
        release: Notify::new(),
        items: vec![item(7, CategoryId::Shoes)],
    });

    let task = {
        let shared = shared.clone();
        let provider = Arc::clone(&provider);
        tokio::spawn(async move { shared.run_search(provider.as_ref(), "nike").await })
    };

    wait_until_pending(&shared).await;
    assert_eq!(
        shared.run_search(provider.as_ref(), "adidas").await,
        Err(SearchRefused::AlreadyInFlight)
    );

    provider.release.notify_one();
    assert_eq!(task.await.unwrap(), Ok(true));

    let snapshot = shared.snapshot().await;
    assert_eq!(snapshot.search.query(), Some("nike"));
    assert_eq!(snapshot.search.results().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_full_flow_with_mock_provider() {
    let shared = SharedSession::default();
    let provider = MockSearchProvider::new(Duration::from_millis(1000));

    {
        let mut session = shared.write().await;
        assert!(session.go_to_category_pick());
        assert!(session.select_category(catalog::find("tops").unwrap().clone()));
    }

    assert_eq!(
        shared.run_search(&provider, "   ").await,
        Err(SearchRefused::EmptyQuery)
    );
    assert_eq!(shared.run_search(&provider, "avengers").await, Ok(true));

    let mut session = shared.write().await;
    let first = session.search_state().results()[0].clone();
    assert!(session.select_item(first.clone()));
    assert_eq!(session.screen(), Screen::Details);

    assert_eq!(session.add_selected_to_wardrobe(), Some(first.clone()));
    assert_eq!(session.screen(), Screen::Search);
    assert!(session.select_item(first.clone()));
    assert_eq!(session.add_selected_to_wardrobe(), Some(first.clone()));
    assert_eq!(session.wardrobe().count(), 1);

    assert!(session.go_home());
    let snapshot = session.snapshot();
    assert_eq!(snapshot.screen, Screen::Main);
    assert!(snapshot.selected_category.is_none());
    assert_eq!(snapshot.wardrobe.len(), 1);
    assert_eq!(snapshot.wardrobe[0].items[0].id, first.id);
}

#[tokio::test]
async fn test_failure_shows_try_again_state() {
    let shared = SharedSession::default();
    {
        let mut session = shared.write().await;
        session.go_to_category_pick();
        session.select_category(catalog::get(CategoryId::Bottoms).clone());
    }
    let failure = SearchFailure::Rejected("quota exceeded".into());
    let provider = MockSearchProvider::failing(Duration::ZERO, failure.clone());

    assert_eq!(shared.run_search(&provider, "jeans").await, Ok(true));
    assert_eq!(
        shared.snapshot().await.search,
        SearchState::Failed {
            query: "jeans".into(),
            failure
        }
    );

    // retry is user-driven, not automatic
    let ok = MockSearchProvider::new(Duration::ZERO);
    assert_eq!(shared.run_search(&ok, "jeans").await, Ok(true));
    assert_eq!(shared.snapshot().await.search.results().len(), 2);
}
