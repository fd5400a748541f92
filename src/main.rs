use anyhow::Result;
use async_trait::async_trait;
use chrono::{Duration as ChronoDuration, Utc};
use housing_search::config::SearchConfig;
use housing_search::filters::{FilterStore, FilterUpdate, PersistableCriteria, Range};
use housing_search::models::{ListingSummary, Location};
use housing_search::search::{
    AutoSaveScheduler, InMemoryListingRepository, MemoryNavigator, Navigator, NotificationSettings,
    PaginationController, PaginationState, SavedSearches, SearchPersistence,
};
use std::sync::Arc;
use tokio::sync::watch;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Persistence stand-in that just logs what it would store
struct ConsolePersistence;

#[async_trait]
impl SearchPersistence for ConsolePersistence {
    async fn auto_save(&self, criteria: &PersistableCriteria) -> bool {
        match serde_json::to_string(criteria) {
            Ok(json) => {
                info!("💾 Auto-saved search: {}", json);
                true
            }
            Err(_) => false,
        }
    }

    async fn create_named_search(
        &self,
        name: &str,
        criteria: &PersistableCriteria,
        settings: &NotificationSettings,
    ) -> bool {
        info!(
            "💾 Saved search {:?} ({:?} alerts): {:?}",
            name, settings.frequency, criteria.location
        );
        true
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("🏠 Housing Search - filter & pagination session");
    info!("================================================");

    let config = SearchConfig::from_env()?;
    let repository = Arc::new(InMemoryListingRepository::new(sample_listings()));
    let navigator = Arc::new(MemoryNavigator::new("https://homes.example/search?page=2")?);
    let persistence = Arc::new(ConsolePersistence);

    let store = FilterStore::default();
    let (auth, auth_rx) = watch::channel(true);
    let controller = Arc::new(PaginationController::new(
        repository,
        navigator.clone(),
        &config,
    ));

    controller.mount(&store.snapshot()).await;
    print_page(&controller.state());

    let sync = controller.spawn_sync(store.subscribe());
    let autosave = AutoSaveScheduler::new(persistence.clone(), config.auto_save.clone())
        .spawn(store.subscribe(), auth_rx);
    let mut results = controller.subscribe();

    info!("Refining: Toronto, 2-4 bedrooms, condos");
    let _ = results.borrow_and_update();
    store.update(FilterUpdate::Cities(vec!["Toronto".into()]));
    store.update(FilterUpdate::Bedrooms(Some(Range::new(2, 4))));
    store.update(FilterUpdate::PropertyTypes(vec!["condo".into(), "townhouse".into()]));
    settle(&mut results).await?;
    print_page(&controller.state());

    for chip in store.chips() {
        println!("   [{}] {}", chip.id, chip.label);
    }
    println!("   {} active filters", store.active_filter_count());

    // Quiet period: the scheduler saves once
    tokio::time::sleep(config.auto_save.debounce + std::time::Duration::from_millis(100)).await;

    if controller.go_to_next_page().await {
        print_page(&controller.state());
        info!("URL now {}", navigator.current_url());
    }

    let saved = SavedSearches::new(persistence);
    let notification = saved
        .save("Toronto family condos", &store.snapshot(), NotificationSettings::default())
        .await?;
    println!("🔔 {}: {}", notification.title, notification.message);

    info!("Clearing filters");
    let _ = results.borrow_and_update();
    store.clear();
    settle(&mut results).await?;
    print_page(&controller.state());
    info!("Page parameter after reset: {:?}", navigator.page_param());

    auth.send_replace(false);
    autosave.cancel();
    drop(store);
    sync.await?;

    Ok(())
}

/// Wait until the controller has picked up a change and finished fetching
async fn settle(results: &mut watch::Receiver<PaginationState>) -> Result<()> {
    results.changed().await?;
    results.wait_for(|state| !state.is_busy()).await?;
    Ok(())
}

fn print_page(state: &PaginationState) {
    println!(
        "\n📄 Page {}/{} ({} listings, {:?})",
        state.current_page, state.total_pages, state.total_count, state.status
    );
    if let Some(error) = &state.error {
        println!("   ⚠️  {}", error);
    }
    for listing in &state.items {
        println!(
            "   {} - {}, {} (${}) {} bd / {} ba",
            listing.id,
            listing.address,
            listing.location.city,
            listing.price,
            listing.bedrooms,
            listing.bathrooms
        );
    }
}

fn sample_listings() -> Vec<ListingSummary> {
    let cities = ["Toronto", "Ottawa", "Mississauga"];
    let kinds = ["condo", "house", "townhouse"];
    let tags = ["parking", "pool", "new-construction", "garden"];
    let now = Utc::now();

    (0..48)
        .map(|i| {
            let city = cities[i % cities.len()];
            ListingSummary {
                id: format!("HS-{:04}", i + 1),
                address: format!("{} {} Street", 10 + i * 7, ["King", "Queen", "Bloor", "Elm"][i % 4]),
                location: Location {
                    city: city.to_string(),
                    area: None,
                    latitude: None,
                    longitude: None,
                },
                price: 350_000 + (i as i64 * 37_500) % 1_200_000,
                bedrooms: 1 + (i as i64 % 5),
                bathrooms: 1 + (i as i64 % 3),
                sqm: 45 + (i as i32 * 11) % 160,
                property_type: kinds[(i / 3) % kinds.len()].to_string(),
                status: if i % 10 == 9 { "lease" } else { "buy" }.to_string(),
                features: vec![tags[i % tags.len()].to_string()],
                images: vec![],
                url: format!("https://homes.example/listing/HS-{:04}", i + 1),
                listed_at: now - ChronoDuration::days(i as i64),
            }
        })
        .collect()
}
