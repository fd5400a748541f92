//! Test doubles shared by the search unit tests.

use crate::filters::{FilterCriteria, PersistableCriteria};
use crate::models::{ListingSummary, Location};
use crate::search::repository::InMemoryListingRepository;
use crate::search::traits::{ListingRepository, SearchPersistence};
use crate::search::types::{ListingPage, NotificationSettings};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

pub(crate) fn listing(id: usize, city: &str, price: i64, bedrooms: i64, features: &[&str]) -> ListingSummary {
    ListingSummary {
        id: format!("L{}", id),
        address: format!("{} Main St", id),
        location: Location {
            city: city.to_string(),
            area: None,
            latitude: None,
            longitude: None,
        },
        price,
        bedrooms,
        bathrooms: 1,
        sqm: 70,
        property_type: "condo".to_string(),
        status: "buy".to_string(),
        features: features.iter().map(|f| f.to_string()).collect(),
        images: vec![],
        url: format!("https://homes.example/listing/{}", id),
        listed_at: Utc::now(),
    }
}

/// `count` plain listings in `city`, ids starting at `first_id`
pub(crate) fn listings_in(city: &str, first_id: usize, count: usize) -> Vec<ListingSummary> {
    (first_id..first_id + count)
        .map(|id| listing(id, city, 500_000, 2, &[]))
        .collect()
}

/// In-memory repository that records calls and can be slowed down or broken
pub(crate) struct TestRepository {
    inner: InMemoryListingRepository,
    calls: Mutex<Vec<(u32, FilterCriteria)>>,
    delays: Mutex<VecDeque<Duration>>,
    failing: AtomicBool,
}

impl TestRepository {
    pub(crate) fn new(listings: Vec<ListingSummary>) -> Self {
        Self {
            inner: InMemoryListingRepository::new(listings),
            calls: Mutex::new(Vec::new()),
            delays: Mutex::new(VecDeque::new()),
            failing: AtomicBool::new(false),
        }
    }

    /// Per-call latencies, consumed in call order
    pub(crate) fn with_delays(self, delays: Vec<Duration>) -> Self {
        *self.delays.lock() = delays.into();
        self
    }

    pub(crate) fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub(crate) fn calls(&self) -> Vec<(u32, FilterCriteria)> {
        self.calls.lock().clone()
    }

    pub(crate) fn call_count(&self) -> usize {
        self.calls.lock().len()
    }
}

#[async_trait]
impl ListingRepository for TestRepository {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        criteria: &FilterCriteria,
    ) -> Result<ListingPage> {
        self.calls.lock().push((page, criteria.clone()));
        let delay = self.delays.lock().pop_front();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        if self.failing.load(Ordering::SeqCst) {
            bail!("backend unavailable");
        }
        self.inner.fetch_page(page, page_size, criteria).await
    }

    fn source_name(&self) -> &'static str {
        "test"
    }
}

/// Persistence that remembers what it was asked to store
pub(crate) struct RecordingPersistence {
    auto_saves: Mutex<Vec<PersistableCriteria>>,
    named: Mutex<Vec<(String, PersistableCriteria, NotificationSettings)>>,
    succeed: AtomicBool,
}

impl RecordingPersistence {
    pub(crate) fn new() -> Self {
        Self {
            auto_saves: Mutex::new(Vec::new()),
            named: Mutex::new(Vec::new()),
            succeed: AtomicBool::new(true),
        }
    }

    pub(crate) fn set_succeed(&self, succeed: bool) {
        self.succeed.store(succeed, Ordering::SeqCst);
    }

    pub(crate) fn auto_saves(&self) -> Vec<PersistableCriteria> {
        self.auto_saves.lock().clone()
    }

    pub(crate) fn named(&self) -> Vec<(String, PersistableCriteria, NotificationSettings)> {
        self.named.lock().clone()
    }
}

#[async_trait]
impl SearchPersistence for RecordingPersistence {
    async fn auto_save(&self, criteria: &PersistableCriteria) -> bool {
        self.auto_saves.lock().push(criteria.clone());
        self.succeed.load(Ordering::SeqCst)
    }

    async fn create_named_search(
        &self,
        name: &str,
        criteria: &PersistableCriteria,
        settings: &NotificationSettings,
    ) -> bool {
        self.named
            .lock()
            .push((name.to_string(), criteria.clone(), settings.clone()));
        self.succeed.load(Ordering::SeqCst)
    }
}
