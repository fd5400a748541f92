use crate::filters::{FilterCriteria, PersistableCriteria};
use crate::search::types::{ListingPage, NotificationSettings};
use anyhow::Result;
use async_trait::async_trait;

/// Source of paginated listings matching a set of criteria
/// This allows swapping the HTTP backend for an in-memory one in tests and demos
#[async_trait]
pub trait ListingRepository: Send + Sync {
    /// Fetch page `page` (1-based) of `page_size` listings
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        criteria: &FilterCriteria,
    ) -> Result<ListingPage>;

    /// Get the name of the backing source
    fn source_name(&self) -> &'static str;
}

/// Durable storage for a user's searches
#[async_trait]
pub trait SearchPersistence: Send + Sync {
    /// Store the current search without user involvement; `false` means it was not saved
    async fn auto_save(&self, criteria: &PersistableCriteria) -> bool;

    async fn create_named_search(
        &self,
        name: &str,
        criteria: &PersistableCriteria,
        settings: &NotificationSettings,
    ) -> bool;
}

/// The navigable URL surface
pub trait Navigator: Send + Sync {
    /// Raw value of the `page` query parameter, if any
    fn page_param(&self) -> Option<String>;

    /// Push a history entry with the page parameter set, or removed when `None`
    fn push_page(&self, page: Option<u32>);

    fn scroll_to_top(&self);
}
