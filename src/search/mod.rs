pub mod autosave;
pub mod navigation;
pub mod pagination;
pub mod repository;
pub mod saved;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod testing;

pub use autosave::{AutoSaveHandle, AutoSaveScheduler};
pub use navigation::MemoryNavigator;
pub use pagination::{PageRequest, PaginationController};
pub use repository::{HttpListingRepository, InMemoryListingRepository};
pub use saved::SavedSearches;
pub use traits::{ListingRepository, Navigator, SearchPersistence};
pub use types::{
    AlertFrequency, ListingPage, Notification, NotificationKind, NotificationSettings, PageStatus,
    PaginationState,
};
