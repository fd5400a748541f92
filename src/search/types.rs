use crate::models::ListingSummary;
use serde::{Deserialize, Serialize};

/// One page of listings as answered by a listing repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ListingPage {
    pub items: Vec<ListingSummary>,
    pub total_count: u64,
    #[serde(default)]
    pub total_pages: u32,
}

/// Fetch status of the results view
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum PageStatus {
    /// First fetch for a new filter set, or initial mount
    Loading,
    /// Fetch triggered by page navigation or refresh only
    PageChanging,
    Idle,
    Error,
}

/// Everything a results view needs to render
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PaginationState {
    pub items: Vec<ListingSummary>,
    pub total_count: u64,
    pub total_pages: u32,
    pub current_page: u32,
    pub status: PageStatus,
    pub error: Option<String>,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            total_count: 0,
            total_pages: 0,
            current_page: 1,
            status: PageStatus::Loading,
            error: None,
        }
    }
}

impl PaginationState {
    pub fn is_busy(&self) -> bool {
        matches!(self.status, PageStatus::Loading | PageStatus::PageChanging)
    }

    pub fn has_next_page(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous_page(&self) -> bool {
        self.current_page > 1
    }
}

/// `ceil(total_count / page_size)`
pub fn total_pages(total_count: u64, page_size: u32) -> u32 {
    if page_size == 0 {
        return 0;
    }
    let pages = total_count.div_ceil(u64::from(page_size));
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// How often a saved search sends alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AlertFrequency {
    Instant,
    #[default]
    Daily,
    Weekly,
}

/// Alert preferences attached to a named search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email_alerts: bool,
    pub push_alerts: bool,
    pub frequency: AlertFrequency,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            email_alerts: true,
            push_alerts: false,
            frequency: AlertFrequency::Daily,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Success,
    Failure,
}

/// User-visible toast produced by a named save
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Notification {
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
}
