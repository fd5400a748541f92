use crate::config::SearchConfig;
use crate::filters::{canonical_key, FilterCriteria};
use crate::search::traits::{ListingRepository, Navigator};
use crate::search::types::{total_pages, PageStatus, PaginationState};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// The criteria the controller is currently paging through
struct ActiveSearch {
    criteria: FilterCriteria,
    /// Canonical serialization of `criteria`; `None` until the first search is applied
    key: Option<String>,
}

/// A fetch that has been issued but not yet resolved
#[derive(Debug)]
pub struct PageRequest {
    token: u64,
    page: u32,
    criteria: FilterCriteria,
}

impl PageRequest {
    pub fn page(&self) -> u32 {
        self.page
    }
}

/// Keeps the results page, the filter criteria and the URL's page parameter in step.
///
/// Every fetch takes a token from a monotonically increasing counter. A
/// resolution whose token is no longer the latest is dropped, so the most
/// recently issued request always wins.
pub struct PaginationController {
    repository: Arc<dyn ListingRepository>,
    navigator: Arc<dyn Navigator>,
    page_size: u32,
    fetch_timeout: Duration,
    state: watch::Sender<PaginationState>,
    search: Mutex<ActiveSearch>,
    latest_request: AtomicU64,
}

impl PaginationController {
    pub fn new(
        repository: Arc<dyn ListingRepository>,
        navigator: Arc<dyn Navigator>,
        config: &SearchConfig,
    ) -> Self {
        let (state, _) = watch::channel(PaginationState::default());
        Self {
            repository,
            navigator,
            page_size: config.page_size,
            fetch_timeout: config.fetch_timeout,
            state,
            search: Mutex::new(ActiveSearch {
                criteria: FilterCriteria::default(),
                key: None,
            }),
            latest_request: AtomicU64::new(0),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PaginationState> {
        self.state.subscribe()
    }

    pub fn state(&self) -> PaginationState {
        self.state.borrow().clone()
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    /// Initial load: page comes from the URL, criteria from the caller
    pub async fn mount(&self, criteria: &FilterCriteria) {
        let page = self.initial_page();
        {
            let mut search = self.search.lock();
            search.key = Some(canonical_key(criteria));
            search.criteria = criteria.clone();
        }
        info!(
            "Mounting search via {} on page {}",
            self.repository.source_name(),
            page
        );
        let request = self.begin(page, PageStatus::Loading);
        self.resolve(request).await;
    }

    /// Record new criteria and issue the page-1 request if they differ by value.
    ///
    /// Returns `None` when the criteria serialize the same as the active search.
    pub fn criteria_changed(&self, criteria: &FilterCriteria) -> Option<PageRequest> {
        let key = canonical_key(criteria);
        {
            let mut search = self.search.lock();
            if search.key.as_deref() == Some(key.as_str()) {
                debug!("Criteria unchanged; keeping page {}", self.state.borrow().current_page);
                return None;
            }
            search.key = Some(key);
            search.criteria = criteria.clone();
        }

        info!("Filters changed; returning to page 1");
        if self.navigator.page_param().is_some() {
            self.navigator.push_page(None);
        }
        Some(self.begin(1, PageStatus::Loading))
    }

    /// Apply criteria and wait for the resulting fetch. Returns whether a fetch was issued.
    pub async fn apply_criteria(&self, criteria: &FilterCriteria) -> bool {
        match self.criteria_changed(criteria) {
            Some(request) => {
                self.resolve(request).await;
                true
            }
            None => false,
        }
    }

    /// Validate a navigation target and issue its request.
    ///
    /// Out-of-range targets and the current page are ignored.
    pub fn request_page(&self, page: u32) -> Option<PageRequest> {
        let (current, total) = {
            let state = self.state.borrow();
            (state.current_page, state.total_pages)
        };
        if page < 1 || page > total || page == current {
            debug!("Ignoring navigation to page {} (current {}, total {})", page, current, total);
            return None;
        }

        info!("Navigating to page {}", page);
        self.navigator.push_page(url_page(page));
        self.navigator.scroll_to_top();
        Some(self.begin(page, PageStatus::PageChanging))
    }

    /// Returns whether the navigation was accepted
    pub async fn go_to_page(&self, page: u32) -> bool {
        match self.request_page(page) {
            Some(request) => {
                self.resolve(request).await;
                true
            }
            None => false,
        }
    }

    pub async fn go_to_next_page(&self) -> bool {
        let current = self.state.borrow().current_page;
        self.go_to_page(current.saturating_add(1)).await
    }

    pub async fn go_to_previous_page(&self) -> bool {
        let current = self.state.borrow().current_page;
        self.go_to_page(current.saturating_sub(1)).await
    }

    /// Re-issue the fetch for the current page, keeping the visible results while it runs
    pub async fn refresh(&self) {
        let page = self.state.borrow().current_page;
        info!("Refreshing page {}", page);
        let request = self.begin(page, PageStatus::PageChanging);
        self.resolve(request).await;
    }

    /// Follow a criteria stream, resetting to page 1 whenever the criteria change by value.
    ///
    /// The stream's current value is compared first, so call this after `mount`.
    /// Change detection runs in notification order; fetches run detached so a
    /// newer request can supersede one still in flight.
    pub fn spawn_sync(self: &Arc<Self>, mut criteria: watch::Receiver<FilterCriteria>) -> JoinHandle<()> {
        let controller = Arc::clone(self);
        tokio::spawn(async move {
            // a change made before subscribing is already marked seen; compare it once up front
            loop {
                let snapshot = criteria.borrow_and_update().clone();
                if let Some(request) = controller.criteria_changed(&snapshot) {
                    let controller = Arc::clone(&controller);
                    tokio::spawn(async move { controller.resolve(request).await });
                }
                if criteria.changed().await.is_err() {
                    break;
                }
            }
            debug!("Criteria stream closed; stopping pagination sync");
        })
    }

    fn initial_page(&self) -> u32 {
        self.navigator
            .page_param()
            .and_then(|raw| raw.trim().parse::<u32>().ok())
            .filter(|page| *page >= 1)
            .unwrap_or(1)
    }

    fn begin(&self, page: u32, status: PageStatus) -> PageRequest {
        let token = self.latest_request.fetch_add(1, Ordering::SeqCst) + 1;
        let criteria = self.search.lock().criteria.clone();
        self.state.send_modify(|state| {
            state.current_page = page;
            state.status = status;
            state.error = None;
        });
        debug!("Request #{} for page {} ({:?})", token, page, status);
        PageRequest {
            token,
            page,
            criteria,
        }
    }

    fn is_latest(&self, token: u64) -> bool {
        self.latest_request.load(Ordering::SeqCst) == token
    }

    /// Apply `update` to the published state only if `token` is still the latest request.
    ///
    /// The token check runs under the state's write lock, so a newer `begin` either
    /// happens before it (and the update is dropped) or after the update lands.
    fn publish(&self, token: u64, update: impl FnOnce(&mut PaginationState)) -> bool {
        let published = self.state.send_if_modified(|state| {
            if !self.is_latest(token) {
                return false;
            }
            update(state);
            true
        });
        if !published {
            debug!("Discarding stale response for request #{}", token);
        }
        published
    }

    async fn resolve(&self, mut request: PageRequest) {
        loop {
            let fetch = self
                .repository
                .fetch_page(request.page, self.page_size, &request.criteria);
            let result = tokio::time::timeout(self.fetch_timeout, fetch).await;

            let page = match result {
                Ok(Ok(page)) => page,
                Ok(Err(err)) => {
                    self.fail(request.token, format!("{:#}", err));
                    return;
                }
                Err(_) => {
                    self.fail(
                        request.token,
                        format!("Request timed out after {:?}", self.fetch_timeout),
                    );
                    return;
                }
            };

            let pages = total_pages(page.total_count, self.page_size);
            if page.total_pages != pages {
                debug!(
                    "Repository reported {} pages, using {} from {} results",
                    page.total_pages, pages, page.total_count
                );
            }

            if pages > 0 && request.page > pages {
                if !self.publish(request.token, |state| state.current_page = pages) {
                    return;
                }
                warn!(
                    "Page {} is past the last page ({}); loading page {} instead",
                    request.page, pages, pages
                );
                request.page = pages;
                self.navigator.push_page(url_page(pages));
                continue;
            }

            let settled = if pages == 0 { 1 } else { request.page };
            let total_count = page.total_count;
            let count = page.items.len();
            let published = self.publish(request.token, |state| {
                *state = PaginationState {
                    items: page.items,
                    total_count,
                    total_pages: pages,
                    current_page: settled,
                    status: PageStatus::Idle,
                    error: None,
                };
            });
            if !published {
                return;
            }

            info!(
                "Loaded page {}/{} ({} of {} listings)",
                settled, pages, count, total_count
            );
            if settled != request.page {
                self.navigator.push_page(url_page(settled));
            }
            return;
        }
    }

    fn fail(&self, token: u64, message: String) {
        let published = self.publish(token, |state| {
            state.status = PageStatus::Error;
            state.error = Some(message.clone());
        });
        if published {
            warn!("Listing fetch failed: {}", message);
        }
    }
}

/// Page 1 is the canonical URL without a page parameter
fn url_page(page: u32) -> Option<u32> {
    if page == 1 {
        None
    } else {
        Some(page)
    }
}
