use crate::search::traits::Navigator;
use anyhow::{Context, Result};
use parking_lot::Mutex;
use reqwest::Url;
use tracing::debug;

const PAGE_PARAM: &str = "page";

struct History {
    entries: Vec<Url>,
    scroll_requests: usize,
}

/// In-process browser history: a stack of URLs plus a count of scroll-to-top requests
pub struct MemoryNavigator {
    history: Mutex<History>,
}

impl MemoryNavigator {
    pub fn new(url: &str) -> Result<Self> {
        let url = Url::parse(url).with_context(|| format!("Invalid search URL: {}", url))?;
        Ok(Self {
            history: Mutex::new(History {
                entries: vec![url],
                scroll_requests: 0,
            }),
        })
    }

    pub fn current_url(&self) -> Url {
        let history = self.history.lock();
        // never empty: seeded in `new` and only ever pushed to
        history.entries[history.entries.len() - 1].clone()
    }

    pub fn history_len(&self) -> usize {
        self.history.lock().entries.len()
    }

    pub fn scroll_requests(&self) -> usize {
        self.history.lock().scroll_requests
    }
}

impl Navigator for MemoryNavigator {
    fn page_param(&self) -> Option<String> {
        self.current_url()
            .query_pairs()
            .find(|(key, _)| key == PAGE_PARAM)
            .map(|(_, value)| value.into_owned())
    }

    fn push_page(&self, page: Option<u32>) {
        let mut url = self.current_url();
        let mut pairs: Vec<(String, String)> = url
            .query_pairs()
            .filter(|(key, _)| key != PAGE_PARAM)
            .map(|(key, value)| (key.into_owned(), value.into_owned()))
            .collect();
        if let Some(page) = page {
            pairs.push((PAGE_PARAM.to_string(), page.to_string()));
        }

        if pairs.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(pairs);
        }

        debug!("History push: {}", url);
        self.history.lock().entries.push(url);
    }

    fn scroll_to_top(&self) {
        self.history.lock().scroll_requests += 1;
    }
}
