use crate::filters::FilterCriteria;
use crate::models::ListingSummary;
use crate::search::traits::ListingRepository;
use crate::search::types::{total_pages, ListingPage};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, Url};
use std::time::Duration;
use tracing::{debug, info};

/// Listing repository over a fixed set of listings
pub struct InMemoryListingRepository {
    listings: Vec<ListingSummary>,
}

impl InMemoryListingRepository {
    pub fn new(listings: Vec<ListingSummary>) -> Self {
        Self { listings }
    }
}

/// Whether a listing satisfies every populated refinement
pub fn matches(listing: &ListingSummary, criteria: &FilterCriteria) -> bool {
    if !criteria.cities.is_empty()
        && !criteria
            .cities
            .iter()
            .any(|city| city.eq_ignore_ascii_case(&listing.location.city))
    {
        return false;
    }
    if !criteria.property_types.is_empty()
        && !criteria
            .property_types
            .iter()
            .any(|kind| kind.eq_ignore_ascii_case(&listing.property_type))
    {
        return false;
    }
    if let Some(range) = criteria.price_range {
        if !range.contains(listing.price) {
            return false;
        }
    }
    if let Some(range) = criteria.bedrooms {
        if !range.contains(listing.bedrooms) {
            return false;
        }
    }
    if let Some(range) = criteria.bathrooms {
        if !range.contains(listing.bathrooms) {
            return false;
        }
    }
    if let Some(status) = criteria.status.as_deref() {
        if !status.eq_ignore_ascii_case(&listing.status) {
            return false;
        }
    }
    criteria
        .quick_filters
        .iter()
        .all(|tag| listing.features.iter().any(|feature| feature == tag))
}

#[async_trait]
impl ListingRepository for InMemoryListingRepository {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        criteria: &FilterCriteria,
    ) -> Result<ListingPage> {
        let matching: Vec<&ListingSummary> = self
            .listings
            .iter()
            .filter(|listing| matches(listing, criteria))
            .collect();
        let total_count = matching.len() as u64;

        let start = (page.saturating_sub(1) as usize).saturating_mul(page_size as usize);
        let items: Vec<ListingSummary> = matching
            .into_iter()
            .skip(start)
            .take(page_size as usize)
            .cloned()
            .collect();

        debug!(
            "In-memory page {}: {} of {} matching listings",
            page,
            items.len(),
            total_count
        );

        Ok(ListingPage {
            items,
            total_count,
            total_pages: total_pages(total_count, page_size),
        })
    }

    fn source_name(&self) -> &'static str {
        "memory"
    }
}

/// Listing repository backed by a JSON search API
pub struct HttpListingRepository {
    client: Client,
    base_url: Url,
}

impl HttpListingRepository {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)
            .with_context(|| format!("Invalid listing API URL: {}", base_url))?;
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("housing-search/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, base_url })
    }

    /// Build the `GET /listings` URL for a page request
    pub fn page_url(&self, page: u32, page_size: u32, criteria: &FilterCriteria) -> Result<Url> {
        let mut url = self
            .base_url
            .join("listings")
            .context("Failed to build listings URL")?;
        url.query_pairs_mut()
            .extend_pairs(query_pairs(page, page_size, criteria));
        Ok(url)
    }
}

fn query_pairs(page: u32, page_size: u32, criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut pairs = vec![("page", page.to_string()), ("pageSize", page_size.to_string())];

    if !criteria.cities.is_empty() {
        pairs.push(("cities", criteria.cities.join(",")));
    }
    if !criteria.property_types.is_empty() {
        pairs.push(("propertyTypes", criteria.property_types.join(",")));
    }
    let ranges = [
        ("minPrice", "maxPrice", criteria.price_range),
        ("minBedrooms", "maxBedrooms", criteria.bedrooms),
        ("minBathrooms", "maxBathrooms", criteria.bathrooms),
    ];
    for (min_key, max_key, range) in ranges {
        if let Some(range) = range {
            pairs.push((min_key, range.min.to_string()));
            pairs.push((max_key, range.max.to_string()));
        }
    }
    if !criteria.quick_filters.is_empty() {
        pairs.push(("features", criteria.quick_filters.join(",")));
    }
    if let Some(status) = &criteria.status {
        pairs.push(("status", status.clone()));
    }

    pairs
}

#[async_trait]
impl ListingRepository for HttpListingRepository {
    async fn fetch_page(
        &self,
        page: u32,
        page_size: u32,
        criteria: &FilterCriteria,
    ) -> Result<ListingPage> {
        let url = self.page_url(page, page_size, criteria)?;
        info!("Fetching listings: {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("Listing request failed")?
            .error_for_status()
            .context("Listing API returned an error status")?;

        let page: ListingPage = response
            .json()
            .await
            .context("Failed to decode listing page")?;

        Ok(page)
    }

    fn source_name(&self) -> &'static str {
        "http"
    }
}
