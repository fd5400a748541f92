use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Location information for a listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub city: String,
    pub area: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// Card-level view of a property listing, as returned by a listing repository
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ListingSummary {
    pub id: String,
    pub address: String,
    pub location: Location,
    pub price: i64,
    pub bedrooms: i64,
    pub bathrooms: i64,
    pub sqm: i32,
    /// Building kind, e.g. "condo", "house", "townhouse"
    pub property_type: String,
    /// Transaction scope the listing is offered under ("buy", "lease", "sold")
    pub status: String,
    /// Quick-filter tags the listing carries, e.g. "parking", "new-construction"
    pub features: Vec<String>,
    pub images: Vec<String>,
    pub url: String,
    pub listed_at: DateTime<Utc>,
}
