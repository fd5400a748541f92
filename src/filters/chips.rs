use crate::filters::criteria::{FilterCriteria, FilterField, Range, DEFAULT_STATUS};
use serde::{Deserialize, Serialize};
use serde_json::json;

/// Value carried by a chip, matching the element type of its field
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ChipValue {
    Text(String),
    Range(Range),
}

impl ChipValue {
    fn key(&self) -> String {
        match self {
            ChipValue::Text(text) => text.clone(),
            ChipValue::Range(range) => format!("{}-{}", range.min, range.max),
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ChipValue::Text(text) => Some(text),
            ChipValue::Range(_) => None,
        }
    }
}

/// Removable, human-readable token for one populated refinement
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilterChip {
    pub id: String,
    pub label: String,
    pub category: FilterField,
    pub value: ChipValue,
}

impl FilterChip {
    fn new(category: FilterField, value: ChipValue, label: String) -> Self {
        Self {
            id: format!("{}:{}", category, value.key()),
            label,
            category,
            value,
        }
    }
}

/// Search criteria in the shape the persistence service stores
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct PersistableCriteria {
    /// Cities joined into a single location string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub property_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_price: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bedrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_bathrooms: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_bathrooms: Option<i64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_type: Option<String>,
}

/// Project the criteria into chips in fixed category order.
///
/// Set-valued fields yield one chip per element. The status chip only appears
/// once the scope differs from the default.
pub fn chips(criteria: &FilterCriteria) -> Vec<FilterChip> {
    let mut chips = Vec::new();

    for field in FilterField::ALL {
        match field {
            FilterField::Cities => chips.extend(criteria.cities.iter().map(|city| {
                FilterChip::new(field, ChipValue::Text(city.clone()), city.clone())
            })),
            FilterField::PropertyTypes => {
                chips.extend(criteria.property_types.iter().map(|kind| {
                    FilterChip::new(field, ChipValue::Text(kind.clone()), humanize(kind))
                }))
            }
            FilterField::PriceRange => {
                if let Some(range) = criteria.price_range {
                    let label = format!("{} - {}", format_price(range.min), format_price(range.max));
                    chips.push(FilterChip::new(field, ChipValue::Range(range), label));
                }
            }
            FilterField::Bedrooms => {
                if let Some(range) = criteria.bedrooms {
                    let label = range_label(range, "Bed");
                    chips.push(FilterChip::new(field, ChipValue::Range(range), label));
                }
            }
            FilterField::Bathrooms => {
                if let Some(range) = criteria.bathrooms {
                    let label = range_label(range, "Bath");
                    chips.push(FilterChip::new(field, ChipValue::Range(range), label));
                }
            }
            FilterField::QuickFilters => {
                chips.extend(criteria.quick_filters.iter().map(|tag| {
                    FilterChip::new(field, ChipValue::Text(tag.clone()), humanize(tag))
                }))
            }
            FilterField::Status => {
                if let Some(status) = criteria.status.as_deref() {
                    if status != DEFAULT_STATUS {
                        chips.push(FilterChip::new(
                            field,
                            ChipValue::Text(status.to_string()),
                            status_label(status),
                        ));
                    }
                }
            }
        }
    }

    chips
}

/// Reshape criteria for the persistence service
pub fn to_persistable(criteria: &FilterCriteria) -> PersistableCriteria {
    let location = if criteria.cities.is_empty() {
        None
    } else {
        Some(criteria.cities.join(", "))
    };

    PersistableCriteria {
        location,
        property_types: criteria.property_types.clone(),
        min_price: criteria.price_range.map(|r| r.min),
        max_price: criteria.price_range.map(|r| r.max),
        min_bedrooms: criteria.bedrooms.map(|r| r.min),
        max_bedrooms: criteria.bedrooms.map(|r| r.max),
        min_bathrooms: criteria.bathrooms.map(|r| r.min),
        max_bathrooms: criteria.bathrooms.map(|r| r.max),
        features: criteria.quick_filters.clone(),
        transaction_type: criteria.status.clone(),
    }
}

/// Stable serialization of the criteria used to decide whether a search really changed.
///
/// Cities and property types are sets, so they are sorted; quick filters keep selection order.
pub fn canonical_key(criteria: &FilterCriteria) -> String {
    let mut cities = criteria.cities.clone();
    cities.sort();
    let mut property_types = criteria.property_types.clone();
    property_types.sort();

    json!({
        "cities": cities,
        "propertyTypes": property_types,
        "priceRange": criteria.price_range,
        "bedrooms": criteria.bedrooms,
        "bathrooms": criteria.bathrooms,
        "quickFilters": &criteria.quick_filters,
        "status": &criteria.status,
    })
    .to_string()
}

fn range_label(range: Range, unit: &str) -> String {
    let plural = if range.max == 1 { "" } else { "s" };
    if range.min == range.max {
        format!("{} {}{}", range.min, unit, plural)
    } else {
        format!("{}-{} {}{}", range.min, range.max, unit, plural)
    }
}

fn format_price(amount: i64) -> String {
    if amount >= 1_000_000 {
        let millions = amount as f64 / 1_000_000.0;
        let text = format!("{:.1}", millions);
        format!("${}M", text.trim_end_matches(".0"))
    } else if amount >= 1_000 {
        format!("${}K", amount / 1_000)
    } else {
        format!("${}", amount)
    }
}

fn status_label(status: &str) -> String {
    match status {
        "buy" => "For Sale".to_string(),
        "lease" | "rent" => "For Lease".to_string(),
        "sold" => "Sold".to_string(),
        other => humanize(other),
    }
}

/// "new-construction" -> "New Construction"
fn humanize(tag: &str) -> String {
    tag.split(['-', '_', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
