use serde::{Deserialize, Serialize};
use std::fmt;

/// Transaction scope every new search starts in
pub const DEFAULT_STATUS: &str = "buy";

/// Inclusive numeric bounds used for price, bedroom and bathroom filters
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Range {
    pub min: i64,
    pub max: i64,
}

impl Range {
    /// Build a range, swapping the bounds if they arrive reversed so that `min <= max` holds
    pub fn new(min: i64, max: i64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    pub fn contains(&self, value: i64) -> bool {
        self.min <= value && value <= self.max
    }
}

/// Names of the refinement fields held in [`FilterCriteria`]
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum FilterField {
    Cities,
    PropertyTypes,
    PriceRange,
    Bedrooms,
    Bathrooms,
    QuickFilters,
    Status,
}

impl FilterField {
    /// Fixed display order for chips
    pub const ALL: [FilterField; 7] = [
        FilterField::Cities,
        FilterField::PropertyTypes,
        FilterField::PriceRange,
        FilterField::Bedrooms,
        FilterField::Bathrooms,
        FilterField::QuickFilters,
        FilterField::Status,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FilterField::Cities => "cities",
            FilterField::PropertyTypes => "propertyTypes",
            FilterField::PriceRange => "priceRange",
            FilterField::Bedrooms => "bedrooms",
            FilterField::Bathrooms => "bathrooms",
            FilterField::QuickFilters => "quickFilters",
            FilterField::Status => "status",
        }
    }

    /// Whether `remove` can take out a single element instead of clearing the field
    pub fn is_set_valued(&self) -> bool {
        matches!(
            self,
            FilterField::Cities | FilterField::PropertyTypes | FilterField::QuickFilters
        )
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Wholesale replacement of one field's value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "field", content = "value", rename_all = "camelCase")]
pub enum FilterUpdate {
    Cities(Vec<String>),
    PropertyTypes(Vec<String>),
    PriceRange(Option<Range>),
    Bedrooms(Option<Range>),
    Bathrooms(Option<Range>),
    QuickFilters(Vec<String>),
    Status(Option<String>),
}

impl FilterUpdate {
    pub fn field(&self) -> FilterField {
        match self {
            FilterUpdate::Cities(_) => FilterField::Cities,
            FilterUpdate::PropertyTypes(_) => FilterField::PropertyTypes,
            FilterUpdate::PriceRange(_) => FilterField::PriceRange,
            FilterUpdate::Bedrooms(_) => FilterField::Bedrooms,
            FilterUpdate::Bathrooms(_) => FilterField::Bathrooms,
            FilterUpdate::QuickFilters(_) => FilterField::QuickFilters,
            FilterUpdate::Status(_) => FilterField::Status,
        }
    }
}

/// The user's current search refinements
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct FilterCriteria {
    /// Cities to search in; a set, kept in insertion order for display
    pub cities: Vec<String>,
    pub property_types: Vec<String>,
    pub price_range: Option<Range>,
    pub bedrooms: Option<Range>,
    pub bathrooms: Option<Range>,
    /// Tag identifiers in selection order
    pub quick_filters: Vec<String>,
    /// Transaction scope; survives `clear`
    pub status: Option<String>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self::with_status(DEFAULT_STATUS)
    }
}

impl FilterCriteria {
    /// Empty refinements scoped to the given transaction status
    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            cities: Vec::new(),
            property_types: Vec::new(),
            price_range: None,
            bedrooms: None,
            bathrooms: None,
            quick_filters: Vec::new(),
            status: Some(status.into()),
        }
    }

    pub fn apply(&mut self, update: FilterUpdate) {
        match update {
            FilterUpdate::Cities(values) => self.cities = dedup(values),
            FilterUpdate::PropertyTypes(values) => self.property_types = dedup(values),
            FilterUpdate::PriceRange(range) => self.price_range = range,
            FilterUpdate::Bedrooms(range) => self.bedrooms = range,
            FilterUpdate::Bathrooms(range) => self.bathrooms = range,
            FilterUpdate::QuickFilters(values) => self.quick_filters = values,
            FilterUpdate::Status(status) => self.status = status,
        }
    }

    /// Remove one element of a set-valued field, or clear the field entirely.
    ///
    /// Range and status fields are always cleared; `value` is ignored for them.
    pub fn remove(&mut self, field: FilterField, value: Option<&str>) {
        match field {
            FilterField::Cities => remove_from(&mut self.cities, value),
            FilterField::PropertyTypes => remove_from(&mut self.property_types, value),
            FilterField::QuickFilters => remove_from(&mut self.quick_filters, value),
            FilterField::PriceRange => self.price_range = None,
            FilterField::Bedrooms => self.bedrooms = None,
            FilterField::Bathrooms => self.bathrooms = None,
            FilterField::Status => self.status = None,
        }
    }

    /// Reset every refinement to its default, keeping `status`
    pub fn clear(&mut self) {
        let status = self.status.take();
        *self = Self {
            status,
            ..Self::with_status(String::new())
        };
    }

    pub fn is_populated(&self, field: FilterField) -> bool {
        match field {
            FilterField::Cities => !self.cities.is_empty(),
            FilterField::PropertyTypes => !self.property_types.is_empty(),
            FilterField::PriceRange => self.price_range.is_some(),
            FilterField::Bedrooms => self.bedrooms.is_some(),
            FilterField::Bathrooms => self.bathrooms.is_some(),
            FilterField::QuickFilters => !self.quick_filters.is_empty(),
            FilterField::Status => self.status.is_some(),
        }
    }

    /// Number of active refinements. Each quick filter counts on its own; status never counts.
    pub fn active_filter_count(&self) -> usize {
        FilterField::ALL
            .iter()
            .map(|field| match field {
                FilterField::Status => 0,
                FilterField::QuickFilters => self.quick_filters.len(),
                other => usize::from(self.is_populated(*other)),
            })
            .sum()
    }
}

fn dedup(values: Vec<String>) -> Vec<String> {
    let mut unique: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        if !unique.contains(&value) {
            unique.push(value);
        }
    }
    unique
}

fn remove_from(values: &mut Vec<String>, value: Option<&str>) {
    match value {
        Some(value) => {
            if let Some(pos) = values.iter().position(|v| v == value) {
                values.remove(pos);
            }
        }
        None => values.clear(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn populated() -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.apply(FilterUpdate::Cities(vec!["Toronto".into(), "Ottawa".into()]));
        criteria.apply(FilterUpdate::PropertyTypes(vec!["condo".into()]));
        criteria.apply(FilterUpdate::PriceRange(Some(Range::new(400_000, 900_000))));
        criteria.apply(FilterUpdate::Bedrooms(Some(Range::new(2, 4))));
        criteria.apply(FilterUpdate::Bathrooms(Some(Range::new(1, 2))));
        criteria.apply(FilterUpdate::QuickFilters(vec!["parking".into(), "pool".into()]));
        criteria.apply(FilterUpdate::Status(Some("lease".into())));
        criteria
    }

    #[test]
    fn test_default_is_scoped_to_buy() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.status.as_deref(), Some("buy"));
        assert_eq!(criteria.active_filter_count(), 0);
    }

    #[test]
    fn test_range_normalizes_reversed_bounds() {
        assert_eq!(Range::new(4, 2), Range { min: 2, max: 4 });
        assert!(Range::new(2, 4).contains(4));
        assert!(!Range::new(2, 4).contains(5));
    }

    #[test]
    fn test_active_count_counts_each_quick_filter() {
        let criteria = populated();
        // cities, types, price, beds, baths + two quick filters
        assert_eq!(criteria.active_filter_count(), 7);
    }

    #[test]
    fn test_clear_keeps_status() {
        let mut criteria = populated();
        criteria.clear();
        assert_eq!(criteria, FilterCriteria::with_status("lease"));
        assert_eq!(criteria.active_filter_count(), 0);
    }

    #[test]
    fn test_remove_single_value_from_set_field() {
        let mut criteria = populated();
        criteria.remove(FilterField::Cities, Some("Toronto"));
        assert_eq!(criteria.cities, vec!["Ottawa".to_string()]);

        criteria.remove(FilterField::QuickFilters, None);
        assert!(criteria.quick_filters.is_empty());
    }

    #[test]
    fn test_remove_range_ignores_value() {
        let mut criteria = populated();
        criteria.remove(FilterField::Bedrooms, Some("3"));
        assert!(criteria.bedrooms.is_none());
        assert_eq!(criteria.active_filter_count(), 6);
    }

    #[test]
    fn test_set_fields_are_deduplicated() {
        let mut criteria = FilterCriteria::default();
        criteria.apply(FilterUpdate::Cities(vec![
            "Toronto".into(),
            "Ottawa".into(),
            "Toronto".into(),
        ]));
        assert_eq!(criteria.cities, vec!["Toronto".to_string(), "Ottawa".to_string()]);
    }

    #[test]
    fn test_count_never_includes_status() {
        let mut criteria = FilterCriteria::default();
        criteria.apply(FilterUpdate::Status(Some("sold".into())));
        assert_eq!(criteria.active_filter_count(), 0);
    }
}
