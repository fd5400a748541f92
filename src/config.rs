use anyhow::{bail, Context, Result};
use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Debounce settings for automatic search saving
#[derive(Debug, Clone)]
pub struct AutoSaveConfig {
    /// Quiet period after the last filter change before saving
    pub debounce: Duration,
    /// Minimum number of active refinements before a search is worth saving
    pub threshold: usize,
}

impl Default for AutoSaveConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(2000),
            threshold: 3,
        }
    }
}

/// Tunables for the search session
#[derive(Debug, Clone)]
pub struct SearchConfig {
    /// Listings per results page
    pub page_size: u32,
    /// Upper bound on a single listing fetch
    pub fetch_timeout: Duration,
    pub auto_save: AutoSaveConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 12,
            fetch_timeout: Duration::from_secs(10),
            auto_save: AutoSaveConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Defaults overridden by `HOUSING_SEARCH_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(page_size) = parse_var::<u32>(&lookup, "HOUSING_SEARCH_PAGE_SIZE")? {
            if page_size == 0 {
                bail!("HOUSING_SEARCH_PAGE_SIZE must be greater than zero");
            }
            config.page_size = page_size;
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "HOUSING_SEARCH_FETCH_TIMEOUT_SECS")? {
            config.fetch_timeout = Duration::from_secs(secs);
        }
        if let Some(ms) = parse_var::<u64>(&lookup, "HOUSING_SEARCH_AUTOSAVE_DEBOUNCE_MS")? {
            config.auto_save.debounce = Duration::from_millis(ms);
        }
        if let Some(threshold) = parse_var::<usize>(&lookup, "HOUSING_SEARCH_AUTOSAVE_THRESHOLD")? {
            config.auto_save.threshold = threshold;
        }

        Ok(config)
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(key) {
        Some(raw) => {
            let value = raw
                .trim()
                .parse::<T>()
                .with_context(|| format!("Invalid value for {}: {:?}", key, raw))?;
            Ok(Some(value))
        }
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = SearchConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.page_size, 12);
        assert_eq!(config.fetch_timeout, Duration::from_secs(10));
        assert_eq!(config.auto_save.debounce, Duration::from_millis(2000));
        assert_eq!(config.auto_save.threshold, 3);
    }

    #[test]
    fn test_overrides() {
        let config = SearchConfig::from_lookup(lookup(&[
            ("HOUSING_SEARCH_PAGE_SIZE", "24"),
            ("HOUSING_SEARCH_AUTOSAVE_DEBOUNCE_MS", " 500 "),
        ]))
        .unwrap();
        assert_eq!(config.page_size, 24);
        assert_eq!(config.auto_save.debounce, Duration::from_millis(500));
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(SearchConfig::from_lookup(lookup(&[("HOUSING_SEARCH_PAGE_SIZE", "0")])).is_err());
        let err = SearchConfig::from_lookup(lookup(&[("HOUSING_SEARCH_FETCH_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("HOUSING_SEARCH_FETCH_TIMEOUT_SECS"));
    }
}
