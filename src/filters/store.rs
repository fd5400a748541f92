use crate::filters::chips::{self, FilterChip, PersistableCriteria};
use crate::filters::criteria::{FilterCriteria, FilterField, FilterUpdate, DEFAULT_STATUS};
use tokio::sync::watch;
use tracing::debug;

/// Owner of the canonical [`FilterCriteria`] for one search session.
///
/// Every mutation is applied under the channel's write lock, so subscribers
/// only ever observe whole updates. Edits that leave the criteria unchanged
/// are not published.
pub struct FilterStore {
    criteria: watch::Sender<FilterCriteria>,
}

impl Default for FilterStore {
    fn default() -> Self {
        Self::new(FilterCriteria::default())
    }
}

impl FilterStore {
    pub fn new(initial: FilterCriteria) -> Self {
        let (criteria, _) = watch::channel(initial);
        Self { criteria }
    }

    /// Receiver that is notified after every effective mutation
    pub fn subscribe(&self) -> watch::Receiver<FilterCriteria> {
        self.criteria.subscribe()
    }

    /// Owned copy of the current criteria
    pub fn snapshot(&self) -> FilterCriteria {
        self.criteria.borrow().clone()
    }

    /// Replace one field's value wholesale
    pub fn update(&self, update: FilterUpdate) {
        debug!("Filter update: {:?}", update);
        self.mutate(|criteria| criteria.apply(update));
    }

    /// Remove one value from a set-valued field, or clear the field.
    ///
    /// Removing `status` restores the default scope rather than leaving the search unscoped.
    pub fn remove(&self, field: FilterField, value: Option<&str>) {
        debug!("Filter remove: {} {:?}", field, value);
        self.mutate(|criteria| {
            if field == FilterField::Status {
                criteria.status = Some(DEFAULT_STATUS.to_string());
            } else {
                criteria.remove(field, value);
            }
        });
    }

    /// Undo the refinement a chip represents
    pub fn remove_chip(&self, chip: &FilterChip) {
        let value = if chip.category.is_set_valued() {
            chip.value.as_text()
        } else {
            None
        };
        self.remove(chip.category, value);
    }

    /// Add a quick-filter tag at the end of the selection, or drop it if already selected
    pub fn toggle_quick_filter(&self, tag: &str) {
        self.mutate(|criteria| {
            match criteria.quick_filters.iter().position(|t| t == tag) {
                Some(pos) => {
                    criteria.quick_filters.remove(pos);
                }
                None => criteria.quick_filters.push(tag.to_string()),
            }
        });
    }

    /// Clear every refinement; the status scope is kept
    pub fn clear(&self) {
        debug!("Clearing all filters");
        self.mutate(FilterCriteria::clear);
    }

    pub fn active_filter_count(&self) -> usize {
        self.criteria.borrow().active_filter_count()
    }

    pub fn chips(&self) -> Vec<FilterChip> {
        chips::chips(&self.criteria.borrow())
    }

    pub fn persistable(&self) -> PersistableCriteria {
        chips::to_persistable(&self.criteria.borrow())
    }

    /// Apply `edit` and notify subscribers only if the criteria actually changed
    fn mutate(&self, edit: impl FnOnce(&mut FilterCriteria)) -> bool {
        self.criteria.send_if_modified(|criteria| {
            let before = criteria.clone();
            edit(criteria);
            *criteria != before
        })
    }
}
