pub mod chips;
pub mod criteria;
pub mod store;

pub use chips::{canonical_key, to_persistable, ChipValue, FilterChip, PersistableCriteria};
pub use criteria::{FilterCriteria, FilterField, FilterUpdate, Range, DEFAULT_STATUS};
pub use store::FilterStore;
