//! Search filter and pagination synchronization for a property-search front end.
//!
//! A [`filters::FilterStore`] owns the user's refinements. A
//! [`search::PaginationController`] and an [`search::AutoSaveScheduler`] each
//! subscribe to it independently: the controller re-pages to 1 and refetches
//! when the criteria change by value, the scheduler debounces an automatic save.

pub mod config;
pub mod filters;
pub mod models;
pub mod search;
