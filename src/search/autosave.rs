use crate::config::AutoSaveConfig;
use crate::filters::{to_persistable, FilterCriteria};
use crate::search::traits::SearchPersistence;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::{debug, info, warn};

/// Debounced background saving of a search once enough refinements are active
pub struct AutoSaveScheduler {
    persistence: Arc<dyn SearchPersistence>,
    config: AutoSaveConfig,
}

/// Running scheduler. Dropping it cancels any pending save.
pub struct AutoSaveHandle {
    task: JoinHandle<()>,
}

impl AutoSaveHandle {
    /// Stop watching; a pending timer is discarded without saving
    pub fn cancel(self) {}

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for AutoSaveHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

impl AutoSaveScheduler {
    pub fn new(persistence: Arc<dyn SearchPersistence>, config: AutoSaveConfig) -> Self {
        Self {
            persistence,
            config,
        }
    }

    /// Whether a change in this situation should (re)start the timer
    pub fn should_arm(&self, authenticated: bool, criteria: &FilterCriteria) -> bool {
        authenticated && criteria.active_filter_count() >= self.config.threshold
    }

    /// Start watching the filter and sign-in streams
    pub fn spawn(
        self,
        criteria: watch::Receiver<FilterCriteria>,
        authenticated: watch::Receiver<bool>,
    ) -> AutoSaveHandle {
        AutoSaveHandle {
            task: tokio::spawn(self.run(criteria, authenticated)),
        }
    }

    async fn run(
        self,
        mut criteria: watch::Receiver<FilterCriteria>,
        mut authenticated: watch::Receiver<bool>,
    ) {
        let mut deadline: Option<Instant> = None;

        loop {
            tokio::select! {
                changed = criteria.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let armed = self.should_arm(*authenticated.borrow(), &criteria.borrow_and_update());
                    deadline = self.reschedule(deadline, armed);
                }
                changed = authenticated.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    let signed_in = *authenticated.borrow_and_update();
                    let armed = self.should_arm(signed_in, &criteria.borrow());
                    deadline = self.reschedule(deadline, armed);
                }
                _ = wait_until(deadline) => {
                    deadline = None;
                    self.fire(&criteria.borrow());
                }
            }
        }

        if deadline.is_some() {
            debug!("Auto-save watcher stopped; pending save dropped");
        }
    }

    fn reschedule(&self, pending: Option<Instant>, armed: bool) -> Option<Instant> {
        match (pending.is_some(), armed) {
            (_, true) => {
                debug!("Auto-save timer (re)started: {:?}", self.config.debounce);
                Some(Instant::now() + self.config.debounce)
            }
            (true, false) => {
                debug!("Auto-save timer cancelled");
                None
            }
            (false, false) => None,
        }
    }

    fn fire(&self, criteria: &FilterCriteria) {
        let snapshot = to_persistable(criteria);
        let persistence = Arc::clone(&self.persistence);
        info!(
            "Auto-saving search with {} active filters",
            criteria.active_filter_count()
        );
        tokio::spawn(async move {
            if persistence.auto_save(&snapshot).await {
                info!("Search auto-saved");
            } else {
                warn!("Auto-save was not accepted");
            }
        });
    }
}

async fn wait_until(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
