use crate::filters::{to_persistable, FilterCriteria};
use crate::search::traits::SearchPersistence;
use crate::search::types::{Notification, NotificationKind, NotificationSettings};
use anyhow::{bail, Result};
use std::sync::Arc;
use tracing::{info, warn};

/// User-initiated "save this search" with alert preferences
pub struct SavedSearches {
    persistence: Arc<dyn SearchPersistence>,
}

impl SavedSearches {
    pub fn new(persistence: Arc<dyn SearchPersistence>) -> Self {
        Self { persistence }
    }

    /// Store the criteria under `name` and describe the outcome for the user.
    ///
    /// A blank name is a caller error; a refused save is reported as a failure notification.
    pub async fn save(
        &self,
        name: &str,
        criteria: &FilterCriteria,
        settings: NotificationSettings,
    ) -> Result<Notification> {
        let name = name.trim();
        if name.is_empty() {
            bail!("Search name cannot be empty");
        }

        let payload = to_persistable(criteria);
        if self
            .persistence
            .create_named_search(name, &payload, &settings)
            .await
        {
            info!("Saved search {:?}", name);
            Ok(Notification {
                kind: NotificationKind::Success,
                title: "Search saved".to_string(),
                message: format!("We'll let you know when new listings match \"{}\".", name),
            })
        } else {
            warn!("Saving search {:?} failed", name);
            Ok(Notification {
                kind: NotificationKind::Failure,
                title: "Couldn't save search".to_string(),
                message: "Something went wrong saving your search. Please try again.".to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filters::FilterUpdate;
    use crate::search::testing::RecordingPersistence;
    use crate::search::types::AlertFrequency;

    fn criteria() -> FilterCriteria {
        let mut criteria = FilterCriteria::default();
        criteria.apply(FilterUpdate::Cities(vec!["Toronto".into(), "Mississauga".into()]));
        criteria
    }

    #[tokio::test]
    async fn test_save_success() {
        let persistence = Arc::new(RecordingPersistence::new());
        let saved = SavedSearches::new(persistence.clone());
        let settings = NotificationSettings {
            email_alerts: true,
            push_alerts: true,
            frequency: AlertFrequency::Instant,
        };

        let note = saved.save("  GTA condos ", &criteria(), settings.clone()).await.unwrap();
        assert_eq!(note.kind, NotificationKind::Success);
        assert!(note.message.contains("GTA condos"));

        let named = persistence.named();
        assert_eq!(named.len(), 1);
        assert_eq!(named[0].0, "GTA condos");
        assert_eq!(named[0].1.location.as_deref(), Some("Toronto, Mississauga"));
        assert_eq!(named[0].2, settings);
    }

    #[tokio::test]
    async fn test_save_failure_is_reported() {
        let persistence = Arc::new(RecordingPersistence::new());
        persistence.set_succeed(false);
        let saved = SavedSearches::new(persistence.clone());

        let note = saved
            .save("Downtown", &criteria(), NotificationSettings::default())
            .await
            .unwrap();
        assert_eq!(note.kind, NotificationKind::Failure);
    }

    #[tokio::test]
    async fn test_blank_name_rejected() {
        let persistence = Arc::new(RecordingPersistence::new());
        let saved = SavedSearches::new(persistence.clone());

        assert!(saved
            .save("   ", &criteria(), NotificationSettings::default())
            .await
            .is_err());
        assert!(persistence.named().is_empty());
    }
}
