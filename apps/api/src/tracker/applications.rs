//! Application tracker — a pure state container over the key-value store.
//!
//! Each user's tracked applications serialize as one JSON list under a fixed
//! storage identifier, mirroring the résumé text entry. No transition
//! validation: status is a direct overwrite driven by explicit user action.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, warn};

use crate::models::application::{Application, ApplicationStatus, InterviewBriefing};
use crate::models::job::JobListing;
use crate::tracker::store::{KeyValueStore, StoreError};

/// Fixed storage identifiers, one namespace per user. No expiry.
pub const MISSIONS_KEY_PREFIX: &str = "missions";
pub const RESUME_KEY_PREFIX: &str = "resume";

const DEFAULT_NOTE: &str = "Auto-tracked via Agent.";

#[derive(Clone)]
pub struct ApplicationTracker {
    store: Arc<dyn KeyValueStore>,
}

impl ApplicationTracker {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    fn missions_key(user: &str) -> String {
        format!("{MISSIONS_KEY_PREFIX}:{user}")
    }

    fn resume_key(user: &str) -> String {
        format!("{RESUME_KEY_PREFIX}:{user}")
    }

    pub async fn list(&self, user: &str) -> Result<Vec<Application>, StoreError> {
        match self.store.get(&Self::missions_key(user)).await? {
            Some(json) => match serde_json::from_str(&json) {
                Ok(apps) => Ok(apps),
                Err(e) => {
                    // Corrupt stored state is unrecoverable; the next save
                    // overwrites it. Make the data loss observable.
                    warn!(user, "Discarding unreadable application list: {e}");
                    Ok(Vec::new())
                }
            },
            None => Ok(Vec::new()),
        }
    }

    async fn save(&self, user: &str, apps: &[Application]) -> Result<(), StoreError> {
        let json = serde_json::to_string(apps)?;
        self.store.put(&Self::missions_key(user), &json).await
    }

    /// Adds a job to the tracked list, newest first. Deduped by job id: a
    /// second add of the same job is a no-op.
    pub async fn add(&self, user: &str, job: JobListing) -> Result<Application, StoreError> {
        let mut apps = self.list(user).await?;
        if let Some(existing) = apps.iter().find(|a| a.job.job_id == job.job_id) {
            return Ok(existing.clone());
        }

        let app = Application {
            job,
            status: ApplicationStatus::Applied,
            applied_date: Utc::now().format("%-m/%-d/%Y").to_string(),
            notes: DEFAULT_NOTE.to_string(),
            briefing: None,
        };
        debug!(job_id = %app.job.job_id, "Tracking new application");
        apps.insert(0, app.clone());
        self.save(user, &apps).await?;
        Ok(app)
    }

    /// Direct status overwrite. Returns the updated application, or `None`
    /// if the job is not tracked.
    pub async fn update_status(
        &self,
        user: &str,
        job_id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<Application>, StoreError> {
        let mut apps = self.list(user).await?;
        let updated = apps.iter_mut().find(|a| a.job.job_id == job_id).map(|app| {
            app.status = status;
            app.clone()
        });
        if updated.is_some() {
            self.save(user, &apps).await?;
        }
        Ok(updated)
    }

    /// Removes a tracked application. Returns whether anything was deleted.
    pub async fn delete(&self, user: &str, job_id: &str) -> Result<bool, StoreError> {
        let mut apps = self.list(user).await?;
        let before = apps.len();
        apps.retain(|a| a.job.job_id != job_id);
        let removed = apps.len() != before;
        if removed {
            self.save(user, &apps).await?;
        }
        Ok(removed)
    }

    pub async fn find(&self, user: &str, job_id: &str) -> Result<Option<Application>, StoreError> {
        Ok(self
            .list(user)
            .await?
            .into_iter()
            .find(|a| a.job.job_id == job_id))
    }

    /// Stores a generated briefing on the application so repeat requests
    /// return the cached copy instead of regenerating.
    pub async fn attach_briefing(
        &self,
        user: &str,
        job_id: &str,
        briefing: InterviewBriefing,
    ) -> Result<(), StoreError> {
        let mut apps = self.list(user).await?;
        if let Some(app) = apps.iter_mut().find(|a| a.job.job_id == job_id) {
            app.briefing = Some(briefing);
            self.save(user, &apps).await?;
        }
        Ok(())
    }

    pub async fn resume_text(&self, user: &str) -> Result<Option<String>, StoreError> {
        self.store.get(&Self::resume_key(user)).await
    }

    pub async fn set_resume_text(&self, user: &str, text: &str) -> Result<(), StoreError> {
        self.store.put(&Self::resume_key(user), text).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::application::BriefingQuestion;
    use crate::tracker::store::MemoryStore;

    fn tracker() -> ApplicationTracker {
        ApplicationTracker::new(Arc::new(MemoryStore::new()))
    }

    fn listing(id: &str) -> JobListing {
        JobListing {
            job_id: id.to_string(),
            employer_name: "Acme".to_string(),
            job_title: "Engineer".to_string(),
            job_description: "Build things.".to_string(),
            job_apply_link: None,
            job_city: None,
            job_country: None,
            job_posted_at_datetime_utc: None,
        }
    }

    fn briefing() -> InterviewBriefing {
        InterviewBriefing {
            questions: vec![BriefingQuestion {
                q: "Tell me about a failure.".to_string(),
                why: "Resilience probe".to_string(),
                answer: "The cache migration postmortem.".to_string(),
            }],
            red_flags: vec!["Short tenure at Acme".to_string()],
            questions_to_ask_them: vec!["What does on-call look like?".to_string()],
        }
    }

    #[tokio::test]
    async fn test_add_dedupes_by_job_id() {
        let tracker = tracker();
        tracker.add("u1", listing("j1")).await.unwrap();
        tracker.add("u1", listing("j1")).await.unwrap();
        tracker.add("u1", listing("j2")).await.unwrap();

        let apps = tracker.list("u1").await.unwrap();
        assert_eq!(apps.len(), 2);
        // Newest first.
        assert_eq!(apps[0].job.job_id, "j2");
        assert_eq!(apps[0].status, ApplicationStatus::Applied);
        assert_eq!(apps[0].notes, DEFAULT_NOTE);
    }

    #[tokio::test]
    async fn test_users_are_isolated() {
        let tracker = tracker();
        tracker.add("u1", listing("j1")).await.unwrap();
        assert!(tracker.list("u2").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_status_is_a_direct_overwrite() {
        let tracker = tracker();
        tracker.add("u1", listing("j1")).await.unwrap();

        let app = tracker
            .update_status("u1", "j1", ApplicationStatus::Interview)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.status, ApplicationStatus::Interview);

        // Any state is reachable, including "backwards".
        let app = tracker
            .update_status("u1", "j1", ApplicationStatus::Rejected)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(app.status, ApplicationStatus::Rejected);

        assert!(tracker
            .update_status("u1", "missing", ApplicationStatus::Offer)
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_delete_removes_only_target() {
        let tracker = tracker();
        tracker.add("u1", listing("j1")).await.unwrap();
        tracker.add("u1", listing("j2")).await.unwrap();

        assert!(tracker.delete("u1", "j1").await.unwrap());
        assert!(!tracker.delete("u1", "j1").await.unwrap());

        let apps = tracker.list("u1").await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].job.job_id, "j2");
    }

    #[tokio::test]
    async fn test_briefing_attach_and_cached_read() {
        let tracker = tracker();
        tracker.add("u1", listing("j1")).await.unwrap();
        assert!(tracker.find("u1", "j1").await.unwrap().unwrap().briefing.is_none());

        tracker.attach_briefing("u1", "j1", briefing()).await.unwrap();

        let first = tracker.find("u1", "j1").await.unwrap().unwrap().briefing.unwrap();
        let second = tracker.find("u1", "j1").await.unwrap().unwrap().briefing.unwrap();
        assert_eq!(first, second);
        assert_eq!(first, briefing());
    }

    #[tokio::test]
    async fn test_corrupt_stored_list_reads_as_empty_and_recovers() {
        let store = Arc::new(MemoryStore::new());
        let tracker = ApplicationTracker::new(store.clone());

        store
            .put("missions:u1", "{not valid json")
            .await
            .unwrap();

        // Unreadable state is dropped, not an error.
        assert!(tracker.list("u1").await.unwrap().is_empty());

        // And the tracker keeps working: the next add overwrites it.
        tracker.add("u1", listing("j1")).await.unwrap();
        let apps = tracker.list("u1").await.unwrap();
        assert_eq!(apps.len(), 1);
        assert_eq!(apps[0].job.job_id, "j1");
    }

    #[tokio::test]
    async fn test_resume_text_round_trip() {
        let tracker = tracker();
        assert!(tracker.resume_text("u1").await.unwrap().is_none());
        tracker.set_resume_text("u1", "ten years of Rust").await.unwrap();
        assert_eq!(
            tracker.resume_text("u1").await.unwrap().as_deref(),
            Some("ten years of Rust")
        );
    }
}
