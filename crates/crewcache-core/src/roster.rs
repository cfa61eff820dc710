//! Roster service: the seam between the repository and a presentation
//! layer.
//!
//! `RosterService` owns the sorted projection and decides what happens
//! to each fetch outcome: successful batches are applied to the
//! projection and their incremental diffs broadcast to subscribers,
//! failures go to the alert sink exactly once. Both effects are
//! dispatched onto the affinity context, so projection writes stay
//! serialized and observers hear about changes on the context a UI
//! expects.

use std::sync::{Arc, Mutex};

use tokio::sync::{broadcast, watch};
use tracing::{debug, info};

use crate::alerts::AlertSink;
use crate::models::{CrewDetail, CrewMember};
use crate::projection::{CrewProjection, RosterChange};
use crate::repository::CrewRepository;
use crate::sched::Scheduler;

/// Buffer size for the change broadcast.
/// A refresh produces one batch; 32 leaves room for slow subscribers.
const CHANGE_CHANNEL_CAPACITY: usize = 32;

pub struct RosterService {
    sched: Scheduler,
    repo: Arc<CrewRepository>,
    alerts: Arc<dyn AlertSink>,
    projection: Arc<Mutex<CrewProjection>>,
    changes_tx: broadcast::Sender<Vec<RosterChange>>,
}

impl RosterService {
    pub fn new(sched: Scheduler, repo: Arc<CrewRepository>, alerts: Arc<dyn AlertSink>) -> Self {
        let (changes_tx, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Self {
            sched,
            repo,
            alerts,
            projection: Arc::new(Mutex::new(CrewProjection::new())),
            changes_tx,
        }
    }

    /// Subscribe to incremental roster changes. Each received batch is
    /// the diff of one applied fetch, in application order.
    pub fn subscribe(&self) -> broadcast::Receiver<Vec<RosterChange>> {
        self.changes_tx.subscribe()
    }

    /// Observable busy flag of the underlying repository.
    pub fn busy_changes(&self) -> watch::Receiver<bool> {
        self.repo.busy_changes()
    }

    pub fn is_busy(&self) -> bool {
        self.repo.is_busy()
    }

    /// Owned copy of the current ordered view.
    pub fn snapshot(&self) -> Vec<CrewMember> {
        self.projection
            .lock()
            .expect("crew projection lock poisoned")
            .snapshot()
    }

    /// Biography projection for one member, if present.
    pub fn detail(&self, id: &str) -> Option<CrewDetail> {
        self.projection
            .lock()
            .expect("crew projection lock poisoned")
            .get(id)
            .map(CrewDetail::from)
    }

    /// Fetch the roster and route the outcome: apply-and-broadcast on
    /// success, a single alert notification on failure. Both are
    /// delivered via the affinity context.
    pub async fn load(&self, force_refresh: bool) {
        info!(force_refresh, "Roster load starting");
        match self.repo.get_crew(force_refresh).await {
            Ok(crew) => {
                let projection = Arc::clone(&self.projection);
                let changes_tx = self.changes_tx.clone();
                self.sched.on_affinity(move || {
                    let changes = projection
                        .lock()
                        .expect("crew projection lock poisoned")
                        .apply_batch(crew);
                    if changes.is_empty() {
                        debug!("Roster unchanged after load");
                    } else if changes_tx.send(changes).is_err() {
                        debug!("No roster subscribers, dropping change batch");
                    }
                });
            }
            Err(error) => {
                let alerts = Arc::clone(&self.alerts);
                self.sched.on_affinity(move || alerts.notify(&error));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use async_trait::async_trait;
    use tokio::runtime::Handle;

    use crate::api::{ApiError, CrewApi};
    use crate::cache::MemoryStore;
    use crate::error::{CrewError, ErrorKind};
    use crate::sched::AffinityQueue;

    const TWO_MEMBER_PAYLOAD: &str = r#"[
        {
            "name": "Zed Example",
            "agency": "NASA",
            "image": "https://example.com/zed.png",
            "wikipedia": "https://example.com/zed",
            "launches": [],
            "status": "active",
            "id": "1"
        },
        {
            "name": "Ann Example",
            "agency": "ESA",
            "image": "https://example.com/ann.png",
            "wikipedia": "https://example.com/ann",
            "launches": [],
            "status": "retired",
            "id": "2"
        }
    ]"#;

    /// Remote stub: a canned payload, or a canned protocol failure.
    struct CannedApi {
        payload: Option<String>,
    }

    #[async_trait]
    impl CrewApi for CannedApi {
        async fn fetch_all(&self) -> Result<String, ApiError> {
            match &self.payload {
                Some(payload) => Ok(payload.clone()),
                None => Err(ApiError::from_status(
                    reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    "down for maintenance",
                )),
            }
        }
    }

    #[derive(Default)]
    struct RecordingAlerts {
        errors: Mutex<Vec<CrewError>>,
    }

    impl AlertSink for RecordingAlerts {
        fn notify(&self, error: &CrewError) {
            self.errors.lock().unwrap().push(error.clone());
        }
    }

    fn service(
        payload: Option<&str>,
    ) -> (RosterService, AffinityQueue, Arc<RecordingAlerts>) {
        let (sched, queue) = Scheduler::new(Handle::current());
        let api = Arc::new(CannedApi {
            payload: payload.map(str::to_string),
        });
        let repo = Arc::new(CrewRepository::new(
            sched.clone(),
            api,
            Arc::new(MemoryStore::new()),
        ));
        let alerts = Arc::new(RecordingAlerts::default());
        (
            RosterService::new(sched, repo, alerts.clone()),
            queue,
            alerts,
        )
    }

    #[tokio::test]
    async fn test_load_applies_batch_and_broadcasts_diff() {
        let (service, mut queue, alerts) = service(Some(TWO_MEMBER_PAYLOAD));
        let mut changes_rx = service.subscribe();

        service.load(false).await;
        queue.drain();

        let changes = changes_rx.try_recv().expect("diff broadcast");
        assert_eq!(changes.len(), 2);

        let names: Vec<String> = service.snapshot().iter().map(|m| m.name.clone()).collect();
        assert_eq!(names, vec!["Ann Example", "Zed Example"]);
        assert!(alerts.errors.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unchanged_reload_broadcasts_nothing() {
        let (service, mut queue, _alerts) = service(Some(TWO_MEMBER_PAYLOAD));
        let mut changes_rx = service.subscribe();

        service.load(false).await;
        queue.drain();
        changes_rx.try_recv().expect("first diff");

        // Second load serves the cached payload; the projection is
        // already identical, so no diff goes out.
        service.load(false).await;
        queue.drain();
        assert!(changes_rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_failed_load_notifies_exactly_once() {
        let (service, mut queue, alerts) = service(None);

        service.load(false).await;
        queue.drain();

        let errors = alerts.errors.lock().unwrap();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].kind(), ErrorKind::Network);
        assert!(service.snapshot().is_empty());
    }

    #[tokio::test]
    async fn test_detail_projects_member_fields() {
        let (service, mut queue, _alerts) = service(Some(TWO_MEMBER_PAYLOAD));
        service.load(false).await;
        queue.drain();

        let detail = service.detail("2").expect("member present");
        assert_eq!(detail.name, "Ann Example");
        assert!(service.detail("missing").is_none());
    }
}
