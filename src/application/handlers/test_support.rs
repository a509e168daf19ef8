//! Shared fixtures for handler tests: in-memory adapters and a seeded SOP.

use std::sync::Arc;

use crate::adapters::{InMemoryEventBus, InMemorySopRepository, InMemoryWorkSessionRepository};
use crate::domain::foundation::{Actor, CommandMetadata, StepId, UserId, WorkSessionId};
use crate::domain::sop::{HazardSeverity, Sop};
use crate::domain::work_session::WorkSession;
use crate::ports::{SopRepository, WorkSessionRepository};

pub(crate) fn worker() -> UserId {
    UserId::new("worker-1").unwrap()
}

pub(crate) fn other_worker() -> UserId {
    UserId::new("worker-2").unwrap()
}

pub(crate) fn supervisor() -> UserId {
    UserId::new("supervisor-1").unwrap()
}

pub(crate) fn as_worker() -> CommandMetadata {
    CommandMetadata::new(Actor::worker(worker())).with_correlation_id("test-correlation")
}

pub(crate) fn as_other_worker() -> CommandMetadata {
    CommandMetadata::new(Actor::worker(other_worker()))
}

pub(crate) fn as_supervisor() -> CommandMetadata {
    CommandMetadata::new(Actor::supervisor(supervisor()))
}

/// Two tasks, three steps: "Isolate" [close inlet, close outlet], "Drain" [open drain].
pub(crate) fn pump_sop() -> (Sop, Vec<StepId>) {
    let mut sop = Sop::new("Pump maintenance", UserId::new("author").unwrap()).unwrap();
    let isolate = sop.add_task("Isolate", Some("Isolate the pump".into())).unwrap();
    let inlet = isolate
        .add_step(
            "Close inlet valve",
            Some("Turn handle clockwise".into()),
            Some("Handle perpendicular to pipe".into()),
        )
        .unwrap();
    inlet
        .add_hazard("Pressurised line", HazardSeverity::High, Some("Wear face shield".into()))
        .unwrap();
    let s1 = *inlet.id();
    let s2 = *isolate.add_step("Close outlet valve", None, None).unwrap().id();
    let drain = sop.add_task("Drain", None).unwrap();
    let s3 = *drain.add_step("Open drain", None, None).unwrap().id();
    (sop, vec![s1, s2, s3])
}

pub(crate) struct Harness {
    pub sessions: Arc<InMemoryWorkSessionRepository>,
    pub sops: Arc<InMemorySopRepository>,
    pub events: Arc<InMemoryEventBus>,
    pub sop: Sop,
    pub steps: Vec<StepId>,
}

impl Harness {
    pub async fn new() -> Self {
        let (sop, steps) = pump_sop();
        let sops = Arc::new(InMemorySopRepository::new());
        sops.save(&sop).await.unwrap();
        Self {
            sessions: Arc::new(InMemoryWorkSessionRepository::new()),
            sops,
            events: Arc::new(InMemoryEventBus::new()),
            sop,
            steps,
        }
    }

    /// Stores a session for `worker()` after applying `setup` to it.
    pub async fn session_with<F>(&self, setup: F) -> WorkSession
    where
        F: FnOnce(&mut WorkSession),
    {
        let mut session = WorkSession::start(&self.sop, worker()).unwrap();
        setup(&mut session);
        self.sessions.save(&session).await.unwrap()
    }

    pub async fn started_session(&self) -> WorkSession {
        self.session_with(|_| {}).await
    }

    pub async fn completed_session(&self) -> WorkSession {
        self.session_with(|s| s.complete().unwrap()).await
    }

    pub async fn reload(&self, id: &WorkSessionId) -> WorkSession {
        self.sessions.get_by_id(id).await.unwrap().unwrap()
    }
}
