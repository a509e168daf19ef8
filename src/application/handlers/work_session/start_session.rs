//! StartSessionHandler - Command handler for starting a work session.
//!
//! A worker may run one in-progress session at a time. On success a
//! spoken welcome clip is generated on a best-effort basis; failing to
//! produce it never fails the start.

use std::sync::Arc;
use std::time::Duration;

use crate::application::handlers::common::{bounded, publish};
use crate::domain::foundation::{CommandMetadata, EventId, SopId, WorkSessionId};
use crate::domain::sop::Sop;
use crate::domain::work_session::{WorkSession, WorkSessionError, WorkSessionStarted};
use crate::ports::{
    AudioKind, EventPublisher, FeedbackAudioStore, SopRepository, TextToSpeech,
    WorkSessionRepository,
};

/// Command to start a session on an SOP for the calling worker.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub sop_id: SopId,
}

/// Result of successfully starting a session.
#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub session: WorkSession,
    pub event: WorkSessionStarted,
    /// `None` when no speech collaborator is configured or synthesis failed.
    pub welcome_audio_url: Option<String>,
}

struct WelcomeAudio {
    tts: Arc<dyn TextToSpeech>,
    store: Arc<dyn FeedbackAudioStore>,
    timeout: Duration,
}

/// Handler for starting work sessions.
pub struct StartSessionHandler {
    sessions: Arc<dyn WorkSessionRepository>,
    sops: Arc<dyn SopRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    welcome_audio: Option<WelcomeAudio>,
}

impl StartSessionHandler {
    pub fn new(
        sessions: Arc<dyn WorkSessionRepository>,
        sops: Arc<dyn SopRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            sessions,
            sops,
            event_publisher,
            welcome_audio: None,
        }
    }

    /// Enables the spoken welcome clip.
    pub fn with_welcome_audio(
        mut self,
        tts: Arc<dyn TextToSpeech>,
        store: Arc<dyn FeedbackAudioStore>,
        timeout: Duration,
    ) -> Self {
        self.welcome_audio = Some(WelcomeAudio {
            tts,
            store,
            timeout,
        });
        self
    }

    pub async fn handle(
        &self,
        cmd: StartSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<StartSessionResult, WorkSessionError> {
        // 1. Load the SOP; a soft-deleted SOP cannot be started
        let sop = self
            .sops
            .get_by_id(&cmd.sop_id)
            .await?
            .filter(|sop| !sop.is_deleted())
            .ok_or(WorkSessionError::SopNotFound(cmd.sop_id))?;

        // 2. Create the session (validates SOP structure)
        let worker_id = metadata.user_id().clone();
        let session = WorkSession::start(&sop, worker_id.clone())?;

        // 3. One in-progress session per worker; the repository holds the
        //    rule against a racing start and answers `Conflict`
        if let Some(active) = self.sessions.get_current_for_worker(&worker_id).await? {
            return Err(WorkSessionError::invalid_state(format!(
                "Worker already has an active session: {}",
                active.id()
            )));
        }

        // 4. Persist
        let session = self.sessions.save(&session).await?;

        // 5. Publish event
        let event = WorkSessionStarted {
            event_id: EventId::new(),
            session_id: *session.id(),
            sop_id: cmd.sop_id,
            worker_id,
            first_step_id: session.current_step_id().copied(),
            started_at: *session.started_at(),
        };
        publish(self.event_publisher.as_ref(), &event, &metadata).await?;

        tracing::info!(
            session_id = %session.id(),
            sop_id = %cmd.sop_id,
            worker_id = %event.worker_id,
            "work session started"
        );

        // 6. Best-effort welcome audio
        let welcome_audio_url = match &self.welcome_audio {
            Some(audio) => audio.generate(session.id(), &sop).await,
            None => None,
        };

        Ok(StartSessionResult {
            session,
            event,
            welcome_audio_url,
        })
    }
}

impl WelcomeAudio {
    async fn generate(&self, session_id: &WorkSessionId, sop: &Sop) -> Option<String> {
        let text = welcome_message(sop)?;
        let outcome = async {
            let audio = bounded("welcome speech", self.timeout, self.tts.synthesize(&text)).await?;
            bounded(
                "welcome audio storage",
                self.timeout,
                self.store.store(session_id, AudioKind::Welcome, &audio),
            )
            .await
        }
        .await;

        match outcome {
            Ok(url) => Some(url),
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "welcome audio skipped");
                None
            }
        }
    }
}

/// Spoken greeting naming the first task, the step count and the first step.
fn welcome_message(sop: &Sop) -> Option<String> {
    let (task, step) = sop.steps().next()?;
    Some(format!(
        "こんにちは！{}を開始します。\n\n\
         今日の作業は{}ステップあります。\n\
         最初のステップは「{}」です。\n\n\
         準備ができたら、「ヨシッ！」ボタンを押して確認を始めてください。\n\
         安全作業、よろしくお願いします！",
        task.title(),
        sop.total_steps(),
        step.description()
    ))
}
