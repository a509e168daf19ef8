//! ExecuteCheckHandler - Command handler for the "ヨシッ!" safety check.
//!
//! One check runs transcription, judging and speech synthesis before
//! anything is written. The session is saved once, at the end, so a failed
//! or timed-out external call leaves it exactly as it was.

use std::sync::Arc;
use std::time::Duration;

use super::prompt::verification_prompt;
use crate::application::handlers::common::{bounded, envelope, load_session};
use crate::domain::foundation::{CommandMetadata, EventId, StepId, Timestamp, WorkSessionId};
use crate::domain::sop::Sop;
use crate::domain::work_session::{
    CheckSubmission, SafetyCheck, SafetyCheckRecorded, WorkSession, WorkSessionCompleted,
    WorkSessionError,
};
use crate::ports::{
    AudioKind, EventPublisher, FeedbackAudioStore, JudgeRequest, JudgeVerdict, MediaPayload,
    SafetyJudge, SopRepository, SpeechToText, TextToSpeech, WorkSessionRepository,
};

/// How the worker's spoken confirmation is supplied.
#[derive(Debug, Clone)]
pub enum SpokenConfirmation {
    /// A recording still to be transcribed.
    Recording(MediaPayload),
    /// Text already transcribed by the client.
    Transcript(String),
}

/// Command to verify one step with photo and voice evidence.
#[derive(Debug, Clone)]
pub struct ExecuteCheckCommand {
    pub session_id: WorkSessionId,
    pub step_id: StepId,
    pub image: MediaPayload,
    pub confirmation: SpokenConfirmation,
}

/// Result of a recorded safety check.
#[derive(Debug, Clone)]
pub struct ExecuteCheckResult {
    pub session: WorkSession,
    pub check: SafetyCheck,
    pub verdict: JudgeVerdict,
    pub feedback_audio_url: String,
    /// The session's step after the check; `None` once completed.
    pub next_step_id: Option<StepId>,
    pub advanced: bool,
    pub session_completed: bool,
}

/// Tunables for check execution.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSettings {
    /// Deadline applied to each external call separately.
    pub call_timeout: Duration,
    /// Verdicts below this confidence are flagged for supervisor review.
    pub review_confidence_threshold: f64,
    /// Language passed to speech-to-text.
    pub transcription_language: String,
}

impl Default for CheckSettings {
    fn default() -> Self {
        Self {
            call_timeout: Duration::from_secs(60),
            review_confidence_threshold: 0.7,
            transcription_language: "ja".to_string(),
        }
    }
}

/// A check appended to a saved session.
struct RecordedCheck {
    session: WorkSession,
    check: SafetyCheck,
    advanced: bool,
    session_completed: bool,
}

/// AI and storage collaborators used by a check.
#[derive(Clone)]
pub struct CheckServices {
    pub judge: Arc<dyn SafetyJudge>,
    pub speech_to_text: Arc<dyn SpeechToText>,
    pub text_to_speech: Arc<dyn TextToSpeech>,
    pub audio_store: Arc<dyn FeedbackAudioStore>,
}

/// Handler for executing safety checks.
pub struct ExecuteCheckHandler {
    sessions: Arc<dyn WorkSessionRepository>,
    sops: Arc<dyn SopRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    services: CheckServices,
    settings: CheckSettings,
}

impl ExecuteCheckHandler {
    pub fn new(
        sessions: Arc<dyn WorkSessionRepository>,
        sops: Arc<dyn SopRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        services: CheckServices,
    ) -> Self {
        Self {
            sessions,
            sops,
            event_publisher,
            services,
            settings: CheckSettings::default(),
        }
    }

    pub fn with_settings(mut self, settings: CheckSettings) -> Self {
        self.settings = settings;
        self
    }

    pub async fn handle(
        &self,
        cmd: ExecuteCheckCommand,
        metadata: CommandMetadata,
    ) -> Result<ExecuteCheckResult, WorkSessionError> {
        let limit = self.settings.call_timeout;

        // 1. Load session; only its worker may check, and never once locked
        let session = load_session(self.sessions.as_ref(), &cmd.session_id).await?;
        metadata
            .actor
            .require_owner(session.worker_id(), "work session")?;
        if session.is_locked() {
            return Err(WorkSessionError::SessionLocked);
        }
        if cmd.image.is_empty() {
            return Err(WorkSessionError::validation("image", "Image is required"));
        }

        // 2. Locate the step in the session's SOP
        let sop = self
            .sops
            .get_by_id(session.sop_id())
            .await?
            .ok_or(WorkSessionError::SopNotFound(*session.sop_id()))?;
        let location = sop
            .locate_step(&cmd.step_id)
            .ok_or(WorkSessionError::StepNotFound(cmd.step_id))?;

        // 3. Transcribe the spoken confirmation
        let transcript = match &cmd.confirmation {
            SpokenConfirmation::Transcript(text) => text.clone(),
            SpokenConfirmation::Recording(audio) => {
                bounded(
                    "transcription",
                    limit,
                    self.services
                        .speech_to_text
                        .transcribe(audio, &self.settings.transcription_language),
                )
                .await?
            }
        };

        // 4. Judge the evidence against the whole SOP
        let prompt = verification_prompt(&sop, &location, &transcript, &Timestamp::now());
        tracing::debug!(
            session_id = %cmd.session_id,
            task = location.task_number,
            step = location.step_number,
            "requesting safety verdict"
        );
        let verdict = bounded(
            "judging",
            limit,
            self.services
                .judge
                .judge(JudgeRequest::new(prompt, cmd.image, transcript)),
        )
        .await?;
        let needs_review = verdict.needs_review(self.settings.review_confidence_threshold);

        // 5. Speak the feedback back to the worker
        let audio = bounded(
            "speech synthesis",
            limit,
            self.services.text_to_speech.synthesize(&verdict.feedback_text),
        )
        .await?;
        let feedback_audio_url = bounded(
            "feedback audio storage",
            limit,
            self.services
                .audio_store
                .store(&cmd.session_id, AudioKind::Feedback, &audio),
        )
        .await?;

        // 6. Record the check and persist once; a clip left without a check is deleted
        let recorded = match self
            .record(session, &sop, &cmd.step_id, &verdict, needs_review, &feedback_audio_url)
            .await
        {
            Ok(recorded) => recorded,
            Err(e) => {
                self.discard_audio(&feedback_audio_url).await;
                return Err(e);
            }
        };
        let RecordedCheck {
            session,
            check,
            advanced,
            session_completed,
        } = recorded;

        // 7. Publish events
        let next_step_id = session.current_step_id().copied();
        let recorded = SafetyCheckRecorded {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            check_id: *check.id(),
            step_id: cmd.step_id,
            result: check.result(),
            confidence_score: check.confidence_score(),
            needs_review,
            advanced_to: if advanced { next_step_id } else { None },
            session_completed,
            checked_at: *check.checked_at(),
        };
        let mut envelopes = vec![envelope(&recorded, &metadata)?];
        if session_completed {
            let completed = WorkSessionCompleted {
                event_id: EventId::new(),
                session_id: cmd.session_id,
                worker_id: session.worker_id().clone(),
                checks_recorded: session.checks().len(),
                completed_at: session.completed_at().copied().unwrap_or_else(Timestamp::now),
            };
            envelopes.push(envelope(&completed, &metadata)?);
        }
        self.event_publisher.publish_all(envelopes).await?;

        tracing::info!(
            session_id = %cmd.session_id,
            step_id = %cmd.step_id,
            result = %check.result(),
            confidence = verdict.confidence,
            needs_review,
            advanced,
            session_completed,
            "safety check recorded"
        );

        Ok(ExecuteCheckResult {
            session,
            check,
            verdict,
            feedback_audio_url,
            next_step_id,
            advanced,
            session_completed,
        })
    }

    /// Appends the check, advances on an in-sequence pass and saves.
    async fn record(
        &self,
        mut session: WorkSession,
        sop: &Sop,
        step_id: &StepId,
        verdict: &JudgeVerdict,
        needs_review: bool,
        feedback_audio_url: &str,
    ) -> Result<RecordedCheck, WorkSessionError> {
        let submission = CheckSubmission::new(
            *step_id,
            verdict.result.into(),
            verdict.feedback_text.clone(),
        )
        .with_audio_url(feedback_audio_url.to_string())
        .with_confidence(verdict.confidence)
        .flagged_for_review(needs_review);
        let check = session.add_check(submission)?.clone();

        let advanced = verdict.advances_session();
        if advanced {
            session.advance_to_next_step(sop.next_step_id(step_id))?;
        }
        let session_completed = advanced && session.current_step_id().is_none();

        let session = self.sessions.save(&session).await?;
        Ok(RecordedCheck {
            session,
            check,
            advanced,
            session_completed,
        })
    }

    /// Best-effort removal of a clip that no saved check refers to.
    async fn discard_audio(&self, url: &str) {
        let deleted = bounded(
            "feedback audio cleanup",
            self.settings.call_timeout,
            self.services.audio_store.delete(url),
        )
        .await;
        if let Err(e) = deleted {
            tracing::warn!(url, error = %e, "orphaned feedback audio left in storage");
        }
    }
}
