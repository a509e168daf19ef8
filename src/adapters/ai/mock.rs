//! Scripted AI collaborators for tests and offline runs.
//!
//! # Features
//!
//! - Pre-configured verdicts, transcripts and audio (consumed in order)
//! - Simulated delays for timeout testing
//! - Error injection for resilience testing
//! - Call tracking for verification
//!
//! # Example
//!
//! ```ignore
//! let judge = MockSafetyJudge::new()
//!     .with_verdict(MockSafetyJudge::pass(0.95))
//!     .with_delay(Duration::from_millis(100));
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::ports::{
    AIError, JudgeRequest, JudgeVerdict, MediaPayload, SafetyJudge, SpeechToText, TextToSpeech,
    Verdict,
};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

async fn simulate_latency(delay: Duration) {
    if !delay.is_zero() {
        sleep(delay).await;
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MockSafetyJudge
// ════════════════════════════════════════════════════════════════════════════

/// Mock judge returning queued verdicts; a confident pass once the queue is empty.
#[derive(Debug, Clone, Default)]
pub struct MockSafetyJudge {
    responses: Arc<Mutex<VecDeque<Result<JudgeVerdict, AIError>>>>,
    delay: Duration,
    calls: Arc<Mutex<Vec<JudgeRequest>>>,
}

impl MockSafetyJudge {
    pub fn new() -> Self {
        Self::default()
    }

    /// A passing, in-sequence verdict with the given confidence.
    pub fn pass(confidence: f64) -> JudgeVerdict {
        JudgeVerdict {
            result: Verdict::Pass,
            confidence,
            step_sequence_correct: true,
            feedback_text: "しっかり確認できました！".to_string(),
            reasoning: "Evidence matches the expected result".to_string(),
            next_step_hint: None,
        }
    }

    /// A failing verdict with corrective feedback.
    pub fn fail(confidence: f64, feedback: impl Into<String>) -> JudgeVerdict {
        JudgeVerdict {
            result: Verdict::Fail,
            confidence,
            step_sequence_correct: true,
            feedback_text: feedback.into(),
            reasoning: "Evidence contradicts the expected result".to_string(),
            next_step_hint: None,
        }
    }

    pub fn with_verdict(self, verdict: JudgeVerdict) -> Self {
        lock(&self.responses).push_back(Ok(verdict));
        self
    }

    pub fn with_error(self, error: AIError) -> Self {
        lock(&self.responses).push_back(Err(error));
        self
    }

    /// Sets simulated latency per request.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Returns all recorded requests.
    pub fn get_calls(&self) -> Vec<JudgeRequest> {
        lock(&self.calls).clone()
    }
}

#[async_trait]
impl SafetyJudge for MockSafetyJudge {
    async fn judge(&self, request: JudgeRequest) -> Result<JudgeVerdict, AIError> {
        lock(&self.calls).push(request);
        simulate_latency(self.delay).await;
        let next = lock(&self.responses).pop_front();
        next.unwrap_or_else(|| Ok(Self::pass(0.95)))
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MockSpeechToText
// ════════════════════════════════════════════════════════════════════════════

/// Mock transcriber returning a fixed transcript or a fixed error.
#[derive(Debug, Clone)]
pub struct MockSpeechToText {
    outcome: Result<String, AIError>,
    delay: Duration,
    languages: Arc<Mutex<Vec<String>>>,
}

impl Default for MockSpeechToText {
    fn default() -> Self {
        Self::new("バルブ閉ヨシッ！")
    }
}

impl MockSpeechToText {
    pub fn new(transcript: impl Into<String>) -> Self {
        Self {
            outcome: Ok(transcript.into()),
            delay: Duration::ZERO,
            languages: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: AIError) -> Self {
        Self {
            outcome: Err(error),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn call_count(&self) -> usize {
        lock(&self.languages).len()
    }

    /// Languages requested, one per call.
    pub fn requested_languages(&self) -> Vec<String> {
        lock(&self.languages).clone()
    }
}

#[async_trait]
impl SpeechToText for MockSpeechToText {
    async fn transcribe(&self, _audio: &MediaPayload, language: &str) -> Result<String, AIError> {
        lock(&self.languages).push(language.to_string());
        simulate_latency(self.delay).await;
        self.outcome.clone()
    }
}

// ════════════════════════════════════════════════════════════════════════════
// MockTextToSpeech
// ════════════════════════════════════════════════════════════════════════════

/// Mock synthesizer returning fixed bytes or a fixed error.
#[derive(Debug, Clone)]
pub struct MockTextToSpeech {
    outcome: Result<Vec<u8>, AIError>,
    delay: Duration,
    texts: Arc<Mutex<Vec<String>>>,
}

impl Default for MockTextToSpeech {
    fn default() -> Self {
        Self::new(b"ID3-mock-audio".to_vec())
    }
}

impl MockTextToSpeech {
    pub fn new(audio: Vec<u8>) -> Self {
        Self {
            outcome: Ok(audio),
            delay: Duration::ZERO,
            texts: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(error: AIError) -> Self {
        Self {
            outcome: Err(error),
            ..Self::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Texts synthesized so far.
    pub fn spoken_texts(&self) -> Vec<String> {
        lock(&self.texts).clone()
    }
}

#[async_trait]
impl TextToSpeech for MockTextToSpeech {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, AIError> {
        lock(&self.texts).push(text.to_string());
        simulate_latency(self.delay).await;
        self.outcome.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::verdict_schema;

    fn request() -> JudgeRequest {
        JudgeRequest::new(
            "prompt".to_string(),
            MediaPayload::jpeg(vec![0xFF, 0xD8]),
            "ヨシッ".to_string(),
        )
    }

    #[tokio::test]
    async fn judge_returns_queued_responses_in_order() {
        let judge = MockSafetyJudge::new()
            .with_verdict(MockSafetyJudge::fail(0.8, "バルブが開いています"))
            .with_error(AIError::rate_limited(3));

        let first = judge.judge(request()).await.unwrap();
        assert_eq!(first.result, Verdict::Fail);
        assert_eq!(judge.judge(request()).await.unwrap_err(), AIError::rate_limited(3));
        assert_eq!(judge.judge(request()).await.unwrap().result, Verdict::Pass);
        assert_eq!(judge.call_count(), 3);
        assert_eq!(judge.get_calls()[0].response_schema, verdict_schema());
    }

    #[tokio::test]
    async fn speech_to_text_records_language() {
        let stt = MockSpeechToText::new("点検ヨシ");
        let text = stt
            .transcribe(&MediaPayload::new(vec![1], "audio/webm"), "ja")
            .await
            .unwrap();
        assert_eq!(text, "点検ヨシ");
        assert_eq!(stt.requested_languages(), vec!["ja".to_string()]);
    }

    #[tokio::test]
    async fn failing_text_to_speech_returns_error() {
        let tts = MockTextToSpeech::failing(AIError::unavailable("down"));
        assert!(tts.synthesize("hello").await.is_err());
        assert_eq!(tts.spoken_texts(), vec!["hello".to_string()]);
    }

    #[tokio::test]
    async fn delay_is_observable_by_timeouts() {
        let judge = MockSafetyJudge::new().with_delay(Duration::from_millis(500));
        let outcome =
            tokio::time::timeout(Duration::from_millis(20), judge.judge(request())).await;
        assert!(outcome.is_err());
    }
}
