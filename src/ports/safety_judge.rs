//! SafetyJudge port - multimodal AI verification of a single SOP step.
//!
//! The judge receives a photo, the worker's spoken confirmation and a
//! prompt describing the whole SOP plus the step under test, and answers
//! with a structured verdict constrained by [`verdict_schema`].

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value as JsonValue};

use super::{AIError, MediaPayload};
use crate::domain::work_session::CheckResult;

/// Port for the AI safety judge.
#[async_trait]
pub trait SafetyJudge: Send + Sync {
    /// Judge whether the evidence shows the step performed correctly.
    ///
    /// # Errors
    ///
    /// - `InvalidResponse` if the model output does not parse as a [`JudgeVerdict`]
    /// - `Unavailable`, `RateLimited`, `Timeout` for transport failures
    async fn judge(&self, request: JudgeRequest) -> Result<JudgeVerdict, AIError>;
}

/// Everything the judge needs for one verification.
#[derive(Debug, Clone)]
pub struct JudgeRequest {
    pub prompt: String,
    pub image: MediaPayload,
    pub transcript: String,
    /// JSON schema the response must follow.
    pub response_schema: JsonValue,
}

impl JudgeRequest {
    pub fn new(prompt: String, image: MediaPayload, transcript: String) -> Self {
        Self {
            prompt,
            image,
            transcript,
            response_schema: verdict_schema(),
        }
    }
}

/// Pass or fail, as decided by the judge. Overrides are human only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Pass,
    Fail,
}

impl From<Verdict> for CheckResult {
    fn from(verdict: Verdict) -> Self {
        match verdict {
            Verdict::Pass => CheckResult::Pass,
            Verdict::Fail => CheckResult::Fail,
        }
    }
}

/// Structured verdict returned by the judge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JudgeVerdict {
    pub result: Verdict,
    pub confidence: f64,
    /// False when the worker appears to be ahead of or behind the expected step.
    pub step_sequence_correct: bool,
    /// Feedback spoken back to the worker.
    pub feedback_text: String,
    pub reasoning: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_step_hint: Option<String>,
}

impl JudgeVerdict {
    /// Parses and sanity-checks raw model output.
    pub fn from_json(value: JsonValue) -> Result<Self, AIError> {
        let verdict: JudgeVerdict = serde_json::from_value(value)
            .map_err(|e| AIError::invalid_response(e.to_string()))?;
        if !(0.0..=1.0).contains(&verdict.confidence) {
            return Err(AIError::invalid_response(format!(
                "confidence {} outside [0, 1]",
                verdict.confidence
            )));
        }
        if verdict.feedback_text.trim().is_empty() {
            return Err(AIError::invalid_response("empty feedback_text"));
        }
        Ok(verdict)
    }

    /// A verdict needs a supervisor when it is unsure or out of sequence.
    pub fn needs_review(&self, confidence_threshold: f64) -> bool {
        self.confidence < confidence_threshold || !self.step_sequence_correct
    }

    /// A pass on the expected step moves the session on.
    pub fn advances_session(&self) -> bool {
        self.result == Verdict::Pass && self.step_sequence_correct
    }
}

/// JSON schema constraining the judge's response.
pub fn verdict_schema() -> JsonValue {
    json!({
        "type": "object",
        "properties": {
            "result": { "type": "string", "enum": ["pass", "fail"] },
            "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            "step_sequence_correct": { "type": "boolean" },
            "feedback_text": { "type": "string" },
            "reasoning": { "type": "string" },
            "next_step_hint": { "type": "string" }
        },
        "required": [
            "result",
            "confidence",
            "step_sequence_correct",
            "feedback_text",
            "reasoning"
        ],
        "additionalProperties": false
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(confidence: f64, seq: bool) -> JsonValue {
        json!({
            "result": "pass",
            "confidence": confidence,
            "step_sequence_correct": seq,
            "feedback_text": "しっかり確認できました！",
            "reasoning": "Valve handle perpendicular to pipe"
        })
    }

    #[test]
    fn parses_valid_verdict_without_hint() {
        let verdict = JudgeVerdict::from_json(raw(0.9, true)).unwrap();
        assert_eq!(verdict.result, Verdict::Pass);
        assert!(verdict.next_step_hint.is_none());
        assert!(verdict.advances_session());
        assert!(!verdict.needs_review(0.7));
    }

    #[test]
    fn low_confidence_needs_review() {
        let verdict = JudgeVerdict::from_json(raw(0.69, true)).unwrap();
        assert!(verdict.needs_review(0.7));
        assert!(!JudgeVerdict::from_json(raw(0.7, true)).unwrap().needs_review(0.7));
    }

    #[test]
    fn out_of_sequence_needs_review_and_does_not_advance() {
        let verdict = JudgeVerdict::from_json(raw(0.95, false)).unwrap();
        assert!(verdict.needs_review(0.7));
        assert!(!verdict.advances_session());
    }

    #[test]
    fn rejects_out_of_range_confidence() {
        let err = JudgeVerdict::from_json(raw(1.5, true)).unwrap_err();
        assert!(matches!(err, AIError::InvalidResponse(_)));
    }

    #[test]
    fn rejects_missing_fields() {
        let err = JudgeVerdict::from_json(json!({ "result": "pass" })).unwrap_err();
        assert!(matches!(err, AIError::InvalidResponse(_)));
    }

    #[test]
    fn schema_requires_core_fields() {
        let schema = verdict_schema();
        let required: Vec<&str> = schema["required"]
            .as_array()
            .unwrap()
            .iter()
            .filter_map(|v| v.as_str())
            .collect();
        assert!(required.contains(&"step_sequence_correct"));
        assert!(!required.contains(&"next_step_hint"));
    }

    #[test]
    fn verdict_maps_onto_check_result() {
        assert_eq!(CheckResult::from(Verdict::Fail), CheckResult::Fail);
    }
}
