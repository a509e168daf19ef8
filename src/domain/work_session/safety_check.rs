//! SafetyCheck - one recorded verification event against a step.
//!
//! Checks form the compliance audit trail of a work session. Once
//! appended a check is never removed; the only permitted mutation is a
//! supervisor override, which rewrites `result`, `override_reason` and
//! `override_by` and nothing else.

use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::domain::foundation::{
    require_non_empty, CheckId, StepId, Timestamp, UserId, ValidationError,
};

/// Outcome of a safety check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckResult {
    Pass,
    Fail,
    Override,
}

impl fmt::Display for CheckResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            CheckResult::Pass => "pass",
            CheckResult::Fail => "fail",
            CheckResult::Override => "override",
        };
        write!(f, "{}", s)
    }
}

/// Who overrode a check and why.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOverride {
    pub reason: String,
    pub by: UserId,
}

/// Everything needed to record a new check.
///
/// Built in full before it reaches the aggregate, so a failed external
/// call never leaves a partial check behind.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckSubmission {
    pub step_id: StepId,
    pub result: CheckResult,
    pub feedback_text: String,
    pub feedback_audio_url: Option<String>,
    pub confidence_score: Option<f64>,
    pub needs_review: bool,
    pub override_details: Option<CheckOverride>,
}

impl CheckSubmission {
    pub fn new(step_id: StepId, result: CheckResult, feedback_text: impl Into<String>) -> Self {
        Self {
            step_id,
            result,
            feedback_text: feedback_text.into(),
            feedback_audio_url: None,
            confidence_score: None,
            needs_review: false,
            override_details: None,
        }
    }

    pub fn with_audio_url(mut self, url: impl Into<String>) -> Self {
        self.feedback_audio_url = Some(url.into());
        self
    }

    pub fn with_confidence(mut self, score: f64) -> Self {
        self.confidence_score = Some(score);
        self
    }

    pub fn flagged_for_review(mut self, needs_review: bool) -> Self {
        self.needs_review = needs_review;
        self
    }

    pub fn with_override(mut self, reason: impl Into<String>, by: UserId) -> Self {
        self.override_details = Some(CheckOverride {
            reason: reason.into(),
            by,
        });
        self
    }
}

/// A recorded safety check.
///
/// # Invariants
///
/// - `feedback_text` is not blank
/// - `confidence_score`, when present, lies in [0.0, 1.0]
/// - `override_reason` and `override_by` are both present iff `result == Override`
///
/// Deserialization re-checks these, so a stored check that breaks them is
/// refused rather than loaded.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetyCheck {
    id: CheckId,
    step_id: StepId,
    result: CheckResult,
    feedback_text: String,
    feedback_audio_url: Option<String>,
    confidence_score: Option<f64>,
    needs_review: bool,
    checked_at: Timestamp,
    override_reason: Option<String>,
    override_by: Option<UserId>,
}

impl SafetyCheck {
    /// Validate a submission and stamp it with a fresh id and `checked_at`.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the feedback text or override reason is blank
    /// - `OutOfRange` if the confidence score is outside [0.0, 1.0]
    /// - `InvalidFormat` if override details are missing for an override
    ///   result, or present for any other result
    pub fn new(submission: CheckSubmission) -> Result<Self, ValidationError> {
        Self::validate(&submission)?;
        let (override_reason, override_by) = match submission.override_details {
            Some(CheckOverride { reason, by }) => (Some(reason), Some(by)),
            None => (None, None),
        };

        Ok(Self {
            id: CheckId::new(),
            step_id: submission.step_id,
            result: submission.result,
            feedback_text: submission.feedback_text,
            feedback_audio_url: submission.feedback_audio_url,
            confidence_score: submission.confidence_score,
            needs_review: submission.needs_review,
            checked_at: Timestamp::now(),
            override_reason,
            override_by,
        })
    }

    fn validate(submission: &CheckSubmission) -> Result<(), ValidationError> {
        require_non_empty("feedback_text", &submission.feedback_text)?;

        if let Some(score) = submission.confidence_score {
            if !(0.0..=1.0).contains(&score) {
                return Err(ValidationError::out_of_range(
                    "confidence_score",
                    0.0,
                    1.0,
                    score,
                ));
            }
        }

        match (&submission.result, &submission.override_details) {
            (CheckResult::Override, None) => Err(ValidationError::invalid_format(
                "override",
                "Override result requires override_reason and override_by",
            )),
            (CheckResult::Override, Some(details)) => {
                require_non_empty("override_reason", &details.reason).map(|_| ())
            }
            (_, Some(_)) => Err(ValidationError::invalid_format(
                "override",
                "Override details are only allowed on override results",
            )),
            (_, None) => Ok(()),
        }
    }

    /// Rebuilds a stored check, keeping its id and `checked_at`.
    fn from_record(record: SafetyCheckRecord) -> Result<Self, ValidationError> {
        let override_details = match (record.override_reason, record.override_by) {
            (Some(reason), Some(by)) => Some(CheckOverride { reason, by }),
            (None, None) => None,
            _ => {
                return Err(ValidationError::invalid_format(
                    "override",
                    "override_reason and override_by must be set together",
                ))
            }
        };
        let submission = CheckSubmission {
            step_id: record.step_id,
            result: record.result,
            feedback_text: record.feedback_text,
            feedback_audio_url: record.feedback_audio_url,
            confidence_score: record.confidence_score,
            needs_review: record.needs_review,
            override_details,
        };
        Self::validate(&submission)?;

        let (override_reason, override_by) = match submission.override_details {
            Some(CheckOverride { reason, by }) => (Some(reason), Some(by)),
            None => (None, None),
        };
        Ok(Self {
            id: record.id,
            step_id: submission.step_id,
            result: submission.result,
            feedback_text: submission.feedback_text,
            feedback_audio_url: submission.feedback_audio_url,
            confidence_score: submission.confidence_score,
            needs_review: submission.needs_review,
            checked_at: record.checked_at,
            override_reason,
            override_by,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &CheckId {
        &self.id
    }

    pub fn step_id(&self) -> &StepId {
        &self.step_id
    }

    pub fn result(&self) -> CheckResult {
        self.result
    }

    pub fn feedback_text(&self) -> &str {
        &self.feedback_text
    }

    pub fn feedback_audio_url(&self) -> Option<&str> {
        self.feedback_audio_url.as_deref()
    }

    pub fn confidence_score(&self) -> Option<f64> {
        self.confidence_score
    }

    pub fn needs_review(&self) -> bool {
        self.needs_review
    }

    pub fn checked_at(&self) -> &Timestamp {
        &self.checked_at
    }

    pub fn override_reason(&self) -> Option<&str> {
        self.override_reason.as_deref()
    }

    pub fn override_by(&self) -> Option<&UserId> {
        self.override_by.as_ref()
    }

    /// Returns true once a supervisor has overridden this check.
    pub fn is_overridden(&self) -> bool {
        self.result == CheckResult::Override
    }

    /// Rewrites the result to `Override`. Other fields are untouched.
    ///
    /// Callers validate the reason first so the aggregate can check all
    /// guards before mutating anything.
    pub(crate) fn apply_override(&mut self, reason: &str, by: &UserId) {
        self.result = CheckResult::Override;
        self.override_reason = Some(reason.to_string());
        self.override_by = Some(by.clone());
    }
}

/// Stored form of a check, validated by [`SafetyCheck::from_record`].
#[derive(Deserialize)]
struct SafetyCheckRecord {
    id: CheckId,
    step_id: StepId,
    result: CheckResult,
    feedback_text: String,
    feedback_audio_url: Option<String>,
    confidence_score: Option<f64>,
    needs_review: bool,
    checked_at: Timestamp,
    override_reason: Option<String>,
    override_by: Option<UserId>,
}

impl<'de> Deserialize<'de> for SafetyCheck {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let record = SafetyCheckRecord::deserialize(deserializer)?;
        SafetyCheck::from_record(record).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn supervisor() -> UserId {
        UserId::new("sup-1").unwrap()
    }

    fn pass(step: StepId) -> CheckSubmission {
        CheckSubmission::new(step, CheckResult::Pass, "Valve closed, good confirmation")
    }

    #[test]
    fn builds_pass_check_with_optional_fields() {
        let step = StepId::new();
        let check = SafetyCheck::new(
            pass(step)
                .with_confidence(0.92)
                .with_audio_url("/audio/1.mp3")
                .flagged_for_review(false),
        )
        .unwrap();

        assert_eq!(check.step_id(), &step);
        assert_eq!(check.result(), CheckResult::Pass);
        assert_eq!(check.confidence_score(), Some(0.92));
        assert_eq!(check.feedback_audio_url(), Some("/audio/1.mp3"));
        assert!(check.override_reason().is_none());
        assert!(check.override_by().is_none());
    }

    #[test]
    fn rejects_blank_feedback() {
        let err = SafetyCheck::new(CheckSubmission::new(StepId::new(), CheckResult::Fail, "  "))
            .unwrap_err();
        assert_eq!(err.field(), "feedback_text");
    }

    #[test]
    fn rejects_confidence_outside_unit_interval() {
        assert!(SafetyCheck::new(pass(StepId::new()).with_confidence(1.01)).is_err());
        assert!(SafetyCheck::new(pass(StepId::new()).with_confidence(-0.1)).is_err());
        assert!(SafetyCheck::new(pass(StepId::new()).with_confidence(f64::NAN)).is_err());
        assert!(SafetyCheck::new(pass(StepId::new()).with_confidence(0.0)).is_ok());
        assert!(SafetyCheck::new(pass(StepId::new()).with_confidence(1.0)).is_ok());
    }

    #[test]
    fn override_result_requires_details() {
        let submission = CheckSubmission::new(StepId::new(), CheckResult::Override, "Manual");
        assert!(SafetyCheck::new(submission).is_err());
    }

    #[test]
    fn override_result_requires_non_blank_reason() {
        let submission = CheckSubmission::new(StepId::new(), CheckResult::Override, "Manual")
            .with_override(" ", supervisor());
        assert!(SafetyCheck::new(submission).is_err());
    }

    #[test]
    fn override_result_with_details_succeeds() {
        let submission = CheckSubmission::new(StepId::new(), CheckResult::Override, "Manual")
            .with_override("Camera fogged", supervisor());
        let check = SafetyCheck::new(submission).unwrap();
        assert!(check.is_overridden());
        assert_eq!(check.override_reason(), Some("Camera fogged"));
        assert_eq!(check.override_by(), Some(&supervisor()));
    }

    #[test]
    fn non_override_result_rejects_override_details() {
        let submission = pass(StepId::new()).with_override("why", supervisor());
        assert!(SafetyCheck::new(submission).is_err());
    }

    #[test]
    fn apply_override_preserves_evidence_fields() {
        let mut check = SafetyCheck::new(
            CheckSubmission::new(StepId::new(), CheckResult::Fail, "Valve still open")
                .with_confidence(0.4),
        )
        .unwrap();
        let before = check.clone();

        check.apply_override("Valve was closed, camera angle", &supervisor());

        assert_eq!(check.result(), CheckResult::Override);
        assert_eq!(check.id(), before.id());
        assert_eq!(check.step_id(), before.step_id());
        assert_eq!(check.feedback_text(), before.feedback_text());
        assert_eq!(check.checked_at(), before.checked_at());
        assert_eq!(check.confidence_score(), before.confidence_score());
    }

    #[test]
    fn stored_override_round_trips() {
        let mut check = SafetyCheck::new(pass(StepId::new()).with_confidence(0.5)).unwrap();
        check.apply_override("Seen on site", &supervisor());

        let restored: SafetyCheck =
            serde_json::from_value(serde_json::to_value(&check).unwrap()).unwrap();
        assert_eq!(restored, check);
    }

    #[test]
    fn stored_override_without_reason_is_refused() {
        let mut check = SafetyCheck::new(pass(StepId::new())).unwrap();
        check.apply_override("Seen on site", &supervisor());
        let mut value = serde_json::to_value(&check).unwrap();
        value["override_reason"] = serde_json::Value::Null;

        let err = serde_json::from_value::<SafetyCheck>(value).unwrap_err();
        assert!(err.to_string().contains("override"), "{}", err);
    }

    #[test]
    fn stored_check_with_blank_feedback_is_refused() {
        let check = SafetyCheck::new(pass(StepId::new())).unwrap();
        let mut value = serde_json::to_value(&check).unwrap();
        value["feedback_text"] = serde_json::json!("");
        assert!(serde_json::from_value::<SafetyCheck>(value).is_err());
    }

    #[test]
    fn result_serializes_snake_case() {
        assert_eq!(serde_json::to_string(&CheckResult::Override).unwrap(), "\"override\"");
    }
}
