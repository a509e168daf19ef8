//! Hazards attached to SOP steps.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{require_non_empty, HazardId, ValidationError};

/// How severe a hazard is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HazardSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl HazardSeverity {
    /// Returns the lowercase wire name.
    pub fn as_str(&self) -> &'static str {
        match self {
            HazardSeverity::Low => "low",
            HazardSeverity::Medium => "medium",
            HazardSeverity::High => "high",
            HazardSeverity::Critical => "critical",
        }
    }
}

impl fmt::Display for HazardSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for HazardSeverity {
    type Err = ValidationError;

    /// Parses severity text as produced by SOP extraction (case-insensitive).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(HazardSeverity::Low),
            "medium" => Ok(HazardSeverity::Medium),
            "high" => Ok(HazardSeverity::High),
            "critical" => Ok(HazardSeverity::Critical),
            other => Err(ValidationError::invalid_format(
                "severity",
                format!("unknown severity '{}'", other),
            )),
        }
    }
}

/// A hazard the worker must be aware of while performing a step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hazard {
    id: HazardId,
    description: String,
    severity: HazardSeverity,
    mitigation: Option<String>,
}

impl Hazard {
    /// Creates a hazard.
    ///
    /// # Errors
    ///
    /// - `EmptyField` if the description is blank
    pub fn new(
        description: impl Into<String>,
        severity: HazardSeverity,
        mitigation: Option<String>,
    ) -> Result<Self, ValidationError> {
        let description = description.into();
        require_non_empty("hazard.description", &description)?;
        Ok(Self {
            id: HazardId::new(),
            description,
            severity,
            mitigation,
        })
    }

    /// Reconstitute a hazard from persistence (no validation).
    pub fn reconstitute(
        id: HazardId,
        description: String,
        severity: HazardSeverity,
        mitigation: Option<String>,
    ) -> Self {
        Self {
            id,
            description,
            severity,
            mitigation,
        }
    }

    pub fn id(&self) -> &HazardId {
        &self.id
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> HazardSeverity {
        self.severity
    }

    pub fn mitigation(&self) -> Option<&str> {
        self.mitigation.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_severity_case_insensitively() {
        assert_eq!("HIGH".parse::<HazardSeverity>().unwrap(), HazardSeverity::High);
        assert_eq!(" critical ".parse::<HazardSeverity>().unwrap(), HazardSeverity::Critical);
        assert!("catastrophic".parse::<HazardSeverity>().is_err());
    }

    #[test]
    fn severity_orders_by_danger() {
        assert!(HazardSeverity::Low < HazardSeverity::Critical);
        assert!(HazardSeverity::Medium < HazardSeverity::High);
    }

    #[test]
    fn hazard_requires_description() {
        assert!(Hazard::new("  ", HazardSeverity::Low, None).is_err());
        let hazard = Hazard::new("Hot surface", HazardSeverity::High, Some("Wear gloves".into()))
            .unwrap();
        assert_eq!(hazard.mitigation(), Some("Wear gloves"));
    }
}
