use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Severity
// ---------------------------------------------------------------------------

/// Incident severity, most severe first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    #[serde(rename = "SEV0")]
    Sev0,
    #[serde(rename = "SEV1")]
    Sev1,
    #[serde(rename = "SEV2")]
    Sev2,
    #[serde(rename = "SEV3")]
    Sev3,
}

impl Severity {
    pub fn all() -> &'static [Severity] {
        &[
            Severity::Sev0,
            Severity::Sev1,
            Severity::Sev2,
            Severity::Sev3,
        ]
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Sev0 => "SEV0",
            Severity::Sev1 => "SEV1",
            Severity::Sev2 => "SEV2",
            Severity::Sev3 => "SEV3",
        }
    }

    pub fn impact(self) -> &'static str {
        match self {
            Severity::Sev0 => "Major Customer Impact",
            Severity::Sev1 => "High Customer Impact",
            Severity::Sev2 => "Low/No Customer Impact",
            Severity::Sev3 => "Maintenance",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Strict parse of the canonical uppercase form. Callers that accept user
/// input upper-case it first.
impl std::str::FromStr for Severity {
    type Err = crate::error::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SEV0" => Ok(Severity::Sev0),
            "SEV1" => Ok(Severity::Sev1),
            "SEV2" => Ok(Severity::Sev2),
            "SEV3" => Ok(Severity::Sev3),
            _ => Err(crate::error::ParseError::InvalidSeverity(s.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
