//! # Complaint Status
//!
//! The lifecycle status of a complaint. Serialized in kebab-case to match
//! the wire contract (`"in-progress"`, not `"InProgress"`).

use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::ValidationError;

/// The lifecycle status of a complaint.
///
/// `Escalated` exists as a storable value but is never assigned
/// automatically — escalation is ordinarily a read-time derivation (see
/// [`crate::escalation`]). It can still be set explicitly through the
/// normal transition path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    /// Newly raised, awaiting action. The default for every complaint.
    Pending,
    /// A municipal official is actively working the complaint.
    InProgress,
    /// Resolved; resolution evidence may be attached.
    Solved,
    /// Explicitly escalated to the state tier.
    Escalated,
}

impl ComplaintStatus {
    /// Return the wire representation of this status.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in-progress",
            Self::Solved => "solved",
            Self::Escalated => "escalated",
        }
    }

    /// All valid statuses, in declaration order. Used in validation
    /// error messages.
    pub const ALL: [ComplaintStatus; 4] = [
        Self::Pending,
        Self::InProgress,
        Self::Solved,
        Self::Escalated,
    ];
}

impl Default for ComplaintStatus {
    fn default() -> Self {
        Self::Pending
    }
}

impl std::fmt::Display for ComplaintStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ComplaintStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "in-progress" => Ok(Self::InProgress),
            "solved" => Ok(Self::Solved),
            "escalated" => Ok(Self::Escalated),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_valid_statuses() {
        for status in ComplaintStatus::ALL {
            let parsed: ComplaintStatus = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn rejects_invalid_status() {
        let err = "resolved".parse::<ComplaintStatus>().unwrap_err();
        assert!(err.to_string().contains("resolved"));
    }

    #[test]
    fn rejects_wrong_case() {
        assert!("Pending".parse::<ComplaintStatus>().is_err());
        assert!("SOLVED".parse::<ComplaintStatus>().is_err());
    }

    #[test]
    fn default_is_pending() {
        assert_eq!(ComplaintStatus::default(), ComplaintStatus::Pending);
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&ComplaintStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");

        let back: ComplaintStatus = serde_json::from_str("\"in-progress\"").unwrap();
        assert_eq!(back, ComplaintStatus::InProgress);
    }

    #[test]
    fn serde_rejects_unknown_status() {
        assert!(serde_json::from_str::<ComplaintStatus>("\"done\"").is_err());
    }
}
