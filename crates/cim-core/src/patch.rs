//! # Complaint Patch
//!
//! Explicit partial-update structure for complaints. Each field's absence
//! means "leave unchanged"; the patch is validated before it is dispatched
//! to the store.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::status::ComplaintStatus;

/// A partial update to a complaint.
///
/// Only status and assignee are mutable through the lifecycle service;
/// everything else on a complaint is immutable after creation (evidence
/// attachment goes through its own dedicated operation).
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ComplaintPatch {
    /// New status, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<ComplaintStatus>,
    /// New assignee, if changing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<String>,
}

impl ComplaintPatch {
    /// Whether the patch changes nothing.
    ///
    /// An empty patch is still a valid transition — it appends a timeline
    /// entry without touching any field.
    pub fn is_empty(&self) -> bool {
        self.status.is_none() && self.assigned_to.is_none()
    }

    /// Validate business rules beyond what deserialization checks.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(ref assignee) = self.assigned_to {
            if assignee.trim().is_empty() {
                return Err(ValidationError::MissingField("assignedTo"));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_patch_is_valid() {
        let patch = ComplaintPatch::default();
        assert!(patch.is_empty());
        assert!(patch.validate().is_ok());
    }

    #[test]
    fn blank_assignee_rejected() {
        let patch = ComplaintPatch {
            status: None,
            assigned_to: Some("   ".into()),
        };
        assert!(patch.validate().is_err());
    }

    #[test]
    fn status_only_patch() {
        let patch = ComplaintPatch {
            status: Some(ComplaintStatus::Solved),
            assigned_to: None,
        };
        assert!(!patch.is_empty());
        assert!(patch.validate().is_ok());
    }
}
