//! Moderation domain types for the donation request lifecycle.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use kindra_shared::types::UserId;

/// Donation request status in the moderation lifecycle.
///
/// Requests progress through these states from creation to completion.
/// The valid transitions are:
/// - Pending → Approved (admin approve)
/// - Pending → Rejected (admin reject)
/// - Approved → Completed (ledger, on reaching the funding target)
///
/// Rejected and Completed are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting admin moderation; invisible to donors.
    Pending,
    /// Approved and open for donations.
    Approved,
    /// Rejected by an admin (terminal).
    Rejected,
    /// Fully funded (terminal); closed to further donations.
    Completed,
}

impl RequestStatus {
    /// Returns the string representation of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
            Self::Completed => "completed",
        }
    }

    /// Parses a status from a string.
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "pending" => Some(Self::Pending),
            "approved" => Some(Self::Approved),
            "rejected" => Some(Self::Rejected),
            "completed" => Some(Self::Completed),
            _ => None,
        }
    }

    /// Returns true if no further status change is possible.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Rejected | Self::Completed)
    }

    /// Returns true if the request appears in donor-facing listings.
    #[must_use]
    pub fn is_donor_visible(&self) -> bool {
        matches!(self, Self::Approved | Self::Completed)
    }

    /// Returns true if the request accepts donations.
    #[must_use]
    pub fn is_open_for_donations(&self) -> bool {
        matches!(self, Self::Approved)
    }

    /// Returns true if the owning NGO may still edit or delete the request.
    #[must_use]
    pub fn is_editable(&self) -> bool {
        !matches!(self, Self::Completed)
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Moderation action representing a state transition with audit data.
#[derive(Debug, Clone)]
pub enum ModerationAction {
    /// Approve a pending request, opening it for donations.
    Approve {
        /// The new status after approval.
        new_status: RequestStatus,
        /// The admin who approved the request.
        approved_by: UserId,
        /// When the request was approved.
        approved_at: DateTime<Utc>,
    },
    /// Reject a pending request (terminal).
    Reject {
        /// The new status after rejection.
        new_status: RequestStatus,
    },
    /// Close a fully funded request. Produced only by the ledger.
    Complete {
        /// The new status after completion.
        new_status: RequestStatus,
    },
}

impl ModerationAction {
    /// Returns the new status resulting from this action.
    #[must_use]
    pub fn new_status(&self) -> RequestStatus {
        match self {
            Self::Approve { new_status, .. }
            | Self::Reject { new_status }
            | Self::Complete { new_status } => *new_status,
        }
    }

    /// Returns the status the request must currently hold for this
    /// action to apply. Used as the guard of the conditional update
    /// that persists the action.
    #[must_use]
    pub fn guard_status(&self) -> RequestStatus {
        match self {
            Self::Approve { .. } | Self::Reject { .. } => RequestStatus::Pending,
            Self::Complete { .. } => RequestStatus::Approved,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_as_str() {
        assert_eq!(RequestStatus::Pending.as_str(), "pending");
        assert_eq!(RequestStatus::Approved.as_str(), "approved");
        assert_eq!(RequestStatus::Rejected.as_str(), "rejected");
        assert_eq!(RequestStatus::Completed.as_str(), "completed");
    }

    #[test]
    fn test_status_parse() {
        assert_eq!(RequestStatus::parse("pending"), Some(RequestStatus::Pending));
        assert_eq!(
            RequestStatus::parse("APPROVED"),
            Some(RequestStatus::Approved)
        );
        assert_eq!(
            RequestStatus::parse("Completed"),
            Some(RequestStatus::Completed)
        );
        assert_eq!(RequestStatus::parse("invalid"), None);
    }

    #[test]
    fn test_terminal_states() {
        assert!(!RequestStatus::Pending.is_terminal());
        assert!(!RequestStatus::Approved.is_terminal());
        assert!(RequestStatus::Rejected.is_terminal());
        assert!(RequestStatus::Completed.is_terminal());
    }

    #[test]
    fn test_donor_visibility() {
        assert!(!RequestStatus::Pending.is_donor_visible());
        assert!(RequestStatus::Approved.is_donor_visible());
        assert!(!RequestStatus::Rejected.is_donor_visible());
        assert!(RequestStatus::Completed.is_donor_visible());
    }

    #[test]
    fn test_open_for_donations() {
        assert!(RequestStatus::Approved.is_open_for_donations());
        assert!(!RequestStatus::Pending.is_open_for_donations());
        assert!(!RequestStatus::Rejected.is_open_for_donations());
        assert!(!RequestStatus::Completed.is_open_for_donations());
    }

    #[test]
    fn test_editable() {
        assert!(RequestStatus::Pending.is_editable());
        assert!(RequestStatus::Approved.is_editable());
        assert!(RequestStatus::Rejected.is_editable());
        assert!(!RequestStatus::Completed.is_editable());
    }

    #[test]
    fn test_action_guard_status() {
        let approve = ModerationAction::Approve {
            new_status: RequestStatus::Approved,
            approved_by: UserId::new(),
            approved_at: Utc::now(),
        };
        assert_eq!(approve.guard_status(), RequestStatus::Pending);
        assert_eq!(approve.new_status(), RequestStatus::Approved);

        let complete = ModerationAction::Complete {
            new_status: RequestStatus::Completed,
        };
        assert_eq!(complete.guard_status(), RequestStatus::Approved);
    }
}
