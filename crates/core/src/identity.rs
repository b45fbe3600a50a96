//! Identity context and authorization predicates.
//!
//! Every core operation receives an already-authenticated identity
//! `(user id, role)`. The predicates here are evaluated explicitly at
//! the start of each operation; no handler relies on implicit
//! decorator-style gating.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use kindra_shared::types::UserId;

/// Account roles in the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// Moderates requests and NGO accounts.
    Admin,
    /// Posts funding requests.
    Ngo,
    /// Contributes funds to approved requests.
    Donor,
}

impl Role {
    /// Parses a role from its wire representation.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Admin" => Some(Self::Admin),
            "NGO" => Some(Self::Ngo),
            "Donor" => Some(Self::Donor),
            _ => None,
        }
    }

    /// Returns the wire representation of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "Admin",
            Self::Ngo => "NGO",
            Self::Donor => "Donor",
        }
    }

    /// Returns true if this role may approve or reject requests and NGO accounts.
    #[must_use]
    pub const fn can_moderate(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Returns true if this role may post and manage funding requests.
    #[must_use]
    pub const fn can_post_requests(&self) -> bool {
        matches!(self, Self::Ngo)
    }

    /// Returns true if this role may donate to approved requests.
    #[must_use]
    pub const fn can_donate(&self) -> bool {
        matches!(self, Self::Donor)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Authenticated identity context attached to each operation.
#[derive(Debug, Clone, Copy)]
pub struct Identity {
    /// The acting user.
    pub user_id: UserId,
    /// The user's role.
    pub role: Role,
}

impl Identity {
    /// Creates a new identity context.
    #[must_use]
    pub const fn new(user_id: UserId, role: Role) -> Self {
        Self { user_id, role }
    }
}

/// Errors from authorization predicates.
#[derive(Debug, Error)]
pub enum AuthzError {
    /// The identity's role does not grant the required capability.
    #[error("role {actual} does not grant the required capability (requires {required})")]
    RoleMismatch {
        /// The role the operation requires.
        required: Role,
        /// The identity's actual role.
        actual: Role,
    },

    /// The NGO account has not been approved by an admin.
    #[error("NGO account is pending admin approval")]
    AccountNotApproved,
}

impl From<AuthzError> for kindra_shared::AppError {
    fn from(err: AuthzError) -> Self {
        Self::Forbidden(err.to_string())
    }
}

/// Requires the identity to hold the Admin role.
pub fn require_admin(identity: &Identity) -> Result<(), AuthzError> {
    if identity.role.can_moderate() {
        Ok(())
    } else {
        Err(AuthzError::RoleMismatch {
            required: Role::Admin,
            actual: identity.role,
        })
    }
}

/// Requires the identity to hold the Donor role.
pub fn require_donor(identity: &Identity) -> Result<(), AuthzError> {
    if identity.role.can_donate() {
        Ok(())
    } else {
        Err(AuthzError::RoleMismatch {
            required: Role::Donor,
            actual: identity.role,
        })
    }
}

/// Requires the identity to hold the NGO role on an admin-approved account.
///
/// `account_approved` is the persisted approval flag for the account;
/// the claims alone cannot prove it.
pub fn require_approved_ngo(identity: &Identity, account_approved: bool) -> Result<(), AuthzError> {
    if !identity.role.can_post_requests() {
        return Err(AuthzError::RoleMismatch {
            required: Role::Ngo,
            actual: identity.role,
        });
    }
    if !account_approved {
        return Err(AuthzError::AccountNotApproved);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn identity(role: Role) -> Identity {
        Identity::new(UserId::new(), role)
    }

    #[rstest]
    #[case("Admin", Some(Role::Admin))]
    #[case("NGO", Some(Role::Ngo))]
    #[case("Donor", Some(Role::Donor))]
    #[case("admin", None)]
    #[case("", None)]
    fn test_role_parse(#[case] input: &str, #[case] expected: Option<Role>) {
        assert_eq!(Role::parse(input), expected);
    }

    #[test]
    fn test_role_round_trip() {
        for role in [Role::Admin, Role::Ngo, Role::Donor] {
            assert_eq!(Role::parse(role.as_str()), Some(role));
        }
    }

    #[test]
    fn test_capabilities_are_disjoint() {
        assert!(Role::Admin.can_moderate());
        assert!(!Role::Admin.can_post_requests());
        assert!(!Role::Admin.can_donate());

        assert!(Role::Ngo.can_post_requests());
        assert!(!Role::Ngo.can_moderate());
        assert!(!Role::Ngo.can_donate());

        assert!(Role::Donor.can_donate());
        assert!(!Role::Donor.can_moderate());
        assert!(!Role::Donor.can_post_requests());
    }

    #[test]
    fn test_require_admin() {
        assert!(require_admin(&identity(Role::Admin)).is_ok());
        assert!(matches!(
            require_admin(&identity(Role::Donor)),
            Err(AuthzError::RoleMismatch { .. })
        ));
    }

    #[test]
    fn test_require_donor() {
        assert!(require_donor(&identity(Role::Donor)).is_ok());
        assert!(require_donor(&identity(Role::Ngo)).is_err());
    }

    #[test]
    fn test_require_approved_ngo() {
        assert!(require_approved_ngo(&identity(Role::Ngo), true).is_ok());
        assert!(matches!(
            require_approved_ngo(&identity(Role::Ngo), false),
            Err(AuthzError::AccountNotApproved)
        ));
        assert!(matches!(
            require_approved_ngo(&identity(Role::Donor), true),
            Err(AuthzError::RoleMismatch { .. })
        ));
    }
}
