//! Postgres enum mappings.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Account role stored on the users table.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Moderates requests and NGO accounts.
    #[sea_orm(string_value = "admin")]
    Admin,
    /// Posts funding requests.
    #[sea_orm(string_value = "ngo")]
    Ngo,
    /// Contributes funds to approved requests.
    #[sea_orm(string_value = "donor")]
    Donor,
}

/// Donation request lifecycle status.
#[derive(Debug, Clone, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "request_status")]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    /// Awaiting admin moderation.
    #[sea_orm(string_value = "pending")]
    Pending,
    /// Open for donations.
    #[sea_orm(string_value = "approved")]
    Approved,
    /// Rejected by an admin (terminal).
    #[sea_orm(string_value = "rejected")]
    Rejected,
    /// Fully funded (terminal).
    #[sea_orm(string_value = "completed")]
    Completed,
}

impl From<kindra_core::identity::Role> for UserRole {
    fn from(role: kindra_core::identity::Role) -> Self {
        match role {
            kindra_core::identity::Role::Admin => Self::Admin,
            kindra_core::identity::Role::Ngo => Self::Ngo,
            kindra_core::identity::Role::Donor => Self::Donor,
        }
    }
}

impl From<UserRole> for kindra_core::identity::Role {
    fn from(role: UserRole) -> Self {
        match role {
            UserRole::Admin => Self::Admin,
            UserRole::Ngo => Self::Ngo,
            UserRole::Donor => Self::Donor,
        }
    }
}

impl From<kindra_core::moderation::RequestStatus> for RequestStatus {
    fn from(status: kindra_core::moderation::RequestStatus) -> Self {
        match status {
            kindra_core::moderation::RequestStatus::Pending => Self::Pending,
            kindra_core::moderation::RequestStatus::Approved => Self::Approved,
            kindra_core::moderation::RequestStatus::Rejected => Self::Rejected,
            kindra_core::moderation::RequestStatus::Completed => Self::Completed,
        }
    }
}

impl From<RequestStatus> for kindra_core::moderation::RequestStatus {
    fn from(status: RequestStatus) -> Self {
        match status {
            RequestStatus::Pending => Self::Pending,
            RequestStatus::Approved => Self::Approved,
            RequestStatus::Rejected => Self::Rejected,
            RequestStatus::Completed => Self::Completed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kindra_core::{identity, moderation};

    #[test]
    fn test_role_round_trip() {
        for role in [identity::Role::Admin, identity::Role::Ngo, identity::Role::Donor] {
            let db_role: UserRole = role.into();
            let back: identity::Role = db_role.into();
            assert_eq!(back, role);
        }
    }

    #[test]
    fn test_status_round_trip() {
        for status in [
            moderation::RequestStatus::Pending,
            moderation::RequestStatus::Approved,
            moderation::RequestStatus::Rejected,
            moderation::RequestStatus::Completed,
        ] {
            let db_status: RequestStatus = status.into();
            let back: moderation::RequestStatus = db_status.into();
            assert_eq!(back, status);
        }
    }
}
