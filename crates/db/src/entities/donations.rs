//! `SeaORM` Entity for the donations table.
//!
//! Donation rows are immutable once created; there is no update path.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donations")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub donor_id: Uuid,
    pub donation_request_id: Uuid,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_donated: Decimal,
    /// Opaque payment-gateway reference; never interpreted.
    pub transaction_ref: Option<String>,
    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::donor_profiles::Entity",
        from = "Column::DonorId",
        to = "super::donor_profiles::Column::Id"
    )]
    DonorProfiles,
    #[sea_orm(
        belongs_to = "super::donation_requests::Entity",
        from = "Column::DonationRequestId",
        to = "super::donation_requests::Column::Id"
    )]
    DonationRequests,
}

impl Related<super::donor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonorProfiles.def()
    }
}

impl Related<super::donation_requests::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonationRequests.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
