//! `SeaORM` Entity for the donation_requests table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::RequestStatus;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "donation_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub ngo_id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_needed: Decimal,
    /// Mutated only by the donation ledger, never by NGO edits.
    #[sea_orm(column_type = "Decimal(Some((10, 2)))")]
    pub amount_received: Decimal,
    pub image_url: Option<String>,
    pub status: RequestStatus,
    pub approved_by_admin_id: Option<Uuid>,
    pub approval_date: Option<DateTimeWithTimeZone>,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::ngo_profiles::Entity",
        from = "Column::NgoId",
        to = "super::ngo_profiles::Column::Id"
    )]
    NgoProfiles,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::ApprovedByAdminId",
        to = "super::users::Column::Id"
    )]
    Users,
    #[sea_orm(has_many = "super::donations::Entity")]
    Donations,
}

impl Related<super::ngo_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NgoProfiles.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::donations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Donations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
