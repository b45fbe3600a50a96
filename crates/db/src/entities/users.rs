//! `SeaORM` Entity for the users table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::sea_orm_active_enums::UserRole;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(unique)]
    pub username: String,
    #[sea_orm(unique)]
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    /// Admin approval flag; false for newly registered NGOs.
    pub is_approved: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::ngo_profiles::Entity")]
    NgoProfiles,
    #[sea_orm(has_one = "super::donor_profiles::Entity")]
    DonorProfiles,
}

impl Related<super::ngo_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::NgoProfiles.def()
    }
}

impl Related<super::donor_profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DonorProfiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
