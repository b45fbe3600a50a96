//! `SeaORM` entity definitions.

pub mod categories;
pub mod donation_requests;
pub mod donations;
pub mod donor_profiles;
pub mod ngo_profiles;
pub mod sea_orm_active_enums;
pub mod users;
