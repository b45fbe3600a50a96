//! Profile lookups for role-specific account data.

use sea_orm::{ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter};
use uuid::Uuid;

use crate::entities::{donor_profiles, ngo_profiles};

/// Repository for NGO and donor profile lookups.
#[derive(Debug, Clone)]
pub struct ProfileRepository {
    db: DatabaseConnection,
}

impl ProfileRepository {
    /// Creates a new profile repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds the NGO profile belonging to a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_ngo_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<ngo_profiles::Model>, DbErr> {
        ngo_profiles::Entity::find()
            .filter(ngo_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Finds the donor profile belonging to a user account.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_donor_by_user(
        &self,
        user_id: Uuid,
    ) -> Result<Option<donor_profiles::Model>, DbErr> {
        donor_profiles::Entity::find()
            .filter(donor_profiles::Column::UserId.eq(user_id))
            .one(&self.db)
            .await
    }

    /// Finds NGO profiles by id set, for denormalized display data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_ngos_by_ids(
        &self,
        ids: Vec<Uuid>,
    ) -> Result<Vec<ngo_profiles::Model>, DbErr> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        ngo_profiles::Entity::find()
            .filter(ngo_profiles::Column::Id.is_in(ids))
            .all(&self.db)
            .await
    }
}
