//! Category repository.
//!
//! Categories are simple tags owning donation requests. Deletion
//! cascades explicitly: donations of the category's requests, then the
//! requests, then the category itself, all in one transaction.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{categories, donation_requests, donations};

/// Error types for category operations.
#[derive(Debug, thiserror::Error)]
pub enum CategoryError {
    /// Category name already exists.
    #[error("Category name '{0}' already exists")]
    DuplicateName(String),

    /// Category not found.
    #[error("Category not found: {0}")]
    NotFound(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Category repository for CRUD operations.
#[derive(Debug, Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
}

impl CategoryRepository {
    /// Creates a new category repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new category with a unique name.
    ///
    /// # Errors
    ///
    /// Returns `DuplicateName` if the name is already taken.
    pub async fn create(
        &self,
        name: String,
        description: Option<String>,
    ) -> Result<categories::Model, CategoryError> {
        let existing = categories::Entity::find()
            .filter(categories::Column::Name.eq(&name))
            .one(&self.db)
            .await?;

        if existing.is_some() {
            return Err(CategoryError::DuplicateName(name));
        }

        let now = chrono::Utc::now().into();
        let category = categories::ActiveModel {
            id: Set(Uuid::new_v4()),
            name: Set(name),
            description: Set(description),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(category.insert(&self.db).await?)
    }

    /// Lists all categories, alphabetically.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list(&self) -> Result<Vec<categories::Model>, DbErr> {
        categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await
    }

    /// Finds a category by name.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_name(&self, name: &str) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find()
            .filter(categories::Column::Name.eq(name))
            .one(&self.db)
            .await
    }

    /// Finds a category by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<categories::Model>, DbErr> {
        categories::Entity::find_by_id(id).one(&self.db).await
    }

    /// Deletes a category, cascading to its requests and their donations.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the category does not exist.
    pub async fn delete(&self, id: Uuid) -> Result<(), CategoryError> {
        let txn = self.db.begin().await?;

        let request_ids: Vec<Uuid> = donation_requests::Entity::find()
            .select_only()
            .column(donation_requests::Column::Id)
            .filter(donation_requests::Column::CategoryId.eq(id))
            .into_tuple()
            .all(&txn)
            .await?;

        if !request_ids.is_empty() {
            donations::Entity::delete_many()
                .filter(donations::Column::DonationRequestId.is_in(request_ids.clone()))
                .exec(&txn)
                .await?;

            donation_requests::Entity::delete_many()
                .filter(donation_requests::Column::Id.is_in(request_ids))
                .exec(&txn)
                .await?;
        }

        let result = categories::Entity::delete_by_id(id).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(CategoryError::NotFound(id));
        }

        txn.commit().await?;
        Ok(())
    }
}
