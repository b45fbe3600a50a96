//! Donation request repository.
//!
//! Owns persistence for the moderation gate: creation in Pending,
//! role-scoped listings, owner edits that never touch the balance, and
//! status transitions applied under a status-guarded conditional update
//! so concurrent moderation cannot double-apply.

use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use kindra_core::moderation::{ModerationAction, ModerationError, ModerationService};
use kindra_shared::types::{Money, UserId};

use crate::entities::{
    categories, donation_requests, donations, sea_orm_active_enums::RequestStatus,
};

/// Error types for donation request operations.
#[derive(Debug, thiserror::Error)]
pub enum RequestError {
    /// Request not found (or not owned by the caller).
    #[error("Donation request not found: {0}")]
    NotFound(Uuid),

    /// Referenced category does not exist.
    #[error("Category not found: {0}")]
    CategoryNotFound(Uuid),

    /// A moderation or edit guard failed.
    #[error(transparent)]
    Moderation(#[from] ModerationError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for creating a donation request.
#[derive(Debug, Clone)]
pub struct CreateRequestInput {
    /// Owning NGO profile.
    pub ngo_id: Uuid,
    /// Category reference.
    pub category_id: Uuid,
    /// Request title.
    pub title: String,
    /// Request description.
    pub description: String,
    /// Funding target (positive, two decimals).
    pub amount_needed: Decimal,
    /// Optional image URL from object storage.
    pub image_url: Option<String>,
}

/// Input for an owner update. `None` fields are left unchanged.
#[derive(Debug, Clone, Default)]
pub struct UpdateRequestInput {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<String>,
    /// New funding target.
    pub amount_needed: Option<Decimal>,
    /// New category reference.
    pub category_id: Option<Uuid>,
}

/// Donation request repository.
#[derive(Debug, Clone)]
pub struct DonationRequestRepository {
    db: DatabaseConnection,
}

impl DonationRequestRepository {
    /// Creates a new donation request repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Creates a new request in Pending status with a zero balance.
    ///
    /// # Errors
    ///
    /// Returns `CategoryNotFound` if the category does not exist.
    pub async fn create(
        &self,
        input: CreateRequestInput,
    ) -> Result<donation_requests::Model, RequestError> {
        let category = categories::Entity::find_by_id(input.category_id)
            .one(&self.db)
            .await?;
        if category.is_none() {
            return Err(RequestError::CategoryNotFound(input.category_id));
        }

        let now = chrono::Utc::now().into();
        let request = donation_requests::ActiveModel {
            id: Set(Uuid::new_v4()),
            ngo_id: Set(input.ngo_id),
            category_id: Set(input.category_id),
            title: Set(input.title),
            description: Set(input.description),
            amount_needed: Set(input.amount_needed),
            amount_received: Set(Decimal::ZERO),
            image_url: Set(input.image_url),
            status: Set(RequestStatus::Pending),
            approved_by_admin_id: Set(None),
            approval_date: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        Ok(request.insert(&self.db).await?)
    }

    /// Finds a request by ID regardless of status (NGO/admin view).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(
        &self,
        id: Uuid,
    ) -> Result<Option<donation_requests::Model>, DbErr> {
        donation_requests::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a donor-visible request (Approved or Completed).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_visible(
        &self,
        id: Uuid,
    ) -> Result<Option<donation_requests::Model>, DbErr> {
        donation_requests::Entity::find_by_id(id)
            .filter(
                donation_requests::Column::Status
                    .is_in([RequestStatus::Approved, RequestStatus::Completed]),
            )
            .one(&self.db)
            .await
    }

    /// Lists donor-visible requests (Approved or Completed), newest
    /// first, optionally filtered by category.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_visible(
        &self,
        category_id: Option<Uuid>,
    ) -> Result<Vec<donation_requests::Model>, DbErr> {
        let mut query = donation_requests::Entity::find().filter(
            donation_requests::Column::Status
                .is_in([RequestStatus::Approved, RequestStatus::Completed]),
        );

        if let Some(category_id) = category_id {
            query = query.filter(donation_requests::Column::CategoryId.eq(category_id));
        }

        query
            .order_by_desc(donation_requests::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists all requests owned by an NGO profile, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_ngo(
        &self,
        ngo_id: Uuid,
    ) -> Result<Vec<donation_requests::Model>, DbErr> {
        donation_requests::Entity::find()
            .filter(donation_requests::Column::NgoId.eq(ngo_id))
            .order_by_desc(donation_requests::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Lists every request for admin moderation, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_all(&self) -> Result<Vec<donation_requests::Model>, DbErr> {
        donation_requests::Entity::find()
            .order_by_desc(donation_requests::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Updates a request on behalf of its owning NGO.
    ///
    /// Permitted while the request is not Completed. The balance, status,
    /// and approval fields are never client-writable; a lowered funding
    /// target may not undercut the amount already received.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the request does not exist or is not owned
    /// by `ngo_id`; `Moderation` if an edit guard fails.
    pub async fn update_by_owner(
        &self,
        request_id: Uuid,
        ngo_id: Uuid,
        input: UpdateRequestInput,
    ) -> Result<donation_requests::Model, RequestError> {
        let request = self.find_owned(request_id, ngo_id).await?;

        let new_needed = input.amount_needed.unwrap_or(request.amount_needed);
        ModerationService::validate_owner_update(
            request.status.clone().into(),
            Money::new(new_needed),
            Money::new(request.amount_received),
        )?;

        if let Some(category_id) = input.category_id {
            let category = categories::Entity::find_by_id(category_id)
                .one(&self.db)
                .await?;
            if category.is_none() {
                return Err(RequestError::CategoryNotFound(category_id));
            }
        }

        let mut active: donation_requests::ActiveModel = request.into();
        if let Some(title) = input.title {
            active.title = Set(title);
        }
        if let Some(description) = input.description {
            active.description = Set(description);
        }
        if let Some(amount_needed) = input.amount_needed {
            active.amount_needed = Set(amount_needed);
        }
        if let Some(category_id) = input.category_id {
            active.category_id = Set(category_id);
        }
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Records the durable image URL on a request owned by `ngo_id`.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing/unowned requests; `Moderation` if
    /// the request is Completed.
    pub async fn set_image_url(
        &self,
        request_id: Uuid,
        ngo_id: Uuid,
        image_url: String,
    ) -> Result<donation_requests::Model, RequestError> {
        let request = self.find_owned(request_id, ngo_id).await?;

        let status: kindra_core::moderation::RequestStatus = request.status.clone().into();
        if !status.is_editable() {
            return Err(ModerationError::CannotModifyCompleted.into());
        }

        let mut active: donation_requests::ActiveModel = request.into();
        active.image_url = Set(Some(image_url));
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Deletes a request on behalf of its owning NGO, cascading its
    /// donations in the same transaction.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` for missing/unowned requests; `Moderation` if
    /// the request is Completed.
    pub async fn delete_by_owner(
        &self,
        request_id: Uuid,
        ngo_id: Uuid,
    ) -> Result<(), RequestError> {
        let request = self.find_owned(request_id, ngo_id).await?;
        ModerationService::validate_owner_delete(request.status.into())?;

        let txn = self.db.begin().await?;

        donations::Entity::delete_many()
            .filter(donations::Column::DonationRequestId.eq(request_id))
            .exec(&txn)
            .await?;
        donation_requests::Entity::delete_by_id(request_id)
            .exec(&txn)
            .await?;

        txn.commit().await?;
        Ok(())
    }

    /// Approves a pending request, recording the approver and timestamp.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the request is missing; `Moderation` with
    /// `InvalidTransition` if it is not Pending (including when a
    /// concurrent moderation won the race).
    pub async fn approve(
        &self,
        request_id: Uuid,
        admin_id: Uuid,
    ) -> Result<donation_requests::Model, RequestError> {
        let request = donation_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or(RequestError::NotFound(request_id))?;

        let action =
            ModerationService::approve(request.status.into(), UserId::from_uuid(admin_id))?;
        self.apply_moderation(request_id, &action).await
    }

    /// Rejects a pending request (terminal).
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the request is missing; `Moderation` with
    /// `InvalidTransition` if it is not Pending.
    pub async fn reject(
        &self,
        request_id: Uuid,
    ) -> Result<donation_requests::Model, RequestError> {
        let request = donation_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or(RequestError::NotFound(request_id))?;

        let action = ModerationService::reject(request.status.into())?;
        self.apply_moderation(request_id, &action).await
    }

    /// Applies a moderation action under a status-guarded update.
    ///
    /// The WHERE clause re-asserts the action's guard status so a
    /// concurrent transition cannot double-apply; zero affected rows is
    /// classified by re-reading the row.
    async fn apply_moderation(
        &self,
        request_id: Uuid,
        action: &ModerationAction,
    ) -> Result<donation_requests::Model, RequestError> {
        let guard: RequestStatus = action.guard_status().into();
        let new_status: RequestStatus = action.new_status().into();

        let mut changes = donation_requests::ActiveModel {
            status: Set(new_status),
            updated_at: Set(chrono::Utc::now().into()),
            ..Default::default()
        };

        if let ModerationAction::Approve {
            approved_by,
            approved_at,
            ..
        } = action
        {
            changes.approved_by_admin_id = Set(Some(approved_by.into_inner()));
            changes.approval_date = Set(Some((*approved_at).into()));
        }

        let result = donation_requests::Entity::update_many()
            .set(changes)
            .filter(donation_requests::Column::Id.eq(request_id))
            .filter(donation_requests::Column::Status.eq(guard))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            // Lost a race: the row changed between read and update.
            let current = donation_requests::Entity::find_by_id(request_id)
                .one(&self.db)
                .await?
                .ok_or(RequestError::NotFound(request_id))?;
            return Err(ModerationError::InvalidTransition {
                from: current.status.into(),
                to: action.new_status(),
            }
            .into());
        }

        donation_requests::Entity::find_by_id(request_id)
            .one(&self.db)
            .await?
            .ok_or(RequestError::NotFound(request_id))
    }

    /// Finds a request owned by the given NGO profile.
    async fn find_owned(
        &self,
        request_id: Uuid,
        ngo_id: Uuid,
    ) -> Result<donation_requests::Model, RequestError> {
        donation_requests::Entity::find_by_id(request_id)
            .filter(donation_requests::Column::NgoId.eq(ngo_id))
            .one(&self.db)
            .await?
            .ok_or(RequestError::NotFound(request_id))
    }
}
