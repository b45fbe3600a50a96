//! Donation repository — the persistence half of the donation ledger.
//!
//! `apply_donation` runs as one database transaction. The balance is
//! advanced by a single guarded UPDATE whose WHERE clause re-asserts the
//! ledger guards (`status = 'approved'` and `amount_received + :amt <=
//! amount_needed`), so two concurrent donations can never both pass the
//! ceiling check against a stale balance: the second statement matches
//! zero rows and the donation fails whole. No observer sees a donation
//! row without the matching balance update.

use std::collections::HashMap;

use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, ExprTrait};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DatabaseTransaction, DbErr, EntityTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use uuid::Uuid;

use tracing::{debug, warn};

use kindra_core::ledger::{LedgerError, LedgerService};
use kindra_core::moderation::ModerationService;
use kindra_shared::types::Money;

use crate::entities::{
    donation_requests, donations, ngo_profiles, sea_orm_active_enums::RequestStatus,
};

/// Error types for donation operations.
#[derive(Debug, thiserror::Error)]
pub enum DonationError {
    /// Target request not found.
    #[error("Donation request not found: {0}")]
    RequestNotFound(Uuid),

    /// A ledger guard failed (state, amount, or ceiling).
    #[error(transparent)]
    Ledger(#[from] LedgerError),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// The result of a successful donation: the immutable donation row and
/// the request snapshot after the balance update.
#[derive(Debug, Clone)]
pub struct DonationReceipt {
    /// The created donation.
    pub donation: donations::Model,
    /// The updated request (balance advanced, possibly Completed).
    pub request: donation_requests::Model,
}

/// One row of a donor's history with denormalized display data.
#[derive(Debug, Clone)]
pub struct DonationHistoryEntry {
    /// The donation.
    pub donation: donations::Model,
    /// Title of the funded request.
    pub request_title: String,
    /// Organization name of the NGO behind the request.
    pub organization_name: String,
}

/// Donation repository.
#[derive(Debug, Clone)]
pub struct DonationRepository {
    db: DatabaseConnection,
}

impl DonationRepository {
    /// Creates a new donation repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Applies a donation to an approved request.
    ///
    /// Within one transaction: advance the balance via the guarded
    /// UPDATE, insert the immutable donation row, and flip the request
    /// to Completed when it reaches its target. Any failure rolls the
    /// whole operation back.
    ///
    /// # Errors
    ///
    /// * `RequestNotFound` if the request id does not resolve
    /// * `Ledger(InvalidState)` for donations to non-Approved requests
    /// * `Ledger(InvalidAmount)` for non-positive amounts
    /// * `Ledger(AmountExceedsRemaining)` if the amount overshoots the
    ///   remaining capacity (hard ceiling, no partial acceptance)
    pub async fn apply_donation(
        &self,
        request_id: Uuid,
        donor_profile_id: Uuid,
        amount: Money,
    ) -> Result<DonationReceipt, DonationError> {
        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount {
                amount: amount.amount(),
            }
            .into());
        }

        let txn = self.db.begin().await?;

        let request = donation_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or(DonationError::RequestNotFound(request_id))?;

        // Fast-fail on the snapshot; the UPDATE below re-asserts the
        // same guards atomically.
        LedgerService::plan_donation(
            request.status.into(),
            Money::new(request.amount_needed),
            Money::new(request.amount_received),
            amount,
        )?;

        let amt = amount.amount();
        let result = donation_requests::Entity::update_many()
            .col_expr(
                donation_requests::Column::AmountReceived,
                Expr::col(donation_requests::Column::AmountReceived).add(amt),
            )
            .col_expr(
                donation_requests::Column::UpdatedAt,
                Expr::value(chrono::Utc::now()),
            )
            .filter(donation_requests::Column::Id.eq(request_id))
            .filter(donation_requests::Column::Status.eq(RequestStatus::Approved))
            .filter(
                Expr::col(donation_requests::Column::AmountReceived)
                    .add(amt)
                    .lte(Expr::col(donation_requests::Column::AmountNeeded)),
            )
            .exec(&txn)
            .await?;

        if result.rows_affected == 0 {
            let err = Self::classify_rejection(&txn, request_id, amount).await?;
            warn!(%request_id, amount = %amt, error = %err, "Donation rejected by balance guard");
            txn.rollback().await?;
            return Err(err);
        }

        let donation = donations::ActiveModel {
            id: Set(Uuid::new_v4()),
            donor_id: Set(donor_profile_id),
            donation_request_id: Set(request_id),
            amount_donated: Set(amt),
            transaction_ref: Set(None),
            created_at: Set(chrono::Utc::now().into()),
        };
        let donation = donation.insert(&txn).await?;

        // The incremented row is locked by this transaction; the
        // completion flip cannot race another donation.
        let mut updated = donation_requests::Entity::find_by_id(request_id)
            .one(&txn)
            .await?
            .ok_or(DonationError::RequestNotFound(request_id))?;

        // The guarded update only matches Approved rows, so completion
        // is always a valid transition here.
        if updated.amount_received >= updated.amount_needed
            && let Ok(action) = ModerationService::complete(updated.status.clone().into())
        {
            let mut active: donation_requests::ActiveModel = updated.into();
            active.status = Set(action.new_status().into());
            active.updated_at = Set(chrono::Utc::now().into());
            updated = active.update(&txn).await?;
        }

        txn.commit().await?;

        debug!(
            %request_id,
            donation_id = %donation.id,
            amount = %amt,
            amount_received = %updated.amount_received,
            status = ?updated.status,
            "Donation applied"
        );

        Ok(DonationReceipt {
            donation,
            request: updated,
        })
    }

    /// Classifies a guarded-update miss by re-reading the row.
    async fn classify_rejection(
        txn: &DatabaseTransaction,
        request_id: Uuid,
        amount: Money,
    ) -> Result<DonationError, DbErr> {
        let Some(current) = donation_requests::Entity::find_by_id(request_id)
            .one(txn)
            .await?
        else {
            return Ok(DonationError::RequestNotFound(request_id));
        };

        let status: kindra_core::moderation::RequestStatus = current.status.into();
        if !status.is_open_for_donations() {
            return Ok(LedgerError::InvalidState { status }.into());
        }

        let remaining = LedgerService::remaining(
            Money::new(current.amount_needed),
            Money::new(current.amount_received),
        );
        Ok(LedgerError::AmountExceedsRemaining {
            amount: amount.amount(),
            remaining: remaining.amount(),
        }
        .into())
    }

    /// Returns a donor's donation history, newest first, with the
    /// request title and NGO organization name denormalized for display.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn history_for_donor(
        &self,
        donor_profile_id: Uuid,
    ) -> Result<Vec<DonationHistoryEntry>, DbErr> {
        let donation_rows = donations::Entity::find()
            .filter(donations::Column::DonorId.eq(donor_profile_id))
            .order_by_desc(donations::Column::CreatedAt)
            .all(&self.db)
            .await?;

        if donation_rows.is_empty() {
            return Ok(Vec::new());
        }

        let request_ids: Vec<Uuid> = donation_rows
            .iter()
            .map(|d| d.donation_request_id)
            .collect();
        let requests: HashMap<Uuid, donation_requests::Model> = donation_requests::Entity::find()
            .filter(donation_requests::Column::Id.is_in(request_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|r| (r.id, r))
            .collect();

        let ngo_ids: Vec<Uuid> = requests.values().map(|r| r.ngo_id).collect();
        let ngos: HashMap<Uuid, ngo_profiles::Model> = ngo_profiles::Entity::find()
            .filter(ngo_profiles::Column::Id.is_in(ngo_ids))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|n| (n.id, n))
            .collect();

        let entries = donation_rows
            .into_iter()
            .map(|donation| {
                let request = requests.get(&donation.donation_request_id);
                let organization_name = request
                    .and_then(|r| ngos.get(&r.ngo_id))
                    .map_or_else(String::new, |n| n.organization_name.clone());
                DonationHistoryEntry {
                    request_title: request.map_or_else(String::new, |r| r.title.clone()),
                    organization_name,
                    donation,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Lists the donations made against a request, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_for_request(
        &self,
        request_id: Uuid,
    ) -> Result<Vec<donations::Model>, DbErr> {
        donations::Entity::find()
            .filter(donations::Column::DonationRequestId.eq(request_id))
            .order_by_desc(donations::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Sum of all donations across the platform (admin dashboard).
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn total_donated(&self) -> Result<Decimal, DbErr> {
        let total: Option<Option<Decimal>> = donations::Entity::find()
            .select_only()
            .column_as(Expr::col(donations::Column::AmountDonated).sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await?;

        Ok(total.flatten().unwrap_or(Decimal::ZERO))
    }
}
