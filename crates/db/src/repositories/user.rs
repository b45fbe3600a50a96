//! User repository for account registration and NGO moderation.

use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use uuid::Uuid;

use crate::entities::{donor_profiles, ngo_profiles, sea_orm_active_enums::UserRole, users};

/// Error types for user operations.
#[derive(Debug, thiserror::Error)]
pub enum UserError {
    /// Email already registered.
    #[error("Email is already registered")]
    EmailTaken,

    /// Username already taken.
    #[error("Username is already taken")]
    UsernameTaken,

    /// Organization name already taken.
    #[error("Organization name '{0}' is already taken")]
    OrganizationNameTaken(String),

    /// User not found.
    #[error("User not found: {0}")]
    NotFound(Uuid),

    /// The user is not an NGO account.
    #[error("User {0} is not an NGO account")]
    NotAnNgo(Uuid),

    /// Database error.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),
}

/// Input for registering a donor account.
#[derive(Debug, Clone)]
pub struct RegisterDonorInput {
    /// Unique username.
    pub username: String,
    /// Unique email.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Donor first name.
    pub first_name: String,
    /// Donor last name.
    pub last_name: String,
}

/// Input for registering an NGO account.
#[derive(Debug, Clone)]
pub struct RegisterNgoInput {
    /// Unique username.
    pub username: String,
    /// Unique email.
    pub email: String,
    /// Argon2id password hash.
    pub password_hash: String,
    /// Unique organization name.
    pub organization_name: String,
    /// Contact person name.
    pub contact_person: String,
}

/// User repository for account operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    db: DatabaseConnection,
}

impl UserRepository {
    /// Creates a new user repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Finds a user by ID.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find_by_id(id).one(&self.db).await
    }

    /// Finds a user by email.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn find_by_email(&self, email: &str) -> Result<Option<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .one(&self.db)
            .await
    }

    /// Registers a donor account with its profile in one transaction.
    ///
    /// Donor accounts are active immediately.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken`/`UsernameTaken` on uniqueness conflicts.
    pub async fn register_donor(
        &self,
        input: RegisterDonorInput,
    ) -> Result<users::Model, UserError> {
        self.check_identity_free(&input.email, &input.username).await?;

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let user_id = Uuid::new_v4();

        let user = users::ActiveModel {
            id: Set(user_id),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(UserRole::Donor),
            is_approved: Set(true),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let user = user.insert(&txn).await?;

        let profile = donor_profiles::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            first_name: Set(input.first_name),
            last_name: Set(input.last_name),
            created_at: Set(now),
            updated_at: Set(now),
        };
        profile.insert(&txn).await?;

        txn.commit().await?;
        Ok(user)
    }

    /// Registers an NGO account with its profile in one transaction.
    ///
    /// NGO accounts start unapproved and cannot log in until an admin
    /// approves them.
    ///
    /// # Errors
    ///
    /// Returns `EmailTaken`/`UsernameTaken`/`OrganizationNameTaken` on
    /// uniqueness conflicts.
    pub async fn register_ngo(&self, input: RegisterNgoInput) -> Result<users::Model, UserError> {
        self.check_identity_free(&input.email, &input.username).await?;

        let existing_org = ngo_profiles::Entity::find()
            .filter(ngo_profiles::Column::OrganizationName.eq(&input.organization_name))
            .one(&self.db)
            .await?;
        if existing_org.is_some() {
            return Err(UserError::OrganizationNameTaken(input.organization_name));
        }

        let txn = self.db.begin().await?;
        let now = chrono::Utc::now().into();
        let user_id = Uuid::new_v4();

        let user = users::ActiveModel {
            id: Set(user_id),
            username: Set(input.username),
            email: Set(input.email),
            password_hash: Set(input.password_hash),
            role: Set(UserRole::Ngo),
            is_approved: Set(false),
            created_at: Set(now),
            updated_at: Set(now),
        };
        let user = user.insert(&txn).await?;

        let profile = ngo_profiles::ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(user_id),
            organization_name: Set(input.organization_name),
            registration_number: Set(None),
            contact_person: Set(input.contact_person),
            phone_number: Set(None),
            address: Set(None),
            website_url: Set(None),
            description: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };
        profile.insert(&txn).await?;

        txn.commit().await?;
        Ok(user)
    }

    /// Lists NGO accounts awaiting admin approval, oldest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_pending_ngos(&self) -> Result<Vec<users::Model>, DbErr> {
        users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Ngo))
            .filter(users::Column::IsApproved.eq(false))
            .order_by_asc(users::Column::CreatedAt)
            .all(&self.db)
            .await
    }

    /// Approves an NGO account.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, `NotAnNgo` if the
    /// account does not hold the NGO role.
    pub async fn approve_ngo(&self, user_id: Uuid) -> Result<users::Model, UserError> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        if user.role != UserRole::Ngo {
            return Err(UserError::NotAnNgo(user_id));
        }

        let mut active: users::ActiveModel = user.into();
        active.is_approved = Set(true);
        active.updated_at = Set(chrono::Utc::now().into());

        Ok(active.update(&self.db).await?)
    }

    /// Rejects an NGO account, removing the account and its profile.
    ///
    /// Unapproved NGOs cannot have posted requests, so only the profile
    /// and user rows are removed.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, `NotAnNgo` if the
    /// account does not hold the NGO role.
    pub async fn reject_ngo(&self, user_id: Uuid) -> Result<(), UserError> {
        let user = users::Entity::find_by_id(user_id)
            .one(&self.db)
            .await?
            .ok_or(UserError::NotFound(user_id))?;

        if user.role != UserRole::Ngo {
            return Err(UserError::NotAnNgo(user_id));
        }

        let txn = self.db.begin().await?;

        ngo_profiles::Entity::delete_many()
            .filter(ngo_profiles::Column::UserId.eq(user_id))
            .exec(&txn)
            .await?;
        users::Entity::delete_by_id(user_id).exec(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Counts NGO accounts, total and pending approval.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ngo_counts(&self) -> Result<(u64, u64), DbErr> {
        let total = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Ngo))
            .count(&self.db)
            .await?;

        let pending = users::Entity::find()
            .filter(users::Column::Role.eq(UserRole::Ngo))
            .filter(users::Column::IsApproved.eq(false))
            .count(&self.db)
            .await?;

        Ok((total, pending))
    }

    /// Fails if the email or username is already registered.
    async fn check_identity_free(&self, email: &str, username: &str) -> Result<(), UserError> {
        let email_exists = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await?;
        if email_exists > 0 {
            return Err(UserError::EmailTaken);
        }

        let username_exists = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await?;
        if username_exists > 0 {
            return Err(UserError::UsernameTaken);
        }

        Ok(())
    }
}
