//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the
//! application. Each state-changing operation runs in one database
//! transaction and rolls back in full on any failure.

pub mod category;
pub mod donation;
pub mod profile;
pub mod request;
pub mod user;

pub use category::{CategoryError, CategoryRepository};
pub use donation::{DonationError, DonationHistoryEntry, DonationReceipt, DonationRepository};
pub use profile::ProfileRepository;
pub use request::{
    CreateRequestInput, DonationRequestRepository, RequestError, UpdateRequestInput,
};
pub use user::{RegisterDonorInput, RegisterNgoInput, UserError, UserRepository};
