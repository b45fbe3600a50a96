//! Donation ledger logic.
//!
//! This module implements the pure arithmetic of applying a donation to
//! a request: status and amount validation, the hard remaining-capacity
//! ceiling, and completion derivation. Persistence applies the resulting
//! plan atomically in the database layer.

pub mod error;
pub mod service;
pub mod types;

#[cfg(test)]
mod service_props;

pub use error::LedgerError;
pub use service::LedgerService;
pub use types::DonationPlan;
