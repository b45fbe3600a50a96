//! Donation request lifecycle management.
//!
//! This module implements the request status state machine that gates
//! what donors can see and what the ledger may act on.
//!
//! # Modules
//!
//! - `types` - Domain types (`RequestStatus`, `ModerationAction`)
//! - `error` - Moderation-specific error types
//! - `service` - State transition logic and edit guards

pub mod error;
pub mod service;
pub mod types;

pub use error::ModerationError;
pub use service::ModerationService;
pub use types::{ModerationAction, RequestStatus};
