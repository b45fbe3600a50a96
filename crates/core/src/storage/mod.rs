//! Object storage for cause images using Apache OpenDAL.
//!
//! The moderation gate stores only the durable URL this service returns
//! and never interprets the object's content. Supported backends:
//! - S3-compatible: Cloudflare R2, Supabase Storage, AWS S3
//! - Local filesystem (development only)

mod config;
mod error;
mod service;

pub use config::{StorageConfig, StorageProvider};
pub use error::StorageError;
pub use service::StorageService;
