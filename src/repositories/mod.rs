//! # Repository Layer
//!
//! This module contains repository implementations that encapsulate SeaORM
//! operations for database entities, providing a clean API for data access.

use thiserror::Error;

pub mod investment;
pub mod session;
pub mod user;
pub mod vendor_document;
pub mod vendor_profile;

pub use investment::{InvestmentRecord, InvestmentRepository};
pub use session::SessionRepository;
pub use user::{CreateAccountRequest, UserRepository};
pub use vendor_document::{DocumentUpload, VendorDocumentRepository};
pub use vendor_profile::VendorProfileRepository;

/// Errors surfaced by repository operations.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("validation failed: {0}")]
    Validation(String),
    #[error("duplicate identity: {0}")]
    DuplicateIdentity(String),
    #[error("not found: {0}")]
    NotFound(String),
    #[error("artifact generation failed: {0}")]
    Artifact(#[source] anyhow::Error),
    #[error("password hashing failed: {0}")]
    PasswordHash(String),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
}

impl RepositoryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn artifact(source: impl Into<anyhow::Error>) -> Self {
        Self::Artifact(source.into())
    }
}
