//! # Data Models
//!
//! This module contains all the data models used throughout the Fundbridge API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub mod investment;
pub mod session;
pub mod user;
pub mod vendor_document;
pub mod vendor_profile;

pub use investment::Entity as Investment;
pub use session::Entity as Session;
pub use user::Entity as User;
pub use vendor_document::Entity as VendorDocument;
pub use vendor_profile::Entity as VendorProfile;

/// Basic service information response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ServiceInfo {
    /// The name of the service
    pub service: String,
    /// The version of the service
    pub version: String,
}

impl Default for ServiceInfo {
    fn default() -> Self {
        Self {
            service: "fundbridge".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}
