//! # Vendor Identity Service
//!
//! Provisions vendor profiles and resolves the public short-ID tokens that
//! appear in verification and invest URLs. A profile and its QR image are
//! created together in a single step; no later operation rewrites the image,
//! so the username embedded in the QR payload may go stale by design.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::artifacts::{self, ArtifactStore};
use crate::models::user::Model as UserModel;
use crate::models::vendor_profile::{
    ActiveModel as ProfileActiveModel, Column, Entity as VendorProfile, Model as ProfileModel,
};
use crate::qr;
use crate::repositories::RepositoryError;

/// Number of leading characters of `unique_id` exposed in public URLs.
pub const SHORT_ID_LEN: usize = 16;

/// Repository for vendor profile database operations
pub struct VendorProfileRepository<'a> {
    db: &'a DatabaseConnection,
    artifacts: &'a ArtifactStore,
}

impl<'a> VendorProfileRepository<'a> {
    pub fn new(db: &'a DatabaseConnection, artifacts: &'a ArtifactStore) -> Self {
        Self { db, artifacts }
    }

    /// Create the profile for a freshly signed-up vendor.
    ///
    /// Mints a random identity token, renders its QR image, stores the image
    /// under `qr_codes/<username>_qr.png`, and inserts the row referencing
    /// it. Profile and QR artifact are never generated independently.
    pub async fn provision(
        &self,
        vendor: &UserModel,
        document_uploaded: bool,
    ) -> Result<ProfileModel, RepositoryError> {
        let unique_id = Uuid::new_v4().to_string();

        let payload = qr::vendor_qr_payload(&vendor.username, &unique_id);
        let png = qr::render_qr_png(&payload).map_err(RepositoryError::artifact)?;
        let qr_image = self
            .artifacts
            .write(
                artifacts::QR_CODES,
                &format!("{}_qr.png", vendor.username),
                &png,
            )
            .map_err(RepositoryError::artifact)?;

        let profile = ProfileActiveModel {
            id: Set(Uuid::new_v4()),
            vendor_id: Set(vendor.id),
            unique_id: Set(unique_id),
            document_uploaded: Set(document_uploaded),
            verified: Set(false),
            qr_image: Set(qr_image),
            created_at: Set(Utc::now().into()),
        };

        Ok(profile.insert(self.db).await?)
    }

    /// Resolve a profile from the leading characters of its identity token.
    ///
    /// Only the first [`SHORT_ID_LEN`] characters of `short_id` are used.
    /// When several profiles share a prefix the earliest-created row wins,
    /// giving a deterministic tie-break.
    pub async fn lookup_by_short_id(
        &self,
        short_id: &str,
    ) -> Result<Option<ProfileModel>, RepositoryError> {
        let prefix: String = short_id.chars().take(SHORT_ID_LEN).collect();

        // Identity tokens only contain hex digits and hyphens; anything else
        // (including LIKE wildcards) cannot match a stored value.
        if prefix.is_empty()
            || !prefix
                .chars()
                .all(|c| c.is_ascii_hexdigit() || c == '-')
        {
            return Ok(None);
        }

        Ok(VendorProfile::find()
            .filter(Column::UniqueId.starts_with(&prefix))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(self.db)
            .await?)
    }

    /// Get the profile belonging to a vendor user
    pub async fn get_by_vendor_id(
        &self,
        vendor_id: Uuid,
    ) -> Result<Option<ProfileModel>, RepositoryError> {
        Ok(VendorProfile::find()
            .filter(Column::VendorId.eq(vendor_id))
            .one(self.db)
            .await?)
    }
}
