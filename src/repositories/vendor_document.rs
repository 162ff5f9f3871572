//! # Document Store
//!
//! Associates uploaded document references with a vendor account. Documents
//! are only ever attached at signup; there is no update or delete path.

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::artifacts::{self, ArtifactStore};
use crate::models::user::Model as UserModel;
use crate::models::vendor_document::{
    ActiveModel as DocumentActiveModel, Column, Entity as VendorDocument, Model as DocumentModel,
};
use crate::repositories::RepositoryError;

/// An uploaded file: original filename plus decoded content.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub filename: String,
    pub content: Vec<u8>,
}

/// Repository for vendor document database operations
pub struct VendorDocumentRepository<'a> {
    db: &'a DatabaseConnection,
    artifacts: &'a ArtifactStore,
}

impl<'a> VendorDocumentRepository<'a> {
    pub fn new(db: &'a DatabaseConnection, artifacts: &'a ArtifactStore) -> Self {
        Self { db, artifacts }
    }

    /// Attach documents to a vendor, pairing titles and files positionally.
    ///
    /// The two lists are zipped: when their lengths differ, unmatched entries
    /// are silently dropped — callers are responsible for sending lists of
    /// equal length. Empty files are skipped. Returns whether at least one
    /// document was attached (callers use this to set `document_uploaded` on
    /// the vendor profile).
    pub async fn attach_documents(
        &self,
        vendor: &UserModel,
        titles: &[String],
        files: &[DocumentUpload],
    ) -> Result<bool, RepositoryError> {
        let mut attached = false;

        for (title, file) in titles.iter().zip(files.iter()) {
            if file.content.is_empty() {
                continue;
            }

            let id = Uuid::new_v4();
            let reference = self
                .artifacts
                .write(
                    artifacts::VENDOR_DOCS,
                    &format!("{}_{}", id, file.filename),
                    &file.content,
                )
                .map_err(RepositoryError::artifact)?;

            let document = DocumentActiveModel {
                id: Set(id),
                vendor_id: Set(vendor.id),
                title: Set(title.clone()),
                file: Set(reference),
                uploaded_at: Set(Utc::now().into()),
            };
            document.insert(self.db).await?;
            attached = true;
        }

        Ok(attached)
    }

    /// List all documents attached to a vendor, oldest first
    pub async fn list_for_vendor(
        &self,
        vendor_id: Uuid,
    ) -> Result<Vec<DocumentModel>, RepositoryError> {
        Ok(VendorDocument::find()
            .filter(Column::VendorId.eq(vendor_id))
            .order_by_asc(Column::UploadedAt)
            .all(self.db)
            .await?)
    }
}
