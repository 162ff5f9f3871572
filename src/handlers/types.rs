//! # Common API Types
//!
//! Shared response structures used across multiple API handlers.

use chrono::{DateTime, FixedOffset};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::user::{self, Role};
use crate::models::{vendor_document, vendor_profile};
use crate::repositories::InvestmentRecord;
use crate::repositories::vendor_profile::SHORT_ID_LEN;

/// Public view of an account, safe to return to its owner
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountSummary {
    /// Unique account identifier
    #[schema(example = "550e8400-e29b-41d4-a716-446655440000")]
    pub id: Uuid,
    #[schema(example = "alice")]
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
}

impl From<user::Model> for AccountSummary {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            phone: user.phone,
            role: user.role,
        }
    }
}

/// Successful login/signup response: a bearer token plus the account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AuthResponse {
    /// Opaque bearer token for subsequent requests
    pub token: String,
    pub account: AccountSummary,
}

/// Public view of a vendor's identity profile
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct VendorProfileView {
    /// Full identity token
    pub unique_id: String,
    /// Leading characters of the identity token used in public URLs
    #[schema(example = "550e8400-e29b-41")]
    pub short_id: String,
    pub document_uploaded: bool,
    pub verified: bool,
    /// Artifact reference of the vendor's QR image
    #[schema(example = "qr_codes/alice_qr.png")]
    pub qr_image: String,
}

impl From<vendor_profile::Model> for VendorProfileView {
    fn from(profile: vendor_profile::Model) -> Self {
        let short_id = profile.unique_id.chars().take(SHORT_ID_LEN).collect();
        Self {
            unique_id: profile.unique_id,
            short_id,
            document_uploaded: profile.document_uploaded,
            verified: profile.verified,
            qr_image: profile.qr_image,
        }
    }
}

/// A document attached to a vendor account
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct DocumentView {
    pub id: Uuid,
    #[schema(example = "ID Proof")]
    pub title: String,
    /// Artifact reference of the stored file
    pub file: String,
    pub uploaded_at: DateTime<FixedOffset>,
}

impl From<vendor_document::Model> for DocumentView {
    fn from(document: vendor_document::Model) -> Self {
        Self {
            id: document.id,
            title: document.title,
            file: document.file,
            uploaded_at: document.uploaded_at,
        }
    }
}

/// An investment row with the usernames on both sides
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct InvestmentView {
    pub id: Uuid,
    #[schema(example = "ivy")]
    pub investor: String,
    #[schema(example = "alice")]
    pub vendor: String,
    #[schema(value_type = String, example = "10000.00")]
    pub amount: Decimal,
    #[schema(value_type = String, example = "5.00")]
    pub return_percent: Decimal,
    pub terms: String,
    pub date_invested: DateTime<FixedOffset>,
    /// Artifact reference of the agreement PDF; absent when rendering failed
    pub agreement_pdf: Option<String>,
}

impl From<InvestmentRecord> for InvestmentView {
    fn from(record: InvestmentRecord) -> Self {
        Self {
            id: record.investment.id,
            investor: record.investor_username,
            vendor: record.vendor_username,
            amount: record.investment.amount,
            return_percent: record.investment.return_percent,
            terms: record.investment.terms,
            date_invested: record.investment.date_invested,
            agreement_pdf: record.investment.agreement_pdf,
        }
    }
}
