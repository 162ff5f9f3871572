//! Vendor profile entity model
//!
//! One row per vendor user, created immediately after the vendor account.
//! `unique_id` is the hyphenated text form of a random UUIDv4 minted once at
//! provision time; `qr_image` references the PNG rendered from it in the same
//! step and is never rewritten afterwards, even if the username changes.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "vendor_profiles")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// 1:1 with a user of role vendor
    #[sea_orm(unique)]
    pub vendor_id: Uuid,

    /// Textual 128-bit identity token; the first 16 characters are the
    /// public short ID used in verification and invest URLs
    #[sea_orm(unique)]
    pub unique_id: String,

    pub document_uploaded: bool,

    pub verified: bool,

    /// Artifact reference under qr_codes/
    pub qr_image: String,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VendorId",
        to = "super::user::Column::Id"
    )]
    Vendor,
}

impl ActiveModelBehavior for ActiveModel {}
