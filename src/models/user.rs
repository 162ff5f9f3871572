//! User entity model
//!
//! This module contains the SeaORM entity model for the users table, which
//! stores account identity for both vendors and investors. The compound
//! unique index on (national_id, role) lives in the schema, so duplicate
//! identities surface as constraint violations rather than racy lookups.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::DateTimeWithTimeZone;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account role; immutable after creation.
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(20))")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[sea_orm(string_value = "vendor")]
    Vendor,
    #[sea_orm(string_value = "investor")]
    Investor,
}

/// User entity representing a vendor or investor account
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    /// Unique identifier for the user (primary key)
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Display name, unique across both roles
    #[sea_orm(unique)]
    pub username: String,

    pub email: String,

    pub phone: String,

    /// Government-ID-like login key; unique per role
    pub national_id: String,

    /// Argon2id password hash in PHC string format
    pub password_hash: String,

    pub role: Role,

    pub created_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
