//! Investment entity model
//!
//! One row per recorded investment. Rows are immutable after creation apart
//! from the single field-scoped update that writes `agreement_pdf` once the
//! artifact has been rendered against the durable id.

use sea_orm::ActiveModelBehavior;
use sea_orm::entity::prelude::*;
use sea_orm::prelude::{DateTimeWithTimeZone, Decimal};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "investments")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub investor_id: Uuid,

    pub vendor_id: Uuid,

    #[sea_orm(column_type = "Decimal(Some((12, 2)))")]
    pub amount: Decimal,

    #[sea_orm(column_type = "Decimal(Some((5, 2)))")]
    pub return_percent: Decimal,

    pub terms: String,

    pub date_invested: DateTimeWithTimeZone,

    /// Artifact reference under investment_agreements/; None only when the
    /// render step failed after the insert
    pub agreement_pdf: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::InvestorId",
        to = "super::user::Column::Id"
    )]
    Investor,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::VendorId",
        to = "super::user::Column::Id"
    )]
    Vendor,
}

impl ActiveModelBehavior for ActiveModel {}
