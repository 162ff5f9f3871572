//! Migration to create the investments table.
//!
//! Each row records one investor contribution to one vendor. The agreement
//! PDF reference is nullable: the row is inserted first to obtain a durable
//! id, then patched with the rendered artifact reference.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Investments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Investments::InvestorId).uuid().not_null())
                    .col(ColumnDef::new(Investments::VendorId).uuid().not_null())
                    .col(
                        ColumnDef::new(Investments::Amount)
                            .decimal_len(12, 2)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Investments::ReturnPercent)
                            .decimal_len(5, 2)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Investments::Terms).text().not_null())
                    .col(
                        ColumnDef::new(Investments::DateInvested)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(ColumnDef::new(Investments::AgreementPdf).text().null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investments_investor_id")
                            .from(Investments::Table, Investments::InvestorId)
                            .to(Users::Table, Users::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_investments_vendor_id")
                            .from(Investments::Table, Investments::VendorId)
                            .to(Users::Table, Users::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_investments_investor_id")
                    .table(Investments::Table)
                    .col(Investments::InvestorId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_investments_vendor_id")
                    .table(Investments::Table)
                    .col(Investments::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Investments {
    Table,
    Id,
    InvestorId,
    VendorId,
    Amount,
    ReturnPercent,
    Terms,
    DateInvested,
    AgreementPdf,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
