//! Migration to create the vendor_documents table.
//!
//! Zero or more uploaded documents per vendor, created only at signup. There
//! is no update or delete path for rows in this table.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorDocuments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorDocuments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(VendorDocuments::VendorId).uuid().not_null())
                    .col(ColumnDef::new(VendorDocuments::Title).text().not_null())
                    .col(ColumnDef::new(VendorDocuments::File).text().not_null())
                    .col(
                        ColumnDef::new(VendorDocuments::UploadedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_documents_vendor_id")
                            .from(VendorDocuments::Table, VendorDocuments::VendorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_documents_vendor_id")
                    .table(VendorDocuments::Table)
                    .col(VendorDocuments::VendorId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorDocuments::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VendorDocuments {
    Table,
    Id,
    VendorId,
    Title,
    File,
    UploadedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
