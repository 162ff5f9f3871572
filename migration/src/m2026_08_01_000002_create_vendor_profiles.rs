//! Migration to create the vendor_profiles table.
//!
//! One profile per vendor user. The 128-bit identity token is stored in its
//! hyphenated textual form so public short-ID lookups are a plain prefix
//! query against the column.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(VendorProfiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(VendorProfiles::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::VendorId)
                            .uuid()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::UniqueId)
                            .text()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::DocumentUploaded)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(VendorProfiles::Verified)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(VendorProfiles::QrImage).text().not_null())
                    .col(
                        ColumnDef::new(VendorProfiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_vendor_profiles_vendor_id")
                            .from(VendorProfiles::Table, VendorProfiles::VendorId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Prefix lookups scan this index.
        manager
            .create_index(
                Index::create()
                    .name("idx_vendor_profiles_unique_id")
                    .table(VendorProfiles::Table)
                    .col(VendorProfiles::UniqueId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(VendorProfiles::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum VendorProfiles {
    Table,
    Id,
    VendorId,
    UniqueId,
    DocumentUploaded,
    Verified,
    QrImage,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}
