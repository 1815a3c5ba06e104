//! Initial schema for the shop ledger.
//!
//! - `accounts`: shop members and their cached balance
//! - `categories`: catalog sections, replaced on every import
//! - `catalog_items`: goods and cash denominations, with cached stock
//! - `stock_receipts`: restock batches
//! - `ledger_entries`: active consumption records
//! - `canceled_ledger_entries`: archived consumption records
//! - `cash_movements`: drawer aggregate and withdrawals

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

// ─────────────────────────────────────────────────────────────────────────────
// Table identifiers
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Iden)]
enum Accounts {
    Table,
    Uid,
    PasswordHash,
    PasswordSalt,
    GroupName,
    Name,
    Balance,
    CreatedAt,
}

#[derive(Iden)]
enum Categories {
    Table,
    Id,
    Title,
    Position,
}

#[derive(Iden)]
enum CatalogItems {
    Table,
    Jan,
    Name,
    Price,
    Cost,
    Divide,
    CategoryId,
    DisplayOrder,
    Stock,
}

#[derive(Iden)]
enum StockReceipts {
    Table,
    Id,
    Jan,
    Cost,
    Quantity,
    Divide,
    RecordedBy,
    RecordedAt,
}

#[derive(Iden)]
enum LedgerEntries {
    Table,
    Id,
    AccountId,
    Jan,
    Amount,
    RecordedAt,
}

#[derive(Iden)]
enum CanceledLedgerEntries {
    Table,
    Id,
    AccountId,
    Jan,
    Amount,
    RecordedAt,
    CanceledAt,
}

#[derive(Iden)]
enum CashMovements {
    Table,
    Id,
    Kind,
    AccountLabel,
    Amount,
    RecordedAt,
}

// ─────────────────────────────────────────────────────────────────────────────
// Migration implementation
// ─────────────────────────────────────────────────────────────────────────────

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ───────────────────────────────────────────────────────────────────
        // 1. Accounts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Accounts::Uid)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::PasswordSalt).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::GroupName)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(ColumnDef::new(Accounts::Name).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::Balance)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .col(ColumnDef::new(Accounts::CreatedAt).timestamp().not_null())
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 2. Catalog
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(Categories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Categories::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Categories::Title).string().not_null())
                    .col(ColumnDef::new(Categories::Position).integer().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CatalogItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CatalogItems::Jan)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CatalogItems::Name).string().not_null())
                    .col(ColumnDef::new(CatalogItems::Price).big_integer().not_null())
                    .col(ColumnDef::new(CatalogItems::Cost).big_integer().not_null())
                    .col(ColumnDef::new(CatalogItems::Divide).big_integer().not_null())
                    .col(ColumnDef::new(CatalogItems::CategoryId).string().not_null())
                    .col(
                        ColumnDef::new(CatalogItems::DisplayOrder)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CatalogItems::Stock)
                            .big_integer()
                            .not_null()
                            .default(0),
                    )
                    .to_owned(),
            )
            .await?;

        // Catalog import swaps both tables wholesale, so there is no FK from
        // catalog_items to categories.
        manager
            .create_index(
                Index::create()
                    .name("idx-catalog_items-category_id")
                    .table(CatalogItems::Table)
                    .col(CatalogItems::CategoryId)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 3. Stock receipts
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(StockReceipts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StockReceipts::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(StockReceipts::Jan).string().not_null())
                    .col(ColumnDef::new(StockReceipts::Cost).big_integer().not_null())
                    .col(
                        ColumnDef::new(StockReceipts::Quantity)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StockReceipts::Divide).big_integer().not_null())
                    .col(ColumnDef::new(StockReceipts::RecordedBy).string().not_null())
                    .col(
                        ColumnDef::new(StockReceipts::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-stock_receipts-jan")
                    .table(StockReceipts::Table)
                    .col(StockReceipts::Jan)
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 4. Ledger entries (active + archive)
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(LedgerEntries::AccountId).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Jan).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(LedgerEntries::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-account_id-recorded_at")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::AccountId)
                    .col(LedgerEntries::RecordedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-ledger_entries-jan")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::Jan)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(CanceledLedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CanceledLedgerEntries::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CanceledLedgerEntries::AccountId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CanceledLedgerEntries::Jan).string().not_null())
                    .col(
                        ColumnDef::new(CanceledLedgerEntries::Amount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CanceledLedgerEntries::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CanceledLedgerEntries::CanceledAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // ───────────────────────────────────────────────────────────────────
        // 5. Cash movements
        // ───────────────────────────────────────────────────────────────────
        manager
            .create_table(
                Table::create()
                    .table(CashMovements::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CashMovements::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CashMovements::Kind).string().not_null())
                    .col(ColumnDef::new(CashMovements::AccountLabel).string().not_null())
                    .col(ColumnDef::new(CashMovements::Amount).big_integer().not_null())
                    .col(
                        ColumnDef::new(CashMovements::RecordedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-cash_movements-kind-account_label")
                    .table(CashMovements::Table)
                    .col(CashMovements::Kind)
                    .col(CashMovements::AccountLabel)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CashMovements::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CanceledLedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(LedgerEntries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(StockReceipts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CatalogItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Categories::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        Ok(())
    }
}
