//! Initial schema: recurring rules and the transactions they generate.
//!
//! - `recurring_transactions`: standing instructions with their cursor
//! - `transactions`: concrete transactions, optionally linked to the rule that
//!   produced them

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum RecurringTransactions {
    Table,
    Id,
    OwnerId,
    CategoryId,
    AmountMinor,
    Description,
    Frequency,
    CreatedAt,
    EndDate,
    LastGenerated,
    NextOccurrence,
    IsActive,
}

#[derive(Iden)]
enum Transactions {
    Table,
    Id,
    OwnerId,
    CategoryId,
    AmountMinor,
    Description,
    CreatedAt,
    RecurringRuleId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(RecurringTransactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RecurringTransactions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(RecurringTransactions::OwnerId)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringTransactions::CategoryId)
                            .blob()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringTransactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringTransactions::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(
                        ColumnDef::new(RecurringTransactions::Frequency)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RecurringTransactions::CreatedAt)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(RecurringTransactions::EndDate).date())
                    .col(ColumnDef::new(RecurringTransactions::LastGenerated).date())
                    .col(ColumnDef::new(RecurringTransactions::NextOccurrence).date())
                    .col(
                        ColumnDef::new(RecurringTransactions::IsActive)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-recurring_transactions-is_active")
                    .table(RecurringTransactions::Table)
                    .col(RecurringTransactions::IsActive)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Transactions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Transactions::Id)
                            .blob()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Transactions::OwnerId).string().not_null())
                    .col(ColumnDef::new(Transactions::CategoryId).blob().not_null())
                    .col(
                        ColumnDef::new(Transactions::AmountMinor)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Transactions::Description)
                            .string()
                            .not_null()
                            .default(""),
                    )
                    .col(ColumnDef::new(Transactions::CreatedAt).date().not_null())
                    .col(ColumnDef::new(Transactions::RecurringRuleId).blob())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-transactions-recurring_rule_id")
                            .from(Transactions::Table, Transactions::RecurringRuleId)
                            .to(RecurringTransactions::Table, RecurringTransactions::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-transactions-owner_id-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::OwnerId)
                    .col(Transactions::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Transactions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RecurringTransactions::Table).to_owned())
            .await?;
        Ok(())
    }
}
