use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Transactions {
    Table,
    RecurringRuleId,
    CreatedAt,
}

/// One generated transaction per rule and occurrence date, even if two
/// generation runs overlap.
#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .name("uidx-transactions-recurring_rule_id-created_at")
                    .table(Transactions::Table)
                    .col(Transactions::RecurringRuleId)
                    .col(Transactions::CreatedAt)
                    .unique()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("uidx-transactions-recurring_rule_id-created_at")
                    .table(Transactions::Table)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
