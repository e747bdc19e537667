//! Transaction primitives.
//!
//! Only the shape the generation run writes lives here; editing and deleting
//! transactions belongs to the CRUD layer.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::recurring_rules;

/// Appended to the rule description of every generated transaction.
pub const RECURRING_SUFFIX: &str = " (Recurring)";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub owner_id: String,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    /// The occurrence date, never the wall-clock time of generation.
    pub created_at: NaiveDate,
    pub recurring_rule_id: Option<Uuid>,
}

impl Transaction {
    /// Materialize the occurrence of `rule` falling on `occurrence`.
    pub(crate) fn from_rule(rule: &recurring_rules::Model, occurrence: NaiveDate) -> Self {
        Self {
            id: Uuid::new_v4(),
            owner_id: rule.owner_id.clone(),
            category_id: rule.category_id,
            amount_minor: rule.amount_minor,
            description: format!("{}{RECURRING_SUFFIX}", rule.description),
            created_at: occurrence,
            recurring_rule_id: Some(rule.id),
        }
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub created_at: Date,
    pub recurring_rule_id: Option<Uuid>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::recurring_rules::Entity",
        from = "Column::RecurringRuleId",
        to = "super::recurring_rules::Column::Id",
        on_update = "NoAction",
        on_delete = "SetNull"
    )]
    RecurringRule,
}

impl Related<super::recurring_rules::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RecurringRule.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id),
            owner_id: ActiveValue::Set(tx.owner_id.clone()),
            category_id: ActiveValue::Set(tx.category_id),
            amount_minor: ActiveValue::Set(tx.amount_minor),
            description: ActiveValue::Set(tx.description.clone()),
            created_at: ActiveValue::Set(tx.created_at),
            recurring_rule_id: ActiveValue::Set(tx.recurring_rule_id),
        }
    }
}

impl From<Model> for Transaction {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            owner_id: model.owner_id,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            description: model.description,
            created_at: model.created_at,
            recurring_rule_id: model.recurring_rule_id,
        }
    }
}
