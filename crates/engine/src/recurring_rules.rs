//! Recurring rules.
//!
//! A `RecurringRule` is a standing instruction to produce one `Transaction`
//! per occurrence. The CRUD layer creates it; afterwards only the generation
//! run touches `last_generated`, `next_occurrence` and `is_active`.

use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, Frequency};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurringRule {
    pub id: Uuid,
    pub owner_id: String,
    pub category_id: Uuid,
    /// Signed amount in minor units, copied into every generated transaction.
    pub amount_minor: i64,
    pub description: String,
    pub frequency: Frequency,
    /// Anchor of the occurrence sequence.
    pub created_at: DateTime<Utc>,
    /// Last date an occurrence may fall on.
    pub end_date: Option<NaiveDate>,
    pub last_generated: Option<NaiveDate>,
    /// Persisted cursor: the date the next run has to match to generate.
    pub next_occurrence: Option<NaiveDate>,
    pub is_active: bool,
}

/// Input for [`Engine::create_recurring_rule`](crate::Engine::create_recurring_rule).
///
/// `frequency` stays a string here so an unknown value is rejected with
/// [`EngineError::InvalidFrequency`] instead of being coerced.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewRecurringRule {
    pub owner_id: String,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub frequency: String,
    pub created_at: DateTime<Utc>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "recurring_transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub owner_id: String,
    pub category_id: Uuid,
    pub amount_minor: i64,
    pub description: String,
    pub frequency: String,
    pub created_at: DateTimeUtc,
    pub end_date: Option<Date>,
    pub last_generated: Option<Date>,
    pub next_occurrence: Option<Date>,
    pub is_active: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::transactions::Entity")]
    Transactions,
}

impl Related<super::transactions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Transactions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&RecurringRule> for ActiveModel {
    fn from(rule: &RecurringRule) -> Self {
        Self {
            id: ActiveValue::Set(rule.id),
            owner_id: ActiveValue::Set(rule.owner_id.clone()),
            category_id: ActiveValue::Set(rule.category_id),
            amount_minor: ActiveValue::Set(rule.amount_minor),
            description: ActiveValue::Set(rule.description.clone()),
            frequency: ActiveValue::Set(rule.frequency.as_str().to_string()),
            created_at: ActiveValue::Set(rule.created_at),
            end_date: ActiveValue::Set(rule.end_date),
            last_generated: ActiveValue::Set(rule.last_generated),
            next_occurrence: ActiveValue::Set(rule.next_occurrence),
            is_active: ActiveValue::Set(rule.is_active),
        }
    }
}

impl TryFrom<Model> for RecurringRule {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: model.id,
            owner_id: model.owner_id,
            category_id: model.category_id,
            amount_minor: model.amount_minor,
            description: model.description,
            frequency: Frequency::try_from(model.frequency.as_str())?,
            created_at: model.created_at,
            end_date: model.end_date,
            last_generated: model.last_generated,
            next_occurrence: model.next_occurrence,
            is_active: model.is_active,
        })
    }
}
