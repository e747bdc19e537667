use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, Frequency, NewRecurringRule, RecurringRule, ResultEngine, Transaction,
    recurrence::{ReferenceDate, next_occurrence},
    recurring_rules, transactions,
    util::normalize_required_text,
};

use super::{Engine, with_tx};

impl Engine {
    /// Create a recurring rule with its cursor initialized.
    ///
    /// The first occurrence is the creation date when that is today or later,
    /// otherwise the occurrence following the creation date. A back-dated
    /// rule whose first occurrence is already past is not caught up.
    pub async fn create_recurring_rule(&self, new: NewRecurringRule) -> ResultEngine<RecurringRule> {
        let frequency = Frequency::try_from(new.frequency.as_str())?;
        let owner_id = normalize_required_text(&new.owner_id, "owner")?;
        if new.amount_minor == 0 {
            return Err(EngineError::InvalidRule(
                "amount_minor must not be 0".to_string(),
            ));
        }
        let start = new.created_at.to_date();
        if let Some(end_date) = new.end_date
            && end_date < start
        {
            return Err(EngineError::InvalidRule(format!(
                "end date {end_date} precedes start {start}"
            )));
        }

        let next = first_occurrence(frequency, new.created_at, self.today())?;
        let rule = RecurringRule {
            id: Uuid::new_v4(),
            owner_id,
            category_id: new.category_id,
            amount_minor: new.amount_minor,
            description: new.description.trim().to_string(),
            frequency,
            created_at: new.created_at,
            end_date: new.end_date,
            last_generated: None,
            next_occurrence: Some(next),
            is_active: true,
        };

        with_tx!(self, |db_tx| {
            recurring_rules::ActiveModel::from(&rule)
                .insert(&db_tx)
                .await?;
            tracing::debug!(
                rule_id = %rule.id,
                frequency = %rule.frequency,
                next_occurrence = %next,
                "recurring rule created"
            );
            Ok(rule)
        })
    }

    /// Look up a single rule, active or not.
    pub async fn recurring_rule(&self, rule_id: Uuid) -> ResultEngine<RecurringRule> {
        let model = recurring_rules::Entity::find_by_id(rule_id)
            .one(&self.database)
            .await?
            .ok_or_else(|| EngineError::KeyNotFound(rule_id.to_string()))?;
        RecurringRule::try_from(model)
    }

    /// All rules a generation run would consider, oldest first.
    ///
    /// Rows that cannot be read back (unknown frequency) are logged and left
    /// out; use [`Engine::recurring_rule`] to inspect one.
    pub async fn active_recurring_rules(&self) -> ResultEngine<Vec<RecurringRule>> {
        let models = recurring_rules::Entity::find()
            .filter(recurring_rules::Column::IsActive.eq(true))
            .order_by_asc(recurring_rules::Column::CreatedAt)
            .all(&self.database)
            .await?;

        let mut rules = Vec::with_capacity(models.len());
        for model in models {
            let rule_id = model.id;
            match RecurringRule::try_from(model) {
                Ok(rule) => rules.push(rule),
                Err(err) => tracing::warn!(%rule_id, "unreadable recurring rule: {err}"),
            }
        }
        Ok(rules)
    }

    /// Transactions materialized from `rule_id`, by occurrence date.
    pub async fn generated_transactions(&self, rule_id: Uuid) -> ResultEngine<Vec<Transaction>> {
        let models = transactions::Entity::find()
            .filter(transactions::Column::RecurringRuleId.eq(rule_id))
            .order_by_asc(transactions::Column::CreatedAt)
            .all(&self.database)
            .await?;
        Ok(models.into_iter().map(Transaction::from).collect())
    }
}

fn first_occurrence(
    frequency: Frequency,
    created_at: DateTime<Utc>,
    today: NaiveDate,
) -> ResultEngine<NaiveDate> {
    let start = created_at.to_date();
    if start >= today {
        return Ok(start);
    }
    next_occurrence(frequency, created_at)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn first_occurrence_keeps_future_start() {
        let created = Utc.with_ymd_and_hms(2024, 1, 20, 18, 30, 0).unwrap();
        assert_eq!(
            first_occurrence(Frequency::Monthly, created, date(2024, 1, 15)).unwrap(),
            date(2024, 1, 20)
        );
        assert_eq!(
            first_occurrence(Frequency::Monthly, created, date(2024, 1, 20)).unwrap(),
            date(2024, 1, 20)
        );
    }

    #[test]
    fn first_occurrence_of_back_dated_start_is_one_step_later() {
        let created = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        assert_eq!(
            first_occurrence(Frequency::Weekly, created, date(2024, 1, 20)).unwrap(),
            date(2024, 1, 17)
        );

        let created = Utc.with_ymd_and_hms(2024, 1, 31, 7, 0, 0).unwrap();
        let first = first_occurrence(Frequency::Monthly, created, date(2024, 4, 15)).unwrap();
        assert_eq!(first, date(2024, 2, 29));
        assert_eq!(first, next_occurrence(Frequency::Monthly, created).unwrap());
    }
}
