//! The generation run: materializes due occurrences of every active rule.
//!
//! One run is one DB transaction. Per-rule problems (unknown frequency, a
//! missing cursor) are logged and the rule is skipped; any store error
//! aborts the run and nothing of it is persisted.

use chrono::NaiveDate;
use sea_orm::{
    ActiveValue, DatabaseTransaction, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{
    EngineError, ResultEngine, Transaction, recurrence::calculate_next_occurrence,
    recurring_rules, transactions,
};

use super::{Engine, with_tx};

/// Counters of a single generation run.
///
/// `skipped` counts every active rule that produced no transaction;
/// `deactivated` and `failed` break part of it down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generated: usize,
    pub skipped: usize,
    /// Rules retired because their cursor passed the end date.
    pub deactivated: usize,
    /// Rules skipped because of a data defect (unknown frequency, missing cursor).
    pub failed: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum RuleOutcome {
    Generated,
    NotDue,
    Expired,
    Failed,
}

impl GenerationReport {
    fn record(&mut self, outcome: RuleOutcome) {
        match outcome {
            RuleOutcome::Generated => self.generated += 1,
            RuleOutcome::NotDue => self.skipped += 1,
            RuleOutcome::Expired => {
                self.skipped += 1;
                self.deactivated += 1;
            }
            RuleOutcome::Failed => {
                self.skipped += 1;
                self.failed += 1;
            }
        }
    }
}

impl Engine {
    /// Generate the transactions due on `today` (the clock's date when `None`).
    ///
    /// A rule is due only when its cursor equals the run date exactly; past
    /// occurrences missed while no run happened are not backfilled. Running
    /// twice for the same date generates each occurrence at most once, since
    /// the first run moves the cursor past it.
    ///
    /// Returns [`EngineError::Persistence`] when the store fails; the whole
    /// run is rolled back and can be retried.
    pub async fn generate_pending_transactions(
        &self,
        today: Option<NaiveDate>,
    ) -> ResultEngine<GenerationReport> {
        let today = today.unwrap_or_else(|| self.today());
        let _guard = self.generation_lock.lock().await;

        match self.run_generation(today).await {
            Ok(report) => {
                tracing::info!(
                    %today,
                    generated = report.generated,
                    skipped = report.skipped,
                    deactivated = report.deactivated,
                    failed = report.failed,
                    "recurring generation run committed"
                );
                Ok(report)
            }
            Err(err) => {
                tracing::error!(%today, "recurring generation run rolled back: {err}");
                Err(err)
            }
        }
    }

    async fn run_generation(&self, today: NaiveDate) -> ResultEngine<GenerationReport> {
        with_tx!(self, |db_tx| {
            let rules = recurring_rules::Entity::find()
                .filter(recurring_rules::Column::IsActive.eq(true))
                .order_by_asc(recurring_rules::Column::CreatedAt)
                .all(&db_tx)
                .await?;

            let mut report = GenerationReport::default();
            for rule in rules {
                let outcome = process_rule(&db_tx, rule, today).await?;
                report.record(outcome);
            }
            Ok(report)
        })
    }
}

async fn process_rule(
    db_tx: &DatabaseTransaction,
    rule: recurring_rules::Model,
    today: NaiveDate,
) -> ResultEngine<RuleOutcome> {
    let Some(occurrence) = rule.next_occurrence else {
        let err = EngineError::MissingNextOccurrence(rule.id.to_string());
        tracing::warn!(rule_id = %rule.id, "skipping rule: {err}");
        return Ok(RuleOutcome::Failed);
    };

    if occurrence != today {
        if occurrence < today {
            tracing::debug!(
                rule_id = %rule.id,
                %occurrence,
                %today,
                "occurrence missed, not backfilled"
            );
        }
        return Ok(RuleOutcome::NotDue);
    }

    if let Some(end_date) = rule.end_date
        && occurrence > end_date
    {
        let rule_id = rule.id;
        let mut active: recurring_rules::ActiveModel = rule.into();
        active.is_active = ActiveValue::Set(false);
        active.update(db_tx).await?;
        tracing::info!(%rule_id, %occurrence, %end_date, "recurring rule expired");
        return Ok(RuleOutcome::Expired);
    }

    // Computed before any write so a bad frequency leaves the rule untouched.
    let next = match calculate_next_occurrence(&rule.frequency, occurrence) {
        Ok(next) => next,
        Err(err) => {
            tracing::warn!(
                rule_id = %rule.id,
                frequency = %rule.frequency,
                "skipping rule: {err}"
            );
            return Ok(RuleOutcome::Failed);
        }
    };

    let tx = Transaction::from_rule(&rule, occurrence);
    transactions::ActiveModel::from(&tx).insert(db_tx).await?;

    let rule_id = rule.id;
    let mut active: recurring_rules::ActiveModel = rule.into();
    active.last_generated = ActiveValue::Set(Some(occurrence));
    active.next_occurrence = ActiveValue::Set(Some(next));
    active.update(db_tx).await?;

    tracing::debug!(
        %rule_id,
        transaction_id = %tx.id,
        %occurrence,
        next_occurrence = %next,
        "recurring transaction generated"
    );
    Ok(RuleOutcome::Generated)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_counts_skips_by_reason() {
        let mut report = GenerationReport::default();
        for outcome in [
            RuleOutcome::Generated,
            RuleOutcome::NotDue,
            RuleOutcome::Expired,
            RuleOutcome::Failed,
            RuleOutcome::Generated,
        ] {
            report.record(outcome);
        }
        assert_eq!(
            report,
            GenerationReport {
                generated: 2,
                skipped: 3,
                deactivated: 1,
                failed: 1,
            }
        );
    }
}
