use std::error::Error;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use engine::{Engine, NewRecurringRule, format_amount_minor, parse_amount_minor};
use migration::{Migrator, MigratorTrait};
use settings::Database;
use uuid::Uuid;

mod scheduler;
mod settings;

#[derive(Parser, Debug)]
#[command(name = "budget_buddy")]
#[command(about = "Recurring transaction generation for Budget Buddy")]
struct Cli {
    /// Settings file, without extension.
    #[arg(long, default_value = "settings")]
    config: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run once at startup, then every day at `scheduler.run_at` (default).
    Run,
    /// Run a single generation pass.
    Generate(GenerateArgs),
    Rule(Rule),
    /// Apply or inspect schema migrations.
    Migrate(MigrateArgs),
}

#[derive(Args, Debug)]
struct MigrateArgs {
    #[arg(value_enum, default_value = "up")]
    action: MigrateAction,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum MigrateAction {
    Up,
    Down,
    Fresh,
    Status,
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Run date (`YYYY-MM-DD`); today when omitted.
    #[arg(long)]
    date: Option<NaiveDate>,
}

#[derive(Args, Debug)]
struct Rule {
    #[command(subcommand)]
    command: RuleCommand,
}

#[derive(Subcommand, Debug)]
enum RuleCommand {
    Create(RuleCreateArgs),
    List,
}

#[derive(Args, Debug)]
struct RuleCreateArgs {
    #[arg(long)]
    owner: String,
    #[arg(long)]
    category: Uuid,
    /// Signed amount, e.g. `-12.50`.
    #[arg(long, allow_hyphen_values = true)]
    amount: String,
    #[arg(long, default_value = "")]
    description: String,
    /// One of `daily`, `weekly`, `monthly`, `yearly`.
    #[arg(long)]
    frequency: String,
    /// First occurrence (`YYYY-MM-DD`); today when omitted.
    #[arg(long)]
    start: Option<NaiveDate>,
    /// Last date an occurrence may fall on.
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync>> {
    let cli = Cli::parse();
    let settings = settings::Settings::new(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(format!(
            "budget_buddy={level},engine={level}",
            level = settings.app.level
        ))
        .init();

    let db = parse_database(&settings.database).await?;
    if let Some(Command::Migrate(args)) = &cli.command {
        match args.action {
            MigrateAction::Up => Migrator::up(&db, None).await?,
            MigrateAction::Down => Migrator::down(&db, None).await?,
            MigrateAction::Fresh => Migrator::fresh(&db).await?,
            MigrateAction::Status => Migrator::status(&db).await?,
        }
        return Ok(());
    }
    Migrator::up(&db, None).await?;

    let engine = Engine::builder().database(db).build().await?;

    match cli.command.unwrap_or(Command::Run) {
        Command::Run => {
            let run_at = settings.scheduler.run_at()?;
            tokio::select! {
                () = scheduler::run(&engine, run_at, settings.scheduler.run_on_startup) => {}
                signal = tokio::signal::ctrl_c() => {
                    signal?;
                    tracing::info!("shutting down scheduler");
                }
            }
        }
        Command::Generate(args) => {
            let report = engine.generate_pending_transactions(args.date).await?;
            println!(
                "generated: {}, skipped: {} (deactivated: {}, failed: {})",
                report.generated, report.skipped, report.deactivated, report.failed
            );
        }
        Command::Rule(Rule {
            command: RuleCommand::Create(args),
        }) => {
            let created_at = rule_created_at(args.start, engine.today());
            let rule = engine
                .create_recurring_rule(NewRecurringRule {
                    owner_id: args.owner,
                    category_id: args.category,
                    amount_minor: parse_amount_minor(&args.amount)?,
                    description: args.description,
                    frequency: args.frequency,
                    created_at,
                    end_date: args.end,
                })
                .await?;
            println!(
                "created rule: {} ({}, next occurrence {})",
                rule.id,
                rule.frequency,
                display_date(rule.next_occurrence)
            );
        }
        Command::Rule(Rule {
            command: RuleCommand::List,
        }) => {
            for rule in engine.active_recurring_rules().await? {
                println!(
                    "{}  {:<8} {:>12}  next {}  end {}  {}",
                    rule.id,
                    rule.frequency,
                    format_amount_minor(rule.amount_minor),
                    display_date(rule.next_occurrence),
                    display_date(rule.end_date),
                    rule.description
                );
            }
        }
        Command::Migrate(_) => unreachable!("handled before the engine is built"),
    }

    Ok(())
}

/// Creation timestamp of a rule from the CLI: the start of `start`, or of the
/// engine's own "today" so the first occurrence matches the run date.
fn rule_created_at(start: Option<NaiveDate>, today: NaiveDate) -> DateTime<Utc> {
    start.unwrap_or(today).and_time(NaiveTime::MIN).and_utc()
}

fn display_date(date: Option<NaiveDate>) -> String {
    date.map_or_else(|| "-".to_string(), |d| d.to_string())
}

async fn parse_database(
    config: &settings::Database,
) -> Result<sea_orm::DatabaseConnection, Box<dyn Error + Send + Sync>> {
    let url = match config {
        Database::Memory => String::from("sqlite::memory:"),
        Database::Sqlite(path) => format!("sqlite:{}?mode=rwc", path),
    };

    Ok(sea_orm::Database::connect(url).await?)
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rule_without_start_is_anchored_on_engine_today() {
        let created_at = rule_created_at(None, date(2026, 10, 18));
        assert_eq!(created_at.date_naive(), date(2026, 10, 18));
        assert_eq!(
            created_at,
            Utc.with_ymd_and_hms(2026, 10, 18, 0, 0, 0).unwrap()
        );
    }

    #[test]
    fn explicit_start_wins_over_today() {
        let created_at = rule_created_at(Some(date(2026, 11, 1)), date(2026, 10, 18));
        assert_eq!(created_at.date_naive(), date(2026, 11, 1));
    }

    #[test]
    fn migrate_subcommand_parses_actions() {
        let cli = Cli::try_parse_from(["budget_buddy", "migrate", "status"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Migrate(MigrateArgs {
                action: MigrateAction::Status
            }))
        ));

        let cli = Cli::try_parse_from(["budget_buddy", "migrate"]).unwrap();
        assert!(matches!(
            cli.command,
            Some(Command::Migrate(MigrateArgs {
                action: MigrateAction::Up
            }))
        ));

        assert!(Cli::try_parse_from(["budget_buddy", "migrate", "sideways"]).is_err());
    }
}
