//! Handles settings for the application. Configuration is read from
//! `settings.toml` (optional) and `BUDGET_BUDDY__*` environment variables.
//!
//! ```toml
//! [app]
//! level = "debug"
//!
//! [database]
//! sqlite = "budget_buddy.db"
//!
//! [scheduler]
//! run_at = "00:05"
//! run_on_startup = true
//! ```
use chrono::NaiveTime;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct App {
    pub level: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Database {
    Memory,
    Sqlite(String),
}

#[derive(Debug, Deserialize)]
pub struct Scheduler {
    /// Local time of day of the daily run, `HH:MM`.
    pub run_at: String,
    pub run_on_startup: bool,
}

impl Scheduler {
    pub fn run_at(&self) -> Result<NaiveTime, ConfigError> {
        NaiveTime::parse_from_str(self.run_at.trim(), "%H:%M").map_err(|err| {
            ConfigError::Message(format!("invalid scheduler.run_at {:?}: {err}", self.run_at))
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub app: App,
    pub database: Database,
    pub scheduler: Scheduler,
}

impl Settings {
    pub fn new(path: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .set_default("app.level", "info")?
            .set_default("database", "memory")?
            .set_default("scheduler.run_at", "00:05")?
            .set_default("scheduler.run_on_startup", true)?
            .add_source(File::with_name(path).required(false))
            .add_source(Environment::with_prefix("BUDGET_BUDDY").separator("__"))
            .build()?;

        settings.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_without_a_file() {
        let settings = Settings::new("does-not-exist").unwrap();
        assert_eq!(settings.app.level, "info");
        assert!(matches!(settings.database, Database::Memory));
        assert!(settings.scheduler.run_on_startup);
        assert_eq!(
            settings.scheduler.run_at().unwrap(),
            NaiveTime::from_hms_opt(0, 5, 0).unwrap()
        );
    }

    #[test]
    fn run_at_rejects_garbage() {
        let scheduler = Scheduler {
            run_at: "25:99".to_string(),
            run_on_startup: false,
        };
        assert!(scheduler.run_at().is_err());
    }
}
