use chrono::{Local, NaiveDate};

/// Clock abstracts access to the current date so generation runs stay deterministic in tests.
pub trait Clock: Send + Sync + core::fmt::Debug {
    /// Returns the date a generation run treats as "today".
    fn today(&self) -> NaiveDate;
}

/// Wall clock. "Today" is the local calendar date of the host.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }
}

/// Clock pinned to a single date.
#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub NaiveDate);

impl Clock for FixedClock {
    fn today(&self) -> NaiveDate {
        self.0
    }
}
