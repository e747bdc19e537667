//! Calendar rules for recurring transactions.
//!
//! [`next_occurrence`] maps a [`Frequency`] and a reference point in time to
//! the date of the following occurrence. Months and years are advanced with
//! calendar arithmetic: a day that does not exist in the target month is
//! clamped to the last day of that month (`2024-01-31` monthly gives
//! `2024-02-29`, `2024-02-29` yearly gives `2025-02-28`).
//!
//! Everything here is pure: no clock, no store.

use chrono::{DateTime, Days, Months, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::{EngineError, ResultEngine};

/// How often a recurring rule produces a transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Daily,
    Weekly,
    Monthly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Yearly => "yearly",
        }
    }
}

impl core::fmt::Display for Frequency {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.trim().to_ascii_lowercase().as_str() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "yearly" => Ok(Self::Yearly),
            _ => Err(EngineError::InvalidFrequency(value.to_string())),
        }
    }
}

impl core::str::FromStr for Frequency {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::try_from(s)
    }
}

/// A point in time the calculator can start from.
///
/// Time of day is discarded, so the result can be compared with "today" as a
/// plain date.
pub trait ReferenceDate {
    fn to_date(&self) -> NaiveDate;
}

impl ReferenceDate for NaiveDate {
    fn to_date(&self) -> NaiveDate {
        *self
    }
}

impl ReferenceDate for NaiveDateTime {
    fn to_date(&self) -> NaiveDate {
        self.date()
    }
}

impl<Tz: TimeZone> ReferenceDate for DateTime<Tz> {
    fn to_date(&self) -> NaiveDate {
        self.date_naive()
    }
}

/// Date of the occurrence following `reference` for `frequency`.
///
/// The result is always strictly after the reference date. Fails only when
/// the result would fall outside chrono's supported range.
pub fn next_occurrence(frequency: Frequency, reference: impl ReferenceDate) -> ResultEngine<NaiveDate> {
    let date = reference.to_date();
    let next = match frequency {
        Frequency::Daily => date.checked_add_days(Days::new(1)),
        Frequency::Weekly => date.checked_add_days(Days::new(7)),
        Frequency::Monthly => date.checked_add_months(Months::new(1)),
        Frequency::Yearly => date.checked_add_months(Months::new(12)),
    };
    next.ok_or_else(|| {
        EngineError::DateOutOfRange(format!("{frequency} occurrence after {date}"))
    })
}

/// Same as [`next_occurrence`], for a frequency still in its stored string form.
///
/// An unknown frequency is reported as [`EngineError::InvalidFrequency`] and
/// never falls back to a default.
pub fn calculate_next_occurrence(
    frequency: &str,
    from_date: impl ReferenceDate,
) -> ResultEngine<NaiveDate> {
    next_occurrence(Frequency::try_from(frequency)?, from_date)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveTime;

    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn daily_and_weekly_add_calendar_days() {
        assert_eq!(
            next_occurrence(Frequency::Daily, date(2024, 2, 28)).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            next_occurrence(Frequency::Daily, date(2023, 12, 31)).unwrap(),
            date(2024, 1, 1)
        );
        assert_eq!(
            next_occurrence(Frequency::Weekly, date(2024, 12, 28)).unwrap(),
            date(2025, 1, 4)
        );
    }

    #[test]
    fn monthly_clamps_to_end_of_month() {
        assert_eq!(
            next_occurrence(Frequency::Monthly, date(2024, 1, 31)).unwrap(),
            date(2024, 2, 29)
        );
        assert_eq!(
            next_occurrence(Frequency::Monthly, date(2023, 1, 31)).unwrap(),
            date(2023, 2, 28)
        );
        assert_eq!(
            next_occurrence(Frequency::Monthly, date(2024, 3, 31)).unwrap(),
            date(2024, 4, 30)
        );
        assert_eq!(
            next_occurrence(Frequency::Monthly, date(2024, 12, 15)).unwrap(),
            date(2025, 1, 15)
        );
    }

    #[test]
    fn yearly_maps_leap_day_to_feb_28() {
        assert_eq!(
            next_occurrence(Frequency::Yearly, date(2024, 2, 29)).unwrap(),
            date(2025, 2, 28)
        );
        assert_eq!(
            next_occurrence(Frequency::Yearly, date(2023, 6, 1)).unwrap(),
            date(2024, 6, 1)
        );
    }

    #[test]
    fn time_of_day_is_discarded() {
        let evening = date(2024, 1, 31).and_time(NaiveTime::from_hms_opt(23, 59, 59).unwrap());
        assert_eq!(
            next_occurrence(Frequency::Daily, evening).unwrap(),
            date(2024, 2, 1)
        );
        assert_eq!(
            next_occurrence(Frequency::Monthly, evening.and_utc()).unwrap(),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn result_is_strictly_after_reference() {
        let frequencies = [
            Frequency::Daily,
            Frequency::Weekly,
            Frequency::Monthly,
            Frequency::Yearly,
        ];
        let mut day = date(2023, 1, 1);
        while day < date(2025, 1, 1) {
            for frequency in frequencies {
                let next = next_occurrence(frequency, day).unwrap();
                assert!(next > day, "{frequency} from {day} gave {next}");
                assert_eq!(next, next_occurrence(frequency, day).unwrap());
            }
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn unknown_frequency_is_rejected() {
        assert_eq!(
            calculate_next_occurrence("fortnightly", date(2024, 1, 1)),
            Err(EngineError::InvalidFrequency("fortnightly".to_string()))
        );
        assert_eq!(
            calculate_next_occurrence("Monthly", date(2024, 1, 31)).unwrap(),
            date(2024, 2, 29)
        );
    }

    #[test]
    fn overflow_is_reported() {
        assert!(matches!(
            next_occurrence(Frequency::Yearly, NaiveDate::MAX),
            Err(EngineError::DateOutOfRange(_))
        ));
    }
}
