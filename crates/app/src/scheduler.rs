//! Daily wiring of the generation run: once at startup, then every day at a
//! fixed local time.

use chrono::{DateTime, Local, NaiveTime, TimeDelta, TimeZone};
use engine::Engine;

pub async fn run(engine: &Engine, run_at: NaiveTime, run_on_startup: bool) {
    if run_on_startup {
        tracing::info!("running startup generation pass");
        run_once(engine).await;
    }

    loop {
        let now = Local::now();
        let next = next_run_after(&now, run_at);
        let wait = (next - now).to_std().unwrap_or_default();
        tracing::info!(next_run = %next, "waiting for next generation run");
        tokio::time::sleep(wait).await;
        run_once(engine).await;
    }
}

async fn run_once(engine: &Engine) {
    // Nothing of a failed run is persisted.
    if let Err(err) = engine.generate_pending_transactions(None).await {
        tracing::warn!("generation run failed, retrying at the next scheduled run: {err}");
    }
}

/// First instant strictly after `now` whose local time is `run_at`.
///
/// Days where `run_at` does not exist (DST gap) are skipped.
pub fn next_run_after<Tz: TimeZone>(now: &DateTime<Tz>, run_at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let mut day = now.date_naive();
    loop {
        if let Some(candidate) = day.and_time(run_at).and_local_timezone(tz.clone()).earliest()
            && candidate > *now
        {
            return candidate;
        }
        match day.succ_opt() {
            Some(next_day) => day = next_day,
            None => return now.clone() + TimeDelta::days(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn time(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    #[test]
    fn later_today_when_time_not_reached() {
        let now = Utc.with_ymd_and_hms(2024, 1, 15, 0, 1, 0).unwrap();
        assert_eq!(
            next_run_after(&now, time(0, 5)),
            Utc.with_ymd_and_hms(2024, 1, 15, 0, 5, 0).unwrap()
        );
    }

    #[test]
    fn tomorrow_when_time_passed_or_exact() {
        let now = Utc.with_ymd_and_hms(2024, 2, 28, 0, 5, 0).unwrap();
        assert_eq!(
            next_run_after(&now, time(0, 5)),
            Utc.with_ymd_and_hms(2024, 2, 29, 0, 5, 0).unwrap()
        );
        let now = Utc.with_ymd_and_hms(2024, 12, 31, 23, 0, 0).unwrap();
        assert_eq!(
            next_run_after(&now, time(0, 5)),
            Utc.with_ymd_and_hms(2025, 1, 1, 0, 5, 0).unwrap()
        );
    }
}
