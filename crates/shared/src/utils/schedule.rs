use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone};

/// First instant of the next month, strictly after `now`, in `now`'s zone.
///
/// `None` when that local midnight does not exist in the zone.
pub fn next_monthly_run<Tz: TimeZone>(now: &DateTime<Tz>) -> Option<DateTime<Tz>> {
    let local = now.naive_local();
    let (year, month) = if local.month() == 12 {
        (local.year() + 1, 1)
    } else {
        (local.year(), local.month() + 1)
    };

    let midnight = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;
    now.timezone().from_local_datetime(&midnight).earliest()
}

/// A run on the first of a month settles the year the previous month
/// belongs to.
pub fn settlement_year_for<Tz: TimeZone>(run_at: &DateTime<Tz>) -> i32 {
    (run_at.naive_local() - Duration::days(1)).year()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    fn kst(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(9 * 3600)
            .unwrap()
            .with_ymd_and_hms(y, m, d, h, min, 0)
            .unwrap()
    }

    #[test]
    fn fires_on_first_of_next_month() {
        let next = next_monthly_run(&kst(2024, 5, 17, 13, 45)).unwrap();
        assert_eq!(next, kst(2024, 6, 1, 0, 0));
        assert_eq!(next.hour(), 0);
    }

    #[test]
    fn rolls_over_the_year() {
        let next = next_monthly_run(&kst(2024, 12, 31, 23, 59)).unwrap();
        assert_eq!(next, kst(2025, 1, 1, 0, 0));
    }

    #[test]
    fn exact_trigger_instant_schedules_the_following_month() {
        let next = next_monthly_run(&kst(2024, 3, 1, 0, 0)).unwrap();
        assert_eq!(next, kst(2024, 4, 1, 0, 0));
    }

    #[test]
    fn january_run_settles_previous_year() {
        assert_eq!(settlement_year_for(&kst(2025, 1, 1, 0, 0)), 2024);
        assert_eq!(settlement_year_for(&kst(2025, 2, 1, 0, 0)), 2025);
    }
}
