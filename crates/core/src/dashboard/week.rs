//! Week boundaries. Weeks start on Sunday.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone, Utc};

/// Sunday on or before `today`.
#[must_use]
pub fn week_start(today: NaiveDate) -> NaiveDate {
    let offset = u64::from(today.weekday().num_days_from_sunday());
    today.checked_sub_days(Days::new(offset)).unwrap_or(today)
}

/// Midnight at the start of the week containing `now`, in `now`'s time zone,
/// as a UTC instant.
///
/// When midnight does not exist locally (a DST jump at 00:00) the first
/// valid hour of that day is used.
#[must_use]
pub fn week_start_instant<Tz: TimeZone>(now: &DateTime<Tz>) -> DateTime<Utc> {
    let tz = now.timezone();
    let start = week_start(now.date_naive());

    (0..24)
        .filter_map(|hour| start.and_hms_opt(hour, 0, 0))
        .find_map(|local| tz.from_local_datetime(&local).earliest())
        .map_or_else(
            || start.and_time(NaiveTime::MIN).and_utc(),
            |midnight| midnight.with_timezone(&Utc),
        )
}
