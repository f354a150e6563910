//! Calendar boundaries for reports.
//!
//! All helpers are generic over the time zone: the CLI passes local time so
//! "today" means the user's today, tests pass UTC.

use chrono::{DateTime, Datelike, Days, NaiveDate, NaiveTime, TimeZone};

/// Midnight at the start of `at`'s calendar day.
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_reports::dates::start_of_day;
///
/// let at = Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap();
/// assert_eq!(start_of_day(&at), Utc.with_ymd_and_hms(2026, 1, 15, 0, 0, 0).unwrap());
/// ```
pub fn start_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(&at.timezone(), at.date_naive())
}

/// Midnight on the most recent Sunday (today if `at` is a Sunday).
///
/// # Examples
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use impact_reports::dates::start_of_week;
///
/// // Thursday
/// let at = Utc.with_ymd_and_hms(2026, 1, 15, 14, 30, 0).unwrap();
/// assert_eq!(start_of_week(&at), Utc.with_ymd_and_hms(2026, 1, 11, 0, 0, 0).unwrap());
/// ```
pub fn start_of_week<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    let back = u64::from(at.weekday().num_days_from_sunday());
    let date = at.date_naive();
    let sunday = date.checked_sub_days(Days::new(back)).unwrap_or(date);
    midnight(&at.timezone(), sunday)
}

/// Midnight on the first day of `at`'s month.
pub fn start_of_month<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    let date = at.date_naive();
    let first = date.with_day(1).unwrap_or(date);
    midnight(&at.timezone(), first)
}

/// Whether `at` lies in `[start, end]`, both ends inclusive.
pub fn is_within_range<Tz: TimeZone, A: TimeZone, B: TimeZone>(
    at: &DateTime<Tz>,
    start: &DateTime<A>,
    end: &DateTime<B>,
) -> bool {
    at >= start && at <= end
}

fn midnight<Tz: TimeZone>(tz: &Tz, date: NaiveDate) -> DateTime<Tz> {
    let naive = date.and_time(NaiveTime::MIN);
    // Midnight can fall into a DST gap; read it as UTC then.
    tz.from_local_datetime(&naive)
        .earliest()
        .unwrap_or_else(|| tz.from_utc_datetime(&naive))
}
