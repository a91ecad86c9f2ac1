use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, TimeZone, Timelike, Utc};

pub const MS_PER_DAY: f64 = 86_400_000.0;

/// Whole milliseconds between two instants, clamped at zero.
pub fn elapsed_ms(from: DateTime<Utc>, to: DateTime<Utc>) -> u64 {
    (to - from).num_milliseconds().max(0) as u64
}

/// Fractional days between two instants. Negative spans report zero.
pub fn days_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    ((to - from).num_milliseconds() as f64 / MS_PER_DAY).max(0.0)
}

/// Date of the Sunday starting the week that contains `now` (in `now`'s offset).
pub fn week_start(now: &DateTime<FixedOffset>) -> NaiveDate {
    let date = now.date_naive();
    date - Duration::days(date.weekday().num_days_from_sunday() as i64)
}

/// First instant of `week_start(now)`, in `now`'s offset.
pub fn week_start_instant(now: &DateTime<FixedOffset>) -> DateTime<Utc> {
    let start = week_start(now).and_hms_opt(0, 0, 0).unwrap_or_default();
    now.offset()
        .from_local_datetime(&start)
        .single()
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Whether `last_accessed` falls strictly after the start of `now`'s week.
/// A record last touched exactly at Sunday 00:00 belongs to the previous week.
pub fn accessed_this_week(last_accessed: DateTime<Utc>, now: &DateTime<FixedOffset>) -> bool {
    last_accessed > week_start_instant(now)
}

/// Next Friday 17:00 strictly after `now`, in `now`'s offset.
pub fn next_friday_5pm(now: &DateTime<FixedOffset>) -> DateTime<FixedOffset> {
    let today = now.date_naive();
    let days_ahead = (5 + 7 - today.weekday().num_days_from_sunday() as i64) % 7;
    let friday = today + Duration::days(days_ahead);
    let candidate = friday
        .and_hms_opt(17, 0, 0)
        .and_then(|naive| now.offset().from_local_datetime(&naive).single())
        .unwrap_or(*now);

    if candidate <= *now {
        candidate + Duration::days(7)
    } else {
        candidate
    }
}

/// Monday to Friday, `start_hour <= hour < end_hour`.
///
/// The end hour is exclusive, so with the default 9/17 window 17:30 is already
/// off hours. This differs from an inclusive `hour <= 17` check, which keeps
/// all of 17:00-17:59 in work hours; pass an end hour of 18 for that.
pub fn is_work_hours(now: &DateTime<FixedOffset>, start_hour: u32, end_hour: u32) -> bool {
    let weekday = now.weekday().num_days_from_monday();
    let hour = now.hour();
    weekday < 5 && hour >= start_hour && hour < end_hour
}
