//! Estimate when the next news revision should appear.
//!
//! A new revision is expected 24 hours after the current one: the calendar date
//! comes from the stamp, the time of day from the server's `Last-Modified`.

use chrono::{DateTime, Local, LocalResult, NaiveDate, Offset, TimeDelta, TimeZone, Timelike, Utc};
use std::time::Duration;

use crate::date_format::parse_stamp;

/// How often a watcher should recompute the countdown text.
pub const COUNTDOWN_REFRESH: Duration = Duration::from_secs(60);

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_MINUTE: i64 = 60_000;

/// Next expected update in the system time zone.
pub fn next_update_timestamp(
    stamp: &str,
    last_modified: Option<DateTime<Utc>>,
) -> Option<DateTime<Local>> {
    next_update_in(stamp, last_modified, &Local)
}

/// Next expected update with hour/minute and calendar math done in `tz`.
///
/// `None` when the stamp is not a valid `DDMMYYYY` date. A local time skipped
/// by a forward clock change lands later by the length of the gap; an
/// ambiguous one takes the earlier instant.
pub fn next_update_in<Tz: TimeZone>(
    stamp: &str,
    last_modified: Option<DateTime<Utc>>,
    tz: &Tz,
) -> Option<DateTime<Tz>> {
    let parts = parse_stamp(stamp)?;
    let date = NaiveDate::from_ymd_opt(parts.year, parts.month, parts.day)?;
    let (hour, minute) = match last_modified {
        Some(lm) => {
            let local = lm.with_timezone(tz);
            (local.hour(), local.minute())
        }
        None => (0, 0),
    };
    let next = date
        .and_hms_opt(hour, minute, 0)?
        .checked_add_signed(TimeDelta::hours(24))?;
    match tz.from_local_datetime(&next) {
        LocalResult::Single(t) | LocalResult::Ambiguous(t, _) => Some(t),
        LocalResult::None => {
            // Read the wall time with the offset in force a day earlier, before the jump.
            let before = tz
                .offset_from_utc_datetime(&next.checked_sub_signed(TimeDelta::hours(24))?)
                .fix();
            let instant =
                next.checked_sub_signed(TimeDelta::seconds(i64::from(before.local_minus_utc())))?;
            Some(tz.from_utc_datetime(&instant))
        }
    }
}

/// Countdown line shown under the current version.
pub fn countdown_text(next: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let diff = (next - now).num_milliseconds();
    if diff > 0 {
        let hours = diff / MILLIS_PER_HOUR;
        let minutes = (diff % MILLIS_PER_HOUR) / MILLIS_PER_MINUTE;
        format!("Next news in: {hours}h {minutes}m")
    } else {
        "New news available!".to_string()
    }
}

/// Countdown for the given stamp in `tz`; empty when no estimate can be made.
pub fn countdown_in<Tz: TimeZone>(
    stamp: &str,
    last_modified: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    tz: &Tz,
) -> String {
    match next_update_in(stamp, last_modified, tz) {
        Some(next) => countdown_text(next.with_timezone(&Utc), now),
        None => String::new(),
    }
}

/// [`countdown_in`] using the system time zone.
pub fn countdown(stamp: &str, last_modified: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    countdown_in(stamp, last_modified, now, &Local)
}
