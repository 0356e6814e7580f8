//! Human-readable rendering of version stamps and playback durations.
//!
//! A stamp is the 8-character `DDMMYYYY` content of the metadata file. Anything
//! that does not look like one is shown as-is rather than rejected.

/// Day, month and year digits of a stamp. No calendar validation is done here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampDate {
    pub day: u32,
    pub month: u32,
    pub year: i32,
}

/// Split an 8-digit `DDMMYYYY` stamp into its parts.
pub fn parse_stamp(raw: &str) -> Option<StampDate> {
    if raw.len() != 8 || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let day = raw.get(0..2)?.parse().ok()?;
    let month = raw.get(2..4)?.parse().ok()?;
    let year = raw.get(4..8)?.parse().ok()?;
    Some(StampDate { day, month, year })
}

/// `"03032023"` → `"3rd March 2023"`. Returns `raw` unchanged when it is not
/// 8 digits or the month is outside 1..=12.
pub fn format_meta_date(raw: &str) -> String {
    let Some(date) = parse_stamp(raw) else {
        return raw.to_string();
    };
    match month_name(date.month) {
        Some(month) => format!("{} {} {}", day_with_suffix(date.day), month, date.year),
        None => raw.to_string(),
    }
}

/// Day number with its English ordinal suffix.
pub fn day_with_suffix(day: u32) -> String {
    let suffix = match (day, day % 10) {
        (11..=13, _) => "th",
        (_, 1) => "st",
        (_, 2) => "nd",
        (_, 3) => "rd",
        _ => "th",
    };
    format!("{day}{suffix}")
}

pub fn month_name(month: u32) -> Option<&'static str> {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    let index = usize::try_from(month).ok()?.checked_sub(1)?;
    NAMES.get(index).copied()
}

/// Format milliseconds as `minutes:seconds`. There is no hour component, so an
/// hour-long track shows as `60:00`. Negative input (unknown duration) is `0:00`.
pub fn format_duration(millis: i64) -> String {
    let total_seconds = millis.max(0) / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
