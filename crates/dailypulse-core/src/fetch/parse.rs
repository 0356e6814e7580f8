//! Response header parsing: `Last-Modified` as an HTTP date.

use chrono::{DateTime, NaiveDateTime, Utc};

/// `Last-Modified` of the collected header lines, if present and parseable.
pub(crate) fn last_modified(lines: &[String]) -> Option<DateTime<Utc>> {
    let value = lines.iter().find_map(|line| {
        let (name, value) = line.trim().split_once(':')?;
        name.trim()
            .eq_ignore_ascii_case("last-modified")
            .then(|| value.trim())
    })?;
    let parsed = parse_http_date(value);
    if parsed.is_none() {
        tracing::debug!("ignoring unparseable Last-Modified: {:?}", value);
    }
    parsed
}

/// Parse an HTTP-date: IMF-fixdate (`Wed, 21 Oct 2015 07:28:00 GMT`) and the
/// obsolete RFC 850 and asctime forms.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
        return Some(dt.with_timezone(&Utc));
    }
    const OBSOLETE: [&str; 2] = ["%A, %d-%b-%y %H:%M:%S GMT", "%a %b %e %H:%M:%S %Y"];
    OBSOLETE
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(value, fmt).ok())
        .map(|naive| naive.and_utc())
}
