use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

const MS_PER_MINUTE: i64 = 60 * 1000;
const MS_PER_HOUR: i64 = 60 * MS_PER_MINUTE;
const MS_PER_DAY: i64 = 24 * MS_PER_HOUR;

/// Parses the date formats feeds actually emit: RFC 2822 (RSS `pubDate`),
/// RFC 3339 (Atom timestamps), and a couple of common naive spellings.
fn parse_date(input: &str) -> Option<DateTime<Utc>> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(ndt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%d %H:%M:%S") {
        return Some(Utc.from_utc_datetime(&ndt));
    }
    if let Ok(nd) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(Utc.from_utc_datetime(&nd.and_hms_opt(0, 0, 0)?));
    }
    None
}

/// Renders a date string as a "Month Day, Year" label, e.g. `"Jan 5, 2024"`
/// (English short month, unpadded day, UTC calendar date).
///
/// Unparseable input is returned unchanged — this never fails.
pub fn format_absolute_date(date: &str) -> String {
    match parse_date(date) {
        Some(dt) => dt.format("%b %-d, %Y").to_string(),
        None => date.to_string(),
    }
}

/// Renders a date string as elapsed time from now: `"45m ago"`, `"3h ago"`,
/// `"Yesterday"`, `"5d ago"`, falling back to [`format_absolute_date`] at
/// seven days or more (and for unparseable input).
pub fn format_relative_date(date: &str) -> String {
    format_relative_at(date, Utc::now())
}

/// Bucketing by floor division of elapsed milliseconds, no rounding:
/// 0 elapsed days renders minutes or hours, exactly 1 renders "Yesterday",
/// 2–6 renders days, everything else falls back to the absolute form.
fn format_relative_at(date: &str, now: DateTime<Utc>) -> String {
    let Some(dt) = parse_date(date) else {
        return format_absolute_date(date);
    };

    let elapsed_ms = now.signed_duration_since(dt).num_milliseconds();
    let days = elapsed_ms.div_euclid(MS_PER_DAY);

    if days == 0 {
        let hours = elapsed_ms.div_euclid(MS_PER_HOUR);
        if hours == 0 {
            format!("{}m ago", elapsed_ms.div_euclid(MS_PER_MINUTE))
        } else {
            format!("{hours}h ago")
        }
    } else if days == 1 {
        "Yesterday".to_string()
    } else if days < 7 {
        format!("{days}d ago")
    } else {
        format_absolute_date(date)
    }
}
