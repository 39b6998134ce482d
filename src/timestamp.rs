//! Export timestamp resolution.
//!
//! Chat exports carry their date fragments in a handful of app- and
//! locale-dependent shapes. [`resolve_timestamp`] tries a fixed priority
//! list of formats and returns the first successful parse; the priority
//! order is what disambiguates day-first from month-first dates, so it must
//! not be rearranged. Failure is a sentinel (`None`), not an error: the
//! parser substitutes time-of-parsing, because a message with a wrong but
//! present timestamp is more useful downstream than a dropped message.

use chrono::{NaiveDateTime, Utc};

/// Known export date formats, tried in order. First successful parse wins.
///
/// chrono numeric fields accept 1- or 2-digit values, so `25/12/23` and
/// `5/3/24` both satisfy the day-first patterns. A fragment that fits none
/// of these (e.g. a bracketed time with seconds) resolves to `None`.
const TIMESTAMP_FORMATS: &[&str] = &[
    // 25/12/23, 10:30 PM
    "%d/%m/%y, %I:%M %p",
    // 25/12/2023, 10:30 PM
    "%d/%m/%Y, %I:%M %p",
    // 12/25/23, 10:30 PM
    "%m/%d/%y, %I:%M %p",
    // 2023-12-25 22:30:00
    "%Y-%m-%d %H:%M:%S",
];

/// Resolve a free-text date fragment to epoch milliseconds.
///
/// Naive date-times are interpreted as UTC; export files carry no zone
/// information in any of the supported shapes.
pub fn resolve_timestamp(fragment: &str) -> Option<i64> {
    let fragment = fragment.trim();
    for format in TIMESTAMP_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(fragment, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }
    None
}

/// Current wall-clock time in epoch milliseconds, the fallback value for
/// unresolvable fragments.
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
