//! Conversions between the server's local timezone and UTC.

use time::{Date, OffsetDateTime, UtcOffset};
use time_tz::{Offset, TimeZone};

/// Get the current UTC offset for a canonical timezone name, e.g. "Pacific/Auckland".
///
/// Returns `None` if `canonical_timezone` is not a known timezone.
pub fn get_local_offset(canonical_timezone: &str) -> Option<UtcOffset> {
    time_tz::timezones::get_by_name(canonical_timezone)
        .map(|tz| tz.get_offset_utc(&OffsetDateTime::now_utc()).to_utc())
}

/// The first instant of `date` in the timezone with `local_offset`, as UTC.
///
/// Near the ends of the supported calendar the UTC date may not exist, in which case the
/// instant keeps `local_offset`.
pub fn start_of_day(date: Date, local_offset: UtcOffset) -> OffsetDateTime {
    let local_midnight = date.midnight().assume_offset(local_offset);

    local_midnight
        .checked_to_offset(UtcOffset::UTC)
        .unwrap_or(local_midnight)
}

/// Today's date in the timezone with `local_offset`.
#[cfg(test)]
pub fn local_today(local_offset: UtcOffset) -> Date {
    OffsetDateTime::now_utc().to_offset(local_offset).date()
}
