use anyhow::{Context, Result};
use std::sync::OnceLock;
use time::format_description::well_known::Rfc3339;
use time::{Date, OffsetDateTime, UtcOffset};

static LOCAL_OFFSET: OnceLock<UtcOffset> = OnceLock::new();

/// Resolve the local UTC offset. Call before the async runtime starts threads,
/// since the lookup is refused once the process is multi-threaded.
pub fn init_local_offset() -> UtcOffset {
    *LOCAL_OFFSET.get_or_init(|| UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC))
}

pub fn local_offset() -> UtcOffset {
    init_local_offset()
}

pub fn to_local_time(dt: OffsetDateTime) -> OffsetDateTime {
    dt.to_offset(local_offset())
}

pub fn now() -> OffsetDateTime {
    OffsetDateTime::now_utc()
}

pub fn today() -> Date {
    to_local_time(now()).date()
}

/// The local calendar day an instant falls on.
pub fn local_date(dt: OffsetDateTime) -> Date {
    to_local_time(dt).date()
}

/// Local midnight of `date`, expressed in UTC.
pub fn start_of_day(date: Date) -> OffsetDateTime {
    date.midnight()
        .assume_offset(local_offset())
        .to_offset(UtcOffset::UTC)
}

/// RFC 3339 in UTC, the format the API expects for instants.
pub fn format_instant(dt: OffsetDateTime) -> Result<String> {
    dt.to_offset(UtcOffset::UTC)
        .format(&Rfc3339)
        .context("Failed to format timestamp")
}

pub fn parse_instant(raw: &str) -> Result<OffsetDateTime> {
    OffsetDateTime::parse(raw, &Rfc3339).with_context(|| format!("Invalid timestamp: {}", raw))
}

/// "HH:MM" in local time.
pub fn format_clock(dt: OffsetDateTime) -> String {
    let t = to_local_time(dt).time();
    format!("{:02}:{:02}", t.hour(), t.minute())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};

    #[test]
    fn start_of_day_is_local_midnight() {
        let start = start_of_day(date!(2024 - 03 - 05));
        assert_eq!(local_date(start), date!(2024 - 03 - 05));
        assert_eq!(to_local_time(start).time(), time::Time::MIDNIGHT);
    }

    #[test]
    fn instants_are_sent_in_utc() {
        let dt = datetime!(2024-03-05 10:30 +02:00);
        assert_eq!(format_instant(dt).unwrap(), "2024-03-05T08:30:00Z");
    }

    #[test]
    fn parses_api_timestamps_with_millis() {
        let parsed = parse_instant("2024-03-05T08:30:00.000Z").unwrap();
        assert_eq!(parsed, datetime!(2024-03-05 08:30 UTC));
    }
}
