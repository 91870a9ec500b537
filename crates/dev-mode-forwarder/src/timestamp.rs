// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use chrono::{DateTime, NaiveDateTime, Utc};

const PLATFORM_TIME_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.3fZ";
const PLATFORM_TIME_LEN: usize = "2024-01-01T00:00:00.000Z".len();

/// Parses the millisecond precision UTC format used by the Lambda platform,
/// e.g. `2024-01-01T00:00:00.000Z`. Any other precision is rejected.
pub fn parse_platform_time(time: &str) -> Option<DateTime<Utc>> {
    if time.len() != PLATFORM_TIME_LEN {
        return None;
    }
    NaiveDateTime::parse_from_str(time, PLATFORM_TIME_FORMAT)
        .ok()
        .map(|naive| naive.and_utc())
}

/// Lenient RFC 3339 parse, any offset and precision.
pub fn parse_rfc3339(time: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(time)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}

pub fn unix_nanos(time: DateTime<Utc>) -> u64 {
    time.timestamp_nanos_opt()
        .and_then(|nanos| u64::try_from(nanos).ok())
        .unwrap_or_default()
}

pub fn unix_millis(time: DateTime<Utc>) -> u64 {
    u64::try_from(time.timestamp_millis()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_platform_time() {
        let parsed = parse_platform_time("2024-01-01T00:00:01.250Z");
        assert_eq!(
            parsed.map(unix_nanos),
            Some(1_704_067_201_250_000_000)
        );
        assert!(parse_platform_time("2024-01-01T00:00:01Z").is_none());
        assert!(parse_platform_time("2024-01-01T00:00:01.250+00:00").is_none());
        assert!(parse_platform_time("").is_none());
    }

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_rfc3339("2024-01-01T02:00:00.5+02:00");
        assert_eq!(parsed.map(unix_millis), Some(1_704_067_200_500));
        assert!(parse_rfc3339("not a time").is_none());
    }

    #[test]
    fn test_pre_epoch_clamps_to_zero() {
        let parsed = parse_rfc3339("1969-12-31T23:59:59Z").map(unix_millis);
        assert_eq!(parsed, Some(0));
    }
}
