//! Wall-clock parsing and duration rendering.
//!
//! Race logs carry times of day only (`HH:MM:SS.mmm`), so every timestamp is a
//! [`NaiveTime`] and every difference a signed [`Duration`].

use chrono::{Duration, NaiveTime, Timelike};

use crate::error::RaceError;

/// Layout of every timestamp in the event log.
const TIMESTAMP_LAYOUT: &str = "%H:%M:%S%.3f";

/// Parse layout; the dot and all three millisecond digits are mandatory.
const STRICT_TIMESTAMP_LAYOUT: &str = "%H:%M:%S.%3f";

/// Parses a `HH:MM:SS.mmm` wall-clock time.
pub fn parse_timestamp(s: &str) -> Result<NaiveTime, RaceError> {
    NaiveTime::parse_from_str(s, STRICT_TIMESTAMP_LAYOUT).map_err(|_| RaceError::InvalidTimestamp {
        value: s.to_string(),
    })
}

/// Renders a duration as `HH:MM:SS.mmm`.
///
/// Negative durations are rendered by magnitude. Hours keep counting past 24.
pub fn format_duration(d: Duration) -> String {
    let total_ms = d.num_milliseconds().unsigned_abs();
    let hours = total_ms / 3_600_000;
    let minutes = total_ms / 60_000 % 60;
    let seconds = total_ms / 1000 % 60;
    let millis = total_ms % 1000;
    format!("{hours:02}:{minutes:02}:{seconds:02}.{millis:03}")
}

/// Renders a wall-clock time in the log layout.
pub fn format_timestamp(t: NaiveTime) -> String {
    t.format(TIMESTAMP_LAYOUT).to_string()
}

/// Seconds of `d` per unit of `distance`.
///
/// A zero distance yields a non-finite value, which is passed through untouched.
#[allow(clippy::cast_precision_loss)]
pub fn average_speed(d: Duration, distance: u32) -> f64 {
    let seconds = d.num_milliseconds() as f64 / 1000.0;
    seconds / f64::from(distance)
}

/// Time elapsed between midnight and `t`.
pub fn since_midnight(t: NaiveTime) -> Duration {
    Duration::seconds(i64::from(t.num_seconds_from_midnight()))
        + Duration::nanoseconds(i64::from(t.nanosecond()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_log_layout() {
        let t = parse_timestamp("09:31:49.285").unwrap();
        assert_eq!(t, NaiveTime::from_hms_milli_opt(9, 31, 49, 285).unwrap());
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(
            parse_timestamp("incorrectTimestamp"),
            Err(RaceError::InvalidTimestamp {
                value: "incorrectTimestamp".to_string()
            })
        );
        assert!(parse_timestamp("25:00:00.000").is_err());
        assert!(parse_timestamp("").is_err());
    }

    #[test]
    fn parse_rejects_missing_millis() {
        for value in ["09:00:00", "09:00:00.", "09:00:00.5", "09:00:00.50", "09:00:00.1234"] {
            assert_eq!(
                parse_timestamp(value),
                Err(RaceError::InvalidTimestamp {
                    value: value.to_string()
                }),
                "{value}"
            );
        }
    }

    #[test]
    fn difference_of_parsed_times_formats_as_one_hour() {
        let a = parse_timestamp("10:00:00.000").unwrap();
        let b = parse_timestamp("09:00:00.000").unwrap();
        assert_eq!(format_duration(a - b), "01:00:00.000");
    }

    #[test]
    fn format_duration_uses_magnitude_of_negative_values() {
        assert_eq!(format_duration(Duration::milliseconds(-1_500)), "00:00:01.500");
    }

    #[test]
    fn format_duration_does_not_wrap_hours() {
        assert_eq!(format_duration(Duration::hours(30)), "30:00:00.000");
        assert_eq!(format_duration(Duration::zero()), "00:00:00.000");
    }

    #[test]
    fn format_timestamp_pads_millis() {
        let t = NaiveTime::from_hms_milli_opt(9, 5, 0, 7).unwrap();
        assert_eq!(format_timestamp(t), "09:05:00.007");
    }

    #[test]
    #[expect(clippy::float_cmp, reason = "exact values by construction")]
    fn average_speed_divides_seconds_by_distance() {
        assert_eq!(average_speed(Duration::seconds(100), 50), 2.0);
        assert_eq!(average_speed(Duration::milliseconds(500), 1), 0.5);
    }

    #[test]
    fn average_speed_keeps_non_finite_results() {
        assert!(average_speed(Duration::zero(), 0).is_nan());
        assert!(average_speed(Duration::seconds(1), 0).is_infinite());
    }

    #[test]
    fn since_midnight_counts_fraction() {
        let t = NaiveTime::from_hms_milli_opt(0, 1, 30, 250).unwrap();
        assert_eq!(since_midnight(t), Duration::milliseconds(90_250));
    }
}
