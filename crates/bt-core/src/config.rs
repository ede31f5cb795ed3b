//! Race parameters.

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::RaceError;

/// Parameters of a single race.
///
/// Field names accept the camelCase spelling used by timing-system exports
/// (`lapLen`, `startDelta`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RaceConfig {
    /// Number of main laps.
    pub laps: u32,

    /// Reference distance of one main lap.
    #[serde(alias = "lapLen")]
    pub lap_len: u32,

    /// Reference distance of one penalty lap.
    #[serde(alias = "penaltyLen")]
    pub penalty_len: u32,

    /// Firing lines per lap.
    #[serde(alias = "firingLines")]
    pub firing_lines: u32,

    /// Race start; registrations after this time are disqualified.
    pub start: NaiveTime,

    /// Tolerance after the drawn start time, written as a clock value (`00:01:30`).
    #[serde(alias = "startDelta", with = "clock_duration")]
    pub start_delta: Duration,

    /// Targets on each firing line.
    #[serde(alias = "targetsPerLine")]
    pub targets_per_line: u32,
}

impl Default for RaceConfig {
    fn default() -> Self {
        Self {
            laps: 2,
            lap_len: 3651,
            penalty_len: 50,
            firing_lines: 1,
            start: NaiveTime::from_hms_opt(9, 30, 0).unwrap_or_default(),
            start_delta: Duration::seconds(30),
            targets_per_line: 5,
        }
    }
}

impl RaceConfig {
    /// Rejects values that make the race meaningless.
    pub fn validate(&self) -> Result<(), RaceError> {
        if self.laps == 0 {
            return Err(RaceError::InvalidConfig {
                field: "laps",
                reason: "must be at least 1",
            });
        }
        if self.firing_lines == 0 {
            return Err(RaceError::InvalidConfig {
                field: "firing_lines",
                reason: "must be at least 1",
            });
        }
        if self.targets_per_line == 0 {
            return Err(RaceError::InvalidConfig {
                field: "targets_per_line",
                reason: "must be at least 1",
            });
        }
        Ok(())
    }
}

/// (De)serializes a [`Duration`] written as a time of day, `HH:MM:SS[.fff]`.
mod clock_duration {
    use chrono::{Duration, NaiveTime};
    use serde::{Deserialize, Deserializer, Serializer};

    use crate::timefmt::{format_duration, since_midnight};

    pub fn serialize<S>(d: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&format_duration(*d))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        let t: NaiveTime = s
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid clock duration: {s}")))?;
        Ok(since_midnight(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        assert!(RaceConfig::default().validate().is_ok());
    }

    #[test]
    fn deserializes_camel_case_export() {
        let json = r#"{
            "laps": 2,
            "lapLen": 3651,
            "penaltyLen": 50,
            "firingLines": 1,
            "start": "09:30:00",
            "startDelta": "00:00:30"
        }"#;
        let config: RaceConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.lap_len, 3651);
        assert_eq!(config.firing_lines, 1);
        assert_eq!(config.start, NaiveTime::from_hms_opt(9, 30, 0).unwrap());
        assert_eq!(config.start_delta, Duration::seconds(30));
        assert_eq!(config.targets_per_line, 5);
    }

    #[test]
    fn start_delta_accepts_millis() {
        let config: RaceConfig =
            serde_json::from_str(r#"{"start_delta": "00:01:30.500"}"#).unwrap();
        assert_eq!(config.start_delta, Duration::milliseconds(90_500));
    }

    #[test]
    fn start_delta_rejects_garbage() {
        let result: Result<RaceConfig, _> = serde_json::from_str(r#"{"start_delta": "soon"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn serializes_start_delta_as_clock() {
        let json = serde_json::to_value(RaceConfig::default()).unwrap();
        assert_eq!(json["start_delta"], "00:00:30.000");
        assert_eq!(json["start"], "09:30:00");
    }

    #[test]
    fn validate_rejects_zero_laps() {
        let config = RaceConfig {
            laps: 0,
            ..RaceConfig::default()
        };
        assert_eq!(
            config.validate(),
            Err(RaceError::InvalidConfig {
                field: "laps",
                reason: "must be at least 1"
            })
        );
    }

    #[test]
    fn validate_rejects_zero_firing_lines() {
        let config = RaceConfig {
            firing_lines: 0,
            ..RaceConfig::default()
        };
        assert!(config.validate().is_err());
    }
}
