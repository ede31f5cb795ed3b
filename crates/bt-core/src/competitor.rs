//! Competitor state and its scoreboard rendering.

use std::fmt;

use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::config::RaceConfig;
use crate::timefmt::{average_speed, format_duration};

/// Competitor number as it appears in the event log.
pub type CompetitorId = u64;

/// Where a competitor stands in the race.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Status {
    NotStarted,
    Started,
    Finished,
    NotFinished,
}

impl Status {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NotStarted => "NotStarted",
            Self::Started => "Started",
            Self::Finished => "Finished",
            Self::NotFinished => "NotFinished",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lap on the main course or the penalty loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LapSegment {
    pub start: NaiveTime,
    /// `None` while the lap is in progress.
    pub finish: Option<NaiveTime>,
    pub reference_distance: u32,
}

impl LapSegment {
    pub(crate) const fn open(start: NaiveTime, reference_distance: u32) -> Self {
        Self {
            start,
            finish: None,
            reference_distance,
        }
    }

    pub const fn is_open(&self) -> bool {
        self.finish.is_none()
    }

    /// Lap time, once the lap is closed.
    pub fn duration(&self) -> Option<Duration> {
        self.finish.map(|finish| finish - self.start)
    }

    /// Seconds per distance unit, once the lap is closed.
    pub fn average_speed(&self) -> Option<f64> {
        self.duration()
            .map(|d| average_speed(d, self.reference_distance))
    }

    /// Closes the lap. Returns `false` if it was already closed.
    pub(crate) fn close(&mut self, at: NaiveTime) -> bool {
        if self.finish.is_some() {
            return false;
        }
        self.finish = Some(at);
        true
    }
}

/// A competitor's full race record.
#[derive(Debug, Clone, PartialEq)]
pub struct Competitor {
    pub id: CompetitorId,
    pub status: Status,
    /// Set once any disqualifying condition was recorded.
    pub disqualified: bool,
    /// Start time drawn for the competitor; `None` until scheduled.
    pub scheduled_start: Option<NaiveTime>,
    /// Set when the final main lap is closed.
    pub finish_time: Option<NaiveTime>,
    pub lap_counter: u32,
    pub main_laps: Vec<LapSegment>,
    pub penalty_laps: Vec<LapSegment>,
    pub hit_targets: u32,
    pub total_targets: u32,
    /// Remaining penalty distance; decremented on every hit.
    pub penalty_budget: i64,
}

impl Competitor {
    /// A freshly registered competitor with targets and penalty budget sized from `config`.
    pub fn register(id: CompetitorId, config: &RaceConfig) -> Self {
        // Saturates instead of overflowing on oversized configs.
        let budget = [config.penalty_len, config.firing_lines, config.targets_per_line]
            .into_iter()
            .fold(i64::from(config.laps), |acc, n| acc.saturating_mul(i64::from(n)));
        Self {
            id,
            status: Status::NotStarted,
            disqualified: false,
            scheduled_start: None,
            finish_time: None,
            lap_counter: 0,
            main_laps: Vec::new(),
            penalty_laps: Vec::new(),
            hit_targets: 0,
            total_targets: config.laps.saturating_mul(config.targets_per_line),
            penalty_budget: budget,
        }
    }

    /// Race time from scheduled start to finish, for finished competitors only.
    pub fn elapsed(&self) -> Option<Duration> {
        if self.status != Status::Finished {
            return None;
        }
        Some(self.finish_time? - self.scheduled_start?)
    }

    /// Whether the most recent penalty lap is still in progress.
    pub fn in_penalty_loop(&self) -> bool {
        self.penalty_laps.last().is_some_and(LapSegment::is_open)
    }

    /// Total time spent in closed penalty laps.
    pub fn penalty_duration(&self) -> Duration {
        self.penalty_laps
            .iter()
            .filter_map(LapSegment::duration)
            .fold(Duration::zero(), |acc, d| acc + d)
    }

    /// Penalty-loop distance covered: loop length times laps entered.
    pub fn penalty_distance(&self) -> u32 {
        self.penalty_laps
            .iter()
            .fold(0, |acc: u32, l| acc.saturating_add(l.reference_distance))
    }

    /// Seconds per distance unit over the whole penalty loop.
    ///
    /// Non-finite when no penalty lap was ever entered.
    pub fn penalty_average_speed(&self) -> f64 {
        average_speed(self.penalty_duration(), self.penalty_distance())
    }

    /// Scoreboard line:
    /// `<total> <id> [{lap, speed},...] {penalty, speed} <hits>/<targets>`.
    pub fn result_line(&self) -> String {
        let total = self.elapsed().map_or_else(
            || format!("[{}]", self.status),
            format_duration,
        );
        let laps: Vec<String> = self.main_laps.iter().map(render_lap).collect();
        format!(
            "{total} {} [{}] {{{}, {:.3}}} {}/{}",
            self.id,
            laps.join(","),
            format_duration(self.penalty_duration()),
            self.penalty_average_speed(),
            self.hit_targets,
            self.total_targets,
        )
    }
}

fn render_lap(lap: &LapSegment) -> String {
    match (lap.duration(), lap.average_speed()) {
        (Some(d), Some(speed)) => format!("{{{}, {speed:.3}}}", format_duration(d)),
        _ => "{,}".to_string(),
    }
}
