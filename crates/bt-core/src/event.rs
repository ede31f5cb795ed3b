//! Race events and the event-kind taxonomy.

use std::fmt;

use chrono::NaiveTime;
use serde::{Deserialize, Serialize};

use crate::competitor::CompetitorId;
use crate::error::RaceError;

/// Every kind of event the processor understands.
///
/// Kinds 1 through 11 arrive from the timing system. `Disqualified` and
/// `Finished` are only ever produced by the processor itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Register,
    ScheduleStart,
    OnStartLine,
    Start,
    OnFiringRange,
    TargetHit,
    LeaveFiringRange,
    EnterPenaltyLaps,
    LeavePenaltyLaps,
    EndMainLap,
    CannotContinue,
    Disqualified,
    Finished,
}

impl EventKind {
    /// Numeric code as it appears in the event log.
    pub const fn code(self) -> i64 {
        match self {
            Self::Register => 1,
            Self::ScheduleStart => 2,
            Self::OnStartLine => 3,
            Self::Start => 4,
            Self::OnFiringRange => 5,
            Self::TargetHit => 6,
            Self::LeaveFiringRange => 7,
            Self::EnterPenaltyLaps => 8,
            Self::LeavePenaltyLaps => 9,
            Self::EndMainLap => 10,
            Self::CannotContinue => 11,
            Self::Disqualified => 32,
            Self::Finished => 33,
        }
    }

    /// Whether the kind is generated by the processor rather than read from input.
    pub const fn is_synthetic(self) -> bool {
        matches!(self, Self::Disqualified | Self::Finished)
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Register => "register",
            Self::ScheduleStart => "schedule_start",
            Self::OnStartLine => "on_start_line",
            Self::Start => "start",
            Self::OnFiringRange => "on_firing_range",
            Self::TargetHit => "target_hit",
            Self::LeaveFiringRange => "leave_firing_range",
            Self::EnterPenaltyLaps => "enter_penalty_laps",
            Self::LeavePenaltyLaps => "leave_penalty_laps",
            Self::EndMainLap => "end_main_lap",
            Self::CannotContinue => "cannot_continue",
            Self::Disqualified => "disqualified",
            Self::Finished => "finished",
        };
        write!(f, "{s}({})", self.code())
    }
}

/// Only input kinds convert; synthetic codes are rejected like any other unknown value.
impl TryFrom<i64> for EventKind {
    type Error = RaceError;

    fn try_from(code: i64) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::Register),
            2 => Ok(Self::ScheduleStart),
            3 => Ok(Self::OnStartLine),
            4 => Ok(Self::Start),
            5 => Ok(Self::OnFiringRange),
            6 => Ok(Self::TargetHit),
            7 => Ok(Self::LeaveFiringRange),
            8 => Ok(Self::EnterPenaltyLaps),
            9 => Ok(Self::LeavePenaltyLaps),
            10 => Ok(Self::EndMainLap),
            11 => Ok(Self::CannotContinue),
            _ => Err(RaceError::UnexpectedEventKind { kind: code }),
        }
    }
}

/// A single entry of the race log.
///
/// Events are immutable once built; the comment is rendered at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    /// Wall-clock time the event happened.
    pub timestamp: NaiveTime,
    pub kind: EventKind,
    pub competitor_id: CompetitorId,
    /// Kind-specific payload (start time, firing line, target, reason).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_param: Option<String>,
    /// Narrative text for the log.
    pub comment: String,
}

impl Event {
    /// Builds an event and renders its narrative comment.
    pub fn new(
        timestamp: NaiveTime,
        kind: EventKind,
        competitor_id: CompetitorId,
        additional_param: Option<String>,
    ) -> Self {
        let comment = render_comment(kind, competitor_id, additional_param.as_deref());
        Self {
            timestamp,
            kind,
            competitor_id,
            additional_param,
            comment,
        }
    }

    /// Synthetic disqualification notice.
    pub fn disqualification(competitor_id: CompetitorId, timestamp: NaiveTime) -> Self {
        Self::new(timestamp, EventKind::Disqualified, competitor_id, None)
    }

    /// Synthetic finish notice.
    pub fn finish(competitor_id: CompetitorId, timestamp: NaiveTime) -> Self {
        Self::new(timestamp, EventKind::Finished, competitor_id, None)
    }

    /// The additional parameter, or an empty string when absent.
    pub fn param(&self) -> &str {
        self.additional_param.as_deref().unwrap_or_default()
    }
}

fn render_comment(kind: EventKind, id: CompetitorId, param: Option<&str>) -> String {
    let param = param.unwrap_or_default();
    match kind {
        EventKind::Register => format!("The competitor({id}) registered"),
        EventKind::ScheduleStart => {
            format!("The start time for the competitor({id}) was set by a draw to {param}")
        }
        EventKind::OnStartLine => format!("The competitor({id}) is on the start line"),
        EventKind::Start => format!("The competitor({id}) has started"),
        EventKind::OnFiringRange => format!("The competitor({id}) is on the firing range({param})"),
        EventKind::TargetHit => format!("The target({param}) has been hit by competitior({id})"),
        EventKind::LeaveFiringRange => format!("The competitor({id}) left the firing range"),
        EventKind::EnterPenaltyLaps => format!("The competitor({id}) entered the penalty laps"),
        EventKind::LeavePenaltyLaps => format!("The competitor({id}) left the penalty laps"),
        EventKind::EndMainLap => format!("The competitor({id}) ended the main lap"),
        EventKind::CannotContinue => format!("The competitor({id}) can't continue: {param}"),
        EventKind::Disqualified => format!("The competitor({id}) is disqualified"),
        EventKind::Finished => format!("The competitor({id}) is finished"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    #[test]
    fn input_codes_roundtrip() {
        for code in 1..=11 {
            let kind = EventKind::try_from(code).expect("input kind");
            assert_eq!(kind.code(), code);
            assert!(!kind.is_synthetic());
        }
    }

    #[test]
    fn synthetic_and_unknown_codes_are_rejected() {
        for code in [0, 12, 32, 33, -1] {
            assert_eq!(
                EventKind::try_from(code),
                Err(RaceError::UnexpectedEventKind { kind: code })
            );
        }
    }

    #[test]
    fn display_includes_code() {
        assert_eq!(EventKind::TargetHit.to_string(), "target_hit(6)");
        assert_eq!(EventKind::Finished.to_string(), "finished(33)");
    }

    #[test]
    fn comments_follow_templates() {
        let cases = [
            (EventKind::Register, None, "The competitor(1) registered"),
            (
                EventKind::ScheduleStart,
                Some("09:30:00.000"),
                "The start time for the competitor(1) was set by a draw to 09:30:00.000",
            ),
            (EventKind::OnStartLine, None, "The competitor(1) is on the start line"),
            (EventKind::Start, None, "The competitor(1) has started"),
            (
                EventKind::OnFiringRange,
                Some("1"),
                "The competitor(1) is on the firing range(1)",
            ),
            (
                EventKind::TargetHit,
                Some("4"),
                "The target(4) has been hit by competitior(1)",
            ),
            (EventKind::LeaveFiringRange, None, "The competitor(1) left the firing range"),
            (EventKind::EnterPenaltyLaps, None, "The competitor(1) entered the penalty laps"),
            (EventKind::LeavePenaltyLaps, None, "The competitor(1) left the penalty laps"),
            (EventKind::EndMainLap, None, "The competitor(1) ended the main lap"),
            (
                EventKind::CannotContinue,
                Some("Lost in the forest"),
                "The competitor(1) can't continue: Lost in the forest",
            ),
        ];

        for (kind, param, expected) in cases {
            let event = Event::new(at(9, 0, 0), kind, 1, param.map(String::from));
            assert_eq!(event.comment, expected, "comment for {kind}");
        }
    }

    #[test]
    fn synthetic_constructors() {
        let dq = Event::disqualification(7, at(10, 0, 0));
        assert_eq!(dq.kind, EventKind::Disqualified);
        assert_eq!(dq.comment, "The competitor(7) is disqualified");

        let fin = Event::finish(7, at(10, 30, 0));
        assert_eq!(fin.kind, EventKind::Finished);
        assert_eq!(fin.comment, "The competitor(7) is finished");
        assert_eq!(fin.param(), "");
    }
}
