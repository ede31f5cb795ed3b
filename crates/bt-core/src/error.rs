//! Error type shared by the parser, the state machine, and config validation.

use thiserror::Error;

use crate::competitor::{CompetitorId, Status};
use crate::event::EventKind;

/// Errors raised while turning race log lines into state transitions.
///
/// Every variant is scoped to a single line: the caller drops the offending
/// event and carries on with the next one.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RaceError {
    /// The line does not have the `[time] kind id [param]` shape.
    #[error("malformed event line ({reason}): {line:?}")]
    MalformedLine { line: String, reason: &'static str },

    /// A timestamp did not match `HH:MM:SS.mmm`.
    #[error("invalid timestamp: {value:?}")]
    InvalidTimestamp { value: String },

    /// The firing-line parameter of a kind-5 event is not a usable index.
    #[error("invalid firing line {value:?} for competitor {competitor_id} (configured lines: {limit})")]
    InvalidFiringLine {
        competitor_id: CompetitorId,
        value: String,
        limit: u32,
    },

    /// The event refers to a competitor that was never registered.
    #[error("competitor {competitor_id} not found (event: {kind})")]
    CompetitorNotFound {
        competitor_id: CompetitorId,
        kind: EventKind,
    },

    /// A second registration for an already known competitor.
    #[error("competitor {competitor_id} already registered")]
    CompetitorAlreadyExists { competitor_id: CompetitorId },

    /// The transition requires a started competitor.
    #[error("competitor {competitor_id} is {status}, cannot apply {kind}")]
    CompetitorDisqualified {
        competitor_id: CompetitorId,
        kind: EventKind,
        status: Status,
    },

    /// An event kind outside the known taxonomy.
    #[error("unexpected event kind: {kind}")]
    UnexpectedEventKind { kind: i64 },

    /// Leaving the penalty loop without an open penalty lap.
    #[error("competitor {competitor_id} has no open penalty lap")]
    PenaltyLapNotOpen { competitor_id: CompetitorId },

    /// A race configuration value is out of range.
    #[error("invalid race config: {field} {reason}")]
    InvalidConfig {
        field: &'static str,
        reason: &'static str,
    },
}
