//! Event log line parsing.
//!
//! A line looks like `[09:31:49.285] 5 1 2`: a bracketed timestamp, the event
//! kind, the competitor number, and an optional kind-specific parameter.

use crate::competitor::CompetitorId;
use crate::error::RaceError;
use crate::event::{Event, EventKind};
use crate::timefmt::parse_timestamp;

/// Parses raw log lines into validated events.
#[derive(Debug, Clone, Copy)]
pub struct EventParser {
    firing_lines: u32,
}

impl EventParser {
    /// Creates a parser that accepts firing-line indices up to `firing_lines`.
    pub const fn new(firing_lines: u32) -> Self {
        Self { firing_lines }
    }

    /// Parses and validates one line.
    ///
    /// The fourth field is the parameter; anything after it is ignored. Kind 11
    /// keeps every remaining field so multi-word reasons survive intact.
    pub fn parse(&self, line: &str) -> Result<Event, RaceError> {
        let fields: Vec<&str> = line.split_whitespace().collect();
        let [raw_time, raw_kind, raw_id, rest @ ..] = fields.as_slice() else {
            return Err(malformed(line, "expected at least 3 fields"));
        };

        let timestamp = raw_time
            .strip_prefix('[')
            .and_then(|t| t.strip_suffix(']'))
            .ok_or_else(|| RaceError::InvalidTimestamp {
                value: (*raw_time).to_string(),
            })
            .and_then(parse_timestamp)?;

        let code: i64 = raw_kind
            .parse()
            .map_err(|_| malformed(line, "event kind is not an integer"))?;
        let kind = EventKind::try_from(code)?;

        let competitor_id: CompetitorId = raw_id
            .parse()
            .map_err(|_| malformed(line, "competitor id is not an integer"))?;

        let additional_param = if kind == EventKind::CannotContinue {
            (!rest.is_empty()).then(|| rest.join(" "))
        } else {
            rest.first().map(ToString::to_string)
        };

        if kind == EventKind::OnFiringRange {
            self.check_firing_line(competitor_id, additional_param.as_deref())?;
        }

        Ok(Event::new(timestamp, kind, competitor_id, additional_param))
    }

    fn check_firing_line(
        &self,
        competitor_id: CompetitorId,
        param: Option<&str>,
    ) -> Result<(), RaceError> {
        let invalid = || RaceError::InvalidFiringLine {
            competitor_id,
            value: param.unwrap_or_default().to_string(),
            limit: self.firing_lines,
        };
        let line: i64 = param.and_then(|p| p.parse().ok()).ok_or_else(invalid)?;
        if line > i64::from(self.firing_lines) {
            return Err(invalid());
        }
        Ok(())
    }
}

fn malformed(line: &str, reason: &'static str) -> RaceError {
    RaceError::MalformedLine {
        line: line.trim_end().to_string(),
        reason,
    }
}
