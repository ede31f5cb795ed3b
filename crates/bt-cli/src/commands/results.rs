//! Results table output.

use std::io::Write;

use anyhow::Result;
use serde::Serialize;

use bt_core::timefmt::format_duration;
use bt_core::{Competitor, CompetitorId, LapSegment, RaceProcessor, Status, ranking};

/// One competitor's standing, as emitted by `--json`.
#[derive(Debug, Serialize)]
pub struct ResultRow {
    /// 1-based place; only finished competitors are placed.
    pub place: Option<usize>,
    pub competitor_id: CompetitorId,
    pub status: Status,
    pub disqualified: bool,
    pub total_time: Option<String>,
    pub laps: Vec<SegmentRow>,
    pub penalty: SegmentRow,
    pub hits: u32,
    pub targets: u32,
}

/// Time and average speed of a lap, or of all penalty laps together.
///
/// Open laps have no time; non-finite speeds are emitted as `null`.
#[derive(Debug, Serialize)]
pub struct SegmentRow {
    pub time: Option<String>,
    pub speed: Option<f64>,
}

impl SegmentRow {
    fn lap(lap: &LapSegment) -> Self {
        Self {
            time: lap.duration().map(format_duration),
            speed: lap.average_speed().and_then(finite),
        }
    }

    fn penalty(competitor: &Competitor) -> Self {
        Self {
            time: Some(format_duration(competitor.penalty_duration())),
            speed: finite(competitor.penalty_average_speed()),
        }
    }
}

impl ResultRow {
    fn new(place: Option<usize>, competitor: &Competitor) -> Self {
        Self {
            place,
            competitor_id: competitor.id,
            status: competitor.status,
            disqualified: competitor.disqualified,
            total_time: competitor.elapsed().map(format_duration),
            laps: competitor.main_laps.iter().map(SegmentRow::lap).collect(),
            penalty: SegmentRow::penalty(competitor),
            hits: competitor.hit_targets,
            targets: competitor.total_targets,
        }
    }
}

/// Rounds to the precision of the text table, dropping NaN and infinities.
fn finite(speed: f64) -> Option<f64> {
    speed
        .is_finite()
        .then(|| (speed * 1000.0).round() / 1000.0)
}

/// Builds the ranked rows for JSON output.
pub fn rows(processor: &RaceProcessor) -> Vec<ResultRow> {
    ranking::rank(processor.competitors())
        .into_iter()
        .enumerate()
        .map(|(index, competitor)| {
            let place = (competitor.status == Status::Finished).then_some(index + 1);
            ResultRow::new(place, competitor)
        })
        .collect()
}

/// Writes the results table, or a JSON array of rows.
pub fn run<W: Write>(writer: &mut W, processor: &RaceProcessor, json: bool) -> Result<()> {
    if json {
        let output = serde_json::to_string_pretty(&rows(processor))?;
        writeln!(writer, "{output}")?;
        return Ok(());
    }

    for line in processor.results() {
        writeln!(writer, "{line}")?;
    }
    Ok(())
}
