//! Shared utilities for CLI commands.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};

use bt_core::{RaceConfig, RaceProcessor};

/// Replays an event log file through a fresh processor.
pub fn replay_file(path: &Path, config: RaceConfig) -> Result<RaceProcessor> {
    let file = File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
    replay(BufReader::new(file), config)
}

/// Feeds every line to a fresh processor in order.
///
/// Blank lines are skipped. A rejected line is logged and skipped; it never
/// aborts the replay.
pub fn replay<R: BufRead>(reader: R, config: RaceConfig) -> Result<RaceProcessor> {
    let mut processor = RaceProcessor::new(config);
    let mut applied = 0_usize;
    let mut rejected = 0_usize;

    for (idx, line) in reader.lines().enumerate() {
        let line = line.with_context(|| format!("failed to read line {}", idx + 1))?;
        if line.trim().is_empty() {
            continue;
        }
        match processor.process_line(&line) {
            Ok(()) => applied += 1,
            Err(err) => {
                rejected += 1;
                tracing::warn!(line_no = idx + 1, error = %err, "skipping rejected event");
            }
        }
    }

    tracing::info!(applied, rejected, "replay finished");
    Ok(processor)
}
