//! Full report: narrative log, then the results table.

use std::io::Write;

use anyhow::Result;

use bt_core::RaceProcessor;

use super::{log, results};

const LOG_BANNER: &str = "log=============================";
const RESULTS_BANNER: &str = "result table====================";

pub fn run<W: Write>(writer: &mut W, processor: &RaceProcessor) -> Result<()> {
    writeln!(writer, "{LOG_BANNER}")?;
    log::run(writer, processor)?;
    writeln!(writer, "{LOG_BANNER}")?;

    writeln!(writer, "{RESULTS_BANNER}")?;
    results::run(writer, processor, false)?;
    writeln!(writer, "{RESULTS_BANNER}")?;
    Ok(())
}
