//! Narrative log output.

use std::io::Write;

use anyhow::Result;

use bt_core::RaceProcessor;

/// Writes the comment of every logged event, one per line.
pub fn run<W: Write>(writer: &mut W, processor: &RaceProcessor) -> Result<()> {
    for comment in processor.log().comments() {
        writeln!(writer, "{comment}")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use bt_core::RaceConfig;
    use insta::assert_snapshot;

    use super::*;
    use crate::commands::util::replay;

    #[test]
    fn log_command_outputs_comments_in_order() {
        let input = "\
[09:05:59.867] 1 1
[09:15:00.841] 2 1 09:30:00.000
[09:29:45.734] 3 1
[09:30:01.005] 4 1
[09:49:31.659] 5 1 1
[09:49:33.123] 6 1 1
[09:49:38.339] 7 1
[09:59:03.872] 11 1 Lost in the forest
";
        let processor = replay(Cursor::new(input), RaceConfig::default()).unwrap();

        let mut output = Vec::new();
        run(&mut output, &processor).unwrap();

        let output = String::from_utf8(output).unwrap();
        assert_snapshot!(output, @r"
        The competitor(1) registered
        The start time for the competitor(1) was set by a draw to 09:30:00.000
        The competitor(1) is on the start line
        The competitor(1) has started
        The competitor(1) is on the firing range(1)
        The target(1) has been hit by competitior(1)
        The competitor(1) left the firing range
        The competitor(1) can't continue: Lost in the forest
        The competitor(1) is disqualified
        ");
    }

    #[test]
    fn log_command_writes_nothing_for_empty_log() {
        let processor = RaceProcessor::new(RaceConfig::default());
        let mut output = Vec::new();
        run(&mut output, &processor).unwrap();
        assert!(output.is_empty());
    }
}
