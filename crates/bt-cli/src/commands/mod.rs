//! CLI subcommand implementations.

pub mod log;
pub mod results;
pub mod run;
pub mod util;
