//! Biathlon race log processor CLI library.
//!
//! This crate provides the CLI interface for replaying timing-system logs.

mod cli;
pub mod commands;
mod config;

pub use cli::{Cli, Commands};
pub use config::load_from;
