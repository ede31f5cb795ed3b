//! Core domain logic for the biathlon race processor.
//!
//! This crate contains:
//! - Event parsing: turning timing-system log lines into typed events
//! - The race state machine: applying events to competitor state
//! - Ranking: ordering competitors and rendering the results table

mod competitor;
mod config;
mod error;
pub mod event;
pub mod parser;
pub mod processor;
pub mod ranking;
pub mod timefmt;

pub use competitor::{Competitor, CompetitorId, LapSegment, Status};
pub use config::RaceConfig;
pub use error::RaceError;
pub use event::{Event, EventKind};
pub use parser::EventParser;
pub use processor::{EventLog, RaceProcessor};
