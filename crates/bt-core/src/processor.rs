//! The race state machine.
//!
//! [`RaceProcessor`] owns the competitor registry and the event log. Events are
//! applied strictly in arrival order; a rejected event leaves both untouched,
//! while everything applied before it stays in place.
//!
//! # Transitions
//!
//! | Kind | Requires | Effect |
//! |------|----------|--------|
//! | register | unknown id | new competitor, or disqualification if registered after the race start |
//! | schedule start | known id | drawn start time recorded |
//! | start | known id, not started | started with an open main lap, or disqualified outside the start window |
//! | target hit | started | hit counted, penalty budget reduced |
//! | enter / leave penalty laps | started | penalty lap opened / closed |
//! | end main lap | started | lap closed; finish on the last lap; disqualified if still in the penalty loop |
//! | cannot continue | known id | not finished, disqualified |
//!
//! Start line and firing range events are logged without touching state.

use std::collections::BTreeMap;

use chrono::Duration;

use crate::competitor::{Competitor, CompetitorId, LapSegment, Status};
use crate::config::RaceConfig;
use crate::error::RaceError;
use crate::event::{Event, EventKind};
use crate::parser::EventParser;
use crate::ranking;
use crate::timefmt::{format_duration, format_timestamp, parse_timestamp};

/// Append-only record of every applied and synthesized event.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Vec<Event>,
}

impl EventLog {
    fn append(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Event> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[Event] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Narrative comments in append order.
    pub fn comments(&self) -> impl Iterator<Item = &str> {
        self.events.iter().map(|e| e.comment.as_str())
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

/// Applies race events to competitor state.
#[derive(Debug, Clone)]
pub struct RaceProcessor {
    config: RaceConfig,
    parser: EventParser,
    competitors: BTreeMap<CompetitorId, Competitor>,
    log: EventLog,
}

impl RaceProcessor {
    pub fn new(config: RaceConfig) -> Self {
        Self {
            parser: EventParser::new(config.firing_lines),
            config,
            competitors: BTreeMap::new(),
            log: EventLog::default(),
        }
    }

    pub const fn config(&self) -> &RaceConfig {
        &self.config
    }

    /// Parses one raw log line and applies it.
    pub fn process_line(&mut self, line: &str) -> Result<(), RaceError> {
        let event = self.parser.parse(line)?;
        self.process(event)
    }

    /// Applies a single event.
    pub fn process(&mut self, event: Event) -> Result<(), RaceError> {
        match event.kind {
            EventKind::Register => self.register(event),
            EventKind::ScheduleStart => self.schedule_start(event),
            EventKind::Start => self.start(event),
            EventKind::TargetHit => self.hit_target(event),
            EventKind::EnterPenaltyLaps => self.enter_penalty_laps(event),
            EventKind::LeavePenaltyLaps => self.leave_penalty_laps(event),
            EventKind::EndMainLap => self.end_main_lap(event),
            EventKind::CannotContinue => self.cannot_continue(event),
            EventKind::OnStartLine | EventKind::OnFiringRange | EventKind::LeaveFiringRange => {
                tracing::debug!(competitor_id = event.competitor_id, kind = %event.kind, "logged");
                self.log.append(event);
                Ok(())
            }
            EventKind::Disqualified | EventKind::Finished => Err(RaceError::UnexpectedEventKind {
                kind: event.kind.code(),
            }),
        }
    }

    /// Registered competitors in ascending id order.
    pub fn competitors(&self) -> impl Iterator<Item = &Competitor> {
        self.competitors.values()
    }

    pub fn competitor(&self, id: CompetitorId) -> Option<&Competitor> {
        self.competitors.get(&id)
    }

    pub const fn log(&self) -> &EventLog {
        &self.log
    }

    /// Ranked scoreboard lines.
    pub fn results(&self) -> Vec<String> {
        ranking::rank(self.competitors())
            .into_iter()
            .map(Competitor::result_line)
            .collect()
    }

    fn register(&mut self, event: Event) -> Result<(), RaceError> {
        let id = event.competitor_id;
        if self.competitors.contains_key(&id) {
            tracing::warn!(competitor_id = id, "duplicate registration");
            return Err(RaceError::CompetitorAlreadyExists { competitor_id: id });
        }

        if event.timestamp > self.config.start {
            tracing::info!(
                competitor_id = id,
                registered_at = %format_timestamp(event.timestamp),
                race_start = %format_timestamp(self.config.start),
                "late registration, disqualified"
            );
            self.log.append(Event::disqualification(id, event.timestamp));
            return Ok(());
        }

        self.competitors
            .insert(id, Competitor::register(id, &self.config));
        tracing::debug!(competitor_id = id, "registered");
        self.log.append(event);
        Ok(())
    }

    fn schedule_start(&mut self, event: Event) -> Result<(), RaceError> {
        let competitor = lookup(&mut self.competitors, &event)?;
        let scheduled = parse_timestamp(event.param())?;
        competitor.scheduled_start = Some(scheduled);
        tracing::debug!(
            competitor_id = competitor.id,
            scheduled = %format_timestamp(scheduled),
            "start time drawn"
        );
        self.log.append(event);
        Ok(())
    }

    fn start(&mut self, event: Event) -> Result<(), RaceError> {
        let window = self.config.start_delta;
        let lap_len = self.config.lap_len;
        let competitor = lookup(&mut self.competitors, &event)?;
        if competitor.status != Status::NotStarted || competitor.disqualified {
            return Err(not_allowed(competitor, event.kind));
        }

        let delta = competitor
            .scheduled_start
            .map(|scheduled| event.timestamp - scheduled);
        let on_time = delta.is_some_and(|d| d >= Duration::zero() && d <= window);

        if !on_time {
            tracing::info!(
                competitor_id = competitor.id,
                delta = %delta.map_or_else(|| "unscheduled".to_string(), format_duration),
                "started outside the start window, disqualified"
            );
            competitor.status = Status::NotStarted;
            competitor.disqualified = true;
            let dq = Event::disqualification(competitor.id, event.timestamp);
            self.log.append(event);
            self.log.append(dq);
            return Ok(());
        }

        competitor.status = Status::Started;
        competitor
            .main_laps
            .push(LapSegment::open(event.timestamp, lap_len));
        tracing::debug!(competitor_id = competitor.id, "started");
        self.log.append(event);
        Ok(())
    }

    fn hit_target(&mut self, event: Event) -> Result<(), RaceError> {
        let penalty_len = i64::from(self.config.penalty_len);
        let competitor = started(&mut self.competitors, &event)?;
        competitor.penalty_budget = competitor.penalty_budget.saturating_sub(penalty_len);
        competitor.hit_targets += 1;
        tracing::debug!(
            competitor_id = competitor.id,
            hits = competitor.hit_targets,
            "target hit"
        );
        self.log.append(event);
        Ok(())
    }

    fn enter_penalty_laps(&mut self, event: Event) -> Result<(), RaceError> {
        let penalty_len = self.config.penalty_len;
        let competitor = started(&mut self.competitors, &event)?;
        competitor
            .penalty_laps
            .push(LapSegment::open(event.timestamp, penalty_len));
        tracing::debug!(competitor_id = competitor.id, "entered penalty laps");
        self.log.append(event);
        Ok(())
    }

    fn leave_penalty_laps(&mut self, event: Event) -> Result<(), RaceError> {
        let competitor = started(&mut self.competitors, &event)?;
        let closed = competitor
            .penalty_laps
            .last_mut()
            .is_some_and(|lap| lap.close(event.timestamp));
        if !closed {
            return Err(RaceError::PenaltyLapNotOpen {
                competitor_id: competitor.id,
            });
        }
        tracing::debug!(competitor_id = competitor.id, "left penalty laps");
        self.log.append(event);
        Ok(())
    }

    fn end_main_lap(&mut self, event: Event) -> Result<(), RaceError> {
        let laps = self.config.laps;
        let lap_len = self.config.lap_len;
        let competitor = started(&mut self.competitors, &event)?;

        if competitor.in_penalty_loop() {
            tracing::info!(
                competitor_id = competitor.id,
                "ended main lap inside the penalty loop, disqualified"
            );
            competitor.status = Status::NotFinished;
            competitor.disqualified = true;
            let dq = Event::disqualification(competitor.id, event.timestamp);
            self.log.append(event);
            self.log.append(dq);
            return Ok(());
        }

        if let Some(lap) = competitor.main_laps.last_mut() {
            lap.close(event.timestamp);
        }
        competitor.lap_counter += 1;

        if competitor.lap_counter == laps {
            competitor.status = Status::Finished;
            competitor.finish_time = Some(event.timestamp);
            tracing::info!(
                competitor_id = competitor.id,
                elapsed = %competitor.elapsed().map(format_duration).unwrap_or_default(),
                "finished"
            );
            let finish = Event::finish(competitor.id, event.timestamp);
            self.log.append(event);
            self.log.append(finish);
            return Ok(());
        }

        competitor
            .main_laps
            .push(LapSegment::open(event.timestamp, lap_len));
        tracing::debug!(
            competitor_id = competitor.id,
            lap = competitor.lap_counter,
            "main lap ended"
        );
        self.log.append(event);
        Ok(())
    }

    fn cannot_continue(&mut self, event: Event) -> Result<(), RaceError> {
        let competitor = lookup(&mut self.competitors, &event)?;
        competitor.status = Status::NotFinished;
        competitor.disqualified = true;
        tracing::info!(
            competitor_id = competitor.id,
            reason = event.param(),
            "cannot continue, disqualified"
        );
        let dq = Event::disqualification(competitor.id, event.timestamp);
        self.log.append(event);
        self.log.append(dq);
        Ok(())
    }
}

fn lookup<'a>(
    competitors: &'a mut BTreeMap<CompetitorId, Competitor>,
    event: &Event,
) -> Result<&'a mut Competitor, RaceError> {
    competitors
        .get_mut(&event.competitor_id)
        .ok_or(RaceError::CompetitorNotFound {
            competitor_id: event.competitor_id,
            kind: event.kind,
        })
}

/// Like [`lookup`], but the competitor must be on course.
fn started<'a>(
    competitors: &'a mut BTreeMap<CompetitorId, Competitor>,
    event: &Event,
) -> Result<&'a mut Competitor, RaceError> {
    let competitor = lookup(competitors, event)?;
    if competitor.status != Status::Started {
        return Err(not_allowed(competitor, event.kind));
    }
    Ok(competitor)
}

fn not_allowed(competitor: &Competitor, kind: EventKind) -> RaceError {
    tracing::warn!(competitor_id = competitor.id, status = %competitor.status, %kind, "transition rejected");
    RaceError::CompetitorDisqualified {
        competitor_id: competitor.id,
        kind,
        status: competitor.status,
    }
}
