//! Game session driver
//!
//! Owns the session stats, the engine state, the enemy clock and the
//! progress reporter. Timer ticks and player input both funnel through
//! `Session::apply`, so every mutation happens one command at a time.

use thiserror::Error;

use crate::consts::MAX_TICKS_PER_UPDATE;
use crate::reporter::{ProgressReport, ProgressReporter, ReportError};
use crate::settings::Settings;
use crate::sim::{
    self, GameEvent, GamePhase, GameState, GameStats, Input, RoundSnapshot, SimError, Snapshot,
    enemy_interval_ms,
};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SessionError {
    #[error(transparent)]
    Sim(#[from] SimError),
    #[error(transparent)]
    Report(#[from] ReportError),
}

/// Everything that can mutate a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Player input
    Input(Input),
    /// Wall-clock time passed (ms)
    Elapsed(u32),
    /// Push unflushed progress to the reporter
    FlushProgress,
}

/// Fixed-interval scheduler for enemy steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnemyClock {
    interval_ms: u32,
    accumulator_ms: u32,
}

impl EnemyClock {
    pub fn new(interval_ms: u32) -> Self {
        Self {
            interval_ms: interval_ms.max(1),
            accumulator_ms: 0,
        }
    }

    /// Restart with a new period, dropping any partial interval
    pub fn reset(&mut self, interval_ms: u32) {
        self.interval_ms = interval_ms.max(1);
        self.accumulator_ms = 0;
    }

    pub fn interval_ms(&self) -> u32 {
        self.interval_ms
    }

    /// Number of ticks due after `elapsed_ms`
    pub fn advance(&mut self, elapsed_ms: u32) -> u32 {
        self.accumulator_ms = self.accumulator_ms.saturating_add(elapsed_ms);
        let due = self.accumulator_ms / self.interval_ms;
        if due > MAX_TICKS_PER_UPDATE {
            // Too far behind, drop the backlog
            self.accumulator_ms = 0;
            return MAX_TICKS_PER_UPDATE;
        }
        self.accumulator_ms -= due * self.interval_ms;
        due
    }
}

/// A running game plus its driver-owned stats
pub struct Session<R: ProgressReporter> {
    state: GameState,
    stats: GameStats,
    clock: EnemyClock,
    reporter: R,
    /// Events not yet taken by the renderer
    events: Vec<GameEvent>,
    /// Phase/level/round the clock was last armed for
    clock_key: (GamePhase, u32, u32),
}

impl<R: ProgressReporter> Session<R> {
    /// Start a session and set up its first round
    pub fn new(settings: &Settings, stats: GameStats, reporter: R) -> Result<Self, SimError> {
        let seed = settings.seed.unwrap_or_else(rand::random);
        log::info!("Session starting with seed {} at level {}", seed, stats.level);

        let interval = enemy_interval_ms(stats.level, stats.round);
        let mut session = Self {
            state: GameState::new(seed, settings.rules()),
            clock: EnemyClock::new(interval),
            clock_key: (GamePhase::Playing, stats.level, stats.round),
            stats,
            reporter,
            events: Vec::new(),
        };
        sim::initialize_round(&mut session.state, &mut session.stats, &mut session.events)?;
        Ok(session)
    }

    /// Single update entry point
    pub fn apply(&mut self, command: Command) -> Result<(), SessionError> {
        let first_new = self.events.len();

        match command {
            Command::Input(input) => {
                sim::handle_input(&mut self.state, &mut self.stats, input, &mut self.events)?;
            }
            Command::Elapsed(ms) => self.elapse(ms)?,
            Command::FlushProgress => {
                self.flush_progress()?;
            }
        }

        self.after_update(first_new);
        Ok(())
    }

    pub fn handle_input(&mut self, input: Input) -> Result<(), SessionError> {
        self.apply(Command::Input(input))
    }

    /// Deliver one enemy step immediately, bypassing the clock
    pub fn on_tick(&mut self) {
        let first_new = self.events.len();
        sim::on_tick(&mut self.state, &mut self.stats, &mut self.events);
        self.after_update(first_new);
    }

    /// Jump to a specific level/round and lay out a fresh board
    pub fn initialize_round(&mut self, level: u32, round: u32) -> Result<RoundSnapshot, SimError> {
        let first_new = self.events.len();
        self.stats.level = level.max(1);
        self.stats.round = round.max(1);
        self.stats.keys_collected = 0;
        let snapshot = sim::initialize_round(&mut self.state, &mut self.stats, &mut self.events)?;
        self.rearm_clock();
        self.after_update(first_new);
        Ok(snapshot)
    }

    /// Restart from level 1 regardless of the current phase
    pub fn restart(&mut self) -> Result<(), SimError> {
        let first_new = self.events.len();
        sim::restart(&mut self.state, &mut self.stats, &mut self.events)?;
        self.rearm_clock();
        self.after_update(first_new);
        Ok(())
    }

    /// Report unflushed progress.
    ///
    /// Returns `Ok(false)` when there was nothing to send. Stats are only
    /// cleared once the reporter accepts the report.
    pub fn flush_progress(&mut self) -> Result<bool, ReportError> {
        let report = ProgressReport::from_stats(&self.stats);
        if !report.has_progress() {
            log::info!("No progress to flush");
            return Ok(false);
        }

        self.reporter.report_progress(&report)?;
        self.stats.mark_flushed(report.session_score);
        log::info!(
            "Flushed {} keys and {} points",
            report.total_keys_collected,
            report.session_score
        );
        Ok(true)
    }

    pub fn snapshot(&self) -> Snapshot {
        self.state.snapshot(&self.stats)
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    pub fn reporter(&self) -> &R {
        &self.reporter
    }

    /// Current enemy step period (ms)
    pub fn tick_interval_ms(&self) -> u32 {
        self.clock.interval_ms()
    }

    /// Take all events produced since the last call
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    fn elapse(&mut self, ms: u32) -> Result<(), SimError> {
        match self.state.phase {
            GamePhase::Playing => {
                let ticks = self.clock.advance(ms);
                for _ in 0..ticks {
                    sim::on_tick(&mut self.state, &mut self.stats, &mut self.events);
                    if self.state.phase != GamePhase::Playing {
                        break;
                    }
                }
            }
            GamePhase::RoundComplete | GamePhase::LevelComplete => {
                sim::advance(&mut self.state, &mut self.stats, ms, &mut self.events)?;
            }
            GamePhase::Paused | GamePhase::GameOver => {}
        }
        Ok(())
    }

    /// Fresh board, fresh interval
    fn rearm_clock(&mut self) {
        self.clock
            .reset(enemy_interval_ms(self.stats.level, self.stats.round));
        self.clock_key = (self.state.phase, self.stats.level, self.stats.round);
    }

    /// Forward new level completions and re-arm the clock on transitions
    fn after_update(&mut self, first_new: usize) {
        let completions: Vec<(u32, u64)> = self.events[first_new..]
            .iter()
            .filter_map(|event| match *event {
                GameEvent::LevelComplete {
                    new_level,
                    total_score,
                    ..
                } => Some((new_level, total_score)),
                _ => None,
            })
            .collect();

        for (new_level, total_score) in completions {
            match self.reporter.report_level_complete(new_level, total_score) {
                Ok(()) => self.stats.high_score = self.stats.high_score.max(total_score),
                Err(e) => log::warn!("Level {} progress not saved: {}", new_level, e),
            }
        }

        let key = (self.state.phase, self.stats.level, self.stats.round);
        if key != self.clock_key {
            self.clock
                .reset(enemy_interval_ms(self.stats.level, self.stats.round));
            self.clock_key = key;
        }
    }
}
