#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Stepping driver that advances a board until it settles.
//!
//! The driver never sleeps or polls input; callers that animate a run own all
//! pacing inside the observer they hand to [`Simulation::run`].

use std::collections::VecDeque;

use lifestats_board::{query, Board};
use lifestats_core::CellRenderer;
use tracing::info;

/// Number of past board layouts remembered for cycle detection.
pub const DEFAULT_CYCLE_WINDOW: usize = 16;

/// Tuning knobs for a simulation run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Upper bound on generations advanced by a single run; `None` runs until the board settles.
    pub max_generations: Option<u64>,
    /// Number of past generations compared against when looking for repeats.
    /// Zero disables cycle detection.
    pub cycle_window: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            max_generations: None,
            cycle_window: DEFAULT_CYCLE_WINDOW,
        }
    }
}

/// Reason a run stopped advancing the board.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Termination {
    /// The last generation flipped no cells.
    FixedPoint,
    /// The board returned to a layout seen `period` generations earlier.
    Cycle {
        /// Generations between the two matching layouts.
        period: u64,
    },
    /// The configured generation cap was reached.
    GenerationLimit,
}

/// Outcome of a completed run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Why the run stopped.
    pub termination: Termination,
    /// Generations advanced by this run.
    pub generations: u64,
    /// Board generation when the run stopped.
    pub final_generation: u64,
    /// Live cells remaining when the run stopped.
    pub live_cells: usize,
}

/// Drives repeated generation advances and detects when a board settles.
#[derive(Debug, Default)]
pub struct Simulation {
    config: SimulationConfig,
    dimensions: Option<(u32, u32)>,
    history: VecDeque<Snapshot>,
}

/// Layout of a board at one generation.
#[derive(Debug)]
struct Snapshot {
    generation: u64,
    fingerprint: u64,
    alive: Vec<bool>,
}

impl Simulation {
    /// Creates a driver with the provided configuration.
    #[must_use]
    pub fn new(config: SimulationConfig) -> Self {
        Self {
            config,
            dimensions: None,
            history: VecDeque::with_capacity(config.cycle_window.saturating_add(1)),
        }
    }

    /// Configuration the driver was created with.
    #[must_use]
    pub const fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Forgets every remembered layout.
    pub fn reset(&mut self) {
        self.dimensions = None;
        self.history.clear();
    }

    /// Advances `board` by exactly one generation.
    ///
    /// Returns the termination reason once the board stops changing or
    /// repeats a remembered layout, and `None` while it keeps evolving.
    /// Remembered layouts are dropped when `board` has other dimensions or is
    /// not ahead of the last generation seen.
    pub fn step<R: CellRenderer>(&mut self, board: &mut Board<R>) -> Option<Termination> {
        self.forget_foreign_history(board);
        if self.config.cycle_window > 0 && self.history.is_empty() {
            self.remember(board);
        }

        if !board.advance_generation() {
            return Some(Termination::FixedPoint);
        }

        if self.config.cycle_window == 0 {
            return None;
        }

        let fingerprint = query::fingerprint(board);
        let alive = query::alive_mask(board);
        let generation = board.generation();
        let repeat = self
            .history
            .iter()
            .filter(|seen| seen.fingerprint == fingerprint && seen.alive == alive)
            .find_map(|seen| generation.checked_sub(seen.generation))
            .filter(|&period| period > 0);
        if let Some(period) = repeat {
            return Some(Termination::Cycle { period });
        }

        self.history.push_back(Snapshot {
            generation,
            fingerprint,
            alive,
        });
        self.trim();
        None
    }

    /// Advances `board` until it settles or the generation cap is reached.
    ///
    /// `observer` runs after every advanced generation, including the one that
    /// ended the run.
    pub fn run<R, F>(&mut self, board: &mut Board<R>, mut observer: F) -> RunSummary
    where
        R: CellRenderer,
        F: FnMut(&Board<R>),
    {
        let mut generations = 0_u64;
        let termination = loop {
            if self
                .config
                .max_generations
                .is_some_and(|limit| generations >= limit)
            {
                break Termination::GenerationLimit;
            }

            let outcome = self.step(board);
            generations += 1;
            observer(board);

            if let Some(termination) = outcome {
                break termination;
            }
        };

        let summary = RunSummary {
            termination,
            generations,
            final_generation: board.generation(),
            live_cells: board.live_count(),
        };
        info!(
            ?termination,
            generations,
            final_generation = summary.final_generation,
            live_cells = summary.live_cells,
            "simulation finished"
        );
        summary
    }

    fn forget_foreign_history<R>(&mut self, board: &Board<R>) {
        let dimensions = (board.rows(), board.columns());
        let behind = self
            .history
            .back()
            .is_some_and(|last| last.generation >= board.generation());
        if self.dimensions != Some(dimensions) || behind {
            self.history.clear();
            self.dimensions = Some(dimensions);
        }
    }

    fn remember<R>(&mut self, board: &Board<R>) {
        self.history.push_back(Snapshot {
            generation: board.generation(),
            fingerprint: query::fingerprint(board),
            alive: query::alive_mask(board),
        });
        self.trim();
    }

    fn trim(&mut self) {
        while self.history.len() > self.config.cycle_window {
            let _ = self.history.pop_front();
        }
    }
}
