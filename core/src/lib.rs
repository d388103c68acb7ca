#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the lifestats engine.
//!
//! This crate defines the vocabulary that connects the authoritative board,
//! the pure systems that read it, and the adapters that present it. The board
//! owns every cell and hands out [`CellView`] snapshots; systems fold those
//! snapshots into [`Stat`] summaries; adapters receive cells through the
//! [`CellRenderer`] capability and never write back into the board.

use serde::{Deserialize, Serialize};
use thiserror::Error;

mod stat;

pub use stat::{normal_cdf, BoardStats, Stat, StatCategory, UnknownStatCategory};

/// Location of a single grid cell expressed as row and column indices.
///
/// Both indices are zero-based and measured from the top-left cell. The
/// constructor takes the row first to match the `(row, col)` convention used
/// throughout the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CellCoord {
    row: u32,
    column: u32,
}

impl CellCoord {
    /// Creates a new grid cell coordinate.
    #[must_use]
    pub const fn new(row: u32, column: u32) -> Self {
        Self { row, column }
    }

    /// Zero-based row index of the cell.
    #[must_use]
    pub const fn row(&self) -> u32 {
        self.row
    }

    /// Zero-based column index of the cell.
    #[must_use]
    pub const fn column(&self) -> u32 {
        self.column
    }

    /// Returns the coordinate shifted by the provided offsets, if it stays non-negative.
    #[must_use]
    pub fn offset(self, rows: i64, columns: i64) -> Option<Self> {
        let row = u32::try_from(i64::from(self.row) + rows).ok()?;
        let column = u32::try_from(i64::from(self.column) + columns).ok()?;
        Some(Self::new(row, column))
    }

    /// Reports whether the coordinate lies inside a `rows` x `columns` grid.
    #[must_use]
    pub const fn is_within(&self, rows: u32, columns: u32) -> bool {
        self.row < rows && self.column < columns
    }
}

/// Lifecycle counters tracked for every cell.
///
/// All counters only grow, except the two `current_*` streaks which reset to
/// zero in the generation their cell flips state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct CellCounters {
    /// Generations the cell entered while alive.
    pub gens_alive: u64,
    /// Generations the cell entered while dead.
    pub gens_dead: u64,
    /// Longest unbroken run of living generations observed so far.
    pub longest_living_streak: u64,
    /// Length of the living run in progress.
    pub current_living_streak: u64,
    /// Longest unbroken run of dead generations observed so far.
    pub longest_dead_streak: u64,
    /// Length of the dead run in progress.
    pub current_dead_streak: u64,
    /// Number of dead-to-alive transitions.
    pub births: u64,
    /// Number of alive-to-dead transitions.
    pub deaths: u64,
}

impl CellCounters {
    /// Returns the counter backing the provided statistics category.
    #[must_use]
    pub const fn value(&self, category: StatCategory) -> u64 {
        match category {
            StatCategory::LongestLivingStreak => self.longest_living_streak,
            StatCategory::LongestDeadStreak => self.longest_dead_streak,
            StatCategory::Births => self.births,
            StatCategory::Deaths => self.deaths,
            StatCategory::GensAlive => self.gens_alive,
            StatCategory::GensDead => self.gens_dead,
        }
    }

    /// Total number of generations this cell has been accounted for.
    #[must_use]
    pub const fn generations(&self) -> u64 {
        self.gens_alive + self.gens_dead
    }
}

/// Read-only snapshot of a single cell used for rendering and statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CellView {
    /// Position of the cell within its board.
    pub coord: CellCoord,
    /// Whether the cell is alive in the committed generation.
    pub is_alive: bool,
    /// Lifecycle counters accumulated so far.
    pub counters: CellCounters,
}

impl CellView {
    /// Returns the raw value the cell contributes to a statistics category.
    #[must_use]
    pub const fn value(&self, category: StatCategory) -> u64 {
        self.counters.value(category)
    }
}

/// Capability through which the board hands cells to a presentation layer.
///
/// Implementations receive read-only views and must not feed state back into
/// the board. Both hooks are synchronous and invoked after state is committed.
pub trait CellRenderer {
    /// Draws the outline surrounding a cell.
    fn draw_outline(&mut self, cell: &CellView);

    /// Fills a cell.
    ///
    /// `intensity` carries the overlay opacity in `0..=255` when a statistics
    /// overlay is active; `None` requests the default alive/dead appearance.
    fn draw_fill(&mut self, cell: &CellView, intensity: Option<u8>);
}

/// Renderer that discards every draw request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NoopRenderer;

impl CellRenderer for NoopRenderer {
    fn draw_outline(&mut self, _cell: &CellView) {}

    fn draw_fill(&mut self, _cell: &CellView, _intensity: Option<u8>) {}
}

impl<R: CellRenderer + ?Sized> CellRenderer for &mut R {
    fn draw_outline(&mut self, cell: &CellView) {
        (**self).draw_outline(cell);
    }

    fn draw_fill(&mut self, cell: &CellView, intensity: Option<u8>) {
        (**self).draw_fill(cell, intensity);
    }
}

/// Reasons a board cannot be constructed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum BoardError {
    /// The requested grid has no rows or no columns.
    #[error("board dimensions must be positive (received {rows} rows x {columns} columns)")]
    Configuration {
        /// Requested row count.
        rows: u32,
        /// Requested column count.
        columns: u32,
    },
    /// An initial live cell lies outside the grid.
    #[error(
        "live cell ({}, {}) lies outside the {rows}x{columns} board",
        coord.row(),
        coord.column()
    )]
    Validation {
        /// First offending coordinate.
        coord: CellCoord,
        /// Row count of the board being constructed.
        rows: u32,
        /// Column count of the board being constructed.
        columns: u32,
    },
}

/// Reasons statistics cannot be computed.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum StatsError {
    /// There are no cells to aggregate.
    #[error("cannot compute statistics over an empty set of cells")]
    EmptyDataset,
}
