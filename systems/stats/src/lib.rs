#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Statistics system that aggregates cell lifecycle counters across a board.
//!
//! Summaries are rebuilt from scratch on every request and never maintained
//! incrementally. The engine remembers the generation its last summaries were
//! computed at so callers can tell when a later generation made them stale.

use lifestats_board::Board;
use lifestats_core::{BoardStats, CellCoord, CellView, Stat, StatCategory, StatsError};
use tracing::debug;

/// Pure statistics system that caches the most recent board summaries.
#[derive(Debug, Default)]
pub struct StatsEngine {
    last_stats: Option<BoardStats>,
}

impl StatsEngine {
    /// Creates an engine with no cached summaries.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the summaries produced by the last successful calculation, if any.
    #[must_use]
    pub fn last_stats(&self) -> Option<&BoardStats> {
        self.last_stats.as_ref()
    }

    /// Sweeps every cell of `board` and replaces the cached summaries.
    pub fn calculate_stats<R>(&mut self, board: &Board<R>) -> Result<&BoardStats, StatsError> {
        let stats = calculate_stats(board.generation(), board.cells())?;
        debug!(
            generation = stats.generation(),
            cells = board.cell_count(),
            "recomputed board statistics"
        );
        Ok(self.last_stats.insert(stats))
    }

    /// Reports whether the cached summaries predate the board's current generation.
    ///
    /// An engine that never computed summaries is always stale.
    #[must_use]
    pub fn is_stale<R>(&self, board: &Board<R>) -> bool {
        self.last_stats
            .as_ref()
            .map_or(true, |stats| stats.generation() != board.generation())
    }

    /// Overlay opacity of the cell at `coord` for `category`.
    ///
    /// Uses the cached summaries without recomputing them. Returns `None` when
    /// no summaries were computed yet or `coord` is not on the board.
    #[must_use]
    pub fn display_intensity<R>(
        &self,
        board: &Board<R>,
        coord: CellCoord,
        category: StatCategory,
    ) -> Option<u8> {
        let stat = self.last_stats.as_ref()?.get(category)?;
        let cell = board.get(coord)?;
        Some(stat.display_intensity(cell.value(category)))
    }
}

/// Builds summaries for every tracked category from the provided cells.
///
/// Fails with [`StatsError::EmptyDataset`] when `cells` yields nothing.
pub fn calculate_stats<I>(generation: u64, cells: I) -> Result<BoardStats, StatsError>
where
    I: IntoIterator<Item = CellView>,
{
    let cells: Vec<CellView> = cells.into_iter().collect();
    if cells.is_empty() {
        return Err(StatsError::EmptyDataset);
    }

    let stats = StatCategory::ALL
        .into_iter()
        .map(|category| {
            let distribution = cells
                .iter()
                .map(|cell| (cell.value(category), cell.coord))
                .collect();
            summarize(category, distribution)
        })
        .collect::<Result<Vec<Stat>, StatsError>>()?;

    Ok(BoardStats::new(generation, stats))
}

/// Sorts a category's `(value, coordinate)` pairs and derives its summary.
///
/// The distribution is ordered by descending value; ties keep their input order.
pub fn summarize(
    category: StatCategory,
    mut distribution: Vec<(u64, CellCoord)>,
) -> Result<Stat, StatsError> {
    distribution.sort_by(|left, right| right.0.cmp(&left.0));

    let (&(max, max_coords), &(min, min_coords)) = distribution
        .first()
        .zip(distribution.last())
        .ok_or(StatsError::EmptyDataset)?;

    let count = distribution.len();
    let middle = count / 2;
    let median = if count % 2 == 0 {
        (distribution[middle - 1].0 as f64 + distribution[middle].0 as f64) / 2.0
    } else {
        distribution[middle].0 as f64
    };

    let total: u128 = distribution
        .iter()
        .map(|&(value, _)| u128::from(value))
        .sum();
    let mean = total as f64 / count as f64;
    let variance = distribution
        .iter()
        .map(|&(value, _)| {
            let deviation = value as f64 - mean;
            deviation * deviation
        })
        .sum::<f64>()
        / count as f64;

    Ok(Stat {
        category,
        distribution,
        max,
        max_coords,
        min,
        min_coords,
        median,
        mean,
        population_stdev: variance.sqrt(),
    })
}
