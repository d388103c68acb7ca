#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative board state for the lifestats engine.
//!
//! A [`Board`] owns a fixed `rows x columns` grid of cells with hard edges.
//! The only mutation path after construction is [`Board::advance_generation`],
//! which evaluates every cell against a snapshot of the committed generation
//! before committing any flip, so neighbor counts never observe a cell that was
//! already updated within the same step.

use lifestats_core::{
    BoardError, CellCoord, CellCounters, CellRenderer, CellView, NoopRenderer, Stat,
};
use tracing::debug;

mod cell;

use cell::Cell;

/// Fixed-size cellular automaton grid with per-cell lifecycle counters.
#[derive(Clone, Debug)]
pub struct Board<R = NoopRenderer> {
    rows: u32,
    columns: u32,
    cells: Vec<Cell>,
    generation: u64,
    snapshot: Vec<bool>,
    pending_flips: Vec<bool>,
    renderer: R,
}

impl Board<NoopRenderer> {
    /// Creates a headless board with the provided live cells.
    ///
    /// Fails with [`BoardError::Configuration`] when either dimension is zero
    /// and with [`BoardError::Validation`] when any live coordinate lies outside
    /// the grid. No board is produced if any coordinate is rejected.
    pub fn new<I>(rows: u32, columns: u32, live_cells: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        Self::with_renderer(rows, columns, live_cells, NoopRenderer)
    }
}

impl<R> Board<R> {
    /// Creates a board that reports flipped cells to `renderer`.
    pub fn with_renderer<I>(
        rows: u32,
        columns: u32,
        live_cells: I,
        renderer: R,
    ) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = CellCoord>,
    {
        if rows == 0 || columns == 0 {
            return Err(BoardError::Configuration { rows, columns });
        }

        let capacity = cell_capacity(rows, columns);
        let mut alive = vec![false; capacity];
        for coord in live_cells {
            let index = index_of(rows, columns, coord).ok_or(BoardError::Validation {
                coord,
                rows,
                columns,
            })?;
            alive[index] = true;
        }

        let cells = (0..rows)
            .flat_map(|row| (0..columns).map(move |column| CellCoord::new(row, column)))
            .zip(alive)
            .map(|(coord, is_alive)| Cell::new(coord, is_alive))
            .collect();

        Ok(Self {
            rows,
            columns,
            cells,
            generation: 0,
            snapshot: Vec::with_capacity(capacity),
            pending_flips: Vec::with_capacity(capacity),
            renderer,
        })
    }

    /// Number of rows in the grid.
    #[must_use]
    pub const fn rows(&self) -> u32 {
        self.rows
    }

    /// Number of columns in the grid.
    #[must_use]
    pub const fn columns(&self) -> u32 {
        self.columns
    }

    /// Number of generations advanced since construction.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Total number of cells on the board.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of cells alive in the committed generation.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells.iter().filter(|cell| cell.is_alive()).count()
    }

    /// Returns a read-only view of the cell at `coord`, if it lies on the board.
    #[must_use]
    pub fn get(&self, coord: CellCoord) -> Option<CellView> {
        index_of(self.rows, self.columns, coord).map(|index| self.cells[index].view())
    }

    /// Returns a read-only view of the cell at `(row, column)`.
    #[must_use]
    pub fn cell(&self, row: u32, column: u32) -> Option<CellView> {
        self.get(CellCoord::new(row, column))
    }

    /// Lifecycle counters of the cell at `coord`.
    #[must_use]
    pub fn counters(&self, coord: CellCoord) -> Option<CellCounters> {
        self.get(coord).map(|view| view.counters)
    }

    /// Iterator over every cell in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = CellView> + '_ {
        self.cells.iter().map(Cell::view)
    }

    /// Counts the live Moore neighbors of the cell at `coord`.
    ///
    /// Neighbors outside the grid do not contribute and the cell never counts
    /// itself. Returns `None` when `coord` is not on the board.
    #[must_use]
    pub fn live_neighbors(&self, coord: CellCoord) -> Option<u8> {
        if !coord.is_within(self.rows, self.columns) {
            return None;
        }
        Some(count_live_neighbors(self.rows, self.columns, coord, |index| {
            self.cells[index].is_alive()
        }))
    }

    /// Provides read-only access to the configured renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Provides mutable access to the configured renderer.
    ///
    /// Adapters use this to flush or reset their own buffers between frames.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Consumes the board, yielding its renderer.
    #[must_use]
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Hands every cell to `renderer` without touching the board's own renderer.
    ///
    /// When `overlay` is supplied each fill carries the cell's display intensity
    /// for the overlay's category instead of requesting the alive/dead default.
    pub fn display_with<T>(&self, renderer: &mut T, overlay: Option<&Stat>)
    where
        T: CellRenderer + ?Sized,
    {
        present(&self.cells, renderer, overlay);
    }
}

impl<R: CellRenderer> Board<R> {
    /// Advances the whole board by one synchronous generation.
    ///
    /// Returns `true` when at least one cell flipped and `false` once the board
    /// reached a fixed point.
    pub fn advance_generation(&mut self) -> bool {
        self.snapshot.clear();
        self.snapshot.extend(self.cells.iter().map(Cell::is_alive));

        self.pending_flips.clear();
        for cell in &self.cells {
            let snapshot = &self.snapshot;
            let neighbors = count_live_neighbors(self.rows, self.columns, cell.coord(), |index| {
                snapshot[index]
            });
            self.pending_flips
                .push(next_state(cell.is_alive(), neighbors) != cell.is_alive());
        }

        for cell in &mut self.cells {
            cell.record_generation();
        }

        let mut flipped = 0_usize;
        for (cell, &flips) in self.cells.iter_mut().zip(&self.pending_flips) {
            if !flips {
                continue;
            }
            cell.flip();
            flipped += 1;
            self.renderer.draw_fill(&cell.view(), None);
        }

        self.generation = self.generation.saturating_add(1);
        debug!(
            generation = self.generation,
            flipped,
            live = self.live_count(),
            "advanced board generation"
        );

        flipped > 0
    }

    /// Draws every cell through the board's own renderer.
    pub fn display(&mut self, overlay: Option<&Stat>) {
        present(&self.cells, &mut self.renderer, overlay);
    }
}

/// Query functions that provide read-only access to board state.
pub mod query {
    use std::{
        collections::hash_map::DefaultHasher,
        hash::{Hash, Hasher},
    };

    use super::Board;
    use lifestats_core::CellCoord;

    /// Coordinates of every live cell in row-major order.
    #[must_use]
    pub fn live_cells<R>(board: &Board<R>) -> Vec<CellCoord> {
        board
            .cells
            .iter()
            .filter(|cell| cell.is_alive())
            .map(|cell| cell.coord())
            .collect()
    }

    /// Alive flag of every cell in row-major order.
    #[must_use]
    pub fn alive_mask<R>(board: &Board<R>) -> Vec<bool> {
        board.cells.iter().map(|cell| cell.is_alive()).collect()
    }

    /// Hash of the board dimensions and alive mask.
    ///
    /// Two boards of equal size with the same live cells share a fingerprint
    /// regardless of their counters.
    #[must_use]
    pub fn fingerprint<R>(board: &Board<R>) -> u64 {
        let mut hasher = DefaultHasher::new();
        board.rows.hash(&mut hasher);
        board.columns.hash(&mut hasher);
        for cell in &board.cells {
            cell.is_alive().hash(&mut hasher);
        }
        hasher.finish()
    }

    /// Renders the alive mask as rows of `#` and `.` separated by newlines.
    #[must_use]
    pub fn ascii<R>(board: &Board<R>) -> String {
        let width = usize::try_from(board.columns).unwrap_or(usize::MAX);
        let mut out = String::with_capacity(board.cells.len() + board.rows as usize);
        for (index, cell) in board.cells.iter().enumerate() {
            if index > 0 && index % width == 0 {
                out.push('\n');
            }
            out.push(if cell.is_alive() { '#' } else { '.' });
        }
        out
    }
}

fn present<T>(cells: &[Cell], renderer: &mut T, overlay: Option<&Stat>)
where
    T: CellRenderer + ?Sized,
{
    for cell in cells {
        let view = cell.view();
        renderer.draw_outline(&view);
        let intensity = overlay.map(|stat| stat.display_intensity(view.value(stat.category)));
        renderer.draw_fill(&view, intensity);
    }
}

/// Applies the birth/survival rule to a cell with `neighbors` live neighbors.
#[must_use]
pub const fn next_state(is_alive: bool, neighbors: u8) -> bool {
    matches!((is_alive, neighbors), (true, 2) | (true, 3) | (false, 3))
}

fn count_live_neighbors<F>(rows: u32, columns: u32, coord: CellCoord, is_alive: F) -> u8
where
    F: Fn(usize) -> bool,
{
    let mut count = 0;
    for row_offset in -1..=1 {
        for column_offset in -1..=1 {
            let Some(neighbor) = coord.offset(row_offset, column_offset) else {
                continue;
            };
            if neighbor == coord {
                continue;
            }
            let Some(index) = index_of(rows, columns, neighbor) else {
                continue;
            };
            if is_alive(index) {
                count += 1;
            }
        }
    }
    count
}

fn cell_capacity(rows: u32, columns: u32) -> usize {
    let capacity = u64::from(rows) * u64::from(columns);
    usize::try_from(capacity).unwrap_or(0)
}

fn index_of(rows: u32, columns: u32, coord: CellCoord) -> Option<usize> {
    if !coord.is_within(rows, columns) {
        return None;
    }
    let row = usize::try_from(coord.row()).ok()?;
    let column = usize::try_from(coord.column()).ok()?;
    let width = usize::try_from(columns).ok()?;
    Some(row * width + column)
}
