use std::collections::BTreeSet;

use lifestats_board::{query, Board};
use lifestats_core::{CellCoord, CellRenderer, CellView};

fn coords(cells: &[(u32, u32)]) -> Vec<CellCoord> {
    cells
        .iter()
        .map(|&(row, column)| CellCoord::new(row, column))
        .collect()
}

fn live_set<R>(board: &Board<R>) -> BTreeSet<CellCoord> {
    query::live_cells(board).into_iter().collect()
}

fn shifted(cells: &[(u32, u32)], rows: u32, columns: u32) -> BTreeSet<CellCoord> {
    cells
        .iter()
        .map(|&(row, column)| CellCoord::new(row + rows, column + columns))
        .collect()
}

/// Recomputes the next generation from a frozen copy of the alive mask.
fn reference_next(before: &[CellView], rows: u32, columns: u32) -> BTreeSet<CellCoord> {
    let alive: BTreeSet<(i64, i64)> = before
        .iter()
        .filter(|view| view.is_alive)
        .map(|view| (i64::from(view.coord.row()), i64::from(view.coord.column())))
        .collect();

    let mut next = BTreeSet::new();
    for row in 0..i64::from(rows) {
        for column in 0..i64::from(columns) {
            let mut neighbors = 0;
            for dr in -1..=1 {
                for dc in -1..=1 {
                    if (dr, dc) != (0, 0) && alive.contains(&(row + dr, column + dc)) {
                        neighbors += 1;
                    }
                }
            }
            let is_alive = alive.contains(&(row, column));
            if neighbors == 3 || (is_alive && neighbors == 2) {
                let _ = next.insert(CellCoord::new(row as u32, column as u32));
            }
        }
    }
    next
}

#[derive(Debug, Default)]
struct RecordingRenderer {
    outlines: Vec<CellCoord>,
    fills: Vec<(CellCoord, bool, Option<u8>)>,
}

impl CellRenderer for RecordingRenderer {
    fn draw_outline(&mut self, cell: &CellView) {
        self.outlines.push(cell.coord);
    }

    fn draw_fill(&mut self, cell: &CellView, intensity: Option<u8>) {
        self.fills.push((cell.coord, cell.is_alive, intensity));
    }
}

#[test]
fn block_is_a_still_life() {
    let block = coords(&[(1, 1), (1, 2), (2, 1), (2, 2)]);
    let mut board = Board::new(4, 4, block.clone()).expect("valid board");

    assert!(!board.advance_generation(), "still life must not change");
    assert_eq!(live_set(&board), block.into_iter().collect());
    assert_eq!(board.generation(), 1);
}

#[test]
fn blinker_oscillates_with_period_two() {
    let horizontal = coords(&[(2, 1), (2, 2), (2, 3)]);
    let vertical: BTreeSet<CellCoord> = coords(&[(1, 2), (2, 2), (3, 2)]).into_iter().collect();
    let mut board = Board::new(5, 5, horizontal.clone()).expect("valid board");

    for step in 0..6 {
        assert!(board.advance_generation(), "blinker must change on step {step}");
        let expected = if step % 2 == 0 {
            vertical.clone()
        } else {
            horizontal.iter().copied().collect()
        };
        assert_eq!(live_set(&board), expected, "unexpected shape after step {step}");
    }
}

#[test]
fn isolated_cell_dies_then_board_is_fixed() {
    let mut board = Board::new(5, 5, coords(&[(2, 2)])).expect("valid board");

    assert!(board.advance_generation());
    assert_eq!(board.live_count(), 0);
    assert!(!board.advance_generation());
}

#[test]
fn glider_translates_diagonally_every_four_generations() {
    let glider = [(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)];
    let start = shifted(&glider, 3, 3);
    let mut board = Board::new(12, 12, start.iter().copied()).expect("valid board");

    for _ in 0..4 {
        assert!(board.advance_generation());
    }

    assert_eq!(live_set(&board), shifted(&glider, 4, 4));
}

#[test]
fn edges_do_not_wrap() {
    let mut board = Board::new(3, 3, coords(&[(0, 0), (0, 1), (0, 2)])).expect("valid board");

    assert!(board.advance_generation());

    assert_eq!(
        live_set(&board),
        coords(&[(0, 1), (1, 1)]).into_iter().collect()
    );
}

#[test]
fn next_generation_depends_only_on_previous_snapshot() {
    let r_pentomino = coords(&[(4, 5), (4, 6), (5, 4), (5, 5), (6, 5)]);
    let mut board = Board::new(10, 11, r_pentomino).expect("valid board");

    for generation in 0..25 {
        let before: Vec<CellView> = board.cells().collect();
        let expected = reference_next(&before, board.rows(), board.columns());
        let changed = board.advance_generation();
        let after = live_set(&board);

        assert_eq!(after, expected, "diverged at generation {generation}");
        let was: BTreeSet<CellCoord> = before
            .iter()
            .filter(|view| view.is_alive)
            .map(|view| view.coord)
            .collect();
        assert_eq!(changed, was != after);
    }
}

#[test]
fn counters_track_every_generation() {
    let initial: BTreeSet<CellCoord> = coords(&[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3), (0, 0)])
        .into_iter()
        .collect();
    let mut board = Board::new(8, 8, initial.iter().copied()).expect("valid board");

    for generations in 1..=12_u64 {
        let _ = board.advance_generation();

        for view in board.cells() {
            let counters = view.counters;
            assert_eq!(counters.generations(), generations);

            let started_alive = initial.contains(&view.coord);
            let balance = counters.births as i64 - counters.deaths as i64;
            let expected = match (started_alive, view.is_alive) {
                (false, true) => 1,
                (true, false) => -1,
                _ => 0,
            };
            assert_eq!(balance, expected, "birth/death balance broken at {:?}", view.coord);

            assert!(counters.longest_living_streak >= counters.current_living_streak);
            assert!(counters.longest_dead_streak >= counters.current_dead_streak);
            assert!(counters.longest_living_streak <= counters.gens_alive);
            assert!(counters.longest_dead_streak <= counters.gens_dead);
        }
    }
}

#[test]
fn streaks_follow_pre_transition_state() {
    let mut board = Board::new(5, 5, coords(&[(2, 1), (2, 2), (2, 3)])).expect("valid board");

    let _ = board.advance_generation();
    let _ = board.advance_generation();

    let center = board.cell(2, 2).expect("center cell");
    assert!(center.is_alive);
    assert_eq!(center.counters.gens_alive, 2);
    assert_eq!(center.counters.current_living_streak, 2);
    assert_eq!(center.counters.longest_living_streak, 2);
    assert_eq!(center.counters.births, 0);

    let end = board.cell(2, 1).expect("end cell");
    assert!(end.is_alive);
    assert_eq!(end.counters.gens_alive, 1);
    assert_eq!(end.counters.gens_dead, 1);
    assert_eq!(end.counters.deaths, 1);
    assert_eq!(end.counters.births, 1);
    assert_eq!(end.counters.current_living_streak, 0);
    assert_eq!(end.counters.current_dead_streak, 0);
    assert_eq!(end.counters.longest_living_streak, 1);
    assert_eq!(end.counters.longest_dead_streak, 1);
}

#[test]
fn renderer_receives_only_flipped_cells_on_advance() {
    let renderer = RecordingRenderer::default();
    let mut board = Board::with_renderer(5, 5, coords(&[(2, 1), (2, 2), (2, 3)]), renderer)
        .expect("valid board");

    assert!(board.advance_generation());

    let renderer = board.renderer();
    assert!(renderer.outlines.is_empty());
    let flipped: BTreeSet<(CellCoord, bool)> = renderer
        .fills
        .iter()
        .map(|&(coord, alive, intensity)| {
            assert_eq!(intensity, None);
            (coord, alive)
        })
        .collect();
    let expected: BTreeSet<(CellCoord, bool)> = [
        (CellCoord::new(1, 2), true),
        (CellCoord::new(3, 2), true),
        (CellCoord::new(2, 1), false),
        (CellCoord::new(2, 3), false),
    ]
    .into_iter()
    .collect();
    assert_eq!(flipped, expected);
}

#[test]
fn rendering_does_not_affect_state() {
    let seed = coords(&[(1, 2), (2, 3), (3, 1), (3, 2), (3, 3)]);
    let mut headless = Board::new(9, 9, seed.clone()).expect("valid board");
    let mut rendered =
        Board::with_renderer(9, 9, seed, RecordingRenderer::default()).expect("valid board");

    for _ in 0..10 {
        assert_eq!(headless.advance_generation(), rendered.advance_generation());
        rendered.display(None);
    }

    let headless_cells: Vec<CellView> = headless.cells().collect();
    let rendered_cells: Vec<CellView> = rendered.cells().collect();
    assert_eq!(headless_cells, rendered_cells);
    assert_eq!(query::fingerprint(&headless), query::fingerprint(&rendered));
}

#[test]
fn display_outlines_and_fills_every_cell() {
    let board = Board::new(3, 4, coords(&[(0, 0)])).expect("valid board");
    let mut renderer = RecordingRenderer::default();

    board.display_with(&mut renderer, None);

    assert_eq!(renderer.outlines.len(), 12);
    assert_eq!(renderer.fills.len(), 12);
    assert_eq!(renderer.fills[0], (CellCoord::new(0, 0), true, None));
    assert!(renderer.fills[1..].iter().all(|&(_, alive, _)| !alive));
}

#[test]
fn fingerprint_ignores_counters() {
    let mut blinker = Board::new(5, 5, coords(&[(2, 1), (2, 2), (2, 3)])).expect("valid board");
    let fresh = Board::new(5, 5, coords(&[(2, 1), (2, 2), (2, 3)])).expect("valid board");

    let _ = blinker.advance_generation();
    assert_ne!(query::fingerprint(&blinker), query::fingerprint(&fresh));
    let _ = blinker.advance_generation();
    assert_eq!(query::fingerprint(&blinker), query::fingerprint(&fresh));
}
