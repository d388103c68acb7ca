use lifestats_core::{CellCoord, CellCounters, CellView};

/// Single grid cell owned exclusively by its board.
#[derive(Clone, Debug)]
pub(crate) struct Cell {
    coord: CellCoord,
    is_alive: bool,
    counters: CellCounters,
}

impl Cell {
    pub(crate) fn new(coord: CellCoord, is_alive: bool) -> Self {
        Self {
            coord,
            is_alive,
            counters: CellCounters::default(),
        }
    }

    pub(crate) fn coord(&self) -> CellCoord {
        self.coord
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.is_alive
    }

    pub(crate) fn view(&self) -> CellView {
        CellView {
            coord: self.coord,
            is_alive: self.is_alive,
            counters: self.counters,
        }
    }

    /// Accounts one generation spent in the current (pre-transition) state.
    pub(crate) fn record_generation(&mut self) {
        let counters = &mut self.counters;
        if self.is_alive {
            counters.gens_alive += 1;
            counters.current_living_streak += 1;
            counters.longest_living_streak = counters
                .longest_living_streak
                .max(counters.current_living_streak);
        } else {
            counters.gens_dead += 1;
            counters.current_dead_streak += 1;
            counters.longest_dead_streak = counters
                .longest_dead_streak
                .max(counters.current_dead_streak);
        }
    }

    /// Toggles the cell and breaks both streaks.
    pub(crate) fn flip(&mut self) {
        self.is_alive = !self.is_alive;
        if self.is_alive {
            self.counters.births += 1;
        } else {
            self.counters.deaths += 1;
        }
        self.counters.current_living_streak = 0;
        self.counters.current_dead_streak = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::Cell;
    use lifestats_core::CellCoord;

    #[test]
    fn streaks_reset_on_flip_but_longest_survives() {
        let mut cell = Cell::new(CellCoord::new(0, 0), true);
        cell.record_generation();
        cell.record_generation();
        cell.record_generation();
        cell.flip();

        let counters = cell.view().counters;
        assert_eq!(counters.gens_alive, 3);
        assert_eq!(counters.longest_living_streak, 3);
        assert_eq!(counters.current_living_streak, 0);
        assert_eq!(counters.deaths, 1);
        assert!(!cell.is_alive());

        cell.record_generation();
        let counters = cell.view().counters;
        assert_eq!(counters.gens_dead, 1);
        assert_eq!(counters.current_dead_streak, 1);
        assert_eq!(counters.longest_dead_streak, 1);
        assert_eq!(counters.longest_living_streak, 3);
    }

    #[test]
    fn flip_to_alive_counts_a_birth() {
        let mut cell = Cell::new(CellCoord::new(2, 5), false);
        cell.record_generation();
        cell.flip();

        let view = cell.view();
        assert!(view.is_alive);
        assert_eq!(view.counters.births, 1);
        assert_eq!(view.counters.deaths, 0);
        assert_eq!(view.counters.current_dead_streak, 0);
        assert_eq!(view.counters.longest_dead_streak, 1);
    }
}
