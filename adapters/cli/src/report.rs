//! Plain-text summaries printed after a run.

use std::fmt::Write as _;

use lifestats_core::{BoardStats, CellCoord};
use lifestats_system_simulation::{RunSummary, Termination};

const HEADER: [&str; 6] = ["category", "max (cell)", "min (cell)", "median", "mean", "stdev"];

/// One-line description of why and where a run stopped.
pub(crate) fn summary_line(summary: &RunSummary) -> String {
    let reason = match summary.termination {
        Termination::FixedPoint => "reached a fixed point".to_owned(),
        Termination::Cycle { period } => format!("entered a cycle of period {period}"),
        Termination::GenerationLimit => "hit the generation limit".to_owned(),
    };
    format!(
        "{reason} after {} generation(s); generation {} has {} live cell(s)",
        summary.generations, summary.final_generation, summary.live_cells
    )
}

/// Renders every category's summary as an aligned table.
pub(crate) fn stats_table(stats: &BoardStats) -> String {
    let rows: Vec<[String; 6]> = stats
        .iter()
        .map(|stat| {
            [
                stat.category.to_string(),
                format!("{} {}", stat.max, coord_label(stat.max_coords)),
                format!("{} {}", stat.min, coord_label(stat.min_coords)),
                format!("{:.2}", stat.median),
                format!("{:.2}", stat.mean),
                format!("{:.2}", stat.population_stdev),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = format!("statistics at generation {}\n", stats.generation());
    push_row(&mut out, HEADER.iter().copied(), &widths);
    for row in &rows {
        push_row(&mut out, row.iter().map(String::as_str), &widths);
    }
    out
}

fn push_row<'a>(out: &mut String, cells: impl Iterator<Item = &'a str>, widths: &[usize; 6]) {
    for (index, (cell, width)) in cells.zip(widths).enumerate() {
        if index == 0 {
            let _ = write!(out, "{cell:<width$}");
        } else {
            let _ = write!(out, "  {cell:>width$}");
        }
    }
    out.push('\n');
}

fn coord_label(coord: CellCoord) -> String {
    format!("({}, {})", coord.row(), coord.column())
}

#[cfg(test)]
mod tests {
    use super::*;
    use lifestats_core::{Stat, StatCategory};

    fn stat(category: StatCategory, max: u64, min: u64) -> Stat {
        Stat {
            category,
            distribution: vec![(max, CellCoord::new(0, 1)), (min, CellCoord::new(2, 3))],
            max,
            max_coords: CellCoord::new(0, 1),
            min,
            min_coords: CellCoord::new(2, 3),
            median: (max + min) as f64 / 2.0,
            mean: (max + min) as f64 / 2.0,
            population_stdev: (max - min) as f64 / 2.0,
        }
    }

    #[test]
    fn table_lists_each_category_once() {
        let stats = BoardStats::new(
            7,
            vec![
                stat(StatCategory::Births, 3, 0),
                stat(StatCategory::GensAlive, 12, 1),
            ],
        );

        let table = stats_table(&stats);
        let lines: Vec<&str> = table.lines().collect();

        assert_eq!(lines[0], "statistics at generation 7");
        assert!(lines[1].starts_with("category"));
        assert_eq!(lines.len(), 4);
        assert!(lines[2].starts_with("births"));
        assert!(lines[2].contains("3 (0, 1)"));
        assert!(lines[2].contains("0 (2, 3)"));
        assert!(lines[3].contains("6.50"));
        assert_eq!(lines[1].len(), lines[2].len());
    }

    #[test]
    fn summary_names_the_termination() {
        let summary = RunSummary {
            termination: Termination::Cycle { period: 2 },
            generations: 2,
            final_generation: 2,
            live_cells: 3,
        };
        assert_eq!(
            summary_line(&summary),
            "entered a cycle of period 2 after 2 generation(s); generation 2 has 3 live cell(s)"
        );
    }
}
