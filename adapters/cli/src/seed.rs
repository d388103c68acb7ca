//! Initial live-cell sources: explicit coordinates, named patterns and random soups.

use std::{collections::BTreeSet, num::ParseIntError};

use clap::ValueEnum;
use lifestats_core::CellCoord;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Deserialize;
use thiserror::Error;

/// Errors raised while turning user input into live coordinates.
#[derive(Debug, Error, PartialEq, Eq)]
pub(crate) enum SeedError {
    /// A token was not of the form `row,col`.
    #[error("expected `row,col` but found `{0}`")]
    MalformedPair(String),
    /// A coordinate component was not an unsigned integer.
    #[error("invalid coordinate in `{token}`: {source}")]
    InvalidNumber {
        /// Offending token.
        token: String,
        /// Underlying parse failure.
        source: ParseIntError,
    },
    /// Random density was outside `0.0..=1.0`.
    #[error("random density must lie within 0.0..=1.0, got {0}")]
    InvalidDensity(String),
}

/// Well-known starting layouts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum Pattern {
    /// 2x2 still life.
    Block,
    /// Period-two horizontal bar.
    Blinker,
    /// Period-two oscillator.
    Toad,
    /// Period-two pair of blocks.
    Beacon,
    /// Diagonal spaceship heading down and right.
    Glider,
    /// Methuselah that runs for over a thousand generations on an open plane.
    #[serde(alias = "rpentomino")]
    #[value(alias = "rpentomino")]
    RPentomino,
}

impl Pattern {
    /// Cells relative to the pattern's top-left corner.
    pub(crate) const fn cells(self) -> &'static [(u32, u32)] {
        match self {
            Self::Block => &[(0, 0), (0, 1), (1, 0), (1, 1)],
            Self::Blinker => &[(0, 0), (0, 1), (0, 2)],
            Self::Toad => &[(0, 1), (0, 2), (0, 3), (1, 0), (1, 1), (1, 2)],
            Self::Beacon => &[(0, 0), (0, 1), (1, 0), (2, 3), (3, 2), (3, 3)],
            Self::Glider => &[(0, 1), (1, 2), (2, 0), (2, 1), (2, 2)],
            Self::RPentomino => &[(0, 1), (0, 2), (1, 0), (1, 1), (2, 1)],
        }
    }

    /// Bounding box as `(rows, columns)`.
    pub(crate) fn extent(self) -> (u32, u32) {
        self.cells()
            .iter()
            .fold((0, 0), |(rows, columns), &(row, column)| {
                (rows.max(row + 1), columns.max(column + 1))
            })
    }

    /// Offset that centres the pattern on a `rows` x `columns` board.
    pub(crate) fn centred_offset(self, rows: u32, columns: u32) -> CellCoord {
        let (height, width) = self.extent();
        CellCoord::new(
            rows.saturating_sub(height) / 2,
            columns.saturating_sub(width) / 2,
        )
    }

    /// Absolute coordinates with the pattern's top-left corner at `offset`.
    pub(crate) fn place(self, offset: CellCoord) -> impl Iterator<Item = CellCoord> {
        self.cells().iter().map(move |&(row, column)| {
            CellCoord::new(
                offset.row().saturating_add(row),
                offset.column().saturating_add(column),
            )
        })
    }
}

/// Parses a single `row,col` token.
pub(crate) fn parse_pair(token: &str) -> Result<CellCoord, SeedError> {
    let (row, column) = token
        .split_once(',')
        .ok_or_else(|| SeedError::MalformedPair(token.to_owned()))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .map_err(|source| SeedError::InvalidNumber {
                token: token.to_owned(),
                source,
            })
    };
    Ok(CellCoord::new(parse(row)?, parse(column)?))
}

/// Parses whitespace separated `row,col` pairs such as `"0,3 3,2"`.
pub(crate) fn parse_live_cells(input: &str) -> Result<Vec<CellCoord>, SeedError> {
    input.split_whitespace().map(parse_pair).collect()
}

/// Validates a density given on the command line.
pub(crate) fn parse_density(input: &str) -> Result<f64, SeedError> {
    match input.trim().parse::<f64>() {
        Ok(density) if (0.0..=1.0).contains(&density) => Ok(density),
        _ => Err(SeedError::InvalidDensity(input.to_owned())),
    }
}

/// Marks each cell alive with probability `density` using a seeded generator.
///
/// The same `seed` always yields the same soup.
pub(crate) fn random_soup(
    rows: u32,
    columns: u32,
    density: f64,
    seed: u64,
) -> Result<Vec<CellCoord>, SeedError> {
    if !(0.0..=1.0).contains(&density) {
        return Err(SeedError::InvalidDensity(density.to_string()));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut live = Vec::new();
    for row in 0..rows {
        for column in 0..columns {
            if rng.gen_bool(density) {
                live.push(CellCoord::new(row, column));
            }
        }
    }
    Ok(live)
}

/// Merges several coordinate sources into a sorted, duplicate-free list.
pub(crate) fn merge<I>(sources: I) -> Vec<CellCoord>
where
    I: IntoIterator<Item = CellCoord>,
{
    sources
        .into_iter()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_console_format() {
        let cells = parse_live_cells("0,3  3,2\n1,1").expect("valid input");
        assert_eq!(
            cells,
            vec![
                CellCoord::new(0, 3),
                CellCoord::new(3, 2),
                CellCoord::new(1, 1)
            ]
        );
        assert_eq!(parse_live_cells("   ").expect("empty"), Vec::new());
    }

    #[test]
    fn rejects_malformed_tokens() {
        assert_eq!(
            parse_live_cells("0,3 42"),
            Err(SeedError::MalformedPair("42".to_owned()))
        );
        assert!(matches!(
            parse_live_cells("-1,2"),
            Err(SeedError::InvalidNumber { .. })
        ));
    }

    #[test]
    fn density_must_be_a_probability() {
        assert_eq!(parse_density("0.25"), Ok(0.25));
        assert!(parse_density("1.5").is_err());
        assert!(parse_density("lots").is_err());
        assert!(random_soup(4, 4, -0.1, 0).is_err());
    }

    #[test]
    fn soups_are_reproducible_per_seed() {
        let first = random_soup(20, 20, 0.3, 7).expect("valid density");
        let second = random_soup(20, 20, 0.3, 7).expect("valid density");
        assert_eq!(first, second);
        assert!(first.iter().all(|coord| coord.is_within(20, 20)));

        assert!(random_soup(5, 5, 0.0, 1).expect("valid").is_empty());
        assert_eq!(random_soup(5, 5, 1.0, 1).expect("valid").len(), 25);
    }

    #[test]
    fn patterns_are_placed_at_offset() {
        let glider: Vec<_> = Pattern::Glider.place(CellCoord::new(3, 4)).collect();
        assert_eq!(glider[0], CellCoord::new(3, 5));
        assert_eq!(Pattern::Glider.extent(), (3, 3));
        assert_eq!(Pattern::Beacon.extent(), (4, 4));
        assert_eq!(
            Pattern::RPentomino.centred_offset(12, 12),
            CellCoord::new(4, 4)
        );
        assert_eq!(Pattern::Block.centred_offset(1, 1), CellCoord::new(0, 0));
    }

    #[test]
    fn merge_removes_duplicates() {
        let merged = merge([
            CellCoord::new(1, 1),
            CellCoord::new(0, 2),
            CellCoord::new(1, 1),
        ]);
        assert_eq!(merged, vec![CellCoord::new(0, 2), CellCoord::new(1, 1)]);
    }
}
