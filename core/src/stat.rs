//! Statistics contracts computed from committed cell state.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::CellCoord;

/// Intensity reported for a non-zero value when the distribution has no spread.
/// Half of full opacity, truncated.
const FLAT_DISTRIBUTION_INTENSITY: u8 = 127;
/// Percentile above which the overlay saturates.
const UPPER_PERCENTILE: f64 = 0.95;
/// Percentile below which the overlay is transparent.
const LOWER_PERCENTILE: f64 = 0.05;

/// Lifecycle counters that can be aggregated across a board.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatCategory {
    /// Longest unbroken run of living generations.
    LongestLivingStreak,
    /// Longest unbroken run of dead generations.
    #[serde(rename = "longest_death_streak", alias = "longest_dead_streak")]
    LongestDeadStreak,
    /// Dead-to-alive transitions.
    Births,
    /// Alive-to-dead transitions.
    Deaths,
    /// Generations spent alive.
    GensAlive,
    /// Generations spent dead.
    GensDead,
}

impl StatCategory {
    /// Every tracked category in canonical order.
    pub const ALL: [StatCategory; 6] = [
        StatCategory::LongestLivingStreak,
        StatCategory::LongestDeadStreak,
        StatCategory::Births,
        StatCategory::Deaths,
        StatCategory::GensAlive,
        StatCategory::GensDead,
    ];

    /// Machine-readable identifier of the category.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::LongestLivingStreak => "longest_living_streak",
            Self::LongestDeadStreak => "longest_death_streak",
            Self::Births => "births",
            Self::Deaths => "deaths",
            Self::GensAlive => "gens_alive",
            Self::GensDead => "gens_dead",
        }
    }

    /// Position of the category within [`StatCategory::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        match self {
            Self::LongestLivingStreak => 0,
            Self::LongestDeadStreak => 1,
            Self::Births => 2,
            Self::Deaths => 3,
            Self::GensAlive => 4,
            Self::GensDead => 5,
        }
    }
}

impl fmt::Display for StatCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when parsing an unrecognised category name.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("unknown statistics category `{0}`")]
pub struct UnknownStatCategory(pub String);

impl FromStr for StatCategory {
    type Err = UnknownStatCategory;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "longest_dead_streak" => return Ok(Self::LongestDeadStreak),
            "alive" => return Ok(Self::GensAlive),
            "dead" => return Ok(Self::GensDead),
            _ => {}
        }

        Self::ALL
            .into_iter()
            .find(|category| category.name() == normalized)
            .ok_or_else(|| UnknownStatCategory(value.to_owned()))
    }
}

/// Distribution summary for a single category across every cell of a board.
#[derive(Clone, Debug, PartialEq)]
pub struct Stat {
    /// Category the summary describes.
    pub category: StatCategory,
    /// One `(value, coordinate)` pair per cell, sorted by descending value.
    pub distribution: Vec<(u64, CellCoord)>,
    /// Largest value in the distribution.
    pub max: u64,
    /// Cell that holds the largest value.
    pub max_coords: CellCoord,
    /// Smallest value in the distribution.
    pub min: u64,
    /// Cell that holds the smallest value.
    pub min_coords: CellCoord,
    /// Median value; the mean of the two middle values for even-sized boards.
    pub median: f64,
    /// Arithmetic mean.
    pub mean: f64,
    /// Population standard deviation (divides by N).
    pub population_stdev: f64,
}

impl Stat {
    /// Maps a raw category value to an overlay opacity in `0..=255`.
    ///
    /// Zero values are invisible. A distribution without spread renders every
    /// non-zero value at half intensity. Otherwise the value's z-score is turned
    /// into a normal percentile and ramped linearly through the central 90%,
    /// clipping to fully transparent below the 5th and fully opaque above the
    /// 95th percentile.
    #[must_use]
    pub fn display_intensity(&self, value: u64) -> u8 {
        if value == 0 {
            return 0;
        }

        if self.population_stdev <= 0.0 || !self.population_stdev.is_finite() {
            return FLAT_DISTRIBUTION_INTENSITY;
        }

        let z = (value as f64 - self.mean) / self.population_stdev;
        let percentile = normal_cdf(z);
        if percentile > UPPER_PERCENTILE {
            u8::MAX
        } else if percentile < LOWER_PERCENTILE {
            0
        } else {
            (percentile * 255.0) as u8
        }
    }
}

/// Summaries for every tracked category, captured at a single generation.
#[derive(Clone, Debug, PartialEq)]
pub struct BoardStats {
    generation: u64,
    stats: Vec<Stat>,
}

impl BoardStats {
    /// Bundles per-category summaries computed at the provided generation.
    #[must_use]
    pub fn new(generation: u64, mut stats: Vec<Stat>) -> Self {
        stats.sort_by_key(|stat| stat.category);
        stats.dedup_by_key(|stat| stat.category);
        Self { generation, stats }
    }

    /// Generation of the board the summaries were computed from.
    #[must_use]
    pub const fn generation(&self) -> u64 {
        self.generation
    }

    /// Returns the summary for a category, if it was computed.
    #[must_use]
    pub fn get(&self, category: StatCategory) -> Option<&Stat> {
        self.stats
            .binary_search_by_key(&category, |stat| stat.category)
            .ok()
            .map(|index| &self.stats[index])
    }

    /// Iterator over the captured summaries in canonical category order.
    pub fn iter(&self) -> impl Iterator<Item = &Stat> {
        self.stats.iter()
    }
}

/// Cumulative distribution function of the standard normal distribution.
#[must_use]
pub fn normal_cdf(z: f64) -> f64 {
    0.5 * erfc(-z / std::f64::consts::SQRT_2)
}

/// Complementary error function with fractional error below 1.2e-7.
fn erfc(x: f64) -> f64 {
    let z = x.abs();
    let t = 1.0 / (1.0 + 0.5 * z);
    let polynomial = -z * z - 1.265_512_23
        + t * (1.000_023_68
            + t * (0.374_091_96
                + t * (0.096_784_18
                    + t * (-0.186_288_06
                        + t * (0.278_868_07
                            + t * (-1.135_203_98
                                + t * (1.488_515_87
                                    + t * (-0.822_152_23 + t * 0.170_872_77))))))));
    let answer = t * polynomial.exp();
    if x >= 0.0 {
        answer
    } else {
        2.0 - answer
    }
}
