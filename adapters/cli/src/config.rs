//! Command-line flags, the optional TOML file and the merged run settings.

use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{bail, Context, Result};
use clap::Parser;
use lifestats_core::{CellCoord, StatCategory};
use lifestats_rendering::{CellShape, NamedColor, Palette};
use lifestats_system_simulation::{SimulationConfig, DEFAULT_CYCLE_WINDOW};
use serde::Deserialize;

use crate::seed::{self, Pattern};

const DEFAULT_ROWS: u32 = 20;
const DEFAULT_COLUMNS: u32 = 20;
const MAX_DIMENSION: u32 = 100;
const DEFAULT_SPEED: u8 = 1;
const MAX_SPEED: u8 = 10;
const SPEED_STEP: Duration = Duration::from_millis(100);
const DEFAULT_RANDOM_SEED: u64 = 0x5EED_C0DE;

/// Runs Conway's Game of Life and reports per-cell lifecycle statistics.
#[derive(Parser, Debug)]
#[command(name = "lifestats", version, about)]
pub(crate) struct Cli {
    /// TOML file with default settings; flags override its values.
    #[arg(long, value_name = "PATH")]
    pub(crate) config: Option<PathBuf>,

    /// Number of rows on the board (1-100).
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..=100))]
    pub(crate) rows: Option<u32>,

    /// Number of columns on the board (1-100).
    #[arg(
        short,
        long,
        visible_alias = "columns",
        value_parser = clap::value_parser!(u32).range(1..=100)
    )]
    pub(crate) cols: Option<u32>,

    /// Initial live cells as whitespace-separated `row,col` pairs, e.g. "0,3 3,2".
    #[arg(short, long, value_name = "CELLS")]
    pub(crate) live: Option<String>,

    /// Built-in pattern to seed the board with.
    #[arg(short, long, value_enum)]
    pub(crate) pattern: Option<Pattern>,

    /// Top-left `row,col` of the pattern; centred when omitted.
    #[arg(long, value_name = "ROW,COL", value_parser = seed::parse_pair)]
    pub(crate) at: Option<CellCoord>,

    /// Seeds a random soup where each cell is alive with this probability.
    #[arg(long, value_name = "DENSITY", value_parser = seed::parse_density)]
    pub(crate) random: Option<f64>,

    /// Seed for the random soup generator.
    #[arg(long)]
    pub(crate) seed: Option<u64>,

    /// Animation speed from 1 to 10; each generation waits 100ms times the speed.
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=10))]
    pub(crate) speed: Option<u8>,

    /// Stop after this many generations even if the board is still changing.
    #[arg(short = 'g', long)]
    pub(crate) max_generations: Option<u64>,

    /// Number of past generations checked for repeating layouts; 0 disables it.
    #[arg(long)]
    pub(crate) cycle_window: Option<usize>,

    /// Statistic drawn as an overlay on the final frame.
    #[arg(short, long, value_name = "CATEGORY")]
    pub(crate) overlay: Option<StatCategory>,

    /// Shape used for each cell.
    #[arg(long)]
    pub(crate) shape: Option<CellShape>,

    /// Color of live cells.
    #[arg(long, value_name = "COLOR")]
    pub(crate) alive: Option<NamedColor>,

    /// Color of dead cells.
    #[arg(long, value_name = "COLOR")]
    pub(crate) dead: Option<NamedColor>,

    /// Color of the grid outline.
    #[arg(long, value_name = "COLOR")]
    pub(crate) outline: Option<NamedColor>,

    /// Base color of the statistics overlay.
    #[arg(long, value_name = "COLOR")]
    pub(crate) overlay_color: Option<NamedColor>,

    /// Print only the final frame and the statistics table.
    #[arg(short, long)]
    pub(crate) quiet: bool,

    /// Color frames with ANSI escape sequences.
    #[arg(long)]
    pub(crate) ansi: bool,

    /// Enable debug logging unless RUST_LOG says otherwise.
    #[arg(short, long)]
    pub(crate) verbose: bool,
}

/// Settings read from a `--config` TOML file; every key is optional.
#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct FileConfig {
    rows: Option<u32>,
    #[serde(alias = "columns")]
    cols: Option<u32>,
    live: Option<Vec<[u32; 2]>>,
    pattern: Option<Pattern>,
    at: Option<[u32; 2]>,
    random: Option<f64>,
    seed: Option<u64>,
    speed: Option<u8>,
    max_generations: Option<u64>,
    cycle_window: Option<usize>,
    overlay: Option<StatCategory>,
    shape: Option<CellShape>,
    colors: ColorConfig,
    quiet: Option<bool>,
    ansi: Option<bool>,
}

#[derive(Debug, Default, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
struct ColorConfig {
    alive: Option<NamedColor>,
    dead: Option<NamedColor>,
    outline: Option<NamedColor>,
    overlay: Option<NamedColor>,
}

impl FileConfig {
    /// Reads and parses the TOML file at `path`.
    pub(crate) fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file at {}", path.display()))?;
        Self::parse(&contents)
            .with_context(|| format!("failed to parse config file at {}", path.display()))
    }

    fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("invalid lifestats config toml")
    }
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Settings {
    pub(crate) rows: u32,
    pub(crate) columns: u32,
    pub(crate) live_cells: Vec<CellCoord>,
    pub(crate) speed: u8,
    pub(crate) simulation: SimulationConfig,
    pub(crate) overlay: Option<StatCategory>,
    pub(crate) shape: CellShape,
    pub(crate) palette: Palette,
    pub(crate) quiet: bool,
    pub(crate) ansi: bool,
}

impl Settings {
    /// Merges flags over the optional config file over the built-in defaults.
    pub(crate) fn resolve(cli: &Cli) -> Result<Self> {
        let file = match &cli.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        Self::merge(cli, file)
    }

    fn merge(cli: &Cli, file: FileConfig) -> Result<Self> {
        let rows = cli.rows.or(file.rows).unwrap_or(DEFAULT_ROWS);
        let columns = cli.cols.or(file.cols).unwrap_or(DEFAULT_COLUMNS);
        for (name, value) in [("rows", rows), ("cols", columns)] {
            if !(1..=MAX_DIMENSION).contains(&value) {
                bail!("{name} must lie within 1..={MAX_DIMENSION}, got {value}");
            }
        }

        let speed = cli.speed.or(file.speed).unwrap_or(DEFAULT_SPEED);
        if !(1..=MAX_SPEED).contains(&speed) {
            bail!("speed must lie within 1..={MAX_SPEED}, got {speed}");
        }

        let live_cells = Self::seed_cells(cli, &file, rows, columns)?;

        let defaults = Palette::default();
        let colors = &file.colors;
        let palette = Palette {
            outline: cli.outline.or(colors.outline).map_or(defaults.outline, NamedColor::color),
            alive: cli.alive.or(colors.alive).map_or(defaults.alive, NamedColor::color),
            dead: cli.dead.or(colors.dead).map_or(defaults.dead, NamedColor::color),
            overlay: cli
                .overlay_color
                .or(colors.overlay)
                .map_or(defaults.overlay, NamedColor::color),
        };

        Ok(Self {
            rows,
            columns,
            live_cells,
            speed,
            simulation: SimulationConfig {
                max_generations: cli.max_generations.or(file.max_generations),
                cycle_window: cli
                    .cycle_window
                    .or(file.cycle_window)
                    .unwrap_or(DEFAULT_CYCLE_WINDOW),
            },
            overlay: cli.overlay.or(file.overlay),
            shape: cli.shape.or(file.shape).unwrap_or_default(),
            palette,
            quiet: cli.quiet || file.quiet.unwrap_or(false),
            ansi: cli.ansi || file.ansi.unwrap_or(false),
        })
    }

    fn seed_cells(cli: &Cli, file: &FileConfig, rows: u32, columns: u32) -> Result<Vec<CellCoord>> {
        let mut sources = Vec::new();

        match (&cli.live, &file.live) {
            (Some(live), _) => {
                sources.extend(seed::parse_live_cells(live).context("invalid --live cells")?);
            }
            (None, Some(live)) => {
                sources.extend(live.iter().map(|&[row, column]| CellCoord::new(row, column)));
            }
            (None, None) => {}
        }

        let density = cli.random.or(file.random);
        if let Some(density) = density {
            let seed = cli.seed.or(file.seed).unwrap_or(DEFAULT_RANDOM_SEED);
            sources.extend(
                seed::random_soup(rows, columns, density, seed).context("invalid random soup")?,
            );
        }

        let pattern = cli.pattern.or(file.pattern);
        let nothing_else = sources.is_empty() && density.is_none();
        if let Some(pattern) = pattern.or(nothing_else.then_some(Pattern::RPentomino)) {
            let offset = cli
                .at
                .or(file.at.map(|[row, column]| CellCoord::new(row, column)))
                .unwrap_or_else(|| pattern.centred_offset(rows, columns));
            sources.extend(pattern.place(offset));
        }

        Ok(seed::merge(sources))
    }

    /// Pause between animated generations.
    pub(crate) fn frame_delay(&self) -> Duration {
        SPEED_STEP * u32::from(self.speed)
    }
}
