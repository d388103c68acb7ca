#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that animates a board and prints its lifecycle statistics.

mod config;
mod report;
mod seed;

use std::{io::Write as _, thread};

use anyhow::{Context, Result};
use clap::Parser;
use lifestats_board::Board;
use lifestats_rendering::FrameBuffer;
use lifestats_system_simulation::Simulation;
use lifestats_system_stats::StatsEngine;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::{Cli, Settings};

/// Entry point for the lifestats command-line interface.
fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let settings = Settings::resolve(&cli)?;
    run(&settings)
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(settings: &Settings) -> Result<()> {
    let frame = FrameBuffer::new(
        settings.rows,
        settings.columns,
        settings.shape,
        settings.palette,
    );
    let mut board = Board::with_renderer(
        settings.rows,
        settings.columns,
        settings.live_cells.iter().copied(),
        frame,
    )
    .context("failed to build the initial board")?;
    info!(
        rows = settings.rows,
        columns = settings.columns,
        live = board.live_count(),
        "board ready"
    );

    board.display(None);
    let stdout = std::io::stdout();
    if !settings.quiet {
        print_frame(&mut stdout.lock(), &board, settings.ansi)?;
    }

    let delay = settings.frame_delay();
    let mut simulation = Simulation::new(settings.simulation);
    let mut write_failed = None;
    let summary = simulation.run(&mut board, |board| {
        if settings.quiet || write_failed.is_some() {
            return;
        }
        thread::sleep(delay);
        if let Err(error) = print_frame(&mut stdout.lock(), board, settings.ansi) {
            warn!(%error, "stopped printing frames");
            write_failed = Some(error);
        }
    });
    if let Some(error) = write_failed {
        return Err(error);
    }

    let mut engine = StatsEngine::new();
    let stats = engine
        .calculate_stats(&board)
        .context("failed to summarize the final board")?;
    let overlay = settings.overlay.and_then(|category| stats.get(category));

    board.renderer_mut().clear();
    board.display(overlay);

    let mut out = stdout.lock();
    if settings.quiet || overlay.is_some() {
        print_frame(&mut out, &board, settings.ansi)?;
    }
    writeln!(out, "{}", report::summary_line(&summary))?;
    write!(out, "{}", report::stats_table(stats))?;
    out.flush()?;
    Ok(())
}

fn print_frame(
    out: &mut impl std::io::Write,
    board: &Board<FrameBuffer>,
    ansi: bool,
) -> Result<()> {
    let frame = board.renderer();
    let text = if ansi {
        frame.render_ansi()
    } else {
        frame.render_text()
    };
    writeln!(out, "generation {}\n{text}\n", board.generation())
        .context("failed to write frame")?;
    Ok(())
}
