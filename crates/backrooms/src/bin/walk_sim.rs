//! # Walk Simulation
//!
//! Streams the maze around a scripted walker and logs what the stream
//! engine does.
//!
//! ```bash
//! walk_sim [CONFIG.toml] [--seed SEED] [--steps N]
//! ```
//!
//! Log filtering follows `RUST_LOG` (default `info`).

use std::process::ExitCode;

use backrooms::sim::{self, SimArgs, DEFAULT_STEPS};
use backrooms::SimResult;
use backrooms_streaming::ChunkStreamEngine;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            eprintln!("usage: {}", SimArgs::USAGE);
            ExitCode::FAILURE
        }
    }
}

fn run() -> SimResult<()> {
    let args = SimArgs::parse(std::env::args().skip(1))?;
    let config = args.load_config()?;
    let seed = args.session_seed()?;
    let steps = args.steps.unwrap_or(DEFAULT_STEPS);

    tracing::info!(
        "Session {} | chunk {}x{} cells of {} | active r={} cache r={}",
        seed,
        config.chunk_size,
        config.chunk_size,
        config.cell_size,
        config.active_radius,
        config.cache_radius
    );

    let mut engine = ChunkStreamEngine::with_worker_pool(config, seed)?;
    let report = sim::run(&mut engine, steps);

    tracing::info!(
        "Walked {:.1} units over {} frames, {} turns, {} chunks visited, ended at ({:.1}, {:.1})",
        report.distance,
        report.steps,
        report.turns,
        report.chunks_visited,
        report.final_position.0,
        report.final_position.1
    );
    tracing::info!(
        "Clipped frames: {} | flickering lamps in view: {}",
        report.clipped_frames,
        report.flickering_lamps
    );
    tracing::info!(
        "Stream: requested={} ingested={} failed={} stale={} evicted={}+{} loaded={} pending={}",
        report.stats.requested,
        report.stats.ingested,
        report.stats.failed,
        report.stats.stale_discarded,
        report.stats.evicted_distance,
        report.stats.evicted_capacity,
        report.stats.loaded,
        report.stats.pending
    );
    Ok(())
}
