//! # Walk Simulation
//!
//! One frame of the loop:
//!
//! 1. Step the walker against the snapshot's nearby colliders
//! 2. Re-centre the engine if the walker crossed into a new chunk
//! 3. Poll for finished chunks
//!
//! The first frame preloads the spawn area so the walker never starts in
//! an empty world.

use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Duration;

use backrooms_procedural::{ChunkCoord, SessionSeed, WorldConfig};
use backrooms_streaming::{ChunkStreamEngine, GenerationBackend, StreamStats};

use crate::error::{SimError, SimResult};
use crate::walker::Walker;

/// Default number of frames.
pub const DEFAULT_STEPS: u32 = 2_000;

/// Distance walked per frame, in world units.
pub const STEP_LENGTH: f32 = 0.4;

/// Frames between progress log lines.
pub const REPORT_EVERY: u32 = 250;

/// Time allowed for the spawn preload.
pub const PRELOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Parsed command line.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SimArgs {
    /// TOML world configuration, defaults when absent.
    pub config_path: Option<PathBuf>,
    /// Session seed, random when absent.
    pub seed: Option<String>,
    /// Frames to simulate.
    pub steps: Option<u32>,
}

impl SimArgs {
    /// Usage line.
    pub const USAGE: &'static str = "walk_sim [CONFIG.toml] [--seed SEED] [--steps N]";

    /// Parses arguments (without the program name).
    ///
    /// # Errors
    ///
    /// Returns `Usage` for unknown flags, missing values or a second
    /// positional argument.
    pub fn parse<I, S>(args: I) -> SimResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut parsed = Self::default();
        let mut args = args.into_iter().map(Into::into);

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--seed" => {
                    let value = args.next().ok_or_else(|| missing("--seed"))?;
                    parsed.seed = Some(value);
                }
                "--steps" => {
                    let value = args.next().ok_or_else(|| missing("--steps"))?;
                    let steps = value
                        .parse()
                        .map_err(|_| SimError::Usage(format!("--steps expects a number, got `{value}`")))?;
                    parsed.steps = Some(steps);
                }
                flag if flag.starts_with("--") => {
                    return Err(SimError::Usage(format!("unknown flag `{flag}`")));
                }
                path => {
                    if parsed.config_path.is_some() {
                        return Err(SimError::Usage(format!("unexpected argument `{path}`")));
                    }
                    parsed.config_path = Some(PathBuf::from(path));
                }
            }
        }

        Ok(parsed)
    }

    /// Loads the configuration, or the defaults without a path.
    ///
    /// # Errors
    ///
    /// Propagates configuration load failures.
    pub fn load_config(&self) -> SimResult<WorldConfig> {
        match &self.config_path {
            Some(path) => Ok(WorldConfig::from_toml_file(path)?),
            None => Ok(WorldConfig::default()),
        }
    }

    /// The given seed, or a fresh random one.
    ///
    /// # Errors
    ///
    /// Returns `Entropy` if no seed was given and the OS has no entropy.
    pub fn session_seed(&self) -> SimResult<SessionSeed> {
        match &self.seed {
            Some(seed) => Ok(SessionSeed::new(seed.as_str())),
            None => Ok(SessionSeed::random()?),
        }
    }
}

fn missing(flag: &str) -> SimError {
    SimError::Usage(format!("{flag} expects a value"))
}

/// Summary of a finished walk.
#[derive(Clone, Debug, PartialEq)]
pub struct SimReport {
    /// Frames simulated.
    pub steps: u32,
    /// Distinct chunks the walker stood in.
    pub chunks_visited: usize,
    /// Distance actually covered.
    pub distance: f32,
    /// Walker turns.
    pub turns: u32,
    /// Frames that ended with the walker's centre inside a collider.
    pub clipped_frames: u32,
    /// Flickering office lamps in the final active chunks.
    pub flickering_lamps: usize,
    /// Final walker position.
    pub final_position: (f32, f32),
    /// Whether the spawn preload completed.
    pub preloaded: bool,
    /// Engine counters at the end of the walk.
    pub stats: StreamStats,
}

/// Walks `steps` frames from the centre of cell (0, 0).
pub fn run<B: GenerationBackend>(engine: &mut ChunkStreamEngine<B>, steps: u32) -> SimReport {
    let config = engine.config().clone();
    let spawn = (0.5 * config.cell_size, 0.5 * config.cell_size);
    let mut walker = Walker::new(engine.seed(), spawn, STEP_LENGTH, config.player_radius);

    engine.update_position(f64::from(spawn.0), f64::from(spawn.1));
    let preloaded = engine.flush_generation_queue(PRELOAD_TIMEOUT);
    if !preloaded {
        tracing::warn!("Spawn preload timed out with {} chunks pending", engine.pending_count());
    }

    let mut clipped_frames = 0;
    let mut visited: HashSet<ChunkCoord> = HashSet::new();
    visited.insert(config.chunk_coord_at(f64::from(spawn.0), f64::from(spawn.1)));

    for frame in 1..=steps {
        let snapshot = engine.snapshot();
        let (x, z) = walker.step(&snapshot.nearby_colliders);
        if snapshot.nearby_colliders.iter().any(|c| c.contains(x, z)) {
            clipped_frames += 1;
        }

        if engine.update_position(f64::from(x), f64::from(z)) {
            visited.insert(config.chunk_coord_at(f64::from(x), f64::from(z)));
        }
        engine.poll();

        if frame % REPORT_EVERY == 0 {
            let stats = engine.stats();
            tracing::info!(
                "frame {}: pos=({:.1}, {:.1}) loaded={} pending={} requested={} evicted={}",
                frame,
                x,
                z,
                stats.loaded,
                stats.pending,
                stats.requested,
                stats.evicted_distance + stats.evicted_capacity
            );
        }
    }

    let flickering_lamps = engine
        .snapshot()
        .active_chunks
        .iter()
        .flat_map(|chunk| chunk.data().office_lamps())
        .filter(|lamp| lamp.flickers())
        .count();

    SimReport {
        steps,
        chunks_visited: visited.len(),
        distance: walker.distance(),
        turns: walker.turns(),
        clipped_frames,
        flickering_lamps,
        final_position: walker.position(),
        preloaded,
        stats: engine.stats(),
    }
}
