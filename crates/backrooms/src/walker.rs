//! Scripted observer for the headless simulation.
//!
//! Walks straight until a wall stops it, then turns left or right. Turn
//! choices come from an RNG seeded with the session seed, so a walk is as
//! reproducible as the maze it walks through.

use backrooms_procedural::{resolve_collisions, CollisionBox, SessionSeed};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Fraction of a step below which the walker counts as blocked.
const BLOCKED_FRACTION: f32 = 0.25;

/// Chance of turning on an unobstructed step.
const WANDER_CHANCE: f64 = 0.02;

/// East, south, west, north.
const HEADINGS: [(f32, f32); 4] = [(1.0, 0.0), (0.0, 1.0), (-1.0, 0.0), (0.0, -1.0)];

/// A circle walking the XZ plane.
#[derive(Debug)]
pub struct Walker {
    position: (f32, f32),
    heading: usize,
    step_length: f32,
    radius: f32,
    distance: f32,
    turns: u32,
    rng: StdRng,
}

impl Walker {
    /// Places a walker at `position`, heading east.
    #[must_use]
    pub fn new(seed: &SessionSeed, position: (f32, f32), step_length: f32, radius: f32) -> Self {
        Self {
            position,
            heading: 0,
            step_length,
            radius,
            distance: 0.0,
            turns: 0,
            rng: StdRng::seed_from_u64(u64::from(seed.fingerprint())),
        }
    }

    /// Current position.
    #[must_use]
    pub const fn position(&self) -> (f32, f32) {
        self.position
    }

    /// Total distance actually travelled.
    #[must_use]
    pub const fn distance(&self) -> f32 {
        self.distance
    }

    /// Number of turns taken.
    #[must_use]
    pub const fn turns(&self) -> u32 {
        self.turns
    }

    /// Takes one step against `colliders` and returns the new position.
    pub fn step(&mut self, colliders: &[CollisionBox]) -> (f32, f32) {
        let (dx, dz) = HEADINGS[self.heading];
        let target = (
            self.position.0 + dx * self.step_length,
            self.position.1 + dz * self.step_length,
        );
        let resolved = resolve_collisions(target, self.radius, colliders);

        let moved = ((resolved.0 - self.position.0).powi(2)
            + (resolved.1 - self.position.1).powi(2))
        .sqrt();
        self.distance += moved;
        self.position = resolved;

        if moved < self.step_length * BLOCKED_FRACTION || self.rng.gen_bool(WANDER_CHANCE) {
            self.turn();
        }
        resolved
    }

    fn turn(&mut self) {
        let offset = if self.rng.gen_bool(0.5) { 1 } else { 3 };
        self.heading = (self.heading + offset) % HEADINGS.len();
        self.turns += 1;
    }
}
