//! # Backrooms
//!
//! Headless walk simulation over the streamed backrooms maze. Stands in
//! for the render and input loop: a scripted walker moves through the
//! maze, collides with the streamed geometry, and drives chunk streaming
//! exactly as a player would.
//!
//! ## Running
//!
//! ```bash
//! RUST_LOG=backrooms_streaming=debug walk_sim world.toml --seed deadbeef00face55 --steps 5000
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod error;
pub mod sim;
pub mod walker;

pub use error::{SimError, SimResult};
pub use sim::{run, SimArgs, SimReport};
pub use walker::Walker;
