//! Event-driven simulation of elastic collisions between hard discs in a box.
//!
//! Instead of stepping time in fixed increments, the engine predicts when each
//! pair of discs, and each disc and wall, will next touch, keeps those
//! predictions in a priority queue, and jumps straight from one collision to
//! the next.
//!
//! ```no_run
//! use collide::config::{SimConfig, SpawnParams};
//! use collide::core::Simulation;
//! use collide::render::NullRenderer;
//!
//! # fn main() -> collide::error::Result<()> {
//! let mut sim = Simulation::random(&SpawnParams::default(), SimConfig::default(), Some(42))?;
//! let summary = sim.run(&mut NullRenderer)?;
//! println!("{} collisions", summary.stats.particle_collisions);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod core;
pub mod error;
pub mod render;

pub use crate::config::{SimConfig, SpawnParams};
pub use crate::core::{Particle, Simulation};
pub use crate::error::{Error, Result};
