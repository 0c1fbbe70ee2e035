//! Core simulation data structures for the collision engine.
//!
//! Particles live in an arena owned by [`Simulation`]; events refer to them by
//! index, and the [`Scheduler`] orders events by time.

pub mod domain;
pub mod event;
pub mod particle;
pub mod scheduler;
pub mod sim;
pub mod spawn;

pub use domain::Domain;
pub use event::{Event, EventKind};
pub use particle::Particle;
pub use scheduler::Scheduler;
pub use sim::{RunSummary, SimState, Simulation, Stats, StepOutcome, Termination};
