//! Optimal event-trip planning.
//!
//! Pick a subset of events accepted by a decision function and the cheapest
//! walk through it, given pairwise travel costs where an infinite cost means
//! two events cannot be attended back to back.

pub mod config;
pub mod error;
pub mod feasibility;
pub mod logging;
pub mod matrix;
pub mod model;
pub mod parallel;
pub mod planner;
pub mod solver;
pub mod validate;

pub use error::{Result, SolverError};
