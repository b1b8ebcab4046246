#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Grid-based pursuit AI for Hollow Halls.
//!
//! [`DistanceField`] turns the finished grid into breadth-first hop counts
//! from a source cell; [`PursuerAgent`] runs the chase/wander control loop on
//! top of two such fields, emitting one movement decision per simulation
//! tick. Everything here is single-threaded and per-tick: cooldowns are
//! accumulated elapsed time, never sleeps, and a decision is naturally
//! superseded by the next tick's.

mod agent;
mod field;

pub use agent::{PursuerAgent, PursuerInput, PursuitDecision, PursuitMode};
pub use field::DistanceField;
