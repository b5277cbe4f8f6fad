//! Web search orchestration
//!
//! Runs the enabled providers under a [`Strategy`], normalizes what they
//! return and records usage in the shared statistics.

mod executor;
mod models;

pub use executor::RaceEngine;
pub use models::*;
