//! Maintenance Tasks Module
//!
//! # Tasks
//! - Expiry Sweep: removes records whose expiry date has passed, once at
//!   startup and optionally on an interval

mod sweep;

#[cfg(test)]
mod property_tests;

pub use sweep::{
    run_expiry_sweep, run_expiry_sweep_with_timeout, run_startup_sweep, spawn_sweep_task,
    today_utc, LastSweep, SweepOutcome, SweepResult, DEFAULT_SWEEP_TIMEOUT,
};
