//! Emergency Medicine Locator - API bootstrap
//!
//! Wires the HTTP surface and runs the expiry sweep that removes expired
//! medicine records before the server starts accepting requests.

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod startup;
pub mod store;
pub mod tasks;

pub use api::AppState;
pub use config::Config;
pub use store::{MemoryStore, RecordStore, RestStore};
pub use tasks::{run_expiry_sweep, run_startup_sweep, spawn_sweep_task, SweepResult};
