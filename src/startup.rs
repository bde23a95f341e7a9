//! Startup Sequence
//!
//! Everything that must happen before the listener is bound: picking the
//! record store, running the expiry sweep, and assembling the router.

use std::sync::Arc;

use axum::Router;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::Config;
use crate::error::StoreResult;
use crate::store::{MemoryStore, RecordStore, RestStore};
use crate::tasks::{run_startup_sweep, spawn_sweep_task};

/// Output of [`prepare`]: a router ready to serve.
pub struct Startup {
    /// Router with all endpoints and middleware
    pub router: Router,
    /// Shared state, already holding the startup sweep's result
    pub state: AppState,
    /// Periodic sweep task, if one was configured; abort it on shutdown
    pub sweep_handle: Option<JoinHandle<()>>,
}

/// Picks the hosted store when configured, the in-memory store otherwise.
pub fn build_store(config: &Config) -> StoreResult<Arc<dyn RecordStore>> {
    match RestStore::from_config(config) {
        Some(store) => {
            let store = store?;
            info!("Using hosted record store at {}", store.table_url());
            Ok(Arc::new(store))
        }
        None => {
            warn!("SUPABASE_URL/SUPABASE_SERVICE_KEY not set, using in-memory record store");
            Ok(Arc::new(MemoryStore::new()))
        }
    }
}

/// Runs the expiry sweep to completion (or contained failure), then builds
/// the router. Callers bind the listener only after this returns.
pub async fn prepare(config: &Config, store: Arc<dyn RecordStore>) -> Startup {
    let state = AppState::new();

    let sweep = run_startup_sweep(store.as_ref(), config.sweep_timeout()).await;
    state.record_sweep(sweep).await;

    let sweep_handle = config.sweep_interval().map(|interval| {
        spawn_sweep_task(
            store.clone(),
            interval,
            config.sweep_timeout(),
            state.last_sweep.clone(),
        )
    });

    Startup {
        router: create_router(state.clone(), &config.frontend_url),
        state,
        sweep_handle,
    }
}
