//! Configuration Module
//!
//! Handles loading and managing server configuration from environment variables.

use std::env;
use std::str::FromStr;
use std::time::Duration;

/// Credentials and addressing for the hosted record store.
#[derive(Debug, Clone)]
pub struct HostedStoreConfig {
    /// Base URL of the hosted database service (e.g. `https://xyz.supabase.co`)
    pub url: String,
    /// Service-role key used for both `apikey` and bearer auth
    pub service_key: String,
}

/// Server configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub api_host: String,
    /// HTTP server port
    pub api_port: u16,
    /// Frontend origin allowed through CORS in addition to the local dev origins
    pub frontend_url: String,
    /// Hosted store settings, `None` when the in-memory store should be used
    pub hosted_store: Option<HostedStoreConfig>,
    /// Table holding perishable records
    pub records_table: String,
    /// Primary-key column of the records table
    pub id_column: String,
    /// Column holding the expiry date
    pub expiry_column: String,
    /// Upper bound on the sweep's store round-trip, in seconds
    pub sweep_timeout_secs: u64,
    /// Periodic sweep interval in seconds, 0 disables the periodic sweep
    pub sweep_interval_secs: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_HOST` - Bind host (default: 0.0.0.0)
    /// - `API_PORT` - HTTP server port (default: 8000)
    /// - `FRONTEND_URL` - Extra CORS origin (default: http://localhost:5173)
    /// - `SUPABASE_URL` / `SUPABASE_SERVICE_KEY` - Hosted store; both required
    /// - `RECORDS_TABLE` - Table to sweep (default: medicines)
    /// - `RECORD_ID_COLUMN` - Primary key of the table (default: id)
    /// - `EXPIRY_COLUMN` - Expiry attribute (default: expiry_date)
    /// - `SWEEP_TIMEOUT_SECS` - Store call bound, must be positive (default: 10)
    /// - `SWEEP_INTERVAL_SECS` - Periodic sweep interval, 0 = off (default: 0)
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let hosted_store = match (non_empty_var("SUPABASE_URL"), non_empty_var("SUPABASE_SERVICE_KEY")) {
            (Some(url), Some(service_key)) => Some(HostedStoreConfig { url, service_key }),
            _ => None,
        };

        Self {
            api_host: non_empty_var("API_HOST").unwrap_or(defaults.api_host),
            api_port: parsed_var("API_PORT").unwrap_or(defaults.api_port),
            frontend_url: non_empty_var("FRONTEND_URL").unwrap_or(defaults.frontend_url),
            hosted_store,
            records_table: non_empty_var("RECORDS_TABLE").unwrap_or(defaults.records_table),
            id_column: non_empty_var("RECORD_ID_COLUMN").unwrap_or(defaults.id_column),
            expiry_column: non_empty_var("EXPIRY_COLUMN").unwrap_or(defaults.expiry_column),
            // A zero timeout would fail every store call before it is polled
            sweep_timeout_secs: parsed_var("SWEEP_TIMEOUT_SECS")
                .filter(|&secs: &u64| secs > 0)
                .unwrap_or(defaults.sweep_timeout_secs),
            sweep_interval_secs: parsed_var("SWEEP_INTERVAL_SECS")
                .unwrap_or(defaults.sweep_interval_secs),
        }
    }

    /// Bound applied to each sweep's store call.
    pub fn sweep_timeout(&self) -> Duration {
        Duration::from_secs(self.sweep_timeout_secs)
    }

    /// Periodic sweep interval, if enabled.
    pub fn sweep_interval(&self) -> Option<Duration> {
        (self.sweep_interval_secs > 0).then(|| Duration::from_secs(self.sweep_interval_secs))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: "0.0.0.0".to_string(),
            api_port: 8000,
            frontend_url: "http://localhost:5173".to_string(),
            hosted_store: None,
            records_table: "medicines".to_string(),
            id_column: "id".to_string(),
            expiry_column: "expiry_date".to_string(),
            sweep_timeout_secs: 10,
            sweep_interval_secs: 0,
        }
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parsed_var<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}
