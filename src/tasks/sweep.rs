//! Expiry Sweep
//!
//! Deletes records whose expiry date has passed. Runs once on startup before
//! the server accepts traffic, and can be re-run on an interval.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::error::StoreError;
use crate::store::{format_date, DeletedRecords, RecordId, RecordStore};

/// Default bound on the store round-trip.
pub const DEFAULT_SWEEP_TIMEOUT: Duration = Duration::from_secs(10);

/// Component name attached to sweep diagnostics.
const COMPONENT: &str = "expiry_sweep";

/// Most recent sweep result, shared with the HTTP layer.
pub type LastSweep = Arc<RwLock<Option<SweepResult>>>;

// == Sweep Outcome ==
/// Whether the sweep ran to completion or was skipped because the store failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SweepOutcome {
    Completed,
    Skipped { reason: String },
}

// == Sweep Result ==
/// Outcome of a single sweep invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SweepResult {
    /// Number of records removed
    pub removed_count: usize,
    /// Identifiers of removed records, in no particular order; may be shorter
    /// than `removed_count` when the store returned rows without a usable id
    pub removed_ids: Vec<RecordId>,
    /// Reference date; records expiring before it were eligible
    pub cutoff: NaiveDate,
    #[serde(flatten)]
    pub outcome: SweepOutcome,
}

impl SweepResult {
    /// A sweep that reached the store and removed `removed_ids`.
    pub fn completed(cutoff: NaiveDate, removed_ids: Vec<RecordId>) -> Self {
        Self {
            removed_count: removed_ids.len(),
            removed_ids,
            cutoff,
            outcome: SweepOutcome::Completed,
        }
    }

    /// A sweep that reached the store, built from what the store deleted.
    pub fn from_deleted(cutoff: NaiveDate, deleted: DeletedRecords) -> Self {
        Self {
            removed_count: deleted.count(),
            removed_ids: deleted.ids(),
            cutoff,
            outcome: SweepOutcome::Completed,
        }
    }

    /// A sweep that could not run; nothing was removed.
    pub fn skipped(cutoff: NaiveDate, error: &StoreError) -> Self {
        Self {
            removed_count: 0,
            removed_ids: Vec::new(),
            cutoff,
            outcome: SweepOutcome::Skipped {
                reason: error.to_string(),
            },
        }
    }

    /// True when the store call failed, as opposed to finding nothing.
    pub fn is_skipped(&self) -> bool {
        matches!(self.outcome, SweepOutcome::Skipped { .. })
    }

    /// Failure reason of a skipped sweep.
    pub fn failure_reason(&self) -> Option<&str> {
        match &self.outcome {
            SweepOutcome::Skipped { reason } => Some(reason),
            SweepOutcome::Completed => None,
        }
    }
}

/// Current UTC calendar day.
///
/// All sweeps use UTC so a record's eligibility does not depend on the host's
/// timezone setting.
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Removes records with `expiry_date < today` using the default timeout.
pub async fn run_expiry_sweep<S>(store: &S, today: NaiveDate) -> SweepResult
where
    S: RecordStore + ?Sized,
{
    run_expiry_sweep_with_timeout(store, today, DEFAULT_SWEEP_TIMEOUT).await
}

/// Removes records with `expiry_date < today`.
///
/// Never fails: store errors and timeouts are logged as warnings and reported
/// through [`SweepOutcome::Skipped`].
pub async fn run_expiry_sweep_with_timeout<S>(
    store: &S,
    today: NaiveDate,
    timeout: Duration,
) -> SweepResult
where
    S: RecordStore + ?Sized,
{
    let result = match tokio::time::timeout(timeout, store.delete_expired_before(today)).await {
        Ok(Ok(deleted)) => SweepResult::from_deleted(today, deleted),
        Ok(Err(err)) => SweepResult::skipped(today, &err),
        Err(_) => SweepResult::skipped(today, &StoreError::Timeout(timeout)),
    };

    let cutoff = format_date(today);
    match result.failure_reason() {
        Some(reason) => warn!(
            component = COMPONENT,
            store = store.name(),
            %cutoff,
            error = reason,
            "Could not clean expired records"
        ),
        None if result.removed_count > 0 => info!(
            component = COMPONENT,
            store = store.name(),
            %cutoff,
            removed = result.removed_count,
            "Cleaned up {} expired records",
            result.removed_count
        ),
        None => debug!(
            component = COMPONENT,
            store = store.name(),
            %cutoff,
            "No expired records found"
        ),
    }

    result
}

/// Startup entry point: sweeps against today's UTC date.
pub async fn run_startup_sweep(store: &dyn RecordStore, timeout: Duration) -> SweepResult {
    run_expiry_sweep_with_timeout(store, today_utc(), timeout).await
}

/// Spawns a background task that re-runs the sweep every `interval`.
///
/// The first run happens one interval after spawning; the startup sweep
/// covers time zero. Each result replaces the value in `last_sweep`.
pub fn spawn_sweep_task(
    store: Arc<dyn RecordStore>,
    interval: Duration,
    timeout: Duration,
    last_sweep: LastSweep,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            component = COMPONENT,
            "Starting periodic expiry sweep with interval of {} seconds",
            interval.as_secs()
        );

        loop {
            tokio::time::sleep(interval).await;

            let result = run_startup_sweep(store.as_ref(), timeout).await;
            *last_sweep.write().await = Some(result);
        }
    })
}
