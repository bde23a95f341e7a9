//! Record Store Module
//!
//! The persistence capability consumed by the expiry sweep, plus an in-memory
//! implementation and a client for PostgREST-style hosted databases.

mod memory;
mod record;
mod rest;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::error::StoreResult;

pub use memory::MemoryStore;
pub use record::{format_date, parse_expiry, PerishableRecord, RecordId, EXPIRY_DATE_FORMAT};
pub use rest::RestStore;

// == Deleted Records ==
/// Rows removed by one filtered delete.
///
/// `unidentified` counts rows the store confirmed as deleted but whose
/// identifier could not be decoded; they are gone all the same.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeletedRecords {
    /// Deleted rows that decoded into records
    pub records: Vec<PerishableRecord>,
    /// Deleted rows that could not be decoded
    pub unidentified: usize,
}

impl DeletedRecords {
    /// Total number of rows removed.
    pub fn count(&self) -> usize {
        self.records.len() + self.unidentified
    }

    /// Identifiers of the decoded rows.
    pub fn ids(&self) -> Vec<RecordId> {
        self.records.iter().map(|record| record.id.clone()).collect()
    }
}

impl From<Vec<PerishableRecord>> for DeletedRecords {
    fn from(records: Vec<PerishableRecord>) -> Self {
        Self {
            records,
            unidentified: 0,
        }
    }
}

// == Record Store ==
/// Persistence capability holding perishable records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short label used in diagnostics.
    fn name(&self) -> &str;

    /// Deletes every record whose expiry date is strictly earlier than
    /// `cutoff` as a single atomic request, returning the deleted records.
    async fn delete_expired_before(&self, cutoff: NaiveDate) -> StoreResult<DeletedRecords>;
}
