//! Hosted Record Store
//!
//! Talks to a PostgREST-compatible endpoint (as exposed by Supabase) and
//! performs the filtered delete as one HTTP request.

use std::time::Duration;

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::{header, Client, StatusCode};
use serde_json::Value;
use tracing::{debug, warn};

use super::{format_date, DeletedRecords, PerishableRecord, RecordStore};
use crate::config::{Config, HostedStoreConfig};
use crate::error::{StoreError, StoreResult};

/// Connect timeout for the underlying HTTP client.
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// == Rest Store ==
/// Record store backed by a hosted PostgREST table.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    service_key: String,
    table: String,
    id_column: String,
    expiry_column: String,
}

impl RestStore {
    // == Constructor ==
    /// Creates a store for `table`, filtering on `expiry_column`.
    pub fn new(
        hosted: &HostedStoreConfig,
        table: impl Into<String>,
        expiry_column: impl Into<String>,
    ) -> StoreResult<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| StoreError::Unavailable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: hosted.url.trim_end_matches('/').to_string(),
            service_key: hosted.service_key.clone(),
            table: table.into(),
            id_column: "id".to_string(),
            expiry_column: expiry_column.into(),
        })
    }

    /// Sets the primary-key column read from deleted rows (default `id`).
    pub fn with_id_column(mut self, id_column: impl Into<String>) -> Self {
        self.id_column = id_column.into();
        self
    }

    /// Creates a store from the server configuration, if a hosted store is configured.
    pub fn from_config(config: &Config) -> Option<StoreResult<Self>> {
        config
            .hosted_store
            .as_ref()
            .map(|hosted| {
                Self::new(hosted, &config.records_table, &config.expiry_column)
                    .map(|store| store.with_id_column(&config.id_column))
            })
    }

    /// Endpoint for the configured table.
    pub fn table_url(&self) -> String {
        format!("{}/rest/v1/{}", self.base_url, self.table)
    }

    /// Decodes deleted rows, counting the ones that cannot be identified.
    fn collect_deleted(&self, rows: Vec<Value>) -> DeletedRecords {
        let mut deleted = DeletedRecords::default();
        for row in rows {
            let decoded = match row {
                Value::Object(map) => {
                    PerishableRecord::from_row(map, &self.id_column, &self.expiry_column)
                }
                other => Err(StoreError::Decode(format!("row is not an object: {}", other))),
            };
            match decoded {
                Ok(record) => deleted.records.push(record),
                Err(err) => {
                    warn!(table = %self.table, error = %err, "Deleted row could not be identified");
                    deleted.unidentified += 1;
                }
            }
        }
        deleted
    }
}

#[async_trait]
impl RecordStore for RestStore {
    fn name(&self) -> &str {
        &self.table
    }

    async fn delete_expired_before(&self, cutoff: NaiveDate) -> StoreResult<DeletedRecords> {
        let filter = format!("lt.{}", format_date(cutoff));
        debug!(table = %self.table, column = %self.expiry_column, %filter, "Issuing filtered delete");

        let response = self
            .client
            .delete(self.table_url())
            .query(&[(self.expiry_column.as_str(), filter.as_str())])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .header("Prefer", "return=representation")
            .header(header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(StoreError::Rejected {
                status: status.as_u16(),
                message: rejection_message(&body, status),
            });
        }

        let body = response.text().await?;
        if body.trim().is_empty() {
            return Ok(DeletedRecords::default());
        }

        let rows: Vec<Value> =
            serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))?;

        // The delete has committed by now; a row that fails to decode still counts
        Ok(self.collect_deleted(rows))
    }
}

/// Extracts PostgREST's `message` field, falling back to the raw body.
fn rejection_message(body: &str, status: StatusCode) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(Value::as_str).map(str::to_string))
        .or_else(|| (!body.trim().is_empty()).then(|| body.trim().to_string()))
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown").to_string())
}
