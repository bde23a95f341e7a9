//! Perishable Record Module
//!
//! Defines the records subject to expiry and their opaque identifiers.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{StoreError, StoreResult};

/// Calendar date format used for expiry attributes.
pub const EXPIRY_DATE_FORMAT: &str = "%Y-%m-%d";

// == Record Id ==
/// Opaque record identifier.
///
/// Hosted tables key rows by integers or UUID strings; both are accepted and
/// rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "RawId", into = "String")]
pub struct RecordId(String);

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Int(i64),
}

impl From<RawId> for RecordId {
    fn from(raw: RawId) -> Self {
        match raw {
            RawId::Text(s) => RecordId(s),
            RawId::Int(n) => RecordId(n.to_string()),
        }
    }
}

impl From<RecordId> for String {
    fn from(id: RecordId) -> Self {
        id.0
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        RecordId(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        RecordId(s)
    }
}

impl RecordId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// == Perishable Record ==
/// A stored item with an expiry date.
///
/// The expiry date is kept as the store holds it so that rows with a bad date
/// can still be carried around and reported instead of failing a whole batch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerishableRecord {
    /// Unique identifier
    pub id: RecordId,
    /// Expiry date as stored, expected to be `YYYY-MM-DD`
    pub expiry_date: String,
    /// Business fields the sweep does not interpret
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl PerishableRecord {
    /// Creates a record with no extra fields.
    pub fn new(id: impl Into<RecordId>, expiry_date: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            expiry_date: expiry_date.into(),
            fields: Map::new(),
        }
    }

    /// Adds a business field.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Parses the expiry attribute as a calendar date.
    pub fn expiry(&self) -> StoreResult<NaiveDate> {
        parse_expiry(&self.expiry_date).ok_or_else(|| StoreError::MalformedRecord {
            id: self.id.to_string(),
            value: self.expiry_date.clone(),
        })
    }

    /// Whether the record expired strictly before `today`.
    pub fn is_expired_on(&self, today: NaiveDate) -> StoreResult<bool> {
        Ok(self.expiry()? < today)
    }

    /// Builds a record from a JSON row keyed by `id_column`, reading the
    /// expiry from `expiry_column`.
    ///
    /// Hosted stores may return timestamps (`2024-01-01T00:00:00`) for date
    /// columns; only the leading date part is kept.
    pub fn from_row(
        mut row: Map<String, Value>,
        id_column: &str,
        expiry_column: &str,
    ) -> StoreResult<Self> {
        let id_value = row
            .remove(id_column)
            .ok_or_else(|| StoreError::Decode(format!("row without an '{}' column", id_column)))?;
        let id: RecordId = serde_json::from_value(id_value)
            .map_err(|e| StoreError::Decode(format!("unsupported id: {}", e)))?;

        let expiry_date = match row.remove(expiry_column) {
            Some(Value::String(s)) => s,
            Some(Value::Null) | None => String::new(),
            Some(other) => other.to_string(),
        };

        Ok(Self {
            id,
            expiry_date,
            fields: row,
        })
    }
}

/// Parses `YYYY-MM-DD`, tolerating a trailing time component introduced by
/// `T` or a space.
pub fn parse_expiry(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = raw.get(..10)?;
    if !matches!(raw.as_bytes().get(10), None | Some(b'T') | Some(b' ')) {
        return None;
    }
    NaiveDate::parse_from_str(date_part, EXPIRY_DATE_FORMAT).ok()
}

/// Formats a date the way stores compare it.
pub fn format_date(date: NaiveDate) -> String {
    date.format(EXPIRY_DATE_FORMAT).to_string()
}
