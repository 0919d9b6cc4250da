use std::future::Future;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

pub mod query;

pub use query::{Filter, Order, Range, SelectQuery, SortDirection};

/// One row as exchanged with the upstream service: field name → JSON value.
pub type Record = serde_json::Map<String, Value>;

/// Capability exposed by the upstream data service (storage + query execution).
///
/// This is the only system boundary of the blog core. Implementations neither
/// cache nor retry; every call goes to the store.
pub trait DataService: Clone + Send + Sync + 'static {
    /// Rows of `table` matching every filter of `query`, ordered and ranged.
    fn select(
        &self,
        table: &str,
        query: SelectQuery,
    ) -> impl Future<Output = Result<Vec<Record>, DataError>> + Send;

    /// Insert one row; returns the stored row including generated fields.
    fn insert(
        &self,
        table: &str,
        record: Record,
    ) -> impl Future<Output = Result<Record, DataError>> + Send;

    /// Apply `changes` to the row with `id`; returns the stored row.
    fn update(
        &self,
        table: &str,
        id: &str,
        changes: Record,
    ) -> impl Future<Output = Result<Record, DataError>> + Send;

    /// Delete the row with `id`. Deleting a missing row is not an error.
    fn delete(&self, table: &str, id: &str) -> impl Future<Output = Result<(), DataError>> + Send;
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DataError {
    #[error("no matching record in {table}")]
    NotFound { table: String },

    #[error("conflict: {0}")]
    Conflict(String),

    #[error("rejected by data service: {0}")]
    Rejected(String),

    #[error("data service failure: {0}")]
    Backend(String),

    #[error("failed to decode {entity}: {message}")]
    Decode {
        entity: &'static str,
        message: String,
    },
}

impl DataError {
    pub fn not_found(table: &str) -> Self {
        Self::NotFound {
            table: table.to_string(),
        }
    }
}

/// Decode a record into a typed entity.
pub fn decode<T: DeserializeOwned>(record: Record, entity: &'static str) -> Result<T, DataError> {
    serde_json::from_value(Value::Object(record)).map_err(|e| DataError::Decode {
        entity,
        message: e.to_string(),
    })
}

/// Decode every record, failing on the first malformed one.
pub fn decode_all<T: DeserializeOwned>(
    records: Vec<Record>,
    entity: &'static str,
) -> Result<Vec<T>, DataError> {
    records
        .into_iter()
        .map(|record| decode(record, entity))
        .collect()
}

/// Encode a write payload into a record. Payloads must serialize as JSON objects.
pub fn encode<T: Serialize>(payload: &T, entity: &'static str) -> Result<Record, DataError> {
    match serde_json::to_value(payload) {
        Ok(Value::Object(record)) => Ok(record),
        Ok(other) => Err(DataError::Decode {
            entity,
            message: format!("expected an object, got {}", other),
        }),
        Err(e) => Err(DataError::Decode {
            entity,
            message: e.to_string(),
        }),
    }
}
