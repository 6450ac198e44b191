//! Record sources feeding the dashboard.
//!
//! The engine performs no I/O of its own. A fetch layer implements
//! [`RecordSource`] to hand over raw JSON records for each of the six
//! collections the dashboard consumes; [`StaticSource`] is an in-memory
//! implementation for tests and embedding callers that already hold the data.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{EngineError, EngineResult};

/// The record collections the dashboard aggregates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Collection {
    /// Employee master records.
    Employees,
    /// Leave requests.
    LeaveRequests,
    /// Projects.
    Projects,
    /// Meeting rooms.
    MeetingRooms,
    /// Payroll runs.
    Payrolls,
    /// Attendance punches.
    Attendance,
}

impl Collection {
    /// All collections in fetch order.
    pub const ALL: [Collection; 6] = [
        Collection::Employees,
        Collection::LeaveRequests,
        Collection::Projects,
        Collection::MeetingRooms,
        Collection::Payrolls,
        Collection::Attendance,
    ];

    /// The collection's name as used by the record store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Employees => "employees",
            Collection::LeaveRequests => "leave-requests",
            Collection::Projects => "projects",
            Collection::MeetingRooms => "meeting-rooms",
            Collection::Payrolls => "payrolls",
            Collection::Attendance => "attendance",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A source of raw records, one fetch per collection.
///
/// Fetches for different collections are independent and are issued
/// concurrently by the dashboard. A failed fetch should be reported as
/// [`EngineError::SourceUnavailable`].
pub trait RecordSource: Send + Sync + 'static {
    /// Fetches every record of `collection`.
    fn fetch(&self, collection: Collection) -> impl Future<Output = EngineResult<Vec<Value>>> + Send;
}

/// Unwraps a record-store payload into its list of records.
///
/// Accepts either a bare JSON array or an object wrapping the array under
/// the collection's name (the attendance endpoint answers with
/// `{"attendance": [...]}`).
///
/// # Example
///
/// ```
/// use attendance_engine::source::{Collection, unwrap_payload};
/// use serde_json::json;
///
/// let payload = json!({"attendance": [{"ID": 1}, {"ID": 2}]});
/// let records = unwrap_payload(Collection::Attendance, payload).unwrap();
/// assert_eq!(records.len(), 2);
/// ```
pub fn unwrap_payload(collection: Collection, payload: Value) -> EngineResult<Vec<Value>> {
    match payload {
        Value::Array(items) => Ok(items),
        Value::Object(mut map) => match map.remove(collection.name()) {
            Some(Value::Array(items)) => Ok(items),
            _ => Err(EngineError::SourceUnavailable {
                collection,
                message: format!("payload has no '{}' array", collection.name()),
            }),
        },
        other => Err(EngineError::SourceUnavailable {
            collection,
            message: format!("expected an array of records, got {}", json_kind(&other)),
        }),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// An in-memory record source.
///
/// Collections that were never loaded report
/// [`EngineError::SourceUnavailable`] when fetched.
///
/// # Example
///
/// ```
/// use attendance_engine::source::{Collection, RecordSource, StaticSource};
/// use serde_json::json;
///
/// let rt = tokio::runtime::Runtime::new().unwrap();
/// rt.block_on(async {
///     let source = StaticSource::new()
///         .with(Collection::Projects, vec![json!({"id": 1, "status": "Active"})]);
///     assert_eq!(source.fetch(Collection::Projects).await.unwrap().len(), 1);
///     assert!(source.fetch(Collection::Payrolls).await.is_err());
/// });
/// ```
#[derive(Debug, Default)]
pub struct StaticSource {
    collections: RwLock<HashMap<Collection, Vec<Value>>>,
}

impl StaticSource {
    /// Creates a source with no collections loaded.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads `records` for `collection`, returning the source.
    pub fn with(mut self, collection: Collection, records: Vec<Value>) -> Self {
        self.collections.get_mut().insert(collection, records);
        self
    }

    /// Replaces the records of `collection`.
    pub async fn set(&self, collection: Collection, records: Vec<Value>) {
        self.collections.write().await.insert(collection, records);
    }

    /// Marks `collection` as unavailable.
    pub async fn remove(&self, collection: Collection) {
        self.collections.write().await.remove(&collection);
    }
}

impl RecordSource for StaticSource {
    async fn fetch(&self, collection: Collection) -> EngineResult<Vec<Value>> {
        self.collections
            .read()
            .await
            .get(&collection)
            .cloned()
            .ok_or_else(|| EngineError::SourceUnavailable {
                collection,
                message: "collection not loaded".to_string(),
            })
    }
}
