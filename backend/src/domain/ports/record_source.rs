//! Driven port for fetching raw records from the upstream directory.
//!
//! The domain owns the record kinds and the error contract; adapters own the
//! transport. Records are returned as raw JSON so normalisation stays with the
//! resolvers.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde_json::Value;

use super::define_port_error;

/// Kind of upstream record being fetched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordKind {
    /// Primary user record.
    User,
    /// Address referenced by a user.
    Address,
}

impl RecordKind {
    /// Lowercase name used in messages and logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

define_port_error! {
    /// Errors surfaced while fetching upstream records.
    pub enum RecordSourceError {
        /// The upstream has no record with the requested id.
        NotFound { message: String } =>
            "record not found: {message}",
        /// Network transport failed or the upstream answered with a server error.
        Transport { message: String } =>
            "record source transport failed: {message}",
        /// The upstream call exceeded its timeout.
        Timeout { message: String } =>
            "record source timeout: {message}",
        /// The upstream response could not be decoded.
        Decode { message: String } =>
            "record source response decode failed: {message}",
        /// The adapter or upstream rejected the request.
        InvalidRequest { message: String } =>
            "record source request invalid: {message}",
    }
}

impl RecordSourceError {
    /// Whether the upstream positively reported the record as missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

/// Port for fetching upstream records by kind and id.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordSource: Send + Sync {
    /// Fetch one raw record.
    ///
    /// # Examples
    ///
    /// ```rust,ignore
    /// use serde_json::json;
    /// use user_enrichment::domain::ports::{FixtureRecordSource, RecordKind, RecordSource};
    ///
    /// let source = FixtureRecordSource::new().with_record(RecordKind::User, 1, json!({ "id": 1 }));
    /// let raw = source.fetch(RecordKind::User, 1).await?;
    /// assert_eq!(raw["id"], 1);
    /// # Ok::<(), user_enrichment::domain::ports::RecordSourceError>(())
    /// ```
    async fn fetch(&self, kind: RecordKind, id: i64) -> Result<Value, RecordSourceError>;

    /// List every id the upstream exposes for `kind`, in upstream order.
    async fn list_ids(&self, kind: RecordKind) -> Result<Vec<i64>, RecordSourceError>;
}

/// Deterministic in-memory record source.
///
/// Unknown ids answer with [`RecordSourceError::NotFound`]; scripted failures
/// are returned verbatim on every call.
#[derive(Debug, Clone, Default)]
pub struct FixtureRecordSource {
    records: BTreeMap<(RecordKind, i64), Result<Value, RecordSourceError>>,
}

impl FixtureRecordSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `record` for `kind`/`id`.
    pub fn with_record(mut self, kind: RecordKind, id: i64, record: Value) -> Self {
        self.records.insert((kind, id), Ok(record));
        self
    }

    /// Fail every fetch of `kind`/`id` with `error`.
    pub fn with_failure(mut self, kind: RecordKind, id: i64, error: RecordSourceError) -> Self {
        self.records.insert((kind, id), Err(error));
        self
    }
}

#[async_trait]
impl RecordSource for FixtureRecordSource {
    async fn fetch(&self, kind: RecordKind, id: i64) -> Result<Value, RecordSourceError> {
        self.records
            .get(&(kind, id))
            .cloned()
            .unwrap_or_else(|| Err(RecordSourceError::not_found(format!("{kind} {id}"))))
    }

    async fn list_ids(&self, kind: RecordKind) -> Result<Vec<i64>, RecordSourceError> {
        Ok(self
            .records
            .keys()
            .filter(|(record_kind, _)| *record_kind == kind)
            .map(|(_, id)| *id)
            .collect())
    }
}
