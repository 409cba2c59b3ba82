//! Resolvers turning raw upstream records into domain records.
//!
//! Every failure, whether the upstream reported the record missing, the
//! transport broke, or the payload did not decode, is reported as
//! [`ResolveError::NotFound`]. The orchestrator treats all of them the same
//! way, so a broken transport never aborts sibling work.

use std::sync::Arc;

use serde::Deserialize;
use serde_json::{Map, Value};
use tracing::debug;

use super::ports::{RecordKind, RecordSource};
use super::{Address, AddressSlot, User};

/// Failure to resolve one record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The record could not be obtained or understood.
    #[error("{kind} {id} not found: {reason}")]
    NotFound {
        /// Kind of record requested.
        kind: RecordKind,
        /// Requested id.
        id: i64,
        /// Underlying cause, for logs.
        reason: String,
    },
}

impl ResolveError {
    fn not_found(kind: RecordKind, id: i64, reason: impl Into<String>) -> Self {
        Self::NotFound {
            kind,
            id,
            reason: reason.into(),
        }
    }

    /// Requested id of the failed record.
    pub fn id(&self) -> i64 {
        match self {
            Self::NotFound { id, .. } => *id,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RemoteUser {
    id: Option<i64>,
    name: Option<String>,
    username: Option<String>,
    email: Option<String>,
    address: Option<Value>,
    address_ids: Option<Vec<i64>>,
    phone: Option<String>,
    website: Option<String>,
    company: Option<Value>,
}

impl RemoteUser {
    /// Child references declared by the record.
    ///
    /// An explicit `addressIds` list wins; an `address` array of ids is used
    /// next. An embedded `address` object means the address lives on this
    /// user's own upstream record. Every array entry must be an integer id.
    fn child_references(&self, user_id: i64) -> Result<Vec<i64>, String> {
        if let Some(ids) = &self.address_ids {
            return Ok(ids.clone());
        }
        match &self.address {
            Some(Value::Array(items)) => items
                .iter()
                .enumerate()
                .map(|(position, item)| {
                    item.as_i64()
                        .ok_or_else(|| format!("address reference {position} is not an id: {item}"))
                })
                .collect(),
            Some(Value::Object(_)) => Ok(vec![user_id]),
            _ => Ok(Vec::new()),
        }
    }

    fn into_user(self, requested_id: i64) -> Result<User, String> {
        let id = self.id.unwrap_or(requested_id);
        let address = self
            .child_references(id)?
            .into_iter()
            .map(AddressSlot::Pending)
            .collect();
        Ok(User {
            id,
            name: self.name.unwrap_or_default(),
            username: self.username.unwrap_or_default(),
            email: self.email.unwrap_or_default(),
            address,
            phone: self.phone.unwrap_or_default(),
            website: self.website.unwrap_or_default(),
            company: self.company.unwrap_or_else(|| Value::Object(Map::new())),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RemoteAddress {
    street: Option<String>,
    suite: Option<String>,
    city: Option<String>,
    zipcode: Option<String>,
    geo: Option<Value>,
}

impl RemoteAddress {
    fn into_address(self, id: i64) -> Address {
        Address {
            id,
            street: self.street.unwrap_or_default(),
            suite: self.suite.unwrap_or_default(),
            city: self.city.unwrap_or_default(),
            zipcode: self.zipcode.unwrap_or_default(),
            geo: self.geo.unwrap_or_else(|| Value::Object(Map::new())),
            errors: None,
        }
    }
}

/// Resolves user records.
#[derive(Clone)]
pub struct UserResolver {
    source: Arc<dyn RecordSource>,
}

impl UserResolver {
    /// Build a resolver over `source`.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Fetch and normalise the user `id`.
    ///
    /// The returned user's `address` holds one [`AddressSlot::Pending`] per
    /// declared child reference.
    pub async fn resolve(&self, id: i64) -> Result<User, ResolveError> {
        let raw = self
            .source
            .fetch(RecordKind::User, id)
            .await
            .map_err(|error| ResolveError::not_found(RecordKind::User, id, error.to_string()))?;
        let remote: RemoteUser = serde_json::from_value(raw).map_err(|error| {
            ResolveError::not_found(RecordKind::User, id, format!("undecodable user: {error}"))
        })?;
        let user = remote.into_user(id).map_err(|reason| {
            ResolveError::not_found(RecordKind::User, id, format!("undecodable user: {reason}"))
        })?;
        debug!(
            user_id = id,
            child_references = user.address.len(),
            "user resolved"
        );
        Ok(user)
    }
}

/// Resolves address records.
#[derive(Clone)]
pub struct AddressResolver {
    source: Arc<dyn RecordSource>,
}

impl AddressResolver {
    /// Build a resolver over `source`.
    pub fn new(source: Arc<dyn RecordSource>) -> Self {
        Self { source }
    }

    /// Fetch and normalise the address `id`.
    ///
    /// The requested id is authoritative; any id in the payload is ignored.
    pub async fn resolve(&self, id: i64) -> Result<Address, ResolveError> {
        let raw = self
            .source
            .fetch(RecordKind::Address, id)
            .await
            .map_err(|error| ResolveError::not_found(RecordKind::Address, id, error.to_string()))?;
        let payload = match raw {
            Value::Object(mut fields) => match fields.remove("address") {
                Some(embedded @ Value::Object(_)) => embedded,
                Some(other) => {
                    fields.insert("address".to_owned(), other);
                    Value::Object(fields)
                }
                None => Value::Object(fields),
            },
            other => other,
        };
        let remote: RemoteAddress = serde_json::from_value(payload).map_err(|error| {
            ResolveError::not_found(
                RecordKind::Address,
                id,
                format!("undecodable address: {error}"),
            )
        })?;
        Ok(remote.into_address(id))
    }
}
