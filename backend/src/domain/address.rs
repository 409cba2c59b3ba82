//! Address record attached to users during enrichment.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ErrorRecord;

/// Identifier carried by an address that has not been resolved.
pub const UNSET_ADDRESS_ID: i64 = -1;

/// A postal address resolved from the remote source.
///
/// `geo` is passed through untouched. `errors` is reserved for nested error
/// reporting and is omitted from JSON when absent.
///
/// # Examples
/// ```
/// use user_enrichment::domain::Address;
///
/// let placeholder = Address::placeholder();
/// assert!(placeholder.is_placeholder());
/// assert_eq!(placeholder.id, -1);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Address {
    /// Upstream identifier, `-1` when unset.
    pub id: i64,
    /// Street line.
    pub street: String,
    /// Suite or apartment.
    pub suite: String,
    /// City name.
    pub city: String,
    /// Postal code.
    pub zipcode: String,
    /// Opaque geolocation object.
    pub geo: Value,
    /// Reserved nested error list.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ErrorRecord>>,
}

impl Address {
    /// Empty address substituted when resolution fails.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Whether this address is the empty placeholder.
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }
}

impl Default for Address {
    fn default() -> Self {
        Self {
            id: UNSET_ADDRESS_ID,
            street: String::new(),
            suite: String::new(),
            city: String::new(),
            zipcode: String::new(),
            geo: Value::Object(Map::new()),
            errors: None,
        }
    }
}
