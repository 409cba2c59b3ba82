//! User record and its address slots.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::{Address, ErrorRecord};

/// Identifier carried by a user that has not been resolved.
pub const UNSET_USER_ID: i64 = -1;

/// One position of a user's address list.
///
/// The same position holds different shapes as the pipeline advances: a raw
/// upstream reference before resolution, a resolved (or placeholder) address
/// afterwards, or an error record carried over from an earlier stage.
/// Serialized untagged, so clients see a number, an address object, or an
/// error object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AddressSlot {
    /// Unresolved child reference.
    Pending(i64),
    /// Error carried from an earlier aggregation stage.
    Failed(ErrorRecord),
    /// Resolved address, or the empty placeholder after a failed lookup.
    Resolved(Address),
}

impl AddressSlot {
    /// The resolved address, if this slot holds one.
    pub fn as_address(&self) -> Option<&Address> {
        match self {
            Self::Resolved(address) => Some(address),
            Self::Pending(_) | Self::Failed(_) => None,
        }
    }
}

/// A user record enriched with its addresses.
///
/// # Examples
/// ```
/// use user_enrichment::domain::{AddressSlot, User};
///
/// let mut user = User::placeholder();
/// assert!(user.address.is_empty());
/// user.address.push(AddressSlot::Pending(3));
/// assert_eq!(user.pending_address_ids(), vec![3]);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct User {
    /// Upstream identifier, `-1` when unset.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Login handle.
    pub username: String,
    /// Contact e-mail.
    pub email: String,
    /// Address slots in upstream declaration order.
    pub address: Vec<AddressSlot>,
    /// Contact phone.
    pub phone: String,
    /// Homepage.
    pub website: String,
    /// Opaque company object.
    pub company: Value,
}

impl User {
    /// Empty user substituted when resolution fails.
    pub fn placeholder() -> Self {
        Self::default()
    }

    /// Whether this user is the empty placeholder.
    pub fn is_placeholder(&self) -> bool {
        *self == Self::placeholder()
    }

    /// Child references that still need resolving, in slot order.
    pub fn pending_address_ids(&self) -> Vec<i64> {
        self.address
            .iter()
            .filter_map(|slot| match slot {
                AddressSlot::Pending(id) => Some(*id),
                AddressSlot::Failed(_) | AddressSlot::Resolved(_) => None,
            })
            .collect()
    }
}

impl Default for User {
    fn default() -> Self {
        Self {
            id: UNSET_USER_ID,
            name: String::new(),
            username: String::new(),
            email: String::new(),
            address: Vec::new(),
            phone: String::new(),
            website: String::new(),
            company: Value::Object(Map::new()),
        }
    }
}
