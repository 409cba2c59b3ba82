//! Path-addressed error records reported alongside enriched data.
//!
//! Resolution steps produce [`ErrorDraft`] values, which carry everything but
//! the list index. The response aggregator turns drafts into
//! [`ErrorRecord`]s, assigning `id` equal to the record's position in the
//! final error list.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Path segment naming the user level of a nested location.
pub const USER_SEGMENT: &str = "user";
/// Path segment naming the address level of a nested location.
pub const ADDRESS_SEGMENT: &str = "address";

/// Category tag of an error record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// An upstream record was missing or unreachable.
    #[serde(rename = "not found")]
    NotFound,
    /// A resolved record failed a semantic check.
    #[serde(rename = "error")]
    Error,
}

impl ErrorKind {
    /// Wire tag for this kind.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::NotFound => "not found",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered string segments locating the origin of an error.
///
/// # Examples
/// ```
/// use user_enrichment::domain::ErrorPath;
///
/// let path = ErrorPath::address(0, 1);
/// assert_eq!(path.segments(), ["0", "address", "1"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorPath(Vec<String>);

impl ErrorPath {
    /// Path of a user that could not be fetched: `[user_index]`.
    pub fn user(user_index: usize) -> Self {
        Self(vec![user_index.to_string()])
    }

    /// Path of a defect on the user record itself: `[user_index, "user"]`.
    pub fn user_record(user_index: usize) -> Self {
        Self(vec![user_index.to_string(), USER_SEGMENT.to_owned()])
    }

    /// Path of an address slot: `[user_index, "address", address_index]`.
    pub fn address(user_index: usize, address_index: usize) -> Self {
        Self(vec![
            user_index.to_string(),
            ADDRESS_SEGMENT.to_owned(),
            address_index.to_string(),
        ])
    }

    /// Path of an error carried into a user's address slot from an earlier
    /// stage: `[user_index, "user", address_index, origin]`.
    ///
    /// `origin` is the first segment of the carried error's previous path and
    /// is dropped when that path was empty.
    pub fn reparented(user_index: usize, address_index: usize, previous: &ErrorPath) -> Self {
        let mut segments = vec![
            user_index.to_string(),
            USER_SEGMENT.to_owned(),
            address_index.to_string(),
        ];
        segments.extend(previous.0.first().cloned());
        Self(segments)
    }

    /// Borrow the raw segments.
    pub fn segments(&self) -> &[String] {
        &self.0
    }
}

impl fmt::Display for ErrorPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Indexed error entry of a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorRecord {
    /// Position of this record in the response error list.
    pub id: usize,
    /// Human-readable description.
    pub message: String,
    /// Category tag.
    pub kind: ErrorKind,
    /// Location of the failure in the nested data.
    pub path: ErrorPath,
}

/// An error discovered during resolution that has not been indexed yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorDraft {
    /// Human-readable description.
    pub message: String,
    /// Category tag.
    pub kind: ErrorKind,
    /// Location of the failure in the nested data.
    pub path: ErrorPath,
}

impl ErrorDraft {
    /// The user at `user_index` (upstream id `user_id`) could not be fetched.
    pub fn user_not_found(user_index: usize, user_id: i64) -> Self {
        Self {
            message: format!("user not found: {user_id}"),
            kind: ErrorKind::NotFound,
            path: ErrorPath::user(user_index),
        }
    }

    /// The address reference `address_id` at `address_index` of the user at
    /// `user_index` could not be fetched.
    pub fn address_not_found(user_index: usize, address_index: usize, address_id: i64) -> Self {
        Self {
            message: format!("user address not found: {address_id}"),
            kind: ErrorKind::NotFound,
            path: ErrorPath::address(user_index, address_index),
        }
    }

    /// The resolved user at `user_index` has an empty name.
    pub fn missing_name(user_index: usize) -> Self {
        Self {
            message: "name not found".to_owned(),
            kind: ErrorKind::Error,
            path: ErrorPath::user_record(user_index),
        }
    }

    /// Attach the list index, producing the final record.
    pub fn into_record(self, id: usize) -> ErrorRecord {
        ErrorRecord {
            id,
            message: self.message,
            kind: self.kind,
            path: self.path,
        }
    }
}

impl From<ErrorRecord> for ErrorDraft {
    fn from(record: ErrorRecord) -> Self {
        Self {
            message: record.message,
            kind: record.kind,
            path: record.path,
        }
    }
}
