//! Aggregate response of one enrichment run.

use serde::{Deserialize, Serialize};

use super::{ErrorDraft, ErrorPath, ErrorRecord, User};

/// Enriched users plus every failure encountered while producing them.
///
/// ## Invariants
/// - `data` holds exactly one entry per requested id, in request order.
/// - `error[i].id == i` for every `i`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ResponseDto {
    /// Users in request order, placeholders included.
    pub data: Vec<User>,
    /// Indexed failures in discovery order.
    pub error: Vec<ErrorRecord>,
}

impl ResponseDto {
    /// Whether every error id matches its list position.
    pub fn has_sequential_error_ids(&self) -> bool {
        self.error
            .iter()
            .enumerate()
            .all(|(index, record)| record.id == index)
    }
}

/// Accumulates users and errors for one run, assigning error ids on append.
///
/// The aggregator is owned by a single sequential fold, so the next id is
/// always the current list length.
///
/// # Examples
/// ```
/// use user_enrichment::domain::{ErrorDraft, ResponseAggregator, User};
///
/// let mut aggregator = ResponseAggregator::with_capacity(1);
/// let id = aggregator.record(ErrorDraft::user_not_found(0, 7));
/// aggregator.push_user(User::placeholder());
/// let response = aggregator.finish();
/// assert_eq!(id, 0);
/// assert_eq!(response.data.len(), 1);
/// assert_eq!(response.error[0].path.segments(), ["0"]);
/// ```
#[derive(Debug, Default)]
pub struct ResponseAggregator {
    data: Vec<User>,
    error: Vec<ErrorRecord>,
}

impl ResponseAggregator {
    /// Start an aggregation sized for `user_count` users.
    pub fn with_capacity(user_count: usize) -> Self {
        Self {
            data: Vec::with_capacity(user_count),
            error: Vec::new(),
        }
    }

    /// Append a draft, returning the id it was assigned.
    pub fn record(&mut self, draft: ErrorDraft) -> usize {
        let id = self.error.len();
        self.error.push(draft.into_record(id));
        id
    }

    /// Re-index an error carried from an earlier stage into the context of the
    /// user at `user_index`, returning its new id.
    pub fn reparent(
        &mut self,
        carried: ErrorRecord,
        user_index: usize,
        address_index: usize,
    ) -> usize {
        let path = ErrorPath::reparented(user_index, address_index, &carried.path);
        let mut draft = ErrorDraft::from(carried);
        draft.path = path;
        self.record(draft)
    }

    /// Append the next user in request order.
    pub fn push_user(&mut self, user: User) {
        self.data.push(user);
    }

    /// Produce the response.
    pub fn finish(self) -> ResponseDto {
        Self::build(self.data, self.error)
    }

    /// Assemble a response from ordered users and an already indexed error
    /// list.
    pub fn build(data: Vec<User>, error: Vec<ErrorRecord>) -> ResponseDto {
        let response = ResponseDto { data, error };
        debug_assert!(
            response.has_sequential_error_ids(),
            "error ids must match list positions"
        );
        response
    }
}
