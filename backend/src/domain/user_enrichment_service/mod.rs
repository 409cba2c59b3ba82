//! Domain orchestration service for user enrichment.
//!
//! The service fans out over the requested users and, per user, over the
//! declared address references. Fetches may run concurrently, but outcomes
//! are merged back in request order before a single sequential fold assigns
//! error ids and builds the response. A failed lookup never drops or reorders
//! an entry; it substitutes a placeholder and records an error.

use std::mem;
use std::sync::Arc;

use async_trait::async_trait;
use futures_util::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::domain::ports::{RecordKind, RecordSource, UserEnrichmentQuery};
use crate::domain::{
    Address, AddressResolver, AddressSlot, Error, ErrorDraft, ResponseAggregator, ResponseDto,
    User, UserResolver,
};

/// Fan-out limits for one enrichment run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserEnrichmentConfig {
    /// Users resolved concurrently.
    pub max_concurrent_users: usize,
    /// Address references resolved concurrently per user.
    pub max_concurrent_addresses: usize,
}

impl Default for UserEnrichmentConfig {
    fn default() -> Self {
        Self {
            max_concurrent_users: 4,
            max_concurrent_addresses: 4,
        }
    }
}

/// Result of resolving one user and its addresses, before indexing.
#[derive(Debug)]
struct UserOutcome {
    index: usize,
    user: User,
    resolved: bool,
    errors: Vec<ErrorDraft>,
}

/// Domain-owned user enrichment service.
pub struct UserEnrichmentService {
    source: Arc<dyn RecordSource>,
    users: UserResolver,
    addresses: AddressResolver,
    config: UserEnrichmentConfig,
}

impl UserEnrichmentService {
    /// Build a service resolving records through `source`.
    /// ```rust
    /// use std::sync::Arc;
    /// use user_enrichment::domain::ports::FixtureRecordSource;
    /// use user_enrichment::domain::{UserEnrichmentConfig, UserEnrichmentService};
    ///
    /// let _service = UserEnrichmentService::new(
    ///     Arc::new(FixtureRecordSource::new()),
    ///     UserEnrichmentConfig::default(),
    /// );
    /// ```
    pub fn new(source: Arc<dyn RecordSource>, config: UserEnrichmentConfig) -> Self {
        Self {
            users: UserResolver::new(Arc::clone(&source)),
            addresses: AddressResolver::new(Arc::clone(&source)),
            source,
            config,
        }
    }

    /// Enrich the users `user_ids`, in order.
    ///
    /// ```rust,ignore
    /// let response = service.enrich(&[1, 2, 3]).await;
    /// assert_eq!(response.data.len(), 3);
    /// ```
    pub async fn enrich(&self, user_ids: &[i64]) -> ResponseDto {
        let outcomes: Vec<UserOutcome> = stream::iter(user_ids.iter().copied().enumerate())
            .map(|(index, id)| self.resolve_user(index, id))
            .buffered(self.config.max_concurrent_users.max(1))
            .collect()
            .await;

        let mut aggregator = ResponseAggregator::with_capacity(outcomes.len());
        for outcome in outcomes {
            fold_outcome(&mut aggregator, outcome);
        }
        let response = aggregator.finish();
        info!(
            users = response.data.len(),
            errors = response.error.len(),
            "user enrichment finished"
        );
        response
    }

    /// List every upstream user and enrich them all.
    ///
    /// # Errors
    ///
    /// Returns [`Error::service_unavailable`] when the directory listing
    /// cannot be fetched.
    pub async fn enrich_listed(&self) -> Result<ResponseDto, Error> {
        let user_ids = self
            .source
            .list_ids(RecordKind::User)
            .await
            .map_err(|error| {
                warn!(%error, "user directory listing failed");
                Error::service_unavailable(format!("user directory unavailable: {error}"))
            })?;
        Ok(self.enrich(&user_ids).await)
    }

    async fn resolve_user(&self, index: usize, id: i64) -> UserOutcome {
        let mut errors = Vec::new();
        let (mut user, resolved) = match self.users.resolve(id).await {
            Ok(user) => (user, true),
            Err(error) => {
                warn!(user_index = index, user_id = id, %error, "user lookup failed");
                errors.push(ErrorDraft::user_not_found(index, id));
                (User::placeholder(), false)
            }
        };

        let slots = mem::take(&mut user.address);
        let resolved_slots: Vec<(AddressSlot, Option<ErrorDraft>)> =
            stream::iter(slots.into_iter().enumerate())
                .map(|(address_index, slot)| self.resolve_slot(index, address_index, slot))
                .buffered(self.config.max_concurrent_addresses.max(1))
                .collect()
                .await;

        user.address = resolved_slots
            .into_iter()
            .map(|(slot, error)| {
                errors.extend(error);
                slot
            })
            .collect();

        UserOutcome {
            index,
            user,
            resolved,
            errors,
        }
    }

    async fn resolve_slot(
        &self,
        user_index: usize,
        address_index: usize,
        slot: AddressSlot,
    ) -> (AddressSlot, Option<ErrorDraft>) {
        // Already settled by an earlier stage; left for the fold.
        let AddressSlot::Pending(address_id) = slot else {
            return (slot, None);
        };
        match self.addresses.resolve(address_id).await {
            Ok(address) => (AddressSlot::Resolved(address), None),
            Err(error) => {
                warn!(
                    user_index,
                    address_index, address_id, %error, "address lookup failed"
                );
                (
                    AddressSlot::Resolved(Address::placeholder()),
                    Some(ErrorDraft::address_not_found(
                        user_index,
                        address_index,
                        address_id,
                    )),
                )
            }
        }
    }
}

/// Index one user's errors, validate the user, and append it.
///
/// Order within a user: lookup errors as discovered, then the empty-name
/// check, then errors carried in address slots.
fn fold_outcome(aggregator: &mut ResponseAggregator, outcome: UserOutcome) {
    let UserOutcome {
        index,
        mut user,
        resolved,
        errors,
    } = outcome;

    for draft in errors {
        aggregator.record(draft);
    }

    if resolved && user.name.is_empty() {
        aggregator.record(ErrorDraft::missing_name(index));
    }

    // Resolvers only emit `Pending` slots; `Failed` ones arrive when a user
    // decoded from an earlier `ResponseDto` is folded again.
    for (address_index, slot) in user.address.iter_mut().enumerate() {
        if matches!(slot, AddressSlot::Failed(_)) {
            let carried = mem::replace(slot, AddressSlot::Resolved(Address::placeholder()));
            if let AddressSlot::Failed(record) = carried {
                aggregator.reparent(record, index, address_index);
            }
        }
    }

    aggregator.push_user(user);
}

#[async_trait]
impl UserEnrichmentQuery for UserEnrichmentService {
    async fn enrich_users(&self, user_ids: &[i64]) -> ResponseDto {
        self.enrich(user_ids).await
    }

    async fn enrich_listed_users(&self) -> Result<ResponseDto, Error> {
        self.enrich_listed().await
    }
}

#[cfg(test)]
mod tests;
