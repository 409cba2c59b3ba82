//! Driving port for user enrichment.
//!
//! Inbound adapters (HTTP handlers) call this port to obtain enriched users
//! without knowing which record source backs the domain service.

use async_trait::async_trait;

use crate::domain::{Error, ResponseDto};

/// Domain use-case port for enriching users with their addresses.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserEnrichmentQuery: Send + Sync {
    /// Enrich the users with the given ids, in order.
    ///
    /// Never fails: every per-record failure is reported in the response's
    /// error list.
    async fn enrich_users(&self, user_ids: &[i64]) -> ResponseDto;

    /// Enrich every user the upstream directory lists.
    ///
    /// Fails only when the directory listing itself cannot be obtained.
    async fn enrich_listed_users(&self) -> Result<ResponseDto, Error>;
}
