//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::UserEnrichmentQuery;

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// User enrichment use-case.
    pub enrichment: Arc<dyn UserEnrichmentQuery>,
}

impl HttpState {
    /// Bundle the ports used by the handlers.
    pub fn new(enrichment: Arc<dyn UserEnrichmentQuery>) -> Self {
        Self { enrichment }
    }
}
