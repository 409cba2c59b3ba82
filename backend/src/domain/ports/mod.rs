//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod record_source;
mod user_enrichment_query;

#[cfg(test)]
pub use record_source::MockRecordSource;
pub use record_source::{FixtureRecordSource, RecordKind, RecordSource, RecordSourceError};
#[cfg(test)]
pub use user_enrichment_query::MockUserEnrichmentQuery;
pub use user_enrichment_query::UserEnrichmentQuery;
