//! Domain primitives, ports, and the enrichment service.
//!
//! Purpose: define the records returned to callers (users, addresses, indexed
//! error records) and the orchestration that enriches users with addresses
//! fetched through the [`ports::RecordSource`] port. Nothing in this module
//! depends on HTTP or any other transport.
//!
//! Public surface:
//! - Error / ErrorCode: fatal failures surfaced to adapters.
//! - User / AddressSlot / Address: enriched records.
//! - ErrorRecord / ErrorDraft / ErrorPath / ErrorKind: per-record failures.
//! - ResponseDto / ResponseAggregator: the aggregate result of one run.
//! - UserResolver / AddressResolver: single-record normalisation.
//! - UserEnrichmentService: the two-level fan-out orchestrator.

pub mod address;
pub mod error;
pub mod error_record;
pub mod ports;
pub mod resolvers;
pub mod response;
pub mod user;
pub mod user_enrichment_service;

pub use self::address::Address;
pub use self::error::{Error, ErrorCode};
pub use self::error_record::{ErrorDraft, ErrorKind, ErrorPath, ErrorRecord};
pub use self::resolvers::{AddressResolver, ResolveError, UserResolver};
pub use self::response::{ResponseAggregator, ResponseDto};
pub use self::user::{AddressSlot, User};
pub use self::user_enrichment_service::{UserEnrichmentConfig, UserEnrichmentService};
