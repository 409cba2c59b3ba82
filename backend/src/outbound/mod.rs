//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **directory**: reqwest-backed `RecordSource` for the upstream user
//!   directory
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod directory;
