//! User enrichment service library.
//!
//! Enriches users fetched from an upstream directory with their addresses,
//! reporting every per-record failure as an indexed, path-addressed error
//! instead of aborting the run.

pub mod domain;
pub mod inbound;
pub mod outbound;
pub mod settings;
