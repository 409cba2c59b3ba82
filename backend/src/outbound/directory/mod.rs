//! Upstream directory adapters.
//!
//! This module provides a thin HTTP implementation of the `RecordSource`
//! port.

mod dto;
mod http_source;

pub use http_source::HttpRecordSource;
