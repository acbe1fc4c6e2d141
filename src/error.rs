//! Typed failures surfaced by the aggregation, rendering, and chunking stages.
//!
//! Command entry points convert these into `anyhow` errors; only the CLI
//! layer decides whether a failure is printed, degraded, or fatal.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReportError {
    /// The store could not be read, or no reporting period matches the key.
    #[error("Lookup failure: {0}")]
    LookupFailure(String),

    /// A single geography block cannot fit in any segment.
    #[error(
        "Section for {geography} is {len} characters, which exceeds the {ceiling} character limit. \
         Consider breaking it into smaller areas."
    )]
    OversizedSection {
        geography: String,
        len: usize,
        ceiling: usize,
    },

    /// A relational row is missing a required field.
    #[error("Malformed row for location #{location_id}: missing {field}")]
    MalformedRow {
        location_id: i64,
        field: &'static str,
    },
}

impl ReportError {
    pub fn lookup(err: impl std::fmt::Display) -> Self {
        ReportError::LookupFailure(err.to_string())
    }
}
