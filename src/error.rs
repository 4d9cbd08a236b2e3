//! Error type for record ingestion
//!
//! Selection itself never errors (it degrades to a rejection, as the
//! downstream cut-flow bookkeeping expects); errors only arise when raw
//! ntuple-side records are parsed into typed ones.

use thiserror::Error;

/// Failure modes of raw-record parsing
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    /// The flat property vector does not cover the full property layout
    #[error("property vector too short: expected at least {expected} entries, got {got}")]
    TruncatedProperties {
        /// Number of entries required by the property layout
        expected: usize,
        /// Number of entries actually stored
        got: usize,
    },

    /// A property that must be finite is NaN or infinite
    #[error("property {name} is not finite")]
    NonFiniteProperty {
        /// Property layout name of the offending entry
        name: &'static str,
    },

    /// The PDG id does not denote a charged lepton
    #[error("PDG id {0} is not a charged lepton (expected |id| of 11, 13 or 15)")]
    NotALepton(i32),

    /// The reconstructed charge is outside the physical range
    #[error("charge {0} is outside [-1, 1]")]
    UnphysicalCharge(i32),
}

/// Result type alias for record parsing
pub type RecordResult<T> = std::result::Result<T, RecordError>;
