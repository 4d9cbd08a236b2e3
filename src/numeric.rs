//! Basic numerical concepts used throughout the crate

#![allow(missing_docs)]

// Floating-point precision is configured here
#[cfg(feature = "f32")]
pub type Float = f32;
#[cfg(feature = "f32")]
pub use std::f32 as floats;
#[cfg(not(feature = "f32"))]
pub type Float = f64;
#[cfg(not(feature = "f32"))]
pub use std::f64 as floats;

/// Sentinel returned by raw record lookups that fall outside the stored data
///
/// Inherited from the ntuple format: absent columns read as -999, never as an
/// error. Only the raw ingestion layer may produce it; parsed records cannot.
///
pub const ABSENT: Float = -999.;
