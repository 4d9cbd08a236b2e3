//! Baseline selection of muon plus hadronic tau pairs
//!
//!
//! # Introduction (for the physicist)
//!
//! This crate implements the baseline event selection of a search for lepton
//! flavour violating decays of the Higgs boson into a muon and a tau lepton,
//! with the tau decaying hadronically. Events carry a collection of
//! reconstructed leptons and a list of Higgs candidate pairs built from them.
//! The selection classifies one candidate pair at a time against the muon and
//! tau baseline requirements of the 2016 dataset analysis, records the
//! outcome of every cut in a per-event selection word, and optionally
//! tightens the accept decision with tau identification, muon isolation and
//! the extra-lepton vetoes.
//!
//!
//! # Introduction (for the computer guy)
//!
//! The crate is organized as a pipeline of small modules:
//!
//! * lepton records are parsed from flat property columns at ingestion, where
//!   malformed input is reported as an error, so the cuts themselves never
//!   need to check their inputs again,
//! * candidate pairs resolve their legs through stored collection positions,
//!   and every cut reads the lepton collection through those positions,
//! * a cut-flow accumulator tallies the verdicts, and merges across event
//!   batches so that multi-threaded runs reproduce sequential ones.
//!
//! The `mutau` binary drives this pipeline over a generated toy event sample
//! and reports the resulting cut flow.

#![warn(missing_docs)]

pub mod config;
pub mod cutflow;
pub mod cuts;
pub mod error;
pub mod event;
pub mod lepton;
pub mod momentum;
pub mod numeric;
pub mod output;
pub mod pair;
pub mod pairsel;
pub mod properties;
pub mod random;
pub mod scheduling;
pub mod selword;
pub mod tauid;
pub mod toygen;
