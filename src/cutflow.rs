//! Selection statistics accumulated across events
//!
//! One `CutFlow` is filled per event batch and the batch results are merged
//! associatively, so the numbers come out identical whether the event loop
//! ran on one thread or many.

use crate::{numeric::Float, pairsel::PairVerdict, selword::SelectionBit};
use nalgebra::SVector;
use num_traits::Zero;

/// Number of recorded selection bits
const BIT_COUNT: usize = SelectionBit::ALL.len();

/// Per-bit counter vector
type BitCounts = SVector<u64, BIT_COUNT>;

/// Counters describing how a stream of pairs fared in the selection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CutFlow {
    // ### VERDICT COUNTERS ###
    /// Number of classified pairs
    seen: u64,

    /// Pairs with an unresolvable index or leg position
    no_candidate: u64,

    /// Pairs whose legs were not a (muon, tau) combination
    wrong_flavour: u64,

    /// Pairs passing the accept decision
    accepted: u64,

    // ### PER-CUT COUNTERS ###
    /// How often each selection bit was set, in word order
    bit_counts: BitCounts,
}
//
impl CutFlow {
    /// Fresh accumulator with every counter at zero
    pub fn new() -> Self {
        CutFlow {
            seen: 0,
            no_candidate: 0,
            wrong_flavour: 0,
            accepted: 0,
            bit_counts: BitCounts::zero(),
        }
    }

    /// Record the verdict of one classified pair
    pub fn record(&mut self, verdict: PairVerdict) {
        self.seen += 1;
        match verdict {
            PairVerdict::NoCandidate => self.no_candidate += 1,
            PairVerdict::WrongFlavour => self.wrong_flavour += 1,
            PairVerdict::Rejected(word) | PairVerdict::Accepted(word) => {
                if verdict.accepted() {
                    self.accepted += 1;
                }
                for bit in SelectionBit::ALL {
                    if word.check(bit) {
                        self.bit_counts[bit as usize] += 1;
                    }
                }
            }
        }
    }

    /// Fold the counters of another accumulator into this one
    pub fn merge(&mut self, other: Self) {
        self.seen += other.seen;
        self.no_candidate += other.no_candidate;
        self.wrong_flavour += other.wrong_flavour;
        self.accepted += other.accepted;
        self.bit_counts += other.bit_counts;
    }

    // === READOUT ===

    /// Number of classified pairs
    pub fn seen(&self) -> u64 {
        self.seen
    }

    /// Pairs with an unresolvable index or leg position
    pub fn no_candidate(&self) -> u64 {
        self.no_candidate
    }

    /// Pairs whose legs were not a (muon, tau) combination
    pub fn wrong_flavour(&self) -> u64 {
        self.wrong_flavour
    }

    /// Pairs passing the accept decision
    pub fn accepted(&self) -> u64 {
        self.accepted
    }

    /// Well-formed pairs failing the accept decision
    pub fn rejected(&self) -> u64 {
        self.seen - self.no_candidate - self.wrong_flavour - self.accepted
    }

    /// How often one selection bit was set
    pub fn bit_count(&self, bit: SelectionBit) -> u64 {
        self.bit_counts[bit as usize]
    }

    /// Fraction of classified pairs passing the accept decision
    pub fn efficiency(&self) -> Float {
        if self.seen == 0 {
            0.
        } else {
            self.accepted as Float / self.seen as Float
        }
    }
}

impl Default for CutFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::selword::SelectionWord;

    fn word_with(bits: &[SelectionBit]) -> SelectionWord {
        let mut word = SelectionWord::empty();
        for &bit in bits {
            word.set(bit, true);
        }
        word
    }

    #[test]
    fn verdicts_land_in_their_counters() {
        let mut flow = CutFlow::new();
        flow.record(PairVerdict::NoCandidate);
        flow.record(PairVerdict::WrongFlavour);
        flow.record(PairVerdict::Rejected(word_with(&[
            SelectionBit::TauBaselineSelection,
        ])));
        flow.record(PairVerdict::Accepted(word_with(&[
            SelectionBit::MuonBaselineSelection,
            SelectionBit::TauBaselineSelection,
            SelectionBit::BaselinePair,
        ])));

        assert_eq!(flow.seen(), 4);
        assert_eq!(flow.no_candidate(), 1);
        assert_eq!(flow.wrong_flavour(), 1);
        assert_eq!(flow.accepted(), 1);
        assert_eq!(flow.rejected(), 1);
        assert_eq!(flow.bit_count(SelectionBit::TauBaselineSelection), 2);
        assert_eq!(flow.bit_count(SelectionBit::MuonBaselineSelection), 1);
        assert_eq!(flow.bit_count(SelectionBit::DiMuonVeto), 0);
        assert_eq!(flow.efficiency(), 0.25);
    }

    #[test]
    fn merge_conserves_every_count() {
        let mut left = CutFlow::new();
        left.record(PairVerdict::Accepted(word_with(&[
            SelectionBit::MuonBaselineSelection,
        ])));
        left.record(PairVerdict::NoCandidate);

        let mut right = CutFlow::new();
        right.record(PairVerdict::Rejected(word_with(&[
            SelectionBit::MuonBaselineSelection,
            SelectionBit::DiMuonVeto,
        ])));
        right.record(PairVerdict::WrongFlavour);
        right.record(PairVerdict::NoCandidate);

        let mut whole = CutFlow::new();
        for verdict in [
            PairVerdict::Accepted(word_with(&[SelectionBit::MuonBaselineSelection])),
            PairVerdict::NoCandidate,
            PairVerdict::Rejected(word_with(&[
                SelectionBit::MuonBaselineSelection,
                SelectionBit::DiMuonVeto,
            ])),
            PairVerdict::WrongFlavour,
            PairVerdict::NoCandidate,
        ] {
            whole.record(verdict);
        }

        left.merge(right);
        assert_eq!(left, whole);
        assert_eq!(left.seen(), 5);
        assert_eq!(left.rejected(), 1);
    }
}
