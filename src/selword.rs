//! Event selection word
//!
//! Every cut computed by the pair selector is recorded in a fixed-width bit
//! word, whether or not it enters the final accept decision. Downstream
//! synchronization studies read individual bits to compare cut-by-cut with
//! other analysis groups.

/// Single decisions recorded by the pair selector
///
/// The discriminant is the bit position inside a [`SelectionWord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionBit {
    /// Muon leg passes the baseline kinematic and vertex cuts
    MuonBaselineSelection = 0,
    /// Tau leg passes the baseline kinematic and vertex cuts
    TauBaselineSelection = 1,
    /// The legs are separated by more than the minimum cone distance
    BaselinePair = 2,
    /// Muon leg additionally passes the tight isolation cut
    PostSynchMuon = 3,
    /// Tau leg additionally passes the identification mask
    PostSynchTau = 4,
    /// A second qualifying muon forms an opposite-charge pair
    DiMuonVeto = 5,
    /// An additional muon passes the extra-lepton selection
    ExtraMuonVeto = 6,
    /// An additional electron passes the extra-lepton selection
    ExtraElectronVeto = 7,
}
//
impl SelectionBit {
    /// All bits, in word order
    pub const ALL: [SelectionBit; 8] = [
        SelectionBit::MuonBaselineSelection,
        SelectionBit::TauBaselineSelection,
        SelectionBit::BaselinePair,
        SelectionBit::PostSynchMuon,
        SelectionBit::PostSynchTau,
        SelectionBit::DiMuonVeto,
        SelectionBit::ExtraMuonVeto,
        SelectionBit::ExtraElectronVeto,
    ];

    /// Short label for cut reports
    pub const fn label(self) -> &'static str {
        match self {
            SelectionBit::MuonBaselineSelection => "muon baseline",
            SelectionBit::TauBaselineSelection => "tau baseline",
            SelectionBit::BaselinePair => "pair separation",
            SelectionBit::PostSynchMuon => "muon isolation",
            SelectionBit::PostSynchTau => "tau identification",
            SelectionBit::DiMuonVeto => "di-muon veto",
            SelectionBit::ExtraMuonVeto => "extra muon veto",
            SelectionBit::ExtraElectronVeto => "extra electron veto",
        }
    }
}

/// Fixed-width word of selection decisions
///
/// The selector rebuilds the word from scratch on every evaluation and the
/// event stores it wholesale, so a stale bit cannot survive from one pair
/// to the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectionWord(u32);
//
impl SelectionWord {
    /// Word with every bit clear
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Record one decision
    pub fn set(&mut self, bit: SelectionBit, value: bool) {
        if value {
            self.0 |= 1 << bit as u32;
        } else {
            self.0 &= !(1 << bit as u32);
        }
    }

    /// Read one decision
    pub const fn check(&self, bit: SelectionBit) -> bool {
        self.0 & (1 << bit as u32) != 0
    }

    /// Whether no decision is recorded
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    /// Raw bit pattern, for compact printing
    pub const fn bits(&self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_are_independent() {
        let mut word = SelectionWord::empty();
        assert!(word.is_empty());
        word.set(SelectionBit::MuonBaselineSelection, true);
        word.set(SelectionBit::DiMuonVeto, true);
        assert!(word.check(SelectionBit::MuonBaselineSelection));
        assert!(word.check(SelectionBit::DiMuonVeto));
        assert!(!word.check(SelectionBit::TauBaselineSelection));

        word.set(SelectionBit::DiMuonVeto, false);
        assert!(!word.check(SelectionBit::DiMuonVeto));
        assert!(word.check(SelectionBit::MuonBaselineSelection));
        assert_eq!(word.bits(), 1);
    }

    #[test]
    fn word_order_matches_the_declared_positions() {
        for (position, bit) in SelectionBit::ALL.into_iter().enumerate() {
            assert_eq!(bit as usize, position);
        }
    }
}
