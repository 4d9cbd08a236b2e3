//! Hadronic tau identification bits
//!
//! The ntuple stores tau identification as three compact working-point
//! counters (anti-muon, anti-electron, isolation MVA). The analysis works
//! with a single packed word in which every discriminant working point owns
//! one bit, so that a selection is a plain mask comparison.

/// Bit offset of the anti-muon block inside the packed word
pub const ANTI_MUON_OFFSET: u32 = 0;
/// Bit offset of the anti-electron block inside the packed word
pub const ANTI_ELECTRON_OFFSET: u32 = 2;
/// Bit offset of the isolation MVA block inside the packed word
pub const ISOLATION_OFFSET: u32 = 7;

/// Tau identification discriminant working points
///
/// The discriminant value is the bit position inside the packed word built
/// by [`tau_id_word`]. Working points within a block are ordered loosest to
/// tightest, so a tau passing a tight point also sets all looser bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TauId {
    /// againstMuonLoose3
    AgainstMuonLoose = 0,
    /// againstMuonTight3
    AgainstMuonTight = 1,
    /// againstElectronVLooseMVA6
    AgainstElectronVLoose = 2,
    /// againstElectronLooseMVA6
    AgainstElectronLoose = 3,
    /// againstElectronMediumMVA6
    AgainstElectronMedium = 4,
    /// againstElectronTightMVA6
    AgainstElectronTight = 5,
    /// againstElectronVTightMVA6
    AgainstElectronVTight = 6,
    /// byVLooseIsolationMVArun2v1DBoldDMwLT
    IsolationVLoose = 7,
    /// byLooseIsolationMVArun2v1DBoldDMwLT
    IsolationLoose = 8,
    /// byMediumIsolationMVArun2v1DBoldDMwLT
    IsolationMedium = 9,
    /// byTightIsolationMVArun2v1DBoldDMwLT
    IsolationTight = 10,
    /// byVTightIsolationMVArun2v1DBoldDMwLT
    IsolationVTight = 11,
    /// byVVTightIsolationMVArun2v1DBoldDMwLT
    IsolationVVTight = 12,
}
//
impl TauId {
    /// Bit mask of this working point inside the packed word
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Working points a baseline tau must pass, as a packed-word mask
///
/// Tight isolation, tight muon rejection, very loose electron rejection.
pub const fn baseline_mask() -> u32 {
    TauId::IsolationTight.bit() | TauId::AgainstMuonTight.bit() | TauId::AgainstElectronVLoose.bit()
}

/// Pack the three working-point counters into a single discriminant word
///
/// Each counter arrives as "number of working points passed" encoded
/// unary-style by the upstream conversion, so the blocks can be combined by
/// plain shifts.
pub fn tau_id_word(anti_mu: u8, anti_ele: u8, mva_iso: u8) -> u32 {
    (anti_mu as u32) << ANTI_MUON_OFFSET
        | (anti_ele as u32) << ANTI_ELECTRON_OFFSET
        | (mva_iso as u32) << ISOLATION_OFFSET
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_land_at_their_offsets() {
        assert_eq!(TauId::AgainstMuonLoose as u32, ANTI_MUON_OFFSET);
        assert_eq!(TauId::AgainstElectronVLoose as u32, ANTI_ELECTRON_OFFSET);
        assert_eq!(TauId::IsolationVLoose as u32, ISOLATION_OFFSET);
        assert_eq!(TauId::IsolationVVTight as u32, 12);
    }

    #[test]
    fn word_packing_matches_the_bit_table() {
        // Tight anti-muon (2 points), VLoose anti-electron (1 point),
        // Tight isolation (4 points, unary 0b1111).
        let word = tau_id_word(0b11, 0b1, 0b1111);
        assert_eq!(word & TauId::AgainstMuonTight.bit(), TauId::AgainstMuonTight.bit());
        assert_eq!(word & TauId::AgainstElectronVLoose.bit(), TauId::AgainstElectronVLoose.bit());
        assert_eq!(word & TauId::IsolationTight.bit(), TauId::IsolationTight.bit());
        assert_eq!(word & TauId::IsolationVTight.bit(), 0);
        assert_eq!(word & baseline_mask(), baseline_mask());
    }

    #[test]
    fn baseline_mask_requires_exactly_three_points() {
        assert_eq!(baseline_mask(), (1 << 10) | (1 << 1) | (1 << 2));
        // Medium isolation stops one point short of the mask.
        let word = tau_id_word(0b11, 0b11111, 0b111);
        assert_ne!(word & baseline_mask(), baseline_mask());
    }
}
