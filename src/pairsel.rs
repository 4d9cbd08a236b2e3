//! Baseline pair selection
//!
//! The selector classifies one Higgs candidate pair at a time against the
//! baseline muon and tau requirements of the H to mu tau_h channel,
//! following the working-group baseline of the 2016 dataset. Every cut is
//! computed and recorded in the selection word whether or not it enters the
//! final accept decision, so synchronization ntuples keep the full
//! cut-by-cut picture.

use crate::{
    cuts::BaselineCuts,
    event::Event,
    lepton::Variation,
    momentum,
    selword::{SelectionBit, SelectionWord},
    tauid,
};
use prefix_num_ops::real::*;

/// Tightness of the final accept decision
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelectionMode {
    /// Accept on the baseline kinematic cuts alone, leaving isolation,
    /// identification and the vetoes readable in the selection word. This
    /// is the mode used when synchronizing cut-by-cut with other groups.
    #[default]
    Synchronization,
    /// Additionally require the tau identification mask, loose muon
    /// isolation and the absence of veto leptons.
    Production,
}

/// Outcome of classifying one pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairVerdict {
    /// The pair index or a stored leg position resolves to nothing
    NoCandidate,
    /// The legs are not a (muon, tau) combination
    WrongFlavour,
    /// A well-formed candidate failing the accept decision
    Rejected(SelectionWord),
    /// A well-formed candidate passing the accept decision
    Accepted(SelectionWord),
}
//
impl PairVerdict {
    /// Selection word to store in the event; empty for malformed pairs
    pub fn word(self) -> SelectionWord {
        match self {
            PairVerdict::NoCandidate | PairVerdict::WrongFlavour => SelectionWord::empty(),
            PairVerdict::Rejected(word) | PairVerdict::Accepted(word) => word,
        }
    }

    /// Whether the pair passed the accept decision
    pub const fn accepted(self) -> bool {
        matches!(self, PairVerdict::Accepted(_))
    }
}

/// Hook for the extra-muon and extra-electron vetoes
///
/// The scan over additional leptons needs reconstruction detail (muon type
/// bits, electron identification MVA) that lives outside this crate, so the
/// surrounding analysis supplies the implementation. Arguments are the
/// event, the collection positions of the selected muon and tau legs, and
/// the unsigned PDG code of the flavour being vetoed.
pub trait ThirdLeptonVeto {
    /// Whether an additional lepton of flavour `pdg_id` vetoes this pair
    fn veto(&self, event: &Event, muon_index: usize, tau_index: usize, pdg_id: i32) -> bool;
}

/// Veto hook that never fires
#[derive(Debug, Clone, Copy, Default)]
pub struct NoThirdLeptonVeto;
//
impl ThirdLeptonVeto for NoThirdLeptonVeto {
    fn veto(&self, _: &Event, _: usize, _: usize, _: i32) -> bool {
        false
    }
}

impl<F> ThirdLeptonVeto for F
where
    F: Fn(&Event, usize, usize, i32) -> bool,
{
    fn veto(&self, event: &Event, muon_index: usize, tau_index: usize, pdg_id: i32) -> bool {
        self(event, muon_index, tau_index, pdg_id)
    }
}

/// Baseline pair selector
#[derive(Debug, Clone)]
pub struct PairSelector<V = NoThirdLeptonVeto> {
    /// Thresholds applied by the cuts
    pub cuts: BaselineCuts,

    /// Tightness of the accept decision
    pub mode: SelectionMode,

    /// Extra-lepton veto supplied by the surrounding analysis
    pub third_lepton_veto: V,
}
//
impl PairSelector<NoThirdLeptonVeto> {
    /// Selector with the analysis thresholds and no extra-lepton veto
    pub fn new(mode: SelectionMode) -> Self {
        PairSelector {
            cuts: BaselineCuts::default(),
            mode,
            third_lepton_veto: NoThirdLeptonVeto,
        }
    }
}

impl Default for PairSelector<NoThirdLeptonVeto> {
    fn default() -> Self {
        Self::new(SelectionMode::default())
    }
}

impl<V: ThirdLeptonVeto> PairSelector<V> {
    /// Swap in an extra-lepton veto implementation
    pub fn with_third_lepton_veto<W: ThirdLeptonVeto>(self, veto: W) -> PairSelector<W> {
        PairSelector {
            cuts: self.cuts,
            mode: self.mode,
            third_lepton_veto: veto,
        }
    }

    // === CLASSIFICATION ===

    /// Classify one candidate pair without touching the event
    ///
    /// Leg flavours are resolved from the pair's own slots; every property
    /// and momentum cut then reads the collection entries through the
    /// stored leg positions. Selection kinematics are always nominal.
    pub fn classify(&self, event: &Event, pair_index: usize) -> PairVerdict {
        let Some(pair) = event.pairs.get(pair_index) else {
            return PairVerdict::NoCandidate;
        };

        let Some((muon_index, _)) = pair.muon() else {
            return PairVerdict::WrongFlavour;
        };
        let Some((tau_index, _)) = pair.tau() else {
            return PairVerdict::WrongFlavour;
        };
        let (Some(muon), Some(tau)) = (
            event.leptons.get(muon_index),
            event.leptons.get(tau_index),
        ) else {
            return PairVerdict::NoCandidate;
        };

        let cuts = &self.cuts;
        let muon_p4 = muon.p4(Variation::Nominal);
        let tau_p4 = tau.p4(Variation::Nominal);

        let muon_baseline = momentum::pt(&muon_p4) > cuts.muon_min_pt
            && abs(momentum::eta(&muon_p4)) <= cuts.muon_max_abs_eta
            && abs(muon.props().dz) < cuts.max_abs_dz
            && abs(muon.props().dxy) < cuts.max_abs_dxy;

        let tau_baseline = momentum::pt(&tau_p4) > cuts.tau_min_pt
            && abs(momentum::eta(&tau_p4)) < cuts.tau_max_abs_eta
            && tau.props().decay_mode_finding > cuts.tau_min_decay_mode_finding
            && abs(tau.props().dz) < cuts.max_abs_dz
            && tau.props().charge.abs() == 1;

        let baseline_pair = momentum::delta_r(&muon_p4, &tau_p4) > cuts.pair_min_delta_r;

        let tight_muon_iso = muon.props().rel_iso < cuts.muon_tight_iso;
        let loose_muon_iso = muon.props().rel_iso < cuts.muon_loose_iso;

        let tau_word =
            tauid::tau_id_word(tau.props().anti_mu, tau.props().anti_ele, tau.props().mva_iso);
        let tau_id = tau_word & tauid::baseline_mask() == tauid::baseline_mask();

        let di_muon_veto = self.di_muon_veto(event);
        let extra_muon_veto = self.third_lepton_veto.veto(event, muon_index, tau_index, 13);
        let extra_electron_veto = self.third_lepton_veto.veto(event, muon_index, tau_index, 11);

        // The word is rebuilt from scratch for every pair
        let mut word = SelectionWord::empty();
        word.set(SelectionBit::MuonBaselineSelection, muon_baseline);
        word.set(SelectionBit::TauBaselineSelection, tau_baseline);
        word.set(SelectionBit::BaselinePair, baseline_pair);
        word.set(SelectionBit::PostSynchMuon, tight_muon_iso);
        word.set(SelectionBit::PostSynchTau, tau_id);
        word.set(SelectionBit::DiMuonVeto, di_muon_veto);
        word.set(SelectionBit::ExtraMuonVeto, extra_muon_veto);
        word.set(SelectionBit::ExtraElectronVeto, extra_electron_veto);

        let baseline = muon_baseline && tau_baseline && baseline_pair;
        let accepted = match self.mode {
            SelectionMode::Synchronization => baseline,
            SelectionMode::Production => {
                baseline
                    && tau_id
                    && loose_muon_iso
                    && !di_muon_veto
                    && !extra_muon_veto
                    && !extra_electron_veto
            }
        };

        if accepted {
            PairVerdict::Accepted(word)
        } else {
            PairVerdict::Rejected(word)
        }
    }

    /// Classify one pair and record the outcome in the event
    ///
    /// The stored selection word is replaced wholesale, so nothing survives
    /// from a previous call, malformed pairs included. Returns the verdict
    /// so that callers can tally it.
    pub fn select(&self, event: &mut Event, pair_index: usize) -> PairVerdict {
        let verdict = self.classify(event, pair_index);
        event.store_selection_word(verdict.word());
        verdict
    }

    // === VETOES ===

    /// Whether a second qualifying muon vetoes the event
    ///
    /// Scans the whole lepton collection for muons passing the veto
    /// quality cuts, then looks for an unordered pair of them with charge
    /// product -1 and separation above the minimum.
    pub fn di_muon_veto(&self, event: &Event) -> bool {
        let cuts = &self.cuts;

        // Entries are collection positions, not positions in this list
        let mut qualifying = Vec::new();
        for (index, lepton) in event.leptons.iter().enumerate() {
            if !lepton.is_muon() {
                continue;
            }
            let p4 = lepton.p4(Variation::Nominal);
            let passes = momentum::pt(&p4) > cuts.veto_muon_min_pt
                && abs(momentum::eta(&p4)) < cuts.veto_muon_max_abs_eta
                && abs(lepton.props().dz) < cuts.max_abs_dz
                && abs(lepton.props().dxy) < cuts.max_abs_dxy
                && lepton.props().rel_iso < cuts.veto_muon_max_iso;
            if passes {
                qualifying.push(index);
            }
        }

        if qualifying.len() < 2 {
            return false;
        }

        for (slot, &index1) in qualifying.iter().enumerate() {
            for &index2 in &qualifying[slot + 1..] {
                let muon1 = &event.leptons[index1];
                let muon2 = &event.leptons[index2];
                let separation = momentum::delta_r(
                    &muon1.p4(Variation::Nominal),
                    &muon2.p4(Variation::Nominal),
                );
                if muon1.props().charge * muon2.props().charge == -1
                    && separation > cuts.veto_min_delta_r
                {
                    return true;
                }
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        lepton::Lepton,
        momentum::{from_pt_eta_phi_mass, TransverseVector},
        numeric::Float,
        pair::LeptonPair,
        properties::LeptonProperties,
    };

    // Azimuthal offset putting the golden pair at an angular distance of
    // exactly 1.0 from a muon at eta 1.0 when the tau sits at eta 1.5
    const GOLDEN_DPHI: Float = 0.866_025_403_784_438_6;

    fn muon(pt: Float, eta: Float, phi: Float, charge: i32, rel_iso: Float) -> Lepton {
        let props = LeptonProperties {
            pdg_id: -13 * charge.signum(),
            charge,
            dxy: 0.02,
            dz: 0.1,
            rel_iso,
            decay_mode_finding: 0.,
            decay_mode: 0,
            anti_mu: 0,
            anti_ele: 0,
            mva_iso: 0,
            medium_id: true,
            trigger_type_bits: 0,
            filter_fired_bits: 0,
        };
        Lepton::new(from_pt_eta_phi_mass(pt, eta, phi, 0.105), props)
    }

    fn tau(pt: Float, eta: Float, phi: Float, charge: i32, mva_iso: u8) -> Lepton {
        let props = LeptonProperties {
            pdg_id: -15 * charge.signum(),
            charge,
            dxy: 0.003,
            dz: 0.1,
            rel_iso: 0.,
            decay_mode_finding: 1.,
            decay_mode: 10,
            anti_mu: 0b11,
            anti_ele: 0b11111,
            mva_iso,
            medium_id: false,
            trigger_type_bits: 0,
            filter_fired_bits: 0,
        };
        Lepton::new(from_pt_eta_phi_mass(pt, eta, phi, 0.8), props)
    }

    /// Event holding one (muon, tau) pair referencing leptons 0 and 1
    fn mu_tau_event(muon: Lepton, tau: Lepton) -> Event {
        let mut event = Event::new();
        let pair = LeptonPair::new(muon.clone(), 0, tau.clone(), 1, TransverseVector::new(40., 0.));
        event.leptons = vec![muon, tau];
        event.pairs = vec![pair];
        event
    }

    fn golden_event() -> Event {
        mu_tau_event(
            muon(25., 1.0, 0., 1, 0.05),
            tau(35., 1.5, GOLDEN_DPHI, -1, 0b1111),
        )
    }

    #[test]
    fn golden_pair_passes_the_baseline() {
        let selector = PairSelector::new(SelectionMode::Synchronization);
        let mut event = golden_event();
        assert!(selector.select(&mut event, 0).accepted());
        assert!(event.check_selection_bit(SelectionBit::MuonBaselineSelection));
        assert!(event.check_selection_bit(SelectionBit::TauBaselineSelection));
        assert!(event.check_selection_bit(SelectionBit::BaselinePair));
        assert!(event.check_selection_bit(SelectionBit::PostSynchMuon));
        assert!(event.check_selection_bit(SelectionBit::PostSynchTau));
        assert!(!event.check_selection_bit(SelectionBit::DiMuonVeto));
    }

    #[test]
    fn soft_muon_fails_only_its_own_cut() {
        let selector = PairSelector::new(SelectionMode::Synchronization);
        let mut event = mu_tau_event(
            muon(15., 1.0, 0., 1, 0.05),
            tau(35., 1.5, GOLDEN_DPHI, -1, 0b1111),
        );
        assert!(!selector.select(&mut event, 0).accepted());
        assert!(!event.check_selection_bit(SelectionBit::MuonBaselineSelection));
        assert!(event.check_selection_bit(SelectionBit::TauBaselineSelection));
        assert!(event.check_selection_bit(SelectionBit::BaselinePair));
    }

    #[test]
    fn non_mu_tau_pairs_are_wrong_flavour() {
        let selector = PairSelector::new(SelectionMode::Synchronization);

        let muon1 = muon(25., 1.0, 0., 1, 0.05);
        let muon2 = muon(22., -0.5, 2., -1, 0.05);
        let mut event = Event::new();
        event.pairs = vec![LeptonPair::new(
            muon1.clone(),
            0,
            muon2.clone(),
            1,
            TransverseVector::new(40., 0.),
        )];
        event.leptons = vec![muon1, muon2];
        assert_eq!(selector.classify(&event, 0), PairVerdict::WrongFlavour);

        let tau1 = tau(35., 1.5, 0., 1, 0b1111);
        let tau2 = tau(32., -1.5, 2., -1, 0b1111);
        let mut event = Event::new();
        event.pairs = vec![LeptonPair::new(
            tau1.clone(),
            0,
            tau2.clone(),
            1,
            TransverseVector::new(40., 0.),
        )];
        event.leptons = vec![tau1, tau2];
        assert_eq!(selector.classify(&event, 0), PairVerdict::WrongFlavour);
    }

    #[test]
    fn unresolvable_pairs_are_no_candidates() {
        let selector = PairSelector::new(SelectionMode::Synchronization);

        let mut event = Event::new();
        assert_eq!(selector.classify(&event, 0), PairVerdict::NoCandidate);

        event = golden_event();
        assert_eq!(selector.classify(&event, 5), PairVerdict::NoCandidate);

        // Stored leg position pointing past the collection
        let dangling = LeptonPair::new(
            muon(25., 1.0, 0., 1, 0.05),
            7,
            tau(35., 1.5, GOLDEN_DPHI, -1, 0b1111),
            1,
            TransverseVector::new(40., 0.),
        );
        event.pairs = vec![dangling];
        assert_eq!(selector.classify(&event, 0), PairVerdict::NoCandidate);
    }

    #[test]
    fn malformed_pairs_clear_the_stored_word() {
        let selector = PairSelector::new(SelectionMode::Synchronization);
        let mut event = golden_event();
        assert!(selector.select(&mut event, 0).accepted());
        assert!(!event.selection_word().is_empty());

        assert!(!selector.select(&mut event, 5).accepted());
        assert!(event.selection_word().is_empty());
    }

    #[test]
    fn selecting_another_pair_overwrites_the_word() {
        let selector = PairSelector::new(SelectionMode::Synchronization);
        let mut event = golden_event();
        // Second candidate built from a soft, badly isolated muon and a
        // good tau, stored behind the golden leptons
        let soft_muon = muon(5., 0.1, 0.5, 1, 0.4);
        let good_tau = tau(32., -1.0, 2.0, -1, 0b1111);
        let pair = LeptonPair::new(
            soft_muon.clone(),
            2,
            good_tau.clone(),
            3,
            TransverseVector::new(40., 0.),
        );
        event.leptons.push(soft_muon);
        event.leptons.push(good_tau);
        event.pairs.push(pair);

        assert!(selector.select(&mut event, 0).accepted());
        assert!(event.check_selection_bit(SelectionBit::MuonBaselineSelection));
        assert!(event.check_selection_bit(SelectionBit::PostSynchMuon));

        assert!(!selector.select(&mut event, 1).accepted());
        assert!(!event.check_selection_bit(SelectionBit::MuonBaselineSelection));
        assert!(!event.check_selection_bit(SelectionBit::PostSynchMuon));
        assert!(event.check_selection_bit(SelectionBit::TauBaselineSelection));
    }

    #[test]
    fn di_muon_veto_needs_two_qualifying_opposite_muons() {
        let selector = PairSelector::new(SelectionMode::Synchronization);

        // Opposite charge, well separated
        let mut event = Event::new();
        event.leptons = vec![muon(20., 0.5, 0., 1, 0.1), muon(18., -0.5, 2., -1, 0.1)];
        assert!(selector.di_muon_veto(&event));

        // Same charge
        event.leptons = vec![muon(20., 0.5, 0., 1, 0.1), muon(18., -0.5, 2., 1, 0.1)];
        assert!(!selector.di_muon_veto(&event));

        // Collinear pair below the separation floor
        event.leptons = vec![muon(20., 0.5, 0., 1, 0.1), muon(18., 0.5, 0.1, -1, 0.1)];
        assert!(!selector.di_muon_veto(&event));

        // Second muon fails isolation
        event.leptons = vec![muon(20., 0.5, 0., 1, 0.1), muon(18., -0.5, 2., -1, 0.5)];
        assert!(!selector.di_muon_veto(&event));

        // One muon alone
        event.leptons = vec![muon(20., 0.5, 0., 1, 0.1)];
        assert!(!selector.di_muon_veto(&event));
    }

    #[test]
    fn di_muon_veto_survives_leading_non_qualifying_objects() {
        // A tau and a soft muon sit in front of the qualifying muons, so
        // qualifying positions and collection positions differ. The veto
        // must judge the qualifying muons, not whatever happens to sit at
        // the low collection positions.
        let selector = PairSelector::new(SelectionMode::Synchronization);
        let mut event = Event::new();
        event.leptons = vec![
            tau(35., 1.5, 1., -1, 0b1111),
            muon(5., 0.1, 0.5, -1, 0.1),
            muon(20., 0.5, 0., 1, 0.1),
            muon(18., -0.5, 2., -1, 0.1),
        ];
        assert!(selector.di_muon_veto(&event));

        // Flipping the far muon's charge leaves only a same-charge pair
        event.leptons[3] = muon(18., -0.5, 2., 1, 0.1);
        assert!(!selector.di_muon_veto(&event));
    }

    #[test]
    fn production_accepts_a_subset_of_synchronization() {
        // Golden pair but with a tau failing tight isolation
        let mut event = mu_tau_event(
            muon(25., 1.0, 0., 1, 0.05),
            tau(35., 1.5, GOLDEN_DPHI, -1, 0b111),
        );

        let sync = PairSelector::new(SelectionMode::Synchronization);
        let production = PairSelector::new(SelectionMode::Production);
        assert!(sync.select(&mut event, 0).accepted());
        assert!(!production.select(&mut event, 0).accepted());
        assert!(!event.check_selection_bit(SelectionBit::PostSynchTau));

        // With full identification both modes agree
        let mut event = golden_event();
        assert!(production.select(&mut event, 0).accepted());
        assert!(sync.select(&mut event, 0).accepted());
    }

    #[test]
    fn extra_lepton_vetoes_flow_through_the_hook() {
        let veto_electrons =
            |_: &Event, _: usize, _: usize, pdg_id: i32| -> bool { pdg_id == 11 };
        let sync = PairSelector::new(SelectionMode::Synchronization)
            .with_third_lepton_veto(veto_electrons);
        let production = PairSelector::new(SelectionMode::Production)
            .with_third_lepton_veto(veto_electrons);

        let mut event = golden_event();
        assert!(sync.select(&mut event, 0).accepted());
        assert!(event.check_selection_bit(SelectionBit::ExtraElectronVeto));
        assert!(!event.check_selection_bit(SelectionBit::ExtraMuonVeto));

        assert!(!production.select(&mut event, 0).accepted());
    }
}
