//! Single-lepton records and energy-scale variations
//!
//! A `Lepton` bundles the as-reconstructed four-momenta and vertex geometry
//! with the parsed property record. Kinematic accessors take the
//! energy-scale [`Variation`] as an explicit parameter and leave the stored
//! record untouched, so the same lepton can be read under every systematic
//! hypothesis concurrently.

use crate::{
    error::RecordResult,
    momentum::{self, LorentzVector, ThreeVector},
    numeric::Float,
    properties::{LeptonProperties, PropertyVector, Trigger},
};
use num_traits::Zero;

/// Relative systematic shift of the hadronic tau energy scale
pub const TAU_ENERGY_SCALE: Float = 0.012;
/// Relative systematic shift of the electron energy scale
pub const ELECTRON_ENERGY_SCALE: Float = 0.03;
/// Relative systematic shift of the muon energy scale
pub const MUON_ENERGY_SCALE: Float = 0.03;

/// Nominal tau energy correction, one-prong decay modes
pub const TAU_CORRECTION_ONE_PRONG: Float = -0.018;
/// Nominal tau energy correction, one-prong plus neutral pions
pub const TAU_CORRECTION_ONE_PRONG_PI_ZERO: Float = 0.010;
/// Nominal tau energy correction, three-prong decay modes
pub const TAU_CORRECTION_THREE_PRONG: Float = 0.004;

/// Energy-scale variation under which kinematics are read
///
/// A variation only moves leptons of the matching flavour; for every other
/// flavour it reads back the nominal kinematics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Variation {
    /// Reconstructed kinematics with nominal corrections only
    #[default]
    Nominal,
    /// Tau energy scale shifted one systematic up
    TauScaleUp,
    /// Tau energy scale shifted one systematic down
    TauScaleDown,
    /// Electron energy scale shifted one systematic up
    ElectronScaleUp,
    /// Electron energy scale shifted one systematic down
    ElectronScaleDown,
    /// Muon energy scale shifted one systematic up
    MuonScaleUp,
    /// Muon energy scale shifted one systematic down
    MuonScaleDown,
}
//
impl Variation {
    /// All variations, nominal first
    pub const ALL: [Variation; 7] = [
        Variation::Nominal,
        Variation::TauScaleUp,
        Variation::TauScaleDown,
        Variation::ElectronScaleUp,
        Variation::ElectronScaleDown,
        Variation::MuonScaleUp,
        Variation::MuonScaleDown,
    ];
}

/// Single reconstructed lepton
#[derive(Debug, Clone, PartialEq)]
pub struct Lepton {
    /// As-reconstructed four-momentum, before any scale correction
    p4: LorentzVector,
    /// Four-momentum of the charged decay products
    charged_p4: LorentzVector,
    /// Four-momentum of the neutral decay products
    neutral_p4: LorentzVector,
    /// Point of closest approach to the AOD primary vertex
    pca: ThreeVector,
    /// Point of closest approach to the refitted primary vertex
    pca_refit: ThreeVector,
    /// Point of closest approach to the generator primary vertex
    pca_gen: ThreeVector,
    /// Parsed properties
    props: LeptonProperties,
}
//
impl Lepton {
    // === CONSTRUCTION ===

    /// Build a lepton from already-parsed properties
    ///
    /// Decay-product components and vertex geometry start out zeroed; fill
    /// them with the `with_` methods where a record carries them.
    pub fn new(p4: LorentzVector, props: LeptonProperties) -> Self {
        Self {
            p4,
            charged_p4: LorentzVector::zero(),
            neutral_p4: LorentzVector::zero(),
            pca: ThreeVector::zero(),
            pca_refit: ThreeVector::zero(),
            pca_gen: ThreeVector::zero(),
            props,
        }
    }

    /// Parse a lepton from a four-momentum and raw property columns
    ///
    /// This is the ingestion path: the property vector is validated here,
    /// and a malformed record never enters the event store.
    pub fn from_columns(p4: LorentzVector, raw: &PropertyVector) -> RecordResult<Self> {
        Ok(Self::new(p4, LeptonProperties::parse(raw)?))
    }

    /// Attach charged and neutral decay-product four-momenta
    pub fn with_components(mut self, charged_p4: LorentzVector, neutral_p4: LorentzVector) -> Self {
        self.charged_p4 = charged_p4;
        self.neutral_p4 = neutral_p4;
        self
    }

    /// Attach the points of closest approach to the three primary vertices
    pub fn with_vertex_geometry(
        mut self,
        pca: ThreeVector,
        pca_refit: ThreeVector,
        pca_gen: ThreeVector,
    ) -> Self {
        self.pca = pca;
        self.pca_refit = pca_refit;
        self.pca_gen = pca_gen;
        self
    }

    // === FLAVOUR ===

    /// Signed PDG particle code
    pub fn pdg_id(&self) -> i32 {
        self.props.pdg_id
    }

    /// Whether this is a muon of either charge
    pub fn is_muon(&self) -> bool {
        self.props.pdg_id.abs() == 13
    }

    /// Whether this is a hadronic tau of either charge
    pub fn is_tau(&self) -> bool {
        self.props.pdg_id.abs() == 15
    }

    /// Whether this is an electron of either charge
    pub fn is_electron(&self) -> bool {
        self.props.pdg_id.abs() == 11
    }

    // === KINEMATICS ===

    /// Four-momentum under the given energy-scale variation
    ///
    /// Rescaling moves the transverse momentum and leaves the invariant
    /// mass untouched, except for one-prong taus whose single-hadron
    /// four-momentum is scaled as a whole.
    pub fn p4(&self, variation: Variation) -> LorentzVector {
        let scale = self.energy_scale(variation);
        if scale == 1. {
            self.p4
        } else {
            let one_prong = self.is_tau() && self.props.decay_mode == 0;
            momentum::with_scaled_pt(&self.p4, scale, !one_prong)
        }
    }

    /// Relative scale applied to this lepton under `variation`
    ///
    /// Chains the nominal decay-mode-dependent tau correction with the
    /// systematic shift of the matching flavour.
    pub fn energy_scale(&self, variation: Variation) -> Float {
        let nominal = if self.is_tau() {
            match self.props.decay_mode {
                0 => 1. + TAU_CORRECTION_ONE_PRONG,
                1 | 2 => 1. + TAU_CORRECTION_ONE_PRONG_PI_ZERO,
                10 => 1. + TAU_CORRECTION_THREE_PRONG,
                _ => 1.,
            }
        } else {
            1.
        };
        let systematic = match variation {
            Variation::TauScaleUp if self.is_tau() => 1. + TAU_ENERGY_SCALE,
            Variation::TauScaleDown if self.is_tau() => 1. - TAU_ENERGY_SCALE,
            Variation::ElectronScaleUp if self.is_electron() => 1. + ELECTRON_ENERGY_SCALE,
            Variation::ElectronScaleDown if self.is_electron() => 1. - ELECTRON_ENERGY_SCALE,
            Variation::MuonScaleUp if self.is_muon() => 1. + MUON_ENERGY_SCALE,
            Variation::MuonScaleDown if self.is_muon() => 1. - MUON_ENERGY_SCALE,
            _ => 1.,
        };
        nominal * systematic
    }

    /// Four-momentum of the charged decay products
    pub fn charged_p4(&self) -> &LorentzVector {
        &self.charged_p4
    }

    /// Four-momentum of the neutral decay products
    pub fn neutral_p4(&self) -> &LorentzVector {
        &self.neutral_p4
    }

    /// Point of closest approach to the AOD primary vertex
    pub fn pca(&self) -> &ThreeVector {
        &self.pca
    }

    /// Point of closest approach to the refitted primary vertex
    pub fn pca_refit(&self) -> &ThreeVector {
        &self.pca_refit
    }

    /// Point of closest approach to the generator primary vertex
    pub fn pca_gen(&self) -> &ThreeVector {
        &self.pca_gen
    }

    // === PROPERTIES ===

    /// Parsed properties
    pub fn props(&self) -> &LeptonProperties {
        &self.props
    }

    /// Whether this lepton matched a trigger object of the given path
    ///
    /// Requires both the trigger-object type bit and the filter-fired bit
    /// of the path.
    pub fn has_trigger_match(&self, trigger: Trigger) -> bool {
        self.props.trigger_type_bits & trigger.bit() != 0
            && self.props.filter_fired_bits & trigger.bit() != 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::momentum::from_pt_eta_phi_mass;
    use approx::assert_relative_eq;

    fn props(pdg_id: i32, decay_mode: i32) -> LeptonProperties {
        LeptonProperties {
            pdg_id,
            charge: if pdg_id < 0 { 1 } else { -1 },
            dxy: 0.01,
            dz: 0.05,
            rel_iso: 0.1,
            decay_mode_finding: 1.,
            decay_mode,
            anti_mu: 0b11,
            anti_ele: 0b1,
            mva_iso: 0b1111,
            medium_id: true,
            trigger_type_bits: 0,
            filter_fired_bits: 0,
        }
    }

    #[test]
    fn variations_only_move_the_matching_flavour() {
        let muon = Lepton::new(from_pt_eta_phi_mass(25., 1., 0.3, 0.105), props(13, 0));
        assert_eq!(muon.p4(Variation::TauScaleUp), muon.p4(Variation::Nominal));
        assert_eq!(muon.p4(Variation::ElectronScaleDown), muon.p4(Variation::Nominal));
        assert_relative_eq!(
            momentum::pt(&muon.p4(Variation::MuonScaleUp)),
            25. * (1. + MUON_ENERGY_SCALE),
            max_relative = 1e-12
        );
    }

    #[test]
    fn tau_scales_chain_the_decay_mode_correction() {
        let tau = Lepton::new(from_pt_eta_phi_mass(35., 1.5, -1., 0.8), props(-15, 10));
        assert_relative_eq!(
            momentum::pt(&tau.p4(Variation::Nominal)),
            35. * (1. + TAU_CORRECTION_THREE_PRONG),
            max_relative = 1e-12
        );
        assert_relative_eq!(
            momentum::pt(&tau.p4(Variation::TauScaleDown)),
            35. * (1. + TAU_CORRECTION_THREE_PRONG) * (1. - TAU_ENERGY_SCALE),
            max_relative = 1e-12
        );
    }

    #[test]
    fn rescaling_preserves_mass_except_one_prong() {
        let three_prong = Lepton::new(from_pt_eta_phi_mass(35., 1.5, -1., 0.8), props(15, 10));
        assert_relative_eq!(
            momentum::mass(&three_prong.p4(Variation::TauScaleUp)),
            0.8,
            max_relative = 1e-9
        );

        // A one-prong tau is a single hadron: the whole four-momentum
        // scales, mass included.
        let one_prong = Lepton::new(from_pt_eta_phi_mass(35., 1.5, -1., 0.14), props(15, 0));
        let scale = (1. + TAU_CORRECTION_ONE_PRONG) * (1. + TAU_ENERGY_SCALE);
        assert_relative_eq!(
            momentum::mass(&one_prong.p4(Variation::TauScaleUp)),
            0.14 * scale,
            max_relative = 1e-9
        );
    }

    #[test]
    fn trigger_match_needs_both_flag_sets() {
        let mut matched = props(13, 0);
        matched.trigger_type_bits = Trigger::IsoMu22.bit() | Trigger::IsoTkMu22.bit();
        matched.filter_fired_bits = Trigger::IsoMu22.bit();
        let muon = Lepton::new(from_pt_eta_phi_mass(25., 1., 0.3, 0.105), matched);
        assert!(muon.has_trigger_match(Trigger::IsoMu22));
        assert!(!muon.has_trigger_match(Trigger::IsoTkMu22));
        assert!(!muon.has_trigger_match(Trigger::IsoMu22Eta2p1));
    }
}
