//! Lepton pair records
//!
//! A `LeptonPair` is a Higgs candidate: two lepton slots copied out of the
//! event's lepton collection, the integer positions they came from, and the
//! pair-level missing transverse energy with its covariance. As for single
//! leptons, every kinematic accessor is a pure function of the energy-scale
//! [`Variation`].

use crate::{
    lepton::{Lepton, Variation},
    momentum::{self, LorentzVector, TransverseVector},
    numeric::Float,
};
use nalgebra::SMatrix;
use num_traits::Zero;

/// Covariance matrix of the missing transverse energy
pub type MetCovariance = SMatrix<Float, 2, 2>;

/// Pair of leptons forming a Higgs candidate
///
/// Nothing in this type enforces the (muon, tau) flavour expectation of the
/// analysis channel; the pair selector detects and rejects mismatched legs.
#[derive(Debug, Clone, PartialEq)]
pub struct LeptonPair {
    /// First leg, in upstream pairing order
    leg1: Lepton,
    /// Second leg, in upstream pairing order
    leg2: Lepton,
    /// Position of the first leg in the event's lepton collection
    index_leg1: usize,
    /// Position of the second leg in the event's lepton collection
    index_leg2: usize,
    /// Pair-level missing transverse energy, recoil corrected
    met: TransverseVector,
    /// Covariance of the missing transverse energy
    met_covariance: MetCovariance,
}
//
impl LeptonPair {
    /// Build a pair from its legs and their collection positions
    pub fn new(
        leg1: Lepton,
        index_leg1: usize,
        leg2: Lepton,
        index_leg2: usize,
        met: TransverseVector,
    ) -> Self {
        Self {
            leg1,
            leg2,
            index_leg1,
            index_leg2,
            met,
            met_covariance: MetCovariance::zero(),
        }
    }

    /// Attach the missing-energy covariance matrix
    pub fn with_met_covariance(mut self, met_covariance: MetCovariance) -> Self {
        self.met_covariance = met_covariance;
        self
    }

    // === LEG ACCESS ===

    /// First leg
    pub fn leg1(&self) -> &Lepton {
        &self.leg1
    }

    /// Second leg
    pub fn leg2(&self) -> &Lepton {
        &self.leg2
    }

    /// Collection position of the first leg
    pub fn index_leg1(&self) -> usize {
        self.index_leg1
    }

    /// Collection position of the second leg
    pub fn index_leg2(&self) -> usize {
        self.index_leg2
    }

    /// Muon-flavoured leg with its collection position, if any
    ///
    /// Picks the first leg when both are muons, matching the upstream
    /// pairing convention.
    pub fn muon(&self) -> Option<(usize, &Lepton)> {
        if self.leg1.is_muon() {
            Some((self.index_leg1, &self.leg1))
        } else if self.leg2.is_muon() {
            Some((self.index_leg2, &self.leg2))
        } else {
            None
        }
    }

    /// Tau-flavoured leg with its collection position, if any
    pub fn tau(&self) -> Option<(usize, &Lepton)> {
        if self.leg1.is_tau() {
            Some((self.index_leg1, &self.leg1))
        } else if self.leg2.is_tau() {
            Some((self.index_leg2, &self.leg2))
        } else {
            None
        }
    }

    // === KINEMATICS ===

    /// Combined four-momentum of the two legs under `variation`
    pub fn p4(&self, variation: Variation) -> LorentzVector {
        self.leg1.p4(variation) + self.leg2.p4(variation)
    }

    /// Missing transverse energy under `variation`
    ///
    /// The stored MET is corrected by the opposite of each leg's momentum
    /// shift, so the transverse balance of the event is maintained. The
    /// recoil correction baked into the stored value is not recomputed.
    pub fn met(&self, variation: Variation) -> TransverseVector {
        let mut met = self.met;
        for leg in [&self.leg1, &self.leg2] {
            met += momentum::transverse(&leg.p4(Variation::Nominal))
                - momentum::transverse(&leg.p4(variation));
        }
        met
    }

    /// Missing-energy covariance matrix
    pub fn met_covariance(&self) -> &MetCovariance {
        &self.met_covariance
    }

    /// Transverse mass of the first leg and the MET under `variation`
    pub fn mt_leg1(&self, variation: Variation) -> Float {
        momentum::transverse_mass(&self.leg1.p4(variation), &self.met(variation))
    }

    /// Transverse mass of the second leg and the MET under `variation`
    pub fn mt_leg2(&self, variation: Variation) -> Float {
        momentum::transverse_mass(&self.leg2.p4(variation), &self.met(variation))
    }

    /// Transverse mass of the muon-flavoured leg, if any
    pub fn mt_muon(&self, variation: Variation) -> Option<Float> {
        let (_, muon) = self.muon()?;
        Some(momentum::transverse_mass(
            &muon.p4(variation),
            &self.met(variation),
        ))
    }
}
