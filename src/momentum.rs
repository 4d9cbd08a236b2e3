//! This module implements the domain-specific 4-momentum handling logic:
//! collider kinematic variables and energy-scale rescaling.
//!
//! Momenta are plain nalgebra vectors rather than wrapper types, so all
//! vector-space operations come for free; the collider-specific observables
//! are provided as free functions.

use crate::numeric::Float;
use nalgebra::SVector;
use prefix_num_ops::real::*;

/// 4-momentum dimension
pub const MOMENTUM_DIM: usize = 4;

/// Relativistic 4-momentum
pub type LorentzVector = SVector<Float, MOMENTUM_DIM>;

/// Transverse-plane momentum vector, used for missing transverse energy
pub type TransverseVector = SVector<Float, 2>;

/// Spatial 3-vector, used for vertex positions and points of closest approach
pub type ThreeVector = SVector<Float, 3>;

/// Convenience const for accessing the X coordinate of a 4-vector
pub const X: usize = 0;

/// Convenience const for accessing the Y coordinate of a 4-vector
pub const Y: usize = 1;

/// Convenience const for accessing the Z coordinate of a 4-vector
pub const Z: usize = 2;

/// Convenience const for accessing the E coordinate of a 4-vector
pub const E: usize = 3;

/// Build a 4-momentum from collider coordinates (pt, eta, phi, mass)
///
/// This is the parametrization in which reconstructed leptons are stored on
/// file, and the one in which cuts are expressed.
///
pub fn from_pt_eta_phi_mass(pt: Float, eta: Float, phi: Float, mass: Float) -> LorentzVector {
    let px = pt * cos(phi);
    let py = pt * sin(phi);
    let pz = pt * sinh(eta);
    let p = pt * cosh(eta);
    let energy = sqrt(mass.powi(2) + p.powi(2));
    LorentzVector::new(px, py, pz, energy)
}

/// Transverse momentum of a 4-momentum
pub fn pt(momentum: &LorentzVector) -> Float {
    hypot(momentum[X], momentum[Y])
}

/// Pseudorapidity of a 4-momentum
///
/// Goes to infinity along the beam axis; reconstructed leptons always carry
/// a nonzero transverse momentum, so no special case is needed.
///
pub fn eta(momentum: &LorentzVector) -> Float {
    asinh(momentum[Z] / pt(momentum))
}

/// Azimuthal angle of a 4-momentum, in (-pi, pi]
pub fn phi(momentum: &LorentzVector) -> Float {
    atan2(momentum[Y], momentum[X])
}

/// Invariant mass of a 4-momentum
///
/// Clamps small negative squared masses from floating-point cancellation.
///
pub fn mass(momentum: &LorentzVector) -> Float {
    let m2 = momentum[E].powi(2) - momentum.fixed_rows::<3>(X).norm_squared();
    sqrt(max(m2, 0.))
}

/// Transverse-plane projection of a 4-momentum
pub fn transverse(momentum: &LorentzVector) -> TransverseVector {
    TransverseVector::new(momentum[X], momentum[Y])
}

/// Azimuthal angle of a transverse vector, in (-pi, pi]
pub fn azimuth(vector: &TransverseVector) -> Float {
    atan2(vector[Y], vector[X])
}

/// Signed azimuthal angle difference, wrapped into (-pi, pi]
pub fn wrap_delta_phi(dphi: Float) -> Float {
    let pi = crate::numeric::floats::consts::PI;
    let mut wrapped = dphi % (2. * pi);
    if wrapped > pi {
        wrapped -= 2. * pi;
    } else if wrapped <= -pi {
        wrapped += 2. * pi;
    }
    wrapped
}

/// Angular separation of two momenta in pseudorapidity-azimuth space
pub fn delta_r(momentum1: &LorentzVector, momentum2: &LorentzVector) -> Float {
    let deta = eta(momentum1) - eta(momentum2);
    let dphi = wrap_delta_phi(phi(momentum1) - phi(momentum2));
    hypot(deta, dphi)
}

/// Transverse mass of a lepton and a missing-transverse-energy vector
pub fn transverse_mass(lepton: &LorentzVector, met: &TransverseVector) -> Float {
    let dphi = wrap_delta_phi(phi(lepton) - azimuth(met));
    sqrt(2. * pt(lepton) * met.norm() * (1. - cos(dphi)))
}

/// Rescale the transverse part of a 4-momentum
///
/// This models lepton energy-scale shifts: only the transverse momentum is
/// rescaled, and the invariant mass is either held constant (the common case
/// for multi-prong objects) or rescaled along with the momentum.
///
pub fn with_scaled_pt(
    momentum: &LorentzVector,
    scale: Float,
    preserve_mass: bool,
) -> LorentzVector {
    if preserve_mass {
        from_pt_eta_phi_mass(pt(momentum) * scale, eta(momentum), phi(momentum), mass(momentum))
    } else {
        momentum * scale
    }
}
