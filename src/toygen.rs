//! Toy event generation
//!
//! Generates synthetic collision records with roughly realistic kinematics
//! for the demonstration binary and the end-to-end tests. The mixture is
//! tuned so that every selection path gets traffic: accepted candidates,
//! every individual cut failure, mismatched leg flavours, second muons
//! firing the di-muon veto, and events with no candidate at all.
//!
//! Leptons are assembled as raw property columns and run through the same
//! validating parse as real records, so the ingestion path is exercised on
//! every generated event.

use crate::{
    error::RecordResult,
    event::{Event, Filter, SampleType},
    lepton::{Lepton, Variation},
    momentum::{self, from_pt_eta_phi_mass, LorentzVector, ThreeVector, TransverseVector},
    numeric::{floats::consts::PI, Float},
    pair::{LeptonPair, MetCovariance},
    properties::{PropertyIndex, PropertyVector, Trigger},
    random::RandomGenerator,
};
use prefix_num_ops::real::*;

/// Run number stamped on every toy event, from the 2016 data-taking period
const TOY_RUN: u32 = 278808;

/// Muon rest mass (GeV)
const MUON_MASS: Float = 0.105_658;

/// Electron rest mass (GeV)
const ELECTRON_MASS: Float = 0.000_511;

/// Generator of toy mu + tau_h collision records
pub struct ToyEventGenerator {
    /// Fraction of candidates whose second leg is an electron
    wrong_flavour_fraction: Float,

    /// Fraction of events receiving a second, opposite-charge muon
    extra_muon_fraction: Float,

    /// Fraction of events carrying no candidate pair at all
    empty_pair_fraction: Float,
}
//
impl ToyEventGenerator {
    // ### CONSTRUCTION ###

    /// Generator with the default population mixture
    pub fn new() -> Self {
        ToyEventGenerator {
            wrong_flavour_fraction: 0.05,
            extra_muon_fraction: 0.10,
            empty_pair_fraction: 0.05,
        }
    }

    // ### EVENT GENERATION ###

    /// Generate one toy event record
    ///
    /// `id` becomes the event identifier, so a record can be regenerated
    /// from its batch stream regardless of processing order.
    pub fn generate(&self, id: u64, rng: &mut RandomGenerator) -> RecordResult<Event> {
        let mut event = Event::new();
        event.run = TOY_RUN;
        event.event = id;
        event.lumi_section = id / 1000 + 1;
        event.sample_type = SampleType::DrellYan;

        // Generator weight and pile-up conditions
        event.mc_weight = if rng.random() < 0.1 { -1. } else { 1. };
        event.pt_reweight = rng.random_range(0.9, 1.1);
        event.n_pu = rng.random_range(0., 60.);
        event.n_pv = rng.random_range(1., 50.) as u32;
        event.rho = rng.random_range(5., 40.);

        // Primary vertices: a generator-level point on the beam line and
        // two reconstructed estimates smeared around it
        let gen_pv = ThreeVector::new(
            rng.random_range(-0.01, 0.01),
            rng.random_range(-0.01, 0.01),
            rng.random_range(-10., 10.),
        );
        let smear = |rng: &mut RandomGenerator, pv: &ThreeVector, scale: Float| {
            ThreeVector::new(
                pv[0] + rng.random_range(-scale, scale),
                pv[1] + rng.random_range(-scale, scale),
                pv[2] + rng.random_range(-10. * scale, 10. * scale),
            )
        };
        event.gen_pv = gen_pv;
        event.aod_pv = smear(rng, &gen_pv, 0.002);
        event.refitted_pv = smear(rng, &gen_pv, 0.001);
        event.is_refit = rng.random() < 0.95;
        event.n_tracks_in_refit = rng.random_range(2., 80.) as u32;

        // Quality filters, rarely failing
        let filters: Vec<i32> = Filter::ALL
            .iter()
            .map(|_| (rng.random() < 0.98) as i32)
            .collect();
        event.met_filter_decision = filters
            .iter()
            .enumerate()
            .map(|(bit, &flag)| (flag as u32) << bit)
            .sum();
        event.set_filters(filters);

        // First leg is always a muon
        let muon_charge = if rng.random() < 0.5 { 1 } else { -1 };
        let (muon_p4, muon_columns) = self.muon_record(rng, muon_charge, false);
        let pca = pca_from_columns(&muon_columns, &muon_p4);
        let muon = Lepton::from_columns(muon_p4, &muon_columns)?
            .with_components(muon_p4, LorentzVector::zeros())
            .with_vertex_geometry(pca, pca * 0.9, pca * 1.1);
        event.leptons.push(muon);

        // Second leg: a hadronic tau, or an electron for the mismatched
        // share of the population
        let second_charge = -muon_charge;
        let second = if rng.random() < self.wrong_flavour_fraction {
            let (p4, columns) = self.electron_record(rng, second_charge);
            let pca = pca_from_columns(&columns, &p4);
            Lepton::from_columns(p4, &columns)?
                .with_components(p4, LorentzVector::zeros())
                .with_vertex_geometry(pca, pca * 0.9, pca * 1.1)
        } else {
            let (p4, columns, charged_p4) = self.tau_record(rng, second_charge);
            let pca = pca_from_columns(&columns, &p4);
            Lepton::from_columns(p4, &columns)?
                .with_components(charged_p4, p4 - charged_p4)
                .with_vertex_geometry(pca, pca * 0.9, pca * 1.1)
        };
        event.leptons.push(second);

        // Optional second muon, the di-muon veto's prey
        if rng.random() < self.extra_muon_fraction {
            let (p4, columns) = self.muon_record(rng, -muon_charge, true);
            let pca = pca_from_columns(&columns, &p4);
            let extra = Lepton::from_columns(p4, &columns)?
                .with_components(p4, LorentzVector::zeros())
                .with_vertex_geometry(pca, pca * 0.9, pca * 1.1);
            event.leptons.push(extra);
        }

        // Missing energy: partial balance against the two leading leptons
        // plus an isotropic fluctuation
        let balance = -(momentum::transverse(&event.leptons[0].p4(Variation::Nominal))
            + momentum::transverse(&event.leptons[1].p4(Variation::Nominal)))
            * rng.random_range(0., 0.6);
        event.met = balance
            + TransverseVector::new(rng.random_range(-10., 10.), rng.random_range(-10., 10.));
        event.met_uncorrected = event.met
            + TransverseVector::new(rng.random_range(-5., 5.), rng.random_range(-5., 5.));

        // Candidate pair, with the upstream leg order randomized
        if rng.random() >= self.empty_pair_fraction {
            let leg_order = rng.random() < 0.5;
            let (first, second) = if leg_order { (0, 1) } else { (1, 0) };
            let pair = LeptonPair::new(
                event.leptons[first].clone(),
                first,
                event.leptons[second].clone(),
                second,
                event.met,
            )
            .with_met_covariance(MetCovariance::new(
                225.,
                rng.random_range(0., 50.),
                rng.random_range(0., 50.),
                225.,
            ));
            event.pairs.push(pair);
        }

        Ok(event)
    }

    // ### SINGLE-LEPTON RECORDS ###

    /// Raw columns of a toy muon
    ///
    /// Veto candidates get a harder spectrum so that most of them land
    /// above the di-muon veto threshold.
    fn muon_record(
        &self,
        rng: &mut RandomGenerator,
        charge: i32,
        veto_candidate: bool,
    ) -> (LorentzVector, PropertyVector) {
        let pt = if veto_candidate {
            rng.random_range(16., 40.)
        } else {
            rng.random_range(10., 50.)
        };
        let eta = rng.random_range(-2.5, 2.5);
        let phi = rng.random_range(-PI, PI);
        let p4 = from_pt_eta_phi_mass(pt, eta, phi, MUON_MASS);

        let mut columns = vec![0.; PropertyIndex::COUNT];
        columns[PropertyIndex::PdgId as usize] = (-13 * charge) as Float;
        columns[PropertyIndex::Charge as usize] = charge as Float;
        columns[PropertyIndex::Dxy as usize] = rng.random_range(0., 0.06);
        columns[PropertyIndex::Dz as usize] = rng.random_range(0., 0.3);
        columns[PropertyIndex::RelIso04 as usize] = rng.random_range(0., 0.45);
        columns[PropertyIndex::MediumId as usize] = (rng.random() < 0.95) as i32 as Float;
        let mut trigger_bits = 0u32;
        if rng.random() < 0.9 {
            trigger_bits |= Trigger::IsoMu22.bit() | Trigger::IsoTkMu22.bit();
            if abs(eta) < 2.1 {
                trigger_bits |= Trigger::IsoMu22Eta2p1.bit() | Trigger::IsoTkMu22Eta2p1.bit();
            }
        }
        columns[PropertyIndex::TriggerType as usize] = trigger_bits as Float;
        let fired_bits = if rng.random() < 0.95 { trigger_bits } else { 0 };
        columns[PropertyIndex::FilterFired as usize] = fired_bits as Float;

        (p4, PropertyVector::new(columns))
    }

    /// Raw columns of a toy hadronic tau, plus its charged component
    fn tau_record(
        &self,
        rng: &mut RandomGenerator,
        charge: i32,
    ) -> (LorentzVector, PropertyVector, LorentzVector) {
        let pt = rng.random_range(20., 60.);
        let eta = rng.random_range(-2.5, 2.5);
        let phi = rng.random_range(-PI, PI);
        let (decay_mode, mass, charged_fraction) = match (rng.random() * 3.) as u32 {
            0 => (0, 0.140, 1.),
            1 => (1, rng.random_range(0.5, 1.1), rng.random_range(0.4, 0.8)),
            _ => (10, rng.random_range(0.8, 1.5), 1.),
        };
        let p4 = from_pt_eta_phi_mass(pt, eta, phi, mass);
        let charged_p4 = p4 * charged_fraction;

        // Misreconstruction occasionally yields a net charge of zero; the
        // baseline tau cut is there to reject exactly those
        let reco_charge = if rng.random() < 0.05 { 0 } else { charge };

        let mut columns = vec![0.; PropertyIndex::COUNT];
        columns[PropertyIndex::PdgId as usize] = (-15 * charge) as Float;
        columns[PropertyIndex::Charge as usize] = reco_charge as Float;
        columns[PropertyIndex::Dxy as usize] = rng.random_range(0., 0.1);
        columns[PropertyIndex::Dz as usize] = rng.random_range(0., 0.3);
        columns[PropertyIndex::DecayModeFinding as usize] = (rng.random() < 0.9) as i32 as Float;
        columns[PropertyIndex::DecayMode as usize] = decay_mode as Float;
        columns[PropertyIndex::AntiMu as usize] = working_points(rng, 2);
        columns[PropertyIndex::AntiEle as usize] = working_points(rng, 5);
        columns[PropertyIndex::MvaIso as usize] = working_points(rng, 6);
        let cross_trigger = if rng.random() < 0.5 {
            Trigger::IsoMu19Eta2p1LooseIsoPfTau20.bit()
                | Trigger::IsoMu19Eta2p1LooseIsoPfTau20SingleL1.bit()
        } else {
            0
        };
        columns[PropertyIndex::TriggerType as usize] = cross_trigger as Float;
        columns[PropertyIndex::FilterFired as usize] = cross_trigger as Float;

        (p4, PropertyVector::new(columns), charged_p4)
    }

    /// Raw columns of a toy electron
    fn electron_record(
        &self,
        rng: &mut RandomGenerator,
        charge: i32,
    ) -> (LorentzVector, PropertyVector) {
        let pt = rng.random_range(15., 50.);
        let eta = rng.random_range(-2.5, 2.5);
        let phi = rng.random_range(-PI, PI);
        let p4 = from_pt_eta_phi_mass(pt, eta, phi, ELECTRON_MASS);

        let mut columns = vec![0.; PropertyIndex::COUNT];
        columns[PropertyIndex::PdgId as usize] = (-11 * charge) as Float;
        columns[PropertyIndex::Charge as usize] = charge as Float;
        columns[PropertyIndex::Dxy as usize] = rng.random_range(0., 0.06);
        columns[PropertyIndex::Dz as usize] = rng.random_range(0., 0.3);
        columns[PropertyIndex::RelIso04 as usize] = rng.random_range(0., 0.45);

        (p4, PropertyVector::new(columns))
    }
}

impl Default for ToyEventGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Unary working-point mask with a uniformly drawn number of passed points
fn working_points(rng: &mut RandomGenerator, max_points: u32) -> Float {
    let points = (rng.random() * (max_points + 1) as Float) as u32;
    ((1u32 << points.min(max_points)) - 1) as Float
}

/// Crude point of closest approach from the stored impact parameters
fn pca_from_columns(columns: &PropertyVector, p4: &LorentzVector) -> ThreeVector {
    let dxy = columns.get(PropertyIndex::Dxy);
    let dz = columns.get(PropertyIndex::Dz);
    let phi = momentum::phi(p4);
    ThreeVector::new(-dxy * sin(phi), dxy * cos(phi), dz)
}
