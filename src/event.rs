//! Event record store
//!
//! An `Event` carries everything the selection reads for one collision:
//! bookkeeping identifiers, generator weights, pile-up observables, primary
//! vertices, missing transverse energy, quality-filter flags, the lepton
//! and pair collections, and the selection word written by the pair
//! selector. All of it is plain data; the only selector-mutated field is
//! the selection word, which is replaced wholesale on every selection call.

use crate::{
    lepton::Lepton,
    momentum::{ThreeVector, TransverseVector},
    numeric::{Float, ABSENT},
    pair::LeptonPair,
    selword::{SelectionBit, SelectionWord},
};
use num_traits::Zero;

/// Origin of an event sample
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SampleType {
    /// Not yet assigned
    #[default]
    Dummy,
    /// Recorded collision data
    Data,
    /// Z/gamma* + jets simulation
    DrellYan,
    /// Low-mass Z/gamma* + jets simulation
    DrellYanLowMass,
    /// W + jets simulation
    WJets,
    /// Top pair simulation
    TTbar,
    /// SM-like light scalar signal simulation
    LightScalar,
    /// Heavy scalar signal simulation
    HeavyScalar,
    /// Pseudoscalar signal simulation
    Pseudoscalar,
}

/// Event quality filters with stored per-event flags
///
/// The discriminant is the flag's position in the filter vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Filter {
    /// HBHE calorimeter noise
    HbheNoise = 0,
    /// HBHE calorimeter isolated noise
    HbheNoiseIso = 1,
    /// ECAL dead cell trigger primitive
    EcalDeadCell = 2,
    /// Good reconstructed vertices
    GoodVertices = 3,
    /// EE supercrystal noise
    EeBadSc = 4,
    /// Beam halo
    GlobalTightHalo = 5,
    /// Misreconstructed PF muons
    BadPfMuon = 6,
    /// Misreconstructed charged candidates
    BadChargedCandidate = 7,
}
//
impl Filter {
    /// All filters, in storage order
    pub const ALL: [Filter; 8] = [
        Filter::HbheNoise,
        Filter::HbheNoiseIso,
        Filter::EcalDeadCell,
        Filter::GoodVertices,
        Filter::EeBadSc,
        Filter::GlobalTightHalo,
        Filter::BadPfMuon,
        Filter::BadChargedCandidate,
    ];
}

/// Full per-collision record
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Run identifier
    pub run: u32,
    /// Event identifier within the run
    pub event: u64,
    /// Luminosity section identifier
    pub lumi_section: u64,
    /// Expected pile-up interaction count
    pub n_pu: Float,
    /// Reconstructed primary vertex count
    pub n_pv: u32,
    /// Average transverse energy density
    pub rho: Float,
    /// Generator weight
    pub mc_weight: Float,
    /// Boson transverse-momentum reweight
    pub pt_reweight: Float,
    /// Sample this event belongs to
    pub sample_type: SampleType,
    /// Generator-level primary vertex
    pub gen_pv: ThreeVector,
    /// AOD-reconstructed primary vertex
    pub aod_pv: ThreeVector,
    /// Refitted primary vertex
    pub refitted_pv: ThreeVector,
    /// Whether the refitted vertex converged
    pub is_refit: bool,
    /// Number of tracks used in the vertex refit
    pub n_tracks_in_refit: u32,
    /// Missing transverse energy, recoil corrected
    pub met: TransverseVector,
    /// Missing transverse energy before recoil corrections
    pub met_uncorrected: TransverseVector,
    /// Packed decision word of the MET quality filters
    pub met_filter_decision: u32,
    /// Per-filter flags, indexed by [`Filter`]
    filters: Vec<i32>,
    /// Reconstructed leptons
    pub leptons: Vec<Lepton>,
    /// Higgs candidate pairs built from the lepton collection
    pub pairs: Vec<LeptonPair>,
    /// Selection decisions of the most recent selector call
    selection_word: SelectionWord,
}
//
impl Event {
    /// Fresh record with empty collections and zeroed observables
    pub fn new() -> Self {
        Self {
            run: 0,
            event: 0,
            lumi_section: 0,
            n_pu: 0.,
            n_pv: 0,
            rho: 0.,
            mc_weight: 1.,
            pt_reweight: 1.,
            sample_type: SampleType::Dummy,
            gen_pv: ThreeVector::zero(),
            aod_pv: ThreeVector::zero(),
            refitted_pv: ThreeVector::zero(),
            is_refit: false,
            n_tracks_in_refit: 0,
            met: TransverseVector::zero(),
            met_uncorrected: TransverseVector::zero(),
            met_filter_decision: 0,
            filters: Vec::new(),
            leptons: Vec::new(),
            pairs: Vec::new(),
            selection_word: SelectionWord::empty(),
        }
    }

    /// Store the quality-filter flags
    pub fn set_filters(&mut self, filters: Vec<i32>) {
        self.filters = filters;
    }

    /// Flag of one quality filter, or -999 when the record predates it
    pub fn filter(&self, filter: Filter) -> i32 {
        self.filters
            .get(filter as usize)
            .copied()
            .unwrap_or(ABSENT as i32)
    }

    // === SELECTION WORD ===

    /// Replace the stored selection word wholesale
    ///
    /// Repeated calls overwrite: the event remembers the decisions of the
    /// last evaluated pair only.
    pub fn store_selection_word(&mut self, word: SelectionWord) {
        self.selection_word = word;
    }

    /// Reset every selection decision
    pub fn clear_selection_word(&mut self) {
        self.selection_word = SelectionWord::empty();
    }

    /// Read one stored selection decision
    pub fn check_selection_bit(&self, bit: SelectionBit) -> bool {
        self.selection_word.check(bit)
    }

    /// Stored selection word
    pub fn selection_word(&self) -> SelectionWord {
        self.selection_word
    }
}

impl Default for Event {
    fn default() -> Self {
        Self::new()
    }
}
