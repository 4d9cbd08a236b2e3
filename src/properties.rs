//! Lepton property storage
//!
//! Two representations live here. `PropertyVector` is the ingestion-side
//! mirror of the ntuple's flat property columns, accessed positionally and
//! degrading to a sentinel on out-of-range reads, exactly as the upstream
//! format behaves. `LeptonProperties` is the selection-side record: named,
//! typed fields produced by a validating parse, so that no sentinel value
//! can reach a cut.

use crate::{
    error::{RecordError, RecordResult},
    numeric::{Float, ABSENT},
};

/// Index of a lepton property in the flat ntuple layout
///
/// The variant order must stay in lock-step with the column order produced
/// by the upstream ntuple conversion; reordering either side silently
/// corrupts every positional read. That fragility is confined to
/// [`PropertyVector`], the only place where properties are read by position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyIndex {
    /// PDG particle code, signed
    PdgId = 0,
    /// Reconstructed electric charge
    Charge = 1,
    /// Transverse impact parameter w.r.t. the primary vertex (cm)
    Dxy = 2,
    /// Longitudinal impact parameter w.r.t. the primary vertex (cm)
    Dz = 3,
    /// Relative isolation in a 0.4 cone, all-particle flavour (muons)
    RelIso04 = 4,
    /// Decay-mode-finding discriminant (taus)
    DecayModeFinding = 5,
    /// Reconstructed hadronic decay mode (taus)
    DecayMode = 6,
    /// Anti-muon discriminant working-point mask (taus)
    AntiMu = 7,
    /// Anti-electron discriminant working-point mask (taus)
    AntiEle = 8,
    /// Isolation MVA working-point mask (taus)
    MvaIso = 9,
    /// Medium identification flag (muons)
    MediumId = 10,
    /// Trigger-object type bits, indexed by [`Trigger`]
    TriggerType = 11,
    /// Trigger filter-fired bits, indexed by [`Trigger`]
    FilterFired = 12,
}
//
impl PropertyIndex {
    /// Number of properties in the layout
    pub const COUNT: usize = 13;

    /// Property name as spelled in the upstream ntuple
    pub const fn column_name(self) -> &'static str {
        match self {
            PropertyIndex::PdgId => "pdgId",
            PropertyIndex::Charge => "charge",
            PropertyIndex::Dxy => "dxy",
            PropertyIndex::Dz => "dz",
            PropertyIndex::RelIso04 => "pfRelIso04_all",
            PropertyIndex::DecayModeFinding => "idDecayMode",
            PropertyIndex::DecayMode => "decayMode",
            PropertyIndex::AntiMu => "idAntiMu",
            PropertyIndex::AntiEle => "idAntiEle",
            PropertyIndex::MvaIso => "idMVAoldDM",
            PropertyIndex::MediumId => "mediumId",
            PropertyIndex::TriggerType => "isGoodTriggerType",
            PropertyIndex::FilterFired => "FilterFired",
        }
    }
}

/// HLT paths for which trigger-object matching bits are stored
///
/// The discriminant is the bit position inside the trigger-object type and
/// filter-fired property masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Single-muon path, isolated, pt > 22
    IsoMu22 = 0,
    /// Single-muon path restricted to |eta| < 2.1
    IsoMu22Eta2p1 = 1,
    /// Tracker-muon variant of the pt > 22 path
    IsoTkMu22 = 2,
    /// Tracker-muon variant restricted to |eta| < 2.1
    IsoTkMu22Eta2p1 = 3,
    /// Muon + tau cross trigger
    IsoMu19Eta2p1LooseIsoPfTau20 = 4,
    /// Muon + tau cross trigger, single-L1 seeded
    IsoMu19Eta2p1LooseIsoPfTau20SingleL1 = 5,
}
//
impl Trigger {
    /// Bit mask of this path inside the trigger property masks
    pub const fn bit(self) -> u32 {
        1 << self as u32
    }
}

/// Flat per-lepton property storage, in ntuple column order
///
/// Out-of-range access returns the [`ABSENT`] sentinel rather than an error,
/// mirroring the upstream reader: a record produced by an older analysis
/// version simply reads as "absent" for columns it predates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyVector(Vec<Float>);
//
impl PropertyVector {
    /// Wrap raw property columns
    pub fn new(values: Vec<Float>) -> Self {
        Self(values)
    }

    /// Value at `index`, or [`ABSENT`] when the vector is too short
    pub fn get(&self, index: PropertyIndex) -> Float {
        self.0.get(index as usize).copied().unwrap_or(ABSENT)
    }

    /// Number of stored columns
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether no columns are stored
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
//
impl From<Vec<Float>> for PropertyVector {
    fn from(values: Vec<Float>) -> Self {
        Self::new(values)
    }
}

/// Parsed lepton properties with named, typed fields
///
/// Produced by [`LeptonProperties::parse`], which validates the raw vector
/// once at ingestion time. Downstream selection code reads these fields
/// directly and never sees a sentinel.
#[derive(Debug, Clone, PartialEq)]
pub struct LeptonProperties {
    /// PDG particle code, signed
    pub pdg_id: i32,
    /// Reconstructed electric charge
    pub charge: i32,
    /// Transverse impact parameter (cm)
    pub dxy: Float,
    /// Longitudinal impact parameter (cm)
    pub dz: Float,
    /// Relative isolation in a 0.4 cone
    pub rel_iso: Float,
    /// Decay-mode-finding discriminant
    pub decay_mode_finding: Float,
    /// Reconstructed hadronic decay mode
    pub decay_mode: i32,
    /// Anti-muon working-point mask
    pub anti_mu: u8,
    /// Anti-electron working-point mask
    pub anti_ele: u8,
    /// Isolation MVA working-point mask
    pub mva_iso: u8,
    /// Medium muon identification flag
    pub medium_id: bool,
    /// Trigger-object type bits
    pub trigger_type_bits: u32,
    /// Trigger filter-fired bits
    pub filter_fired_bits: u32,
}
//
impl LeptonProperties {
    /// Parse and validate a raw property vector
    ///
    /// Checks the layout length, the finiteness of every continuous
    /// property, and the basic physicality of the discrete ones. This is
    /// where malformed records are caught; past this point the -999
    /// sentinel cannot occur.
    ///
    pub fn parse(raw: &PropertyVector) -> RecordResult<Self> {
        if raw.len() < PropertyIndex::COUNT {
            return Err(RecordError::TruncatedProperties {
                expected: PropertyIndex::COUNT,
                got: raw.len(),
            });
        }

        let finite = |index: PropertyIndex| -> RecordResult<Float> {
            let value = raw.get(index);
            if value.is_finite() {
                Ok(value)
            } else {
                Err(RecordError::NonFiniteProperty {
                    name: index.column_name(),
                })
            }
        };

        let pdg_id = finite(PropertyIndex::PdgId)? as i32;
        if ![11, 13, 15].contains(&pdg_id.abs()) {
            return Err(RecordError::NotALepton(pdg_id));
        }

        let charge = finite(PropertyIndex::Charge)? as i32;
        if !(-1..=1).contains(&charge) {
            return Err(RecordError::UnphysicalCharge(charge));
        }

        Ok(LeptonProperties {
            pdg_id,
            charge,
            dxy: finite(PropertyIndex::Dxy)?,
            dz: finite(PropertyIndex::Dz)?,
            rel_iso: finite(PropertyIndex::RelIso04)?,
            decay_mode_finding: finite(PropertyIndex::DecayModeFinding)?,
            decay_mode: finite(PropertyIndex::DecayMode)? as i32,
            anti_mu: finite(PropertyIndex::AntiMu)? as u8,
            anti_ele: finite(PropertyIndex::AntiEle)? as u8,
            mva_iso: finite(PropertyIndex::MvaIso)? as u8,
            medium_id: finite(PropertyIndex::MediumId)? > 0.5,
            trigger_type_bits: finite(PropertyIndex::TriggerType)? as u32,
            filter_fired_bits: finite(PropertyIndex::FilterFired)? as u32,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Raw columns of a well-formed muon record, in layout order
    fn muon_columns() -> Vec<Float> {
        vec![13., 1., 0.02, 0.1, 0.05, 0., 0., 0., 0., 0., 1., 3., 3.]
    }

    #[test]
    fn out_of_range_read_yields_the_sentinel() {
        let raw = PropertyVector::new(vec![13., -1., 0.01]);
        assert_eq!(raw.get(PropertyIndex::PdgId), 13.);
        assert_eq!(raw.get(PropertyIndex::Dz), ABSENT);
        assert_eq!(raw.get(PropertyIndex::FilterFired), ABSENT);
        assert_eq!(PropertyVector::default().get(PropertyIndex::PdgId), ABSENT);
    }

    #[test]
    fn layout_indices_stay_in_lock_step() {
        // Guards the documented enum/column fragility: the first and last
        // columns pin the layout, and COUNT pins its width.
        assert_eq!(PropertyIndex::PdgId as usize, 0);
        assert_eq!(PropertyIndex::FilterFired as usize, PropertyIndex::COUNT - 1);
        assert_eq!(PropertyIndex::MvaIso as usize, 9);
    }

    #[test]
    fn parse_accepts_a_well_formed_record() {
        let props = LeptonProperties::parse(&muon_columns().into()).unwrap();
        assert_eq!(props.pdg_id, 13);
        assert_eq!(props.charge, 1);
        assert_eq!(props.dxy, 0.02);
        assert!(props.medium_id);
        assert_eq!(props.trigger_type_bits, 3);
    }

    #[test]
    fn parse_rejects_truncated_vectors() {
        let raw = PropertyVector::new(vec![13., 1., 0.02]);
        assert_eq!(
            LeptonProperties::parse(&raw),
            Err(RecordError::TruncatedProperties { expected: 13, got: 3 })
        );
    }

    #[test]
    fn parse_rejects_non_finite_properties() {
        let mut columns = muon_columns();
        columns[PropertyIndex::Dz as usize] = Float::NAN;
        assert_eq!(
            LeptonProperties::parse(&columns.into()),
            Err(RecordError::NonFiniteProperty { name: "dz" })
        );
    }

    #[test]
    fn parse_rejects_non_leptons_and_odd_charges() {
        let mut columns = muon_columns();
        columns[PropertyIndex::PdgId as usize] = 211.;
        assert_eq!(
            LeptonProperties::parse(&columns.into()),
            Err(RecordError::NotALepton(211))
        );

        let mut columns = muon_columns();
        columns[PropertyIndex::Charge as usize] = 2.;
        assert_eq!(
            LeptonProperties::parse(&columns.into()),
            Err(RecordError::UnphysicalCharge(2))
        );
    }

    #[test]
    fn trigger_bits_match_their_positions() {
        assert_eq!(Trigger::IsoMu22.bit(), 1);
        assert_eq!(Trigger::IsoMu19Eta2p1LooseIsoPfTau20SingleL1.bit(), 1 << 5);
    }
}
