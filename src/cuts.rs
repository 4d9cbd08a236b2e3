//! Baseline selection thresholds

use crate::numeric::Float;

/// Thresholds of the baseline pair selection
///
/// The defaults are the analysis values. Synchronization exercises with
/// other groups override individual thresholds through the configuration
/// file rather than by editing code.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BaselineCuts {
    /// Cut on minimum muon transverse momentum (GeV)
    pub muon_min_pt: Float,

    /// Cut on maximum muon |pseudorapidity|, inclusive
    pub muon_max_abs_eta: Float,

    /// Cut on maximum |longitudinal impact parameter| of any lepton (cm)
    pub max_abs_dz: Float,

    /// Cut on maximum muon |transverse impact parameter| (cm)
    pub max_abs_dxy: Float,

    /// Tight muon relative-isolation working point
    pub muon_tight_iso: Float,

    /// Loose muon relative-isolation working point
    pub muon_loose_iso: Float,

    /// Cut on minimum tau transverse momentum (GeV)
    pub tau_min_pt: Float,

    /// Cut on maximum tau |pseudorapidity|, exclusive
    pub tau_max_abs_eta: Float,

    /// Cut on minimum tau decay-mode-finding score
    pub tau_min_decay_mode_finding: Float,

    /// Cut on minimum angular separation between the pair legs
    pub pair_min_delta_r: Float,

    /// Cut on minimum transverse momentum of di-muon veto candidates (GeV)
    pub veto_muon_min_pt: Float,

    /// Cut on maximum |pseudorapidity| of di-muon veto candidates
    pub veto_muon_max_abs_eta: Float,

    /// Cut on maximum relative isolation of di-muon veto candidates
    pub veto_muon_max_iso: Float,

    /// Cut on minimum separation between the two veto muons
    pub veto_min_delta_r: Float,
}
//
impl Default for BaselineCuts {
    /// Analysis thresholds of the 2016 dataset selection
    fn default() -> Self {
        BaselineCuts {
            muon_min_pt: 20.,
            muon_max_abs_eta: 2.1,
            max_abs_dz: 0.2,
            max_abs_dxy: 0.045,
            muon_tight_iso: 0.15,
            muon_loose_iso: 0.30,
            tau_min_pt: 30.,
            tau_max_abs_eta: 2.3,
            tau_min_decay_mode_finding: 0.5,
            pair_min_delta_r: 0.5,
            veto_muon_min_pt: 15.,
            veto_muon_max_abs_eta: 2.4,
            veto_muon_max_iso: 0.3,
            veto_min_delta_r: 0.15,
        }
    }
}
