//! Mechanism for loading and sharing the selection configuration

use crate::{cuts::BaselineCuts, numeric::Float, pairsel::SelectionMode};

use eyre::{ensure, eyre, Result, WrapErr};

use std::str::FromStr;

/// Selection run configuration
pub struct Configuration {
    /// Number of toy events to be processed
    pub num_events: usize,

    /// Seed of the root random number generator
    pub seed: u64,

    /// Whether the accept decision uses the production requirements
    pub production: bool,

    /// Cuts applied by the pair selection
    pub cuts: BaselineCuts,
}
//
impl Configuration {
    /// Load the configuration from a file, print it out, and check it
    pub fn load(file_name: &str) -> Result<Self> {
        // Read out the selection's configuration file or die trying
        let config_str = ::std::fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read configuration file {}", file_name))?;

        // Decode the configuration items into concrete values
        let config = Self::decode(&config_str)?;

        // Display it the way the ntuple producer used to (this eases
        // comparisons)
        config.print();

        // Check it only after the display, so that a bad value can be spotted
        config.validate()?;

        // If nothing bad occured, we can now return the configuration
        Ok(config)
    }

    /// Decode the raw configuration text
    fn decode(config_str: &str) -> Result<Self> {
        // We will iterate over the configuration items. In this simple config
        // file format, these should be the first non-whitespace chunk of text
        // on each line. We will ignore blank lines.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        // Decode the configuration items into concrete values. Cuts that the
        // file does not cover keep their analysis defaults.
        Ok(Configuration {
            num_events: next_item("num_events")?.parse::<usize>()?,
            seed: next_item("seed")?.parse::<u64>()?,
            production: next_item("production")?.parse_bool()?,
            cuts: BaselineCuts {
                muon_min_pt: next_item("muon_min_pt")?.parse::<Float>()?,
                tau_min_pt: next_item("tau_min_pt")?.parse::<Float>()?,
                muon_tight_iso: next_item("muon_tight_iso")?.parse::<Float>()?,
                muon_loose_iso: next_item("muon_loose_iso")?.parse::<Float>()?,
                pair_min_delta_r: next_item("pair_min_delta_r")?.parse::<Float>()?,
                ..BaselineCuts::default()
            },
        })
    }

    /// Check the configuration for obvious mistakes
    fn validate(&self) -> Result<()> {
        // A sensible run must process at least one event
        ensure!(self.num_events > 0, "Please process at least one event");

        // The production accept decision reads both isolation cuts, and only
        // makes sense when the tight one is the tighter of the two
        ensure!(
            self.cuts.muon_tight_iso <= self.cuts.muon_loose_iso,
            "The tight muon isolation cut should not be above the loose one"
        );

        // A pair whose legs overlap is not a pair
        ensure!(
            self.cuts.pair_min_delta_r > 0.,
            "Please keep a positive separation between the pair legs"
        );

        Ok(())
    }

    /// Tightness of the accept decision that this configuration requests
    pub fn mode(&self) -> SelectionMode {
        if self.production {
            SelectionMode::Production
        } else {
            SelectionMode::Synchronization
        }
    }

    /// Display the configuration, following formatting of the original version
    pub fn print(&self) {
        println!("NEVENTS        : {}", self.num_events);
        println!("SEED           : {}", self.seed);
        println!("PRODUCTION     : {}", self.production);
        println!("MUONPTMIN      : {}", self.cuts.muon_min_pt);
        println!("TAUPTMIN       : {}", self.cuts.tau_min_pt);
        println!("MUONISOTIGHT   : {}", self.cuts.muon_tight_iso);
        println!("MUONISOLOOSE   : {}", self.cuts.muon_loose_iso);
        println!("PAIRDRMIN      : {}", self.cuts.pair_min_delta_r);
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: ::std::error::Error + Send + Sync + 'static,
    {
        self.data
            .parse::<T>()
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }

    /// Parse this data using special logic which handles Fortran's bool syntax
    //
    // TODO: Once Rust has specialization, try to make parse_bool a special case
    //       of parse that's invoked for bool arguments, and ideally use that to
    //       simplify the caller code to just a call to parse().
    //
    fn parse_bool(self) -> Result<bool> {
        match self.data.to_lowercase().as_str() {
            // Handle FORTRAN booleans as a special case
            ".true." => Ok(true),
            ".false." => Ok(false),
            // Delegate other booleans to the standard Rust parser
            _ => self.parse::<bool>(),
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    /// Configuration text matching the file shipped with the crate
    const SAMPLE: &str = "10000     ! number of toy events
20160525  ! random seed
.false.   ! production accept decision
20.       ! muon pt threshold (GeV)
30.       ! tau pt threshold (GeV)
0.15      ! tight muon isolation
0.30      ! loose muon isolation
0.5       ! pair separation floor
";

    #[test]
    fn sample_configuration_decodes() {
        let config = Configuration::decode(SAMPLE).expect("Sample config should decode");
        assert_eq!(config.num_events, 10_000);
        assert_eq!(config.seed, 20_160_525);
        assert!(!config.production);
        assert_eq!(config.mode(), SelectionMode::Synchronization);
        assert_eq!(config.cuts.muon_min_pt, 20.);
        assert_eq!(config.cuts.tau_min_pt, 30.);
        assert_eq!(config.cuts.muon_tight_iso, 0.15);
        assert_eq!(config.cuts.muon_loose_iso, 0.30);
        assert_eq!(config.cuts.pair_min_delta_r, 0.5);
        // Cuts beyond the file keep their defaults
        assert_eq!(config.cuts.veto_muon_min_pt, BaselineCuts::default().veto_muon_min_pt);
        config.validate().expect("Sample config should be valid");
    }

    #[test]
    fn fortran_booleans_are_understood() {
        let config = Configuration::decode(&SAMPLE.replace(".false.", ".TRUE."))
            .expect("Fortran booleans should decode");
        assert!(config.production);
        assert_eq!(config.mode(), SelectionMode::Production);

        let config = Configuration::decode(&SAMPLE.replace(".false.", "true"))
            .expect("Rust booleans should decode");
        assert!(config.production);
    }

    #[test]
    fn missing_and_malformed_items_are_reported() {
        let truncated = SAMPLE.lines().take(3).collect::<Vec<_>>().join("\n");
        assert!(Configuration::decode(&truncated).is_err());

        assert!(Configuration::decode(&SAMPLE.replace("10000", "lots")).is_err());
    }

    #[test]
    fn nonsensical_configurations_are_rejected() {
        let no_events = Configuration::decode(&SAMPLE.replace("10000", "0"))
            .expect("Zero events should decode before validation");
        assert!(no_events.validate().is_err());

        let inverted_iso = Configuration::decode(&SAMPLE.replace("0.30", "0.10"))
            .expect("Inverted isolation should decode before validation");
        assert!(inverted_iso.validate().is_err());
    }
}
