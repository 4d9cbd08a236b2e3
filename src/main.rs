//! Demo driver running the baseline pair selection over a toy event sample
//!
//! The heavy lifting lives in the library. This binary loads the run
//! configuration, generates toy events, classifies the leading candidate pair
//! of each of them, and reports the accumulated cut flow.

use eyre::{Result, WrapErr};

use mutau::{
    config::Configuration,
    cutflow::CutFlow,
    event::Event,
    lepton::Variation,
    momentum, output,
    pairsel::PairSelector,
    random::RandomGenerator,
    scheduling,
    toygen::ToyEventGenerator,
};

use prefix_num_ops::real::*;

use std::time::Instant;

/// This will act as our main function, with suitable error handling
fn main() -> Result<()> {
    // ### CONFIGURATION READOUT ###

    // The work of loading, parsing, and checking the configuration has been
    // offloaded to a dedicated struct
    let cfg = Configuration::load("selection.cfg").wrap_err("Failed to load the configuration")?;

    // ### SELECTION INITIALIZATION ###

    // NOTE: The clock starts after configuration I/O, to avoid IO-induced
    //       timing fluctuations
    let saved_time = Instant::now();

    // Initialize the toy event generator
    let generator = ToyEventGenerator::default();

    // The extra-lepton vetoes normally read reconstruction detail that the
    // toy sample does not model, so this demo scans for any additional lepton
    // of the requested flavour passing the veto kinematics instead
    let veto_cuts = cfg.cuts;
    let third_lepton_veto =
        move |event: &Event, muon_index: usize, tau_index: usize, pdg_id: i32| {
            event
                .leptons
                .iter()
                .enumerate()
                .filter(|(index, _)| *index != muon_index && *index != tau_index)
                .any(|(_, lepton)| {
                    let p4 = lepton.p4(Variation::Nominal);
                    lepton.pdg_id().abs() == pdg_id
                        && momentum::pt(&p4) > veto_cuts.veto_muon_min_pt
                        && abs(momentum::eta(&p4)) < veto_cuts.veto_muon_max_abs_eta
                        && lepton.props().rel_iso < veto_cuts.veto_muon_max_iso
                })
        };

    // Initialize the pair selector
    let mut selector = PairSelector::new(cfg.mode()).with_third_lepton_veto(third_lepton_veto);
    selector.cuts = cfg.cuts;

    // ### SELECTION EXECUTION ###

    // This kernel processes one batch of toy events, given the identifier of
    // the first event in the batch and the generator stream reserved for it,
    // and returns the accumulated cut-flow tallies
    let process_events = |first_id: u64, batch_size: usize, rng: &mut RandomGenerator| {
        let mut tally = CutFlow::new();
        for offset in 0..batch_size as u64 {
            // Generate an event
            let mut event = generator.generate(first_id + offset, rng)?;

            // Classify its leading candidate pair and tally the verdict
            tally.record(selector.select(&mut event, 0));
        }
        Ok(tally)
    };

    // Run the selection
    let tally = scheduling::run_selection(cfg.num_events, cfg.seed, process_events)
        .wrap_err("Failed to process the event sample")?;

    // ### RESULTS DISPLAY AND STORAGE ###

    // Measure how much time has elapsed
    let elapsed_time = saved_time.elapsed();

    // Send the tallies to the standard output and to disk and we're done
    output::dump_results(&cfg, &tally, elapsed_time).wrap_err("Failed to output the results")?;

    // ...and we're done
    Ok(())
}
