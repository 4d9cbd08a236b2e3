//! Sequential back-end of the event selection

use crate::{
    cutflow::CutFlow, error::RecordResult, random::RandomGenerator, scheduling::EVENT_BATCH_SIZE,
};

/// Process events in sequential mode
///
/// We use batched logic even in sequential mode, in order to achieve
/// reproducibility with respect to multi-threaded runs: every batch reads from
/// the generator stream that its index selects, never from a shared serial
/// stream, so the tallies come out identical however the batches are run.
///
pub fn run_selection_impl(
    mut num_events: usize,
    rng: RandomGenerator,
    process_events: impl Send + Sync + Fn(u64, usize, &mut RandomGenerator) -> RecordResult<CutFlow>,
) -> RecordResult<CutFlow> {
    // Some double-checking cannot hurt...
    assert!(num_events > 0, "Must process at least one event");

    // We know in advance how many batches of events we will process
    let num_batches = num_events / EVENT_BATCH_SIZE
        + if num_events % EVENT_BATCH_SIZE == 0 {
            0
        } else {
            1
        };

    // Process the batches in order, merging their tallies as we go
    let mut tally = CutFlow::new();
    for batch_id in 0..num_batches {
        let batch_size = ::std::cmp::min(num_events, EVENT_BATCH_SIZE);
        num_events -= batch_size;

        let mut batch_rng = rng.fork_batch(batch_id);
        let first_id = (batch_id * EVENT_BATCH_SIZE) as u64;
        tally.merge(process_events(first_id, batch_size, &mut batch_rng)?);
    }

    // Return the final accumulated tallies
    Ok(tally)
}
