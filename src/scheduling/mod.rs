//! This module takes care of scheduling the selection work, encapsulating use
//! of multiple threads and anything else that will come in the future

#[cfg(not(feature = "multi-threading"))] mod sequential;
#[cfg(feature = "multi-threading")] mod multi_threading;

use crate::{cutflow::CutFlow, error::RecordResult, random::RandomGenerator};


/// Size of the processed event batches
///
/// Events are grouped in batches of a certain size in order to give parallel
/// tasks a reasonable grain size and achieve perfect reproducibility between
/// sequential and parallel runs of the selection. Every batch reads from a
/// dedicated random number generator stream, selected by batch index, so the
/// outcome does not depend on how batches are interleaved across threads.
///
/// This constant may need to be tuned in the future if CPUs become faster or
/// synchronization overhead changes. But the rate of such change is expected to
/// be low enough for hard-coding of this constant to be reasonable.
///
const EVENT_BATCH_SIZE: usize = 10_000;


/// Run the event selection in the manner that was configured at build time.
///
/// Takes as parameters the total number of events to be processed, the seed of
/// the root random number generator, and a selection kernel that processes one
/// batch of events given the identifier of the first event in the batch, the
/// batch size, and the generator stream reserved for that batch.
///
/// Returns the accumulated cut-flow tallies, or the first record-level error
/// that the kernel reported.
///
pub fn run_selection(
    num_events: usize,
    seed: u64,
    process_events: impl Send + Sync
                         + Fn(u64,
                              usize,
                              &mut RandomGenerator) -> RecordResult<CutFlow>
) -> RecordResult<CutFlow> {
    // Check that the user is being reasonable (should have already been checked
    // at configuration time, but bugs can happen...)
    assert!(num_events > 0, "Must process at least one event");

    // Initialize the root random number generator
    let rng = RandomGenerator::from_seed(seed);

    // Accumulate selection tallies...
    {
        // ...in sequential mode
        #[cfg(not(feature = "multi-threading"))]
        { sequential::run_selection_impl(num_events,
                                         rng,
                                         process_events) }

        // ...in multi-threaded mode
        #[cfg(feature = "multi-threading")]
        { multi_threading::run_selection_impl(num_events,
                                              rng,
                                              process_events) }
    }
}
