//! Multi-threaded back-end of the event selection

use crate::{
    cutflow::CutFlow, error::RecordResult, random::RandomGenerator, scheduling::EVENT_BATCH_SIZE,
};

use std::sync::Mutex;

/// Process events in multi-threaded mode
///
/// Every task forks its own generator stream from the root generator, selected
/// by batch index, so the scheduling thread never needs to advance the root
/// state and the tallies are bit-identical to those of a sequential run.
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

    // The results of parallel tasks will be merged in batch order
    let accumulator = BatchAccumulator::new(num_batches);

    // This function is a synchronization scope: it will only return
    // once all inner tasks have been executed
    rayon::scope(|scope| {
        // For each requested batch of events...
        for batch_id in 0..num_batches {
            let batch_size = ::std::cmp::min(num_events, EVENT_BATCH_SIZE);
            num_events -= batch_size;

            // Spawn a task which is responsible for processing them
            let rng_ref = &rng;
            let accumulator_ref = &accumulator;
            let process_events_ref = &process_events;
            scope.spawn(move |_| {
                let mut batch_rng = rng_ref.fork_batch(batch_id);
                let first_id = (batch_id * EVENT_BATCH_SIZE) as u64;
                let result = process_events_ref(first_id, batch_size, &mut batch_rng);
                accumulator_ref.set_task_result(batch_id, result);
            });
        }
    });

    // Extract the merged tallies from the accumulator
    accumulator.get_merged_result()
}

/// Batch-ordered accumulation of the per-task selection tallies
struct BatchAccumulator {
    /// Storage for the intermediary cut-flows of parallel tasks
    results: Box<[Mutex<Option<RecordResult<CutFlow>>>]>,
}
//
impl BatchAccumulator {
    /// Set up results storage for N parallel tasks
    fn new(num_tasks: usize) -> Self {
        assert!(num_tasks > 0, "There should be at least one task");
        Self {
            results: (0..num_tasks)
                .map(|_| Mutex::new(None))
                .collect::<Vec<_>>()
                .into_boxed_slice(),
        }
    }

    /// Integrate the results of the n-th selection task
    fn set_task_result(&self, task_id: usize, result: RecordResult<CutFlow>) {
        let mut lock = self.results[task_id]
            .lock()
            .expect("Mutex data should be valid");
        assert!(lock.is_none(), "Tasks should not report results twice");
        *lock = Some(result);
    }

    /// Merge the task tallies in batch order, or report the first task error
    fn get_merged_result(self) -> RecordResult<CutFlow> {
        // Start iterating over the task results
        let mut results_iter = self.results.into_vec().into_iter().map(|entry| {
            entry
                .into_inner()
                .expect("Mutex data should be valid")
                .expect("Result should be ready")
        });

        // Initialize results storage with the tallies of the first task
        let first_result = results_iter
            .next()
            .expect("There should be at least one task")?;

        // Merge the tallies of the other tasks
        results_iter.try_fold(first_result, |mut tally, result| {
            tally.merge(result?);
            Ok(tally)
        })
    }
}
