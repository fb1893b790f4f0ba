use std::cmp::Ordering;
use std::panic;
use std::thread;

use log::debug;

use crate::config::SortConfig;
use crate::coordinator::Coordinator;
use crate::error::SortError;
use crate::partition::is_less_from;
use crate::queue::Task;
use crate::shared::SharedSlice;
use crate::worker;

/// What one pool sort did, for diagnostics.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SortStats {
    /// Number of ranges that were partitioned.
    pub tasks_processed: usize,
    /// Largest number of ranges that were waiting in the queue at the same time.
    pub peak_queued: usize,
    /// Tasks resolved by each worker, indexed by worker id. Empty if no worker was needed.
    pub per_worker: Vec<usize>,
}

/// Sorts `v` in place with `num_workers` threads sharing a queue of at most `queue_capacity`
/// pending ranges.
///
/// Fails with [`SortError::InvalidConfig`] for `num_workers == 0` and with
/// [`SortError::CapacityExceeded`] if the queue overflows, in which case `v` is left partially
/// sorted but still holds all of its original elements.
pub fn sort_range<T>(
    v: &mut [T],
    num_workers: usize,
    queue_capacity: usize,
) -> Result<(), SortError>
where
    T: Ord + Send,
{
    let config = SortConfig::new()
        .num_workers(num_workers)
        .queue_capacity(queue_capacity);

    sort_with_config(v, &config)
}

/// Sorts `v` in place with the default configuration, one worker per available core. Equal
/// elements may be reordered.
pub fn sort<T>(v: &mut [T]) -> Result<(), SortError>
where
    T: Ord + Send,
{
    sort_with_config(v, &SortConfig::default())
}

/// Sorts `v` in place with the comparator `compare`, which is shared by all workers.
///
/// If `compare` does not implement a total order the resulting order is unspecified, but `v` keeps
/// all of its original elements. If `compare` panics the panic is propagated after every worker
/// has stopped.
pub fn sort_by<T, F>(v: &mut [T], compare: F) -> Result<(), SortError>
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    sort_by_with_config(v, compare, &SortConfig::default())
}

pub fn sort_with_config<T>(v: &mut [T], config: &SortConfig) -> Result<(), SortError>
where
    T: Ord + Send,
{
    sort_with_stats(v, config).map(|_| ())
}

pub fn sort_by_with_config<T, F>(
    v: &mut [T],
    compare: F,
    config: &SortConfig,
) -> Result<(), SortError>
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    sort_by_with_stats(v, compare, config).map(|_| ())
}

pub fn sort_with_stats<T>(v: &mut [T], config: &SortConfig) -> Result<SortStats, SortError>
where
    T: Ord + Send,
{
    pool_sort(v, &|a: &T, b: &T| a.lt(b), config)
}

pub fn sort_by_with_stats<T, F>(
    v: &mut [T],
    compare: F,
    config: &SortConfig,
) -> Result<SortStats, SortError>
where
    T: Send,
    F: Fn(&T, &T) -> Ordering + Sync,
{
    pool_sort(v, &is_less_from(&compare), config)
}

// --- IMPL ---

fn pool_sort<T, F>(v: &mut [T], is_less: &F, config: &SortConfig) -> Result<SortStats, SortError>
where
    T: Send,
    F: Fn(&T, &T) -> bool + Sync,
{
    let len = v.len();
    config.validate(len)?;

    // Nothing to partition, don't bother starting any threads.
    let Some(whole) = Task::whole(len) else {
        return Ok(SortStats::default());
    };

    let num_workers = config.workers();
    let queue_capacity = config.capacity_for(len);
    let resolve_delay = config.delay();
    let serial_threshold = config.threshold();

    debug!("sorting {len} elements with {num_workers} workers, queue capacity {queue_capacity}");

    let coordinator = Coordinator::new(queue_capacity)?;
    coordinator.seed(whole)?;

    let shared = SharedSlice::new(v);

    let per_worker = thread::scope(|s| {
        let coordinator = &coordinator;
        let shared = &shared;

        let mut handles = Vec::with_capacity(num_workers);
        for id in 0..num_workers {
            let spawned = thread::Builder::new()
                .name(format!("sort-worker-{id}"))
                .spawn_scoped(s, move || {
                    worker::run(
                        id,
                        coordinator,
                        shared,
                        is_less,
                        serial_threshold,
                        resolve_delay,
                    )
                });

            match spawned {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    // Releases the workers that did start, they are joined below.
                    coordinator.fail(SortError::Spawn(err));
                    break;
                }
            }
        }

        coordinator.wait();

        // Join everyone before reporting anything, no worker may touch `v` once we return.
        let mut per_worker = Vec::with_capacity(handles.len());
        let mut panic_payload = None;
        for handle in handles {
            match handle.join() {
                Ok(resolved) => per_worker.push(resolved),
                Err(payload) => {
                    panic_payload.get_or_insert(payload);
                }
            }
        }

        if let Some(payload) = panic_payload {
            panic::resume_unwind(payload);
        }

        per_worker
    });

    let counters = coordinator.into_result()?;

    debug!(
        "sorted {len} elements, {} tasks, peak queue depth {}",
        counters.tasks_processed, counters.peak_queued
    );

    Ok(SortStats {
        tasks_processed: counters.tasks_processed,
        peak_queued: counters.peak_queued,
        per_worker,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_worker_sorts_example() {
        let mut v = [5, 3, 8, 1, 9, 2];
        sort_range(&mut v, 1, 8).unwrap();
        assert_eq!(v, [1, 2, 3, 5, 8, 9]);
    }

    #[test]
    fn trivial_inputs_spawn_nothing() {
        let config = SortConfig::new().num_workers(4);

        let mut empty: [i32; 0] = [];
        let stats = sort_with_stats(&mut empty, &config).unwrap();
        assert_eq!(stats, SortStats::default());

        let mut single = [7];
        let stats = sort_with_stats(&mut single, &config).unwrap();
        assert!(stats.per_worker.is_empty());
        assert_eq!(single, [7]);
    }

    #[test]
    fn invalid_config_rejected_before_work() {
        let mut v = [3, 2, 1];
        assert!(matches!(
            sort_range(&mut v, 0, 8),
            Err(SortError::InvalidConfig { .. })
        ));
        assert_eq!(v, [3, 2, 1]);
    }

    #[test]
    fn stats_add_up() {
        let mut v: Vec<u32> = (0..2_000).rev().collect();
        let config = SortConfig::new().num_workers(3);
        let stats = sort_with_stats(&mut v, &config).unwrap();

        assert!(v.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(stats.per_worker.len(), 3);
        assert_eq!(stats.per_worker.iter().sum::<usize>(), stats.tasks_processed);
        assert!(stats.tasks_processed > 0);
        assert!(stats.peak_queued >= 1);
        assert!(stats.peak_queued <= config.capacity_for(v.len()));
    }

    #[test]
    fn serial_threshold_leaves_small_ranges_to_one_worker() {
        let mut v: Vec<u32> = (0..2_000).rev().collect();
        let config = SortConfig::new().num_workers(3).serial_threshold(100);
        let stats = sort_with_stats(&mut v, &config).unwrap();

        assert!(v.windows(2).all(|w| w[0] <= w[1]));

        let mut split_all: Vec<u32> = (0..2_000).rev().collect();
        let config = SortConfig::new().num_workers(3);
        let split_all_stats = sort_with_stats(&mut split_all, &config).unwrap();

        assert!(stats.tasks_processed < split_all_stats.tasks_processed);
        assert_eq!(stats.per_worker.iter().sum::<usize>(), stats.tasks_processed);
    }

    #[test]
    fn sort_by_descending() {
        let mut v = vec![4, 8, 1, 9, 0, 3, 3];
        let config = SortConfig::new().num_workers(2);
        sort_by_with_config(&mut v, |a, b| b.cmp(a), &config).unwrap();
        assert_eq!(v, [9, 8, 4, 3, 3, 1, 0]);
    }
}
