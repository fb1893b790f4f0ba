//! Parallel in-place quicksort on a fixed pool of worker threads.
//!
//! The workers share one bounded queue of index ranges. Each worker takes a range, partitions it
//! around a median-of-three pivot and hands the two sides back to the queue, until no range is
//! queued and none is being partitioned anymore.
//!
//! ```ignore
//! let mut v = vec![5, 3, 8, 1, 9, 2];
//! queue_sort::sort_range(&mut v, 4, 16)?;
//! assert_eq!(v, [1, 2, 3, 5, 8, 9]);
//! ```

pub mod config;
pub mod coordinator;
pub mod error;
pub mod partition;
pub mod queue;
pub mod serial;

mod shared;
mod sort;
mod worker;

pub use config::SortConfig;
pub use error::SortError;
pub use queue::Task;
pub use sort::{
    sort, sort_by, sort_by_with_config, sort_by_with_stats, sort_range, sort_with_config,
    sort_with_stats, SortStats,
};
