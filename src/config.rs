use std::env;
use std::num::NonZeroUsize;
use std::str::FromStr;
use std::thread;
use std::time::Duration;

use crate::error::SortError;

/// Upper bound on the worker count, anything above is almost certainly a typo.
pub const MAX_WORKERS: usize = 1024;

/// Environment variable overriding the worker count in [`SortConfig::from_env`].
pub const WORKERS_ENV: &str = "QUEUE_SORT_WORKERS";

/// Environment variable overriding the queue capacity in [`SortConfig::from_env`].
pub const CAPACITY_ENV: &str = "QUEUE_SORT_CAPACITY";

/// Environment variable setting [`SortConfig::serial_threshold`] in [`SortConfig::from_env`].
pub const SERIAL_THRESHOLD_ENV: &str = "QUEUE_SORT_SERIAL_THRESHOLD";

/// Parameters of one pool sort invocation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortConfig {
    num_workers: usize,
    queue_capacity: Option<usize>,
    serial_threshold: Option<usize>,
    resolve_delay: Option<Duration>,
}

impl Default for SortConfig {
    fn default() -> Self {
        Self {
            num_workers: thread::available_parallelism().map_or(1, NonZeroUsize::get),
            queue_capacity: None,
            serial_threshold: None,
            resolve_delay: None,
        }
    }
}

impl SortConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults, overridden by `QUEUE_SORT_WORKERS`, `QUEUE_SORT_CAPACITY` and
    /// `QUEUE_SORT_SERIAL_THRESHOLD` if set.
    pub fn from_env() -> Result<Self, SortError> {
        let mut config = Self::default();

        if let Some(num_workers) = parse_env(WORKERS_ENV)? {
            config.num_workers = num_workers;
        }

        if let Some(queue_capacity) = parse_env(CAPACITY_ENV)? {
            config.queue_capacity = Some(queue_capacity);
        }

        if let Some(serial_threshold) = parse_env(SERIAL_THRESHOLD_ENV)? {
            config.serial_threshold = Some(serial_threshold);
        }

        Ok(config)
    }

    pub fn num_workers(mut self, num_workers: usize) -> Self {
        self.num_workers = num_workers;
        self
    }

    /// Fixes the queue capacity. Without it the capacity is derived from the input length, see
    /// [`default_queue_capacity`].
    pub fn queue_capacity(mut self, queue_capacity: usize) -> Self {
        self.queue_capacity = Some(queue_capacity);
        self
    }

    /// Ranges of at most `len` elements are sorted by the worker that dequeued them, with the
    /// single-threaded quicksort, instead of being split into more tasks. Off by default, every
    /// range of two or more elements is then partitioned and requeued.
    pub fn serial_threshold(mut self, len: usize) -> Self {
        self.serial_threshold = Some(len);
        self
    }

    /// Makes every worker sleep for `delay` after partitioning a range and before handing back its
    /// children. Only useful to shake out scheduling dependent bugs.
    pub fn resolve_delay(mut self, delay: Duration) -> Self {
        self.resolve_delay = Some(delay);
        self
    }

    pub fn workers(&self) -> usize {
        self.num_workers
    }

    pub fn delay(&self) -> Option<Duration> {
        self.resolve_delay
    }

    pub fn threshold(&self) -> Option<usize> {
        self.serial_threshold
    }

    /// The capacity used for an input of `len` elements.
    pub fn capacity_for(&self, len: usize) -> usize {
        self.queue_capacity.unwrap_or_else(|| default_queue_capacity(len))
    }

    /// Checks the configuration against an input of `len` elements.
    pub fn validate(&self, len: usize) -> Result<(), SortError> {
        if self.num_workers == 0 {
            return Err(SortError::invalid_config("at least one worker is required"));
        }

        if self.num_workers > MAX_WORKERS {
            return Err(SortError::invalid_config(format!(
                "{} workers requested, at most {MAX_WORKERS} are supported",
                self.num_workers
            )));
        }

        if len > 1 && self.capacity_for(len) == 0 {
            return Err(SortError::invalid_config("queue capacity must be at least 1"));
        }

        Ok(())
    }
}

/// Enough room for every range that can be pending at the same time.
///
/// Pending ranges are disjoint and hold at least two elements each, so there can never be more than
/// `len / 2` of them.
pub fn default_queue_capacity(len: usize) -> usize {
    len / 2 + 1
}

fn parse_env<T: FromStr>(name: &str) -> Result<Option<T>, SortError> {
    match env::var(name) {
        Ok(val) => val
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| SortError::invalid_config(format!("{name}={val:?} is not a valid count"))),
        Err(env::VarError::NotPresent) => Ok(None),
        Err(env::VarError::NotUnicode(_)) => Err(SortError::invalid_config(format!(
            "{name} is not valid unicode"
        ))),
    }
}
