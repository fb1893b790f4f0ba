//! Input patterns for testing and benchmarking the sorts. Limited to i32 values, tests map them into
//! other types where needed.
//!
//! All randomness is derived from one seed per process, printed by the test harness and
//! overridable with the `OVERRIDE_SEED` env var to reproduce a failure.

use std::env;
use std::ops::Range;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};

use once_cell::sync::OnceCell;
use rand::distributions::Uniform;
use rand::prelude::*;
use zipf::ZipfDistribution;

// --- Public ---

pub fn random(len: usize) -> Vec<i32> {
    //     .
    // : . : :
    // :.:::.::

    let mut rng = new_rng();
    (0..len).map(|_| rng.gen::<i32>()).collect()
}

pub fn random_uniform<R>(len: usize, range: R) -> Vec<i32>
where
    R: Into<Uniform<i32>>,
{
    // :.:.:.::

    let dist: Uniform<i32> = range.into();
    let mut rng = new_rng();

    (0..len).map(|_| dist.sample(&mut rng)).collect()
}

/// Heavily skewed towards small values, see https://en.wikipedia.org/wiki/Zipf's_law.
pub fn random_zipf(len: usize, exponent: f64) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut rng = new_rng();
    let dist = ZipfDistribution::new(len, exponent).expect("valid zipf parameters");

    (0..len).map(|_| dist.sample(&mut rng) as i32).collect()
}

/// The first `sorted_percent` of the values are already in order, followed by random values.
pub fn random_sorted(len: usize, sorted_percent: f64) -> Vec<i32> {
    //     .:
    //   .:::. :
    // .::::::.::

    let mut v = random(len);
    let sorted_len = ((len as f64) * (sorted_percent / 100.0)).round() as usize;
    v[..sorted_len.min(len)].sort_unstable();

    v
}

pub fn all_equal(len: usize) -> Vec<i32> {
    // ......
    // ::::::

    vec![66; len]
}

pub fn ascending(len: usize) -> Vec<i32> {
    //     .:
    //   .:::
    // .:::::

    (0..len as i32).collect()
}

pub fn descending(len: usize) -> Vec<i32> {
    // :.
    // :::.
    // :::::.

    (0..len as i32).rev().collect()
}

pub fn saw_ascending(len: usize, saw_count: usize) -> Vec<i32> {
    //   .:  .:
    // .:::.:::

    saws(len, saw_count, |_| Direction::Up)
}

pub fn saw_descending(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.
    // :::.:::.

    saws(len, saw_count, |_| Direction::Down)
}

pub fn saw_mixed(len: usize, saw_count: usize) -> Vec<i32> {
    // :.  :.    .::.    .:
    // :::.:::..::::::..:::

    let directions = random_uniform(saw_count.max(1) + 1, 0..=1);
    saws(len, saw_count, |i| Direction::from_coin(directions[i]))
}

/// Ascending and descending runs in random order, each with a random length taken from `range`.
pub fn saw_mixed_range(len: usize, range: Range<usize>) -> Vec<i32> {
    //     :.
    // :.  :::.    .::.      .:
    // :::.:::::..::::::..:.:::

    if len == 0 {
        return Vec::new();
    }

    let mut v = random(len);

    let max_runs = len / range.start.max(1) + 1;
    let directions = random_uniform(max_runs, 0..=1);
    let run_lens = random_uniform(max_runs, (range.start as i32)..(range.end as i32));

    let mut start = 0;
    for (direction, run_len) in directions.iter().zip(run_lens.iter()) {
        if start >= len {
            break;
        }

        let end = (start + *run_len as usize).min(len);
        Direction::from_coin(*direction).apply(&mut v[start..end]);
        start = end;
    }

    v
}

pub fn pipe_organ(len: usize) -> Vec<i32> {
    //   .:.
    // .:::::.

    let mut v = random(len);
    let (first_half, second_half) = v.split_at_mut(len / 2);
    Direction::Up.apply(first_half);
    Direction::Down.apply(second_half);

    v
}

/// Every call to a random pattern yields new values from here on, instead of the same values per
/// process. Useful for benchmarks, conflicts with `OVERRIDE_SEED`.
pub fn use_random_seed_each_time() {
    if env::var("OVERRIDE_SEED").is_ok() {
        panic!("Using use_random_seed_each_time conflicts with the external seed override.");
    }

    RANDOM_EACH_TIME.store(true, Ordering::Relaxed);
}

pub fn random_init_seed() -> u64 {
    if RANDOM_EACH_TIME.load(Ordering::Relaxed) {
        return thread_rng().gen();
    }

    static SEED: OnceCell<u64> = OnceCell::new();

    *SEED.get_or_init(|| match env::var("OVERRIDE_SEED") {
        Ok(seed) => u64::from_str(&seed).expect("OVERRIDE_SEED must be a u64"),
        Err(_) => thread_rng().gen(),
    })
}

// --- Private ---

static RANDOM_EACH_TIME: AtomicBool = AtomicBool::new(false);

#[derive(Copy, Clone)]
enum Direction {
    Up,
    Down,
}

impl Direction {
    fn from_coin(coin: i32) -> Self {
        if coin == 0 {
            Self::Up
        } else {
            Self::Down
        }
    }

    fn apply(self, run: &mut [i32]) {
        match self {
            Self::Up => run.sort_unstable(),
            Self::Down => run.sort_unstable_by(|a, b| b.cmp(a)),
        }
    }
}

fn saws(len: usize, saw_count: usize, direction: impl Fn(usize) -> Direction) -> Vec<i32> {
    if len == 0 {
        return Vec::new();
    }

    let mut v = random(len);
    let chunk_len = (len / saw_count.max(1)).max(1);

    for (i, chunk) in v.chunks_mut(chunk_len).enumerate() {
        direction(i.min(saw_count.max(1))).apply(chunk);
    }

    v
}

fn new_rng() -> StdRng {
    StdRng::seed_from_u64(random_init_seed())
}
