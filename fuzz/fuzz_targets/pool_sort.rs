#![no_main]

use libfuzzer_sys::fuzz_target;

use queue_sort::SortConfig;

// The first byte picks the worker count, the second one the queue capacity, the rest is sorted.
fuzz_target!(|data: &[u8]| {
    let (num_workers, queue_capacity, data) = match data {
        [workers, capacity, rest @ ..] => (
            (*workers as usize % 16) + 1,
            *capacity as usize,
            rest,
        ),
        _ => return,
    };

    let mut v = data.to_vec();
    let config = SortConfig::new()
        .num_workers(num_workers)
        .queue_capacity(queue_capacity);

    match queue_sort::sort_with_config(&mut v, &config) {
        Ok(()) => {
            let mut expected = data.to_vec();
            expected.sort_unstable();
            assert_eq!(v, expected);
        }
        Err(queue_sort::SortError::CapacityExceeded { task, capacity }) => {
            assert_eq!(capacity, queue_capacity);
            assert!(task.right() < v.len());

            let mut got = v.clone();
            got.sort_unstable();
            let mut expected = data.to_vec();
            expected.sort_unstable();
            assert_eq!(got, expected);
        }
        Err(err) => {
            // Only an empty queue for a real input is rejected up front.
            assert!(queue_capacity == 0 && v.len() > 1, "{err}");
        }
    }
});
