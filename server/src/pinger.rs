use std::{sync::Arc, thread, time::Duration};

use grid::GridNode;
use rand::Rng;

/// Drive the liveness loop: every tick probes the live set, retries the
/// dead set, then sleeps for the configured interval plus a random
/// jitter. A tick's probes are all joined before the sleep, so ticks
/// never overlap.
///
/// **Must** be called only once, after bootstrap.
pub(crate) fn run(node: Arc<GridNode>, interval_secs: u64, jitter_secs: u64) {
    loop {
        node.ping();
        node.check_for_comebacks();

        let jitter = if jitter_secs == 0 {
            0
        } else {
            rand::thread_rng().gen_range(0..=jitter_secs)
        };
        thread::sleep(Duration::from_secs(interval_secs + jitter));
    }
}
