//! Redelivery backoff with exponential delay and jitter
//!
//! The consumer never retries inline: a transiently-failed work item is
//! handed back to the queue with a delay computed here, so redeliveries
//! spread out instead of hammering the upstream the moment it hiccups.

use crate::config::RetryConfig;
use rand::Rng;
use std::time::Duration;

/// Compute the redelivery delay for a work item entering its `attempt`-th
/// retry (0-based: the first redelivery uses `initial_delay_secs`).
///
/// The delay grows by `backoff_multiplier` per attempt and is capped at
/// `max_delay_secs` before jitter; with jitter enabled the result lands
/// uniformly in `[delay, 2*delay)`.
pub fn redelivery_delay(config: &RetryConfig, attempt: u32) -> Duration {
    let base = config.initial_delay_secs as f64;
    let factor = config.backoff_multiplier.max(1.0).powi(attempt as i32);
    let capped = (base * factor).min(config.max_delay_secs as f64);

    let delay = Duration::from_secs_f64(capped);
    if config.jitter { add_jitter(delay) } else { delay }
}

/// Add random jitter to a delay to prevent thundering herd
///
/// Jitter is uniformly distributed between 0% and 100% of the delay, so the
/// result is between `delay` and `2 * delay`.
fn add_jitter(delay: Duration) -> Duration {
    let mut rng = rand::thread_rng();
    let jitter_factor: f64 = rng.gen_range(0.0..=1.0);
    Duration::from_secs_f64(delay.as_secs_f64() * (1.0 + jitter_factor))
}
