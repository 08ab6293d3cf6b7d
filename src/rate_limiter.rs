//! Upstream rate limiting shared across consumer workers
//!
//! The FetchLimiter paces calls to the single rate-limited transcript source.
//! All workers share one limiter, so adding consumer instances never
//! multiplies the request rate. The contract is "respect one upstream's
//! limit", not "limit each worker".

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Global fetch pacer shared across all consumer workers
///
/// Lock-free: a single atomic timestamp holds the next free request slot.
/// Each `acquire` claims the slot with a compare-and-swap, pushes the slot
/// forward by the configured interval, and sleeps until its claimed slot
/// arrives. Concurrent workers therefore serialize onto an evenly-spaced
/// request schedule with no mutex and no coordination channel.
///
/// # Implementation
///
/// - `interval_nanos`: minimum spacing between requests (0 = unlimited)
/// - `next_slot`: monotonic timestamp (nanoseconds) of the next free slot
#[derive(Clone)]
pub struct FetchLimiter {
    /// Minimum spacing between requests in nanoseconds (0 = unlimited)
    interval_nanos: Arc<AtomicU64>,
    /// Next free request slot (nanoseconds since an arbitrary process epoch)
    next_slot: Arc<AtomicU64>,
}

const NANOS_PER_MINUTE: u64 = 60 * 1_000_000_000;

impl FetchLimiter {
    /// Create a new FetchLimiter
    ///
    /// # Arguments
    ///
    /// * `requests_per_minute` - Upstream budget (None = unlimited)
    ///
    /// # Examples
    ///
    /// ```
    /// use hansard_dl::rate_limiter::FetchLimiter;
    ///
    /// // One request every five seconds
    /// let limiter = FetchLimiter::new(Some(12));
    ///
    /// // Unlimited
    /// let unlimited = FetchLimiter::new(None);
    /// ```
    #[must_use]
    pub fn new(requests_per_minute: Option<u64>) -> Self {
        Self {
            interval_nanos: Arc::new(AtomicU64::new(Self::interval_for(requests_per_minute))),
            next_slot: Arc::new(AtomicU64::new(Self::now_nanos())),
        }
    }

    /// Change the rate limit; takes effect for the next acquired slot
    pub fn set_limit(&self, requests_per_minute: Option<u64>) {
        self.interval_nanos
            .store(Self::interval_for(requests_per_minute), Ordering::SeqCst);
    }

    /// Current limit in requests per minute (None = unlimited)
    pub fn get_limit(&self) -> Option<u64> {
        let interval = self.interval_nanos.load(Ordering::Relaxed);
        if interval == 0 {
            None
        } else {
            Some(NANOS_PER_MINUTE / interval)
        }
    }

    /// Wait for the next free request slot
    ///
    /// Returns immediately when unlimited. Otherwise claims the next slot
    /// and sleeps until it arrives; concurrent callers each get their own
    /// slot, spaced by the configured interval.
    pub async fn acquire(&self) {
        let interval = self.interval_nanos.load(Ordering::Relaxed);
        if interval == 0 {
            return;
        }

        let slot = loop {
            let now = Self::now_nanos();
            let next = self.next_slot.load(Ordering::SeqCst);
            // An idle period must not bank slots: start from now if the
            // schedule has fallen behind the clock
            let slot = next.max(now);

            if self
                .next_slot
                .compare_exchange(next, slot + interval, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok()
            {
                break slot;
            }
        };

        let now = Self::now_nanos();
        if slot > now {
            tokio::time::sleep(Duration::from_nanos(slot - now)).await;
        }
    }

    fn interval_for(requests_per_minute: Option<u64>) -> u64 {
        match requests_per_minute {
            Some(rpm) if rpm > 0 => NANOS_PER_MINUTE / rpm,
            _ => 0,
        }
    }

    /// Get current monotonic time in nanoseconds
    ///
    /// Uses a monotonic clock that is not affected by system time changes.
    /// The epoch is arbitrary but consistent within a process lifetime.
    fn now_nanos() -> u64 {
        static START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();
        let start = START.get_or_init(Instant::now);
        start.elapsed().as_nanos() as u64
    }
}
