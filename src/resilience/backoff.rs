//! Exponential backoff with jitter.

use rand::Rng;
use std::time::Duration;

/// Delay to sleep before the attempt following `attempt`.
///
/// Doubles from `base_ms` per completed attempt, capped at `max_ms`, with
/// up to 10% jitter added on top. A zero base yields a zero delay, which
/// the executor treats as an immediate retry.
pub fn retry_delay(attempt: u32, base_ms: u64, max_ms: u64) -> Duration {
    if attempt == 0 || base_ms == 0 {
        return Duration::from_millis(0);
    }

    let exponential_base = 2u64.saturating_pow(attempt - 1);
    let delay_ms = base_ms.saturating_mul(exponential_base);
    let capped_delay = delay_ms.min(max_ms.max(base_ms));

    let jitter_range = capped_delay / 10;
    let jitter = if jitter_range > 0 {
        rand::thread_rng().gen_range(0..jitter_range)
    } else {
        0
    };

    Duration::from_millis(capped_delay + jitter)
}
