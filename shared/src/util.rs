//! Small shared helpers: timestamps, IDs, phone normalization

use std::sync::LazyLock;
use std::sync::atomic::{AtomicI64, Ordering};

/// Current UTC timestamp in milliseconds
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

// Randomly seeded so restarts within the same millisecond don't replay
// the same sequence.
static SEQUENCE: LazyLock<AtomicI64> = LazyLock::new(|| {
    use rand::Rng;
    AtomicI64::new(rand::thread_rng().gen_range(0..0x1000))
});

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: process-wide sequence counter, so bursts minted within
///     one millisecond (a cart of items, concurrent requests) stay
///     collision-free up to 4096 ids per ms
pub fn snowflake_id() -> i64 {
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0xFFF; // 12 bits
    (ts << 12) | seq
}

/// Normalize a phone number to digits only.
///
/// Customers are identified by phone; "(11) 99999-0000" and
/// "11999990000" must resolve to the same record.
pub fn normalize_phone(phone: &str) -> String {
    phone.chars().filter(|c| c.is_ascii_digit()).collect()
}
