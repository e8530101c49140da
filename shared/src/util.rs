use std::sync::atomic::{AtomicU16, Ordering};

/// 获取当前 UTC 时间戳（毫秒）
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

static SEQUENCE: AtomicU16 = AtomicU16::new(0);

/// Generate a Snowflake-style i64 for use as resource ID.
///
/// Layout (53 bits, fits in JavaScript's Number.MAX_SAFE_INTEGER):
///   - 41 bits: milliseconds since 2024-01-01 UTC (~69 years)
///   - 12 bits: per-process sequence, seeded randomly
///
/// A bulk order submits several items within the same millisecond, so the
/// low bits count up instead of being drawn independently.
pub fn snowflake_id() -> i64 {
    use rand::Rng;
    // Custom epoch: 2024-01-01 00:00:00 UTC
    const EPOCH_MS: i64 = 1_704_067_200_000;
    let now = now_millis();
    let ts = (now - EPOCH_MS) & 0x1FF_FFFF_FFFF; // 41 bits
    let seed = rand::thread_rng().gen_range(0..0x1000u16);
    let _ = SEQUENCE.compare_exchange(0, seed, Ordering::Relaxed, Ordering::Relaxed);
    let seq = i64::from(SEQUENCE.fetch_add(1, Ordering::Relaxed) & 0x0FFF); // 12 bits
    (ts << 12) | seq
}

/// Opaque session token handed to the customer page
pub fn new_session_token() -> String {
    uuid::Uuid::new_v4().to_string()
}
