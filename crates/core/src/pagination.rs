//! Paging helpers for list endpoints.

/// Page size used when the client does not pass `pick`.
pub const DEFAULT_PICK: i64 = 20;

/// Largest page a client may request.
pub const MAX_PICK: i64 = 100;

/// Clamp a user-provided page size into `[1, max]`, defaulting when absent.
pub fn clamp_limit(limit: Option<i64>, default: i64, max: i64) -> i64 {
    limit.unwrap_or(default).max(1).min(max)
}

/// Clamp a user-provided offset to non-negative.
pub fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}
