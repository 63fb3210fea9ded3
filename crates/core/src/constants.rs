//! Shared limits.

/// Sync-job listings return at most this many rows, newest first.
pub const SYNC_JOB_LIST_LIMIT: i64 = 50;

/// Stored search-term listings return at most this many rows, newest first.
pub const STORED_SEARCH_TERMS_LIMIT: i64 = 10_000;
