use serde::{Deserialize, Serialize};

/// How long a fetched quote stays fresh.
pub const QUOTE_TTL_MS: u64 = 10 * 60 * 1000;

/// Shown (and cached like a real quote) when the remote generator fails.
pub const FALLBACK_QUOTE: &str = "Small steps every day lead to big results. Keep going! ✨";

/// The single cached motivational quote. Writing a new one fully replaces
/// the old; validity is derived from the timestamp, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CachedQuote {
    pub quote: String,
    /// Creation time in milliseconds since the epoch.
    pub timestamp: u64,
}

impl CachedQuote {
    pub fn new(quote: impl Into<String>, now_ms: u64) -> Self {
        Self {
            quote: quote.into(),
            timestamp: now_ms,
        }
    }

    /// Fresh while less than the TTL has elapsed.
    pub fn is_valid(&self, now_ms: u64) -> bool {
        now_ms.saturating_sub(self.timestamp) < QUOTE_TTL_MS
    }

    /// Seconds until this quote expires, rounded up; 0 once stale.
    pub fn seconds_remaining(&self, now_ms: u64) -> u64 {
        let elapsed = now_ms.saturating_sub(self.timestamp);
        QUOTE_TTL_MS.saturating_sub(elapsed).div_ceil(1000)
    }
}
