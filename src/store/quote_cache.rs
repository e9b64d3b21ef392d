use super::Store;
use crate::core::quote::{CachedQuote, FALLBACK_QUOTE};
use crate::remote::QuoteSource;

/// The single cached-quote slot: reuse while fresh, fetch when empty or
/// expired, always replace on an explicit refresh. A failed fetch stores the
/// local fallback under the same TTL instead of surfacing an error.
pub struct QuoteCache<'a> {
    store: &'a Store,
}

impl<'a> QuoteCache<'a> {
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Whatever is in the slot, fresh or stale.
    pub fn current(&self) -> Option<CachedQuote> {
        self.store.quote()
    }

    /// Countdown until the slot expires; 0 when empty or already stale.
    pub fn seconds_remaining(&self, now_ms: u64) -> u64 {
        self.current()
            .map(|q| q.seconds_remaining(now_ms))
            .unwrap_or(0)
    }

    /// Reuse the stored quote when it is still valid (no network call);
    /// otherwise fetch a new one and store it.
    pub async fn initialize<S: QuoteSource>(&self, source: &S, now_ms: u64) -> CachedQuote {
        if let Some(stored) = self.store.quote() {
            if stored.is_valid(now_ms) {
                return stored;
            }
        }
        self.fetch_and_store(source, now_ms).await
    }

    /// User-triggered refresh: always fetches, bypassing the TTL guard.
    /// Last write wins.
    pub async fn change_quote<S: QuoteSource>(&self, source: &S, now_ms: u64) -> CachedQuote {
        self.fetch_and_store(source, now_ms).await
    }

    async fn fetch_and_store<S: QuoteSource>(&self, source: &S, now_ms: u64) -> CachedQuote {
        let text = match source.fetch_quote().await {
            Ok(text) => text,
            Err(e) => {
                log::error!("Quote fetch error: {}", e);
                FALLBACK_QUOTE.to_string()
            }
        };
        let quote = CachedQuote::new(text, now_ms);
        self.store.save_quote(&quote);
        quote
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::RemoteError;
    use std::cell::Cell;

    /// Counts fetches and hands out numbered quotes.
    struct CountingSource {
        calls: Cell<u32>,
    }

    impl CountingSource {
        fn new() -> Self {
            Self { calls: Cell::new(0) }
        }
    }

    impl QuoteSource for CountingSource {
        async fn fetch_quote(&self) -> Result<String, RemoteError> {
            self.calls.set(self.calls.get() + 1);
            Ok(format!("quote #{}", self.calls.get()))
        }
    }

    struct FailingSource;

    impl QuoteSource for FailingSource {
        async fn fetch_quote(&self) -> Result<String, RemoteError> {
            Err(RemoteError::Http("connection refused".to_string()))
        }
    }

    fn temp_store() -> (tempfile::TempDir, Store) {
        let dir = tempfile::tempdir().unwrap();
        let store = Store::open_at(dir.path());
        (dir, store)
    }

    const MIN_MS: u64 = 60 * 1000;

    #[tokio::test]
    async fn initialize_fetches_when_empty() {
        let (_dir, store) = temp_store();
        let cache = QuoteCache::new(&store);
        let source = CountingSource::new();

        let quote = cache.initialize(&source, 0).await;
        assert_eq!(quote.quote, "quote #1");
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn initialize_reuses_valid_quote_without_fetching() {
        let (_dir, store) = temp_store();
        let cache = QuoteCache::new(&store);
        let source = CountingSource::new();

        cache.initialize(&source, 0).await;
        let again = cache.initialize(&source, 5 * MIN_MS).await;
        assert_eq!(again.quote, "quote #1");
        assert_eq!(source.calls.get(), 1);
    }

    #[tokio::test]
    async fn initialize_refetches_past_ttl() {
        let (_dir, store) = temp_store();
        let cache = QuoteCache::new(&store);
        let source = CountingSource::new();

        cache.initialize(&source, 0).await;
        let fresh = cache.initialize(&source, 11 * MIN_MS).await;
        assert_eq!(fresh.quote, "quote #2");
        assert_eq!(source.calls.get(), 2);
        assert_eq!(fresh.timestamp, 11 * MIN_MS);
    }

    #[tokio::test]
    async fn change_quote_bypasses_ttl() {
        let (_dir, store) = temp_store();
        let cache = QuoteCache::new(&store);
        let source = CountingSource::new();

        cache.initialize(&source, 0).await;
        let forced = cache.change_quote(&source, MIN_MS).await;
        assert_eq!(forced.quote, "quote #2");
        assert_eq!(source.calls.get(), 2);
        assert_eq!(cache.current().unwrap().quote, "quote #2");
    }

    #[tokio::test]
    async fn failure_stores_fallback_under_same_ttl() {
        let (_dir, store) = temp_store();
        let cache = QuoteCache::new(&store);

        let quote = cache.initialize(&FailingSource, 0).await;
        assert_eq!(quote.quote, FALLBACK_QUOTE);
        assert_eq!(quote.timestamp, 0);

        // The fallback counts as a real quote: still valid at five minutes.
        let source = CountingSource::new();
        let again = cache.initialize(&source, 5 * MIN_MS).await;
        assert_eq!(again.quote, FALLBACK_QUOTE);
        assert_eq!(source.calls.get(), 0);
    }

    #[tokio::test]
    async fn countdown_reflects_slot_age() {
        let (_dir, store) = temp_store();
        let cache = QuoteCache::new(&store);
        assert_eq!(cache.seconds_remaining(0), 0);

        let source = CountingSource::new();
        cache.initialize(&source, 0).await;
        assert_eq!(cache.seconds_remaining(0), 600);
        assert_eq!(cache.seconds_remaining(9 * MIN_MS), 60);
        assert_eq!(cache.seconds_remaining(10 * MIN_MS), 0);
    }
}
