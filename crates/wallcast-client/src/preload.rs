//! Best-effort media prefetch.
//!
//! The slideshow hints at the next image before it is displayed; the cache
//! fetches the bytes in a detached task so the eventual render finds them
//! warm. Nothing here is load-bearing: failures are logged at debug and
//! dropped.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use dashmap::{DashMap, DashSet};
use tracing::debug;

/// Default cap on cached media entries.
const MAX_ENTRIES: usize = 32;

pub struct MediaCache {
    client: reqwest::Client,
    entries: DashMap<String, Vec<u8>>,
    inflight: DashSet<String>,
    /// Insertion order, for eviction once over capacity.
    order: Mutex<VecDeque<String>>,
    capacity: usize,
}

impl MediaCache {
    pub fn new() -> Self {
        Self::with_capacity(MAX_ENTRIES)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            client: reqwest::Client::new(),
            entries: DashMap::new(),
            inflight: DashSet::new(),
            order: Mutex::new(VecDeque::new()),
            capacity: capacity.max(1),
        }
    }

    /// Fire-and-forget prefetch. No-op if the bytes are already cached or a
    /// fetch for the same URL is in flight.
    pub fn preload(self: &Arc<Self>, location: &str) {
        if self.entries.contains_key(location) {
            debug!(%location, "preload hit, already cached");
            return;
        }
        if !self.inflight.insert(location.to_string()) {
            return;
        }
        let cache = Arc::clone(self);
        let location = location.to_string();
        tokio::spawn(async move {
            match cache.fetch(&location).await {
                Ok(bytes) => cache.store(&location, bytes),
                Err(e) => debug!(%location, error = %e, "preload failed"),
            }
            cache.inflight.remove(&location);
        });
    }

    /// Cached bytes for a URL, if any.
    pub fn get(&self, location: &str) -> Option<Vec<u8>> {
        self.entries.get(location).map(|e| e.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    async fn fetch(&self, location: &str) -> reqwest::Result<Vec<u8>> {
        let resp = self.client.get(location).send().await?.error_for_status()?;
        let bytes = resp.bytes().await?;
        Ok(bytes.to_vec())
    }

    fn store(&self, location: &str, bytes: Vec<u8>) {
        debug!(%location, size = bytes.len(), "media cached");
        self.entries.insert(location.to_string(), bytes);

        let mut order = self.order.lock().unwrap();
        order.push_back(location.to_string());
        while order.len() > self.capacity {
            if let Some(oldest) = order.pop_front() {
                self.entries.remove(&oldest);
            }
        }
    }
}

impl Default for MediaCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_and_get() {
        let cache = MediaCache::with_capacity(4);
        cache.store("https://x/a.png", vec![1, 2, 3]);
        assert_eq!(cache.get("https://x/a.png"), Some(vec![1, 2, 3]));
        assert!(cache.get("https://x/missing.png").is_none());
    }

    #[test]
    fn eviction_keeps_newest() {
        let cache = MediaCache::with_capacity(2);
        cache.store("u1", vec![1]);
        cache.store("u2", vec![2]);
        cache.store("u3", vec![3]);

        assert_eq!(cache.len(), 2);
        assert!(cache.get("u1").is_none());
        assert!(cache.get("u2").is_some());
        assert!(cache.get("u3").is_some());
    }
}
