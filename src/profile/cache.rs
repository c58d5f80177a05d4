// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Compiled Profile Cache
//!
//! Parses each distinct template once and hands out shared [`Profile`]s to
//! every render call after that.
//!
//! # Flow
//!
//! ```text
//! Template arrives
//!       │
//!       ▼
//! ┌─────────────────────────────┐
//! │  Cache lookup               │
//! │  key = template text        │
//! └─────────────────────────────┘
//!       │
//!       ├─→ Hit → clone the shared Profile
//!       │
//!       └─→ Miss → parse, cache on success
//! ```
//!
//! Failed templates are never cached; every lookup re-reports the error.
//! Bounded by max entries with oldest-eviction.

use dashmap::DashMap;
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

use super::compiled::Profile;
use super::parser::ProfileError;
use crate::metrics;

/// Cache of compiled profiles keyed by template text
pub struct ProfileCache {
    profiles: DashMap<String, Profile>,
    /// Insertion order for eviction (oldest first)
    order: Mutex<VecDeque<String>>,
    max_entries: usize,
    hits: AtomicU64,
    misses: AtomicU64,
    evictions: AtomicU64,
}

/// Cache statistics
#[derive(Debug, Clone)]
pub struct ProfileCacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Current number of entries
    pub entry_count: usize,
    /// Hit rate (0.0 - 1.0)
    pub hit_rate: f64,
}

impl ProfileCache {
    /// Create a new cache with the given max entries
    pub fn new(max_entries: usize) -> Self {
        Self {
            profiles: DashMap::new(),
            order: Mutex::new(VecDeque::new()),
            max_entries: max_entries.max(1),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
            evictions: AtomicU64::new(0),
        }
    }

    /// Return the cached profile for `template`, compiling it on a miss
    pub fn get_or_compile(&self, template: &str) -> Result<Profile, ProfileError> {
        if let Some(profile) = self.get(template) {
            return Ok(profile);
        }

        let profile = Profile::compile(template)?;
        self.insert(template, profile.clone());
        Ok(profile)
    }

    /// Look up a previously compiled profile
    pub fn get(&self, template: &str) -> Option<Profile> {
        match self.profiles.get(template) {
            Some(entry) => {
                self.hits.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_lookup(true);
                Some(entry.value().clone())
            }
            None => {
                self.misses.fetch_add(1, Ordering::Relaxed);
                metrics::record_cache_lookup(false);
                None
            }
        }
    }

    fn insert(&self, template: &str, profile: Profile) {
        let mut order = self.order.lock();

        // Another caller compiled the same template first
        if self.profiles.contains_key(template) {
            return;
        }

        let mut evicted = 0;
        while self.profiles.len() >= self.max_entries {
            match order.pop_front() {
                Some(old) => {
                    self.profiles.remove(&old);
                    evicted += 1;
                }
                None => break,
            }
        }
        if evicted > 0 {
            self.evictions.fetch_add(evicted as u64, Ordering::Relaxed);
            metrics::record_cache_eviction(evicted);
            debug!(evicted, max_entries = self.max_entries, "Evicted compiled search profiles");
        }

        self.profiles.insert(template.to_string(), profile);
        order.push_back(template.to_string());
        metrics::set_cache_entries(self.profiles.len());
    }

    /// Get cache statistics
    pub fn stats(&self) -> ProfileCacheStats {
        let hits = self.hits.load(Ordering::Relaxed);
        let misses = self.misses.load(Ordering::Relaxed);
        let total = hits + misses;

        ProfileCacheStats {
            hits,
            misses,
            evictions: self.evictions.load(Ordering::Relaxed),
            entry_count: self.profiles.len(),
            hit_rate: if total > 0 {
                hits as f64 / total as f64
            } else {
                0.0
            },
        }
    }

    /// Clear all cached profiles
    pub fn clear(&self) {
        let mut order = self.order.lock();
        self.profiles.clear();
        order.clear();
        metrics::set_cache_entries(0);
    }
}

impl Default for ProfileCache {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEMPLATE: &str = "MUST (id <id>)";

    #[test]
    fn test_miss_then_hit() {
        let cache = ProfileCache::new(10);

        let first = cache.get_or_compile(TEMPLATE).unwrap();
        let second = cache.get_or_compile(TEMPLATE).unwrap();
        assert_eq!(first, second);

        let stats = cache.stats();
        assert_eq!(stats.misses, 1);
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.entry_count, 1);
    }

    #[test]
    fn test_failed_template_not_cached() {
        let cache = ProfileCache::new(10);

        assert!(cache.get_or_compile("(id)").is_err());
        assert!(cache.get_or_compile("(id)").is_err());

        let stats = cache.stats();
        assert_eq!(stats.entry_count, 0);
        assert_eq!(stats.misses, 2);
    }

    #[test]
    fn test_hit_rate() {
        let cache = ProfileCache::new(10);
        cache.get_or_compile(TEMPLATE).unwrap();
        cache.get_or_compile(TEMPLATE).unwrap();
        cache.get_or_compile(TEMPLATE).unwrap();
        cache.get_or_compile(TEMPLATE).unwrap();

        // 3 hits, 1 miss
        let stats = cache.stats();
        assert!((stats.hit_rate - 0.75).abs() < 0.01);
    }

    #[test]
    fn test_eviction_oldest() {
        let cache = ProfileCache::new(3);

        cache.get_or_compile("(a <a>)").unwrap();
        cache.get_or_compile("(b <b>)").unwrap();
        cache.get_or_compile("(c <c>)").unwrap();
        assert_eq!(cache.stats().entry_count, 3);

        // 4th evicts the oldest
        cache.get_or_compile("(d <d>)").unwrap();
        let stats = cache.stats();
        assert_eq!(stats.entry_count, 3);
        assert_eq!(stats.evictions, 1);

        assert!(cache.get("(a <a>)").is_none());
        assert!(cache.get("(d <d>)").is_some());
    }

    #[test]
    fn test_clear() {
        let cache = ProfileCache::new(3);
        cache.get_or_compile(TEMPLATE).unwrap();
        cache.clear();
        assert_eq!(cache.stats().entry_count, 0);
        assert!(cache.get(TEMPLATE).is_none());
    }

    #[test]
    fn test_shared_across_threads() {
        let cache = ProfileCache::new(8);
        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..50 {
                        cache.get_or_compile(TEMPLATE).unwrap();
                    }
                });
            }
        });
        let stats = cache.stats();
        assert_eq!(stats.entry_count, 1);
        assert_eq!(stats.hits + stats.misses, 200);
    }
}
