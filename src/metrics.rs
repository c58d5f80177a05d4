// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the search-profile compiler.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The host process is responsible for choosing the exporter (Prometheus, OTEL, etc.)
//!
//! # Metric Naming Convention
//! - `search_profile_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `status`: ok, error
//! - `result`: hit, miss (profile cache)

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Histogram of wall-clock time spent in one render
pub const RENDER_SECONDS: &str = "search_profile_render_seconds";

/// Record a template parse
pub fn record_parse(status: &str) {
    counter!(
        "search_profile_parse_total",
        "status" => status.to_string()
    )
    .increment(1);
}

/// Record a completed render and how many of its groups were emitted
pub fn record_render(groups: usize, emitted: usize) {
    counter!("search_profile_render_total").increment(1);
    histogram!("search_profile_render_groups").record(groups as f64);
    histogram!("search_profile_render_groups_emitted").record(emitted as f64);
}

/// Record a group omitted for having too few resolved clauses
pub fn record_group_dropped() {
    counter!("search_profile_groups_dropped_total").increment(1);
}

/// Record an unresolved clause omitted from an emitted group
pub fn record_clause_dropped() {
    counter!("search_profile_clauses_dropped_total").increment(1);
}

/// Record a duration into the named `_seconds` histogram
pub fn record_latency(metric: &'static str, duration: Duration) {
    histogram!(metric).record(duration.as_secs_f64());
}

// ═══════════════════════════════════════════════════════════════════════════
// PROFILE CACHE
// ═══════════════════════════════════════════════════════════════════════════

/// Record a profile cache lookup
pub fn record_cache_lookup(hit: bool) {
    counter!(
        "search_profile_cache_lookups_total",
        "result" => if hit { "hit" } else { "miss" }
    )
    .increment(1);
}

/// Record profiles evicted from the cache
pub fn record_cache_eviction(count: usize) {
    counter!("search_profile_cache_evictions_total").increment(count as u64);
}

/// Set current number of cached profiles
pub fn set_cache_entries(count: usize) {
    gauge!("search_profile_cache_entries").set(count as f64);
}

/// Timer guard that records latency on drop
pub struct LatencyTimer {
    metric: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer for the given histogram, e.g. [`RENDER_SECONDS`]
    pub fn new(metric: &'static str) -> Self {
        Self {
            metric,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.metric, self.start.elapsed());
    }
}
