//! Configuration for the search-profile compiler.
//!
//! # Example
//!
//! ```
//! use search_profile::{ProfileConfig, UnresolvedPolicy};
//!
//! // Minimal config (uses defaults)
//! let config = ProfileConfig::default();
//! assert_eq!(config.min_resolved_per_group, 1);
//! assert_eq!(config.unresolved_policy, UnresolvedPolicy::Omit);
//!
//! // Full config
//! let config = ProfileConfig {
//!     min_resolved_per_group: 2,
//!     escape_values: true,
//!     ..Default::default()
//! };
//! assert!(config.render_options().escape_values);
//! ```

use serde::Deserialize;

use crate::profile::{ProfileCache, RenderOptions, UnresolvedPolicy};

/// Render and caching settings for search profiles.
///
/// All fields have defaults matching the plain omission behavior.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ProfileConfig {
    /// Groups with fewer resolved clauses are omitted (default: 1)
    #[serde(default = "default_min_resolved_per_group")]
    pub min_resolved_per_group: usize,

    /// Value substituted for unresolved placeholders under `substitute`
    #[serde(default)]
    pub unresolved_default: String,

    /// `omit` (default) or `substitute`
    #[serde(default)]
    pub unresolved_policy: UnresolvedPolicy,

    /// Escape query-syntax characters inside rendered values
    #[serde(default)]
    pub escape_values: bool,

    /// Compiled profile cache size (default: 256)
    #[serde(default = "default_cache_max_entries")]
    pub cache_max_entries: usize,
}

fn default_min_resolved_per_group() -> usize { 1 }
fn default_cache_max_entries() -> usize { 256 }

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            min_resolved_per_group: default_min_resolved_per_group(),
            unresolved_default: String::new(),
            unresolved_policy: UnresolvedPolicy::default(),
            escape_values: false,
            cache_max_entries: default_cache_max_entries(),
        }
    }
}

impl ProfileConfig {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            min_resolved_per_group: self.min_resolved_per_group,
            unresolved_default: self.unresolved_default.clone(),
            unresolved_policy: self.unresolved_policy,
            escape_values: self.escape_values,
        }
    }

    pub fn build_cache(&self) -> ProfileCache {
        ProfileCache::new(self.cache_max_entries)
    }
}
