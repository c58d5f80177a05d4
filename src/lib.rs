//! # Search Profile
//!
//! A compiler for search-profile templates: a compact boolean-query template
//! language that renders, per request, into a full-text query string.
//!
//! ## Architecture
//!
//! Two phases, used in strict order:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     Parse (once per template)               │
//! │  • Lexes and parses the template into a flat Token sequence │
//! │  • Decides group vs field modifiers by lookahead for '('    │
//! │  • Syntax errors reported via ParseOutcome, never a panic   │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                (Profile: Arc<[Token]>, read-only)
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                    Render (once per request)                │
//! │  • Resolves placeholders against case-insensitive values    │
//! │  • Drops groups under the minimum resolved-clause count     │
//! │  • Applies BOOST / FUZZY / WILDCARD / CONSTANT decorations  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use search_profile::{FieldValues, ProfileConfig};
//!
//! let config = ProfileConfig::default();
//! let cache = config.build_cache();
//!
//! let profile = cache
//!     .get_or_compile("(MUST firstname <firstname> BOOST 23 lastname <lastname> CONSTANT FUZZY 5)")
//!     .expect("valid template");
//!
//! let values = FieldValues::from([("FirstName", "test")]);
//! let query = profile.render(&values, &config.render_options()).unwrap();
//! assert_eq!(query, "( +firstname:(test^23) lastname:(lastname) )");
//! ```
//!
//! ## Modules
//!
//! - [`profile`]: Parser, renderer, token model and compiled-profile cache
//! - [`config`]: Render and cache settings
//! - [`metrics`]: Parse/render/cache instrumentation

pub mod config;
pub mod metrics;
pub mod profile;

pub use config::ProfileConfig;
pub use profile::{
    Decoration, FieldValues, Modifier, ParseOutcome, Profile, ProfileCache, ProfileCacheStats,
    ProfileError, ProfileParser, QueryRenderer, RenderError, RenderOptions, Token,
    UnresolvedPolicy,
};
pub use crate::metrics::LatencyTimer;
