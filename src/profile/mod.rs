// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Search Profile Compiler
//!
//! Compiles profile templates into boolean full-text queries.
//!
//! # Architecture
//!
//! ```text
//! template text
//!     ↓
//! ProfileParser (lexer + parser) → [Token] → Profile (Arc, read-only)
//!     ↓                                          ↓
//! ProfileCache (parse once)          QueryRenderer + FieldValues (per request)
//!                                                ↓
//!                                          query string
//! ```
//!
//! # Template Language
//!
//! ```text
//! (MUST firstname <firstname> BOOST 23 lastname <lastname> CONSTANT)
//! MUSTNOT (status <status>)
//! SHOULD (city <city> FUZZY 2 postcode <postcode> WILDCARD)
//! ```
//!
//! # Rendered Output
//!
//! ```text
//! ( +firstname:(ann^23) lastname:(lastname) ) -( status:(deleted) ) ( city:(leeds~2) )
//! ```

mod cache;
mod compiled;
mod lexer;
mod parser;
mod renderer;
mod token;
mod values;

pub use cache::{ProfileCache, ProfileCacheStats};
pub use compiled::Profile;
pub use parser::{ParseOutcome, ProfileError, ProfileParser};
pub use renderer::{QueryRenderer, RenderError, RenderOptions, UnresolvedPolicy};
pub use token::{Decoration, Modifier, Token};
pub use values::FieldValues;
