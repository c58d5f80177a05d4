// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Compiled search profile
//!
//! A [`Profile`] is the read-only result of a successful parse. Its token
//! sequence sits behind an `Arc<[Token]>`, so clones are cheap and any
//! number of threads can render the same profile at once. There is no
//! mutable access after construction.
//!
//! ```rust
//! use search_profile::{FieldValues, Profile, RenderOptions};
//!
//! let profile = Profile::compile("MUST (id <id>) (name <name> FUZZY 1)").unwrap();
//! let values = FieldValues::new().with("ID", "42");
//! let query = profile.render(&values, &RenderOptions::default()).unwrap();
//! assert_eq!(query, "+( id:(42) )");
//! ```

use std::fmt;
use std::sync::Arc;

use super::parser::{ProfileError, ProfileParser};
use super::renderer::{QueryRenderer, RenderError, RenderOptions};
use super::token::{Decoration, Token};
use super::values::FieldValues;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    tokens: Arc<[Token]>,
}

impl Profile {
    /// Parse a template into a shareable profile
    pub fn compile(template: &str) -> Result<Self, ProfileError> {
        ProfileParser::parse(template).into_profile()
    }

    pub(crate) fn from_validated(tokens: Vec<Token>) -> Self {
        Self {
            tokens: tokens.into(),
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn group_count(&self) -> usize {
        self.tokens.iter().filter(|t| **t == Token::GroupOpen).count()
    }

    /// Distinct lookup keys this profile reads from [`FieldValues`], in
    /// source order. CONSTANT placeholders are excluded.
    pub fn placeholders(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = Vec::new();
        for (index, token) in self.tokens.iter().enumerate() {
            let Token::Placeholder(name) = token else {
                continue;
            };
            let constant = self.tokens[index + 1..]
                .iter()
                .take_while(|t| matches!(t, Token::Decoration(_)))
                .any(|t| *t == Token::Decoration(Decoration::Constant));
            if !constant && !keys.iter().any(|k| k.to_lowercase() == name.to_lowercase()) {
                keys.push(name);
            }
        }
        keys
    }

    /// Render against one request's values
    pub fn render(&self, values: &FieldValues, options: &RenderOptions) -> Result<String, RenderError> {
        QueryRenderer::render_with(&self.tokens, values, options)
    }
}

/// Canonical template text; reparses to the same tokens
impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for token in self.tokens.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}", token)?;
        }
        Ok(())
    }
}
