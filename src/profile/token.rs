// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Token model for search-profile templates
//!
//! A parsed profile is a flat, ordered sequence of [`Token`]s. Field clauses
//! are not nested structures: a clause is a `Field` immediately followed by
//! its `Placeholder` and zero or more `Decoration`s.
//!
//! ```text
//! MUST ( SHOULD firstname <firstname> BOOST 2 )
//!   │  │    │       │           │       └─ Decoration(Boost(2))
//!   │  │    │       │           └───────── Placeholder("firstname")
//!   │  │    │       └───────────────────── Field("firstname")
//!   │  │    └───────────────────────────── FieldModifier(Should)
//!   │  └────────────────────────────────── GroupOpen
//!   └───────────────────────────────────── GroupModifier(Must)
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

/// Boolean occurrence marker for a group or a single field clause
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Modifier {
    /// Clause must match: `+`
    Must,
    /// Clause may match (no prefix)
    Should,
    /// Clause must not match: `-`
    MustNot,
}

impl Modifier {
    /// Match a template keyword (case-insensitive)
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("MUST") {
            Some(Self::Must)
        } else if word.eq_ignore_ascii_case("SHOULD") {
            Some(Self::Should)
        } else if word.eq_ignore_ascii_case("MUSTNOT") {
            Some(Self::MustNot)
        } else {
            None
        }
    }

    /// Template keyword for this modifier
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Must => "MUST",
            Self::Should => "SHOULD",
            Self::MustNot => "MUSTNOT",
        }
    }

    /// Query-syntax prefix: `+`, `-` or nothing
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Must => "+",
            Self::Should => "",
            Self::MustNot => "-",
        }
    }
}

/// Field clause decoration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decoration {
    /// Relevance weight: `^n`
    Boost(u32),
    /// Edit distance: `~n`
    Fuzzy(u32),
    /// Trailing `*` on the value
    Wildcard,
    /// Use the placeholder text itself as the value
    Constant,
}

impl Decoration {
    /// Template keyword for this decoration
    pub fn keyword(self) -> &'static str {
        match self {
            Self::Boost(_) => "BOOST",
            Self::Fuzzy(_) => "FUZZY",
            Self::Wildcard => "WILDCARD",
            Self::Constant => "CONSTANT",
        }
    }

    /// True for the keywords that take an integer argument
    pub(crate) fn takes_argument(word: &str) -> bool {
        word.eq_ignore_ascii_case("BOOST") || word.eq_ignore_ascii_case("FUZZY")
    }

    pub(crate) fn is_keyword(word: &str) -> bool {
        Self::takes_argument(word)
            || word.eq_ignore_ascii_case("WILDCARD")
            || word.eq_ignore_ascii_case("CONSTANT")
    }
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Boost(n) | Self::Fuzzy(n) => write!(f, "{} {}", self.keyword(), n),
            Self::Wildcard | Self::Constant => f.write_str(self.keyword()),
        }
    }
}

/// One element of a parsed profile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Token {
    /// `(`
    GroupOpen,
    /// `)`
    GroupClose,
    /// Modifier bound to the whole following group
    GroupModifier(Modifier),
    /// Modifier bound to the next field clause only
    FieldModifier(Modifier),
    /// Search field name
    Field(String),
    /// `<name>` lookup key (also the literal for CONSTANT clauses)
    Placeholder(String),
    /// Decoration of the most recent field clause
    Decoration(Decoration),
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GroupOpen => f.write_str("("),
            Self::GroupClose => f.write_str(")"),
            Self::GroupModifier(m) | Self::FieldModifier(m) => f.write_str(m.keyword()),
            Self::Field(name) => f.write_str(name),
            Self::Placeholder(name) => write!(f, "<{}>", name),
            Self::Decoration(d) => d.fmt(f),
        }
    }
}
