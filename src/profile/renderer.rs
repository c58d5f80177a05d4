// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Query Renderer
//!
//! Renders a parsed token sequence plus runtime values into a boolean
//! full-text query string.
//!
//! # Output Syntax
//!
//! ```text
//! query  := group ( ' ' group )*
//! group  := ['+'|'-'] '( ' clause ( ' ' clause )* ' )'
//! clause := ['+'|'-'] field ':(' value ['^' boost] ['~' fuzzy] ['*'] ')'
//! ```
//!
//! A CONSTANT clause renders its placeholder text verbatim and takes
//! precedence over FUZZY and WILDCARD, which are not applied to it. BOOST
//! still applies.
//!
//! Each group is rendered in two passes: every clause is resolved first,
//! then the group is either emitted (resolved clauses only) or dropped
//! entirely when fewer than `min_resolved_per_group` clauses resolved.
//! Nothing is written for a group until that decision is made.

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::token::{Decoration, Modifier, Token};
use super::values::FieldValues;
use crate::metrics::{self, LatencyTimer};

/// Token sequence violates the profile invariants.
///
/// Only hand-built or corrupted token sequences produce these; sequences
/// from a successful parse always render.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    #[error("token {index}: field has no placeholder")]
    FieldWithoutPlaceholder { index: usize },
    #[error("token {index}: placeholder has no preceding field")]
    PlaceholderWithoutField { index: usize },
    #[error("token {index}: decoration has no field clause")]
    DecorationWithoutField { index: usize },
    #[error("token {index}: modifier is not followed by a group or field")]
    StrayModifier { index: usize },
    #[error("token {index}: groups do not nest")]
    NestedGroup { index: usize },
    #[error("token {index}: ')' without an open group")]
    UnbalancedClose { index: usize },
    #[error("token {index}: clause outside a group")]
    OutsideGroup { index: usize },
    #[error("group opened at token {index} is never closed")]
    UnclosedGroup { index: usize },
}

/// What to do with a clause whose placeholder has no value
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnresolvedPolicy {
    /// Drop the clause from its group
    #[default]
    Omit,
    /// Render the clause with `unresolved_default` as its value.
    /// Substituted clauses do not count toward `min_resolved_per_group`.
    Substitute,
}

/// Per-call render settings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    /// Groups with fewer resolved clauses are omitted
    pub min_resolved_per_group: usize,
    /// Value used by [`UnresolvedPolicy::Substitute`]
    pub unresolved_default: String,
    pub unresolved_policy: UnresolvedPolicy,
    /// Backslash-escape query-syntax characters inside values
    pub escape_values: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            min_resolved_per_group: 1,
            unresolved_default: String::new(),
            unresolved_policy: UnresolvedPolicy::Omit,
            escape_values: false,
        }
    }
}

impl RenderOptions {
    pub fn with_min_resolved(min_resolved_per_group: usize) -> Self {
        Self {
            min_resolved_per_group,
            ..Default::default()
        }
    }
}

/// Field clause view over the token sequence
#[derive(Debug, Default)]
struct ClauseSpec<'a> {
    modifier: Option<Modifier>,
    field: &'a str,
    placeholder: &'a str,
    boost: Option<u32>,
    fuzzy: Option<u32>,
    wildcard: bool,
    constant: bool,
}

#[derive(Debug, Default)]
struct GroupSpec<'a> {
    modifier: Option<Modifier>,
    clauses: Vec<ClauseSpec<'a>>,
}

/// Search-profile query renderer
pub struct QueryRenderer;

impl QueryRenderer {
    /// Render with the default omission behavior.
    ///
    /// `unresolved_default` is carried for call sites that switch to
    /// [`UnresolvedPolicy::Substitute`] via [`QueryRenderer::render_with`];
    /// here unresolved clauses are always omitted.
    pub fn render(
        tokens: &[Token],
        values: &FieldValues,
        min_resolved_per_group: usize,
        unresolved_default: &str,
    ) -> Result<String, RenderError> {
        let options = RenderOptions {
            min_resolved_per_group,
            unresolved_default: unresolved_default.to_string(),
            ..Default::default()
        };
        Self::render_with(tokens, values, &options)
    }

    /// Render with explicit options
    pub fn render_with(
        tokens: &[Token],
        values: &FieldValues,
        options: &RenderOptions,
    ) -> Result<String, RenderError> {
        let _timer = LatencyTimer::new(metrics::RENDER_SECONDS);
        let groups = Self::plan(tokens)?;

        let mut rendered = Vec::with_capacity(groups.len());
        for (index, group) in groups.iter().enumerate() {
            if let Some(text) = Self::render_group(index, group, values, options) {
                rendered.push(text);
            }
        }

        metrics::record_render(groups.len(), rendered.len());
        Ok(rendered.join(" "))
    }

    fn render_group(
        index: usize,
        group: &GroupSpec<'_>,
        values: &FieldValues,
        options: &RenderOptions,
    ) -> Option<String> {
        // Pass 1: resolve
        let resolved: Vec<Option<&str>> = group
            .clauses
            .iter()
            .map(|clause| Self::resolve(clause, values))
            .collect();
        let count = resolved.iter().filter(|v| v.is_some()).count();

        if count == 0 || count < options.min_resolved_per_group {
            debug!(
                group = index,
                resolved = count,
                required = options.min_resolved_per_group,
                "Dropping search profile group"
            );
            metrics::record_group_dropped();
            return None;
        }

        // Pass 2: emit
        let mut clauses = Vec::with_capacity(group.clauses.len());
        for (clause, value) in group.clauses.iter().zip(resolved) {
            let value = match (value, options.unresolved_policy) {
                (Some(value), _) => value,
                (None, UnresolvedPolicy::Substitute) => options.unresolved_default.as_str(),
                (None, UnresolvedPolicy::Omit) => {
                    metrics::record_clause_dropped();
                    continue;
                }
            };
            clauses.push(Self::render_clause(clause, value, options.escape_values));
        }

        let prefix = group.modifier.map(Modifier::prefix).unwrap_or("");
        Some(format!("{}( {} )", prefix, clauses.join(" ")))
    }

    /// Blank values are unresolved, as are WILDCARD values made only of `*`
    fn resolve<'a>(clause: &ClauseSpec<'a>, values: &'a FieldValues) -> Option<&'a str> {
        if clause.constant {
            return Some(clause.placeholder);
        }
        let value = values.get(clause.placeholder)?;
        let stem = if clause.wildcard {
            value.trim_end_matches('*')
        } else {
            value
        };
        if stem.trim().is_empty() {
            None
        } else {
            Some(value)
        }
    }

    fn render_clause(clause: &ClauseSpec<'_>, value: &str, escape: bool) -> String {
        let fuzzy = clause.fuzzy.filter(|_| !clause.constant);
        let wildcard = clause.wildcard && !clause.constant;
        let value = if wildcard {
            value.trim_end_matches('*')
        } else {
            value
        };
        let value = if escape {
            escape_value(value)
        } else {
            value.to_string()
        };

        let mut out = String::with_capacity(clause.field.len() + value.len() + 8);
        out.push_str(clause.modifier.map(Modifier::prefix).unwrap_or(""));
        out.push_str(clause.field);
        out.push_str(":(");
        out.push_str(&value);
        if let Some(boost) = clause.boost {
            out.push('^');
            out.push_str(&boost.to_string());
        }
        if let Some(fuzzy) = fuzzy {
            out.push('~');
            out.push_str(&fuzzy.to_string());
        }
        if wildcard {
            out.push('*');
        }
        out.push(')');
        out
    }

    /// Group the flat token sequence into clauses, checking invariants.
    fn plan(tokens: &[Token]) -> Result<Vec<GroupSpec<'_>>, RenderError> {
        let mut groups: Vec<GroupSpec<'_>> = Vec::new();
        let mut current: Option<(usize, GroupSpec<'_>)> = None;
        let mut pending_group_modifier: Option<Modifier> = None;
        let mut pending_field_modifier: Option<(usize, Modifier)> = None;
        let mut iter = tokens.iter().enumerate().peekable();

        while let Some((index, token)) = iter.next() {
            match token {
                Token::GroupModifier(modifier) => {
                    if current.is_some() {
                        return Err(RenderError::NestedGroup { index });
                    }
                    if !matches!(iter.peek(), Some((_, Token::GroupOpen))) {
                        return Err(RenderError::StrayModifier { index });
                    }
                    pending_group_modifier = Some(*modifier);
                }
                Token::GroupOpen => {
                    if current.is_some() {
                        return Err(RenderError::NestedGroup { index });
                    }
                    let group = GroupSpec {
                        modifier: pending_group_modifier.take(),
                        clauses: Vec::new(),
                    };
                    current = Some((index, group));
                }
                Token::GroupClose => {
                    if let Some((index, _)) = pending_field_modifier {
                        return Err(RenderError::StrayModifier { index });
                    }
                    match current.take() {
                        Some((_, group)) => groups.push(group),
                        None => return Err(RenderError::UnbalancedClose { index }),
                    }
                }
                Token::FieldModifier(modifier) => {
                    if current.is_none() {
                        return Err(RenderError::OutsideGroup { index });
                    }
                    if !matches!(iter.peek(), Some((_, Token::Field(_)))) {
                        return Err(RenderError::StrayModifier { index });
                    }
                    pending_field_modifier = Some((index, *modifier));
                }
                Token::Field(field) => {
                    let (_, group) = current
                        .as_mut()
                        .ok_or(RenderError::OutsideGroup { index })?;
                    let placeholder = match iter.next() {
                        Some((_, Token::Placeholder(name))) => name.as_str(),
                        _ => return Err(RenderError::FieldWithoutPlaceholder { index }),
                    };
                    group.clauses.push(ClauseSpec {
                        modifier: pending_field_modifier.take().map(|(_, m)| m),
                        field: field.as_str(),
                        placeholder,
                        ..Default::default()
                    });
                }
                Token::Placeholder(_) => {
                    return Err(RenderError::PlaceholderWithoutField { index });
                }
                Token::Decoration(decoration) => {
                    let clause = current
                        .as_mut()
                        .and_then(|(_, group)| group.clauses.last_mut())
                        .ok_or(RenderError::DecorationWithoutField { index })?;
                    match decoration {
                        Decoration::Boost(n) => clause.boost = Some(*n),
                        Decoration::Fuzzy(n) => clause.fuzzy = Some(*n),
                        Decoration::Wildcard => clause.wildcard = true,
                        Decoration::Constant => clause.constant = true,
                    }
                }
            }
        }

        if let Some((index, _)) = current {
            return Err(RenderError::UnclosedGroup { index });
        }
        Ok(groups)
    }
}

/// Escape query-syntax special characters, preserving spaces
fn escape_value(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '+' | '-' | '&' | '|' | '!' | '(' | ')' | '{' | '}' | '[' | ']' | '^' | '"' | '~'
            | '*' | '?' | ':' | '\\' | '/' => {
                escaped.push('\\');
                escaped.push(c);
            }
            _ => escaped.push(c),
        }
    }
    escaped
}
