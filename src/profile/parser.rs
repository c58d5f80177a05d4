// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Profile Parser
//!
//! Parses a search-profile template into a flat [`Token`] sequence.
//!
//! # Grammar
//!
//! ```text
//! template   := group ( group )*
//! group      := [ modifier ] '(' clause+ ')'
//! clause     := [ modifier ] fieldName '<' placeholderName '>' decoration*
//! decoration := 'BOOST' integer | 'FUZZY' integer | 'WILDCARD' | 'CONSTANT'
//! modifier   := 'MUST' | 'SHOULD' | 'MUSTNOT'
//! ```
//!
//! Keywords are case-insensitive. A modifier is a group modifier when the
//! next lexeme is `(`, otherwise it is a field modifier for the next clause.
//!
//! Malformed templates never panic: [`ProfileParser::parse`] reports failure
//! through [`ParseOutcome::success`] and keeps the tokens produced up to the
//! error.

use thiserror::Error;
use tracing::{debug, warn};

use super::compiled::Profile;
use super::lexer::{tokenize, Lexeme, LexemeKind};
use super::token::{Decoration, Modifier, Token};
use crate::metrics;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("syntax error at offset {position}: {message}")]
    Syntax { position: usize, message: String },
    #[error("{decoration} at offset {position} has no field clause to decorate")]
    DanglingDecoration {
        position: usize,
        decoration: &'static str,
    },
}

impl ProfileError {
    pub(crate) fn syntax(position: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            position,
            message: message.into(),
        }
    }

    /// Byte offset in the template where parsing stopped
    pub fn position(&self) -> usize {
        match self {
            Self::Syntax { position, .. } | Self::DanglingDecoration { position, .. } => *position,
        }
    }
}

/// Result of parsing a template: success flag plus the token sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOutcome {
    tokens: Vec<Token>,
    error: Option<ProfileError>,
}

impl ParseOutcome {
    /// Whether the whole template parsed
    pub fn success(&self) -> bool {
        self.error.is_none()
    }

    /// Tokens produced (partial on failure)
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn error(&self) -> Option<&ProfileError> {
        self.error.as_ref()
    }

    /// `(success, tokens)`
    pub fn into_parts(self) -> (bool, Vec<Token>) {
        (self.error.is_none(), self.tokens)
    }

    /// Convert into a shareable [`Profile`], or the parse error
    pub fn into_profile(self) -> Result<Profile, ProfileError> {
        match self.error {
            None => Ok(Profile::from_validated(self.tokens)),
            Some(e) => Err(e),
        }
    }
}

/// Search-profile template parser
pub struct ProfileParser;

impl ProfileParser {
    /// Parse a template into tokens.
    ///
    /// Deterministic: the same template always yields the same outcome.
    pub fn parse(template: &str) -> ParseOutcome {
        let mut tokens = Vec::new();
        let result = tokenize(template)
            .and_then(|lexemes| Self::parse_lexemes(&lexemes, template.len(), &mut tokens));

        match result {
            Ok(()) => {
                let groups = tokens.iter().filter(|t| **t == Token::GroupOpen).count();
                debug!(tokens = tokens.len(), groups, "Search profile parsed");
                metrics::record_parse("ok");
                ParseOutcome { tokens, error: None }
            }
            Err(e) => {
                warn!(position = e.position(), error = %e, "Search profile failed to parse");
                metrics::record_parse("error");
                ParseOutcome {
                    tokens,
                    error: Some(e),
                }
            }
        }
    }

    /// `end` is the template length, reported when input runs out
    fn parse_lexemes(
        lexemes: &[Lexeme],
        end: usize,
        tokens: &mut Vec<Token>,
    ) -> Result<(), ProfileError> {
        let mut in_group = false;
        let mut group_has_clause = false;
        // A field clause is open once its placeholder is read; decorations attach to it
        let mut clause_open = false;
        let mut iter = lexemes.iter().peekable();

        if lexemes.is_empty() {
            return Err(ProfileError::syntax(0, "empty template"));
        }

        while let Some(lexeme) = iter.next() {
            let position = lexeme.position;
            match &lexeme.kind {
                LexemeKind::Open => {
                    if in_group {
                        return Err(ProfileError::syntax(position, "groups do not nest"));
                    }
                    tokens.push(Token::GroupOpen);
                    in_group = true;
                    group_has_clause = false;
                    clause_open = false;
                }
                LexemeKind::Close => {
                    if !in_group {
                        return Err(ProfileError::syntax(position, "unbalanced ')'"));
                    }
                    if !group_has_clause {
                        return Err(ProfileError::syntax(position, "empty group"));
                    }
                    tokens.push(Token::GroupClose);
                    in_group = false;
                    clause_open = false;
                }
                LexemeKind::Placeholder(name) => {
                    return Err(ProfileError::syntax(
                        position,
                        format!("placeholder <{}> without a preceding field", name),
                    ));
                }
                LexemeKind::Word(word) => {
                    if let Some(modifier) = Modifier::from_keyword(word) {
                        let next = iter.peek().map(|l| &l.kind);
                        if next == Some(&LexemeKind::Open) {
                            if in_group {
                                return Err(ProfileError::syntax(position, "groups do not nest"));
                            }
                            tokens.push(Token::GroupModifier(modifier));
                        } else {
                            if !in_group {
                                return Err(ProfileError::syntax(
                                    position,
                                    format!("{} must precede '(' outside a group", word),
                                ));
                            }
                            tokens.push(Token::FieldModifier(modifier));
                            let field = iter.next();
                            Self::parse_field(field, end, word, tokens, &mut iter)?;
                            group_has_clause = true;
                            clause_open = true;
                        }
                    } else if Decoration::is_keyword(word) {
                        if !in_group {
                            return Err(ProfileError::syntax(
                                position,
                                format!("{} outside a group", word),
                            ));
                        }
                        let decoration = Self::parse_decoration(word, end, &mut iter)?;
                        if !clause_open {
                            return Err(ProfileError::DanglingDecoration {
                                position,
                                decoration: decoration.keyword(),
                            });
                        }
                        tokens.push(Token::Decoration(decoration));
                    } else {
                        if !in_group {
                            return Err(ProfileError::syntax(
                                position,
                                format!("field '{}' outside a group", word),
                            ));
                        }
                        Self::parse_field(Some(lexeme), end, "'('", tokens, &mut iter)?;
                        group_has_clause = true;
                        clause_open = true;
                    }
                }
            }
        }

        if in_group {
            return Err(ProfileError::syntax(end, "unclosed group"));
        }
        Ok(())
    }

    /// Parse `fieldName <placeholder>` starting at `field`.
    fn parse_field<'a>(
        field: Option<&'a Lexeme>,
        end: usize,
        after: &str,
        tokens: &mut Vec<Token>,
        iter: &mut impl Iterator<Item = &'a Lexeme>,
    ) -> Result<(), ProfileError> {
        let field = field.ok_or_else(|| {
            ProfileError::syntax(end, format!("expected field name after {}", after))
        })?;
        let name = match &field.kind {
            LexemeKind::Word(word) if is_field_name(word) => word,
            LexemeKind::Word(word) => {
                return Err(ProfileError::syntax(
                    field.position,
                    format!("'{}' is not a valid field name", word),
                ));
            }
            _ => {
                return Err(ProfileError::syntax(
                    field.position,
                    format!("expected field name after {}", after),
                ));
            }
        };
        tokens.push(Token::Field(name.clone()));

        match iter.next() {
            Some(Lexeme {
                kind: LexemeKind::Placeholder(key),
                ..
            }) => {
                tokens.push(Token::Placeholder(key.clone()));
                Ok(())
            }
            Some(other) => Err(ProfileError::syntax(
                other.position,
                format!("field '{}' is missing its <placeholder>", name),
            )),
            None => Err(ProfileError::syntax(
                end,
                format!("field '{}' is missing its <placeholder>", name),
            )),
        }
    }

    fn parse_decoration<'a>(
        word: &str,
        end: usize,
        iter: &mut impl Iterator<Item = &'a Lexeme>,
    ) -> Result<Decoration, ProfileError> {
        if word.eq_ignore_ascii_case("WILDCARD") {
            return Ok(Decoration::Wildcard);
        }
        if word.eq_ignore_ascii_case("CONSTANT") {
            return Ok(Decoration::Constant);
        }

        let argument = iter.next();
        let value = match argument.map(|l| &l.kind) {
            Some(LexemeKind::Word(arg)) if is_plain_integer(arg) => arg.parse::<u32>().ok(),
            _ => None,
        };
        let value = value.ok_or_else(|| {
            ProfileError::syntax(
                argument.map(|l| l.position).unwrap_or(end),
                format!("{} expects a non-negative integer", word.to_ascii_uppercase()),
            )
        })?;

        if word.eq_ignore_ascii_case("BOOST") {
            Ok(Decoration::Boost(value))
        } else {
            Ok(Decoration::Fuzzy(value))
        }
    }
}

/// Digits only, without a sign or leading zeros, so the argument renders as written
fn is_plain_integer(word: &str) -> bool {
    !word.is_empty()
        && word.bytes().all(|b| b.is_ascii_digit())
        && (word == "0" || !word.starts_with('0'))
}

/// Field names start with a letter or `_`; `.` and `-` are allowed after that
fn is_field_name(word: &str) -> bool {
    let mut chars = word.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '-'))
        && Modifier::from_keyword(word).is_none()
        && !Decoration::is_keyword(word)
}
