// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Template lexer
//!
//! Splits template text into parentheses, `<placeholder>` lexemes and bare
//! words. Parentheses and placeholders are self-delimiting, so `(MUST` and
//! `name<key>` lex the same as their whitespace-separated forms.

use super::parser::ProfileError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LexemeKind {
    Open,
    Close,
    Placeholder(String),
    Word(String),
}

/// Lexeme with its byte offset in the template
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Lexeme {
    pub kind: LexemeKind,
    pub position: usize,
}

pub(crate) fn tokenize(template: &str) -> Result<Vec<Lexeme>, ProfileError> {
    let mut lexemes = Vec::new();
    let mut chars = template.char_indices().peekable();

    while let Some(&(position, c)) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                lexemes.push(Lexeme { kind: LexemeKind::Open, position });
            }
            ')' => {
                chars.next();
                lexemes.push(Lexeme { kind: LexemeKind::Close, position });
            }
            '<' => {
                chars.next();
                let mut name = String::new();
                let mut closed = false;
                for (_, c) in chars.by_ref() {
                    if c == '>' {
                        closed = true;
                        break;
                    }
                    name.push(c);
                }
                if !closed {
                    return Err(ProfileError::syntax(position, "unterminated placeholder"));
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(ProfileError::syntax(position, "empty placeholder"));
                }
                lexemes.push(Lexeme {
                    kind: LexemeKind::Placeholder(name.to_string()),
                    position,
                });
            }
            '>' => {
                return Err(ProfileError::syntax(position, "unexpected '>'"));
            }
            _ => {
                let mut word = String::new();
                while let Some(&(_, c)) = chars.peek() {
                    if c.is_whitespace() || matches!(c, '(' | ')' | '<' | '>') {
                        break;
                    }
                    word.push(c);
                    chars.next();
                }
                lexemes.push(Lexeme { kind: LexemeKind::Word(word), position });
            }
        }
    }

    Ok(lexemes)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(template: &str) -> Vec<LexemeKind> {
        tokenize(template)
            .unwrap()
            .into_iter()
            .map(|l| l.kind)
            .collect()
    }

    #[test]
    fn test_adjacent_delimiters() {
        assert_eq!(
            kinds("(MUST id<id>)"),
            vec![
                LexemeKind::Open,
                LexemeKind::Word("MUST".into()),
                LexemeKind::Word("id".into()),
                LexemeKind::Placeholder("id".into()),
                LexemeKind::Close,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let lexemes = tokenize("( name <key> )").unwrap();
        let positions: Vec<usize> = lexemes.iter().map(|l| l.position).collect();
        assert_eq!(positions, vec![0, 2, 7, 13]);
    }

    #[test]
    fn test_placeholder_is_trimmed() {
        assert_eq!(kinds("< key >"), vec![LexemeKind::Placeholder("key".into())]);
    }

    #[test]
    fn test_unterminated_placeholder() {
        let err = tokenize("(name <key)").unwrap_err();
        assert!(matches!(err, ProfileError::Syntax { position: 6, .. }));
    }

    #[test]
    fn test_empty_placeholder() {
        assert!(tokenize("(name <  >)").is_err());
    }

    #[test]
    fn test_stray_closing_angle() {
        assert!(tokenize("(name key>)").is_err());
    }

    #[test]
    fn test_empty_template() {
        assert!(tokenize("   ").unwrap().is_empty());
    }
}
