//! Property-based tests (fuzzing) for the search-profile compiler.
//!
//! Uses proptest to generate random/malformed templates and value maps and
//! verify the parser never panics and rendering keeps its guarantees.
//!
//! Run with: `cargo test --test proptest_fuzz`

use proptest::prelude::*;

use search_profile::{FieldValues, Modifier, Profile, ProfileParser, QueryRenderer};

// =============================================================================
// Strategies for generating test data
// =============================================================================

#[derive(Debug, Clone)]
struct ClauseDef {
    modifier: Option<Modifier>,
    field: String,
    placeholder: String,
    boost: Option<u32>,
    fuzzy: Option<u32>,
    wildcard: bool,
    constant: bool,
}

#[derive(Debug, Clone)]
struct GroupDef {
    modifier: Option<Modifier>,
    clauses: Vec<ClauseDef>,
}

fn modifier_strategy() -> impl Strategy<Value = Option<Modifier>> {
    prop_oneof![
        Just(None),
        Just(Some(Modifier::Must)),
        Just(Some(Modifier::Should)),
        Just(Some(Modifier::MustNot)),
    ]
}

fn clause_strategy() -> impl Strategy<Value = ClauseDef> {
    (
        modifier_strategy(),
        "f_[a-z]{1,6}",
        "p[a-z]{0,3}",
        prop::option::of(0u32..100),
        prop::option::of(0u32..3),
        any::<bool>(),
        prop::bool::weighted(0.2),
    )
        .prop_map(|(modifier, field, placeholder, boost, fuzzy, wildcard, constant)| ClauseDef {
            modifier,
            field,
            placeholder,
            boost,
            fuzzy,
            wildcard,
            constant,
        })
}

fn group_strategy() -> impl Strategy<Value = GroupDef> {
    (modifier_strategy(), prop::collection::vec(clause_strategy(), 1..4))
        .prop_map(|(modifier, clauses)| GroupDef { modifier, clauses })
}

fn template_strategy() -> impl Strategy<Value = Vec<GroupDef>> {
    prop::collection::vec(group_strategy(), 1..4)
}

/// Values for a subset of the `p[a-z]{0,3}` placeholder space
fn values_strategy() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("p[a-z]{0,3}", "[a-z]{1,6}"), 0..12)
}

fn template_text(groups: &[GroupDef]) -> String {
    let mut out = Vec::new();
    for group in groups {
        if let Some(m) = group.modifier {
            out.push(m.keyword().to_string());
        }
        out.push("(".to_string());
        for clause in &group.clauses {
            if let Some(m) = clause.modifier {
                out.push(m.keyword().to_string());
            }
            out.push(format!("{} <{}>", clause.field, clause.placeholder));
            if let Some(n) = clause.boost {
                out.push(format!("BOOST {}", n));
            }
            if let Some(n) = clause.fuzzy {
                out.push(format!("FUZZY {}", n));
            }
            if clause.wildcard {
                out.push("WILDCARD".to_string());
            }
            if clause.constant {
                out.push("CONSTANT".to_string());
            }
        }
        out.push(")".to_string());
    }
    out.join(" ")
}

fn resolved_count(group: &GroupDef, values: &FieldValues) -> usize {
    group
        .clauses
        .iter()
        .filter(|c| c.constant || values.contains(&c.placeholder))
        .count()
}

/// Keyword soup: mostly-valid lexemes in random order
fn lexeme_soup_strategy() -> impl Strategy<Value = String> {
    let lexeme = prop_oneof![
        Just("(".to_string()),
        Just(")".to_string()),
        Just("MUST".to_string()),
        Just("SHOULD".to_string()),
        Just("MUSTNOT".to_string()),
        Just("BOOST".to_string()),
        Just("FUZZY".to_string()),
        Just("WILDCARD".to_string()),
        Just("CONSTANT".to_string()),
        "[0-9]{1,3}",
        "[a-z]{1,5}",
        "<[a-z]{0,4}>?",
    ];
    prop::collection::vec(lexeme, 0..20).prop_map(|v| v.join(" "))
}

// =============================================================================
// Parser Fuzz Tests
// =============================================================================

proptest! {
    /// Parsing never panics on arbitrary text
    #[test]
    fn fuzz_parse_arbitrary_text(template in ".*") {
        let _ = ProfileParser::parse(&template);
    }

    /// Parsing never panics on keyword soup, and failures carry an error
    #[test]
    fn fuzz_parse_lexeme_soup(template in lexeme_soup_strategy()) {
        let outcome = ProfileParser::parse(&template);
        prop_assert_eq!(outcome.success(), outcome.error().is_none());
    }

    /// Successful parses always render (no invariant violations)
    #[test]
    fn fuzz_parsed_soup_renders(template in lexeme_soup_strategy()) {
        let (success, tokens) = ProfileParser::parse(&template).into_parts();
        if success {
            prop_assert!(QueryRenderer::render(&tokens, &FieldValues::new(), 1, "").is_ok());
        }
    }

    /// Well-formed templates parse, deterministically
    #[test]
    fn prop_generated_templates_parse(groups in template_strategy()) {
        let template = template_text(&groups);
        let first = ProfileParser::parse(&template);
        prop_assert!(first.success(), "{}: {:?}", template, first.error());
        prop_assert_eq!(first, ProfileParser::parse(&template));
    }
}

// =============================================================================
// Render Invariant Tests
// =============================================================================

proptest! {
    /// Rendering is pure: same inputs, same output, tokens untouched
    #[test]
    fn prop_render_idempotent(
        groups in template_strategy(),
        pairs in values_strategy(),
        threshold in 0usize..4,
    ) {
        let profile = Profile::compile(&template_text(&groups)).unwrap();
        let before = profile.tokens().to_vec();
        let values: FieldValues = pairs.into_iter().collect();

        let first = QueryRenderer::render(profile.tokens(), &values, threshold, "").unwrap();
        let second = QueryRenderer::render(profile.tokens(), &values, threshold, "").unwrap();

        prop_assert_eq!(first, second);
        prop_assert_eq!(before.as_slice(), profile.tokens());
    }

    /// Exactly the groups meeting the threshold are emitted
    #[test]
    fn prop_under_threshold_groups_absent(
        groups in template_strategy(),
        pairs in values_strategy(),
        threshold in 0usize..4,
    ) {
        let profile = Profile::compile(&template_text(&groups)).unwrap();
        let values: FieldValues = pairs.into_iter().collect();
        let query = QueryRenderer::render(profile.tokens(), &values, threshold, "").unwrap();

        let expected = groups
            .iter()
            .filter(|g| {
                let count = resolved_count(g, &values);
                count > 0 && count >= threshold
            })
            .count();
        // Values are [a-z]+, so "( " only opens groups
        prop_assert_eq!(query.matches("( ").count(), expected);
        prop_assert!(!query.contains("  "));
        prop_assert!(!query.starts_with(' ') && !query.ends_with(' '));
    }

    /// WILDCARD values end with exactly one '*'
    #[test]
    fn prop_wildcard_single_star(value in "[a-z][a-z*]{0,7}", boost in prop::option::of(0u32..10)) {
        let template = match boost {
            Some(n) => format!("(name <name> WILDCARD BOOST {})", n),
            None => "(name <name> WILDCARD)".to_string(),
        };
        let profile = Profile::compile(&template).unwrap();
        let values = FieldValues::new().with("name", value.clone());
        let query = QueryRenderer::render(profile.tokens(), &values, 1, "").unwrap();

        let stem = value.trim_end_matches('*');
        let expected = match boost {
            Some(n) => format!("( name:({}^{}*) )", stem, n),
            None => format!("( name:({}*) )", stem),
        };
        prop_assert!(query.ends_with("*) )"));
        prop_assert!(!query.ends_with("**) )"));
        prop_assert_eq!(query, expected);
    }

    /// CONSTANT clauses render the placeholder text, whatever the values say
    #[test]
    fn prop_constant_ignores_values(
        placeholder in "[a-z]{1,8}",
        value in prop::option::of("[a-z]{1,8}"),
    ) {
        let profile = Profile::compile(&format!("(code <{}> CONSTANT)", placeholder)).unwrap();
        let mut values = FieldValues::new();
        if let Some(v) = value {
            values.insert(&placeholder, v);
        }
        let query = QueryRenderer::render(profile.tokens(), &values, 1, "").unwrap();
        prop_assert_eq!(query, format!("( code:({}) )", placeholder));
    }

    /// Lookup ignores the case of the value-map key
    #[test]
    fn prop_lookup_case_insensitive(
        groups in template_strategy(),
        pairs in values_strategy(),
        threshold in 0usize..3,
    ) {
        let profile = Profile::compile(&template_text(&groups)).unwrap();
        let lower: FieldValues = pairs.iter().cloned().collect();
        let upper: FieldValues = pairs
            .iter()
            .map(|(k, v)| (k.to_uppercase(), v.clone()))
            .collect();

        prop_assert_eq!(
            QueryRenderer::render(profile.tokens(), &lower, threshold, "").unwrap(),
            QueryRenderer::render(profile.tokens(), &upper, threshold, "").unwrap()
        );
    }
}
