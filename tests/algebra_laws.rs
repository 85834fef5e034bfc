//! Laws of the combinator algebra, checked through the public surface.
//!
//! Each law is phrased over driver outcomes: two grammars are equivalent when
//! `parse_line` produces the same results for the same inputs.

use linegram::{
    and, build_grammar, epsilon, mute, named, optional, or, seq, token, Expr, GrammarError,
    LineParser, TokenSpec,
};

fn letters(root: Expr) -> LineParser {
    build_grammar(
        vec![
            TokenSpec::new("a", "a"),
            TokenSpec::new("b", "b"),
            TokenSpec::new("c", "c"),
        ],
        None,
        root,
    )
    .expect("grammar should build")
}

#[test]
fn test_and_with_epsilon_is_identity() {
    let plain = letters(token("a"));
    let left = letters(and(vec![epsilon(), token("a")]));
    let right = letters(and(vec![token("a"), epsilon()]));

    for input in ["a", "b", "ab", ""] {
        let expected = plain.parse_line(input, 1).unwrap();
        assert_eq!(left.parse_line(input, 1).unwrap(), expected, "input {:?}", input);
        assert_eq!(right.parse_line(input, 1).unwrap(), expected, "input {:?}", input);
    }
}

#[test]
fn test_optional_is_or_with_epsilon() {
    let lhs = letters(and(vec![optional(token("a")), token("b")]));
    let rhs = letters(and(vec![or(vec![epsilon(), token("a")]), token("b")]));

    for input in ["b", "ab", "a", "c", ""] {
        assert_eq!(
            lhs.parse_line(input, 1).unwrap(),
            rhs.parse_line(input, 1).unwrap(),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_seq_is_an_alias_of_and() {
    let with_and = letters(and(vec![token("a"), mute("b"), token("c")]));
    let with_seq = letters(seq(vec![token("a"), mute("b"), token("c")]));

    for input in ["abc", "ab", "ac", "b", ""] {
        assert_eq!(
            with_seq.parse_line(input, 1).unwrap(),
            with_and.parse_line(input, 1).unwrap(),
            "input {:?}",
            input
        );
    }
}

#[test]
fn test_or_of_identical_terms_duplicates_failures() {
    let parser = letters(or(vec![token("a"), token("a")]));
    let results = parser.parse_line("b", 1).unwrap();

    // Ambiguity is not deduped: the same diagnostic appears once per branch.
    assert_eq!(results.len(), 2);
    assert_eq!(results[0], results[1]);
    assert_eq!(results[0].error.as_ref().unwrap().expected, "a");
}

#[test]
fn test_mute_preserves_advancement_and_failures() {
    let plain = letters(and(vec![token("a"), token("b")]));
    let muted = letters(mute(and(vec![token("a"), token("b")])));

    let success = muted.parse_line("ab", 1).unwrap();
    assert!(success[0].is_success());
    assert_eq!(success[0].new_pos, 2);
    assert!(success[0].ast.is_empty());

    for input in ["ac", "a", "c"] {
        let plain_results = plain.parse_line(input, 1).unwrap();
        let muted_results = muted.parse_line(input, 1).unwrap();
        assert_eq!(plain_results, muted_results, "input {:?}", input);
    }
}

#[test]
fn test_named_wraps_the_fragments_of_its_body() {
    let plain = letters(and(vec![token("a"), token("b")]));
    let wrapped = letters(named("pair", vec![token("a"), token("b")]));

    let body = plain.parse_line("ab", 1).unwrap();
    let results = wrapped.parse_line("ab", 1).unwrap();

    assert_eq!(results[0].ast.len(), 1);
    let node = &results[0].ast[0];
    assert_eq!(node.name(), Some("pair"));
    assert_eq!(node.children(), body[0].ast.as_slice());
}

#[test]
fn test_construction_fails_exactly_on_undeclared_ids() {
    let good = build_grammar(
        vec![TokenSpec::new("a", "a")],
        None,
        or(vec![token("a"), epsilon()]),
    );
    assert!(good.is_ok());

    let bad = build_grammar(
        vec![TokenSpec::new("a", "a")],
        None,
        or(vec![token("a"), token("missing")]),
    );
    assert_eq!(
        bad.err(),
        Some(GrammarError::UnknownTokens(vec!["missing".to_string()]))
    );
}
