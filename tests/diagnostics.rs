//! Failure reporting over the graph-binding fixture grammar.
//!
//! A failed parse returns every failure at the furthest failing offset; these
//! tests pin down which diagnostics surface, their order, and the coordinates
//! they carry.

use linegram::testing::{graph_binding_parser, mk_token};
use linegram::LexError;

#[test]
fn test_missing_semicolon_reports_the_separator() {
    let results = graph_binding_parser().parse_line("//+ a->c", 4).unwrap();

    assert_eq!(results.len(), 1);
    let result = &results[0];
    assert!(!result.is_success());
    assert_eq!(result.new_pos, 4);

    let failure = result.error.as_ref().unwrap();
    assert_eq!(failure.expected, ";");
    assert!(failure.actual.is_end_of_input());
    // The sentinel inherits the coordinates of the last real token.
    assert_eq!(failure.actual.line, 4);
    assert_eq!(failure.actual.column, 8);
}

#[test]
fn test_missing_target_reports_every_acceptable_token() {
    let results = graph_binding_parser().parse_line("//+ a->;", 1).unwrap();

    // The grammar would have accepted a name, the wildcard, or an opening
    // brace where the semicolon sits. Ties at the furthest offset are all
    // returned, in emission order.
    let expected: Vec<&str> = results
        .iter()
        .map(|r| r.error.as_ref().unwrap().expected.as_str())
        .collect();
    assert_eq!(expected, vec!["Name", "*", "{"]);
    for result in &results {
        assert_eq!(result.new_pos, 3);
        assert_eq!(result.error.as_ref().unwrap().actual.id, ";");
    }
}

#[test]
fn test_missing_marker_fails_at_offset_zero() {
    let results = graph_binding_parser().parse_line("a->c;", 1).unwrap();

    assert_eq!(results.len(), 1);
    let failure = results[0].error.as_ref().unwrap();
    assert_eq!(failure.expected, "//+");
    assert_eq!(failure.actual, mk_token("Name", "a", 1, 1));
    assert_eq!(results[0].new_pos, 0);
}

#[test]
fn test_earlier_failures_are_not_reported() {
    // The `@>` alternative fails right after the source name, but the chosen
    // `->` branch progressed further; only the furthest diagnostics surface.
    let results = graph_binding_parser().parse_line("//+ a->}", 1).unwrap();

    for result in &results {
        assert_eq!(result.new_pos, 3);
        let failure = result.error.as_ref().unwrap();
        assert_ne!(failure.expected, "@>");
    }
}

#[test]
fn test_unlexable_input_is_fatal_for_the_line() {
    let err = graph_binding_parser()
        .parse_line("//+ a=>c;", 2)
        .unwrap_err();

    assert_eq!(
        err,
        LexError::UnmatchedInput {
            line: 2,
            column: 6,
            rest: "=>c;".to_string(),
        }
    );
}

#[test]
fn test_empty_line_demands_the_marker() {
    let results = graph_binding_parser().parse_line("", 9).unwrap();

    assert_eq!(results.len(), 1);
    let failure = results[0].error.as_ref().unwrap();
    assert_eq!(failure.expected, "//+");
    assert!(failure.actual.is_end_of_input());
    // No real token to inherit from: the sentinel falls back to the caller's
    // line number and column 1.
    assert_eq!(failure.actual.line, 9);
    assert_eq!(failure.actual.column, 1);
}
