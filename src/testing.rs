//! Test support: token factories and a shared fixture grammar.
//!
//! The fixture is a small graph-binding DSL. A line such as
//! `//+ a->c;` declares a directed binding from node `a` to node `c`;
//! `@>` is an alternative binding operator, `*` is a wildcard target, and
//! `{b,c}` binds several targets at once:
//!
//! ```text
//! //+ a->c;
//! //+ a->{b,c};
//! //+ a@>*;
//! ```
//!
//! Separators (`;`, braces, commas, the operator itself) are muted, so the
//! produced tree is one leaf for the `//+` marker followed by one structure
//! per binding, tagged with the operator and containing the source and
//! target leaves. Exercising every operator of the algebra in a realistic
//! shape is exactly what makes it a good fixture; the unit and integration
//! tests share it through this module.

use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::grammar::{and, mute, named, or, star, token, Expr};
use crate::parsing::{build_grammar, LineParser, TokenFilter};
use crate::token::{IdentifiedToken, TokenSpec};

/// Build an identified token at explicit coordinates.
pub fn mk_token(id: &str, content: &str, line: usize, column: usize) -> IdentifiedToken {
    IdentifiedToken::new(id, content, line, column)
}

/// The token table of the graph-binding DSL, in first-match-wins order.
pub fn graph_binding_specs() -> Vec<TokenSpec> {
    vec![
        TokenSpec::new("//+", r"//\+"),
        TokenSpec::new("->", "->"),
        TokenSpec::new("@>", "@>"),
        TokenSpec::new("*", r"\*"),
        TokenSpec::new("{", r"\{"),
        TokenSpec::new("}", r"\}"),
        TokenSpec::new(",", ","),
        TokenSpec::new(";", ";"),
        TokenSpec::new("Name", "[A-Za-z_][A-Za-z0-9_]*"),
        TokenSpec::new("WS", r"\s+"),
    ]
}

/// Filter dropping whitespace tokens after lexing.
pub fn skip_whitespace_filter() -> TokenFilter {
    Arc::new(|token| token.id != "WS")
}

fn target() -> Expr {
    or(vec![token("Name"), token("*")])
}

fn target_set() -> Expr {
    or(vec![
        target(),
        and(vec![
            mute("{"),
            target(),
            star(and(vec![mute(","), target()])),
            mute("}"),
        ]),
    ])
}

fn binding(op: &str) -> Expr {
    named(op, vec![token("Name"), mute(op), target_set()])
}

fn statement() -> Expr {
    and(vec![or(vec![binding("->"), binding("@>")]), mute(";")])
}

/// The root production: the `//+` marker followed by any number of binding
/// statements.
pub fn graph_binding_grammar() -> Expr {
    and(vec![token("//+"), star(statement())])
}

static GRAPH_BINDING_PARSER: Lazy<LineParser> = Lazy::new(|| {
    build_grammar(
        graph_binding_specs(),
        Some(skip_whitespace_filter()),
        graph_binding_grammar(),
    )
    .expect("fixture grammar should build")
});

/// The shared, lazily built fixture parser.
pub fn graph_binding_parser() -> &'static LineParser {
    &GRAPH_BINDING_PARSER
}
