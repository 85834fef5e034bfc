//! The grammar expression algebra and its construction DSL.
//!
//! An [Expr] is an immutable tree over eight operators: token match, sequence,
//! alternation, epsilon, mute, optional, star, and named group. This is the
//! minimal set that expresses context-free productions with explicit tree
//! shaping (named groups) and whitespace-like suppression (mute), without an
//! external tree-building pass.
//!
//! The public shape keeps sequence, alternation, and named group n-ary for
//! ergonomics; [LineParser](crate::parsing::LineParser) lowers them to binary
//! nodes with a right fold when the grammar is built. An n-ary term with one
//! child is that child; an empty term is rejected at build time.
//!
//! A bare `&str` coerces into a token match via `From`, so grammar code can
//! write `mute(";")` instead of `mute(token(";"))`.

use std::collections::BTreeSet;
use std::fmt;

/// A node of the grammar expression tree.
///
/// Expressions are built once, validated by the parser constructor, and shared
/// across parses; they carry no mutable state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// Consume one token with the given id and emit a leaf.
    Token(String),
    /// All terms in order, concatenating their tree fragments.
    And(Vec<Expr>),
    /// Any of the terms, tried left to right from the same start position.
    Or(Vec<Expr>),
    /// Always succeeds, consumes nothing, emits nothing.
    Epsilon,
    /// Parse the term but discard the tree fragments it produced.
    Mute(Box<Expr>),
    /// The term, or nothing. The zero-consumption candidate comes first.
    Optional(Box<Expr>),
    /// Zero or more repetitions of the term. The zero-match candidate comes
    /// first, so repetition is non-greedy from the point of view of a
    /// surrounding sequence.
    Star(Box<Expr>),
    /// Parse the terms, then wrap the produced fragments in one structure node
    /// tagged with the name.
    Named(String, Vec<Expr>),
}

impl Expr {
    /// Collect every distinct token id referenced by this expression tree.
    pub(crate) fn referenced_ids(&self, out: &mut BTreeSet<String>) {
        match self {
            Expr::Token(id) => {
                out.insert(id.clone());
            }
            Expr::And(items) | Expr::Or(items) | Expr::Named(_, items) => {
                for item in items {
                    item.referenced_ids(out);
                }
            }
            Expr::Epsilon => {}
            Expr::Mute(inner) | Expr::Optional(inner) | Expr::Star(inner) => {
                inner.referenced_ids(out);
            }
        }
    }
}

impl From<&str> for Expr {
    fn from(id: &str) -> Self {
        Expr::Token(id.to_string())
    }
}

impl From<String> for Expr {
    fn from(id: String) -> Self {
        Expr::Token(id)
    }
}

/// Match one token by id.
pub fn token(id: impl Into<String>) -> Expr {
    Expr::Token(id.into())
}

/// The always-succeeding, nothing-consuming term.
pub fn epsilon() -> Expr {
    Expr::Epsilon
}

/// All terms in sequence.
pub fn and(items: Vec<Expr>) -> Expr {
    Expr::And(items)
}

/// Alias of [and] for grammars that read better as productions.
pub fn seq(items: Vec<Expr>) -> Expr {
    and(items)
}

/// Any of the terms. Candidates from earlier terms are yielded before
/// candidates from later ones.
pub fn or(items: Vec<Expr>) -> Expr {
    Expr::Or(items)
}

/// The term or nothing; equivalent to `or(vec![epsilon(), term])`.
pub fn optional(item: impl Into<Expr>) -> Expr {
    Expr::Optional(Box::new(item.into()))
}

/// Zero or more repetitions. The empty repetition is always the first
/// candidate, so a surrounding sequence may accept it before exploring longer
/// ones.
pub fn star(item: impl Into<Expr>) -> Expr {
    Expr::Star(Box::new(item.into()))
}

/// Parse the term but suppress its tree fragments. Position advancement and
/// failure reporting are unchanged.
pub fn mute(item: impl Into<Expr>) -> Expr {
    Expr::Mute(Box::new(item.into()))
}

/// Wrap the fragments produced by the terms in one structure node tagged
/// `name`.
pub fn named(name: impl Into<String>, items: Vec<Expr>) -> Expr {
    Expr::Named(name.into(), items)
}

/// Failures reported when a token table or grammar is built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarError {
    /// The grammar references token ids absent from the table. All unknown ids
    /// are listed, sorted.
    UnknownTokens(Vec<String>),
    /// An n-ary operator was given no terms. Carries the operator name.
    EmptySequence(&'static str),
    /// A token spec's regex failed to compile.
    InvalidPattern { id: String, message: String },
}

impl fmt::Display for GrammarError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GrammarError::UnknownTokens(ids) => {
                write!(
                    f,
                    "grammar references undeclared token ids: {}",
                    ids.join(", ")
                )
            }
            GrammarError::EmptySequence(op) => {
                write!(f, "empty {} is not a valid grammar term", op)
            }
            GrammarError::InvalidPattern { id, message } => {
                write!(f, "invalid pattern for token \"{}\": {}", id, message)
            }
        }
    }
}

impl std::error::Error for GrammarError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_strings_coerce_to_token_matches() {
        let expr: Expr = ";".into();
        assert_eq!(expr, Expr::Token(";".to_string()));
        assert_eq!(mute(";"), Expr::Mute(Box::new(token(";"))));
    }

    #[test]
    fn test_referenced_ids_walks_all_operators() {
        let expr = and(vec![
            token("a"),
            or(vec![token("b"), epsilon()]),
            star(mute("c")),
            optional(token("a")),
            named("group", vec![token("d")]),
        ]);

        let mut ids = BTreeSet::new();
        expr.referenced_ids(&mut ids);
        let ids: Vec<_> = ids.into_iter().collect();
        assert_eq!(ids, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_error_display() {
        let err = GrammarError::UnknownTokens(vec!["x".to_string(), "y".to_string()]);
        assert_eq!(
            err.to_string(),
            "grammar references undeclared token ids: x, y"
        );

        let err = GrammarError::EmptySequence("or");
        assert_eq!(err.to_string(), "empty or is not a valid grammar term");
    }
}
