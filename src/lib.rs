//! # linegram
//!
//! A parser-combinator engine for line-oriented, user-defined grammars.
//!
//! An embedder supplies three things: an ordered, regex-driven token table, an
//! optional token filter (typically used to drop whitespace), and a grammar
//! expression built from a small set of composable primitives. For one line of
//! input, the engine produces either a single abstract syntax tree aligned with
//! the grammar, or the set of furthest-progress failure diagnostics that tell
//! the user which tokens would have been accepted at the point where parsing
//! actually got stuck.
//!
//! Pipeline
//!
//! The processing of one line goes through these stages:
//!
//! 1. Lexing: The token table turns the line into a vector of identified
//!    tokens, tracking 1-based column positions. See the [lexing] module.
//! 2. Filtering: The optional predicate drops tokens (whitespace, say)
//!    after position tracking, so reported columns always refer to the
//!    original source. See [parsing::LineParser].
//! 3. Evaluation: The grammar expression is walked against the token
//!    vector with full backtracking, producing a stream of candidate
//!    results. See the [grammar] module.
//! 4. Selection: The driver picks the first success covering the whole
//!    token vector, or aggregates the failures that progressed furthest.
//!    See [parsing::LineParser::parse_line].
//!
//! Grammars
//!
//! Grammar expressions are built from eight primitives: token match, sequence,
//! alternation, the always-succeeding epsilon, optional, repetition, mute
//! (parse but suppress the produced tree), and named groups (wrap the produced
//! tree fragments in a tagged structure node). The [grammar] module exposes a
//! constructor function for each, and `&str` coerces into a token match so
//! grammars read close to EBNF:
//!
//! ```
//! use linegram::{and, mute, named, star, token, LineParser, TokenSpec, TokenTable};
//!
//! let table = TokenTable::new(vec![
//! TokenSpec::new("word", "[a-z]+"),
//! TokenSpec::new(",", ","),
//! ])?;
//! let list = and(vec![
//! token("word"),
//! star(and(vec![mute(","), token("word")])),
//! ]);
//! let parser = LineParser::new(table, None, named("list", vec![list]))?;
//!
//! let results = parser.parse_line("a,b,c", 1).unwrap();
//! assert!(results[0].is_success());
//! # Ok::<(), linegram::GrammarError>(())
//! ```
//!
//! Grammars are validated at construction time: every token id referenced by
//! the expression tree must exist in the table, so parse-time "unknown token"
//! conditions cannot occur.
//!
//! Concurrency
//!
//! A built [parsing::LineParser] is immutable. All per-parse state (including
//! the furthest-progress bookkeeping used for diagnostics) lives in a context
//! created for each `parse_line` call, so one parser can be shared freely
//! across threads.

pub mod ast;
mod engine;
pub mod grammar;
pub mod lexing;
pub mod parsing;
pub mod testing;
pub mod token;

pub use ast::AstNode;
pub use grammar::{and, epsilon, mute, named, optional, or, seq, star, token, Expr, GrammarError};
pub use lexing::{LexError, TokenTable};
pub use parsing::{build_grammar, LineParser, ParseFailure, ParseResult, TokenFilter};
pub use token::{IdentifiedToken, TokenSpec, END_OF_INPUT_ID};
