//! Top-level driver: grammar validation, line parsing, result selection.
//!
//! A [LineParser] owns the compiled token table, the optional token filter,
//! and the lowered grammar. Building one validates the grammar against the
//! table: every referenced token id must be declared, so "unknown token"
//! conditions cannot occur at parse time.
//!
//! `parse_line` tokenizes, filters, and evaluates. The first success whose
//! end position equals the token count wins and is returned alone. When no
//! candidate covers the whole vector, every failure at the maximum failing
//! position is returned instead (ties preserved); that set tells the user
//! which tokens the grammar could have accepted at the point where parsing
//! actually got stuck, a much better signal than the first local failure.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use tracing::debug;

use crate::ast::AstNode;
use crate::engine::{Engine, Flow, ParseCx};
use crate::grammar::{Expr, GrammarError};
use crate::lexing::{LexError, TokenTable};
use crate::token::{IdentifiedToken, TokenSpec, END_OF_INPUT_ID};

/// Predicate applied to identified tokens after lexing; tokens for which it
/// returns false are dropped before parsing.
pub type TokenFilter = Arc<dyn Fn(&IdentifiedToken) -> bool + Send + Sync>;

/// The expected-token id and the actual token at a failing position. The
/// actual token is either a real token or the end-of-input sentinel.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseFailure {
    pub expected: String,
    pub actual: IdentifiedToken,
}

impl ParseFailure {
    pub fn new(expected: impl Into<String>, actual: IdentifiedToken) -> Self {
        ParseFailure {
            expected: expected.into(),
            actual,
        }
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected token \"{}\", found {}", self.expected, self.actual)
    }
}

/// One candidate outcome of evaluating a grammar term.
///
/// `error == None` means success: `ast` holds the fragments produced by the
/// consumed tokens and `new_pos` is the offset after them. On failure `ast` is
/// empty and `new_pos` records how far the attempt advanced before failing.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ParseResult {
    pub new_pos: usize,
    pub ast: Vec<AstNode>,
    pub error: Option<ParseFailure>,
}

impl ParseResult {
    pub fn success(new_pos: usize, ast: Vec<AstNode>) -> Self {
        ParseResult {
            new_pos,
            ast,
            error: None,
        }
    }

    pub fn failure(new_pos: usize, failure: ParseFailure) -> Self {
        ParseResult {
            new_pos,
            ast: Vec::new(),
            error: Some(failure),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

/// A validated grammar bound to its token table, ready to parse lines.
pub struct LineParser {
    table: TokenTable,
    filter: Option<TokenFilter>,
    engine: Engine,
}

impl LineParser {
    /// Validate the grammar against the table and lower it for evaluation.
    ///
    /// Fails when the grammar references undeclared token ids (all unknowns are
    /// listed) or contains an empty n-ary term.
    pub fn new(
        table: TokenTable,
        filter: Option<TokenFilter>,
        root: Expr,
    ) -> Result<Self, GrammarError> {
        let mut referenced = BTreeSet::new();
        root.referenced_ids(&mut referenced);
        let unknown: Vec<String> = referenced
            .into_iter()
            .filter(|id| !table.contains(id))
            .collect();
        if !unknown.is_empty() {
            return Err(GrammarError::UnknownTokens(unknown));
        }
        let engine = Engine::lower(&root)?;
        Ok(LineParser {
            table,
            filter,
            engine,
        })
    }

    /// Parse one line.
    ///
    /// # Arguments
    /// * `line` - The input text, without a trailing newline
    /// * `line_number` - Carried into token coordinates and diagnostics
    ///
    /// # Returns
    /// On a lexable line, either a single total-coverage success or one or more
    /// furthest-progress failures. Lexing problems are fatal for the line and
    /// reported as [LexError].
    pub fn parse_line(
        &self,
        line: &str,
        line_number: usize,
    ) -> Result<Vec<ParseResult>, LexError> {
        let tokens = self.lex_line(line, line_number)?;
        let count = tokens.len();
        debug!(line = line_number, tokens = count, "parsing line");

        let mut winner: Option<ParseResult> = None;
        let mut failures: Vec<ParseResult> = Vec::new();
        let mut best_success_pos = 0;

        let mut cx = ParseCx::new(&tokens, line_number, self.engine.node_count());
        self.engine.evaluate(&mut cx, &mut |_cx, result| {
            if result.is_success() {
                if result.new_pos == count {
                    winner = Some(result);
                    return Flow::Done;
                }
                best_success_pos = best_success_pos.max(result.new_pos);
                return Flow::More;
            }
            failures.push(result);
            Flow::More
        });

        if let Some(result) = winner {
            debug!(line = line_number, "total-coverage success");
            return Ok(vec![result]);
        }

        match failures.iter().map(|r| r.new_pos).max() {
            Some(furthest) => {
                failures.retain(|r| r.new_pos == furthest);
                debug!(
                    line = line_number,
                    furthest,
                    count = failures.len(),
                    "parse failed"
                );
                Ok(failures)
            }
            None => {
                // Every candidate succeeded but none covered the input: the
                // grammar expected the line to end where it did not.
                let actual = tokens
                    .get(best_success_pos)
                    .cloned()
                    .unwrap_or_else(|| IdentifiedToken::end_of_input(tokens.last(), line_number));
                let failure =
                    ParseFailure::new(END_OF_INPUT_ID, actual);
                debug!(line = line_number, furthest = best_success_pos, "parse failed");
                Ok(vec![ParseResult::failure(best_success_pos, failure)])
            }
        }
    }

    /// Run the evaluator to exhaustion and return every candidate, successes
    /// and filtered failures alike, in emission order. Used by tests that
    /// check algebra laws over full candidate sets.
    #[cfg(test)]
    pub(crate) fn collect_candidates(
        &self,
        line: &str,
        line_number: usize,
    ) -> Result<Vec<ParseResult>, LexError> {
        let tokens = self.lex_line(line, line_number)?;
        let mut candidates = Vec::new();
        let mut cx = ParseCx::new(&tokens, line_number, self.engine.node_count());
        self.engine.evaluate(&mut cx, &mut |_cx, result| {
            candidates.push(result);
            Flow::More
        });
        Ok(candidates)
    }

    fn lex_line(&self, line: &str, line_number: usize) -> Result<Vec<IdentifiedToken>, LexError> {
        let mut tokens = self.table.tokenize(line, line_number)?;
        if let Some(filter) = &self.filter {
            tokens.retain(|token| filter(token));
        }
        Ok(tokens)
    }
}

/// Build a parser from raw token specs, an optional filter, and a grammar
/// root. Convenience over [TokenTable::new] plus [LineParser::new].
pub fn build_grammar(
    specs: Vec<TokenSpec>,
    filter: Option<TokenFilter>,
    root: Expr,
) -> Result<LineParser, GrammarError> {
    let table = TokenTable::new(specs)?;
    LineParser::new(table, filter, root)
}
