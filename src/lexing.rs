//! Regex-driven lexer over a single line of input.
//!
//! The [TokenTable] holds the compiled token specs in declaration order. To
//! tokenize a line, the lexer keeps a cursor starting at column 1 and consumes
//! the line left to right. At each step, the first spec whose anchored regex
//! matches at the cursor wins, an identified token is emitted with the matched
//! text, and the cursor advances by the match length.
//!
//! Two conditions abort lexing for the line: no spec matching at the cursor
//! (the diagnostic names the remaining input), and a spec matching the empty
//! string (which would never advance the cursor).
//!
//! Token filtering is not done here. The parser applies the embedder's filter
//! predicate after the full line is tokenized, so columns reported to users
//! always refer to original source positions.

use std::fmt;

use regex::Regex;
use tracing::trace;

use crate::grammar::GrammarError;
use crate::token::{IdentifiedToken, TokenSpec};

/// Errors that abort tokenization of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LexError {
    /// No token spec matches at the cursor position.
    UnmatchedInput {
        line: usize,
        column: usize,
        rest: String,
    },
    /// A token spec matched a zero-length string, which would loop forever.
    EmptyMatch {
        id: String,
        line: usize,
        column: usize,
    },
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LexError::UnmatchedInput { line, column, rest } => write!(
                f,
                "no token matches remaining input \"{}\" at {}:{}",
                rest, line, column
            ),
            LexError::EmptyMatch { id, line, column } => write!(
                f,
                "token \"{}\" matched an empty string at {}:{}",
                id, line, column
            ),
        }
    }
}

impl std::error::Error for LexError {}

/// One compiled table entry. The regex is the user pattern wrapped in `^(?:...)`.
#[derive(Debug, Clone)]
struct CompiledSpec {
    id: String,
    regex: Regex,
}

/// Ordered collection of compiled token specs. Order is semantically
/// significant: the first matching spec wins.
#[derive(Debug, Clone)]
pub struct TokenTable {
    entries: Vec<CompiledSpec>,
}

impl TokenTable {
    /// Compile the given specs, preserving declaration order.
    ///
    /// A malformed pattern is a construction failure naming the offending id.
    pub fn new(specs: Vec<TokenSpec>) -> Result<Self, GrammarError> {
        let mut entries = Vec::with_capacity(specs.len());
        for spec in specs {
            let anchored = format!("^(?:{})", spec.pattern);
            let regex = Regex::new(&anchored).map_err(|e| GrammarError::InvalidPattern {
                id: spec.id.clone(),
                message: e.to_string(),
            })?;
            entries.push(CompiledSpec { id: spec.id, regex });
        }
        Ok(TokenTable { entries })
    }

    /// Whether a spec with the given id is declared.
    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|entry| entry.id == id)
    }

    /// Tokenize one line.
    ///
    /// The line number is threaded through to the emitted tokens unchanged.
    /// Columns are 1-based and counted in characters; the cursor itself moves in
    /// bytes because the regex engine reports byte offsets.
    pub fn tokenize(
        &self,
        line: &str,
        line_number: usize,
    ) -> Result<Vec<IdentifiedToken>, LexError> {
        let mut tokens = Vec::new();
        let mut cursor = 0;
        let mut column = 1;

        while cursor < line.len() {
            let rest = &line[cursor..];
            let hit = self
                .entries
                .iter()
                .find_map(|entry| entry.regex.find(rest).map(|m| (entry, m)));
            let (entry, m) = match hit {
                Some(hit) => hit,
                None => {
                    return Err(LexError::UnmatchedInput {
                        line: line_number,
                        column,
                        rest: rest.to_string(),
                    })
                }
            };
            if m.end() == 0 {
                return Err(LexError::EmptyMatch {
                    id: entry.id.clone(),
                    line: line_number,
                    column,
                });
            }
            let content = m.as_str();
            tokens.push(IdentifiedToken::new(
                entry.id.clone(),
                content,
                line_number,
                column,
            ));
            column += content.chars().count();
            cursor += m.end();
        }

        trace!(line = line_number, count = tokens.len(), "tokenized line");
        Ok(tokens)
    }
}
