//! Token descriptors and identified tokens shared by the lexer and the parser.
//!
//! A [TokenSpec] declares one lexable unit: an opaque id plus a regex pattern.
//! The table of specs is ordered and first-match-wins, so the embedder places
//! longer or more specific patterns before shorter prefixes (a keyword before a
//! general identifier, say).
//!
//! An [IdentifiedToken] is one lexed unit: the id of the spec that matched, the
//! matched text, and its source coordinates. The line number is supplied by the
//! caller; the column is 1-based and computed by the lexer from the cumulative
//! character length of prior matches within the line.

use std::fmt;

/// Id of the synthetic token that stands in for "no more input".
///
/// The sentinel only ever appears in failure diagnostics, when the grammar
/// demanded a token past the end of the line.
pub const END_OF_INPUT_ID: &str = "END-OF-INPUT";

/// One entry of the token table: an opaque id and its regex pattern.
///
/// The pattern uses the `regex` crate's syntax. The engine anchors it to the
/// current lexer position by wrapping it in `^(?:...)` at compile time, so
/// specs never need to carry their own anchors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSpec {
    pub id: String,
    pub pattern: String,
}

impl TokenSpec {
    pub fn new(id: impl Into<String>, pattern: impl Into<String>) -> Self {
        TokenSpec {
            id: id.into(),
            pattern: pattern.into(),
        }
    }
}

/// One lexed unit with its id, text, and source coordinates.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct IdentifiedToken {
    /// Id of the token spec that produced this token.
    pub id: String,
    /// The matched source text.
    pub content: String,
    /// Line number, as supplied by the caller of the lexer.
    pub line: usize,
    /// 1-based column of the first character, counted in characters.
    pub column: usize,
}

impl IdentifiedToken {
    pub fn new(
        id: impl Into<String>,
        content: impl Into<String>,
        line: usize,
        column: usize,
    ) -> Self {
        IdentifiedToken {
            id: id.into(),
            content: content.into(),
            line,
            column,
        }
    }

    /// Build the synthetic end-of-input sentinel.
    ///
    /// Coordinates are inherited from the last real token so that column numbers
    /// in diagnostics remain meaningful. For an empty token vector the sentinel
    /// falls back to the given line number and column 1.
    pub fn end_of_input(last: Option<&IdentifiedToken>, line: usize) -> Self {
        match last {
            Some(token) => IdentifiedToken::new(END_OF_INPUT_ID, "EOF", token.line, token.column),
            None => IdentifiedToken::new(END_OF_INPUT_ID, "EOF", line, 1),
        }
    }

    pub fn is_end_of_input(&self) -> bool {
        self.id == END_OF_INPUT_ID
    }
}

impl fmt::Display for IdentifiedToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} \"{}\" at {}:{}",
            self.id, self.content, self.line, self.column
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_end_of_input_inherits_last_token_coordinates() {
        let last = IdentifiedToken::new("Name", "c", 3, 8);
        let eof = IdentifiedToken::end_of_input(Some(&last), 3);

        assert_eq!(eof.id, END_OF_INPUT_ID);
        assert_eq!(eof.content, "EOF");
        assert_eq!(eof.line, 3);
        assert_eq!(eof.column, 8);
        assert!(eof.is_end_of_input());
    }

    #[test]
    fn test_end_of_input_fallback_for_empty_input() {
        let eof = IdentifiedToken::end_of_input(None, 7);

        assert_eq!(eof.line, 7);
        assert_eq!(eof.column, 1);
    }

    #[test]
    fn test_display_includes_coordinates() {
        let token = IdentifiedToken::new(";", ";", 2, 10);
        assert_eq!(token.to_string(), "; \";\" at 2:10");
    }
}
