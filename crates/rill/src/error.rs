//! # Error Types
//!
//! Error types for parse failures.
//!
//! ## Overview
//!
//! A failed parse surfaces a [`ParseError`]: a byte offset into the input
//! paired with an [`ErrorKind`] and a human-readable message. The kinds are
//! a closed set:
//!
//! - [`ErrorKind::UnexpectedEndOfInput`]: a recognizer needed more
//!   characters than the current input snapshot holds. Over a still-growing
//!   stream this is a control signal ("feed me more"), not a user error;
//!   over a finished input it is a genuine failure.
//! - [`ErrorKind::Mismatch`]: a recognizer saw characters that did not
//!   satisfy it.
//! - [`ErrorKind::EmptyRepetition`]: a one-or-more repetition matched zero
//!   times.
//! - [`ErrorKind::NegativeLookaheadViolation`]: a not-followed-by predicate
//!   saw its forbidden parser succeed.
//!
//! The needs-more-input reading of an end-of-input error depends on the
//! snapshot it was raised against; see
//! [`ParserState::needs_more_input`](crate::state::ParserState::needs_more_input).

use thiserror::Error;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

/// The closed set of parse error kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ErrorKind {
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,

    #[error("mismatched input")]
    Mismatch,

    #[error("empty repetition")]
    EmptyRepetition,

    #[error("negative lookahead violation")]
    NegativeLookaheadViolation,
}

/// A parse error with the byte offset it was raised at.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
#[error("{kind} at offset {offset}: {message}")]
pub struct ParseError {
    offset: usize,
    kind: ErrorKind,
    message: String,
}

impl ParseError {
    /// Create an error from its parts.
    #[must_use]
    pub fn new(offset: usize, kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            offset,
            kind,
            message: message.into(),
        }
    }

    /// An end-of-input error naming what was being matched.
    #[must_use]
    pub fn unexpected_end(offset: usize, expected: &str) -> Self {
        Self::new(
            offset,
            ErrorKind::UnexpectedEndOfInput,
            format!("ran out of input while matching {expected}"),
        )
    }

    /// A mismatch error naming the expectation and what was found instead.
    #[must_use]
    pub fn mismatch(offset: usize, expected: &str, found: &str) -> Self {
        Self::new(
            offset,
            ErrorKind::Mismatch,
            format!("expected {expected} but found {found}"),
        )
    }

    /// The error produced when a one-or-more repetition matches nothing.
    #[must_use]
    pub fn empty_repetition(offset: usize) -> Self {
        Self::new(
            offset,
            ErrorKind::EmptyRepetition,
            "expected at least one match, found none",
        )
    }

    /// The error produced when a negative lookahead sees its forbidden
    /// parser succeed.
    #[must_use]
    pub fn negative_lookahead(offset: usize) -> Self {
        Self::new(
            offset,
            ErrorKind::NegativeLookaheadViolation,
            "matched input that is forbidden here",
        )
    }

    /// Get the byte offset this error was raised at.
    #[must_use]
    pub const fn offset(&self) -> usize {
        self.offset
    }

    /// Get the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        self.kind
    }

    /// Get the human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this error is an end-of-input error.
    ///
    /// Whether that makes it a request for more input or a genuine failure
    /// depends on the snapshot it was raised against.
    #[must_use]
    pub const fn is_end_of_input(&self) -> bool {
        matches!(self.kind, ErrorKind::UnexpectedEndOfInput)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ParseError::mismatch(3, "\"world\"", "\"w0rld\"");
        let text = format!("{error}");
        assert!(text.contains("mismatched input"));
        assert!(text.contains("offset 3"));
        assert!(text.contains("expected \"world\""));
    }

    #[test]
    fn test_error_accessors() {
        let error = ParseError::unexpected_end(7, "\"!\"");
        assert_eq!(error.offset(), 7);
        assert_eq!(error.kind(), ErrorKind::UnexpectedEndOfInput);
        assert!(error.is_end_of_input());
        assert!(error.message().contains("ran out of input"));
    }

    #[test]
    fn test_kind_closed_set() {
        let kinds = [
            ErrorKind::UnexpectedEndOfInput,
            ErrorKind::Mismatch,
            ErrorKind::EmptyRepetition,
            ErrorKind::NegativeLookaheadViolation,
        ];
        assert_eq!(kinds.len(), 4);
        assert!(!ParseError::empty_repetition(0).is_end_of_input());
        assert!(!ParseError::negative_lookahead(0).is_end_of_input());
    }
}
