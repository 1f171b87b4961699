//! # Parser State
//!
//! The immutable value threaded through every recognizer: the input
//! snapshot, the offset of the next character to examine, a three-valued
//! status, the most recent result, and (on failure) an error.
//!
//! ## Status algebra
//!
//! - [`Status::Complete`]: the recognizer committed to a verdict that no
//!   amount of further input can change.
//! - [`Status::Partial`]: progress was made against a still-growing input;
//!   a verdict needs more characters. Only possible while the snapshot is
//!   non-final.
//! - [`Status::Error`]: the recognizer failed; [`ParserState::error`] holds
//!   the descriptor and the result is [`ParseValue::Null`].
//!
//! States transition only through the [`completed`](ParserState::completed),
//! [`partial`](ParserState::partial) and [`failed`](ParserState::failed)
//! constructors, which maintain the invariants above.

use compact_str::CompactString;

#[cfg(feature = "serialize")]
use serde::{Deserialize, Serialize};

use crate::error::ParseError;
use crate::input::InputSnapshot;
use crate::memo::MemoHandle;

/// The three-valued outcome of applying a recognizer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum Status {
    /// A committed success.
    Complete,
    /// Progress against a growing input; awaiting more characters.
    Partial,
    /// A failure; the state carries a [`ParseError`].
    Error,
}

/// The result payload a recognizer produces.
///
/// The payload shape is recognizer-specific: a literal yields
/// [`ParseValue::Text`], a single-character recognizer yields
/// [`ParseValue::Char`], sequences and repetitions yield
/// [`ParseValue::List`], end-of-input and caught failures yield
/// [`ParseValue::Null`]. [`ParseValue::Pending`] marks a sequence slot whose
/// child has not run yet in a partially-filled result.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serialize", derive(Serialize, Deserialize))]
pub enum ParseValue {
    /// No value.
    Null,
    /// A sequence slot not yet produced.
    Pending,
    /// A single character.
    Char(char),
    /// A run of text.
    Text(CompactString),
    /// An ordered collection of child results.
    List(Vec<ParseValue>),
}

impl ParseValue {
    /// Build a text value.
    #[must_use]
    pub fn text(text: impl AsRef<str>) -> Self {
        Self::Text(CompactString::new(text.as_ref()))
    }

    /// Whether this is [`ParseValue::Null`].
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The text payload, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// The character payload, if this is a character value.
    #[must_use]
    pub const fn as_char(&self) -> Option<char> {
        match self {
            Self::Char(c) => Some(*c),
            _ => None,
        }
    }

    /// The child results, if this is a list value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[ParseValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<char> for ParseValue {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for ParseValue {
    fn from(text: &str) -> Self {
        Self::text(text)
    }
}

impl From<Vec<ParseValue>> for ParseValue {
    fn from(items: Vec<ParseValue>) -> Self {
        Self::List(items)
    }
}

/// The state threaded through recognizers.
///
/// Cloning is cheap: the input text is shared by reference, and the memo
/// table is a shared handle.
#[derive(Debug, Clone)]
pub struct ParserState {
    input: InputSnapshot,
    index: usize,
    status: Status,
    result: ParseValue,
    error: Option<ParseError>,
    cache: MemoHandle,
}

impl ParserState {
    /// The state a parse starts from: offset zero, no result yet.
    pub(crate) fn initial(input: InputSnapshot, cache: MemoHandle) -> Self {
        Self {
            input,
            index: 0,
            status: Status::Complete,
            result: ParseValue::Null,
            error: None,
            cache,
        }
    }

    /// Rebuild a state from memoized parts, under a live input snapshot and
    /// memo handle.
    pub(crate) fn from_parts(
        input: InputSnapshot,
        index: usize,
        status: Status,
        result: ParseValue,
        error: Option<ParseError>,
        cache: MemoHandle,
    ) -> Self {
        debug_assert!(index <= input.len());
        debug_assert_eq!(status == Status::Error, error.is_some());
        Self {
            input,
            index,
            status,
            result,
            error,
            cache,
        }
    }

    /// A committed success at `index` carrying `result`.
    pub(crate) fn completed(self, index: usize, result: ParseValue) -> Self {
        debug_assert!(index <= self.input.len());
        Self {
            index,
            status: Status::Complete,
            result,
            error: None,
            ..self
        }
    }

    /// A partial success at `index` carrying the progress made so far.
    ///
    /// Only valid against a non-final snapshot.
    pub(crate) fn partial(self, index: usize, result: ParseValue) -> Self {
        debug_assert!(!self.input.is_done());
        debug_assert!(index <= self.input.len());
        Self {
            index,
            status: Status::Partial,
            result,
            error: None,
            ..self
        }
    }

    /// A failure carrying `error`; the index stays where this state is
    /// anchored and the result becomes null.
    pub(crate) fn failed(self, error: ParseError) -> Self {
        Self {
            status: Status::Error,
            result: ParseValue::Null,
            error: Some(error),
            ..self
        }
    }

    /// The input snapshot this state was produced against.
    #[must_use]
    pub const fn input(&self) -> &InputSnapshot {
        &self.input
    }

    /// The byte offset of the next character to examine.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    /// The status of this state.
    #[must_use]
    pub const fn status(&self) -> Status {
        self.status
    }

    /// The most recent result value; null on error.
    #[must_use]
    pub const fn result(&self) -> &ParseValue {
        &self.result
    }

    /// The error descriptor, when the status is [`Status::Error`].
    #[must_use]
    pub const fn error(&self) -> Option<&ParseError> {
        self.error.as_ref()
    }

    /// Whether this state is a failure.
    #[must_use]
    pub const fn is_error(&self) -> bool {
        matches!(self.status, Status::Error)
    }

    /// Whether this state is an end-of-input failure against a still-growing
    /// snapshot: a request for more input rather than a grammar error.
    #[must_use]
    pub fn needs_more_input(&self) -> bool {
        !self.input.is_done()
            && self
                .error
                .as_ref()
                .is_some_and(ParseError::is_end_of_input)
    }

    /// Whether this state is a final verdict: a committed success, or a
    /// failure that more input cannot fix.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        match self.status {
            Status::Complete => true,
            Status::Partial => false,
            Status::Error => !self.needs_more_input(),
        }
    }

    pub(crate) const fn cache(&self) -> &MemoHandle {
        &self.cache
    }
}
