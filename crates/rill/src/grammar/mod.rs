//! # Grammar Definition
//!
//! A [`Grammar`] is an arena of parser nodes. Builder methods allocate one
//! node each and hand back a copyable [`ParserRef`]; combinators take the
//! refs of their children. The ref doubles as the node's identity in the
//! packrat memo table, so two structurally equal subtrees built separately
//! memoize independently.
//!
//! ## Cyclic grammars
//!
//! Rules that reference themselves (or rules defined later) go through a
//! deferred node: [`Grammar::lazy`] allocates the node up front and
//! [`Grammar::define`] binds its body once the body exists. The arena owns
//! every node, so the resulting cyclic graph needs no reference counting.
//!
//! ## Usage
//!
//! ```rust
//! use rill::{Grammar, Status};
//!
//! let mut g = Grammar::new();
//! let hello = g.literal("Hello");
//! let hi = g.literal("Hi");
//! let greeting = g.one_of([hello, hi]);
//!
//! let state = g.parse_string(greeting, "Hello");
//! assert_eq!(state.status(), Status::Complete);
//! ```

pub mod char_set;
mod expr;

use std::cell::Cell;
use std::fmt;

use compact_str::CompactString;
use thiserror::Error;

pub use char_set::CharSet;
pub(crate) use expr::ParserExpr;

use crate::engine::{self, ParseOptions};
use crate::input::InputSnapshot;
use crate::memo::MemoHandle;
use crate::state::ParserState;
use crate::stream::ParseStream;

/// A reference to a parser node in its [`Grammar`]'s arena.
///
/// Also the node's identity for memoization: assigned monotonically at
/// construction, never by structure. A ref is only meaningful with the
/// grammar that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParserRef(u32);

impl ParserRef {
    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    #[cfg(test)]
    pub(crate) const fn for_tests(raw: u32) -> Self {
        Self(raw)
    }
}

impl fmt::Display for ParserRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Errors raised while assembling a grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("parser {parser} is not a deferred parser")]
    NotDeferred { parser: ParserRef },

    #[error("deferred parser {parser} is already defined")]
    AlreadyDefined { parser: ParserRef },
}

/// An arena of parser nodes plus the entry points for running them.
#[derive(Debug, Default)]
pub struct Grammar {
    nodes: Vec<ParserExpr>,
}

impl Grammar {
    /// Create an empty grammar.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn push(&mut self, expr: ParserExpr) -> ParserRef {
        let raw = u32::try_from(self.nodes.len()).expect("grammar arena exceeds u32 capacity");
        self.nodes.push(expr);
        ParserRef(raw)
    }

    pub(crate) fn expr(&self, parser: ParserRef) -> &ParserExpr {
        &self.nodes[parser.index()]
    }

    /// Number of nodes allocated so far.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// A recognizer for the exact character sequence `text`.
    pub fn literal(&mut self, text: impl AsRef<str>) -> ParserRef {
        self.push(ParserExpr::Literal(CompactString::new(text.as_ref())))
    }

    /// A recognizer consuming any single character.
    pub fn any_char(&mut self) -> ParserRef {
        self.push(ParserExpr::AnyChar)
    }

    /// A recognizer consuming one character from `set`.
    pub fn char_from(&mut self, set: CharSet) -> ParserRef {
        self.push(ParserExpr::CharFrom(set))
    }

    /// A recognizer succeeding only at the true end of the whole input.
    pub fn end_of_input(&mut self) -> ParserRef {
        self.push(ParserExpr::EndOfInput)
    }

    /// Apply `parsers` left to right; the result is the list of their
    /// results.
    pub fn sequence_of(&mut self, parsers: impl IntoIterator<Item = ParserRef>) -> ParserRef {
        self.push(ParserExpr::SequenceOf(parsers.into_iter().collect()))
    }

    /// Ordered choice over `parsers`: the first success wins.
    pub fn one_of(&mut self, parsers: impl IntoIterator<Item = ParserRef>) -> ParserRef {
        self.push(ParserExpr::OneOf(parsers.into_iter().collect()))
    }

    /// Collect zero or more matches of `parser`.
    pub fn zero_or_more(&mut self, parser: ParserRef) -> ParserRef {
        self.push(ParserExpr::ZeroOrMore(parser))
    }

    /// Collect one or more matches of `parser`.
    pub fn one_or_more(&mut self, parser: ParserRef) -> ParserRef {
        self.push(ParserExpr::OneOrMore(parser))
    }

    /// Try `parser`; a genuine failure becomes a null success at the entry
    /// offset.
    pub fn optional(&mut self, parser: ParserRef) -> ParserRef {
        self.push(ParserExpr::Optional(parser))
    }

    /// Positive lookahead: run `parser` without consuming input.
    pub fn followed_by(&mut self, parser: ParserRef) -> ParserRef {
        self.push(ParserExpr::FollowedBy(parser))
    }

    /// Negative lookahead: succeed only where `parser` fails.
    pub fn not_followed_by(&mut self, parser: ParserRef) -> ParserRef {
        self.push(ParserExpr::NotFollowedBy(parser))
    }

    /// Allocate a deferred node whose body is bound later with
    /// [`define`](Self::define). Using it before binding fails the parse
    /// with a diagnostic.
    pub fn lazy(&mut self) -> ParserRef {
        self.push(ParserExpr::Deferred(Cell::new(None)))
    }

    /// Bind the body of a deferred node.
    ///
    /// # Errors
    ///
    /// [`GrammarError::NotDeferred`] if `slot` was not created by
    /// [`lazy`](Self::lazy); [`GrammarError::AlreadyDefined`] if it was
    /// already bound.
    pub fn define(&mut self, slot: ParserRef, body: ParserRef) -> Result<(), GrammarError> {
        match &self.nodes[slot.index()] {
            ParserExpr::Deferred(cell) => {
                if cell.get().is_some() {
                    return Err(GrammarError::AlreadyDefined { parser: slot });
                }
                cell.set(Some(body));
                Ok(())
            }
            _ => Err(GrammarError::NotDeferred { parser: slot }),
        }
    }

    /// Run `start` against a whole string. The snapshot is final from the
    /// outset, so the returned state is always terminal, never partial.
    #[must_use]
    pub fn parse_string(&self, start: ParserRef, input: &str) -> ParserState {
        self.parse_string_with(start, input, ParseOptions::default())
    }

    /// [`parse_string`](Self::parse_string) with explicit options.
    #[must_use]
    pub fn parse_string_with(
        &self,
        start: ParserRef,
        input: &str,
        options: ParseOptions,
    ) -> ParserState {
        let cache = MemoHandle::new(options);
        let state = ParserState::initial(InputSnapshot::complete(input), cache);
        engine::apply(self, start, state, 0)
    }

    /// Run `start` against a chunked stream. The returned iterator yields
    /// each state that makes observable progress, ending with a terminal
    /// state; see [`ParseStream`].
    pub fn parse_stream<I>(&self, start: ParserRef, chunks: I) -> ParseStream<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        self.parse_stream_with(start, chunks, ParseOptions::default())
    }

    /// [`parse_stream`](Self::parse_stream) with explicit options.
    pub fn parse_stream_with<I>(
        &self,
        start: ParserRef,
        chunks: I,
        options: ParseOptions,
    ) -> ParseStream<'_, I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        ParseStream::new(self, start, chunks.into_iter(), options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refs_are_monotone() {
        let mut g = Grammar::new();
        let a = g.literal("a");
        let b = g.literal("a");
        assert_ne!(a, b, "structurally equal nodes keep distinct identities");
        assert_eq!(g.node_count(), 2);
    }

    #[test]
    fn test_define_rejects_non_deferred() {
        let mut g = Grammar::new();
        let lit = g.literal("a");
        let body = g.literal("b");
        assert_eq!(
            g.define(lit, body),
            Err(GrammarError::NotDeferred { parser: lit })
        );
    }

    #[test]
    fn test_define_rejects_rebinding() {
        let mut g = Grammar::new();
        let slot = g.lazy();
        let body = g.literal("a");
        assert_eq!(g.define(slot, body), Ok(()));
        assert_eq!(
            g.define(slot, body),
            Err(GrammarError::AlreadyDefined { parser: slot })
        );
    }
}
