//! The tagged expression forms a parser node can take.
//!
//! Nodes never own their children; they reference them by arena index,
//! which is what lets deferred nodes close cycles.

use std::cell::Cell;

use compact_str::CompactString;
use smallvec::SmallVec;

use super::ParserRef;
use super::char_set::CharSet;

/// One parser node in the grammar arena.
#[derive(Debug)]
pub(crate) enum ParserExpr {
    /// Match an exact character sequence.
    Literal(CompactString),
    /// Consume any single character.
    AnyChar,
    /// Consume one character from a set.
    CharFrom(CharSet),
    /// Succeed only at the true end of the whole input.
    EndOfInput,
    /// Apply children left to right, threading state.
    SequenceOf(SmallVec<[ParserRef; 4]>),
    /// Ordered choice: commit to the first success.
    OneOf(SmallVec<[ParserRef; 4]>),
    /// Kleene star: collect successes greedily.
    ZeroOrMore(ParserRef),
    /// Kleene plus: like star, but zero matches is a failure.
    OneOrMore(ParserRef),
    /// Try the child; a genuine failure becomes a null success.
    Optional(ParserRef),
    /// Positive lookahead: run the child without consuming.
    FollowedBy(ParserRef),
    /// Negative lookahead: succeed only if the child fails.
    NotFollowedBy(ParserRef),
    /// A deferred node: declared first, bound to its body later, so a
    /// grammar can reference itself.
    Deferred(Cell<Option<ParserRef>>),
}
