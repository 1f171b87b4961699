//! # Parse Engine
//!
//! Applies a parser node to a state: memo lookup, the node's transform,
//! memo store. All recognizer and combinator semantics live here.
//!
//! ## Partial propagation
//!
//! The one rule every combinator obeys: a child's end-of-input error
//! against a still-growing snapshot is not a grammar error, it is a request
//! for more input. Sequences and repetitions convert it into a partial
//! state carrying the progress committed so far; choice, optional and the
//! lookaheads leave the decision unmade and pass the request through.

use crate::error::{ErrorKind, ParseError};
use crate::grammar::{Grammar, ParserExpr, ParserRef};
use crate::memo::MemoEntry;
use crate::state::{ParseValue, ParserState, Status};

/// Knobs for a single parse.
#[derive(Debug, Clone, Copy)]
pub struct ParseOptions {
    /// Recursion depth at which the parse is abandoned with a diagnostic.
    ///
    /// Left-recursive grammars recurse at a single offset without
    /// progress; this bound turns the resulting stack overflow into an
    /// error state.
    pub max_recursion_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_recursion_depth: 1024,
        }
    }
}

/// Apply `parser` to `state` under the packrat discipline.
///
/// Error states short-circuit untouched. Otherwise the memo table is
/// consulted under (parser identity, entry offset); a reusable hit is
/// returned with its snapshot and memo handle rewritten to the live call's,
/// and a miss runs the transform and stores what it produced.
pub(crate) fn apply(
    grammar: &Grammar,
    parser: ParserRef,
    state: ParserState,
    depth: usize,
) -> ParserState {
    if state.is_error() {
        return state;
    }

    let offset = state.index();
    if let Some(entry) = state.cache().lookup(parser, offset, state.input()) {
        return entry.restore(state.input().clone(), state.cache().clone());
    }

    let limit = state.cache().max_recursion_depth();
    if depth >= limit {
        return state.failed(ParseError::new(
            offset,
            ErrorKind::Mismatch,
            format!("recursion deeper than {limit} without progress (left recursion is not supported)"),
        ));
    }

    let produced = transform(grammar, parser, state, depth);
    produced
        .cache()
        .insert(parser, offset, MemoEntry::capture(&produced));
    produced
}

fn transform(
    grammar: &Grammar,
    parser: ParserRef,
    state: ParserState,
    depth: usize,
) -> ParserState {
    match grammar.expr(parser) {
        ParserExpr::Literal(text) => literal(text, state),
        ParserExpr::AnyChar => any_char(state),
        ParserExpr::CharFrom(set) => char_from(set, state),
        ParserExpr::EndOfInput => end_of_input(state),
        ParserExpr::SequenceOf(children) => sequence_of(grammar, children, state, depth),
        ParserExpr::OneOf(children) => one_of(grammar, children, state, depth),
        ParserExpr::ZeroOrMore(child) => repeat(grammar, *child, false, state, depth),
        ParserExpr::OneOrMore(child) => repeat(grammar, *child, true, state, depth),
        ParserExpr::Optional(child) => optional(grammar, *child, state, depth),
        ParserExpr::FollowedBy(child) => followed_by(grammar, *child, state, depth),
        ParserExpr::NotFollowedBy(child) => not_followed_by(grammar, *child, state, depth),
        ParserExpr::Deferred(cell) => match cell.get() {
            Some(target) => apply(grammar, target, state, depth + 1),
            None => {
                let offset = state.index();
                state.failed(ParseError::new(
                    offset,
                    ErrorKind::Mismatch,
                    format!("deferred parser {parser} was never defined"),
                ))
            }
        },
    }
}

/// Quote up to `max_chars` characters of `text` for an error message.
fn preview(text: &str, max_chars: usize) -> String {
    let snippet: String = text.chars().take(max_chars.max(1)).collect();
    format!("{snippet:?}")
}

fn literal(text: &str, state: ParserState) -> ParserState {
    let at = state.index();
    let rest = state.input().tail(at);
    let expected = format!("{text:?}");

    if rest.is_empty() {
        return state.failed(ParseError::unexpected_end(at, &expected));
    }
    if !state.input().is_done() && rest.len() < text.len() && text.starts_with(rest) {
        // The whole visible tail is a proper prefix of the literal: commit
        // to it provisionally and wait for the rest.
        let matched = ParseValue::text(rest);
        let end = at + rest.len();
        return state.partial(end, matched);
    }
    if rest.starts_with(text) {
        let end = at + text.len();
        let matched = ParseValue::text(text);
        state.completed(end, matched)
    } else {
        let found = preview(rest, text.chars().count());
        state.failed(ParseError::mismatch(at, &expected, &found))
    }
}

fn any_char(state: ParserState) -> ParserState {
    let at = state.index();
    match state.input().char_at(at) {
        Some(c) => state.completed(at + c.len_utf8(), ParseValue::Char(c)),
        None => state.failed(ParseError::unexpected_end(at, "any character")),
    }
}

fn char_from(set: &crate::grammar::CharSet, state: ParserState) -> ParserState {
    let at = state.index();
    let expected = format!("a character in {}", set.describe());
    match state.input().char_at(at) {
        Some(c) if set.matches(c) => state.completed(at + c.len_utf8(), ParseValue::Char(c)),
        Some(c) => state.failed(ParseError::mismatch(at, &expected, &format!("{c:?}"))),
        None => state.failed(ParseError::unexpected_end(at, &expected)),
    }
}

fn end_of_input(state: ParserState) -> ParserState {
    let at = state.index();
    if at < state.input().len() {
        let found = preview(state.input().tail(at), 1);
        return state.failed(ParseError::mismatch(at, "end of input", &found));
    }
    if state.input().is_done() {
        state.completed(at, ParseValue::Null)
    } else {
        // The visible input is exhausted but more may arrive; no verdict yet.
        state.failed(ParseError::unexpected_end(at, "end of input"))
    }
}

fn sequence_of(
    grammar: &Grammar,
    children: &[ParserRef],
    state: ParserState,
    depth: usize,
) -> ParserState {
    let mut results = vec![ParseValue::Pending; children.len()];
    let mut current = state;

    for (slot, &child) in children.iter().enumerate() {
        let next = apply(grammar, child, current.clone(), depth + 1);
        if next.needs_more_input() {
            // Anchor the partial at the furthest committed progress: the
            // state the failing child started from.
            let end = current.index();
            return current.partial(end, ParseValue::List(results));
        }
        if next.is_error() {
            return next;
        }
        results[slot] = next.result().clone();
        current = next;
    }

    let end = current.index();
    if current.status() == Status::Partial {
        // The final child only matched provisionally; so did the sequence.
        current.partial(end, ParseValue::List(results))
    } else {
        current.completed(end, ParseValue::List(results))
    }
}

fn one_of(
    grammar: &Grammar,
    children: &[ParserRef],
    state: ParserState,
    depth: usize,
) -> ParserState {
    let mut first_error: Option<ParserState> = None;

    for &child in children {
        let next = apply(grammar, child, state.clone(), depth + 1);
        if next.needs_more_input() {
            // Cannot decide between alternatives before more input arrives.
            return next;
        }
        if next.is_error() {
            first_error.get_or_insert(next);
            continue;
        }
        return next;
    }

    match first_error {
        Some(error) => error,
        None => {
            let offset = state.index();
            state.failed(ParseError::new(
                offset,
                ErrorKind::Mismatch,
                "choice has no alternatives",
            ))
        }
    }
}

fn repeat(
    grammar: &Grammar,
    child: ParserRef,
    at_least_one: bool,
    state: ParserState,
    depth: usize,
) -> ParserState {
    let mut results = Vec::new();
    let mut current = state.clone();

    loop {
        let next = apply(grammar, child, current.clone(), depth + 1);
        if next.needs_more_input() {
            let end = current.index();
            return current.partial(end, ParseValue::List(results));
        }
        if next.is_error() {
            if at_least_one && results.is_empty() {
                let offset = state.index();
                return state.failed(ParseError::empty_repetition(offset));
            }
            break;
        }

        let advanced = next.index() > current.index();
        results.push(next.result().clone());
        current = next;
        if !advanced {
            // Success without consuming anything would repeat forever.
            break;
        }
        if current.status() == Status::Partial {
            // A provisional match ends the visible input; the next round
            // would ask for more anyway.
            let end = current.index();
            return current.partial(end, ParseValue::List(results));
        }
    }

    let end = current.index();
    current.completed(end, ParseValue::List(results))
}

fn optional(grammar: &Grammar, child: ParserRef, state: ParserState, depth: usize) -> ParserState {
    let next = apply(grammar, child, state.clone(), depth + 1);
    if next.needs_more_input() {
        return next;
    }
    if next.is_error() {
        let offset = state.index();
        return state.completed(offset, ParseValue::Null);
    }
    next
}

fn followed_by(
    grammar: &Grammar,
    child: ParserRef,
    state: ParserState,
    depth: usize,
) -> ParserState {
    let next = apply(grammar, child, state.clone(), depth + 1);
    let at = state.index();
    if let Some(error) = next.error() {
        return state.failed(error.clone());
    }
    // Keep the child's verdict and result, discard its advance.
    match next.status() {
        Status::Partial => state.partial(at, next.result().clone()),
        _ => state.completed(at, next.result().clone()),
    }
}

fn not_followed_by(
    grammar: &Grammar,
    child: ParserRef,
    state: ParserState,
    depth: usize,
) -> ParserState {
    let next = apply(grammar, child, state.clone(), depth + 1);
    let at = state.index();
    match next.status() {
        Status::Complete => state.failed(ParseError::negative_lookahead(at)),
        Status::Partial => state.failed(ParseError::unexpected_end(
            at,
            "enough input to decide a negative lookahead",
        )),
        Status::Error if next.needs_more_input() => state.failed(ParseError::unexpected_end(
            at,
            "enough input to decide a negative lookahead",
        )),
        Status::Error => state.completed(at, ParseValue::Null),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::grammar::CharSet;
    use crate::input::InputSnapshot;
    use crate::memo::MemoHandle;

    fn run(grammar: &Grammar, parser: ParserRef, text: &str, done: bool) -> ParserState {
        let cache = MemoHandle::new(ParseOptions::default());
        let state = ParserState::initial(InputSnapshot::new(text, done), cache);
        apply(grammar, parser, state, 0)
    }

    #[test]
    fn test_literal_cases() {
        let mut g = Grammar::new();
        let p = g.literal("abc");

        let full = run(&g, p, "abcd", true);
        assert_eq!(full.status(), Status::Complete);
        assert_eq!(full.index(), 3);
        assert_eq!(full.result().as_text(), Some("abc"));

        let prefix = run(&g, p, "ab", false);
        assert_eq!(prefix.status(), Status::Partial);
        assert_eq!(prefix.index(), 2);
        assert_eq!(prefix.result().as_text(), Some("ab"));

        // A final snapshot cannot go partial.
        let truncated = run(&g, p, "ab", true);
        assert_eq!(truncated.error().map(ParseError::kind), Some(ErrorKind::Mismatch));

        let empty = run(&g, p, "", true);
        assert_eq!(
            empty.error().map(ParseError::kind),
            Some(ErrorKind::UnexpectedEndOfInput)
        );

        let wrong = run(&g, p, "abx", true);
        assert_eq!(wrong.error().map(ParseError::kind), Some(ErrorKind::Mismatch));
        assert_eq!(wrong.index(), 0);
    }

    #[test]
    fn test_any_char_advances_by_whole_chars() {
        let mut g = Grammar::new();
        let p = g.any_char();

        let state = run(&g, p, "é!", true);
        assert_eq!(state.status(), Status::Complete);
        assert_eq!(state.result().as_char(), Some('é'));
        assert_eq!(state.index(), 'é'.len_utf8());
    }

    #[test]
    fn test_char_from() {
        let mut g = Grammar::new();
        let p = g.char_from(CharSet::digits());

        assert_eq!(run(&g, p, "7", true).result().as_char(), Some('7'));
        assert_eq!(
            run(&g, p, "x", true).error().map(ParseError::kind),
            Some(ErrorKind::Mismatch)
        );
        assert_eq!(
            run(&g, p, "", false).error().map(ParseError::kind),
            Some(ErrorKind::UnexpectedEndOfInput)
        );
    }

    #[test]
    fn test_end_of_input_three_cases() {
        let mut g = Grammar::new();
        let p = g.end_of_input();

        assert_eq!(run(&g, p, "", true).status(), Status::Complete);
        assert_eq!(
            run(&g, p, "x", true).error().map(ParseError::kind),
            Some(ErrorKind::Mismatch)
        );
        let undecided = run(&g, p, "", false);
        assert!(undecided.needs_more_input());
    }

    #[test]
    fn test_memo_hit_rewrites_snapshot() {
        let mut g = Grammar::new();
        let lit = g.literal("ab");
        let first = g.followed_by(lit);
        let p = g.sequence_of([first, lit]);

        // `lit` runs under the lookahead and is then replayed from the memo
        // at the same offset.
        let cache = MemoHandle::new(ParseOptions::default());
        let state = ParserState::initial(InputSnapshot::complete("ab"), cache.clone());
        let out = apply(&g, p, state, 0);
        assert_eq!(out.status(), Status::Complete);
        assert_eq!(out.index(), 2);
        assert!(cache.stats().hits >= 1);
    }

    #[test]
    fn test_recursion_guard_reports_left_recursion() {
        let mut g = Grammar::new();
        let slot = g.lazy();
        let digit = g.char_from(CharSet::digits());
        let body = g.sequence_of([slot, digit]);
        g.define(slot, body).unwrap();

        let options = ParseOptions {
            max_recursion_depth: 32,
        };
        let cache = MemoHandle::new(options);
        let state = apply(
            &g,
            body,
            ParserState::initial(InputSnapshot::complete("1"), cache),
            0,
        );
        assert!(state.is_error());
        assert!(
            state
                .error()
                .is_some_and(|e| e.message().contains("left recursion")),
        );
    }
}
