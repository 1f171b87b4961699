//! # Streaming Driver
//!
//! Drives a top-level parser against a chunked input whose total length is
//! unknown until its final chunk.
//!
//! ## Per-chunk protocol
//!
//! Each chunk is appended to an accumulating buffer and the top-level
//! parser is re-run from offset zero against the grown snapshot. Re-running
//! from zero is cheap: the memo table is shared across the whole stream, so
//! every (parser, offset) pair already decided is answered from cache. The
//! produced state is suppressed when it is still asking for more input
//! (an end-of-input error over a non-final snapshot) or when it makes no
//! observable progress over the last emitted state; everything else is
//! yielded. A terminal state stops chunk consumption.
//!
//! When the chunk source runs dry without a terminal verdict, one final
//! transform runs with the snapshot marked final and its state is yielded
//! unconditionally. Only this flush can commit verdicts that depend on true
//! end of input.
//!
//! ## Usage
//!
//! ```rust
//! use rill::{Grammar, Status};
//!
//! let mut g = Grammar::new();
//! let p = g.literal("Hello, world!");
//!
//! let states: Vec<_> = g.parse_stream(p, ["Hello", ", wor", "ld!"]).collect();
//! let last = states.last().unwrap();
//! assert_eq!(last.status(), Status::Complete);
//! assert_eq!(last.index(), 13);
//! ```

use std::sync::Arc;

use crate::engine::{self, ParseOptions};
use crate::grammar::{Grammar, ParserRef};
use crate::input::InputSnapshot;
use crate::memo::{MemoHandle, MemoStats};
use crate::state::{ParserState, Status};

/// Lazy sequence of observable parser states over a chunked input.
///
/// Yields each state that makes observable progress; the last yielded state
/// is terminal. Dropping the stream cancels the parse; the memo table and
/// buffer go with it.
pub struct ParseStream<'g, I> {
    grammar: &'g Grammar,
    start: ParserRef,
    chunks: I,
    buffer: String,
    cache: MemoHandle,
    last_text: Arc<str>,
    last_index: usize,
    last_status: Status,
    finished: bool,
}

impl<'g, I> ParseStream<'g, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    pub(crate) fn new(
        grammar: &'g Grammar,
        start: ParserRef,
        chunks: I,
        options: ParseOptions,
    ) -> Self {
        Self {
            grammar,
            start,
            chunks,
            buffer: String::new(),
            cache: MemoHandle::new(options),
            last_text: Arc::from(""),
            last_index: 0,
            last_status: Status::Partial,
            finished: false,
        }
    }

    /// Memo table usage counters for this parse so far.
    #[must_use]
    pub fn memo_stats(&self) -> MemoStats {
        self.cache.stats()
    }

    fn run(&self, done: bool) -> ParserState {
        let snapshot = InputSnapshot::new(self.buffer.as_str(), done);
        let state = ParserState::initial(snapshot, self.cache.clone());
        engine::apply(self.grammar, self.start, state, 0)
    }

    fn progressed(&self, state: &ParserState) -> bool {
        state.index() != self.last_index
            || state.status() != self.last_status
            || &*self.last_text != state.input().as_str()
    }
}

impl<I> Iterator for ParseStream<'_, I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = ParserState;

    fn next(&mut self) -> Option<ParserState> {
        if self.finished {
            return None;
        }

        loop {
            let Some(chunk) = self.chunks.next() else {
                // Source exhausted without a verdict: commit the snapshot as
                // final and yield whatever that decides, unconditionally.
                self.finished = true;
                return Some(self.run(true));
            };

            self.buffer.push_str(chunk.as_ref());
            let state = self.run(false);

            if state.needs_more_input() {
                continue;
            }
            if !self.progressed(&state) {
                continue;
            }

            self.last_text = Arc::from(state.input().as_str());
            self.last_index = state.index();
            self.last_status = state.status();
            if state.is_terminal() {
                self.finished = true;
            }
            return Some(state);
        }
    }
}
