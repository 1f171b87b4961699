//! # Packrat Memo Table
//!
//! Every recognizer application is memoized under (parser identity, entry
//! offset). The table is shared by reference across all nested applications
//! of one top-level parse and discarded when that parse ends; this is what
//! gives packrat parsing its linear-time bound under unbounded backtracking.
//!
//! ## Reusability under streaming
//!
//! A cached entry is not unconditionally valid while the input is still
//! growing:
//!
//! 1. A `Complete` entry depends only on characters before its end index,
//!    and those never change once seen: always reusable.
//! 2. A `Partial` entry is tied to the exact snapshot that produced it; it
//!    must be recomputed once the snapshot grows or becomes final.
//! 3. An `Error` entry is stable, except an end-of-input error raised
//!    against a non-final snapshot: a later chunk may invalidate it.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use hashbrown::HashMap;

use crate::engine::ParseOptions;
use crate::error::ParseError;
use crate::grammar::ParserRef;
use crate::input::InputSnapshot;
use crate::state::{ParseValue, ParserState, Status};

/// Key for memo entries: which parser was applied, and where.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
struct MemoKey {
    parser: ParserRef,
    offset: usize,
}

/// A captured parser state: everything but the memo handle itself.
#[derive(Debug, Clone)]
pub(crate) struct MemoEntry {
    input: InputSnapshot,
    index: usize,
    status: Status,
    result: ParseValue,
    error: Option<ParseError>,
}

impl MemoEntry {
    /// Capture the parts of a produced state worth remembering.
    pub(crate) fn capture(state: &ParserState) -> Self {
        Self {
            input: state.input().clone(),
            index: state.index(),
            status: state.status(),
            result: state.result().clone(),
            error: state.error().cloned(),
        }
    }

    /// Apply the streaming reusability rules against the live snapshot.
    fn is_reusable(&self, current: &InputSnapshot) -> bool {
        match self.status {
            Status::Complete => true,
            Status::Partial => {
                self.input.same_text(current) && self.input.is_done() == current.is_done()
            }
            Status::Error => !self
                .error
                .as_ref()
                .is_some_and(|e| e.is_end_of_input() && !self.input.is_done()),
        }
    }

    /// Rebuild a live state from this entry. The cached offset, status,
    /// result and error are kept; the input snapshot and memo handle track
    /// the live call.
    pub(crate) fn restore(&self, input: InputSnapshot, cache: MemoHandle) -> ParserState {
        ParserState::from_parts(
            input,
            self.index,
            self.status,
            self.result.clone(),
            self.error.clone(),
            cache,
        )
    }
}

/// Counters describing how the memo table was used.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoStats {
    /// Lookups answered from the table.
    pub hits: usize,
    /// Lookups that fell through to the transform (including entries
    /// invalidated by a grown snapshot).
    pub misses: usize,
    /// Entries currently stored.
    pub entries: usize,
}

pub(crate) struct MemoTable {
    entries: HashMap<MemoKey, MemoEntry, ahash::RandomState>,
    stats: MemoStats,
    options: ParseOptions,
}

impl MemoTable {
    fn new(options: ParseOptions) -> Self {
        Self {
            entries: HashMap::with_hasher(ahash::RandomState::new()),
            stats: MemoStats::default(),
            options,
        }
    }
}

/// Shared handle to the memo table of one parse.
///
/// Created by the parse entry points, never shared across parses.
#[derive(Clone)]
pub(crate) struct MemoHandle(Rc<RefCell<MemoTable>>);

impl MemoHandle {
    pub(crate) fn new(options: ParseOptions) -> Self {
        Self(Rc::new(RefCell::new(MemoTable::new(options))))
    }

    /// Look up a reusable entry for `parser` applied at `offset` under the
    /// live snapshot. Records a hit or miss either way.
    pub(crate) fn lookup(
        &self,
        parser: ParserRef,
        offset: usize,
        current: &InputSnapshot,
    ) -> Option<MemoEntry> {
        let mut table = self.0.borrow_mut();
        let reusable = table
            .entries
            .get(&MemoKey { parser, offset })
            .filter(|entry| entry.is_reusable(current))
            .cloned();
        if reusable.is_some() {
            table.stats.hits += 1;
        } else {
            table.stats.misses += 1;
        }
        reusable
    }

    /// Store the state produced by `parser` at `offset`, replacing any
    /// entry invalidated by a grown snapshot.
    pub(crate) fn insert(&self, parser: ParserRef, offset: usize, entry: MemoEntry) {
        let mut table = self.0.borrow_mut();
        table.entries.insert(MemoKey { parser, offset }, entry);
        table.stats.entries = table.entries.len();
    }

    pub(crate) fn stats(&self) -> MemoStats {
        self.0.borrow().stats
    }

    pub(crate) fn max_recursion_depth(&self) -> usize {
        self.0.borrow().options.max_recursion_depth
    }
}

impl fmt::Debug for MemoHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.0.borrow();
        f.debug_struct("MemoHandle")
            .field("entries", &table.entries.len())
            .finish_non_exhaustive()
    }
}
