//! # Rill
//!
//! A streaming parser-combinator library built on packrat memoization.
//!
//! ## Overview
//!
//! Rill lets you assemble a recognizer for a formal grammar out of small,
//! composable building blocks and apply it to input that arrives either all
//! at once or as a chunked stream whose total length is unknown until its
//! final chunk. It provides:
//!
//! - **Packrat memoization**: parse time linear in input length, no matter
//!   how much backtracking the grammar induces
//! - **Streaming**: intermediate results over a chunked stream become
//!   observable as soon as they stabilize
//! - **PEG semantics**: ordered choice and unlimited lookahead
//! - **Cyclic grammars**: deferred nodes let rules reference themselves
//!
//! ## Quick Start
//!
//! Whole-string parsing:
//!
//! ```rust
//! use rill::{Grammar, ParseValue, Status};
//!
//! let mut g = Grammar::new();
//! let hello = g.literal("Hello");
//! let sep = g.literal(", ");
//! let world = g.literal("world");
//! let bang = g.literal("!");
//! let greeting = g.sequence_of([hello, sep, world, bang]);
//!
//! let state = g.parse_string(greeting, "Hello, world!");
//! assert_eq!(state.status(), Status::Complete);
//! assert_eq!(state.index(), 13);
//! let parts = state.result().as_list().unwrap();
//! assert_eq!(parts[2], ParseValue::text("world"));
//! ```
//!
//! The same grammar over a chunked stream yields every state that makes
//! observable progress, ending with the terminal verdict:
//!
//! ```rust
//! use rill::{Grammar, Status};
//!
//! let mut g = Grammar::new();
//! let hello = g.literal("Hello");
//! let sep = g.literal(", ");
//! let world = g.literal("world");
//! let bang = g.literal("!");
//! let greeting = g.sequence_of([hello, sep, world, bang]);
//!
//! let states: Vec<_> = g
//!     .parse_stream(greeting, ["Hel", "lo, wo", "rld!"])
//!     .collect();
//! assert!(states.iter().any(|s| s.status() == Status::Partial));
//! assert_eq!(states.last().unwrap().status(), Status::Complete);
//! ```
//!
//! ## Modules
//!
//! - [`grammar`] - Grammar arena, combinators, character sets
//! - [`state`] - Parser states, statuses and result values
//! - [`stream`] - The chunked streaming driver
//! - [`engine`] - Parse options (the transform semantics live here too)
//! - [`input`] - Input snapshots
//! - [`error`] - Error kinds and descriptors
//! - [`memo`] - Packrat memo statistics

pub mod engine;
pub mod error;
pub mod grammar;
pub mod input;
pub mod memo;
pub mod state;
pub mod stream;

pub use engine::ParseOptions;
pub use error::{ErrorKind, ParseError};
pub use grammar::{CharSet, Grammar, GrammarError, ParserRef};
pub use input::InputSnapshot;
pub use memo::MemoStats;
pub use state::{ParseValue, ParserState, Status};
pub use stream::ParseStream;
