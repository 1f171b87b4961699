//! # Input Snapshots
//!
//! A parse runs against a snapshot of the input seen so far: the
//! accumulated text plus a flag saying whether more will ever arrive.
//!
//! In whole-string mode the snapshot is final from the outset. In streaming
//! mode the driver takes a fresh snapshot per chunk; the text buffer only
//! ever grows, so characters at offsets already seen never change.
//!
//! Offsets into a snapshot are byte offsets. They always land on UTF-8
//! character boundaries because recognizers advance by whole characters and
//! chunks are themselves valid strings.

use std::fmt;
use std::sync::Arc;

/// The input visible to a parse: accumulated text and whether it is final.
#[derive(Clone)]
pub struct InputSnapshot {
    text: Arc<str>,
    done: bool,
}

impl InputSnapshot {
    /// Create a snapshot from text and a finality flag.
    #[must_use]
    pub fn new(text: impl Into<Arc<str>>, done: bool) -> Self {
        Self {
            text: text.into(),
            done,
        }
    }

    /// A final snapshot: no further characters will ever arrive.
    #[must_use]
    pub fn complete(text: impl Into<Arc<str>>) -> Self {
        Self::new(text, true)
    }

    /// A non-final snapshot: more chunks may extend the text.
    #[must_use]
    pub fn growing(text: impl Into<Arc<str>>) -> Self {
        Self::new(text, false)
    }

    /// The visible text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length of the visible text in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Whether no text is visible yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Whether this snapshot is final.
    #[must_use]
    pub const fn is_done(&self) -> bool {
        self.done
    }

    /// The text from `index` to the end of the snapshot.
    #[must_use]
    pub fn tail(&self, index: usize) -> &str {
        &self.text[index..]
    }

    /// The character starting at byte offset `index`, if any is visible.
    #[must_use]
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.tail(index).chars().next()
    }

    /// Whether two snapshots show the same text.
    ///
    /// Snapshots taken within one driver step share the same buffer, so the
    /// pointer comparison usually decides this without scanning.
    #[must_use]
    pub(crate) fn same_text(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.text, &other.text) || self.text == other.text
    }
}

impl PartialEq for InputSnapshot {
    fn eq(&self, other: &Self) -> bool {
        self.done == other.done && self.same_text(other)
    }
}

impl Eq for InputSnapshot {}

impl fmt::Debug for InputSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InputSnapshot")
            .field("text", &self.as_str())
            .field("done", &self.done)
            .finish()
    }
}
