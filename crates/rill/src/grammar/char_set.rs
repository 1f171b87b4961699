//! Character sets for the single-character recognizer.
//!
//! A set is a list of inclusive character ranges; a singleton is a range of
//! one. Ranges given with their endpoints swapped are normalized on
//! construction.

use smallvec::SmallVec;

/// A set of characters: singletons and inclusive ranges.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CharSet {
    ranges: SmallVec<[(char, char); 8]>,
}

impl CharSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a single character.
    #[must_use]
    pub fn with_char(mut self, c: char) -> Self {
        self.ranges.push((c, c));
        self
    }

    /// Add every character in `chars` as a singleton.
    #[must_use]
    pub fn with_chars(mut self, chars: &str) -> Self {
        self.ranges.extend(chars.chars().map(|c| (c, c)));
        self
    }

    /// Add an inclusive range. Swapped endpoints are normalized.
    #[must_use]
    pub fn with_range(mut self, lo: char, hi: char) -> Self {
        if lo <= hi {
            self.ranges.push((lo, hi));
        } else {
            self.ranges.push((hi, lo));
        }
        self
    }

    /// The decimal digits `[0-9]`.
    #[must_use]
    pub fn digits() -> Self {
        Self::new().with_range('0', '9')
    }

    /// Space, tab, carriage return and newline.
    #[must_use]
    pub fn whitespace() -> Self {
        Self::new().with_chars(" \t\r\n")
    }

    /// The ASCII lowercase letters `[a-z]`.
    #[must_use]
    pub fn ascii_lowercase() -> Self {
        Self::new().with_range('a', 'z')
    }

    /// The ASCII uppercase letters `[A-Z]`.
    #[must_use]
    pub fn ascii_uppercase() -> Self {
        Self::new().with_range('A', 'Z')
    }

    /// Whether the set contains no ranges at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Check if a character matches this set.
    #[must_use]
    pub fn matches(&self, c: char) -> bool {
        self.ranges.iter().any(|&(lo, hi)| c >= lo && c <= hi)
    }

    /// Render the set for error messages, e.g. `[0-9, x]`.
    pub(crate) fn describe(&self) -> String {
        let mut out = String::from("[");
        for (i, &(lo, hi)) in self.ranges.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            if lo == hi {
                out.push(lo);
            } else {
                out.push(lo);
                out.push('-');
                out.push(hi);
            }
        }
        out.push(']');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_singletons_and_ranges() {
        let set = CharSet::new().with_chars("xy").with_range('0', '9');
        assert!(set.matches('x'));
        assert!(set.matches('5'));
        assert!(!set.matches('a'));
    }

    #[test]
    fn test_swapped_range_normalized() {
        let set = CharSet::new().with_range('9', '0');
        assert!(set.matches('4'));
        assert!(!set.matches('a'));
    }

    #[test]
    fn test_premade_sets() {
        assert!(CharSet::digits().matches('7'));
        assert!(!CharSet::digits().matches('x'));
        assert!(CharSet::whitespace().matches('\t'));
        assert!(CharSet::ascii_lowercase().matches('q'));
        assert!(CharSet::ascii_uppercase().matches('Q'));
    }

    #[test]
    fn test_empty_set_matches_nothing() {
        let set = CharSet::new();
        assert!(set.is_empty());
        assert!(!set.matches('a'));
    }

    #[test]
    fn test_describe() {
        let set = CharSet::new().with_range('0', '9').with_char('x');
        assert_eq!(set.describe(), "[0-9, x]");
    }
}
