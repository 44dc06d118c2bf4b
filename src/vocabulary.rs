use std::collections::BTreeSet;

use smallvec::SmallVec;

use crate::MAX_SLOT_LENGTH;

/// An identifier for a given word, based on its index in the definition's sorted vocabulary.
pub type WordId = usize;

/// A struct representing a word that can be chosen for a slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Word {
    pub string: String,
    pub glyphs: SmallVec<[char; MAX_SLOT_LENGTH]>,
}

impl Word {
    pub fn new(string: &str) -> Word {
        Word {
            string: string.to_string(),
            glyphs: string.chars().collect(),
        }
    }

    /// Length in characters, which is what slot lengths are measured in.
    pub fn len(&self) -> usize {
        self.glyphs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.glyphs.is_empty()
    }

    pub fn glyph_at(&self, idx: usize) -> Option<char> {
        self.glyphs.get(idx).copied()
    }
}

/// Parse a word list, one word per line. Words are trimmed and upper-cased; blank lines are
/// skipped. An empty result is legal.
pub fn load_vocabulary(source: &str) -> BTreeSet<String> {
    source
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_uppercase)
        .collect()
}
