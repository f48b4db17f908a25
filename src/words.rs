//! Kill word sources.
//!
//! A [`PhraseSource`] hands out one phrase per call. Whether phrases
//! repeat, and when, is the source's own business; the model only asks
//! for the next one whenever a contract changes hands.

use std::io::Read;
use std::path::Path;

use rand::Rng;
use rand::seq::SliceRandom;

use crate::error::WordListError;

/// A stateful generator of secret phrases.
pub trait PhraseSource: Send + Sync {
    /// Returns the next phrase.
    fn next_phrase(&mut self) -> String;
}

/// A finite list of words handed out cyclically.
///
/// Once the last word has been used the list starts again from the top,
/// so a list shorter than the number of reassignments will repeat words.
#[derive(Debug, Clone)]
pub struct WordList {
    words: Vec<String>,
    cursor: usize,
}

impl WordList {
    /// Creates a list that hands out `words` in the given order.
    ///
    /// # Errors
    ///
    /// Returns [`WordListError::Empty`] if `words` is empty.
    pub fn new<I, S>(words: I) -> Result<Self, WordListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let words: Vec<String> = words
            .into_iter()
            .map(Into::into)
            .filter(|w| !w.is_empty())
            .collect();
        if words.is_empty() {
            return Err(WordListError::Empty);
        }
        Ok(Self { words, cursor: 0 })
    }

    /// Creates a list from `words`, shuffled once with `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`WordListError::Empty`] if `words` is empty.
    pub fn shuffled<I, S, R>(words: I, rng: &mut R) -> Result<Self, WordListError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
        R: Rng + ?Sized,
    {
        let mut list = Self::new(words)?;
        list.words.shuffle(rng);
        Ok(list)
    }

    /// Reads whitespace-separated words from `reader` and shuffles them.
    ///
    /// # Errors
    ///
    /// Returns [`WordListError::Io`] if reading fails and
    /// [`WordListError::Empty`] if the reader yields no words.
    pub fn from_reader<Rd, R>(mut reader: Rd, rng: &mut R) -> Result<Self, WordListError>
    where
        Rd: Read,
        R: Rng + ?Sized,
    {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Self::shuffled(text.split_whitespace(), rng)
    }

    /// Loads and shuffles a word file.
    ///
    /// # Errors
    ///
    /// See [`WordList::from_reader`].
    pub fn from_path(path: &Path) -> Result<Self, WordListError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file, &mut rand::rng())
    }

    /// Number of distinct entries before the list cycles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always `false`; empty lists cannot be constructed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

impl PhraseSource for WordList {
    fn next_phrase(&mut self) -> String {
        let word = self.words[self.cursor].clone();
        self.cursor = (self.cursor + 1) % self.words.len();
        word
    }
}
