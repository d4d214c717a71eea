//! Dictionary loading and pure word-formation checks.
//!
//! The dictionary is loaded once at startup and shared immutably across all
//! games. Validation itself is a pure function over the table card, the
//! submitted fragment, and the attachment side.

use crate::deck::FRAGMENT_VOCABULARY;
use log::{info, warn};
use shared::Position;
use std::collections::HashSet;
use std::fs;
use std::io;
use std::path::Path;

/// Small built-in word set used when no dictionary file is available, so a
/// development server still accepts a few obvious formations.
const FALLBACK_WORDS: &[&str] = &[
    "KULIT", "RUMAH", "KOTA", "KATA", "MATA", "HATI", "BUKU", "PENA", "PINTAR", "AKAN",
];

/// Immutable set of valid words, all uppercase.
#[derive(Debug, Clone)]
pub struct Dictionary {
    words: HashSet<String>,
}

impl Dictionary {
    /// Builds a dictionary from an iterator of words, uppercasing each.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_uppercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Loads a newline-delimited word list from `path`.
    pub fn load(path: &Path) -> io::Result<Self> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_words(contents.lines()))
    }

    /// Loads from `path`, falling back to the fragment vocabulary plus a
    /// small built-in word set when the file is missing or unreadable.
    pub fn load_or_fallback(path: &Path) -> Self {
        match Self::load(path) {
            Ok(dictionary) => {
                info!(
                    "Loaded dictionary with {} words from {}",
                    dictionary.len(),
                    path.display()
                );
                dictionary
            }
            Err(e) => {
                warn!(
                    "Could not read dictionary at {}: {}. Using built-in fallback",
                    path.display(),
                    e
                );
                Self::from_words(
                    FRAGMENT_VOCABULARY
                        .iter()
                        .chain(FALLBACK_WORDS.iter())
                        .copied(),
                )
            }
        }
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(&word.to_uppercase())
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Concatenates a fragment onto the table card on the given side.
pub fn form_word(table_card: &str, fragment: &str, position: Position) -> String {
    let table = table_card.to_uppercase();
    let fragment = fragment.to_uppercase();
    match position {
        Position::Before => format!("{fragment}{table}"),
        Position::After => format!("{table}{fragment}"),
    }
}

/// Checks whether attaching `fragment` to `table_card` forms a dictionary
/// word. Returns the formed word only on success.
pub fn validate_word_formation(
    table_card: &str,
    fragment: &str,
    position: Position,
    dictionary: &Dictionary,
) -> Option<String> {
    let formed = form_word(table_card, fragment, position);
    if dictionary.contains(&formed) {
        Some(formed)
    } else {
        None
    }
}

/// Returns true if `fragment` forms a dictionary word on either side of
/// `table_card`. Used by helper-card selection.
pub fn connects_to(fragment: &str, table_card: &str, dictionary: &Dictionary) -> bool {
    validate_word_formation(table_card, fragment, Position::Before, dictionary).is_some()
        || validate_word_formation(table_card, fragment, Position::After, dictionary).is_some()
}

/// Score for an accepted formation: one point per letter of the formed word.
pub fn score_for_word(formed_word: &str) -> u32 {
    formed_word.chars().count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dictionary() -> Dictionary {
        Dictionary::from_words(["KATA", "MAKAN", "RUMAH"])
    }

    #[test]
    fn test_from_words_normalizes_case_and_whitespace() {
        let dictionary = Dictionary::from_words([" kata ", "Rumah", ""]);
        assert_eq!(dictionary.len(), 2);
        assert!(dictionary.contains("KATA"));
        assert!(dictionary.contains("rumah"));
    }

    #[test]
    fn test_form_word_before_and_after() {
        assert_eq!(form_word("KA", "TA", Position::After), "KATA");
        assert_eq!(form_word("KAN", "MA", Position::Before), "MAKAN");
    }

    #[test]
    fn test_validate_accepts_dictionary_word() {
        let formed = validate_word_formation("KA", "TA", Position::After, &dictionary());
        assert_eq!(formed.as_deref(), Some("KATA"));
    }

    #[test]
    fn test_validate_rejects_unknown_word() {
        let formed = validate_word_formation("KA", "ZZ", Position::After, &dictionary());
        assert_eq!(formed, None);
    }

    #[test]
    fn test_validate_is_case_insensitive() {
        let formed = validate_word_formation("ka", "ta", Position::After, &dictionary());
        assert_eq!(formed.as_deref(), Some("KATA"));
    }

    #[test]
    fn test_connects_to_checks_both_sides() {
        let dictionary = dictionary();
        // MA + KAN forms MAKAN only with MA in front.
        assert!(connects_to("MA", "KAN", &dictionary));
        assert!(connects_to("KAN", "MA", &dictionary));
        assert!(!connects_to("ZZ", "KA", &dictionary));
    }

    #[test]
    fn test_score_is_word_length() {
        assert_eq!(score_for_word("KATA"), 4);
        assert_eq!(score_for_word("MAKAN"), 5);
    }
}
