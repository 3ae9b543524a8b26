//! Read-only word pairs and the MrWhite guess check.

use rand::Rng;

use crate::domain::state::WordAssignment;
use crate::errors::domain::{DomainError, ValidationKind};

/// Text shown to MrWhite participants in place of a word.
pub const MR_WHITE_MARKER: &str = "You are Mr. White";

const BUILTIN_PAIRS: &[(&str, &str)] = &[
    ("coffee", "tea"),
    ("cat", "dog"),
    ("beach", "desert"),
    ("guitar", "violin"),
    ("pizza", "burger"),
    ("train", "bus"),
    ("winter", "autumn"),
    ("doctor", "nurse"),
    ("moon", "sun"),
    ("piano", "organ"),
    ("football", "rugby"),
    ("apple", "pear"),
    ("castle", "palace"),
    ("river", "lake"),
    ("pencil", "crayon"),
    ("butter", "margarine"),
    ("wolf", "fox"),
    ("painting", "photograph"),
    ("cinema", "theatre"),
    ("honey", "jam"),
    ("bicycle", "scooter"),
    ("shark", "dolphin"),
    ("library", "bookshop"),
    ("wedding", "birthday"),
    ("mountain", "volcano"),
    ("pillow", "blanket"),
    ("chess", "checkers"),
    ("lemon", "lime"),
    ("airport", "station"),
    ("candle", "lantern"),
];

/// One (civilian, undercover) pair drawn for a game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordPair {
    pub civilian: String,
    pub undercover: String,
}

/// Static table of word pairs, injected into the flow service.
#[derive(Debug, Clone)]
pub struct WordBank {
    pairs: Vec<(String, String)>,
}

impl Default for WordBank {
    fn default() -> Self {
        Self::builtin()
    }
}

impl WordBank {
    pub fn builtin() -> Self {
        Self {
            pairs: BUILTIN_PAIRS
                .iter()
                .map(|(a, b)| ((*a).to_string(), (*b).to_string()))
                .collect(),
        }
    }

    /// Custom table. Every pair needs two distinct, non-blank words.
    pub fn new<I, S>(pairs: I) -> Result<Self, DomainError>
    where
        I: IntoIterator<Item = (S, S)>,
        S: Into<String>,
    {
        let mut checked = Vec::new();
        for (a, b) in pairs {
            let (a, b): (String, String) = (a.into(), b.into());
            let (a, b) = (a.trim().to_string(), b.trim().to_string());
            if a.is_empty() || b.is_empty() || a.eq_ignore_ascii_case(&b) {
                return Err(DomainError::validation(
                    ValidationKind::InvalidConfiguration,
                    format!("word pair ({a:?}, {b:?}) must hold two distinct words"),
                ));
            }
            checked.push((a, b));
        }
        if checked.is_empty() {
            return Err(DomainError::validation(
                ValidationKind::InvalidConfiguration,
                "word bank is empty",
            ));
        }
        Ok(Self { pairs: checked })
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Uniform pair, with a coin flip for which side the civilians get.
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> WordPair {
        let (a, b) = &self.pairs[rng.random_range(0..self.pairs.len())];
        if rng.random_bool(0.5) {
            WordPair {
                civilian: a.clone(),
                undercover: b.clone(),
            }
        } else {
            WordPair {
                civilian: b.clone(),
                undercover: a.clone(),
            }
        }
    }
}

impl WordPair {
    pub fn into_assignment(self, with_mr_white: bool) -> WordAssignment {
        WordAssignment {
            civilian_word: self.civilian,
            undercover_word: self.undercover,
            mr_white_marker: with_mr_white.then(|| MR_WHITE_MARKER.to_string()),
        }
    }
}

/// Case-insensitive match after trimming both sides.
pub fn guess_matches(guess: &str, civilian_word: &str) -> bool {
    guess.trim().to_lowercase() == civilian_word.trim().to_lowercase()
}
