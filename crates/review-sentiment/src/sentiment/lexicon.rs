//! Lexicon-based polarity estimation.
//!
//! The score of a text is the mean polarity of the lexicon words it contains.
//! A word preceded by an intensifier ("very good") is scaled up, and a word
//! with a negation among the three tokens before it ("not good", "don t love")
//! is flipped and halved. Texts without any lexicon word score 0.0.

use super::PolarityScorer;
use crate::error::{ReviewError, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Multiplier applied to a negated word.
const NEGATION_FACTOR: f64 = -0.5;

/// Number of preceding tokens searched for a negation.
const NEGATION_WINDOW: usize = 3;

const DEFAULT_WORDS: &[(&str, f64)] = &[
    // positive
    ("good", 0.7),
    ("great", 0.8),
    ("excellent", 1.0),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("loves", 0.5),
    ("lovely", 0.5),
    ("nice", 0.6),
    ("perfect", 1.0),
    ("perfectly", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("happy", 0.8),
    ("delicious", 1.0),
    ("tasty", 0.6),
    ("yummy", 0.8),
    ("fresh", 0.3),
    ("favorite", 0.5),
    ("recommended", 0.3),
    ("satisfied", 0.5),
    ("satisfying", 0.5),
    ("pleased", 0.5),
    ("beautiful", 0.85),
    ("easy", 0.43),
    ("fast", 0.2),
    ("quick", 0.33),
    ("smooth", 0.4),
    ("sturdy", 0.3),
    ("comfortable", 0.4),
    ("affordable", 0.3),
    ("worth", 0.3),
    ("superb", 1.0),
    ("brilliant", 0.9),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("glad", 0.5),
    ("fine", 0.4),
    ("solid", 0.3),
    ("reliable", 0.4),
    ("impressive", 1.0),
    ("impressed", 0.6),
    ("outstanding", 0.5),
    ("incredible", 0.9),
    ("terrific", 0.7),
    ("fun", 0.3),
    ("helpful", 0.4),
    ("cool", 0.35),
    ("cute", 0.5),
    ("friendly", 0.4),
    ("healthy", 0.5),
    ("strong", 0.43),
    ("clean", 0.37),
    ("exceptional", 0.67),
    ("superior", 0.7),
    ("fabulous", 0.4),
    ("decent", 0.17),
    ("ok", 0.5),
    ("okay", 0.5),
    ("positive", 0.2),
    ("wow", 0.1),
    // negative
    ("bad", -0.7),
    ("worst", -1.0),
    ("worse", -0.4),
    ("terrible", -1.0),
    ("horrible", -1.0),
    ("awful", -1.0),
    ("poor", -0.4),
    ("poorly", -0.4),
    ("disappointing", -0.6),
    ("disappointed", -0.75),
    ("disappointment", -0.6),
    ("waste", -0.2),
    ("wasted", -0.2),
    ("useless", -0.5),
    ("broken", -0.4),
    ("defective", -0.6),
    ("hate", -0.8),
    ("hated", -0.9),
    ("disgusting", -1.0),
    ("stale", -0.5),
    ("bland", -0.5),
    ("nasty", -1.0),
    ("wrong", -0.5),
    ("damaged", -0.5),
    ("fake", -0.5),
    ("sad", -0.5),
    ("angry", -0.5),
    ("annoying", -0.8),
    ("slow", -0.3),
    ("expensive", -0.5),
    ("overpriced", -0.6),
    ("weak", -0.375),
    ("flimsy", -0.5),
    ("faulty", -0.6),
    ("unhappy", -0.6),
    ("gross", -0.4),
    ("rude", -0.4),
    ("boring", -1.0),
    ("sick", -0.7),
    ("difficult", -0.5),
    ("hard", -0.29),
    ("noisy", -0.3),
    ("dirty", -0.6),
    ("late", -0.3),
    ("smelly", -0.5),
    ("bitter", -0.3),
    ("ugly", -0.7),
    ("mediocre", -0.3),
    ("average", -0.15),
    ("problem", -0.3),
    ("problems", -0.3),
    ("fail", -0.5),
    ("failed", -0.5),
    ("fails", -0.5),
    ("unreliable", -0.4),
    ("pathetic", -1.0),
    ("junk", -0.6),
    ("garbage", -0.6),
    ("trash", -0.6),
    ("crap", -0.8),
    ("worthless", -0.8),
    ("ridiculous", -0.33),
    ("negative", -0.3),
];

const DEFAULT_INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.3),
    ("extremely", 1.5),
    ("highly", 1.4),
    ("absolutely", 1.5),
    ("totally", 1.3),
    ("incredibly", 1.5),
    ("truly", 1.3),
    ("especially", 1.2),
    ("exceptionally", 1.4),
    ("quite", 1.1),
    ("pretty", 1.1),
    ("too", 1.2),
];

const DEFAULT_NEGATIONS: &[&str] = &[
    "not", "no", "never", "nothing", "none", "nor", "neither", "hardly", "barely", "without",
    // tail of a contraction after punctuation is stripped ("don't" -> "don t")
    "t", "dont", "doesnt", "didnt", "isnt", "wasnt", "cant", "wont", "couldnt", "wouldnt",
    "shouldnt", "arent", "werent", "havent", "hasnt", "aint",
];

/// Built-in polarity scorer backed by a word lexicon.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    words: HashMap<String, f64>,
    intensifiers: HashMap<String, f64>,
    negations: HashSet<String>,
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS
                .iter()
                .map(|&(word, polarity)| (word.to_string(), polarity))
                .collect(),
            intensifiers: DEFAULT_INTENSIFIERS
                .iter()
                .map(|&(word, factor)| (word.to_string(), factor))
                .collect(),
            negations: DEFAULT_NEGATIONS.iter().map(|w| w.to_string()).collect(),
        }
    }
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a lexicon entry. The polarity is clamped to `[-1, 1]`.
    pub fn with_word(mut self, word: impl Into<String>, polarity: f64) -> Self {
        self.words.insert(word.into(), polarity.clamp(-1.0, 1.0));
        self
    }

    /// Built-in lexicon with the entries of a JSON object (`{"word": polarity}`)
    /// merged on top.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let entries: HashMap<String, f64> = serde_json::from_str(&content)?;

        let mut scorer = Self::default();
        for (word, polarity) in entries {
            if !polarity.is_finite() || !(-1.0..=1.0).contains(&polarity) {
                return Err(ReviewError::Scoring(format!(
                    "lexicon entry '{word}' has polarity {polarity} outside [-1, 1]"
                )));
            }
            scorer.words.insert(word.to_lowercase(), polarity);
        }

        debug!(
            "Loaded lexicon from {} ({} words)",
            path.as_ref().display(),
            scorer.words.len()
        );
        Ok(scorer)
    }

    /// Number of words with a polarity.
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Mean polarity of the lexicon words in `text`, in `[-1, 1]`.
    pub fn score(&self, text: &str) -> f64 {
        let tokens: Vec<&str> = text.split_whitespace().collect();
        let mut total = 0.0;
        let mut hits = 0usize;

        for (i, token) in tokens.iter().enumerate() {
            let Some(&polarity) = self.words.get(*token) else {
                continue;
            };

            let mut value = polarity;
            if i > 0
                && let Some(&factor) = self.intensifiers.get(tokens[i - 1])
            {
                value *= factor;
            }

            let window = &tokens[i.saturating_sub(NEGATION_WINDOW)..i];
            if window.iter().any(|t| self.negations.contains(*t)) {
                value *= NEGATION_FACTOR;
            }

            total += value.clamp(-1.0, 1.0);
            hits += 1;
        }

        if hits == 0 {
            0.0
        } else {
            (total / hits as f64).clamp(-1.0, 1.0)
        }
    }
}

impl PolarityScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> anyhow::Result<f64> {
        Ok(self.score(text))
    }

    fn name(&self) -> &str {
        "lexicon"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sentiment::classify;
    use crate::types::Sentiment;
    use std::io::Write;

    fn label(text: &str) -> Sentiment {
        classify(&LexiconScorer::default(), text).unwrap()
    }

    #[test]
    fn test_plain_words() {
        let scorer = LexiconScorer::default();
        assert_eq!(scorer.score("this product is great"), 0.8);
        assert!((scorer.score("terrible waste of money") - (-0.6)).abs() < 1e-9);
        assert_eq!(scorer.score("the box arrived on tuesday"), 0.0);
        assert_eq!(scorer.score(""), 0.0);
    }

    #[test]
    fn test_labels() {
        assert_eq!(label("really delicious and fresh"), Sentiment::Positive);
        assert_eq!(label("stale and bland"), Sentiment::Negative);
        assert_eq!(label("arrived on monday"), Sentiment::Neutral);
        assert_eq!(label("good but bad"), Sentiment::Neutral);
    }

    #[test]
    fn test_intensifier() {
        let scorer = LexiconScorer::default();
        assert!((scorer.score("very good") - 0.91).abs() < 1e-9);
        // clamped to the valid range
        assert_eq!(scorer.score("absolutely perfect"), 1.0);
    }

    #[test]
    fn test_negation() {
        let scorer = LexiconScorer::default();
        assert!((scorer.score("not good") - (-0.35)).abs() < 1e-9);
        assert_eq!(label("i don t love it"), Sentiment::Negative);
        assert_eq!(label("not bad at all"), Sentiment::Positive);
        // outside the window
        assert_eq!(scorer.score("no complaints here at all good"), 0.7);
    }

    #[test]
    fn test_with_word() {
        let scorer = LexiconScorer::default().with_word("meh", -3.0);
        assert_eq!(scorer.score("meh"), -1.0);
    }

    #[test]
    fn test_from_json_file_merges() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"meh": -0.3, "Good": 0.1}}"#).unwrap();

        let scorer = LexiconScorer::from_json_file(file.path()).unwrap();
        assert_eq!(scorer.score("meh"), -0.3);
        assert_eq!(scorer.score("good"), 0.1);
        assert_eq!(scorer.score("bad"), -0.7);
        assert_eq!(scorer.len(), LexiconScorer::default().len() + 1);
    }

    #[test]
    fn test_from_json_file_rejects_out_of_range() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"meh": -4.0}}"#).unwrap();

        let err = LexiconScorer::from_json_file(file.path()).unwrap_err();
        assert_eq!(err.error_code(), "SCORING_ERROR");
    }
}
