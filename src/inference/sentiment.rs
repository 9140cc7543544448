//! Lexicon-based sentiment polarity.
//!
//! Scores each known word, lets intensifiers scale and negators flip the
//! next scored word, then averages. The result is clamped to [-1, 1]; text
//! without any known word is neutral.

use std::collections::HashMap;

use crate::inference::InferenceError;

pub trait SentimentAnalyzer: Send + Sync {
    fn polarity(&self, text: &str) -> Result<f64, InferenceError>;
}

const NEGATION_FACTOR: f64 = -0.5;

const POLARITY: &[(&str, f64)] = &[
    ("good", 0.7),
    ("great", 0.8),
    ("happy", 0.8),
    ("glad", 0.5),
    ("love", 0.5),
    ("loved", 0.7),
    ("lovely", 0.5),
    ("excited", 0.375),
    ("amazing", 0.6),
    ("awesome", 1.0),
    ("wonderful", 1.0),
    ("fantastic", 0.4),
    ("excellent", 1.0),
    ("best", 1.0),
    ("better", 0.5),
    ("nice", 0.6),
    ("fun", 0.3),
    ("calm", 0.3),
    ("relaxed", 0.4),
    ("peaceful", 0.25),
    ("grateful", 0.5),
    ("thankful", 0.4),
    ("hopeful", 0.4),
    ("proud", 0.8),
    ("fine", 0.4),
    ("okay", 0.5),
    ("ok", 0.5),
    ("positive", 0.2),
    ("energetic", 0.4),
    ("motivated", 0.4),
    ("joy", 0.8),
    ("beautiful", 0.85),
    ("enjoy", 0.4),
    ("enjoyed", 0.4),
    ("bad", -0.7),
    ("worse", -0.4),
    ("worst", -1.0),
    ("sad", -0.5),
    ("unhappy", -0.6),
    ("depressed", -0.6),
    ("depressing", -0.6),
    ("lonely", -0.5),
    ("alone", -0.3),
    ("tired", -0.4),
    ("exhausted", -0.5),
    ("anxious", -0.5),
    ("worried", -0.4),
    ("stressed", -0.5),
    ("angry", -0.5),
    ("upset", -0.5),
    ("terrible", -1.0),
    ("awful", -1.0),
    ("horrible", -1.0),
    ("miserable", -1.0),
    ("hopeless", -0.8),
    ("worthless", -0.8),
    ("empty", -0.1),
    ("hate", -0.8),
    ("hurt", -0.4),
    ("pain", -0.5),
    ("cry", -0.4),
    ("crying", -0.4),
    ("scared", -0.5),
    ("afraid", -0.6),
    ("broken", -0.4),
    ("lost", -0.3),
    ("sick", -0.7),
    ("boring", -1.0),
    ("bored", -0.5),
    ("negative", -0.3),
    ("overwhelmed", -0.5),
    ("dark", -0.15),
    ("numb", -0.4),
    ("useless", -0.5),
    ("fail", -0.5),
    ("failed", -0.5),
];

const INTENSIFIERS: &[(&str, f64)] = &[
    ("very", 1.3),
    ("really", 1.2),
    ("so", 1.2),
    ("extremely", 1.5),
    ("super", 1.4),
    ("totally", 1.3),
    ("quite", 1.1),
    ("slightly", 0.6),
    ("somewhat", 0.7),
    ("bit", 0.7),
];

const NEGATORS: &[&str] = &["not", "no", "never", "nothing", "nobody", "none", "hardly", "cannot"];

pub struct LexiconSentiment {
    polarity: HashMap<&'static str, f64>,
    intensifiers: HashMap<&'static str, f64>,
}

impl Default for LexiconSentiment {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconSentiment {
    pub fn new() -> Self {
        Self {
            polarity: POLARITY.iter().copied().collect(),
            intensifiers: INTENSIFIERS.iter().copied().collect(),
        }
    }

    fn is_negator(token: &str) -> bool {
        NEGATORS.iter().any(|n| *n == token)
            || token.ends_with("n't")
            || matches!(token, "dont" | "cant" | "wont" | "isnt" | "didnt" | "doesnt" | "wasnt" | "arent")
    }
}

impl SentimentAnalyzer for LexiconSentiment {
    fn polarity(&self, text: &str) -> Result<f64, InferenceError> {
        let lowered = text.to_lowercase();
        let tokens = lowered
            .split(|c: char| !(c.is_alphanumeric() || c == '\''))
            .filter(|t| !t.is_empty());

        let mut modifier = 1.0_f64;
        let mut total = 0.0_f64;
        let mut scored = 0usize;

        for token in tokens {
            if Self::is_negator(token) {
                modifier *= NEGATION_FACTOR;
                continue;
            }
            if let Some(factor) = self.intensifiers.get(token) {
                modifier *= factor;
                continue;
            }
            if let Some(score) = self.polarity.get(token) {
                total += (score * modifier).clamp(-1.0, 1.0);
                scored += 1;
                modifier = 1.0;
            }
        }

        if scored == 0 {
            return Ok(0.0);
        }
        Ok((total / scored as f64).clamp(-1.0, 1.0))
    }
}
