pub mod builder;
pub mod schema;

use crate::inference::sentiment::SentimentAnalyzer;
use crate::inference::Artifacts;
use crate::models::input::RawInput;
use builder::{build_feature_vector, FeatureVector};

/// Polarity of `text`, or 0.0 when the analyzer fails.
pub fn sentiment_or_neutral(analyzer: &dyn SentimentAnalyzer, text: &str) -> f64 {
    match analyzer.polarity(text) {
        Ok(score) if score.is_finite() => score.clamp(-1.0, 1.0),
        Ok(score) => {
            tracing::warn!(score, "Non-finite sentiment score, using neutral");
            0.0
        }
        Err(e) => {
            tracing::warn!(error = %e, "Sentiment analysis failed, using neutral");
            0.0
        }
    }
}

pub struct Assembled {
    pub sentiment_score: f64,
    pub vector: FeatureVector,
}

/// Scores the post text then builds the schema-ordered vector.
pub fn assemble(artifacts: &Artifacts, input: &RawInput) -> Assembled {
    let sentiment_score = sentiment_or_neutral(artifacts.sentiment.as_ref(), &input.post_text);
    let vector = build_feature_vector(input, sentiment_score, &artifacts.schema);
    Assembled {
        sentiment_score,
        vector,
    }
}
