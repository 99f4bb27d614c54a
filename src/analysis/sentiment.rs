//! Sentiment scoring.
//!
//! The threshold policy lives on [`Sentiment::from_polarity`]; this module
//! defines the polarity boundary ([`PolarityEngine`]) and the two bundled
//! engines. Any engine returning a value in `[-1, 1]` can be swapped in.

use std::sync::Arc;

use super::lexicon::SentimentLexicon;
use crate::domain::Sentiment;

/// Smoothing constant of the compound normalization.
const COMPOUND_ALPHA: f64 = 15.0;

/// Lexicon valences are rescaled to this range before compound normalization.
const VALENCE_SCALE: f64 = 4.0;

/// Maps text to a polarity in `[-1, 1]`.
pub trait PolarityEngine: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// Polarity of `text`; 0.0 means no signal.
    fn polarity(&self, text: &str) -> f64;
}

/// Scores `text` with `engine` and buckets the result.
///
/// Out-of-range values are clamped and NaN counts as neutral, so a
/// misbehaving engine cannot produce an invalid label.
pub fn classify_sentiment(engine: &dyn PolarityEngine, text: &str) -> Sentiment {
    let polarity = engine.polarity(text);
    if polarity.is_nan() {
        return Sentiment::Neutral;
    }
    Sentiment::from_polarity(polarity.clamp(-1.0, 1.0))
}

/// Mean of the matched word valences.
pub struct AveragePolarity {
    lexicon: Arc<SentimentLexicon>,
}

impl AveragePolarity {
    pub fn new(lexicon: Arc<SentimentLexicon>) -> Self {
        Self { lexicon }
    }
}

impl PolarityEngine for AveragePolarity {
    fn name(&self) -> &str {
        "average"
    }

    fn polarity(&self, text: &str) -> f64 {
        let matched = self.lexicon.analyze(text);
        if matched.is_empty() {
            return 0.0;
        }
        (matched.sum() / matched.scores.len() as f64).clamp(-1.0, 1.0)
    }
}

/// Sum of valences squashed into `[-1, 1]` with `x / sqrt(x² + alpha)`.
///
/// Unlike the average, repeated cues push the score further out.
pub struct CompoundPolarity {
    lexicon: Arc<SentimentLexicon>,
}

impl CompoundPolarity {
    pub fn new(lexicon: Arc<SentimentLexicon>) -> Self {
        Self { lexicon }
    }
}

impl PolarityEngine for CompoundPolarity {
    fn name(&self) -> &str {
        "compound"
    }

    fn polarity(&self, text: &str) -> f64 {
        let sum = self.lexicon.analyze(text).sum() * VALENCE_SCALE;
        if sum == 0.0 {
            return 0.0;
        }
        (sum / (sum * sum + COMPOUND_ALPHA).sqrt()).clamp(-1.0, 1.0)
    }
}
