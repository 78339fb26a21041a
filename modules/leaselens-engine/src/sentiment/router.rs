//! Confidence-based routing between the rule engine and the nuanced model.

use std::time::Duration;

use tracing::{debug, warn};

use leaselens_common::{Sentiment, SentimentTier};

use crate::sentiment::lexicon;
use crate::traits::SentimentClassifier;

/// Lexicon scores at or above this magnitude classify without a model call.
pub const RULE_CONFIDENCE_THRESHOLD: f64 = 3.0;

/// The outcome of classifying one comment. Exactly one variant per
/// comment; which one is a pure function of the lexicon score and, for
/// borderline scores, whether the model call succeeded.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Classification {
    /// Confident lexicon score, label is its sign.
    Rule { sentiment: Sentiment, score: f64 },
    /// Borderline score, the nuanced model supplied the label.
    Model { sentiment: Sentiment, score: f64 },
    /// Borderline score and the model call failed; label falls back to
    /// the lexicon sign, neutral at exactly zero.
    Fallback { sentiment: Sentiment, score: f64 },
}

impl Classification {
    pub fn sentiment(&self) -> Sentiment {
        match self {
            Classification::Rule { sentiment, .. }
            | Classification::Model { sentiment, .. }
            | Classification::Fallback { sentiment, .. } => *sentiment,
        }
    }

    pub fn tier(&self) -> SentimentTier {
        match self {
            Classification::Rule { .. } => SentimentTier::Rule,
            Classification::Model { .. } => SentimentTier::Model,
            Classification::Fallback { .. } => SentimentTier::RuleFallback,
        }
    }

    pub fn score(&self) -> f64 {
        match self {
            Classification::Rule { score, .. }
            | Classification::Model { score, .. }
            | Classification::Fallback { score, .. } => *score,
        }
    }
}

/// Classify one comment. Only the borderline path performs I/O; a failed
/// or timed-out model call counts as a single failure with no retry.
pub async fn classify(
    text: &str,
    classifier: &dyn SentimentClassifier,
    call_timeout: Duration,
) -> Classification {
    let score = lexicon::score(text);

    if score.abs() >= RULE_CONFIDENCE_THRESHOLD {
        // score cannot be zero here, so the sign is always a label
        let sentiment = sign_of(score).expect("confident score is nonzero");
        debug!(score, %sentiment, "sentiment classified by rule");
        return Classification::Rule { sentiment, score };
    }

    match tokio::time::timeout(call_timeout, classifier.classify(text)).await {
        Ok(Ok(sentiment)) => {
            debug!(score, %sentiment, "sentiment classified by model");
            Classification::Model { sentiment, score }
        }
        Ok(Err(e)) => {
            warn!(error = %e, "sentiment model failed, falling back to rule sign");
            Classification::Fallback {
                sentiment: sign_of(score).unwrap_or(Sentiment::Neutral),
                score,
            }
        }
        Err(_) => {
            warn!("sentiment model timed out, falling back to rule sign");
            Classification::Fallback {
                sentiment: sign_of(score).unwrap_or(Sentiment::Neutral),
                score,
            }
        }
    }
}

fn sign_of(score: f64) -> Option<Sentiment> {
    if score > 0.0 {
        Some(Sentiment::Positive)
    } else if score < 0.0 {
        Some(Sentiment::Negative)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FailingClassifier, FixedClassifier};

    const TIMEOUT: Duration = Duration::from_secs(1);

    #[tokio::test]
    async fn confident_positive_skips_the_model() {
        // A FailingClassifier would poison the result if it were called.
        let c = classify(
            "Amazing location, super close to campus, highly recommend!",
            &FailingClassifier,
            TIMEOUT,
        )
        .await;

        assert_eq!(c.tier(), leaselens_common::SentimentTier::Rule);
        assert_eq!(c.sentiment(), Sentiment::Positive);
    }

    #[tokio::test]
    async fn confident_negative_skips_the_model() {
        let c = classify(
            "Sketchy building, roaches everywhere, avoid",
            &FailingClassifier,
            TIMEOUT,
        )
        .await;

        assert_eq!(c.tier(), leaselens_common::SentimentTier::Rule);
        assert_eq!(c.sentiment(), Sentiment::Negative);
    }

    #[tokio::test]
    async fn borderline_uses_the_model_label() {
        let c = classify(
            "Location is great but thin walls make studying impossible. 4/10",
            &FixedClassifier(Sentiment::Negative),
            TIMEOUT,
        )
        .await;

        assert_eq!(c.tier(), leaselens_common::SentimentTier::Model);
        assert_eq!(c.sentiment(), Sentiment::Negative);
    }

    #[tokio::test]
    async fn model_failure_falls_back_to_rule_sign() {
        let c = classify(
            "Location is great but thin walls make studying impossible. 4/10",
            &FailingClassifier,
            TIMEOUT,
        )
        .await;

        assert_eq!(c.tier(), leaselens_common::SentimentTier::RuleFallback);
        // lexicon: "thin walls" (-3) + "great" (+2) = -1
        assert_eq!(c.sentiment(), Sentiment::Negative);
    }

    #[tokio::test]
    async fn model_failure_with_zero_score_is_neutral() {
        let c = classify("the unit has two bedrooms", &FailingClassifier, TIMEOUT).await;

        assert_eq!(c.tier(), leaselens_common::SentimentTier::RuleFallback);
        assert_eq!(c.sentiment(), Sentiment::Neutral);
        assert_eq!(c.score(), 0.0);
    }
}
