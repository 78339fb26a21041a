//! Aggregation of classified, recency-weighted comments into the 1-5
//! student score.

use leaselens_common::{Comment, Sentiment, SentimentBreakdown};

/// Weighted sentiment mass for one request's comments. Neutral comments
/// count toward the total but neither the positive nor negative sum.
#[derive(Debug, Clone, Copy, Default)]
pub struct SentimentTally {
    pub w_pos: f64,
    pub w_neg: f64,
    pub w_total: f64,
}

impl SentimentTally {
    pub fn from_comments(comments: &[Comment]) -> Self {
        let mut tally = SentimentTally::default();
        for comment in comments {
            tally.w_total += comment.recency_weight;
            match comment.sentiment {
                Sentiment::Positive => tally.w_pos += comment.recency_weight,
                Sentiment::Negative => tally.w_neg += comment.recency_weight,
                Sentiment::Neutral => {}
            }
        }
        tally
    }

    pub fn positive_ratio(&self) -> f64 {
        if self.w_total > 0.0 {
            self.w_pos / self.w_total
        } else {
            0.0
        }
    }

    pub fn negative_ratio(&self) -> f64 {
        if self.w_total > 0.0 {
            self.w_neg / self.w_total
        } else {
            0.0
        }
    }
}

/// The 1-5 student score. Dominant sentiment pins the score (2.0 mostly
/// negative, 4.5 mostly positive); anything in between interpolates
/// linearly on the positive-negative ratio gap.
pub fn student_score(tally: &SentimentTally) -> f64 {
    if tally.w_total <= 0.0 {
        return 3.0;
    }

    let r_pos = tally.positive_ratio();
    let r_neg = tally.negative_ratio();

    let score = if r_neg > 0.5 {
        2.0
    } else if r_pos > 0.5 {
        4.5
    } else {
        3.0 + 1.5 * (r_pos - r_neg).clamp(-1.0, 1.0)
    };

    score.clamp(1.0, 5.0)
}

pub fn breakdown(comments: &[Comment]) -> SentimentBreakdown {
    let mut counts = SentimentBreakdown::default();
    for comment in comments {
        match comment.sentiment {
            Sentiment::Positive => counts.positive += 1,
            Sentiment::Negative => counts.negative += 1,
            Sentiment::Neutral => counts.neutral += 1,
        }
    }
    counts
}
