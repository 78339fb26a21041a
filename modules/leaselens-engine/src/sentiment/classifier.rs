//! Nuanced sentiment classification via the lightweight model.

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use ai_client::util::truncate_to_char_boundary;
use ai_client::Claude;
use leaselens_common::Sentiment;

use crate::traits::SentimentClassifier;

const SENTIMENT_SYSTEM_PROMPT: &str = r#"You are analyzing comments written by college students about apartments.

Classify the sentiment as EXACTLY one of:
positive
neutral
negative

Rules:
- Complaints about noise, walls, neighbors, studying conditions, safety, landlords, or maintenance are NEGATIVE.
- Phrases like "would not recommend", numeric ratings below 5/10, or warnings to others are NEGATIVE.
- Mixed or descriptive comments without clear satisfaction or dissatisfaction are NEUTRAL.
- Praise or recommendations are POSITIVE.
- Do NOT default to neutral if the comment clearly harms quality of life.

Return only ONE word."#;

pub struct ClaudeSentimentClassifier {
    claude: Claude,
}

impl ClaudeSentimentClassifier {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            claude: Claude::new(api_key, model),
        }
    }
}

#[async_trait]
impl SentimentClassifier for ClaudeSentimentClassifier {
    async fn classify(&self, text: &str) -> Result<Sentiment> {
        let response = self
            .claude
            .chat_completion(SENTIMENT_SYSTEM_PROMPT, text)
            .await?;

        parse_label(&response).ok_or_else(|| {
            anyhow!(
                "unrecognized sentiment label: {}",
                truncate_to_char_boundary(&response, 50)
            )
        })
    }
}

/// Lenient label extraction: first word wins, then a substring scan for
/// chatty responses. Anything else is a classification failure, which
/// the router turns into a rule fallback.
fn parse_label(response: &str) -> Option<Sentiment> {
    let lower = response.trim().to_lowercase();

    match lower.split_whitespace().next() {
        Some("positive") => return Some(Sentiment::Positive),
        Some("negative") => return Some(Sentiment::Negative),
        Some("neutral") => return Some(Sentiment::Neutral),
        _ => {}
    }

    if lower.contains("positive") {
        Some(Sentiment::Positive)
    } else if lower.contains("negative") {
        Some(Sentiment::Negative)
    } else if lower.contains("neutral") {
        Some(Sentiment::Neutral)
    } else {
        None
    }
}
