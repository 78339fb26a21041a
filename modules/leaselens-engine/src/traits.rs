// Trait abstractions for the analysis pipeline's external collaborators.
//
// Every network-touching dependency sits behind one of these seams: the
// nuanced sentiment model, the listing-text and photo analyzers, the
// question model, and the community data source. The pipeline only sees
// the traits, which enables deterministic testing with the mocks in
// `testing` — no network, no API keys, `cargo test` in seconds.

use anyhow::Result;
use async_trait::async_trait;

use leaselens_common::{Finding, ImageAnalysis, ListingImage, RawComment, Sentiment, TextAnalysis};

use crate::questions::CandidateQuestion;

/// Nuanced sentiment classifier, consulted only for borderline comments.
#[async_trait]
pub trait SentimentClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Sentiment>;
}

/// Listing-description analyzer: red flags and missing information.
#[async_trait]
pub trait ListingAnalyzer: Send + Sync {
    async fn analyze_listing(
        &self,
        listing_text: &str,
        address: Option<&str>,
    ) -> Result<TextAnalysis>;
}

/// Listing-photo analyzer: photo issues, positives, quality score.
#[async_trait]
pub trait PhotoAnalyzer: Send + Sync {
    async fn analyze_photos(&self, images: &[ListingImage]) -> Result<ImageAnalysis>;
}

/// Landlord-question generator. Proposals are candidates only; they pass
/// through strict validation before reaching the response.
#[async_trait]
pub trait QuestionModel: Send + Sync {
    async fn propose(
        &self,
        findings: &[Finding],
        listing_text: &str,
    ) -> Result<Vec<CandidateQuestion>>;
}

/// Community discussion source. Stateless and read-only; injected so the
/// embedded dataset can be swapped for a live feed without touching the
/// pipeline.
#[async_trait]
pub trait CommunitySource: Send + Sync {
    /// Resolve a university name to a discussion forum. Unmapped
    /// universities resolve to a generic forum, never an error.
    fn resolve_forum(&self, university: &str) -> String;

    /// Fetch up to `limit` raw comments for a forum.
    async fn comments(&self, forum: &str, limit: usize) -> Result<Vec<RawComment>>;
}
