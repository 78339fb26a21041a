//! Mock collaborators for deterministic pipeline tests.
//!
//! Every trait in `traits` has a fixed-output and a failing variant so
//! tests can exercise the happy path, every fallback path, and the one
//! hard failure (text analysis) without a network.

use std::sync::atomic::{AtomicUsize, Ordering};

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use leaselens_common::{
    CommentCategory, ImageAnalysis, ListingImage, RawComment, Sentiment, TextAnalysis, UserType,
};

use crate::questions::CandidateQuestion;
use crate::traits::{
    CommunitySource, ListingAnalyzer, PhotoAnalyzer, QuestionModel, SentimentClassifier,
};

// --- Sentiment classifiers ---

pub struct FixedClassifier(pub Sentiment);

#[async_trait]
impl SentimentClassifier for FixedClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        Ok(self.0)
    }
}

pub struct FailingClassifier;

#[async_trait]
impl SentimentClassifier for FailingClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        Err(anyhow!("sentiment model unavailable"))
    }
}

/// Counts invocations so tests can assert which comments actually
/// reached the model.
pub struct CountingClassifier {
    label: Sentiment,
    calls: AtomicUsize,
}

impl CountingClassifier {
    pub fn new(label: Sentiment) -> Self {
        Self {
            label,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SentimentClassifier for CountingClassifier {
    async fn classify(&self, _text: &str) -> Result<Sentiment> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.label)
    }
}

// --- Listing analyzers ---

pub struct StaticListingAnalyzer(pub TextAnalysis);

#[async_trait]
impl ListingAnalyzer for StaticListingAnalyzer {
    async fn analyze_listing(
        &self,
        _listing_text: &str,
        _address: Option<&str>,
    ) -> Result<TextAnalysis> {
        Ok(self.0.clone())
    }
}

pub struct FailingListingAnalyzer;

#[async_trait]
impl ListingAnalyzer for FailingListingAnalyzer {
    async fn analyze_listing(
        &self,
        _listing_text: &str,
        _address: Option<&str>,
    ) -> Result<TextAnalysis> {
        Err(anyhow!("text analyzer unavailable"))
    }
}

// --- Photo analyzers ---

pub struct StaticPhotoAnalyzer(pub ImageAnalysis);

#[async_trait]
impl PhotoAnalyzer for StaticPhotoAnalyzer {
    async fn analyze_photos(&self, _images: &[ListingImage]) -> Result<ImageAnalysis> {
        Ok(self.0.clone())
    }
}

pub struct FailingPhotoAnalyzer;

#[async_trait]
impl PhotoAnalyzer for FailingPhotoAnalyzer {
    async fn analyze_photos(&self, _images: &[ListingImage]) -> Result<ImageAnalysis> {
        Err(anyhow!("vision model unavailable"))
    }
}

// --- Question models ---

pub struct ScriptedQuestionModel(pub Vec<CandidateQuestion>);

#[async_trait]
impl QuestionModel for ScriptedQuestionModel {
    async fn propose(
        &self,
        _findings: &[leaselens_common::Finding],
        _listing_text: &str,
    ) -> Result<Vec<CandidateQuestion>> {
        Ok(self.0.clone())
    }
}

pub struct FailingQuestionModel;

#[async_trait]
impl QuestionModel for FailingQuestionModel {
    async fn propose(
        &self,
        _findings: &[leaselens_common::Finding],
        _listing_text: &str,
    ) -> Result<Vec<CandidateQuestion>> {
        Err(anyhow!("question model unavailable"))
    }
}

// --- Community sources ---

pub struct FixedCommunitySource {
    pub forum: String,
    pub comments: Vec<RawComment>,
}

#[async_trait]
impl CommunitySource for FixedCommunitySource {
    fn resolve_forum(&self, _university: &str) -> String {
        self.forum.clone()
    }

    async fn comments(&self, _forum: &str, limit: usize) -> Result<Vec<RawComment>> {
        Ok(self.comments.iter().take(limit).cloned().collect())
    }
}

pub struct FailingCommunitySource;

#[async_trait]
impl CommunitySource for FailingCommunitySource {
    fn resolve_forum(&self, _university: &str) -> String {
        "college".to_string()
    }

    async fn comments(&self, _forum: &str, _limit: usize) -> Result<Vec<RawComment>> {
        Err(anyhow!("community source unavailable"))
    }
}

/// Comment builder for tests; category and score are rarely relevant.
pub fn raw_comment(id: &str, text: &str, posted: &str) -> RawComment {
    RawComment {
        id: id.to_string(),
        text: text.to_string(),
        category: CommentCategory::General,
        user_type: UserType::Unspecified,
        posted: posted.to_string(),
        score: 1,
    }
}
