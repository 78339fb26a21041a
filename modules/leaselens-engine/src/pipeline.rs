//! Request orchestration: fan out the three evidence analyses, join,
//! aggregate, generate questions, assemble the report.
//!
//! Everything here is request-scoped. The three upstream analyses run
//! concurrently; the risk aggregator and the question stage act as the
//! join barrier. Every external call is wrapped in one timeout with no
//! retry; failures take their deterministic fallback path and only a
//! dead listing-text analyzer aborts the request.

use std::sync::Arc;
use std::time::Duration;

use chrono::{NaiveDate, Utc};
use futures::stream::{self, StreamExt};
use tokio::time::timeout;
use tracing::{info, warn};

use leaselens_common::{
    AnalysisReport, AnalysisRequest, Comment, Config, ImageAnalysis, LeaseLensError, ListingImage,
    Question, RawComment, StudentReviews,
};

use crate::analyzers::{image, ClaudeListingAnalyzer, ClaudePhotoAnalyzer};
use crate::community::StaticCommunitySource;
use crate::findings::{self, TaggedFindings};
use crate::questions::{self, BatchVerdict, ClaudeQuestionModel};
use crate::risk;
use crate::sentiment::{aggregate, recency, router, ClaudeSentimentClassifier};
use crate::traits::{
    CommunitySource, ListingAnalyzer, PhotoAnalyzer, QuestionModel, SentimentClassifier,
};

/// Bounded parallelism for per-comment classification.
const CLASSIFY_CONCURRENCY: usize = 4;

/// The analysis pipeline with its injected collaborators.
#[derive(Clone)]
pub struct Engine {
    listing: Arc<dyn ListingAnalyzer>,
    photos: Arc<dyn PhotoAnalyzer>,
    sentiment: Arc<dyn SentimentClassifier>,
    questions: Arc<dyn QuestionModel>,
    community: Arc<dyn CommunitySource>,
    llm_timeout: Duration,
    comment_limit: usize,
}

impl Engine {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        listing: Arc<dyn ListingAnalyzer>,
        photos: Arc<dyn PhotoAnalyzer>,
        sentiment: Arc<dyn SentimentClassifier>,
        questions: Arc<dyn QuestionModel>,
        community: Arc<dyn CommunitySource>,
        llm_timeout: Duration,
        comment_limit: usize,
    ) -> Self {
        Self {
            listing,
            photos,
            sentiment,
            questions,
            community,
            llm_timeout,
            comment_limit,
        }
    }

    /// Production wiring: Claude-backed analyzers, embedded community data.
    pub fn from_config(config: &Config) -> Self {
        Self::new(
            Arc::new(ClaudeListingAnalyzer::new(
                &config.anthropic_api_key,
                &config.analysis_model,
            )),
            Arc::new(ClaudePhotoAnalyzer::new(
                &config.anthropic_api_key,
                &config.analysis_model,
            )),
            Arc::new(ClaudeSentimentClassifier::new(
                &config.anthropic_api_key,
                &config.sentiment_model,
            )),
            Arc::new(ClaudeQuestionModel::new(
                &config.anthropic_api_key,
                &config.question_model,
            )),
            Arc::new(StaticCommunitySource::new()),
            Duration::from_secs(config.llm_timeout_secs),
            config.comment_limit,
        )
    }

    /// Analyze one listing. The only hard failures are an empty listing
    /// description and a dead text analyzer; every other problem
    /// degrades into notes on the report.
    pub async fn analyze(
        &self,
        request: &AnalysisRequest,
    ) -> Result<AnalysisReport, LeaseLensError> {
        if request.listing_text.trim().is_empty() {
            return Err(LeaseLensError::Validation(
                "listing text must not be empty".to_string(),
            ));
        }

        info!(
            university = %request.university,
            images = request.images.len(),
            "Starting listing analysis"
        );

        let mut notes: Vec<String> = Vec::new();

        let (text_result, image_result, reviews_result) = tokio::join!(
            timeout(
                self.llm_timeout,
                self.listing
                    .analyze_listing(&request.listing_text, request.address.as_deref()),
            ),
            self.photo_analysis(&request.images),
            self.student_reviews(&request.university),
        );

        let text_analysis = match text_result {
            Ok(Ok(analysis)) => analysis,
            Ok(Err(e)) => return Err(LeaseLensError::TextAnalysis(e.to_string())),
            Err(_) => {
                return Err(LeaseLensError::TextAnalysis(
                    "listing analyzer timed out".to_string(),
                ))
            }
        };

        let (image_analysis, image_note) = image_result;
        if let Some(note) = image_note {
            notes.push(note);
        }

        let (student_reviews, review_note) = reviews_result;
        if let Some(note) = review_note {
            notes.push(note);
        }

        // Findings get their ids before any model is allowed to
        // reference them.
        let tagged = findings::tag(&text_analysis, &image_analysis);

        let overall_assessment = risk::assess(&text_analysis, &image_analysis, &student_reviews);

        let questions = self
            .generate_questions(&tagged, &request.listing_text, &mut notes)
            .await;

        info!(
            risk = %overall_assessment.risk_level,
            findings = tagged.len(),
            questions = questions.len(),
            "Listing analysis complete"
        );

        Ok(AnalysisReport {
            text_analysis,
            image_analysis,
            student_reviews,
            overall_assessment,
            questions,
            notes,
        })
    }

    async fn photo_analysis(&self, images: &[ListingImage]) -> (ImageAnalysis, Option<String>) {
        if images.is_empty() {
            return (image::no_photos_analysis(), None);
        }

        match timeout(self.llm_timeout, self.photos.analyze_photos(images)).await {
            Ok(Ok(analysis)) => (analysis, None),
            Ok(Err(e)) => {
                warn!(error = %e, "Photo analysis failed, continuing without it");
                (
                    image::unavailable_analysis(),
                    Some("Photo analysis was unavailable; image findings are incomplete.".to_string()),
                )
            }
            Err(_) => {
                warn!("Photo analysis timed out, continuing without it");
                (
                    image::unavailable_analysis(),
                    Some("Photo analysis was unavailable; image findings are incomplete.".to_string()),
                )
            }
        }
    }

    async fn student_reviews(&self, university: &str) -> (StudentReviews, Option<String>) {
        let forum = self.community.resolve_forum(university);

        let raw = match timeout(
            self.llm_timeout,
            self.community.comments(&forum, self.comment_limit),
        )
        .await
        {
            Ok(Ok(comments)) => comments,
            Ok(Err(e)) => {
                warn!(error = %e, forum = %forum, "Community source failed");
                return (
                    empty_reviews(forum),
                    Some("Community discussion was unavailable; student score defaults to neutral.".to_string()),
                );
            }
            Err(_) => {
                warn!(forum = %forum, "Community source timed out");
                return (
                    empty_reviews(forum),
                    Some("Community discussion was unavailable; student score defaults to neutral.".to_string()),
                );
            }
        };

        let today = Utc::now().date_naive();
        let comments: Vec<Comment> = stream::iter(raw)
            .map(|raw_comment| self.classify_comment(raw_comment, today))
            .buffered(CLASSIFY_CONCURRENCY)
            .collect()
            .await;

        let tally = aggregate::SentimentTally::from_comments(&comments);
        let reviews = StudentReviews {
            forum,
            total_mentions: comments.len(),
            overall_score: aggregate::student_score(&tally),
            sentiment_breakdown: aggregate::breakdown(&comments),
            comments,
        };
        (reviews, None)
    }

    async fn classify_comment(&self, raw: RawComment, today: NaiveDate) -> Comment {
        let classification =
            router::classify(&raw.text, self.sentiment.as_ref(), self.llm_timeout).await;

        let age_months =
            recency::age_in_months(&raw.posted, today).unwrap_or(recency::DEFAULT_AGE_MONTHS);

        Comment {
            id: raw.id,
            text: raw.text,
            category: raw.category,
            user_type: raw.user_type,
            score: raw.score,
            age_months,
            sentiment: classification.sentiment(),
            tier: classification.tier(),
            recency_weight: recency::weight_for_age(age_months),
        }
    }

    async fn generate_questions(
        &self,
        tagged: &TaggedFindings,
        listing_text: &str,
        notes: &mut Vec<String>,
    ) -> Vec<Question> {
        if tagged.is_empty() {
            info!("No findings, no questions needed");
            return Vec::new();
        }

        match timeout(
            self.llm_timeout,
            self.questions.propose(tagged.findings(), listing_text),
        )
        .await
        {
            Ok(Ok(candidates)) => match questions::validate_batch(candidates, tagged) {
                BatchVerdict::Accepted(list) => list,
                BatchVerdict::Discarded { reason } => {
                    warn!(reason, "Discarded generated question batch");
                    notes.push(
                        "Generated questions failed validation; listing the findings directly instead.".to_string(),
                    );
                    questions::fallback_questions(tagged)
                }
            },
            Ok(Err(e)) => {
                warn!(error = %e, "Question generation failed");
                notes.push(
                    "Question generation was unavailable; listing the findings directly instead.".to_string(),
                );
                questions::fallback_questions(tagged)
            }
            Err(_) => {
                warn!("Question generation timed out");
                notes.push(
                    "Question generation was unavailable; listing the findings directly instead.".to_string(),
                );
                questions::fallback_questions(tagged)
            }
        }
    }
}

fn empty_reviews(forum: String) -> StudentReviews {
    StudentReviews {
        forum,
        comments: Vec::new(),
        total_mentions: 0,
        overall_score: 3.0,
        sentiment_breakdown: Default::default(),
    }
}
