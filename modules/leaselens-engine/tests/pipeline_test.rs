//! End-to-end pipeline tests over mock collaborators.
//!
//! No network, no API keys: every external seam is a mock from
//! `leaselens_engine::testing`, so these validate orchestration,
//! fallback routing, and report assembly deterministically.

use std::sync::Arc;
use std::time::Duration;

use leaselens_common::{
    AnalysisRequest, ImageAnalysis, LeaseLensError, ListingImage, MissingInfo, PhotoIssue,
    PositiveObservation, RedFlag, RiskLevel, Sentiment, SentimentTier, Severity, TextAnalysis,
};
use leaselens_engine::findings;
use leaselens_engine::questions::CandidateQuestion;
use leaselens_engine::testing::{
    raw_comment, CountingClassifier, FailingCommunitySource, FailingListingAnalyzer,
    FailingPhotoAnalyzer, FailingQuestionModel, FixedClassifier, FixedCommunitySource,
    ScriptedQuestionModel, StaticListingAnalyzer, StaticPhotoAnalyzer,
};
use leaselens_engine::traits::{
    CommunitySource, ListingAnalyzer, PhotoAnalyzer, QuestionModel, SentimentClassifier,
};
use leaselens_engine::Engine;

const TIMEOUT: Duration = Duration::from_secs(2);
const COMMENT_LIMIT: usize = 10;

fn sample_text_analysis() -> TextAnalysis {
    TextAnalysis {
        red_flags: vec![
            RedFlag {
                description: "No rent amount, only 'affordable'".into(),
                severity: Severity::High,
                rationale: "Vague pricing invites bait-and-switch".into(),
            },
            RedFlag {
                description: "'Won't last long' pressure language".into(),
                severity: Severity::Medium,
                rationale: "Urgency discourages due diligence".into(),
            },
        ],
        missing_info: vec![MissingInfo {
            item: "lease length".into(),
            importance: Severity::Medium,
            why: "Term changes total cost".into(),
        }],
        summary: "Sparse listing with vague pricing.".into(),
    }
}

fn sample_image_analysis() -> ImageAnalysis {
    ImageAnalysis {
        photo_issues: vec![PhotoIssue {
            issue: "No bathroom photos".into(),
            severity: Severity::Medium,
            photo_number: None,
            explanation: "A key room is missing from the set".into(),
        }],
        positive_observations: vec![PositiveObservation {
            observation: "Bright natural light".into(),
            photo_number: Some(1),
        }],
        quality_score: 6.0,
        summary: "Decent photos, one gap.".into(),
    }
}

fn grounded_candidates() -> Vec<CandidateQuestion> {
    vec![
        CandidateQuestion {
            question: "What is the exact monthly rent?".into(),
            finding_ids: vec!["text_flag_0".into()],
            reasoning: Some("Pricing is vague".into()),
        },
        CandidateQuestion {
            question: "Why does the listing push urgency?".into(),
            finding_ids: vec!["text_flag_1".into()],
            reasoning: None,
        },
        CandidateQuestion {
            question: "How long is the lease?".into(),
            finding_ids: vec!["missing_info_0".into()],
            reasoning: None,
        },
        CandidateQuestion {
            question: "Can you share bathroom photos?".into(),
            finding_ids: vec!["photo_issue_0".into(), "positive_observation_0".into()],
            reasoning: None,
        },
    ]
}

fn jpeg() -> ListingImage {
    ListingImage {
        media_type: "image/jpeg".into(),
        data: vec![0xFF, 0xD8, 0xFF, 0xE0],
    }
}

fn request(images: Vec<ListingImage>) -> AnalysisRequest {
    AnalysisRequest {
        listing_text: "Cozy affordable 2BR near campus, won't last long!".into(),
        address: Some("123 W Green St".into()),
        university: "UIUC".into(),
        images,
    }
}

#[allow(clippy::too_many_arguments)]
fn engine(
    listing: Arc<dyn ListingAnalyzer>,
    photos: Arc<dyn PhotoAnalyzer>,
    sentiment: Arc<dyn SentimentClassifier>,
    questions: Arc<dyn QuestionModel>,
    community: Arc<dyn CommunitySource>,
) -> Engine {
    Engine::new(
        listing, photos, sentiment, questions, community, TIMEOUT, COMMENT_LIMIT,
    )
}

fn default_engine() -> Engine {
    engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        Arc::new(StaticPhotoAnalyzer(sample_image_analysis())),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(ScriptedQuestionModel(grounded_candidates())),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![
                raw_comment(
                    "c1",
                    "Amazing location, super close to campus, highly recommend!",
                    "2099-01",
                ),
                raw_comment("c2", "It's a building. It has rooms.", "2099-01"),
                raw_comment("c3", "Thin walls, loud parties, sketchy area.", "2000-01"),
            ],
        }),
    )
}

#[tokio::test]
async fn happy_path_assembles_a_complete_report() {
    let report = default_engine().analyze(&request(vec![jpeg()])).await.unwrap();

    assert_eq!(report.text_analysis.red_flags.len(), 2);
    assert_eq!(report.image_analysis.photo_issues.len(), 1);
    assert_eq!(report.student_reviews.total_mentions, 3);
    assert_eq!(report.questions.len(), 4);
    assert!(report.notes.is_empty());

    let overall = &report.overall_assessment;
    assert_eq!(overall.red_flag_count, 2);
    assert_eq!(overall.photo_issue_count, 1);
    assert!((1.0..=3.0).contains(&overall.text_risk));
    assert!((1.0..=3.0).contains(&overall.image_risk));
    assert!((1.0..=3.0).contains(&overall.student_risk));
    assert!((1.0..=5.0).contains(&overall.student_score));
}

#[tokio::test]
async fn every_question_references_only_real_findings() {
    let report = default_engine().analyze(&request(vec![jpeg()])).await.unwrap();

    let tagged = findings::tag(&report.text_analysis, &report.image_analysis);
    let known = tagged.ids();

    for question in &report.questions {
        assert!(
            !question.finding_ids.is_empty(),
            "question has no finding references"
        );
        for id in &question.finding_ids {
            assert!(known.contains(id.as_str()), "unknown finding id {id}");
        }
    }
}

#[tokio::test]
async fn comments_get_exactly_one_tier_each() {
    let report = default_engine().analyze(&request(vec![])).await.unwrap();

    let by_id = |id: &str| {
        report
            .student_reviews
            .comments
            .iter()
            .find(|c| c.id == id)
            .unwrap()
    };

    // Confident lexicon hit classifies by rule.
    assert_eq!(by_id("c1").tier, SentimentTier::Rule);
    assert_eq!(by_id("c1").sentiment, Sentiment::Positive);
    // No lexicon signal: borderline, model label used.
    assert_eq!(by_id("c2").tier, SentimentTier::Model);
    assert_eq!(by_id("c2").sentiment, Sentiment::Neutral);
    // Strong negative idioms classify by rule.
    assert_eq!(by_id("c3").tier, SentimentTier::Rule);
    assert_eq!(by_id("c3").sentiment, Sentiment::Negative);

    // Recency weights are positive and bucketed.
    for comment in &report.student_reviews.comments {
        assert!(comment.recency_weight > 0.0);
    }
    assert_eq!(by_id("c1").recency_weight, 1.5);
    assert_eq!(by_id("c3").recency_weight, 0.7);
}

#[tokio::test]
async fn model_is_only_consulted_for_borderline_comments() {
    let counting = Arc::new(CountingClassifier::new(Sentiment::Neutral));
    let engine = engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        Arc::new(StaticPhotoAnalyzer(sample_image_analysis())),
        counting.clone(),
        Arc::new(ScriptedQuestionModel(grounded_candidates())),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![
                raw_comment(
                    "c1",
                    "Amazing location, super close to campus, highly recommend!",
                    "2099-01",
                ),
                raw_comment("c2", "It's a building. It has rooms.", "2099-01"),
            ],
        }),
    );

    engine.analyze(&request(vec![])).await.unwrap();

    // Only the borderline comment reached the model.
    assert_eq!(counting.calls(), 1);
}

#[tokio::test]
async fn empty_listing_text_is_a_validation_error() {
    let mut req = request(vec![]);
    req.listing_text = "   \n ".into();

    let err = default_engine().analyze(&req).await.unwrap_err();
    assert!(matches!(err, LeaseLensError::Validation(_)));
}

#[tokio::test]
async fn dead_text_analyzer_aborts_the_request() {
    let engine = engine(
        Arc::new(FailingListingAnalyzer),
        Arc::new(StaticPhotoAnalyzer(sample_image_analysis())),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(ScriptedQuestionModel(grounded_candidates())),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![],
        }),
    );

    let err = engine.analyze(&request(vec![])).await.unwrap_err();
    assert!(matches!(err, LeaseLensError::TextAnalysis(_)));
}

#[tokio::test]
async fn photo_analyzer_failure_degrades_instead_of_aborting() {
    let engine = engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        Arc::new(FailingPhotoAnalyzer),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(FailingQuestionModel),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![],
        }),
    );

    let report = engine.analyze(&request(vec![jpeg()])).await.unwrap();

    assert!(report.image_analysis.photo_issues.is_empty());
    assert_eq!(report.image_analysis.quality_score, 5.0);
    assert!(report
        .notes
        .iter()
        .any(|n| n.contains("Photo analysis was unavailable")));
}

#[tokio::test]
async fn no_photos_never_touches_the_photo_analyzer() {
    let engine = engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        // Would add a degradation note if it were called.
        Arc::new(FailingPhotoAnalyzer),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(FailingQuestionModel),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![],
        }),
    );

    let report = engine.analyze(&request(vec![])).await.unwrap();

    assert_eq!(report.image_analysis.quality_score, 0.0);
    assert_eq!(report.image_analysis.summary, "No photos provided");
    assert!(!report
        .notes
        .iter()
        .any(|n| n.contains("Photo analysis was unavailable")));
}

#[tokio::test]
async fn community_failure_defaults_the_student_score() {
    let engine = engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        Arc::new(StaticPhotoAnalyzer(sample_image_analysis())),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(ScriptedQuestionModel(grounded_candidates())),
        Arc::new(FailingCommunitySource),
    );

    let report = engine.analyze(&request(vec![jpeg()])).await.unwrap();

    assert!(report.student_reviews.comments.is_empty());
    assert_eq!(report.student_reviews.overall_score, 3.0);
    assert!(report
        .notes
        .iter()
        .any(|n| n.contains("Community discussion was unavailable")));
}

#[tokio::test]
async fn question_model_failure_falls_back_to_finding_list() {
    let engine = engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        Arc::new(StaticPhotoAnalyzer(sample_image_analysis())),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(FailingQuestionModel),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![],
        }),
    );

    let report = engine.analyze(&request(vec![jpeg()])).await.unwrap();

    // One question per finding: 2 flags + 1 missing + 1 issue + 1 positive.
    assert_eq!(report.questions.len(), 5);
    // Severity-ordered: the high-severity flag leads.
    assert_eq!(report.questions[0].priority, Severity::High);
    assert_eq!(report.questions[0].finding_ids, vec!["text_flag_0"]);
    // Each fallback question references exactly its own finding.
    assert!(report.questions.iter().all(|q| q.finding_ids.len() == 1));
    assert!(report
        .notes
        .iter()
        .any(|n| n.contains("Question generation was unavailable")));
}

#[tokio::test]
async fn hallucinating_question_model_falls_back() {
    let bogus = vec![
        CandidateQuestion {
            question: "Is there a pool?".into(),
            finding_ids: vec!["amenity_pool".into()],
            reasoning: None,
        },
        CandidateQuestion {
            question: "Is there a gym?".into(),
            finding_ids: vec!["amenity_gym".into()],
            reasoning: None,
        },
        CandidateQuestion {
            question: "What is the rent?".into(),
            finding_ids: vec!["text_flag_0".into()],
            reasoning: None,
        },
    ];
    let engine = engine(
        Arc::new(StaticListingAnalyzer(sample_text_analysis())),
        Arc::new(StaticPhotoAnalyzer(sample_image_analysis())),
        Arc::new(FixedClassifier(Sentiment::Neutral)),
        Arc::new(ScriptedQuestionModel(bogus)),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![],
        }),
    );

    let report = engine.analyze(&request(vec![jpeg()])).await.unwrap();

    // The batch was discarded wholesale; the fallback list covers every
    // finding and never cites the invented ids.
    assert_eq!(report.questions.len(), 5);
    for question in &report.questions {
        assert!(!question.finding_ids.iter().any(|id| id.starts_with("amenity")));
    }
    assert!(report
        .notes
        .iter()
        .any(|n| n.contains("failed validation")));
}

#[tokio::test]
async fn clean_listing_produces_no_questions() {
    let engine = engine(
        Arc::new(StaticListingAnalyzer(TextAnalysis {
            red_flags: vec![],
            missing_info: vec![],
            summary: "Thorough, specific listing.".into(),
        })),
        Arc::new(StaticPhotoAnalyzer(ImageAnalysis {
            photo_issues: vec![],
            positive_observations: vec![],
            quality_score: 9.0,
            summary: "Excellent photos.".into(),
        })),
        Arc::new(FixedClassifier(Sentiment::Positive)),
        // Would fail the request if the pipeline consulted it.
        Arc::new(FailingQuestionModel),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![raw_comment(
                "c1",
                "Amazing location, super close to campus, highly recommend!",
                "2099-01",
            )],
        }),
    );

    let report = engine.analyze(&request(vec![jpeg()])).await.unwrap();

    assert!(report.questions.is_empty());
    assert!(report.notes.is_empty());
    assert_eq!(report.overall_assessment.risk_level, RiskLevel::Low);
}

#[tokio::test]
async fn mixed_risk_dimensions_average_to_medium() {
    // text risk 3 (many high flags), image risk 2 (quality 5), student
    // risk 1 (all positive) -> average 2.0 -> medium.
    let heavy_flags = TextAnalysis {
        red_flags: (0..4)
            .map(|i| RedFlag {
                description: format!("serious flag {i}"),
                severity: Severity::High,
                rationale: String::new(),
            })
            .collect(),
        missing_info: vec![],
        summary: String::new(),
    };
    let engine = engine(
        Arc::new(StaticListingAnalyzer(heavy_flags)),
        Arc::new(StaticPhotoAnalyzer(ImageAnalysis {
            photo_issues: vec![],
            positive_observations: vec![],
            quality_score: 5.0,
            summary: String::new(),
        })),
        Arc::new(FixedClassifier(Sentiment::Positive)),
        Arc::new(FailingQuestionModel),
        Arc::new(FixedCommunitySource {
            forum: "UIUC".into(),
            comments: vec![raw_comment(
                "c1",
                "Amazing location, super close to campus, highly recommend!",
                "2099-01",
            )],
        }),
    );

    let report = engine.analyze(&request(vec![jpeg()])).await.unwrap();

    let overall = &report.overall_assessment;
    assert_eq!(overall.text_risk, 3.0);
    assert_eq!(overall.image_risk, 2.0);
    assert_eq!(overall.student_risk, 1.0);
    assert_eq!(overall.risk_level, RiskLevel::Medium);
}
