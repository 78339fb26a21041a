use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// --- Enums ---

/// Severity of a finding. Also used as question priority.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
    JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

impl Severity {
    /// Lenient parse for model-supplied labels. Anything unrecognized,
    /// including a missing label, is medium.
    pub fn parse_or_medium(label: Option<&str>) -> Severity {
        match label.map(|s| s.trim().to_lowercase()).as_deref() {
            Some("low") => Severity::Low,
            Some("high") => Severity::High,
            _ => Severity::Medium,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
}

impl std::fmt::Display for Sentiment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Sentiment::Positive => write!(f, "positive"),
            Sentiment::Negative => write!(f, "negative"),
            Sentiment::Neutral => write!(f, "neutral"),
        }
    }
}

/// Which strategy produced a comment's sentiment label.
///
/// Recorded for observability; downstream scoring only reads the label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum SentimentTier {
    /// Lexicon score was confident enough to classify directly.
    Rule,
    /// Borderline score, the nuanced model supplied the label.
    Model,
    /// Model call failed, label fell back to the lexicon sign.
    RuleFallback,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "low"),
            RiskLevel::Medium => write!(f, "medium"),
            RiskLevel::High => write!(f, "high"),
        }
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum UserType {
    Undergraduate,
    Graduate,
    #[default]
    Unspecified,
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum CommentCategory {
    Location,
    Safety,
    Noise,
    Landlord,
    Transit,
    Condition,
    Pricing,
    Social,
    #[default]
    General,
}

/// The four kinds of evidence an analyzer can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum FindingKind {
    TextFlag,
    MissingInfo,
    PhotoIssue,
    PositiveObservation,
}

impl FindingKind {
    /// Stable identifier prefix for the `{kind}_{index}` scheme.
    pub fn id_prefix(&self) -> &'static str {
        match self {
            FindingKind::TextFlag => "text_flag",
            FindingKind::MissingInfo => "missing_info",
            FindingKind::PhotoIssue => "photo_issue",
            FindingKind::PositiveObservation => "positive_observation",
        }
    }
}

impl std::fmt::Display for FindingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.id_prefix())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum QuestionCategory {
    ListingDescription,
    MissingDetails,
    Photos,
    General,
}

impl QuestionCategory {
    /// Display category for a question, taken from the kind of its first
    /// referenced finding.
    pub fn from_kind(kind: FindingKind) -> Self {
        match kind {
            FindingKind::TextFlag => QuestionCategory::ListingDescription,
            FindingKind::MissingInfo => QuestionCategory::MissingDetails,
            FindingKind::PhotoIssue | FindingKind::PositiveObservation => QuestionCategory::Photos,
        }
    }
}

// --- Community comments ---

/// A community comment as delivered by the data source, before any analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawComment {
    pub id: String,
    pub text: String,
    pub category: CommentCategory,
    pub user_type: UserType,
    /// Month the comment was posted, `YYYY-MM`.
    pub posted: String,
    /// Community score; may be negative.
    pub score: i64,
}

/// A classified, recency-weighted community comment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: String,
    pub text: String,
    pub category: CommentCategory,
    pub user_type: UserType,
    pub score: i64,
    pub age_months: u32,
    pub sentiment: Sentiment,
    pub tier: SentimentTier,
    pub recency_weight: f64,
}

// --- Findings ---

/// One piece of tagged evidence. The `id` follows the `{kind}_{index}`
/// scheme and is only meaningful within the request that produced it.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Finding {
    pub id: String,
    pub kind: FindingKind,
    pub severity: Severity,
    pub description: String,
    pub rationale: String,
}

// --- Analyzer output ---

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct RedFlag {
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    pub rationale: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct MissingInfo {
    pub item: String,
    #[serde(default)]
    pub importance: Severity,
    pub why: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PhotoIssue {
    pub issue: String,
    #[serde(default)]
    pub severity: Severity,
    pub photo_number: Option<u32>,
    pub explanation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PositiveObservation {
    pub observation: String,
    pub photo_number: Option<u32>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TextAnalysis {
    pub red_flags: Vec<RedFlag>,
    pub missing_info: Vec<MissingInfo>,
    pub summary: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageAnalysis {
    pub photo_issues: Vec<PhotoIssue>,
    pub positive_observations: Vec<PositiveObservation>,
    /// 0 = major problems or no photos, 10 = excellent honest photos.
    pub quality_score: f64,
    pub summary: String,
}

// --- Student reviews ---

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct SentimentBreakdown {
    pub positive: usize,
    pub negative: usize,
    pub neutral: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentReviews {
    /// Resolved discussion forum the comments came from.
    pub forum: String,
    pub comments: Vec<Comment>,
    pub total_mentions: usize,
    /// Weighted 1-5 score; 3.0 when no comments were available.
    pub overall_score: f64,
    pub sentiment_breakdown: SentimentBreakdown,
}

// --- Questions ---

/// A validated landlord question. Every id in `finding_ids` is guaranteed
/// to exist in the same report's finding set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Question {
    pub question: String,
    pub priority: Severity,
    pub category: QuestionCategory,
    pub finding_ids: Vec<String>,
    pub reasoning: String,
}

// --- Assessment and report ---

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OverallAssessment {
    pub risk_level: RiskLevel,
    pub text_risk: f64,
    pub image_risk: f64,
    pub student_risk: f64,
    pub red_flag_count: usize,
    pub photo_issue_count: usize,
    pub student_score: f64,
    pub summary: String,
    pub recommendation: String,
}

/// The complete analysis handed to the presentation layer. Immutable;
/// nothing in it outlives the response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub text_analysis: TextAnalysis,
    pub image_analysis: ImageAnalysis,
    pub student_reviews: StudentReviews,
    pub overall_assessment: OverallAssessment,
    pub questions: Vec<Question>,
    /// Human-readable notes about degraded analysis paths.
    pub notes: Vec<String>,
}

// --- Request ---

/// An uploaded listing photo.
#[derive(Debug, Clone)]
pub struct ListingImage {
    /// MIME type, e.g. `image/jpeg`.
    pub media_type: String,
    pub data: Vec<u8>,
}

/// Accepted photo MIME types.
pub const ALLOWED_IMAGE_TYPES: [&str; 5] = [
    "image/png",
    "image/jpeg",
    "image/jpg",
    "image/gif",
    "image/webp",
];

/// Photos beyond this count are ignored.
pub const MAX_IMAGES: usize = 5;

#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub listing_text: String,
    pub address: Option<String>,
    pub university: String,
    pub images: Vec<ListingImage>,
}
