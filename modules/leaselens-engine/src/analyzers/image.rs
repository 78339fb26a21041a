//! Listing-photo analysis via the vision model.

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use ai_client::{Claude, ImageInput};
use leaselens_common::{
    ImageAnalysis, ListingImage, PhotoIssue, PositiveObservation, Severity,
};

use crate::traits::PhotoAnalyzer;

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ExtractedPhotoIssue {
    /// Description of the problem
    issue: String,
    /// "low", "medium", or "high"
    severity: Option<String>,
    /// 1-based index of the photo showing the issue, if identifiable
    photo_number: Option<u32>,
    /// Why this is concerning
    explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ExtractedObservation {
    /// What looks good
    observation: String,
    /// 1-based index of the photo, if identifiable
    photo_number: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct PhotoAnalysisResponse {
    #[serde(default)]
    photo_issues: Vec<ExtractedPhotoIssue>,
    #[serde(default)]
    positive_observations: Vec<ExtractedObservation>,
    /// 10 = excellent honest photos, 0 = major red flags
    quality_score: Option<f64>,
    /// Overall assessment of the photo set
    summary: Option<String>,
}

const PHOTO_SYSTEM_PROMPT: &str = r#"You are analyzing apartment listing photos on behalf of a college student. Identify visual red flags, quality issues, and assess photo authenticity.

RED FLAGS TO IDENTIFY:
- Wide-angle lens distortion making spaces look bigger
- Strategic camera angles hiding issues
- Heavy filters or photo editing
- Stock photos or photos from other listings
- Poor lighting hiding damage or dirt
- Missing key areas (bathroom, kitchen, bedroom)
- Inconsistent photo quality (mix of professional and amateur)
- Signs of damage (cracks, stains, peeling paint)
- Misleading photos (showing amenities not in the unit)
- Too few photos (fewer than 3 is suspicious)
- Blurry or low-quality images

POSITIVE SIGNS:
- Well-lit, clear photos
- Multiple angles of each room
- Honest representation of space
- Shows important details (appliances, storage, fixtures)
- Natural lighting
- Consistent quality across all photos

Be specific about which photo number has which issue. Quality score: 10 = excellent honest photos; 0 = major red flags or missing photos."#;

pub struct ClaudePhotoAnalyzer {
    claude: Claude,
}

impl ClaudePhotoAnalyzer {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            claude: Claude::new(api_key, model),
        }
    }
}

/// Result for a request that attached no photos. Quality zero: listings
/// without photos are treated as suspicious downstream.
pub fn no_photos_analysis() -> ImageAnalysis {
    ImageAnalysis {
        photo_issues: vec![],
        positive_observations: vec![],
        quality_score: 0.0,
        summary: "No photos provided".to_string(),
    }
}

/// Degraded result when photos were attached but the analyzer failed.
/// Mid-scale quality: unknown is not the same as suspicious.
pub fn unavailable_analysis() -> ImageAnalysis {
    ImageAnalysis {
        photo_issues: vec![],
        positive_observations: vec![],
        quality_score: 5.0,
        summary: "Photo analysis unavailable".to_string(),
    }
}

#[async_trait]
impl PhotoAnalyzer for ClaudePhotoAnalyzer {
    async fn analyze_photos(&self, images: &[ListingImage]) -> Result<ImageAnalysis> {
        if images.is_empty() {
            return Ok(no_photos_analysis());
        }

        let inputs: Vec<ImageInput> = images
            .iter()
            .map(|img| ImageInput {
                media_type: img.media_type.clone(),
                data: img.data.clone(),
            })
            .collect();

        let user_prompt = format!(
            "Analyze these {} apartment listing photo(s) for red flags and quality issues.",
            inputs.len()
        );

        let response: PhotoAnalysisResponse = self
            .claude
            .extract_with_images(PHOTO_SYSTEM_PROMPT, &user_prompt, &inputs)
            .await?;

        info!(
            photos = inputs.len(),
            issues = response.photo_issues.len(),
            "Analyzed listing photos"
        );

        Ok(ImageAnalysis {
            photo_issues: response
                .photo_issues
                .into_iter()
                .map(|i| PhotoIssue {
                    issue: i.issue,
                    severity: Severity::parse_or_medium(i.severity.as_deref()),
                    photo_number: i.photo_number,
                    explanation: i.explanation.unwrap_or_default(),
                })
                .collect(),
            positive_observations: response
                .positive_observations
                .into_iter()
                .map(|o| PositiveObservation {
                    observation: o.observation,
                    photo_number: o.photo_number,
                })
                .collect(),
            quality_score: response.quality_score.unwrap_or(5.0).clamp(0.0, 10.0),
            summary: response.summary.unwrap_or_default(),
        })
    }
}
