//! Listing-description analysis via the text model.

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::info;

use ai_client::util::truncate_to_char_boundary;
use ai_client::Claude;
use leaselens_common::{MissingInfo, RedFlag, Severity, TextAnalysis};

use crate::traits::ListingAnalyzer;

/// Listing descriptions are short; anything beyond this is boilerplate.
const MAX_LISTING_BYTES: usize = 12_000;

/// What the model returns for each concerning statement in the listing.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ExtractedFlag {
    /// What the listing says or implies that is concerning
    description: String,
    /// "low", "medium", or "high"
    severity: Option<String>,
    /// Why this is concerning for a student renter
    rationale: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ExtractedMissingInfo {
    /// The missing detail, e.g. "lease length"
    item: String,
    /// "low", "medium", or "high"
    importance: Option<String>,
    /// Why a renter needs this detail
    why: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct ListingAnalysisResponse {
    #[serde(default)]
    red_flags: Vec<ExtractedFlag>,
    #[serde(default)]
    missing_info: Vec<ExtractedMissingInfo>,
    /// 2-3 sentence summary of the listing quality
    summary: Option<String>,
}

const LISTING_SYSTEM_PROMPT: &str = r#"You are analyzing an apartment listing on behalf of a college student. Identify red flags and missing information.

RED FLAGS TO LOOK FOR:
- Vague or evasive language about property condition
- Too-good-to-be-true pricing
- Pressure tactics ("won't last long", "act now")
- Unclear contact information
- Requests for payment before viewing
- "As-is" conditions without explanation
- No mention of landlord or property management
- Excessive emphasis on "cozy" (possibly small)

MISSING INFORMATION TO CHECK:
- Lease length and terms
- Utilities included or excluded
- Deposit and fees
- Pet policy
- Parking availability
- Laundry facilities
- Move-in date flexibility
- Maintenance contact
- Subletting policy
- Internet or cable included

Be thorough but fair. Only flag genuine concerns, not minor style issues."#;

pub struct ClaudeListingAnalyzer {
    claude: Claude,
}

impl ClaudeListingAnalyzer {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            claude: Claude::new(api_key, model),
        }
    }
}

#[async_trait]
impl ListingAnalyzer for ClaudeListingAnalyzer {
    async fn analyze_listing(
        &self,
        listing_text: &str,
        address: Option<&str>,
    ) -> Result<TextAnalysis> {
        let listing_text = truncate_to_char_boundary(listing_text, MAX_LISTING_BYTES);

        let context = address
            .map(|a| format!("Address: {a}\n\n"))
            .unwrap_or_default();
        let user_prompt = format!("{context}Listing description:\n{listing_text}");

        let response: ListingAnalysisResponse =
            self.claude.extract(LISTING_SYSTEM_PROMPT, &user_prompt).await?;

        info!(
            red_flags = response.red_flags.len(),
            missing_info = response.missing_info.len(),
            "Analyzed listing text"
        );

        Ok(TextAnalysis {
            red_flags: response
                .red_flags
                .into_iter()
                .map(|f| RedFlag {
                    description: f.description,
                    severity: Severity::parse_or_medium(f.severity.as_deref()),
                    rationale: f.rationale.unwrap_or_default(),
                })
                .collect(),
            missing_info: response
                .missing_info
                .into_iter()
                .map(|m| MissingInfo {
                    item: m.item,
                    importance: Severity::parse_or_medium(m.importance.as_deref()),
                    why: m.why.unwrap_or_default(),
                })
                .collect(),
            summary: response.summary.unwrap_or_default(),
        })
    }
}
