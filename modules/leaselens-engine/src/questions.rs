//! Landlord-question generation with anti-hallucination validation.
//!
//! The model proposes questions referencing finding ids; validation
//! checks every reference against the tagged finding set and throws the
//! whole batch away when the model misbehaves. The deterministic
//! fallback lists the findings themselves, so the user-visible question
//! list can never cite evidence that was not actually found.

use std::collections::HashSet;

use anyhow::Result;
use async_trait::async_trait;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use ai_client::util::truncate_to_char_boundary;
use ai_client::Claude;
use leaselens_common::{Finding, Question, QuestionCategory, Severity};

use crate::findings::TaggedFindings;
use crate::traits::QuestionModel;

/// Cap on the user-visible question list, generated or fallback.
pub const MAX_QUESTIONS: usize = 10;

/// A batch is discarded when more than half its candidates are rejected.
const MAX_REJECTION_RATE: f64 = 0.5;

/// A batch is discarded when its valid candidates reference fewer than
/// half the findings.
const MIN_COVERAGE: f64 = 0.5;

/// One proposed question as returned by the model, unvalidated.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct CandidateQuestion {
    /// The question text, clean and professional, with no finding ids in it
    pub question: String,
    /// Ids of the findings this question addresses
    #[serde(default)]
    pub finding_ids: Vec<String>,
    /// Brief explanation of why this question matters
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct QuestionBatch {
    #[serde(default)]
    questions: Vec<CandidateQuestion>,
}

const QUESTION_SYSTEM_PROMPT: &str = r#"You are helping a college student prepare questions to ask a landlord about an apartment listing.

You will be given the specific flags and issues found during analysis, each with a unique id. Generate questions grounded ONLY in those findings.

CRITICAL RULES:
1. Generate questions ONLY about the findings listed; do NOT invent new concerns
2. Each question MUST reference at least one finding by its exact id in "finding_ids"
3. Do NOT put finding ids in the question text itself; keep questions clean and professional
4. Use specific details from the finding descriptions to make questions contextual
5. Combine related findings into a single question when appropriate
6. Address high-severity findings before medium and low
7. If few findings exist, generate fewer questions; quality over quantity

Example of a good question for a finding like {"id": "text_flag_0", "description": "Vague pricing - mentions 'affordable' without a specific amount"}:
{"question": "You mention the rent is 'affordable' - what is the exact monthly rent?", "finding_ids": ["text_flag_0"], "reasoning": "Need the exact price to evaluate affordability"}"#;

pub struct ClaudeQuestionModel {
    claude: Claude,
}

impl ClaudeQuestionModel {
    pub fn new(api_key: &str, model: &str) -> Self {
        Self {
            claude: Claude::new(api_key, model),
        }
    }
}

#[async_trait]
impl QuestionModel for ClaudeQuestionModel {
    async fn propose(
        &self,
        findings: &[Finding],
        listing_text: &str,
    ) -> Result<Vec<CandidateQuestion>> {
        let findings_json = serde_json::to_string_pretty(findings)?;
        let listing_excerpt = truncate_to_char_boundary(listing_text, 500);

        let user_prompt = format!(
            "FINDINGS (use these ids, and only these ids):\n{findings_json}\n\n\
             ORIGINAL LISTING TEXT (context only - do not create questions about \
             anything not flagged above):\n{listing_excerpt}"
        );

        let batch: QuestionBatch = self
            .claude
            .extract(QUESTION_SYSTEM_PROMPT, &user_prompt)
            .await?;
        Ok(batch.questions)
    }
}

/// Verdict on a generated batch.
#[derive(Debug, Clone)]
pub enum BatchVerdict {
    /// Enough of the batch was grounded in real findings; these are the
    /// validated questions, priority-sorted and capped.
    Accepted(Vec<Question>),
    /// The batch was discarded; the caller must use the fallback list.
    Discarded { reason: String },
}

/// Validate a generated batch against the request's tagged findings.
pub fn validate_batch(candidates: Vec<CandidateQuestion>, tagged: &TaggedFindings) -> BatchVerdict {
    let total = candidates.len();
    if total == 0 {
        return BatchVerdict::Discarded {
            reason: "model returned no candidate questions".to_string(),
        };
    }

    let known_ids = tagged.ids();
    let mut valid: Vec<Question> = Vec::new();
    let mut rejected = 0usize;
    let mut covered: HashSet<&str> = HashSet::new();

    for candidate in &candidates {
        let grounded = !candidate.finding_ids.is_empty()
            && candidate
                .finding_ids
                .iter()
                .all(|id| known_ids.contains(id.as_str()));

        if !grounded {
            rejected += 1;
            warn!(
                question = truncate_to_char_boundary(&candidate.question, 60),
                ids = ?candidate.finding_ids,
                "Rejected question referencing unknown findings"
            );
            continue;
        }

        for id in &candidate.finding_ids {
            if let Some(finding) = tagged.get(id) {
                covered.insert(finding.id.as_str());
            }
        }

        // Priority and category come from the findings themselves, not
        // from anything the model claims.
        let referenced: Vec<&Finding> = candidate
            .finding_ids
            .iter()
            .filter_map(|id| tagged.get(id))
            .collect();
        let priority = referenced
            .iter()
            .map(|f| f.severity)
            .max()
            .unwrap_or(Severity::Medium);
        let category = referenced
            .first()
            .map(|f| QuestionCategory::from_kind(f.kind))
            .unwrap_or(QuestionCategory::General);

        valid.push(Question {
            question: candidate.question.clone(),
            priority,
            category,
            finding_ids: candidate.finding_ids.clone(),
            reasoning: candidate.reasoning.clone().unwrap_or_default(),
        });
    }

    let rejection_rate = rejected as f64 / total as f64;
    let coverage = covered.len() as f64 / tagged.len().max(1) as f64;

    if rejection_rate > MAX_REJECTION_RATE {
        return BatchVerdict::Discarded {
            reason: format!(
                "{rejected} of {total} generated questions referenced findings that do not exist"
            ),
        };
    }
    if coverage < MIN_COVERAGE {
        return BatchVerdict::Discarded {
            reason: format!(
                "generated questions covered only {} of {} findings",
                covered.len(),
                tagged.len()
            ),
        };
    }

    valid.sort_by(|a, b| b.priority.cmp(&a.priority));
    valid.truncate(MAX_QUESTIONS);

    info!(
        accepted = valid.len(),
        rejected, "Validated generated questions"
    );
    BatchVerdict::Accepted(valid)
}

/// Deterministic fallback: one question per finding, severity-ordered
/// (stable within ties), capped. Cannot hallucinate by construction.
pub fn fallback_questions(tagged: &TaggedFindings) -> Vec<Question> {
    let mut findings: Vec<&Finding> = tagged.findings().iter().collect();
    findings.sort_by(|a, b| b.severity.cmp(&a.severity));

    findings
        .into_iter()
        .take(MAX_QUESTIONS)
        .map(|f| Question {
            question: format!(
                "While reviewing the listing I noted: {}. Could you clarify this?",
                f.description.trim_end_matches('.')
            ),
            priority: f.severity,
            category: QuestionCategory::from_kind(f.kind),
            finding_ids: vec![f.id.clone()],
            reasoning: f.rationale.clone(),
        })
        .collect()
}
