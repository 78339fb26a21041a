//! Finding tagging: every piece of analyzer evidence gets a stable,
//! request-scoped identifier before any model is allowed to reference it.
//!
//! Identifiers follow `{kind}_{index}`, indexed per kind in input order.
//! They are the ground truth the question validator checks against and
//! carry no meaning outside the request that produced them.

use std::collections::HashSet;

use leaselens_common::{Finding, FindingKind, ImageAnalysis, Severity, TextAnalysis};

/// The tagged evidence set for one request.
#[derive(Debug, Clone, Default)]
pub struct TaggedFindings {
    findings: Vec<Finding>,
}

impl TaggedFindings {
    pub fn findings(&self) -> &[Finding] {
        &self.findings
    }

    pub fn len(&self) -> usize {
        self.findings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    pub fn ids(&self) -> HashSet<&str> {
        self.findings.iter().map(|f| f.id.as_str()).collect()
    }

    pub fn get(&self, id: &str) -> Option<&Finding> {
        self.findings.iter().find(|f| f.id == id)
    }
}

/// Stamp every analyzer output with its identifier, preserving input
/// order within each kind.
pub fn tag(text: &TextAnalysis, image: &ImageAnalysis) -> TaggedFindings {
    let mut findings = Vec::new();

    for (i, flag) in text.red_flags.iter().enumerate() {
        findings.push(Finding {
            id: finding_id(FindingKind::TextFlag, i),
            kind: FindingKind::TextFlag,
            severity: flag.severity,
            description: flag.description.clone(),
            rationale: flag.rationale.clone(),
        });
    }

    for (i, info) in text.missing_info.iter().enumerate() {
        findings.push(Finding {
            id: finding_id(FindingKind::MissingInfo, i),
            kind: FindingKind::MissingInfo,
            severity: info.importance,
            description: format!("Missing: {}", info.item),
            rationale: info.why.clone(),
        });
    }

    for (i, issue) in image.photo_issues.iter().enumerate() {
        findings.push(Finding {
            id: finding_id(FindingKind::PhotoIssue, i),
            kind: FindingKind::PhotoIssue,
            severity: issue.severity,
            description: issue.issue.clone(),
            rationale: issue.explanation.clone(),
        });
    }

    for (i, obs) in image.positive_observations.iter().enumerate() {
        findings.push(Finding {
            id: finding_id(FindingKind::PositiveObservation, i),
            kind: FindingKind::PositiveObservation,
            // Positives are worth confirming, never urgent.
            severity: Severity::Low,
            description: obs.observation.clone(),
            rationale: String::new(),
        });
    }

    TaggedFindings { findings }
}

fn finding_id(kind: FindingKind, index: usize) -> String {
    format!("{}_{}", kind.id_prefix(), index)
}
