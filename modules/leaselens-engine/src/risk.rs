//! Risk dimension calculators and the overall verdict.
//!
//! Each dimension reduces one evidence source to a common 1-3 scale
//! (1 = low risk, 3 = high risk). The overall label averages the three
//! so a severe problem in one dimension cannot be masked by the others.

use leaselens_common::{
    ImageAnalysis, OverallAssessment, RiskLevel, Severity, StudentReviews, TextAnalysis,
};

use crate::sentiment::aggregate::{self, SentimentTally};

/// Severity-weighted load per red flag.
fn flag_weight(severity: Severity) -> f64 {
    match severity {
        Severity::Low => 0.5,
        Severity::Medium => 1.0,
        Severity::High => 2.0,
    }
}

/// Text risk: grows with every flag and faster with high-severity ones.
/// No flags is exactly 1.0; roughly five medium flags (or three high)
/// saturate at 3.0.
pub fn text_risk(analysis: &TextAnalysis) -> f64 {
    let load: f64 = analysis
        .red_flags
        .iter()
        .map(|f| flag_weight(f.severity))
        .sum();
    (1.0 + 0.4 * load).min(3.0)
}

/// Image risk from the 0-10 photo quality score. A quality of zero also
/// covers the no-photos case: missing photos are themselves suspicious.
pub fn image_risk(quality_score: f64) -> f64 {
    if quality_score >= 7.0 {
        1.0
    } else if quality_score >= 4.0 {
        2.0
    } else {
        3.0
    }
}

/// Student risk from the weighted negative-comment ratio.
pub fn student_risk(negative_ratio: f64) -> f64 {
    if negative_ratio < 0.3 {
        1.0
    } else if negative_ratio < 0.6 {
        2.0
    } else {
        3.0
    }
}

/// Label for an averaged dimension score. Boundary values take the
/// lower-risk label.
pub fn risk_level(average: f64) -> RiskLevel {
    if average <= 1.5 {
        RiskLevel::Low
    } else if average <= 2.5 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}

/// Combine the three evidence sources into the overall assessment.
pub fn assess(
    text: &TextAnalysis,
    image: &ImageAnalysis,
    reviews: &StudentReviews,
) -> OverallAssessment {
    let tally = SentimentTally::from_comments(&reviews.comments);

    let text_risk = text_risk(text);
    let image_risk = image_risk(image.quality_score);
    let student_risk = student_risk(tally.negative_ratio());

    let average = (text_risk + image_risk + student_risk) / 3.0;
    let risk_level = risk_level(average);

    let recommendation = match risk_level {
        RiskLevel::Low => {
            "This listing looks relatively safe. Still ask the suggested questions!"
        }
        RiskLevel::Medium => {
            "Proceed with caution. Make sure to ask all the suggested questions and schedule a tour."
        }
        RiskLevel::High => {
            "Major red flags detected. Consider other options or investigate thoroughly before proceeding."
        }
    };

    let red_flag_count = text.red_flags.len();

    OverallAssessment {
        risk_level,
        text_risk,
        image_risk,
        student_risk,
        red_flag_count,
        photo_issue_count: image.photo_issues.len(),
        student_score: aggregate::student_score(&tally),
        summary: summary(text_risk, image_risk, student_risk, red_flag_count),
        recommendation: recommendation.to_string(),
    }
}

fn summary(text_risk: f64, image_risk: f64, student_risk: f64, red_flag_count: usize) -> String {
    let mut concerns: Vec<&str> = Vec::new();

    if text_risk >= 3.0 {
        concerns.push("listing description has serious issues");
    } else if text_risk >= 2.0 {
        concerns.push("listing description raises some concerns");
    }

    if image_risk >= 3.0 {
        concerns.push("photos are misleading or poor quality");
    } else if image_risk >= 2.0 {
        concerns.push("photo quality could be better");
    }

    if student_risk >= 3.0 {
        concerns.push("student reviews are largely negative");
    } else if student_risk >= 2.0 {
        concerns.push("student reviews are mixed");
    }

    if concerns.is_empty() {
        return "This listing looks relatively solid. No major red flags detected.".to_string();
    }

    let mut joined = concerns.join(", ");
    if let Some(first) = joined.get_mut(0..1) {
        first.make_ascii_uppercase();
    }
    format!("Found {red_flag_count} red flag(s). {joined}.")
}
