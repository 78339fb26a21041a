//! Rule-based sentiment scoring for student housing comments.
//!
//! Pure and deterministic — no external calls. The score's magnitude
//! doubles as the rule engine's confidence: the router only consults the
//! nuanced model when |score| falls below its threshold.

/// College-housing idioms. Strongest signal class: these phrases are
/// near-unambiguous in student apartment discussions.
const COLLEGE_NEGATIVE: &[&str] = &[
    "sketchy",
    "loud parties",
    "thin walls",
    "far from campus",
    "overpriced",
    "landlord sucks",
    "avoid",
    "scam",
    "dirty",
    "roaches",
    "mold",
    "broken ac",
    "parking nightmare",
];

const COLLEGE_POSITIVE: &[&str] = &[
    "close to campus",
    "quiet",
    "great location",
    "worth it",
    "responsive landlord",
    "clean",
    "spacious",
    "good deal",
    "highly recommend",
    "love living here",
    "clutch",
];

const STRONG_NEGATIVE: &[&str] = &[
    "worst",
    "terrible",
    "awful",
    "disgusting",
    "nightmare",
    "shady",
    "broken",
    "horrible",
    "trash",
    "sucks",
    "hate",
    "miserable",
    "brutal",
    "never again",
    "rip off",
];

const STRONG_POSITIVE: &[&str] = &[
    "best",
    "amazing",
    "perfect",
    "excellent",
    "love",
    "great",
    "wonderful",
    "fantastic",
    "awesome",
    "gem",
    "steal",
    "couldn't be happier",
];

const MODERATE_NEGATIVE: &[&str] = &[
    "bad",
    "issue",
    "problem",
    "annoying",
    "inconvenient",
    "loud",
    "noisy",
    "far",
    "expensive",
    "old",
    "small",
    "complaint",
    "disappointing",
    "meh",
    "mediocre",
];

const MODERATE_POSITIVE: &[&str] = &[
    "good",
    "nice",
    "safe",
    "convenient",
    "happy",
    "worth",
    "solid",
    "recommend",
    "impressed",
    "comfortable",
    "decent",
    "satisfied",
];

const NEGATIONS: &[&str] = &["not", "no", "never", "don't", "didn't", "won't", "barely"];

/// How many tokens before a matched term a negation may sit.
const NEGATION_WINDOW: usize = 2;

/// Score a comment. Positive means positive sentiment; |score| is the
/// rule engine's confidence in the label.
pub fn score(text: &str) -> f64 {
    let tokens = tokenize(text);
    let mut consumed = vec![false; tokens.len()];
    let mut total = 0.0;

    // Weight classes are matched strongest-first so an idiom consumes its
    // tokens before a weaker class can re-match a component word
    // ("highly recommend" shadows "recommend").
    let classes: [(&[&str], f64); 6] = [
        (COLLEGE_POSITIVE, 3.0),
        (COLLEGE_NEGATIVE, -3.0),
        (STRONG_POSITIVE, 2.0),
        (STRONG_NEGATIVE, -2.0),
        (MODERATE_POSITIVE, 1.0),
        (MODERATE_NEGATIVE, -1.0),
    ];

    for (phrases, weight) in classes {
        for phrase in phrases {
            let phrase_tokens: Vec<&str> = phrase.split_whitespace().collect();
            total += match_contributions(&tokens, &mut consumed, &phrase_tokens, weight);
        }
    }

    total
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '\'' {
                c
            } else {
                ' '
            }
        })
        .collect::<String>()
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

/// Sum the contributions of every non-overlapping occurrence of `phrase`
/// in `tokens`, marking matched positions consumed. A negation within
/// `NEGATION_WINDOW` tokens before the match inverts the sign and halves
/// the magnitude.
fn match_contributions(
    tokens: &[String],
    consumed: &mut [bool],
    phrase: &[&str],
    weight: f64,
) -> f64 {
    if phrase.is_empty() || phrase.len() > tokens.len() {
        return 0.0;
    }

    let mut total = 0.0;
    let mut i = 0;
    while i + phrase.len() <= tokens.len() {
        let window = &tokens[i..i + phrase.len()];
        let matches = window.iter().zip(phrase).all(|(t, p)| t == p)
            && !consumed[i..i + phrase.len()].iter().any(|&c| c);

        if matches {
            consumed[i..i + phrase.len()].iter_mut().for_each(|c| *c = true);
            total += if negated_before(tokens, i) {
                -weight / 2.0
            } else {
                weight
            };
            i += phrase.len();
        } else {
            i += 1;
        }
    }

    total
}

fn negated_before(tokens: &[String], index: usize) -> bool {
    tokens[index.saturating_sub(NEGATION_WINDOW)..index]
        .iter()
        .any(|t| NEGATIONS.contains(&t.as_str()))
}
