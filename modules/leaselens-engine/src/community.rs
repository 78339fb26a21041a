//! Embedded community discussion source.
//!
//! Stands in for a live forum integration behind the `CommunitySource`
//! trait: same interface, static data. Swapping in a real feed touches
//! nothing outside this file.

use anyhow::Result;
use async_trait::async_trait;

use leaselens_common::{CommentCategory, RawComment, UserType};

use crate::traits::CommunitySource;

/// Forum used for universities without a dedicated mapping.
pub const DEFAULT_FORUM: &str = "college";

struct StaticComment {
    id: &'static str,
    text: &'static str,
    category: CommentCategory,
    user_type: UserType,
    posted: &'static str,
    score: i64,
}

const UIUC_COMMENTS: &[StaticComment] = &[
    StaticComment {
        id: "uiuc_01",
        text: "Lived on Green Street two years, super close to campus and the landlord actually fixed things. Highly recommend.",
        category: CommentCategory::Location,
        user_type: UserType::Undergraduate,
        posted: "2026-06",
        score: 41,
    },
    StaticComment {
        id: "uiuc_02",
        text: "Thin walls everywhere in those new builds on Fourth. Studying during rush week is impossible.",
        category: CommentCategory::Noise,
        user_type: UserType::Undergraduate,
        posted: "2026-04",
        score: 18,
    },
    StaticComment {
        id: "uiuc_03",
        text: "My building charged a 'move-in convenience fee' that was never in the lease. Total scam, avoid.",
        category: CommentCategory::Landlord,
        user_type: UserType::Graduate,
        posted: "2026-07",
        score: 55,
    },
    StaticComment {
        id: "uiuc_04",
        text: "Campustown pricing is getting out of hand but the bus routes make Urbana doable without a car.",
        category: CommentCategory::Pricing,
        user_type: UserType::Graduate,
        posted: "2025-11",
        score: 12,
    },
    StaticComment {
        id: "uiuc_05",
        text: "Saw roaches in the basement laundry twice. Management shrugged.",
        category: CommentCategory::Condition,
        user_type: UserType::Undergraduate,
        posted: "2026-02",
        score: 27,
    },
    StaticComment {
        id: "uiuc_06",
        text: "Honestly a good deal for the location, clean units, parking is the only headache.",
        category: CommentCategory::Pricing,
        user_type: UserType::Undergraduate,
        posted: "2026-05",
        score: 9,
    },
    StaticComment {
        id: "uiuc_07",
        text: "The area north of Springfield feels sketchy at night, get a place with a secured entrance.",
        category: CommentCategory::Safety,
        user_type: UserType::Unspecified,
        posted: "2025-09",
        score: 33,
    },
    StaticComment {
        id: "uiuc_08",
        text: "Subleased here last summer. Quiet block, spacious rooms, responsive landlord. Worth it.",
        category: CommentCategory::General,
        user_type: UserType::Graduate,
        posted: "2025-08",
        score: 14,
    },
];

const JHU_COMMENTS: &[StaticComment] = &[
    StaticComment {
        id: "jhu_01",
        text: "Charles Village rowhouses are beautiful but old. Ask about the radiators before you sign.",
        category: CommentCategory::Condition,
        user_type: UserType::Undergraduate,
        posted: "2026-05",
        score: 22,
    },
    StaticComment {
        id: "jhu_02",
        text: "The JHMI shuttle makes living near the med campus totally fine without a car.",
        category: CommentCategory::Transit,
        user_type: UserType::Graduate,
        posted: "2026-03",
        score: 17,
    },
    StaticComment {
        id: "jhu_03",
        text: "Landlord kept our whole deposit over 'cleaning fees'. Never again with that management company.",
        category: CommentCategory::Landlord,
        user_type: UserType::Graduate,
        posted: "2026-06",
        score: 48,
    },
    StaticComment {
        id: "jhu_04",
        text: "Mold in the bathroom within a month of moving in. They painted over it instead of fixing it.",
        category: CommentCategory::Condition,
        user_type: UserType::Undergraduate,
        posted: "2025-10",
        score: 39,
    },
    StaticComment {
        id: "jhu_05",
        text: "Lived at the big complex on St Paul for two years. Clean, safe, great location for the price.",
        category: CommentCategory::General,
        user_type: UserType::Undergraduate,
        posted: "2026-01",
        score: 11,
    },
    StaticComment {
        id: "jhu_06",
        text: "Hopkins students get quoted higher rents than locals, compare before signing anything.",
        category: CommentCategory::Pricing,
        user_type: UserType::Unspecified,
        posted: "2024-12",
        score: 26,
    },
];

const GENERIC_COMMENTS: &[StaticComment] = &[
    StaticComment {
        id: "college_01",
        text: "Always tour in person. Wide-angle photos made my place look twice its real size.",
        category: CommentCategory::General,
        user_type: UserType::Unspecified,
        posted: "2026-04",
        score: 64,
    },
    StaticComment {
        id: "college_02",
        text: "If a landlord wants a deposit before you've seen the unit, walk away. Classic scam.",
        category: CommentCategory::Landlord,
        user_type: UserType::Unspecified,
        posted: "2026-06",
        score: 88,
    },
    StaticComment {
        id: "college_03",
        text: "Month-to-month after the first year saved me when my program schedule changed.",
        category: CommentCategory::General,
        user_type: UserType::Graduate,
        posted: "2025-12",
        score: 13,
    },
    StaticComment {
        id: "college_04",
        text: "Check who pays utilities. My 'great deal' was $90 a month worse than advertised.",
        category: CommentCategory::Pricing,
        user_type: UserType::Undergraduate,
        posted: "2026-02",
        score: 31,
    },
    StaticComment {
        id: "college_05",
        text: "Living a bus ride from campus was fine in fall, brutal in winter. Factor in the commute.",
        category: CommentCategory::Transit,
        user_type: UserType::Undergraduate,
        posted: "2025-03",
        score: 19,
    },
];

/// Maps universities to their forums and serves the embedded comment
/// pools.
#[derive(Debug, Clone, Default)]
pub struct StaticCommunitySource;

impl StaticCommunitySource {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommunitySource for StaticCommunitySource {
    fn resolve_forum(&self, university: &str) -> String {
        let forum = match university.trim().to_lowercase().as_str() {
            "uiuc" | "university of illinois" | "illinois" | "u of i" => "UIUC",
            "jhu" | "johns hopkins" | "johns hopkins university" | "hopkins" => "jhu",
            _ => DEFAULT_FORUM,
        };
        forum.to_string()
    }

    async fn comments(&self, forum: &str, limit: usize) -> Result<Vec<RawComment>> {
        let pool = match forum {
            "UIUC" => UIUC_COMMENTS,
            "jhu" => JHU_COMMENTS,
            _ => GENERIC_COMMENTS,
        };

        Ok(pool
            .iter()
            .take(limit)
            .map(|c| RawComment {
                id: c.id.to_string(),
                text: c.text.to_string(),
                category: c.category,
                user_type: c.user_type,
                posted: c.posted.to_string(),
                score: c.score,
            })
            .collect())
    }
}
