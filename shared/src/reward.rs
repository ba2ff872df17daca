use serde::{Deserialize, Serialize};

use crate::{ContributorId, Week};

/// One unclaimed (or claimed) reward-bearing event for a contributor. The
/// atomic unit the rewards engine folds into per-week breakdowns; immutable
/// once claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardEvent {
    pub contributor: ContributorId,
    pub week: Week,
    pub points: i64,
    #[serde(flatten)]
    pub kind: RewardKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RewardKind {
    /// Earned by the contributor's own merged contributions that week.
    Contribution {
        streak_count: i64,
        first_contributions: i64,
        regular_contributions: i64,
        /// `org/repo` the contribution landed in, used for bonus partner
        /// attribution.
        repo: String,
    },
    /// Earned because a builder this contributor scouted performed well.
    Scout,
    /// Earned from the contributor's own NFTs being sold.
    NftSale { quantity: i64 },
}
