use async_trait::async_trait;
use shared::{ContributorId, RewardEvent, Season, Week};

/// Failures surfaced by a stats store implementation.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store call failed")]
    Unavailable(#[from] anyhow::Error),
    #[error("store call cancelled")]
    Cancelled,
    #[error("compare-and-set lost a concurrent claim race")]
    Conflict,
}

/// How one page of eligible builders is ordered and where it resumes.
///
/// The resume positions implement keyset pagination: the query excludes
/// everything at or before the cursor row under the strategy's total order,
/// so pages stay stable while rows are inserted concurrently.
#[derive(Debug, Clone)]
pub enum PageOrder {
    /// `(created_at, id)` descending, resumed from the cursor contributor's
    /// own position in that order.
    Newest { after: Option<ContributorId> },
    /// `(rank, id)` ascending over the rows of `rank_week` that carry an
    /// assigned rank.
    ByRank {
        rank_week: Week,
        after: Option<(i64, ContributorId)>,
    },
}

#[derive(Debug, Clone)]
pub struct BuilderQuery {
    pub order: PageOrder,
    /// Week whose gem counts are reported; for `top` this differs from the
    /// week the ordering ranks by.
    pub stats_week: Week,
    pub season: Season,
    pub limit: u32,
}

/// One joined row per eligible builder. Missing stat rows come back as
/// `None`; the engine applies the defaulting policy, not the store.
#[derive(Debug, Clone)]
pub struct BuilderRow {
    pub id: ContributorId,
    pub display_name: String,
    pub rank: Option<i64>,
    pub gems_collected: Option<i64>,
    pub nfts_sold: Option<i64>,
    pub builder_points: Option<i64>,
    pub nft_image_url: Option<String>,
    pub nft_current_price: Option<i64>,
    pub scouted_by: Option<i64>,
}

/// The narrow read/update contract both engines consume. Ranking reads are
/// a single joined query; `claim_unclaimed` is the engine's only mutation
/// and must transition events atomically.
#[async_trait]
pub trait StatsStore: Send + Sync {
    /// One page of eligible builders (approved status, holding an NFT for
    /// the queried season), ordered and resumed per `query.order`.
    async fn eligible_builders(&self, query: &BuilderQuery) -> Result<Vec<BuilderRow>, StoreError>;

    /// Every reward event for the contributor not yet marked claimed.
    async fn unclaimed_rewards(
        &self,
        contributor: &ContributorId,
    ) -> Result<Vec<RewardEvent>, StoreError>;

    /// The contributor's assigned rank for each requested week, where one
    /// exists.
    async fn weekly_ranks(
        &self,
        contributor: &ContributorId,
        weeks: &[Week],
    ) -> Result<Vec<(Week, Option<i64>)>, StoreError>;

    /// Atomically marks every unclaimed reward event for the contributor as
    /// claimed, returning the set actually transitioned. A second concurrent
    /// call observes either all events or none of them, never a partial
    /// overlap.
    async fn claim_unclaimed(
        &self,
        contributor: &ContributorId,
    ) -> Result<Vec<RewardEvent>, StoreError>;
}
