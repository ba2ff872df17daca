use rocket::http::Status;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use scout_game_server::error::EngineError;
use scout_game_server::ranking::{BuilderSummary, BuildersPage, CompositeCursor};
use scout_game_server::rewards::{
    ClaimOutcome, ClaimablePoints, ContributionReward, NftSaleReward, ScoutReward,
    WeeklyRewardBreakdown,
};

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct CursorResponse {
    pub contributor_id: String,
    pub rank: Option<i64>,
}

impl From<CompositeCursor> for CursorResponse {
    fn from(cursor: CompositeCursor) -> Self {
        Self {
            contributor_id: cursor.contributor_id,
            rank: cursor.rank,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BuilderResponse {
    pub id: String,
    pub display_name: String,
    pub rank: Option<i64>,
    pub gems_collected: i64,
    pub nfts_sold: i64,
    pub builder_points: i64,
    pub nft_image_url: Option<String>,
    pub nft_current_price: Option<i64>,
    pub scouted_by: i64,
}

impl From<BuilderSummary> for BuilderResponse {
    fn from(summary: BuilderSummary) -> Self {
        Self {
            id: summary.id,
            display_name: summary.display_name,
            rank: summary.rank,
            gems_collected: summary.gems_collected,
            nfts_sold: summary.nfts_sold,
            builder_points: summary.builder_points,
            nft_image_url: summary.nft_image_url,
            nft_current_price: summary.nft_current_price,
            scouted_by: summary.scouted_by,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BuildersPageResponse {
    pub builders: Vec<BuilderResponse>,
    /// Absent on the final page.
    pub next_cursor: Option<CursorResponse>,
}

impl From<BuildersPage> for BuildersPageResponse {
    fn from(page: BuildersPage) -> Self {
        Self {
            builders: page.builders.into_iter().map(Into::into).collect(),
            next_cursor: page.next_cursor.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct BonusPartnerResponse {
    pub key: String,
    pub name: String,
    pub icon: String,
}

impl BonusPartnerResponse {
    fn from_key(key: String) -> Self {
        match shared::partner_by_key(&key) {
            Some(partner) => Self {
                key,
                name: partner.name.to_string(),
                icon: partner.icon.to_string(),
            },
            None => Self {
                name: key.clone(),
                icon: String::new(),
                key,
            },
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ContributionRewardResponse {
    pub points: i64,
    pub streak_count: i64,
    pub first_contributions: i64,
    pub regular_contributions: i64,
    pub bonus_partners: Vec<BonusPartnerResponse>,
}

impl From<ContributionReward> for ContributionRewardResponse {
    fn from(reward: ContributionReward) -> Self {
        Self {
            points: reward.points,
            streak_count: reward.streak_count,
            first_contributions: reward.first_contributions,
            regular_contributions: reward.regular_contributions,
            bonus_partners: reward
                .bonus_partners
                .into_iter()
                .map(BonusPartnerResponse::from_key)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ScoutRewardResponse {
    pub points: i64,
}

impl From<ScoutReward> for ScoutRewardResponse {
    fn from(reward: ScoutReward) -> Self {
        Self {
            points: reward.points,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct NftSaleRewardResponse {
    pub points: i64,
    pub quantity: i64,
}

impl From<NftSaleReward> for NftSaleRewardResponse {
    fn from(reward: NftSaleReward) -> Self {
        Self {
            points: reward.points,
            quantity: reward.quantity,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct WeeklyRewardResponse {
    pub week: String,
    pub week_number: Option<u32>,
    pub rank: Option<i64>,
    pub contribution_reward: Option<ContributionRewardResponse>,
    pub scout_reward: Option<ScoutRewardResponse>,
    pub nft_sale_reward: Option<NftSaleRewardResponse>,
}

impl From<WeeklyRewardBreakdown> for WeeklyRewardResponse {
    fn from(breakdown: WeeklyRewardBreakdown) -> Self {
        Self {
            week: breakdown.week.to_string(),
            week_number: breakdown.week_number,
            rank: breakdown.rank,
            contribution_reward: breakdown.contribution.map(Into::into),
            scout_reward: breakdown.scout.map(Into::into),
            nft_sale_reward: breakdown.nft_sale.map(Into::into),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimablePointsResponse {
    /// Zero renders as "nothing to claim", not an error.
    pub total_claimable_points: i64,
    pub weekly_rewards: Vec<WeeklyRewardResponse>,
}

impl From<ClaimablePoints> for ClaimablePointsResponse {
    fn from(claimable: ClaimablePoints) -> Self {
        Self {
            total_claimable_points: claimable.total_claimable_points,
            weekly_rewards: claimable
                .weekly_rewards
                .into_iter()
                .map(Into::into)
                .collect(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ClaimResponse {
    pub claimed_points: i64,
}

impl From<ClaimOutcome> for ClaimResponse {
    fn from(outcome: ClaimOutcome) -> Self {
        Self {
            claimed_points: outcome.claimed_points,
        }
    }
}

/// Maps engine failures to response statuses; storage failures are logged
/// here since the engine propagates them untouched.
pub fn reject(err: EngineError) -> Status {
    match err {
        EngineError::InvalidArgument(_) => Status::BadRequest,
        EngineError::ClaimConflict => Status::Conflict,
        EngineError::Cancelled => Status::ServiceUnavailable,
        EngineError::StorageUnavailable(source) => {
            tracing::error!("storage failure: {source:#}");
            Status::BadGateway
        }
    }
}
