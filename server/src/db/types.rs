use anyhow::{bail, Context};
use shared::{RewardEvent, RewardKind, Week};

use crate::store::BuilderRow;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct BuilderRowRecord {
    pub id: String,
    pub display_name: String,
    pub rank: Option<i64>,
    pub gems_collected: Option<i64>,
    pub nfts_sold: Option<i64>,
    pub builder_points: Option<i64>,
    pub nft_image_url: Option<String>,
    pub nft_current_price: Option<i64>,
    pub scouted_by: Option<i64>,
}

impl From<BuilderRowRecord> for BuilderRow {
    fn from(record: BuilderRowRecord) -> Self {
        Self {
            id: record.id,
            display_name: record.display_name,
            rank: record.rank,
            gems_collected: record.gems_collected,
            nfts_sold: record.nfts_sold,
            builder_points: record.builder_points,
            nft_image_url: record.nft_image_url,
            nft_current_price: record.nft_current_price,
            scouted_by: record.scouted_by,
        }
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RewardEventRecord {
    pub recipient_id: String,
    pub week: String,
    pub kind: String,
    pub points: i64,
    pub streak_count: Option<i64>,
    pub first_contributions: Option<i64>,
    pub regular_contributions: Option<i64>,
    pub repo: Option<String>,
    pub quantity: Option<i64>,
}

impl TryFrom<RewardEventRecord> for RewardEvent {
    type Error = anyhow::Error;

    fn try_from(record: RewardEventRecord) -> Result<Self, Self::Error> {
        let week: Week = record
            .week
            .parse()
            .with_context(|| format!("reward event carries week {:?}", record.week))?;
        let kind = match record.kind.as_str() {
            "contribution" => RewardKind::Contribution {
                streak_count: record.streak_count.unwrap_or_default(),
                first_contributions: record.first_contributions.unwrap_or_default(),
                regular_contributions: record.regular_contributions.unwrap_or_default(),
                repo: record.repo.unwrap_or_default(),
            },
            "scout" => RewardKind::Scout,
            "nft_sale" => RewardKind::NftSale {
                quantity: record.quantity.unwrap_or_default(),
            },
            other => bail!("unknown reward kind {other:?}"),
        };

        Ok(RewardEvent {
            contributor: record.recipient_id,
            week,
            points: record.points,
            kind,
        })
    }
}

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeeklyRankRecord {
    pub week: String,
    pub rank: Option<i64>,
}
