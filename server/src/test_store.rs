//! In-memory `StatsStore` used by the engine test suites. Replicates the
//! ordering, eligibility, and atomic-claim semantics the Postgres store
//! expresses in SQL.

use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{Days, NaiveDate, NaiveDateTime};
use shared::{BuilderStatus, ContributorId, RewardEvent, Season, Week};

use crate::store::{BuilderQuery, BuilderRow, PageOrder, StatsStore, StoreError};

#[derive(Debug, Clone)]
pub struct TestBuilder {
    id: ContributorId,
    status: BuilderStatus,
    created_at: NaiveDateTime,
    nfts: Vec<TestNft>,
    weekly: Vec<(Week, i64, Option<i64>)>,
    season_sold: Vec<(Season, i64)>,
    all_time_points: Option<i64>,
}

#[derive(Debug, Clone)]
struct TestNft {
    season: Season,
    image_url: Option<String>,
    current_price: i64,
    scouted_by: i64,
}

fn base_date() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 10, 14)
        .unwrap()
        .and_hms_opt(12, 0, 0)
        .unwrap()
}

impl TestBuilder {
    pub fn new(id: impl Into<ContributorId>) -> Self {
        Self {
            id: id.into(),
            status: BuilderStatus::Approved,
            created_at: base_date(),
            nfts: Vec::new(),
            weekly: Vec::new(),
            season_sold: Vec::new(),
            all_time_points: None,
        }
    }

    pub fn status(mut self, status: BuilderStatus) -> Self {
        self.status = status;
        self
    }

    pub fn created_days_ago(mut self, days: i64) -> Self {
        self.created_at = base_date()
            .checked_sub_days(Days::new(days as u64))
            .unwrap();
        self
    }

    pub fn with_nft(self, season: Season) -> Self {
        self.with_priced_nft(season, 100, 0)
    }

    pub fn with_priced_nft(mut self, season: Season, price: i64, scouted_by: i64) -> Self {
        self.nfts.push(TestNft {
            season,
            image_url: Some(format!("https://nft.scoutgame.xyz/{}.png", self.id)),
            current_price: price,
            scouted_by,
        });
        self
    }

    pub fn with_weekly(mut self, week: Week, gems: i64, rank: Option<i64>) -> Self {
        self.weekly.push((week, gems, rank));
        self
    }

    pub fn with_season_sold(mut self, season: Season, nfts_sold: i64) -> Self {
        self.season_sold.push((season, nfts_sold));
        self
    }

    pub fn all_time_points(mut self, points: i64) -> Self {
        self.all_time_points = Some(points);
        self
    }

    fn nft_for(&self, season: &Season) -> Option<&TestNft> {
        self.nfts.iter().find(|nft| nft.season == *season)
    }

    fn weekly_for(&self, week: &Week) -> Option<&(Week, i64, Option<i64>)> {
        self.weekly.iter().find(|(w, _, _)| w == week)
    }

    fn row(&self, query: &BuilderQuery, rank: Option<i64>) -> BuilderRow {
        let nft = self.nft_for(&query.season);
        BuilderRow {
            id: self.id.clone(),
            display_name: self.id.clone(),
            rank,
            gems_collected: self.weekly_for(&query.stats_week).map(|(_, gems, _)| *gems),
            nfts_sold: self
                .season_sold
                .iter()
                .find(|(season, _)| *season == query.season)
                .map(|(_, sold)| *sold),
            builder_points: self.all_time_points,
            nft_image_url: nft.and_then(|nft| nft.image_url.clone()),
            nft_current_price: nft.map(|nft| nft.current_price),
            scouted_by: nft.map(|nft| nft.scouted_by),
        }
    }
}

#[derive(Debug)]
struct StoredReward {
    event: RewardEvent,
    claimed: bool,
}

#[derive(Debug, Default)]
struct Inner {
    builders: Vec<TestBuilder>,
    rewards: Vec<StoredReward>,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    inner: Mutex<Inner>,
}

impl InMemoryStore {
    pub fn add(&self, builder: TestBuilder) {
        self.inner.lock().unwrap().builders.push(builder);
    }

    pub fn add_reward(&self, event: RewardEvent) {
        self.inner.lock().unwrap().rewards.push(StoredReward {
            event,
            claimed: false,
        });
    }
}

#[async_trait]
impl StatsStore for InMemoryStore {
    async fn eligible_builders(&self, query: &BuilderQuery) -> Result<Vec<BuilderRow>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let eligible = inner
            .builders
            .iter()
            .filter(|b| b.status.is_approved() && b.nft_for(&query.season).is_some());

        let rows = match &query.order {
            PageOrder::Newest { after } => {
                let mut ordered: Vec<&TestBuilder> = eligible.collect();
                ordered.sort_by(|a, b| {
                    (b.created_at, &b.id).cmp(&(a.created_at, &a.id))
                });
                let boundary = after.as_ref().and_then(|id| {
                    inner
                        .builders
                        .iter()
                        .find(|b| b.id == *id)
                        .map(|b| (b.created_at, b.id.clone()))
                });
                ordered
                    .into_iter()
                    .filter(|b| match &boundary {
                        Some((created, id)) => (b.created_at, &b.id) < (*created, id),
                        None => true,
                    })
                    .take(query.limit as usize)
                    .map(|b| b.row(query, None))
                    .collect()
            }
            PageOrder::ByRank { rank_week, after } => {
                let mut ranked: Vec<(i64, &TestBuilder)> = eligible
                    .filter_map(|b| {
                        b.weekly_for(rank_week)
                            .and_then(|(_, _, rank)| rank.map(|rank| (rank, b)))
                    })
                    .collect();
                ranked.sort_by(|a, b| (a.0, &a.1.id).cmp(&(b.0, &b.1.id)));
                ranked
                    .into_iter()
                    .filter(|(rank, b)| match after {
                        Some((after_rank, after_id)) => {
                            (*rank, &b.id) > (*after_rank, after_id)
                        }
                        None => true,
                    })
                    .take(query.limit as usize)
                    .map(|(rank, b)| b.row(query, Some(rank)))
                    .collect()
            }
        };

        Ok(rows)
    }

    async fn unclaimed_rewards(
        &self,
        contributor: &ContributorId,
    ) -> Result<Vec<RewardEvent>, StoreError> {
        let inner = self.inner.lock().unwrap();
        Ok(inner
            .rewards
            .iter()
            .filter(|r| !r.claimed && r.event.contributor == *contributor)
            .map(|r| r.event.clone())
            .collect())
    }

    async fn weekly_ranks(
        &self,
        contributor: &ContributorId,
        weeks: &[Week],
    ) -> Result<Vec<(Week, Option<i64>)>, StoreError> {
        let inner = self.inner.lock().unwrap();
        let builder = inner.builders.iter().find(|b| b.id == *contributor);
        Ok(weeks
            .iter()
            .map(|week| {
                let rank = builder
                    .and_then(|b| b.weekly_for(week))
                    .and_then(|(_, _, rank)| *rank);
                (*week, rank)
            })
            .collect())
    }

    async fn claim_unclaimed(
        &self,
        contributor: &ContributorId,
    ) -> Result<Vec<RewardEvent>, StoreError> {
        // One lock scope covers read-and-mark, mirroring the single
        // transactional UPDATE of the Postgres store.
        let mut inner = self.inner.lock().unwrap();
        let mut transitioned = Vec::new();
        for stored in inner
            .rewards
            .iter_mut()
            .filter(|r| !r.claimed && r.event.contributor == *contributor)
        {
            stored.claimed = true;
            transitioned.push(stored.event.clone());
        }
        Ok(transitioned)
    }
}
