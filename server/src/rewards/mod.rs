use std::collections::BTreeMap;

use itertools::Itertools;
use shared::{match_partner, ContributorId, RewardEvent, RewardKind, Season, Week};

use crate::error::EngineResult;
use crate::store::StatsStore;

/// Merged view of one contributor's unclaimed rewards for one week. At most
/// one sub-reward of each kind; same-kind events are summed into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WeeklyRewardBreakdown {
    pub week: Week,
    /// 1-based ordinal of the week within the season, `None` when the week
    /// predates the season's opening week.
    pub week_number: Option<u32>,
    pub rank: Option<i64>,
    pub contribution: Option<ContributionReward>,
    pub scout: Option<ScoutReward>,
    pub nft_sale: Option<NftSaleReward>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContributionReward {
    pub points: i64,
    pub streak_count: i64,
    pub first_contributions: i64,
    pub regular_contributions: i64,
    /// Partner keys attributed from the contribution repos; display/audit
    /// only, never part of the point value.
    pub bonus_partners: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScoutReward {
    pub points: i64,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NftSaleReward {
    pub points: i64,
    pub quantity: i64,
}

#[derive(Debug, Clone, Default)]
pub struct ClaimablePoints {
    pub total_claimable_points: i64,
    /// Ascending by week.
    pub weekly_rewards: Vec<WeeklyRewardBreakdown>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClaimOutcome {
    pub claimed_points: i64,
}

impl WeeklyRewardBreakdown {
    fn empty(week: Week, season: Season) -> Self {
        Self {
            week,
            week_number: week.number_in(season),
            rank: None,
            contribution: None,
            scout: None,
            nft_sale: None,
        }
    }

    fn absorb(&mut self, event: RewardEvent) {
        match event.kind {
            RewardKind::Contribution {
                streak_count,
                first_contributions,
                regular_contributions,
                repo,
            } => {
                let reward = self.contribution.get_or_insert_with(Default::default);
                reward.points += event.points;
                reward.streak_count += streak_count;
                reward.first_contributions += first_contributions;
                reward.regular_contributions += regular_contributions;
                if let Some(partner) = match_partner(&repo) {
                    if !reward.bonus_partners.iter().any(|p| p == partner) {
                        reward.bonus_partners.push(partner.to_string());
                    }
                }
            }
            RewardKind::Scout => {
                self.scout.get_or_insert_with(Default::default).points += event.points;
            }
            RewardKind::NftSale { quantity } => {
                let reward = self.nft_sale.get_or_insert_with(Default::default);
                reward.points += event.points;
                reward.quantity += quantity;
            }
        }
    }

    pub fn total_points(&self) -> i64 {
        self.contribution.as_ref().map(|r| r.points).unwrap_or_default()
            + self.scout.as_ref().map(|r| r.points).unwrap_or_default()
            + self.nft_sale.as_ref().map(|r| r.points).unwrap_or_default()
    }
}

/// Scans every week with unclaimed reward events for the contributor and
/// merges them into per-week breakdowns plus one grand total. A zero total
/// with no breakdowns is the "nothing to claim" state, not an error.
pub async fn get_claimable_points<S: StatsStore + ?Sized>(
    store: &S,
    season: Season,
    contributor: &ContributorId,
) -> EngineResult<ClaimablePoints> {
    let events = store.unclaimed_rewards(contributor).await?;

    let mut by_week: BTreeMap<Week, WeeklyRewardBreakdown> = BTreeMap::new();
    for event in events {
        by_week
            .entry(event.week)
            .or_insert_with(|| WeeklyRewardBreakdown::empty(event.week, season))
            .absorb(event);
    }

    let weeks = by_week.keys().copied().collect_vec();
    if !weeks.is_empty() {
        for (week, rank) in store.weekly_ranks(contributor, &weeks).await? {
            if let Some(breakdown) = by_week.get_mut(&week) {
                breakdown.rank = rank;
            }
        }
    }

    let weekly_rewards: Vec<_> = by_week.into_values().collect();
    let total_claimable_points = weekly_rewards.iter().map(|b| b.total_points()).sum();

    Ok(ClaimablePoints {
        total_claimable_points,
        weekly_rewards,
    })
}

/// Atomically marks every currently-unclaimed reward event for the
/// contributor as claimed and returns the sum paid out. Idempotent: a
/// repeat call finds nothing to transition and pays zero.
pub async fn claim<S: StatsStore + ?Sized>(
    store: &S,
    contributor: &ContributorId,
) -> EngineResult<ClaimOutcome> {
    let transitioned = store.claim_unclaimed(contributor).await?;
    Ok(ClaimOutcome {
        claimed_points: transitioned.iter().map(|event| event.points).sum(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::test_store::{InMemoryStore, TestBuilder};

    fn week(s: &str) -> Week {
        s.parse().unwrap()
    }

    fn season() -> Season {
        week("2024-W41")
    }

    fn contribution(
        contributor: &str,
        wk: &str,
        points: i64,
        repo: &str,
    ) -> RewardEvent {
        RewardEvent {
            contributor: contributor.into(),
            week: week(wk),
            points,
            kind: RewardKind::Contribution {
                streak_count: 0,
                first_contributions: 1,
                regular_contributions: 2,
                repo: repo.into(),
            },
        }
    }

    fn scout_reward(contributor: &str, wk: &str, points: i64) -> RewardEvent {
        RewardEvent {
            contributor: contributor.into(),
            week: week(wk),
            points,
            kind: RewardKind::Scout,
        }
    }

    fn nft_sale(contributor: &str, wk: &str, points: i64, quantity: i64) -> RewardEvent {
        RewardEvent {
            contributor: contributor.into(),
            week: week(wk),
            points,
            kind: RewardKind::NftSale { quantity },
        }
    }

    #[tokio::test]
    async fn merges_one_week_and_claims_it_once() {
        let store = InMemoryStore::default();
        store.add(
            TestBuilder::new("dana")
                .with_nft(season())
                .with_weekly(week("2024-W41"), 5, Some(3)),
        );
        store.add_reward(contribution("dana", "2024-W41", 12, "optimism-labs/optimism"));
        store.add_reward(scout_reward("dana", "2024-W41", 3));

        let claimable = get_claimable_points(&store, season(), &"dana".into())
            .await
            .unwrap();
        assert_eq!(claimable.total_claimable_points, 15);
        assert_eq!(claimable.weekly_rewards.len(), 1);

        let breakdown = &claimable.weekly_rewards[0];
        assert_eq!(breakdown.week_number, Some(1));
        assert_eq!(breakdown.rank, Some(3));
        let contribution = breakdown.contribution.as_ref().unwrap();
        assert_eq!(contribution.points, 12);
        assert_eq!(contribution.bonus_partners, ["optimism"]);
        assert_eq!(breakdown.scout.as_ref().unwrap().points, 3);
        assert!(breakdown.nft_sale.is_none());

        let outcome = claim(&store, &"dana".into()).await.unwrap();
        assert_eq!(outcome.claimed_points, 15);

        let after = get_claimable_points(&store, season(), &"dana".into())
            .await
            .unwrap();
        assert_eq!(after.total_claimable_points, 0);
        assert!(after.weekly_rewards.is_empty());
    }

    #[tokio::test]
    async fn repeat_claim_pays_zero() {
        let store = InMemoryStore::default();
        store.add_reward(nft_sale("erin", "2024-W42", 20, 2));

        let first = claim(&store, &"erin".into()).await.unwrap();
        let second = claim(&store, &"erin".into()).await.unwrap();
        assert_eq!(first.claimed_points, 20);
        assert_eq!(second.claimed_points, 0);
    }

    #[tokio::test]
    async fn concurrent_claims_pay_the_total_exactly_once() {
        let store = Arc::new(InMemoryStore::default());
        store.add_reward(contribution("finn", "2024-W41", 12, "acme/widget"));
        store.add_reward(scout_reward("finn", "2024-W42", 8));
        store.add_reward(nft_sale("finn", "2024-W43", 5, 1));

        let (a, b) = tokio::join!(
            tokio::spawn({
                let store = store.clone();
                async move { claim(store.as_ref(), &"finn".into()).await.unwrap() }
            }),
            tokio::spawn({
                let store = store.clone();
                async move { claim(store.as_ref(), &"finn".into()).await.unwrap() }
            }),
        );
        let paid = a.unwrap().claimed_points + b.unwrap().claimed_points;
        assert_eq!(paid, 25);
    }

    #[tokio::test]
    async fn same_kind_events_in_one_week_are_summed() {
        let store = InMemoryStore::default();
        store.add_reward(contribution("gale", "2024-W41", 10, "optimism-labs/optimism"));
        store.add_reward(contribution("gale", "2024-W41", 7, "mento-protocol/mento-sdk"));
        store.add_reward(nft_sale("gale", "2024-W41", 4, 1));
        store.add_reward(nft_sale("gale", "2024-W41", 6, 3));

        let claimable = get_claimable_points(&store, season(), &"gale".into())
            .await
            .unwrap();
        assert_eq!(claimable.weekly_rewards.len(), 1);

        let breakdown = &claimable.weekly_rewards[0];
        let contribution = breakdown.contribution.as_ref().unwrap();
        assert_eq!(contribution.points, 17);
        assert_eq!(contribution.first_contributions, 2);
        assert_eq!(contribution.regular_contributions, 4);
        assert_eq!(contribution.bonus_partners, ["optimism", "celo"]);

        let nft = breakdown.nft_sale.as_ref().unwrap();
        assert_eq!(nft.points, 10);
        assert_eq!(nft.quantity, 4);
        assert_eq!(claimable.total_claimable_points, 27);
    }

    #[tokio::test]
    async fn weeks_come_back_ascending_with_ordinals() {
        let store = InMemoryStore::default();
        store.add_reward(scout_reward("hana", "2025-W02", 1));
        store.add_reward(scout_reward("hana", "2024-W41", 2));
        store.add_reward(scout_reward("hana", "2024-W52", 3));

        let claimable = get_claimable_points(&store, season(), &"hana".into())
            .await
            .unwrap();
        let weeks: Vec<String> = claimable
            .weekly_rewards
            .iter()
            .map(|b| b.week.to_string())
            .collect();
        assert_eq!(weeks, ["2024-W41", "2024-W52", "2025-W02"]);

        let ordinals: Vec<_> = claimable
            .weekly_rewards
            .iter()
            .map(|b| b.week_number)
            .collect();
        assert_eq!(ordinals, [Some(1), Some(12), Some(14)]);
    }

    #[tokio::test]
    async fn unmatched_repos_attach_no_partner() {
        let store = InMemoryStore::default();
        store.add_reward(contribution("ivy", "2024-W41", 9, "unknown/repo"));

        let claimable = get_claimable_points(&store, season(), &"ivy".into())
            .await
            .unwrap();
        let contribution = claimable.weekly_rewards[0].contribution.as_ref().unwrap();
        assert_eq!(contribution.points, 9);
        assert!(contribution.bonus_partners.is_empty());
    }
}
