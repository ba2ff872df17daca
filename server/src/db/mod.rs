use async_trait::async_trait;
use rocket::{
    fairing::{self, AdHoc},
    Build, Rocket,
};
use rocket_db_pools::Database;
use shared::{ContributorId, RewardEvent, Week};
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::store::{BuilderQuery, BuilderRow, PageOrder, StatsStore, StoreError};

pub mod types;

use types::{BuilderRowRecord, RewardEventRecord, WeeklyRankRecord};

#[derive(Database, Clone, Debug)]
#[database("scout-game")]
pub struct DB(PgPool);

/// Columns shared by both page queries; `rank` and the gems source differ
/// per ordering and are selected by the builders below.
const SUMMARY_COLUMNS: &str = r#"
    ss.nfts_sold, ats.points_earned AS builder_points,
    n.image_url AS nft_image_url, n.current_price AS nft_current_price,
    (SELECT COUNT(DISTINCT e.scout_id)
     FROM nft_sale_events e
     WHERE e.nft_id = n.id) AS scouted_by
"#;

impl DB {
    fn pool(&self) -> &PgPool {
        &self.0
    }

    fn newest_query(
        query: &BuilderQuery,
        after: &Option<ContributorId>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut sql = QueryBuilder::new("SELECT s.id, s.display_name, NULL::bigint AS rank, w.gems_collected, ");
        sql.push(SUMMARY_COLUMNS);
        sql.push(" FROM scouts s JOIN builder_nfts n ON n.builder_id = s.id AND n.season = ");
        sql.push_bind(query.season.to_string());
        sql.push(" LEFT JOIN weekly_stats w ON w.builder_id = s.id AND w.week = ");
        sql.push_bind(query.stats_week.to_string());
        sql.push(" LEFT JOIN season_stats ss ON ss.builder_id = s.id AND ss.season = ");
        sql.push_bind(query.season.to_string());
        sql.push(" LEFT JOIN all_time_stats ats ON ats.builder_id = s.id");
        sql.push(" WHERE s.builder_status = 'approved'");
        if let Some(after) = after {
            // Compound keyset predicate: everything at or before the cursor
            // row in the (created_at, id) descending order is excluded. A
            // vanished cursor row compares against NULL and yields an empty
            // page.
            sql.push(" AND (s.created_at, s.id) < (SELECT c.created_at, c.id FROM scouts c WHERE c.id = ");
            sql.push_bind(after.clone());
            sql.push(")");
        }
        sql.push(" ORDER BY s.created_at DESC, s.id DESC LIMIT ");
        sql.push_bind(query.limit as i64);
        sql
    }

    fn by_rank_query(
        query: &BuilderQuery,
        rank_week: &Week,
        after: &Option<(i64, ContributorId)>,
    ) -> QueryBuilder<'static, Postgres> {
        let mut sql = QueryBuilder::new("SELECT s.id, s.display_name, w.rank, cw.gems_collected, ");
        sql.push(SUMMARY_COLUMNS);
        sql.push(" FROM weekly_stats w JOIN scouts s ON s.id = w.builder_id");
        sql.push(" JOIN builder_nfts n ON n.builder_id = s.id AND n.season = ");
        sql.push_bind(query.season.to_string());
        sql.push(" LEFT JOIN weekly_stats cw ON cw.builder_id = s.id AND cw.week = ");
        sql.push_bind(query.stats_week.to_string());
        sql.push(" LEFT JOIN season_stats ss ON ss.builder_id = s.id AND ss.season = ");
        sql.push_bind(query.season.to_string());
        sql.push(" LEFT JOIN all_time_stats ats ON ats.builder_id = s.id");
        sql.push(" WHERE w.week = ");
        sql.push_bind(rank_week.to_string());
        sql.push(" AND w.rank IS NOT NULL AND s.builder_status = 'approved'");
        if let Some((rank, id)) = after {
            // Equal ranks resume through the id tie break, so the order
            // stays total even if upstream ever assigns duplicates.
            sql.push(" AND (w.rank, s.id) > (");
            sql.push_bind(*rank);
            sql.push(", ");
            sql.push_bind(id.clone());
            sql.push(")");
        }
        sql.push(" ORDER BY w.rank ASC, s.id ASC LIMIT ");
        sql.push_bind(query.limit as i64);
        sql
    }
}

fn store_error(err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::PoolTimedOut => StoreError::Cancelled,
        err => StoreError::Unavailable(err.into()),
    }
}

#[async_trait]
impl StatsStore for DB {
    async fn eligible_builders(&self, query: &BuilderQuery) -> Result<Vec<BuilderRow>, StoreError> {
        let records: Vec<BuilderRowRecord> = match &query.order {
            PageOrder::Newest { after } => {
                Self::newest_query(query, after)
                    .build_query_as()
                    .fetch_all(self.pool())
                    .await
            }
            PageOrder::ByRank { rank_week, after } => {
                Self::by_rank_query(query, rank_week, after)
                    .build_query_as()
                    .fetch_all(self.pool())
                    .await
            }
        }
        .map_err(store_error)?;

        Ok(records.into_iter().map(Into::into).collect())
    }

    async fn unclaimed_rewards(
        &self,
        contributor: &ContributorId,
    ) -> Result<Vec<RewardEvent>, StoreError> {
        let records = sqlx::query_as::<_, RewardEventRecord>(
            r#"
            SELECT recipient_id, week, kind, points, streak_count,
                   first_contributions, regular_contributions, repo, quantity
            FROM reward_events
            WHERE recipient_id = $1 AND claimed_at IS NULL
            ORDER BY week, id
            "#,
        )
        .bind(contributor)
        .fetch_all(self.pool())
        .await
        .map_err(store_error)?;

        records
            .into_iter()
            .map(|record| record.try_into().map_err(StoreError::Unavailable))
            .collect()
    }

    async fn weekly_ranks(
        &self,
        contributor: &ContributorId,
        weeks: &[Week],
    ) -> Result<Vec<(Week, Option<i64>)>, StoreError> {
        let week_strings: Vec<String> = weeks.iter().map(Week::to_string).collect();
        let records = sqlx::query_as::<_, WeeklyRankRecord>(
            r#"
            SELECT week, rank
            FROM weekly_stats
            WHERE builder_id = $1 AND week = ANY($2)
            "#,
        )
        .bind(contributor)
        .bind(&week_strings)
        .fetch_all(self.pool())
        .await
        .map_err(store_error)?;

        records
            .into_iter()
            .map(|record| {
                record
                    .week
                    .parse::<Week>()
                    .map(|week| (week, record.rank))
                    .map_err(|e| StoreError::Unavailable(e.into()))
            })
            .collect()
    }

    async fn claim_unclaimed(
        &self,
        contributor: &ContributorId,
    ) -> Result<Vec<RewardEvent>, StoreError> {
        // Single-statement transition: every row still unclaimed flips
        // together and comes back, so concurrent claims serialize on the row
        // locks and the loser transitions nothing.
        let records = sqlx::query_as::<_, RewardEventRecord>(
            r#"
            UPDATE reward_events
            SET claimed_at = now()
            WHERE recipient_id = $1 AND claimed_at IS NULL
            RETURNING recipient_id, week, kind, points, streak_count,
                      first_contributions, regular_contributions, repo, quantity
            "#,
        )
        .bind(contributor)
        .fetch_all(self.pool())
        .await
        .map_err(store_error)?;

        records
            .into_iter()
            .map(|record| record.try_into().map_err(StoreError::Unavailable))
            .collect()
    }
}

async fn run_migrations(rocket: Rocket<Build>) -> fairing::Result {
    match DB::fetch(&rocket) {
        Some(db) => match sqlx::migrate!("./migrations").run(&**db).await {
            Ok(_) => Ok(rocket),
            Err(e) => {
                rocket::error!("Failed to initialize SQLx database: {}", e);
                Err(rocket)
            }
        },
        None => Err(rocket),
    }
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("SQLx Stage", |rocket| async {
        rocket
            .attach(DB::init())
            .attach(AdHoc::try_on_ignite("SQLx Migrations", run_migrations))
    })
}
