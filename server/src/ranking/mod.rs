use shared::{ContributorId, Season, Week};

use crate::error::{EngineError, EngineResult};
use crate::store::{BuilderQuery, BuilderRow, PageOrder, StatsStore};

/// The closed set of leaderboard orderings.
///
/// `new` lists the most recently created builders, `hot` ranks the current
/// week, `top` ranks the previous week. Each variant owns its cursor shape
/// and resume predicate; adding a strategy means extending this enum and the
/// dispatch below, nothing else.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    serde::Serialize,
    serde::Deserialize,
    strum::EnumString,
    strum::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum BuildersSort {
    New,
    Hot,
    Top,
}

#[derive(Debug, Clone, Copy)]
pub struct Window {
    pub week: Week,
    pub season: Season,
}

/// Keyset cursor: the last emitted row's identity plus, for rank-ordered
/// strategies, its rank. `contributor_id` is always present so equal ranks
/// still resume under a total order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompositeCursor {
    pub contributor_id: ContributorId,
    pub rank: Option<i64>,
}

/// One leaderboard row with the defaulting policy already applied: a missing
/// stat row reads as zero, a missing NFT as no image/price.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuilderSummary {
    pub id: ContributorId,
    pub display_name: String,
    pub rank: Option<i64>,
    pub gems_collected: i64,
    pub nfts_sold: i64,
    pub builder_points: i64,
    pub nft_image_url: Option<String>,
    pub nft_current_price: Option<i64>,
    pub scouted_by: i64,
}

impl From<BuilderRow> for BuilderSummary {
    fn from(row: BuilderRow) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            rank: row.rank,
            gems_collected: row.gems_collected.unwrap_or_default(),
            nfts_sold: row.nfts_sold.unwrap_or_default(),
            builder_points: row.builder_points.unwrap_or_default(),
            nft_image_url: row.nft_image_url,
            nft_current_price: row.nft_current_price,
            scouted_by: row.scouted_by.unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct BuildersPage {
    pub builders: Vec<BuilderSummary>,
    /// `None` signals the end of results.
    pub next_cursor: Option<CompositeCursor>,
}

/// Returns one page of ranked builder summaries and the cursor to resume
/// from, or `InvalidArgument` before any store call when the limit or cursor
/// shape is off.
pub async fn rank<S: StatsStore + ?Sized>(
    store: &S,
    sort: BuildersSort,
    window: Window,
    limit: u32,
    cursor: Option<CompositeCursor>,
) -> EngineResult<BuildersPage> {
    if limit == 0 {
        return Err(EngineError::invalid("page limit must be positive"));
    }

    let order = match sort {
        BuildersSort::New => PageOrder::Newest {
            after: match cursor {
                None => None,
                Some(CompositeCursor {
                    rank: Some(_), ..
                }) => {
                    return Err(EngineError::invalid(
                        "cursor for the 'new' strategy must not carry a rank",
                    ))
                }
                Some(CompositeCursor {
                    contributor_id,
                    rank: None,
                }) => Some(contributor_id),
            },
        },
        BuildersSort::Hot => by_rank_order(window.week, cursor)?,
        BuildersSort::Top => match window.week.previous() {
            Some(previous) => by_rank_order(previous, cursor)?,
            // Season opener: there is no previous week to rank by.
            None => return Ok(BuildersPage::default()),
        },
    };

    let query = BuilderQuery {
        order,
        stats_week: window.week,
        season: window.season,
        limit,
    };
    let rows = store.eligible_builders(&query).await?;

    let next_cursor = if rows.len() == limit as usize {
        rows.last().map(|last| CompositeCursor {
            contributor_id: last.id.clone(),
            rank: last.rank,
        })
    } else {
        None
    };

    Ok(BuildersPage {
        builders: rows.into_iter().map(Into::into).collect(),
        next_cursor,
    })
}

fn by_rank_order(rank_week: Week, cursor: Option<CompositeCursor>) -> EngineResult<PageOrder> {
    let after = match cursor {
        None => None,
        Some(CompositeCursor {
            contributor_id,
            rank: Some(rank),
        }) => Some((rank, contributor_id)),
        Some(CompositeCursor { rank: None, .. }) => {
            return Err(EngineError::invalid(
                "cursor for a rank-ordered strategy must carry the last row's rank",
            ))
        }
    };
    Ok(PageOrder::ByRank { rank_week, after })
}
