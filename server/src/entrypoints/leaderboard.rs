use chrono::Utc;
use rocket::http::Status;
use rocket::{serde::json::Json, State};
use shared::Week;

use scout_game_server::db::DB;
use scout_game_server::error::EngineError;
use scout_game_server::ranking::{self, BuildersSort, CompositeCursor, Window};

use super::parse_week;
use super::types::{reject, BuildersPageResponse};

#[utoipa::path(context_path = "/leaderboard", responses(
    (status = 200, description = "Get one page of ranked builders", body = BuildersPageResponse)
))]
#[get("/builders?<season>&<sort>&<week>&<limit>&<cursor_id>&<cursor_rank>")]
async fn get_builders(
    db: &State<DB>,
    season: String,
    sort: Option<String>,
    week: Option<String>,
    limit: Option<u32>,
    cursor_id: Option<String>,
    cursor_rank: Option<i64>,
) -> Result<Json<BuildersPageResponse>, Status> {
    let sort: BuildersSort = sort
        .as_deref()
        .unwrap_or("hot")
        .parse()
        .map_err(|_| reject(EngineError::invalid("unrecognized sort strategy")))?;
    let season = parse_week(&season)?;
    let week = match week {
        Some(week) => parse_week(&week)?,
        None => Week::from_date(Utc::now().date_naive()),
    };
    let cursor = match (cursor_id, cursor_rank) {
        (Some(contributor_id), rank) => Some(CompositeCursor {
            contributor_id,
            rank,
        }),
        (None, Some(_)) => {
            return Err(reject(EngineError::invalid(
                "cursor_rank given without cursor_id",
            )))
        }
        (None, None) => None,
    };

    let window = Window { week, season };
    let page = ranking::rank(db.inner(), sort, window, limit.unwrap_or(50), cursor)
        .await
        .map_err(reject)?;
    Ok(Json(page.into()))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing leaderboard entrypoints", |rocket| async {
        rocket.mount("/leaderboard", rocket::routes![get_builders])
    })
}
