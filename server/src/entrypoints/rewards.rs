use rocket::http::Status;
use rocket::{serde::json::Json, State};

use scout_game_server::db::DB;
use scout_game_server::rewards;

use super::parse_week;
use super::types::{reject, ClaimResponse, ClaimablePointsResponse};

#[utoipa::path(context_path = "/rewards", responses(
    (status = 200, description = "Claimable points with per-week breakdowns", body = ClaimablePointsResponse)
))]
#[get("/<contributor>/claimable?<season>")]
async fn get_claimable(
    db: &State<DB>,
    contributor: String,
    season: String,
) -> Result<Json<ClaimablePointsResponse>, Status> {
    let season = parse_week(&season)?;
    let claimable = rewards::get_claimable_points(db.inner(), season, &contributor)
        .await
        .map_err(reject)?;
    Ok(Json(claimable.into()))
}

#[utoipa::path(context_path = "/rewards", responses(
    (status = 200, description = "Claim every unclaimed reward event", body = ClaimResponse)
))]
#[post("/<contributor>/claim")]
async fn claim(db: &State<DB>, contributor: String) -> Result<Json<ClaimResponse>, Status> {
    let outcome = rewards::claim(db.inner(), &contributor)
        .await
        .map_err(reject)?;
    Ok(Json(outcome.into()))
}

pub fn stage() -> rocket::fairing::AdHoc {
    rocket::fairing::AdHoc::on_ignite("Installing rewards entrypoints", |rocket| async {
        rocket.mount("/rewards", rocket::routes![get_claimable, claim])
    })
}
