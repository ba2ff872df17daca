use rocket::fairing::AdHoc;
use rocket::http::Status;
use shared::Week;

use scout_game_server::error::EngineError;

pub mod leaderboard;
pub mod rewards;
pub mod types;

pub(crate) fn parse_week(value: &str) -> Result<Week, Status> {
    value
        .parse()
        .map_err(|_| types::reject(EngineError::invalid(format!("malformed week {value:?}"))))
}

pub fn stage() -> AdHoc {
    AdHoc::on_ignite("Installing entrypoints", |rocket| async {
        rocket
            .attach(leaderboard::stage())
            .attach(rewards::stage())
    })
}
