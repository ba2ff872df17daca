#[macro_use]
extern crate rocket;

mod entrypoints;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::EnvFilter;

use scout_game_server::db;

#[derive(Debug, serde::Deserialize)]
pub struct Env {
    database_url: Option<String>,
}

#[launch]
async fn rocket() -> _ {
    dotenv::dotenv().ok();

    let subscriber = tracing_subscriber::registry()
        .with(EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer().pretty());
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    let env = envy::from_env::<Env>().expect("Failed to load environment variables");
    let mut figment = rocket::Config::figment();
    if let Some(url) = env.database_url {
        figment = figment.merge(("databases.scout-game.url", url));
    }

    rocket::custom(figment)
        .attach(db::stage())
        .attach(entrypoints::stage())
}
