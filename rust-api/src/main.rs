use actix_web::{middleware, web, App, HttpServer};
use anyhow::Context;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

mod handlers;

use courtside::client::{ApiClient, ClientConfig};
use courtside::config::DashboardConfig;
use handlers::{health, json_config, kelly, odds, players, query_config, teams};

/// Application state shared across handlers
pub struct AppState {
    pub client: ApiClient,
    pub config: DashboardConfig,
}

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = DashboardConfig::from_env().context("Failed to read configuration")?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(config.log_level)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("Failed to set subscriber")?;

    let client = ApiClient::new(ClientConfig::from(&config)).context("Failed to build API client")?;
    info!("Using stats/odds backend at {}", client.base_url());

    let addr = config.bind_addr();
    let app_state = Arc::new(AppState { client, config });

    info!("Starting Courtside API server at http://{}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(app_state.clone()))
            .app_data(query_config())
            .app_data(json_config())
            .wrap(middleware::Logger::default())
            .route("/health", web::get().to(health::health_check))
            .route("/api/kelly", web::get().to(kelly::calculate_kelly))
            .route("/api/consensus", web::post().to(odds::consensus))
            .route("/api/live-odds", web::get().to(odds::live_odds))
            .route("/api/teams", web::get().to(teams::list_teams))
            .route("/api/teams/analysis", web::get().to(teams::list_team_analysis))
            .route("/api/players", web::get().to(players::list_players))
    })
    .bind(&addr)
    .with_context(|| format!("Failed to bind {}", addr))?
    .run()
    .await
    .context("Server error")
}

/// State pointing at a backend that refuses connections
#[cfg(test)]
pub(crate) fn test_state() -> Arc<AppState> {
    let config = DashboardConfig {
        api_base_url: "http://127.0.0.1:9".to_string(),
        request_timeout_secs: 2,
        ..Default::default()
    };
    let client = ApiClient::new(ClientConfig::from(&config)).unwrap();
    Arc::new(AppState { client, config })
}
