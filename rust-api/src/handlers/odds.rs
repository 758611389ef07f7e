use actix_web::{web, HttpResponse};
use chrono::Utc;
use std::sync::Arc;
use tracing::info;

use crate::AppState;
use courtside::core::consensus::{best_moneyline, calculate_consensus};
use courtside::error::AppError;
use courtside::models::{BookmakerQuote, GameConsensus, LiveOddsResponse, LiveOddsView};

/// Consensus over a caller-supplied list of quotes
pub async fn consensus(quotes: web::Json<Vec<BookmakerQuote>>) -> HttpResponse {
    HttpResponse::Ok().json(calculate_consensus(&quotes))
}

/// Upstream live odds, each game annotated with consensus and best prices
pub async fn live_odds(state: web::Data<Arc<AppState>>) -> Result<HttpResponse, AppError> {
    let upstream = state.client.live_odds().await?;
    let view = annotate(upstream);
    info!("Serving live odds for {} games", view.count);

    Ok(HttpResponse::Ok().json(view))
}

fn annotate(response: LiveOddsResponse) -> LiveOddsView {
    let games: Vec<GameConsensus> = response
        .games
        .into_iter()
        .map(|game| GameConsensus {
            consensus: calculate_consensus(&game.bookmakers),
            best_moneyline: best_moneyline(&game.bookmakers),
            game,
        })
        .collect();

    LiveOddsView {
        count: games.len(),
        games,
        timestamp: response
            .timestamp
            .unwrap_or_else(|| Utc::now().to_rfc3339()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::json_config;
    use crate::test_state;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use courtside::core::consensus::OddsConsensus;
    use courtside::models::ErrorResponse;

    #[actix_web::test]
    async fn test_consensus_endpoint() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/api/consensus", web::post().to(consensus)),
        )
        .await;

        let quotes = serde_json::json!([
            {"name": "A", "spread": {"line": -2.5}, "moneyline": {"home": -120, "away": 100}},
            {"name": "B", "spread": {"line": -3}, "moneyline": {"home": "N/A", "away": 105}},
            {"name": "C", "spread": {"line": -2}}
        ]);
        let req = test::TestRequest::post()
            .uri("/api/consensus")
            .set_json(&quotes)
            .to_request();
        let body: OddsConsensus = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.bookmakers, 3);
        assert_eq!(body.spread.average, Some(-2.5));
        let range = body.spread.range.unwrap();
        assert_eq!((range.min, range.max), (-3.0, -2.0));
        assert_eq!(body.moneyline_home.average, Some(-120.0));
        assert_eq!(body.moneyline_home.count, 1);
        assert!(body.total.average.is_none());
    }

    #[actix_web::test]
    async fn test_consensus_rejects_malformed_body() {
        let app = test::init_service(
            App::new()
                .app_data(json_config())
                .route("/api/consensus", web::post().to(consensus)),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/api/consensus")
            .insert_header(("content-type", "application/json"))
            .set_payload("{not json")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_live_odds_unreachable_backend_is_502() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(test_state()))
                .route("/api/live-odds", web::get().to(live_odds)),
        )
        .await;

        let req = test::TestRequest::get().uri("/api/live-odds").to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "upstream_error");
    }

    #[::core::prelude::v1::test]
    fn test_annotate_games() {
        let upstream: LiveOddsResponse = serde_json::from_value(serde_json::json!({
            "games": [{
                "gameId": 7,
                "homeTeam": "Chicago Bulls",
                "awayTeam": "Boston Celtics",
                "bookmakers": [
                    {"name": "DraftKings", "moneyline": {"home": 120, "away": -140}},
                    {"name": "FanDuel", "moneyline": {"home": 125, "away": -135}}
                ]
            }, {
                "gameId": "g2",
                "homeTeam": "Miami Heat",
                "awayTeam": "Denver Nuggets"
            }],
            "timestamp": "2024-01-15T12:00:00Z"
        }))
        .unwrap();

        let view = annotate(upstream);
        assert_eq!(view.count, 2);
        assert_eq!(view.timestamp, "2024-01-15T12:00:00Z");

        let first = &view.games[0];
        assert_eq!(first.game.game_id, "7");
        let home = first.best_moneyline.home.as_ref().unwrap();
        assert_eq!(home.bookmaker, "FanDuel");
        assert_eq!(home.price, 125.0);
        assert_eq!(first.consensus.moneyline_away.average, Some(-137.5));

        let empty = &view.games[1];
        assert_eq!(empty.consensus.bookmakers, 0);
        assert!(empty.consensus.spread.average.is_none());
        assert!(empty.best_moneyline.home.is_none());
    }
}
