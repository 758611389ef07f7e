use actix_web::{web, HttpResponse};

use courtside::core::kelly::{KellyCalculator, KellyInput};
use courtside::display::format_stake;
use courtside::error::{validate_bankroll, AppError};
use courtside::models::{KellyQuery, KellyResponse};

/// Bankroll used when the request does not name one
pub const DEFAULT_BANKROLL: f64 = 1_000.0;

/// Quarter-Kelly stake for one bet
pub async fn calculate_kelly(query: web::Query<KellyQuery>) -> Result<HttpResponse, AppError> {
    let bankroll = query.bankroll.unwrap_or(DEFAULT_BANKROLL);
    validate_bankroll(bankroll)?;

    let input = KellyInput::parse(&query.probability, &query.odds, query.format)?;
    let sizing = KellyCalculator::new(bankroll)?.calculate(&input)?;

    let response = KellyResponse {
        recommended_stake: format_stake(&sizing),
        sizing,
        bankroll,
    };

    Ok(HttpResponse::Ok().json(response))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::query_config;
    use actix_web::http::StatusCode;
    use actix_web::{test, App};
    use courtside::core::kelly::Recommendation;
    use courtside::models::ErrorResponse;

    macro_rules! kelly_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(query_config())
                    .route("/api/kelly", web::get().to(calculate_kelly)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_decimal_odds_stake() {
        let app = kelly_app!();
        let req = test::TestRequest::get()
            .uri("/api/kelly?probability=0.6&odds=2.0&format=decimal&bankroll=1000")
            .to_request();
        let body: KellyResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.sizing.recommendation, Recommendation::Bet);
        assert!((body.sizing.kelly_fraction - 0.2).abs() < 1e-9);
        assert!((body.sizing.stake_amount - 50.0).abs() < 1e-9);
        assert!((body.bankroll - 1000.0).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn test_american_odds_default_format() {
        let app = kelly_app!();
        let req = test::TestRequest::get()
            .uri("/api/kelly?probability=0.55&odds=%2B150")
            .to_request();
        let body: KellyResponse = test::call_and_read_body_json(&app, req).await;

        assert!((body.sizing.decimal_odds - 2.5).abs() < 1e-9);
        assert!(body.sizing.is_bet());
        assert!((body.bankroll - DEFAULT_BANKROLL).abs() < 1e-9);
    }

    #[actix_web::test]
    async fn test_negative_expectation_is_not_an_error() {
        let app = kelly_app!();
        let req = test::TestRequest::get()
            .uri("/api/kelly?probability=0.4&odds=-110")
            .to_request();
        let body: KellyResponse = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body.sizing.recommendation, Recommendation::NegativeExpectation);
        assert_eq!(body.sizing.stake_amount, 0.0);
    }

    #[actix_web::test]
    async fn test_invalid_probability_is_400() {
        let app = kelly_app!();
        let req = test::TestRequest::get()
            .uri("/api/kelly?probability=1.5&odds=2.0&format=decimal")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "validation_error");
    }

    #[actix_web::test]
    async fn test_missing_odds_is_400() {
        let app = kelly_app!();
        let req = test::TestRequest::get()
            .uri("/api/kelly?probability=0.5")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "validation_error");
    }

    #[actix_web::test]
    async fn test_negative_bankroll_is_400() {
        let app = kelly_app!();
        let req = test::TestRequest::get()
            .uri("/api/kelly?probability=0.6&odds=2.0&format=decimal&bankroll=-5")
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }
}
