use actix_web::{web, HttpResponse, Responder};
use std::sync::Arc;
use tracing::warn;

use crate::AppState;
use courtside::models::HealthResponse;

/// Health check endpoint; also reports whether the backend answers
pub async fn health_check(state: web::Data<Arc<AppState>>) -> impl Responder {
    let upstream = match state.client.health().await {
        Ok(_) => "ok",
        Err(e) => {
            warn!(
                "Backend health check against {} failed: {}",
                state.config.api_base_url, e
            );
            "unreachable"
        }
    };

    let response = HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        upstream: upstream.to_string(),
    };

    HttpResponse::Ok().json(response)
}
