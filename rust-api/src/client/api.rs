//! HTTP client for the stats/odds backend

use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;

use crate::config::DashboardConfig;
use crate::core::listing::{ALL, MAX_PAGE_SIZE};
use crate::models::{
    DailyReport, GameOddsResponse, GamesResponse, LiveOddsResponse, Player, PlayerStats,
    PlayersResponse, RecommendationsResponse, ReportSlot, StatusResponse, TeamAnalysis,
    TeamsAnalysisResponse, TeamsResponse,
};

/// Client errors
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("{url} returned {status}")]
    Status { status: StatusCode, url: String },

    #[error("Failed to decode response from {url}: {reason}")]
    Decode { url: String, reason: String },

    #[error("Invalid base URL '{0}'")]
    InvalidBaseUrl(String),
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub base_url: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: crate::config::DEFAULT_API_URL.to_string(),
            timeout_secs: 30,
            user_agent: format!("courtside/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl From<&DashboardConfig> for ClientConfig {
    fn from(config: &DashboardConfig) -> Self {
        Self {
            base_url: config.api_base_url.clone(),
            timeout_secs: config.request_timeout_secs,
            ..Default::default()
        }
    }
}

/// Filters accepted by `/api/players`
#[derive(Debug, Clone, Default)]
pub struct PlayerQuery {
    pub team: Option<String>,
    pub position: Option<String>,
    pub active: Option<bool>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
}

impl PlayerQuery {
    fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        // The All sentinel means no filter, so it never goes upstream
        if let Some(team) = self.team.as_ref().filter(|t| t.as_str() != ALL) {
            pairs.push(("team", team.to_uppercase()));
        }
        if let Some(position) = self.position.as_ref().filter(|p| p.as_str() != ALL) {
            pairs.push(("position", position.clone()));
        }
        if let Some(active) = self.active {
            pairs.push(("active", active.to_string()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(order_by) = &self.order_by {
            pairs.push(("order_by", order_by.clone()));
        }
        if let Some(order_dir) = &self.order_dir {
            pairs.push(("order_dir", order_dir.clone()));
        }
        pairs
    }
}

/// Typed client for the backend REST API
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    config: ClientConfig,
}

impl ApiClient {
    /// Create a new client with the given configuration
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        if !(config.base_url.starts_with("http://") || config.base_url.starts_with("https://")) {
            return Err(ClientError::InvalidBaseUrl(config.base_url));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        Ok(Self { client, config })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Join a path onto the base URL
    fn build_url(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.config.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }

    /// GET a JSON document
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, ClientError> {
        let url = self.build_url(path);
        tracing::debug!("GET {}", url);

        let response = self.client.get(&url).query(query).send().await?;
        let status = response.status();
        if !status.is_success() {
            tracing::warn!("Request to {} failed with status {}", url, status);
            return Err(ClientError::Status { status, url });
        }

        let body = response.text().await?;
        decode_body(&url, &body)
    }

    pub async fn health(&self) -> Result<serde_json::Value, ClientError> {
        self.get_json("/health", &[]).await
    }

    pub async fn status(&self) -> Result<StatusResponse, ClientError> {
        self.get_json("/api/status", &[]).await
    }

    pub async fn teams(&self, limit: usize, offset: usize) -> Result<TeamsResponse, ClientError> {
        let query = [("limit", limit.to_string()), ("offset", offset.to_string())];
        self.get_json("/api/teams", &query).await
    }

    pub async fn teams_analysis(&self) -> Result<TeamsAnalysisResponse, ClientError> {
        self.get_json("/api/teams/analysis", &[]).await
    }

    pub async fn team_analysis(&self, abbreviation: &str) -> Result<TeamAnalysis, ClientError> {
        let path = format!("/api/teams/{}/analysis", abbreviation.to_uppercase());
        self.get_json(&path, &[]).await
    }

    pub async fn team_players(&self, abbreviation: &str) -> Result<PlayersResponse, ClientError> {
        let path = format!("/api/teams/{}/players", abbreviation.to_uppercase());
        self.get_json(&path, &[]).await
    }

    pub async fn players(&self, query: &PlayerQuery) -> Result<PlayersResponse, ClientError> {
        self.get_json("/api/players", &query.to_pairs()).await
    }

    /// Walk every page of `/api/players`; `limit`/`offset` on `query` are ignored
    pub async fn all_players(&self, query: &PlayerQuery) -> Result<Vec<Player>, ClientError> {
        let mut players = Vec::new();
        let mut query = PlayerQuery {
            limit: Some(MAX_PAGE_SIZE),
            offset: Some(0),
            ..query.clone()
        };

        loop {
            let page = self.players(&query).await?;
            let fetched = page.players.len();
            players.extend(page.players);

            let complete = page.total.is_some_and(|total| players.len() >= total);
            if fetched < MAX_PAGE_SIZE || complete {
                break;
            }
            query.offset = Some(players.len());
        }

        tracing::debug!("Fetched {} players", players.len());
        Ok(players)
    }

    pub async fn player(&self, player_id: &str) -> Result<Player, ClientError> {
        let path = format!("/api/players/{}", player_id);
        self.get_json(&path, &[]).await
    }

    pub async fn player_stats(
        &self,
        player_id: &str,
        season: &str,
    ) -> Result<PlayerStats, ClientError> {
        let path = format!("/api/players/{}/stats", player_id);
        self.get_json(&path, &[("season", season.to_string())]).await
    }

    pub async fn games_today(&self) -> Result<GamesResponse, ClientError> {
        self.get_json("/api/games/today", &[]).await
    }

    pub async fn live_odds(&self) -> Result<LiveOddsResponse, ClientError> {
        self.get_json("/api/live-odds", &[]).await
    }

    pub async fn game_odds(&self, game_id: &str) -> Result<GameOddsResponse, ClientError> {
        let path = format!("/api/odds/{}", game_id);
        self.get_json(&path, &[]).await
    }

    pub async fn report(&self, slot: ReportSlot) -> Result<DailyReport, ClientError> {
        let path = format!("/api/reports/{}", slot.path_segment());
        self.get_json(&path, &[]).await
    }

    pub async fn betting_recommendations(&self) -> Result<RecommendationsResponse, ClientError> {
        self.get_json("/api/betting-recommendations", &[]).await
    }
}

/// Decode a body, turning the backend's `{"error": ...}` payloads into errors
fn decode_body<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, ClientError> {
    let value: serde_json::Value = serde_json::from_str(body).map_err(|e| ClientError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })?;

    // The backend sometimes answers 200 with [{"error": ...}, 500]
    if let Some(message) = embedded_error(&value) {
        return Err(ClientError::Decode {
            url: url.to_string(),
            reason: message,
        });
    }

    serde_json::from_value(value).map_err(|e| ClientError::Decode {
        url: url.to_string(),
        reason: e.to_string(),
    })
}

fn embedded_error(value: &serde_json::Value) -> Option<String> {
    let object = match value {
        serde_json::Value::Array(items) => items.first()?.as_object()?,
        serde_json::Value::Object(map) => map,
        _ => return None,
    };
    if object.len() != 1 {
        return None;
    }
    object
        .get("error")
        .map(|e| e.as_str().map(str::to_string).unwrap_or_else(|| e.to_string()))
}
