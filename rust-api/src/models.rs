use serde::{Deserialize, Serialize};

use crate::core::consensus::{BestMoneyline, OddsConsensus};
use crate::core::kelly::{BetSizing, OddsFormat};

/// NBA team as served by `/api/teams`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Team {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub abbreviation: String,
    #[serde(default)]
    pub full_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub conference: Option<String>,
    #[serde(default)]
    pub division: Option<String>,
}

/// Player record from `/api/players`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub position: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub jersey_number: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub height: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub weight: Option<String>,
    #[serde(default)]
    pub team_abbreviation: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub team_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub season_year: Option<String>,
}

fn default_true() -> bool {
    true
}

/// Season averages from `/api/players/{id}/stats`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlayerStats {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub player_id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub season: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub games_played: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub ppg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub rpg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub apg: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub fg_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub three_point_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub ft_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub steals: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub blocks: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub turnovers: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub minutes_per_game: Option<String>,
}

/// Season record block of a team analysis
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamSeasonStats {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub wins: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub losses: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub win_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub points_per_game: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub points_allowed: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub offensive_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub defensive_rating: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub net_rating: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentForm {
    #[serde(default)]
    pub last_10: Option<String>,
    #[serde(default)]
    pub last_5: Option<String>,
    #[serde(default)]
    pub home_record: Option<String>,
    #[serde(default)]
    pub away_record: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TeamBettingStats {
    #[serde(default)]
    pub ats_record: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub ats_percentage: Option<f64>,
    #[serde(default)]
    pub over_under: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub ou_percentage: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub avg_total: Option<f64>,
}

/// Team plus derived analysis blocks from `/api/teams/analysis`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamAnalysis {
    #[serde(flatten)]
    pub team: Team,
    #[serde(default)]
    pub season_stats: Option<TeamSeasonStats>,
    #[serde(default)]
    pub recent_form: Option<RecentForm>,
    #[serde(default)]
    pub betting_stats: Option<TeamBettingStats>,
    #[serde(default)]
    pub key_players: Vec<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub strength_rating: Option<f64>,
}

/// Scheduled or finished game
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    #[serde(deserialize_with = "lenient::id")]
    pub id: String,
    pub home_team: String,
    #[serde(default)]
    pub home_team_abbreviation: Option<String>,
    pub away_team: String,
    #[serde(default)]
    pub away_team_abbreviation: Option<String>,
    #[serde(default)]
    pub commence_time: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub home_team_score: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub visitor_team_score: Option<f64>,
}

/// Moneyline prices (American)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MoneylineQuote {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub home: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub away: Option<f64>,
}

/// Point spread, line is from the home side
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SpreadQuote {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub line: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub home: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub away: Option<f64>,
}

/// Game total (over/under)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TotalQuote {
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub line: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub over: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub under: Option<f64>,
}

/// One bookmaker's quotes for a game
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookmakerQuote {
    pub name: String,
    #[serde(default)]
    pub moneyline: Option<MoneylineQuote>,
    #[serde(default)]
    pub spread: Option<SpreadQuote>,
    #[serde(default)]
    pub total: Option<TotalQuote>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineMovement {
    #[serde(rename = "type")]
    pub market: String,
    #[serde(default)]
    pub direction: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub from: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub to: Option<f64>,
    #[serde(default)]
    pub time: Option<String>,
}

/// Game with quotes from several bookmakers (`/api/live-odds`)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveOddsGame {
    #[serde(deserialize_with = "lenient::id")]
    pub game_id: String,
    pub home_team: String,
    pub away_team: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub bookmakers: Vec<BookmakerQuote>,
    #[serde(default)]
    pub movements: Vec<LineMovement>,
}

/// Raw odds row from `/api/odds/{game_id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsRow {
    #[serde(default, deserialize_with = "lenient::opt_string")]
    pub game_id: Option<String>,
    #[serde(default)]
    pub bookmaker_key: Option<String>,
    #[serde(default)]
    pub bookmaker_title: Option<String>,
    #[serde(default)]
    pub market_type: Option<String>,
    #[serde(default)]
    pub team: Option<String>,
    #[serde(default)]
    pub outcome_name: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub price: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub point: Option<f64>,
}

/// Scheduled daily report slots
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportSlot {
    /// 7:50 AM, previous-day analysis
    #[serde(rename = "750am")]
    PreviousDay,
    /// 8:00 AM, morning summary
    #[serde(rename = "800am")]
    Morning,
    /// 11:00 AM, game-day scouting
    #[serde(rename = "1100am")]
    GameDay,
}

impl ReportSlot {
    pub fn path_segment(&self) -> &'static str {
        match self {
            ReportSlot::PreviousDay => "750am",
            ReportSlot::Morning => "800am",
            ReportSlot::GameDay => "1100am",
        }
    }
}

impl std::str::FromStr for ReportSlot {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "750am" | "750" | "previous-day" => Ok(ReportSlot::PreviousDay),
            "800am" | "800" | "morning" => Ok(ReportSlot::Morning),
            "1100am" | "1100" | "gameday" | "game-day" => Ok(ReportSlot::GameDay),
            other => Err(format!("unknown report slot '{}'", other)),
        }
    }
}

/// Daily report; slot-specific fields are kept as opaque JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyReport {
    pub report_type: String,
    #[serde(default)]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(flatten)]
    pub details: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecommendationLeg {
    pub game: String,
    pub bet: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BettingRecommendation {
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    pub title: String,
    #[serde(default)]
    pub legs: Vec<RecommendationLeg>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub total_odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub stake: Option<f64>,
    #[serde(default)]
    pub risk: Option<String>,
    #[serde(default)]
    pub reasoning: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueBet {
    pub game: String,
    pub bet: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub bookmaker_odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub fair_odds: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub edge: Option<f64>,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub confidence: Option<f64>,
}

// Upstream envelopes

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsResponse {
    #[serde(default)]
    pub teams: Vec<Team>,
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamsAnalysisResponse {
    #[serde(default)]
    pub teams: Vec<TeamAnalysis>,
    #[serde(default)]
    pub count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayersResponse {
    #[serde(default)]
    pub players: Vec<Player>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub total: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
    #[serde(default)]
    pub offset: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GamesResponse {
    #[serde(default)]
    pub games: Vec<Game>,
    #[serde(default)]
    pub source: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LiveOddsResponse {
    #[serde(default)]
    pub games: Vec<LiveOddsGame>,
    #[serde(default)]
    pub count: Option<usize>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameOddsResponse {
    #[serde(default)]
    pub odds: Vec<OddsRow>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendationsResponse {
    #[serde(default)]
    pub recommendations: Vec<BettingRecommendation>,
    #[serde(default)]
    pub value_bets: Vec<ValueBet>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    #[serde(default, deserialize_with = "lenient::opt_f64")]
    pub scrape_interval_hours: Option<f64>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

// Served by this crate's HTTP binary

/// Kelly calculator query
#[derive(Debug, Deserialize)]
pub struct KellyQuery {
    pub probability: String,
    pub odds: String,
    #[serde(default)]
    pub format: OddsFormat,
    #[serde(default)]
    pub bankroll: Option<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct KellyResponse {
    #[serde(flatten)]
    pub sizing: BetSizing,
    pub bankroll: f64,
    pub recommended_stake: String,
}

/// Live odds game annotated with cross-book summaries
#[derive(Debug, Serialize, Deserialize)]
pub struct GameConsensus {
    #[serde(flatten)]
    pub game: LiveOddsGame,
    pub consensus: OddsConsensus,
    pub best_moneyline: BestMoneyline,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LiveOddsView {
    pub games: Vec<GameConsensus>,
    pub count: usize,
    pub timestamp: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub upstream: String,
}

/// Error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

/// Deserializers that turn loosely typed JSON into "present or absent"
mod lenient {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    pub fn opt_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(number_of))
    }

    pub fn opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(string_of))
    }

    pub fn id<'de, D>(deserializer: D) -> Result<String, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        string_of(&value).ok_or_else(|| serde::de::Error::custom("expected string or number id"))
    }

    fn number_of(value: &Value) -> Option<f64> {
        let n = match value {
            Value::Number(n) => n.as_f64()?,
            Value::String(s) => s.trim().parse::<f64>().ok()?,
            _ => return None,
        };
        n.is_finite().then_some(n)
    }

    fn string_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bookmaker_quote_missing_fields() {
        let json = r#"{"name": "DraftKings", "spread": {"line": -2.5}}"#;
        let quote: BookmakerQuote = serde_json::from_str(json).unwrap();

        assert_eq!(quote.name, "DraftKings");
        assert!(quote.moneyline.is_none());
        assert!(quote.total.is_none());
        let spread = quote.spread.unwrap();
        assert_eq!(spread.line, Some(-2.5));
        assert_eq!(spread.home, None);
    }

    #[test]
    fn test_bookmaker_quote_non_numeric_is_absent() {
        let json = r#"{
            "name": "FanDuel",
            "moneyline": {"home": "pk", "away": null},
            "total": {"line": "226.5", "over": -110}
        }"#;
        let quote: BookmakerQuote = serde_json::from_str(json).unwrap();

        let ml = quote.moneyline.unwrap();
        assert_eq!(ml.home, None);
        assert_eq!(ml.away, None);
        let total = quote.total.unwrap();
        assert_eq!(total.line, Some(226.5));
        assert_eq!(total.over, Some(-110.0));
    }

    #[test]
    fn test_live_odds_game_camel_case() {
        let json = r#"{
            "gameId": 42,
            "homeTeam": "Chicago Bulls",
            "awayTeam": "Los Angeles Lakers",
            "startTime": "2025-01-10T01:00:00Z",
            "bookmakers": [{"name": "DraftKings", "moneyline": {"home": -120, "away": 100}}],
            "movements": [{"type": "spread", "direction": "up", "from": -1.5, "to": -2.5, "time": "2 min ago"}]
        }"#;
        let game: LiveOddsGame = serde_json::from_str(json).unwrap();
        assert_eq!(game.game_id, "42");
        assert_eq!(game.bookmakers.len(), 1);
        assert_eq!(game.movements[0].market, "spread");
    }

    #[test]
    fn test_player_defaults() {
        let json = r#"{"id": 7, "name": "Coby White", "jersey_number": 0}"#;
        let player: Player = serde_json::from_str(json).unwrap();
        assert_eq!(player.id, "7");
        assert_eq!(player.jersey_number.as_deref(), Some("0"));
        assert!(player.is_active);
        assert!(player.team_abbreviation.is_none());
    }

    #[test]
    fn test_team_analysis_flattened() {
        let json = r#"{
            "id": "5",
            "abbreviation": "CHI",
            "full_name": "Chicago Bulls",
            "conference": "Eastern",
            "season_stats": {"wins": 30, "losses": 20, "win_percentage": 0.6}
        }"#;
        let analysis: TeamAnalysis = serde_json::from_str(json).unwrap();
        assert_eq!(analysis.team.abbreviation, "CHI");
        let stats = analysis.season_stats.unwrap();
        assert_eq!(stats.win_percentage, Some(0.6));
        assert_eq!(stats.net_rating, None);
    }

    #[test]
    fn test_daily_report_keeps_details() {
        let json = r#"{"report_type": "800am_morning", "yesterday_games": 9, "notes": "x"}"#;
        let report: DailyReport = serde_json::from_str(json).unwrap();
        assert_eq!(report.report_type, "800am_morning");
        assert_eq!(report.details["yesterday_games"], 9);
    }

    #[test]
    fn test_report_slot_parse() {
        assert_eq!("750am".parse::<ReportSlot>(), Ok(ReportSlot::PreviousDay));
        assert_eq!("morning".parse::<ReportSlot>(), Ok(ReportSlot::Morning));
        assert_eq!(ReportSlot::GameDay.path_segment(), "1100am");
        assert!("noon".parse::<ReportSlot>().is_err());
    }
}
