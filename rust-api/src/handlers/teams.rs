use actix_web::{web, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use courtside::core::listing::{
    parse_ordering, ListQuery, Listable, SortKey, MAX_PAGE_SIZE, TEAM_ANALYSIS_COLUMNS,
    TEAM_COLUMNS, TEAM_SEARCH_FIELDS,
};
use courtside::error::AppError;
use courtside::models::{TeamAnalysis, TeamsAnalysisResponse, TeamsResponse};

/// Query parameters for the team list and team analysis views
#[derive(Debug, Default, Deserialize)]
pub struct TeamListParams {
    pub search: Option<String>,
    pub conference: Option<String>,
    pub division: Option<String>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
}

impl TeamListParams {
    fn to_list_query(&self, sort: Vec<SortKey>) -> ListQuery {
        let mut query = ListQuery::new();
        if let Some(search) = &self.search {
            query = query.search(search.as_str(), TEAM_SEARCH_FIELDS);
        }
        if let Some(conference) = &self.conference {
            query = query.filter("conference", conference.as_str());
        }
        if let Some(division) = &self.division {
            query = query.filter("division", division.as_str());
        }
        query.sort = sort;
        query
    }
}

/// Upstream teams, searched, filtered and sorted
pub async fn list_teams(
    state: web::Data<Arc<AppState>>,
    params: web::Query<TeamListParams>,
) -> Result<HttpResponse, AppError> {
    // Reject bad ordering before touching the backend
    let sort = parse_ordering(
        params.order_by.as_deref().unwrap_or("full_name"),
        params.order_dir.as_deref().unwrap_or(""),
        TEAM_COLUMNS,
    )?;

    let upstream = state.client.teams(MAX_PAGE_SIZE, 0).await?;
    let teams = select_teams(&params, sort, &upstream.teams);

    Ok(HttpResponse::Ok().json(TeamsResponse {
        teams,
        source: upstream.source,
    }))
}

/// Team analysis rows, e.g. `?order_by=win_percentage&order_dir=desc`
pub async fn list_team_analysis(
    state: web::Data<Arc<AppState>>,
    params: web::Query<TeamListParams>,
) -> Result<HttpResponse, AppError> {
    let sort = parse_ordering(
        params.order_by.as_deref().unwrap_or("abbreviation"),
        params.order_dir.as_deref().unwrap_or(""),
        TEAM_ANALYSIS_COLUMNS,
    )?;

    let upstream = state.client.teams_analysis().await?;
    let teams: Vec<TeamAnalysis> = select_teams(&params, sort, &upstream.teams);

    Ok(HttpResponse::Ok().json(TeamsAnalysisResponse {
        count: Some(teams.len()),
        teams,
    }))
}

fn select_teams<T: Listable + Clone>(
    params: &TeamListParams,
    sort: Vec<SortKey>,
    teams: &[T],
) -> Vec<T> {
    params.to_list_query(sort).apply(teams)
}
