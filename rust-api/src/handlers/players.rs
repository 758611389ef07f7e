use actix_web::{web, HttpRequest, HttpResponse};
use serde::Deserialize;
use std::sync::Arc;

use crate::AppState;
use courtside::client::PlayerQuery;
use courtside::core::listing::{
    paginate, parse_ordering, team_filter_value, ListQuery, Page, SortKey, PLAYER_COLUMNS,
    PLAYER_SEARCH_FIELDS,
};
use courtside::error::AppError;
use courtside::models::{Player, PlayersResponse};

const DEFAULT_ORDER_BY: &str = "team_abbreviation,jersey_number";
const DEFAULT_ORDER_DIR: &str = "asc,asc";

/// Query parameters for the player list view
#[derive(Debug, Default, Deserialize)]
pub struct PlayerListParams {
    pub search: Option<String>,
    pub team: Option<String>,
    pub position: Option<String>,
    pub order_by: Option<String>,
    pub order_dir: Option<String>,
    pub limit: Option<usize>,
    pub offset: Option<usize>,
}

impl PlayerListParams {
    /// Team is an exact abbreviation match, position a case-insensitive substring
    pub fn to_list_query(&self, sort: Vec<SortKey>) -> ListQuery {
        let mut query = ListQuery::new();
        if let Some(search) = &self.search {
            query = query.search(search.as_str(), PLAYER_SEARCH_FIELDS);
        }
        if let Some(team) = &self.team {
            query = query.filter("team_abbreviation", team_filter_value(team));
        }
        if let Some(position) = &self.position {
            query = query.filter_partial("position", position.as_str());
        }
        query.sort = sort;
        query
    }
}

/// Active players, searched, sorted and paged; `Link` header carries page URLs
///
/// Without `limit` every matching row comes back and no `Link` header is set.
pub async fn list_players(
    req: HttpRequest,
    state: web::Data<Arc<AppState>>,
    params: web::Query<PlayerListParams>,
) -> Result<HttpResponse, AppError> {
    let (order_by, order_dir) = match params.order_by.as_deref() {
        Some(order_by) => (order_by, params.order_dir.as_deref().unwrap_or("")),
        None => (DEFAULT_ORDER_BY, DEFAULT_ORDER_DIR),
    };
    let sort = parse_ordering(order_by, order_dir, PLAYER_COLUMNS)?;

    let upstream = PlayerQuery {
        active: Some(true),
        ..Default::default()
    };
    let players = state.client.all_players(&upstream).await?;

    let page = select_players(&params, sort, &players);

    let mut response = HttpResponse::Ok();
    if let Some(link) = link_header(req.path(), req.query_string(), &page) {
        response.insert_header(("Link", link));
    }

    Ok(response.json(PlayersResponse {
        count: Some(page.count),
        total: Some(page.total),
        limit: page.limit,
        offset: Some(page.offset),
        players: page.items,
    }))
}

/// Search, filter, sort and page an already fetched roster
pub fn select_players(
    params: &PlayerListParams,
    sort: Vec<SortKey>,
    players: &[Player],
) -> Page<Player> {
    let selected = params.to_list_query(sort).apply(players);
    paginate(&selected, params.limit, params.offset.unwrap_or(0))
}

/// RFC 8288 links to the first, previous, next and last pages
fn link_header(path: &str, query_string: &str, page: &Page<Player>) -> Option<String> {
    let links = page.links()?;
    let limit = page.limit?;

    let kept: Vec<(String, String)> =
        serde_urlencoded::from_str::<Vec<(String, String)>>(query_string)
            .ok()?
            .into_iter()
            .filter(|(key, _)| key != "limit" && key != "offset")
            .collect();
    let url = |offset: usize| -> Option<String> {
        let mut pairs = kept.clone();
        pairs.push(("limit".to_string(), limit.to_string()));
        pairs.push(("offset".to_string(), offset.to_string()));
        let query = serde_urlencoded::to_string(&pairs).ok()?;
        Some(format!("{}?{}", path, query))
    };

    let mut out = vec![format!("<{}>; rel=\"first\"", url(links.first)?)];
    if let Some(prev) = links.prev {
        out.push(format!("<{}>; rel=\"prev\"", url(prev)?));
    }
    if let Some(next) = links.next {
        out.push(format!("<{}>; rel=\"next\"", url(next)?));
    }
    if let Some(last) = links.last {
        out.push(format!("<{}>; rel=\"last\"", url(last)?));
    }
    Some(out.join(", "))
}
