//! Client-side search, filter, sort and paging over in-memory lists
//!
//! Every operation works on a copy; the source slice is never reordered.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use thiserror::Error;

use crate::core::league;
use crate::models::{Player, Team, TeamAnalysis};

/// Category value meaning "do not filter on this dimension"
pub const ALL: &str = "All";

/// Upper bound for a page, same as the backend
pub const MAX_PAGE_SIZE: usize = 500;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ListError {
    #[error("Unsupported order column: {0}")]
    UnsupportedColumn(String),

    #[error("order_dir must provide a direction for each order_by column ({columns} columns, {directions} directions)")]
    DirectionCountMismatch { columns: usize, directions: usize },

    #[error("Unknown sort direction: {0}")]
    UnknownDirection(String),
}

/// Value of a named field on a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    Text(&'a str),
    Number(f64),
    Missing,
}

impl<'a> From<Option<&'a str>> for FieldValue<'a> {
    fn from(value: Option<&'a str>) -> Self {
        value.map_or(FieldValue::Missing, FieldValue::Text)
    }
}

impl From<Option<f64>> for FieldValue<'_> {
    fn from(value: Option<f64>) -> Self {
        match value {
            Some(v) if v.is_finite() => FieldValue::Number(v),
            _ => FieldValue::Missing,
        }
    }
}

/// Records that can be searched, filtered and sorted by field name
pub trait Listable {
    fn field(&self, name: &str) -> FieldValue<'_>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

impl std::str::FromStr for SortDirection {
    type Err = ListError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Ok(SortDirection::Asc),
            "desc" | "descending" => Ok(SortDirection::Desc),
            other => Err(ListError::UnknownDirection(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    pub field: String,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Filter on one field; [`ALL`] disables it
///
/// Exact by default. A partial filter matches text case-insensitively
/// anywhere in the field, so position `G` also keeps `G-F`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryFilter {
    pub field: String,
    pub value: String,
    #[serde(default)]
    pub partial: bool,
}

impl CategoryFilter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            partial: false,
        }
    }

    pub fn partial(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            partial: true,
            ..Self::new(field, value)
        }
    }

    pub fn is_active(&self) -> bool {
        self.value != ALL
    }

    fn matches<T: Listable>(&self, record: &T) -> bool {
        if !self.is_active() {
            return true;
        }
        match record.field(&self.field) {
            FieldValue::Text(s) if self.partial => {
                s.to_lowercase().contains(&self.value.trim().to_lowercase())
            }
            FieldValue::Text(s) => s == self.value,
            FieldValue::Number(n) => self.value.trim().parse::<f64>().is_ok_and(|v| v == n),
            FieldValue::Missing => false,
        }
    }
}

/// Full description of a list view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    pub search: Option<String>,
    pub search_fields: Vec<String>,
    pub filters: Vec<CategoryFilter>,
    pub sort: Vec<SortKey>,
}

impl ListQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, query: impl Into<String>, fields: &[&str]) -> Self {
        self.search = Some(query.into());
        self.search_fields = fields.iter().map(|f| f.to_string()).collect();
        self
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(CategoryFilter::new(field, value));
        self
    }

    pub fn filter_partial(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push(CategoryFilter::partial(field, value));
        self
    }

    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort.push(SortKey::new(field, direction));
        self
    }

    /// Run search, filters and sort over a copy of `items`
    pub fn apply<T: Listable + Clone>(&self, items: &[T]) -> Vec<T> {
        let mut out: Vec<T> = items
            .iter()
            .filter(|item| match &self.search {
                Some(q) => matches_search(*item, q, &self.search_fields),
                None => true,
            })
            .filter(|item| self.filters.iter().all(|f| f.matches(*item)))
            .cloned()
            .collect();

        sort_records(&mut out, &self.sort);
        out
    }
}

/// Case-insensitive substring match against any of `fields`
///
/// An empty or whitespace query matches everything.
pub fn matches_search<T: Listable>(record: &T, query: &str, fields: &[String]) -> bool {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    fields.iter().any(|f| match record.field(f) {
        FieldValue::Text(s) => s.to_lowercase().contains(&needle),
        _ => false,
    })
}

/// Filter a copy of `items` by text search
pub fn search<T: Listable + Clone>(items: &[T], query: &str, fields: &[&str]) -> Vec<T> {
    ListQuery::new().search(query, fields).apply(items)
}

/// Filter a copy of `items` by category filters (AND)
pub fn filter<T: Listable + Clone>(items: &[T], filters: &[CategoryFilter]) -> Vec<T> {
    ListQuery {
        filters: filters.to_vec(),
        ..Default::default()
    }
    .apply(items)
}

/// Stable-sort a copy of `items`
pub fn sorted<T: Listable + Clone>(items: &[T], keys: &[SortKey]) -> Vec<T> {
    let mut out = items.to_vec();
    sort_records(&mut out, keys);
    out
}

fn sort_records<T: Listable>(items: &mut [T], keys: &[SortKey]) {
    if keys.is_empty() {
        return;
    }
    // slice::sort_by is stable; equal keys keep input order
    items.sort_by(|a, b| {
        keys.iter()
            .map(|k| compare_field(a.field(&k.field), b.field(&k.field), k.direction))
            .find(|o| *o != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
}

/// Missing values sort last in both directions
fn compare_field(a: FieldValue<'_>, b: FieldValue<'_>, direction: SortDirection) -> Ordering {
    let ordering = match (a, b) {
        (FieldValue::Missing, FieldValue::Missing) => return Ordering::Equal,
        (FieldValue::Missing, _) => return Ordering::Greater,
        (_, FieldValue::Missing) => return Ordering::Less,
        (FieldValue::Number(x), FieldValue::Number(y)) => x.total_cmp(&y),
        (FieldValue::Text(x), FieldValue::Text(y)) => compare_text(x, y),
        // Mixed kinds: numbers first
        (FieldValue::Number(_), FieldValue::Text(_)) => Ordering::Less,
        (FieldValue::Text(_), FieldValue::Number(_)) => Ordering::Greater,
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

/// Collation: case-folded first, raw text as tie-break
pub fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

/// Parse comma-separated `order_by`/`order_dir` into sort keys
///
/// Directions default to ascending when `order_dir` is empty; otherwise there
/// must be one direction per column.
pub fn parse_ordering(
    order_by: &str,
    order_dir: &str,
    allowed: &[&str],
) -> Result<Vec<SortKey>, ListError> {
    let columns: Vec<&str> = split_list(order_by);
    let directions: Vec<&str> = split_list(order_dir);

    if !columns.is_empty() && !directions.is_empty() && directions.len() != columns.len() {
        return Err(ListError::DirectionCountMismatch {
            columns: columns.len(),
            directions: directions.len(),
        });
    }

    if let Some(bad) = columns.iter().find(|c| !allowed.contains(*c)) {
        return Err(ListError::UnsupportedColumn(bad.to_string()));
    }

    columns
        .iter()
        .enumerate()
        .map(|(i, col)| -> Result<SortKey, ListError> {
            let direction = match directions.get(i) {
                Some(d) => d.parse()?,
                None => SortDirection::Asc,
            };
            Ok(SortKey::new(*col, direction))
        })
        .collect()
}

fn split_list(s: &str) -> Vec<&str> {
    s.split(',').map(str::trim).filter(|p| !p.is_empty()).collect()
}

/// Abbreviations are stored upper-case; the [`ALL`] sentinel passes through
pub fn team_filter_value(team: &str) -> String {
    if team == ALL {
        team.to_string()
    } else {
        team.trim().to_uppercase()
    }
}

/// Clamp a requested page size to 1..=MAX_PAGE_SIZE
pub fn clamp_limit(limit: usize) -> usize {
    limit.clamp(1, MAX_PAGE_SIZE)
}

/// One page of a derived list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub count: usize,
    pub total: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<usize>,
    pub offset: usize,
}

/// Slice a page out of `items`; no limit returns everything from `offset`
pub fn paginate<T: Clone>(items: &[T], limit: Option<usize>, offset: usize) -> Page<T> {
    let total = items.len();
    let start = offset.min(total);
    let limit = limit.map(clamp_limit);
    let end = match limit {
        Some(l) => start.saturating_add(l).min(total),
        None => total,
    };
    let page = items[start..end].to_vec();

    Page {
        count: page.len(),
        items: page,
        total,
        limit,
        offset,
    }
}

/// Offsets of the pages around a bounded page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLinks {
    pub first: usize,
    pub prev: Option<usize>,
    pub next: Option<usize>,
    pub last: Option<usize>,
}

impl<T> Page<T> {
    /// Neighbouring page offsets; `None` when the page has no limit
    pub fn links(&self) -> Option<PageLinks> {
        let limit = self.limit?;
        Some(PageLinks {
            first: 0,
            prev: (self.offset > 0).then(|| self.offset.saturating_sub(limit)),
            next: (self.offset.saturating_add(limit) < self.total)
                .then_some(self.offset + limit),
            last: (self.total > 0).then(|| ((self.total - 1) / limit) * limit),
        })
    }
}

impl Listable for Team {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Text(&self.id),
            "abbreviation" => FieldValue::Text(&self.abbreviation),
            "full_name" => self.full_name.as_deref().into(),
            "name" => self.name.as_deref().into(),
            "city" => self.city.as_deref().into(),
            "conference" => self
                .conference
                .as_deref()
                .or_else(|| league::conference_of(&self.abbreviation))
                .into(),
            "division" => self
                .division
                .as_deref()
                .or_else(|| league::division_of(&self.abbreviation))
                .into(),
            _ => FieldValue::Missing,
        }
    }
}

impl Listable for TeamAnalysis {
    fn field(&self, name: &str) -> FieldValue<'_> {
        let season = self.season_stats.as_ref();
        let betting = self.betting_stats.as_ref();
        match name {
            "wins" => season.and_then(|s| s.wins).into(),
            "losses" => season.and_then(|s| s.losses).into(),
            "win_percentage" => season.and_then(|s| s.win_percentage).into(),
            "points_per_game" => season.and_then(|s| s.points_per_game).into(),
            "points_allowed" => season.and_then(|s| s.points_allowed).into(),
            "offensive_rating" => season.and_then(|s| s.offensive_rating).into(),
            "defensive_rating" => season.and_then(|s| s.defensive_rating).into(),
            "net_rating" => season.and_then(|s| s.net_rating).into(),
            "ats_percentage" => betting.and_then(|b| b.ats_percentage).into(),
            "ou_percentage" => betting.and_then(|b| b.ou_percentage).into(),
            "strength_rating" => self.strength_rating.into(),
            other => self.team.field(other),
        }
    }
}

impl Listable for Player {
    fn field(&self, name: &str) -> FieldValue<'_> {
        match name {
            "id" => FieldValue::Text(&self.id),
            "name" => FieldValue::Text(&self.name),
            "first_name" => self.first_name.as_deref().into(),
            "last_name" => self.last_name.as_deref().into(),
            "position" => self.position.as_deref().into(),
            "team_abbreviation" | "team" => self.team_abbreviation.as_deref().into(),
            "jersey_number" => jersey_value(self.jersey_number.as_deref()),
            "height" => self.height.as_deref().into(),
            "weight" => self
                .weight
                .as_deref()
                .and_then(|w| w.trim().parse::<f64>().ok())
                .into(),
            "is_active" => FieldValue::Text(if self.is_active { "true" } else { "false" }),
            "season_year" => self.season_year.as_deref().into(),
            _ => FieldValue::Missing,
        }
    }
}

/// Jersey numbers sort numerically when they parse ("00" stays text)
fn jersey_value(jersey: Option<&str>) -> FieldValue<'_> {
    match jersey {
        Some(j) if j.len() > 1 && j.starts_with('0') => FieldValue::Text(j),
        Some(j) => match j.trim().parse::<f64>() {
            Ok(n) => FieldValue::Number(n),
            Err(_) => FieldValue::Text(j),
        },
        None => FieldValue::Missing,
    }
}

/// Fields matched by the team search box
pub const TEAM_SEARCH_FIELDS: &[&str] = &["full_name", "name", "city", "abbreviation"];

/// Fields matched by the player search box
pub const PLAYER_SEARCH_FIELDS: &[&str] = &["name", "team_abbreviation", "position"];

/// Sortable columns for team views
pub const TEAM_COLUMNS: &[&str] = &[
    "id",
    "abbreviation",
    "full_name",
    "name",
    "city",
    "conference",
    "division",
];

/// Sortable columns for team analysis views
pub const TEAM_ANALYSIS_COLUMNS: &[&str] = &[
    "abbreviation",
    "full_name",
    "name",
    "city",
    "conference",
    "division",
    "wins",
    "losses",
    "win_percentage",
    "points_per_game",
    "points_allowed",
    "offensive_rating",
    "defensive_rating",
    "net_rating",
    "ats_percentage",
    "ou_percentage",
    "strength_rating",
];

/// Sortable columns for player views
pub const PLAYER_COLUMNS: &[&str] = &[
    "id",
    "name",
    "first_name",
    "last_name",
    "team_abbreviation",
    "jersey_number",
    "position",
    "height",
    "weight",
    "is_active",
    "season_year",
];
