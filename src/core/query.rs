//! Query builder: turns loosely-typed listing parameters into a normalized
//! [`QueryRequest`] and then into the SQL fragments the store executes.
//!
//! Nothing in here rejects input. Bad numbers clamp, unknown sort fields fall
//! back to `created_at`, anything but `asc` sorts descending.

use crate::models::Status;
use rusqlite::types::Value;
use serde::{Deserialize, Serialize};

pub const DEFAULT_PER_PAGE: u32 = 10;
pub const MIN_PER_PAGE: u32 = 1;
pub const MAX_PER_PAGE: u32 = 100;

/// Seconds between start and finish, computed by the store so that sorting
/// and pagination operate on the whole filtered set.
const DURATION_SQL: &str =
    "(CAST(strftime('%s', finish_time) AS INTEGER) - CAST(strftime('%s', start_time) AS INTEGER))";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    #[default]
    CreatedAt,
    StartTime,
    FinishTime,
    Duration,
}

impl SortField {
    pub const ALL: [SortField; 4] = [
        SortField::CreatedAt,
        SortField::StartTime,
        SortField::FinishTime,
        SortField::Duration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::StartTime => "start_time",
            SortField::FinishTime => "finish_time",
            SortField::Duration => "duration",
        }
    }

    /// Allow-list lookup; anything unknown sorts by creation time.
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        SortField::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .unwrap_or_default()
    }

    fn sql_expr(&self) -> &'static str {
        match self {
            SortField::CreatedAt => "created_at",
            SortField::StartTime => "start_time",
            SortField::FinishTime => "finish_time",
            SortField::Duration => DURATION_SQL,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }

    pub fn parse(s: &str) -> Self {
        if s.trim().eq_ignore_ascii_case("asc") {
            SortOrder::Asc
        } else {
            SortOrder::Desc
        }
    }

    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    fn sql(&self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Status filter. A value that names no status matches nothing; it is kept
/// verbatim so it can be echoed back and survive a navigation round-trip.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(Status),
    Unrecognized(String),
}

impl StatusFilter {
    pub fn parse(s: &str) -> Self {
        let s = s.trim();
        if s.is_empty() || s == "all" {
            return StatusFilter::All;
        }
        match Status::from_db_str(s) {
            Some(st) => StatusFilter::Only(st),
            None => StatusFilter::Unrecognized(s.to_string()),
        }
    }

    pub fn as_param(&self) -> String {
        match self {
            StatusFilter::All => "all".to_string(),
            StatusFilter::Only(st) => st.as_str().to_string(),
            StatusFilter::Unrecognized(raw) => raw.clone(),
        }
    }
}

/// Listing parameters exactly as they arrive (query string, CLI flags).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub per_page: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
}

/// Effective filter state echoed back next to every page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EchoedFilters {
    pub search: String,
    pub status: String,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub per_page: u32,
}

/// A normalized listing request. Every field is always within its domain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryRequest {
    pub search: String,
    pub status: StatusFilter,
    pub sort_field: SortField,
    pub sort_order: SortOrder,
    pub per_page: u32,
    pub page: u32,
}

impl Default for QueryRequest {
    fn default() -> Self {
        Self {
            search: String::new(),
            status: StatusFilter::All,
            sort_field: SortField::CreatedAt,
            sort_order: SortOrder::Desc,
            per_page: DEFAULT_PER_PAGE,
            page: 1,
        }
    }
}

/// SQL fragments for one request. `where_sql` and `order_sql` start with a
/// space (or are empty) so they can be appended to `FROM entries`.
#[derive(Debug, Clone, PartialEq)]
pub struct StoreQuery {
    pub where_sql: String,
    pub params: Vec<Value>,
    pub order_sql: String,
}

/// Lowercase one character at a time. Unlike `str::to_lowercase` this never
/// looks at neighbouring characters (final sigma), so a folded needle is
/// always a substring of the folded haystack it was cut from.
pub fn casefold(s: &str) -> String {
    s.chars().flat_map(char::to_lowercase).collect()
}

/// Parse a page size; non-numbers fall back to `default`, then everything
/// is clamped into `[MIN_PER_PAGE, MAX_PER_PAGE]`.
pub fn clamp_per_page(raw: Option<&str>, default: u32) -> u32 {
    let min = i64::from(MIN_PER_PAGE);
    let max = i64::from(MAX_PER_PAGE);
    let n = raw.and_then(parse_integer).unwrap_or_else(|| i64::from(default));
    u32::try_from(n.clamp(min, max)).unwrap_or(DEFAULT_PER_PAGE)
}

/// Integer parse that saturates on overflow instead of failing.
fn parse_integer(raw: &str) -> Option<i64> {
    let s = raw.trim();
    if let Ok(n) = s.parse::<i64>() {
        return Some(n);
    }
    let (negative, digits) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(if negative { i64::MIN } else { i64::MAX })
}

/// Parse a 1-based page number; anything unusable becomes page 1.
pub fn parse_page(raw: Option<&str>) -> u32 {
    raw.and_then(parse_integer)
        .map(|n| n.clamp(1, i64::from(u32::MAX)))
        .and_then(|n| u32::try_from(n).ok())
        .unwrap_or(1)
}

impl QueryRequest {
    pub fn from_params(params: &ListParams, default_per_page: u32) -> Self {
        Self {
            search: params.search.as_deref().unwrap_or("").trim().to_string(),
            status: params
                .status
                .as_deref()
                .map(StatusFilter::parse)
                .unwrap_or_default(),
            sort_field: params
                .sort_field
                .as_deref()
                .map(SortField::parse)
                .unwrap_or_default(),
            sort_order: params
                .sort_order
                .as_deref()
                .map(SortOrder::parse)
                .unwrap_or_default(),
            per_page: clamp_per_page(params.per_page.as_deref(), default_per_page),
            page: parse_page(params.page.as_deref()),
        }
    }

    /// Parse a raw query string (`search=a&page=2`). Each key is read on its
    /// own: a repeated key keeps its last value and unknown keys are ignored.
    pub fn from_query_string(query: &str, default_per_page: u32) -> Self {
        let query = query.trim_start_matches('?');
        let pairs: Vec<(String, String)> = serde_urlencoded::from_str(query).unwrap_or_default();

        let mut params = ListParams::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "search" => &mut params.search,
                "status" => &mut params.status,
                "sort_field" => &mut params.sort_field,
                "sort_order" => &mut params.sort_order,
                "per_page" => &mut params.per_page,
                "page" => &mut params.page,
                _ => continue,
            };
            *slot = Some(value);
        }
        Self::from_params(&params, default_per_page)
    }

    /// Parse the query part of a navigation URL.
    pub fn from_url(url: &str, default_per_page: u32) -> Self {
        let query = url.split_once('?').map(|(_, q)| q).unwrap_or("");
        let query = query.split('#').next().unwrap_or("");
        Self::from_query_string(query, default_per_page)
    }

    pub fn to_params(&self) -> ListParams {
        ListParams {
            search: Some(self.search.clone()),
            status: Some(self.status.as_param()),
            sort_field: Some(self.sort_field.as_str().to_string()),
            sort_order: Some(self.sort_order.as_str().to_string()),
            per_page: Some(self.per_page.to_string()),
            page: Some(self.page.to_string()),
        }
    }

    /// Encode the full request, so that following a link keeps every filter.
    pub fn query_string(&self) -> String {
        serde_urlencoded::to_string(self.to_params()).unwrap_or_default()
    }

    pub fn with_page(&self, page: u32) -> Self {
        Self {
            page: page.max(1),
            ..self.clone()
        }
    }

    pub fn filters(&self) -> EchoedFilters {
        EchoedFilters {
            search: self.search.clone(),
            status: self.status.as_param(),
            sort_field: self.sort_field,
            sort_order: self.sort_order,
            per_page: self.per_page,
        }
    }

    /// Build the WHERE / ORDER BY fragments.
    ///
    /// Ties on the sort key are broken by `id ASC` (insertion order) so that
    /// consecutive pages never overlap or skip rows.
    pub fn store_query(&self) -> StoreQuery {
        let mut clauses: Vec<&str> = Vec::new();
        let mut params: Vec<Value> = Vec::new();

        if !self.search.is_empty() {
            let needle = casefold(&self.search);
            clauses.push("(instr(casefold(person), ?) > 0 OR instr(casefold(description), ?) > 0)");
            params.push(Value::Text(needle.clone()));
            params.push(Value::Text(needle));
        }

        match &self.status {
            StatusFilter::All => {}
            StatusFilter::Only(st) => {
                clauses.push("status = ?");
                params.push(Value::Text(st.to_db_str().to_string()));
            }
            StatusFilter::Unrecognized(_) => clauses.push("0 = 1"),
        }

        let where_sql = if clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", clauses.join(" AND "))
        };

        let order_sql = format!(
            " ORDER BY {} {}, id ASC",
            self.sort_field.sql_expr(),
            self.sort_order.sql()
        );

        StoreQuery {
            where_sql,
            params,
            order_sql,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(pairs: &[(&str, &str)]) -> ListParams {
        let qs = serde_urlencoded::to_string(pairs).unwrap();
        serde_urlencoded::from_str(&qs).unwrap()
    }

    #[test]
    fn defaults_when_nothing_is_given() {
        let req = QueryRequest::from_params(&ListParams::default(), DEFAULT_PER_PAGE);
        assert_eq!(req, QueryRequest::default());
    }

    #[test]
    fn per_page_is_clamped() {
        assert_eq!(clamp_per_page(Some("0"), 10), 1);
        assert_eq!(clamp_per_page(Some("-7"), 10), 1);
        assert_eq!(clamp_per_page(Some("101"), 10), 100);
        assert_eq!(clamp_per_page(Some("99999999999999999999"), 10), 100);
        assert_eq!(clamp_per_page(Some("-99999999999999999999"), 10), 1);
        assert_eq!(clamp_per_page(Some("abc"), 10), 10);
        assert_eq!(clamp_per_page(None, 250), 100);
        assert_eq!(clamp_per_page(Some(" 25 "), 10), 25);
    }

    #[test]
    fn page_is_at_least_one() {
        assert_eq!(parse_page(Some("0")), 1);
        assert_eq!(parse_page(Some("-3")), 1);
        assert_eq!(parse_page(Some("x")), 1);
        assert_eq!(parse_page(Some("4")), 4);
    }

    #[test]
    fn sort_parameters_fall_back() {
        let req = QueryRequest::from_params(
            &params(&[("sort_field", "person; DROP TABLE entries"), ("sort_order", "sideways")]),
            10,
        );
        assert_eq!(req.sort_field, SortField::CreatedAt);
        assert_eq!(req.sort_order, SortOrder::Desc);

        let req = QueryRequest::from_params(&params(&[("sort_field", "duration"), ("sort_order", "asc")]), 10);
        assert_eq!(req.sort_field, SortField::Duration);
        assert_eq!(req.sort_order, SortOrder::Asc);
    }

    #[test]
    fn status_filter_variants() {
        assert_eq!(StatusFilter::parse("all"), StatusFilter::All);
        assert_eq!(StatusFilter::parse(""), StatusFilter::All);
        assert_eq!(
            StatusFilter::parse("Not Compensated"),
            StatusFilter::Only(Status::NotCompensated)
        );
        assert_eq!(
            StatusFilter::parse("Paid"),
            StatusFilter::Unrecognized("Paid".to_string())
        );
    }

    #[test]
    fn whitespace_search_disables_the_filter() {
        let req = QueryRequest::from_params(&params(&[("search", "   ")]), 10);
        assert!(req.search.is_empty());
        assert_eq!(req.store_query().where_sql, "");
    }

    #[test]
    fn store_query_combines_filters() {
        let req = QueryRequest::from_params(
            &params(&[("search", " ALICE "), ("status", "Compensated"), ("sort_field", "duration")]),
            10,
        );
        let q = req.store_query();
        assert!(q.where_sql.starts_with(" WHERE (instr(casefold(person)"));
        assert!(q.where_sql.ends_with("AND status = ?"));
        assert_eq!(
            q.params,
            vec![
                Value::Text("alice".into()),
                Value::Text("alice".into()),
                Value::Text("Compensated".into())
            ]
        );
        assert!(q.order_sql.contains("strftime('%s', finish_time)"));
        assert!(q.order_sql.ends_with("DESC, id ASC"));
    }

    #[test]
    fn unknown_status_matches_nothing() {
        let req = QueryRequest::from_params(&params(&[("status", "Paid")]), 10);
        assert_eq!(req.store_query().where_sql, " WHERE 0 = 1");
        assert_eq!(req.filters().status, "Paid");
    }

    #[test]
    fn query_string_round_trips() {
        let req = QueryRequest {
            search: "late & night 100%".to_string(),
            status: StatusFilter::Only(Status::NotCompensated),
            sort_field: SortField::FinishTime,
            sort_order: SortOrder::Asc,
            per_page: 25,
            page: 3,
        };
        let url = format!("/list?{}", req.query_string());
        assert_eq!(QueryRequest::from_url(&url, 10), req);
    }

    #[test]
    fn repeated_key_keeps_the_last_value() {
        let req = QueryRequest::from_query_string(
            "status=Pending&per_page=5&sort_field=duration&search=a&search=b&theme=dark",
            10,
        );
        assert_eq!(req.search, "b");
        assert_eq!(req.status, StatusFilter::Only(Status::Pending));
        assert_eq!(req.sort_field, SortField::Duration);
        assert_eq!(req.per_page, 5);

        let req = QueryRequest::from_query_string("page=2&page=abc&sort_order=asc", 10);
        assert_eq!(req.page, 1);
        assert_eq!(req.sort_order, SortOrder::Asc);
    }

    #[test]
    fn casefold_works_per_character() {
        assert_eq!(casefold("ΑΣ"), "ασ");
        assert_eq!(casefold("ΑΣΑ"), "ασα");
        assert!(casefold("ΑΣΑ").contains(&casefold("ΑΣ")));
        assert_eq!(casefold("Straße İ"), "straße i\u{307}");
    }
}
