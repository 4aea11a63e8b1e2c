//! Query state, filter predicates and pagination utilities

use crate::config::TableConfig;
use crate::core::field::FieldValue;
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// Sentinel filter value meaning "do not filter on this key"
pub const FILTER_ALL: &str = "ALL";

/// Active filters, keyed by field name, in the order they were set
pub type Filters = IndexMap<String, FilterValue>;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// The opposite direction
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Sort key and direction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub key: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Parse a sort expression
    ///
    /// # Format
    /// - `field` or `field:asc` (ascending)
    /// - `field:desc` (descending)
    ///
    /// Returns `None` for an empty key or an unknown direction.
    pub fn parse(expr: &str) -> Option<Self> {
        let expr = expr.trim();
        let (key, direction) = match expr.split_once(':') {
            Some((key, dir)) if dir.eq_ignore_ascii_case("asc") => (key, SortDirection::Asc),
            Some((key, dir)) if dir.eq_ignore_ascii_case("desc") => (key, SortDirection::Desc),
            Some(_) => return None,
            None => (expr, SortDirection::Asc),
        };

        let key = key.trim();
        if key.is_empty() {
            return None;
        }

        Some(Self {
            key: key.to_string(),
            direction,
        })
    }
}

/// Predicate applied to one field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum FilterValue {
    /// No-op ("Status: All")
    All,

    /// Exact match against a single value
    Equals(FieldValue),

    /// Set membership (multi-select); an empty set is a no-op
    OneOf(Vec<FieldValue>),

    /// Case-insensitive substring of the field's text
    Contains(String),

    /// Inclusive bounds; either side may be open
    Range {
        min: Option<FieldValue>,
        max: Option<FieldValue>,
    },
}

impl FilterValue {
    pub fn equals(value: impl Into<FieldValue>) -> Self {
        FilterValue::Equals(value.into())
    }

    pub fn one_of<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<FieldValue>,
    {
        FilterValue::OneOf(values.into_iter().map(Into::into).collect())
    }

    pub fn contains(needle: impl Into<String>) -> Self {
        FilterValue::Contains(needle.into())
    }

    pub fn at_most(max: impl Into<FieldValue>) -> Self {
        FilterValue::Range {
            min: None,
            max: Some(max.into()),
        }
    }

    pub fn at_least(min: impl Into<FieldValue>) -> Self {
        FilterValue::Range {
            min: Some(min.into()),
            max: None,
        }
    }

    /// Whether this predicate accepts every record
    pub fn is_noop(&self) -> bool {
        match self {
            FilterValue::All => true,
            FilterValue::OneOf(values) => values.is_empty(),
            FilterValue::Range { min, max } => min.is_none() && max.is_none(),
            FilterValue::Equals(_) | FilterValue::Contains(_) => false,
        }
    }

    /// Test a field projection against this predicate
    ///
    /// An undefined projection (`None` or `Null`) fails every predicate
    /// except a no-op.
    pub fn matches(&self, projection: Option<&FieldValue>) -> bool {
        if self.is_noop() {
            return true;
        }

        let Some(value) = projection.filter(|v| !v.is_null()) else {
            return false;
        };

        match self {
            FilterValue::All => true,
            FilterValue::Equals(expected) => value.matches(expected),
            FilterValue::OneOf(allowed) => allowed.iter().any(|v| value.matches(v)),
            FilterValue::Contains(needle) => value
                .search_text()
                .is_some_and(|text| text.to_lowercase().contains(&needle.to_lowercase())),
            FilterValue::Range { min, max } => {
                min.as_ref()
                    .is_none_or(|min| value.compare_to_bound(min) != Ordering::Less)
                    && max
                        .as_ref()
                        .is_none_or(|max| value.compare_to_bound(max) != Ordering::Greater)
            }
        }
    }
}

/// Check a record against every active filter (logical AND)
pub fn matches_filters<T: Record>(record: &T, filters: &Filters) -> bool {
    filters
        .iter()
        .all(|(key, filter)| filter.matches(record.field_value(key).as_ref()))
}

/// Parse a JSON filter object into active filters
///
/// # Format
/// - Exact match: `{"status": "Pending"}`
/// - Set membership: `{"mode": ["Online", "Offline"]}`
/// - No-op: `{"status": "ALL"}`
/// - Contains: `{"location~": "India"}`
/// - Range: `{"fee>=": 5000, "fee<=": 10000}`
pub fn parse_filters(value: &Value) -> Filters {
    let mut filters = Filters::new();

    let Some(obj) = value.as_object() else {
        tracing::warn!(filter = %value, "Ignoring filter that is not a JSON object");
        return filters;
    };

    for (raw_key, raw) in obj {
        if let Some(key) = raw_key.strip_suffix(">=") {
            merge_range(&mut filters, key, Some(FieldValue::from_json(raw)), None);
        } else if let Some(key) = raw_key.strip_suffix("<=") {
            merge_range(&mut filters, key, None, Some(FieldValue::from_json(raw)));
        } else if let Some(key) = raw_key.strip_suffix('~') {
            let needle = raw.as_str().map(String::from).unwrap_or_else(|| raw.to_string());
            filters.insert(key.to_string(), FilterValue::Contains(needle));
        } else {
            filters.insert(raw_key.clone(), filter_from_json(raw));
        }
    }

    filters
}

fn filter_from_json(raw: &Value) -> FilterValue {
    match raw {
        Value::String(s) if s.eq_ignore_ascii_case(FILTER_ALL) => FilterValue::All,
        Value::Array(items) => FilterValue::OneOf(items.iter().map(FieldValue::from_json).collect()),
        other => FilterValue::Equals(FieldValue::from_json(other)),
    }
}

fn merge_range(
    filters: &mut Filters,
    key: &str,
    min: Option<FieldValue>,
    max: Option<FieldValue>,
) {
    match filters.get_mut(key) {
        Some(FilterValue::Range {
            min: current_min,
            max: current_max,
        }) => {
            if min.is_some() {
                *current_min = min;
            }
            if max.is_some() {
                *current_max = max;
            }
        }
        _ => {
            filters.insert(key.to_string(), FilterValue::Range { min, max });
        }
    }
}

/// Query state owned by a single listing view
///
/// Every mutator applies all related changes at once: narrowing the result
/// (search, filters, page size) also returns to page 1, so the engine never
/// sees a new filter paired with a stale page index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryState {
    pub search_term: String,
    pub filters: Filters,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: usize,
}

impl Default for QueryState {
    fn default() -> Self {
        Self::new(TableConfig::default().default_page_size)
    }
}

impl QueryState {
    /// Empty state on page 1
    pub fn new(page_size: usize) -> Self {
        Self {
            search_term: String::new(),
            filters: Filters::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, filter: FilterValue) -> Self {
        self.filters.insert(key.into(), filter);
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Page number, never below 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Page size, never below 1
    pub fn page_size(&self) -> usize {
        self.page_size.max(1)
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
        self.page = 1;
    }

    pub fn set_filter(&mut self, key: impl Into<String>, filter: FilterValue) {
        self.filters.insert(key.into(), filter);
        self.page = 1;
    }

    pub fn clear_filter(&mut self, key: &str) {
        self.filters.shift_remove(key);
        self.page = 1;
    }

    /// "Reset Filters": drop search and filters, back to page 1
    pub fn reset_filters(&mut self) {
        self.search_term.clear();
        self.filters.clear();
        self.page = 1;
    }

    /// Sorting reorders without changing the count, so the page is kept
    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.sort = sort;
    }

    /// Column-header click: same key flips direction, new key starts ascending
    pub fn toggle_sort(&mut self, key: &str) {
        self.sort = match self.sort.take() {
            Some(current) if current.key == key => Some(SortSpec {
                key: current.key,
                direction: current.direction.toggled(),
            }),
            _ => Some(SortSpec::asc(key)),
        };
    }

    pub fn go_to_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.page_size = page_size.max(1);
        self.page = 1;
    }

    /// Adopt the clamped page reported by a computed window
    pub fn reconcile(&mut self, pagination: &PaginationMeta) {
        self.page = pagination.page;
    }
}

/// Query parameters for pagination, search, filtering and sorting
///
/// This structure is used to extract listing parameters from URL query
/// strings. Malformed `filter` or `sort` values are ignored (with a
/// warning) rather than rejected.
///
/// # Example
/// ```text
/// GET /courses?page=2&limit=5
/// GET /courses?search=fire
/// GET /courses?filter={"mode": "Online", "fee<=": 10000}&sort=fee:desc
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: usize,

    /// Number of items per page (defaults from configuration)
    pub limit: Option<usize>,

    /// Free-text search term
    pub search: Option<String>,

    /// Filters as JSON object
    pub filter: Option<String>,

    /// Sort expression (`field`, `field:asc`, `field:desc`)
    pub sort: Option<String>,
}

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.max(1)
    }

    /// Get limit, falling back to the configured default and capped at the maximum
    pub fn limit(&self, tables: &TableConfig) -> usize {
        self.limit
            .unwrap_or(tables.default_page_size)
            .clamp(1, tables.max_page_size.max(1))
    }

    /// Parse filter JSON string into Value
    pub fn filter_value(&self) -> Option<Value> {
        let raw = self.filter.as_ref()?;
        match serde_json::from_str(raw) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(filter = %raw, error = %e, "Ignoring malformed filter parameter");
                None
            }
        }
    }

    /// Parse the sort expression
    pub fn sort_spec(&self) -> Option<SortSpec> {
        let raw = self.sort.as_ref()?;
        let spec = SortSpec::parse(raw);
        if spec.is_none() {
            tracing::warn!(sort = %raw, "Ignoring malformed sort parameter");
        }
        spec
    }

    /// Build the query state these parameters describe
    pub fn to_state(&self, tables: &TableConfig) -> QueryState {
        QueryState {
            search_term: self.search.clone().unwrap_or_default(),
            filters: self
                .filter_value()
                .map(|value| parse_filters(&value))
                .unwrap_or_default(),
            sort: self.sort_spec(),
            page: self.page(),
            page_size: self.limit(tables),
        }
    }
}

/// Paginated response structure
///
/// This structure wraps one page of rows with metadata about pagination state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    /// The rows of the current page
    pub data: Vec<T>,

    /// Pagination metadata
    pub pagination: PaginationMeta,
}

impl<T> PaginatedResponse<T> {
    /// Transform every row, keeping the pagination metadata
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PaginatedResponse<U> {
        PaginatedResponse {
            data: self.data.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Pagination metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    /// Current page number after clamping (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub limit: usize,

    /// Total number of items (after search and filters)
    pub total: usize,

    /// Total number of pages, at least 1
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Create pagination metadata, clamping `page` into `[1, total_pages]`
    pub fn new(page: usize, limit: usize, total: usize) -> Self {
        // Ensure limit is at least 1 to avoid division by zero
        let limit = limit.max(1);
        let total_pages = total.div_ceil(limit).max(1);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            limit,
            total,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Offset of the first row of the current page
    pub fn offset(&self) -> usize {
        (self.page - 1) * self.limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_query_params_defaults() {
        let params = QueryParams::default();
        let tables = TableConfig::default();
        assert_eq!(params.page(), 1);
        assert_eq!(params.limit(&tables), tables.default_page_size);
    }

    #[test]
    fn test_query_params_limit_is_capped() {
        let tables = TableConfig {
            default_page_size: 10,
            max_page_size: 50,
        };
        let params = QueryParams {
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(params.limit(&tables), 50);

        let params = QueryParams {
            limit: Some(0),
            ..Default::default()
        };
        assert_eq!(params.limit(&tables), 1);
    }

    #[test]
    fn test_query_params_to_state() {
        let params = QueryParams {
            page: 2,
            limit: Some(5),
            search: Some("fire".to_string()),
            filter: Some(r#"{"status": "Pending", "fee<=": 9000}"#.to_string()),
            sort: Some("fee:desc".to_string()),
        };

        let state = params.to_state(&TableConfig::default());
        assert_eq!(state.page, 2);
        assert_eq!(state.page_size, 5);
        assert_eq!(state.search_term, "fire");
        assert_eq!(state.sort, Some(SortSpec::desc("fee")));
        assert_eq!(state.filters.get("status"), Some(&FilterValue::equals("Pending")));
        assert_eq!(state.filters.get("fee"), Some(&FilterValue::at_most(9000i64)));
    }

    #[test]
    fn test_query_params_malformed_input_is_ignored() {
        let params = QueryParams {
            filter: Some("{not json".to_string()),
            sort: Some("fee:sideways".to_string()),
            ..Default::default()
        };

        let state = params.to_state(&TableConfig::default());
        assert!(state.filters.is_empty());
        assert!(state.sort.is_none());
    }

    #[test]
    fn test_sort_spec_parse() {
        assert_eq!(SortSpec::parse("fee"), Some(SortSpec::asc("fee")));
        assert_eq!(SortSpec::parse("fee:asc"), Some(SortSpec::asc("fee")));
        assert_eq!(SortSpec::parse("start_date:DESC"), Some(SortSpec::desc("start_date")));
        assert_eq!(SortSpec::parse(""), None);
        assert_eq!(SortSpec::parse(":desc"), None);
        assert_eq!(SortSpec::parse("fee:up"), None);
    }

    #[test]
    fn test_parse_filters_operators() {
        let filters = parse_filters(&json!({
            "status": "ALL",
            "mode": ["Online", "Offline"],
            "location~": "india",
            "fee>=": 5000,
            "fee<=": 10000,
        }));

        assert_eq!(filters.get("status"), Some(&FilterValue::All));
        assert_eq!(
            filters.get("mode"),
            Some(&FilterValue::one_of(["Online", "Offline"]))
        );
        assert_eq!(filters.get("location"), Some(&FilterValue::contains("india")));
        assert_eq!(
            filters.get("fee"),
            Some(&FilterValue::Range {
                min: Some(FieldValue::Integer(5000)),
                max: Some(FieldValue::Integer(10000)),
            })
        );
    }

    #[test]
    fn test_parse_filters_non_object() {
        assert!(parse_filters(&json!(["status"])).is_empty());
    }

    #[test]
    fn test_filter_noop_variants() {
        assert!(FilterValue::All.is_noop());
        assert!(FilterValue::OneOf(vec![]).is_noop());
        assert!(FilterValue::Range { min: None, max: None }.is_noop());
        assert!(FilterValue::All.matches(None));
        assert!(!FilterValue::equals("x").is_noop());
    }

    #[test]
    fn test_filter_undefined_projection_never_matches() {
        assert!(!FilterValue::equals("Pending").matches(None));
        assert!(!FilterValue::equals("Pending").matches(Some(&FieldValue::Null)));
        assert!(!FilterValue::at_most(100i64).matches(Some(&FieldValue::Null)));
        assert!(!FilterValue::contains("a").matches(None));
    }

    #[test]
    fn test_filter_range_is_inclusive() {
        let filter = FilterValue::Range {
            min: Some(FieldValue::Integer(5000)),
            max: Some(FieldValue::Integer(9000)),
        };
        assert!(filter.matches(Some(&FieldValue::Integer(5000))));
        assert!(filter.matches(Some(&FieldValue::Integer(9000))));
        assert!(!filter.matches(Some(&FieldValue::Integer(4500))));
        assert!(!filter.matches(Some(&FieldValue::Integer(9500))));
    }

    #[test]
    fn test_filter_contains_is_case_insensitive() {
        let filter = FilterValue::contains("INDIA");
        assert!(filter.matches(Some(&FieldValue::from("Mumbai, India"))));
        assert!(!filter.matches(Some(&FieldValue::from("Worldwide"))));
    }

    #[test]
    fn test_state_mutators_reset_page() {
        let mut state = QueryState::new(5).with_page(3);

        state.set_search("fire");
        assert_eq!(state.page, 1);

        state.go_to_page(2);
        state.set_filter("status", FilterValue::equals("Approved"));
        assert_eq!(state.page, 1);

        state.go_to_page(2);
        state.set_sort(Some(SortSpec::asc("fee")));
        assert_eq!(state.page, 2);

        state.reset_filters();
        assert_eq!(state.page, 1);
        assert!(state.search_term.is_empty());
        assert!(state.filters.is_empty());
        assert_eq!(state.sort, Some(SortSpec::asc("fee")));
    }

    #[test]
    fn test_toggle_sort() {
        let mut state = QueryState::default();

        state.toggle_sort("fee");
        assert_eq!(state.sort, Some(SortSpec::asc("fee")));
        state.toggle_sort("fee");
        assert_eq!(state.sort, Some(SortSpec::desc("fee")));
        state.toggle_sort("title");
        assert_eq!(state.sort, Some(SortSpec::asc("title")));
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(1, 20, 145);
        assert_eq!(meta.total, 145);
        assert_eq!(meta.total_pages, 8);
        assert!(!meta.has_prev);
        assert!(meta.has_next);
    }

    #[test]
    fn test_pagination_meta_empty_has_one_page() {
        let meta = PaginationMeta::new(4, 10, 0);
        assert_eq!(meta.total_pages, 1);
        assert_eq!(meta.page, 1);
        assert_eq!(meta.offset(), 0);
        assert!(!meta.has_next);
        assert!(!meta.has_prev);
    }

    #[test]
    fn test_pagination_meta_clamps_page() {
        let meta = PaginationMeta::new(9, 5, 12);
        assert_eq!(meta.total_pages, 3);
        assert_eq!(meta.page, 3);
        assert_eq!(meta.offset(), 10);

        let meta = PaginationMeta::new(0, 5, 12);
        assert_eq!(meta.page, 1);
    }
}
