//! Tabular data engine: search, filter, sort and paginate in-memory records
//!
//! A [`TableView`] is the per-view column configuration: which fields are
//! searchable, filterable and sortable, and how each is projected out of a
//! record. Computing a window is a pure function of the records and a
//! [`QueryState`]; nothing is cached between calls.
//!
//! The composition order is fixed: search, then filters, then sort, then
//! pagination.
//!
//! # Example
//!
//! ```rust,ignore
//! let table = TableView::new("courses")
//!     .column(Column::field("title").searchable().sortable())
//!     .column(Column::field("status").filterable())
//!     .column(Column::field("fee").filterable().sortable());
//!
//! let state = QueryState::new(5)
//!     .with_search("fire")
//!     .with_sort(SortSpec::asc("fee"));
//!
//! let window = table.window(&courses, &state);
//! ```

use crate::core::field::FieldValue;
use crate::core::query::{Filters, PaginatedResponse, PaginationMeta, QueryState, SortSpec};
use crate::core::record::Record;
use indexmap::IndexMap;
use serde::Serialize;
use std::cmp::Ordering;
use std::sync::Arc;

/// Field projection used by a column
pub type Accessor<T> = Arc<dyn Fn(&T) -> Option<FieldValue> + Send + Sync>;

/// One column of a table view
pub struct Column<T> {
    key: String,
    accessor: Accessor<T>,
    searchable: bool,
    filterable: bool,
    sortable: bool,
}

impl<T> Clone for Column<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            accessor: Arc::clone(&self.accessor),
            searchable: self.searchable,
            filterable: self.filterable,
            sortable: self.sortable,
        }
    }
}

impl<T> std::fmt::Debug for Column<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Column")
            .field("key", &self.key)
            .field("searchable", &self.searchable)
            .field("filterable", &self.filterable)
            .field("sortable", &self.sortable)
            .finish()
    }
}

impl<T: Record> Column<T> {
    /// Column projecting the record field of the same name
    pub fn field(key: impl Into<String>) -> Self {
        let key = key.into();
        let field = key.clone();
        Self::computed(key, move |record: &T| record.field_value(&field))
    }
}

impl<T> Column<T> {
    /// Column with a caller-supplied projection
    pub fn computed<F>(key: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> Option<FieldValue> + Send + Sync + 'static,
    {
        Self {
            key: key.into(),
            accessor: Arc::new(accessor),
            searchable: false,
            filterable: false,
            sortable: false,
        }
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn is_searchable(&self) -> bool {
        self.searchable
    }

    pub fn is_filterable(&self) -> bool {
        self.filterable
    }

    pub fn is_sortable(&self) -> bool {
        self.sortable
    }

    /// Project the column out of a record; `Null` collapses to `None`
    pub fn project(&self, record: &T) -> Option<FieldValue> {
        (self.accessor)(record).filter(|value| !value.is_null())
    }
}

/// Column configuration for one listing view
pub struct TableView<T> {
    name: String,
    columns: IndexMap<String, Column<T>>,
}

impl<T> Clone for TableView<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            columns: self.columns.clone(),
        }
    }
}

impl<T> std::fmt::Debug for TableView<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableView")
            .field("name", &self.name)
            .field("columns", &self.columns.values().collect::<Vec<_>>())
            .finish()
    }
}

impl<T> TableView<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: IndexMap::new(),
        }
    }

    /// Add a column; a later column with the same key replaces the earlier one
    pub fn column(mut self, column: Column<T>) -> Self {
        self.columns.insert(column.key.clone(), column);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> impl Iterator<Item = &Column<T>> {
        self.columns.values()
    }

    fn filter_column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.get(key).filter(|c| c.filterable)
    }

    fn sort_column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.get(key).filter(|c| c.sortable)
    }

    /// Keep records where any searchable column contains `term`, ignoring case
    ///
    /// An empty (or whitespace-only) term keeps everything.
    pub fn apply_search<'a>(&self, rows: Vec<&'a T>, term: &str) -> Vec<&'a T> {
        let term = term.trim();
        if term.is_empty() {
            return rows;
        }

        let needle = term.to_lowercase();
        let searchable: Vec<&Column<T>> = self.columns.values().filter(|c| c.searchable).collect();

        rows.into_iter()
            .filter(|record| {
                searchable.iter().any(|column| {
                    column
                        .project(record)
                        .and_then(|value| value.search_text())
                        .is_some_and(|text| text.to_lowercase().contains(&needle))
                })
            })
            .collect()
    }

    /// Keep records that satisfy every active filter
    ///
    /// A key with no filterable column has an undefined projection, so any
    /// predicate on it other than a no-op rejects every record.
    pub fn apply_filters<'a>(&self, rows: Vec<&'a T>, filters: &Filters) -> Vec<&'a T> {
        let active: Vec<_> = filters
            .iter()
            .filter(|(_, filter)| !filter.is_noop())
            .map(|(key, filter)| (self.filter_column(key), filter))
            .collect();

        if active.is_empty() {
            return rows;
        }

        rows.into_iter()
            .filter(|record| {
                active.iter().all(|(column, filter)| {
                    let projection = column.and_then(|c| c.project(record));
                    filter.matches(projection.as_ref())
                })
            })
            .collect()
    }

    /// Stable sort by a sortable column
    ///
    /// Undefined projections sort lowest. Equal keys keep their incoming
    /// order in both directions. No sort, or a key with no sortable column,
    /// keeps the incoming order.
    pub fn apply_sort<'a>(&self, rows: Vec<&'a T>, sort: Option<&SortSpec>) -> Vec<&'a T> {
        let Some(sort) = sort else {
            return rows;
        };
        let Some(column) = self.sort_column(&sort.key) else {
            return rows;
        };

        let mut keyed: Vec<(Option<FieldValue>, &'a T)> = rows
            .into_iter()
            .map(|record| (column.project(record), record))
            .collect();

        keyed.sort_by(|(a, _), (b, _)| sort.direction.apply(compare_projections(a, b)));

        keyed.into_iter().map(|(_, record)| record).collect()
    }

    /// Compute the visible window for a query state
    pub fn window<'a>(&self, records: &'a [T], state: &QueryState) -> ViewWindow<'a, T> {
        let rows: Vec<&'a T> = records.iter().collect();
        let rows = self.apply_search(rows, &state.search_term);
        let rows = self.apply_filters(rows, &state.filters);
        let rows = self.apply_sort(rows, state.sort.as_ref());
        let window = paginate(rows, state.page(), state.page_size());

        tracing::debug!(
            table = %self.name,
            total = records.len(),
            matched = window.pagination.total,
            page = window.pagination.page,
            total_pages = window.pagination.total_pages,
            "Computed view window"
        );

        window
    }
}

fn compare_projections(a: &Option<FieldValue>, b: &Option<FieldValue>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(a), Some(b)) => a.compare(b),
    }
}

/// Slice one page out of the reduced, ordered rows
///
/// `total_pages` is at least 1; a page past the end clamps to the last page.
pub fn paginate<T>(rows: Vec<&T>, page: usize, page_size: usize) -> ViewWindow<'_, T> {
    let pagination = PaginationMeta::new(page, page_size, rows.len());
    let rows = rows
        .into_iter()
        .skip(pagination.offset())
        .take(pagination.limit)
        .collect();

    ViewWindow { rows, pagination }
}

/// The visible rows plus pagination metadata
///
/// Derived from the records and a query state; borrows the records.
#[derive(Debug, Serialize)]
pub struct ViewWindow<'a, T> {
    pub rows: Vec<&'a T>,
    pub pagination: PaginationMeta,
}

impl<'a, T> ViewWindow<'a, T> {
    /// Number of records that survived search and filters
    pub fn total_matched(&self) -> usize {
        self.pagination.total
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }

    /// The page actually shown, after clamping
    pub fn page(&self) -> usize {
        self.pagination.page
    }

    /// Detach the window from the records it borrows
    pub fn to_response(&self) -> PaginatedResponse<T>
    where
        T: Clone,
    {
        PaginatedResponse {
            data: self.rows.iter().map(|row| (*row).clone()).collect(),
            pagination: self.pagination.clone(),
        }
    }
}
