//! Query descriptions and the resulting view.

use serde::{Deserialize, Serialize};

use crate::models::FilterSpec;

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    /// Smallest first.
    #[default]
    Asc,
    /// Largest first.
    Desc,
}

impl SortDirection {
    /// The opposite direction.
    pub fn reversed(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Which field to sort on, and in which direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortSpec {
    /// The field name passed to [`Record::field`](super::Record::field).
    pub field: String,
    /// The sort direction.
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `field`.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Descending sort on `field`.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }

    /// Applies a column-header click.
    ///
    /// Clicking the active field flips the direction; clicking another
    /// field sorts it ascending.
    ///
    /// # Example
    ///
    /// ```
    /// use attendance_engine::pipeline::{SortDirection, SortSpec};
    ///
    /// let mut sort = SortSpec::asc("employee_id");
    /// sort.toggle("employee_id");
    /// assert_eq!(sort.direction, SortDirection::Desc);
    /// sort.toggle("total_hours");
    /// assert_eq!(sort, SortSpec::asc("total_hours"));
    /// ```
    pub fn toggle(&mut self, field: &str) {
        if self.field == field {
            self.direction = self.direction.reversed();
        } else {
            *self = SortSpec::asc(field);
        }
    }
}

/// One page of a view: zero-based `index`, `size` rows per page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageSpec {
    /// Zero-based page number.
    pub index: usize,
    /// Rows per page.
    pub size: usize,
}

impl PageSpec {
    /// The first page of `size` rows.
    pub fn first(size: usize) -> Self {
        Self { index: 0, size }
    }
}

/// A case-sensitive substring search on one field.
///
/// An empty needle matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SearchSpec {
    /// The field searched.
    pub field: String,
    /// The substring looked for.
    pub needle: String,
}

impl SearchSpec {
    /// Searches `field` for `needle`.
    pub fn new(field: impl Into<String>, needle: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            needle: needle.into(),
        }
    }

    /// Returns true if the search filters nothing out.
    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }
}

/// The full description of one view over a collection.
///
/// Changing the window, the search, the sort or the page size returns to
/// the first page, so a narrowed result is never shown from a stale
/// offset. Only [`ViewQuery::set_page_index`] moves between pages.
///
/// # Example
///
/// ```
/// use attendance_engine::models::FilterSpec;
/// use attendance_engine::pipeline::ViewQuery;
///
/// let mut query = ViewQuery::attendance_default(5);
/// query.set_page_index(3);
/// query.set_filter(FilterSpec::month(2, 2024));
/// assert_eq!(query.page().index, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewQuery {
    filter: FilterSpec,
    search: SearchSpec,
    sort: SortSpec,
    page: PageSpec,
}

impl ViewQuery {
    /// A query over all records with the given sort, on the first page.
    pub fn new(sort: SortSpec, page_size: usize) -> Self {
        Self {
            filter: FilterSpec::all(),
            search: SearchSpec::default(),
            sort,
            page: PageSpec::first(page_size),
        }
    }

    /// The attendance list's initial query: today's punches, sorted by
    /// employee id ascending, searching on employee id.
    pub fn attendance_default(page_size: usize) -> Self {
        Self {
            filter: FilterSpec::today(),
            search: SearchSpec::new(super::AttendanceRow::EMPLOYEE_ID, ""),
            sort: SortSpec::asc(super::AttendanceRow::EMPLOYEE_ID),
            page: PageSpec::first(page_size),
        }
    }

    /// The time-window filter.
    pub fn filter(&self) -> &FilterSpec {
        &self.filter
    }

    /// The substring search.
    pub fn search(&self) -> &SearchSpec {
        &self.search
    }

    /// The sort.
    pub fn sort(&self) -> &SortSpec {
        &self.sort
    }

    /// The requested page.
    pub fn page(&self) -> PageSpec {
        self.page
    }

    /// Replaces the time window and returns to the first page.
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
        self.reset_page();
    }

    /// Replaces the search and returns to the first page.
    pub fn set_search(&mut self, search: SearchSpec) {
        self.search = search;
        self.reset_page();
    }

    /// Replaces the search needle, keeping the searched field.
    pub fn set_search_term(&mut self, needle: impl Into<String>) {
        self.search.needle = needle.into();
        self.reset_page();
    }

    /// Replaces the sort and returns to the first page.
    pub fn set_sort(&mut self, sort: SortSpec) {
        self.sort = sort;
        self.reset_page();
    }

    /// Applies a column-header click (see [`SortSpec::toggle`]).
    pub fn toggle_sort(&mut self, field: &str) {
        self.sort.toggle(field);
        self.reset_page();
    }

    /// Changes the page size and returns to the first page.
    pub fn set_page_size(&mut self, size: usize) {
        self.page.size = size;
        self.reset_page();
    }

    /// Moves to another page.
    pub fn set_page_index(&mut self, index: usize) {
        self.page.index = index;
    }

    /// Returns to the first page.
    pub fn reset_page(&mut self) {
        self.page.index = 0;
    }
}

/// The result of running a query: one page of rows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View<T> {
    /// The rows of the requested page.
    pub rows: Vec<T>,
    /// Rows matching the filters, across all pages.
    pub total: usize,
    /// The page that was requested.
    pub page: PageSpec,
}

impl<T> View<T> {
    /// Number of pages needed to show `total` rows.
    pub fn page_count(&self) -> usize {
        if self.page.size == 0 {
            0
        } else {
            self.total.div_ceil(self.page.size)
        }
    }
}
