//! # List Query Engine
//!
//! One search/filter/paginate engine shared by every table in the portal.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  records ──► search (any field contains text, case-insensitive)        │
//! │          ──► filter (All | category == value)                          │
//! │          ──► order  (input order, or a comparator)                     │
//! │          ──► page   (1-based, clamped into [1, total_pages])           │
//! │                                                                         │
//! │  Page { rows, current_page, total_pages, total_items,                  │
//! │         start_item, end_item }   →  "Showing 10-18 of 23"              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! [`query`] is the stateless form. [`ListView`] keeps the master and
//! filtered collections between calls and applies create/edit/delete the
//! way the portal tables do: creates land on page 1, deletes step back a
//! page when they empty the current one.

use std::borrow::Cow;
use std::cmp::Ordering;

use serde::Serialize;

use crate::types::{numeric_suffix, Entity};

// =============================================================================
// Searchable
// =============================================================================

/// Selects the fields a table searches and its optional category.
pub trait Searchable {
    /// Fields matched by the free-text search.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Value compared by [`CategoryFilter::Equals`]. Records without a
    /// category only pass [`CategoryFilter::All`].
    fn category(&self) -> Option<&str> {
        None
    }
}

/// Categorical filter next to the search box.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CategoryFilter {
    #[default]
    All,
    Equals(String),
}

impl CategoryFilter {
    /// Parses a query parameter. Missing, empty and `"all"` mean no filter.
    pub fn from_param(param: Option<&str>) -> Self {
        match param.map(str::trim) {
            None | Some("") => CategoryFilter::All,
            Some(value) if value.eq_ignore_ascii_case("all") => CategoryFilter::All,
            Some(value) => CategoryFilter::Equals(value.to_string()),
        }
    }

    fn admits(&self, category: Option<&str>) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Equals(wanted) => category == Some(wanted.as_str()),
        }
    }
}

/// Whether a record passes the search text and the filter.
///
/// Blank search text matches everything.
pub fn matches<T: Searchable>(record: &T, search_text: &str, filter: &CategoryFilter) -> bool {
    if !filter.admits(record.category()) {
        return false;
    }
    let needle = search_text.trim().to_lowercase();
    if needle.is_empty() {
        return true;
    }
    record
        .search_fields()
        .iter()
        .any(|field| field.to_lowercase().contains(&needle))
}

// =============================================================================
// Page
// =============================================================================

/// One page of a table plus the numbers behind "Showing x-y of z".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    pub rows: Vec<T>,
    pub current_page: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first row shown, 0 when empty.
    pub start_item: usize,
    /// 1-based index of the last row shown, 0 when empty.
    pub end_item: usize,
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    pub fn has_previous(&self) -> bool {
        self.current_page > 1
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            current_page: self.current_page,
            total_pages: self.total_pages,
            total_items: self.total_items,
            start_item: self.start_item,
            end_item: self.end_item,
        }
    }
}

/// `max(1, ceil(count / page_size))`
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Slices `matched` to the requested page, clamping the page into range.
pub fn paginate<T: Clone>(matched: &[T], page_size: usize, page: usize) -> Page<T> {
    let page_size = page_size.max(1);
    let total_pages = total_pages(matched.len(), page_size);
    let current_page = page.clamp(1, total_pages);

    let start = ((current_page - 1) * page_size).min(matched.len());
    let end = (start + page_size).min(matched.len());
    let rows = matched[start..end].to_vec();

    let (start_item, end_item) = if rows.is_empty() {
        (0, 0)
    } else {
        (start + 1, end)
    };

    Page {
        rows,
        current_page,
        total_pages,
        total_items: matched.len(),
        start_item,
        end_item,
    }
}

/// Stateless search + filter + paginate, preserving input order.
///
/// ## Example
/// ```rust
/// use std::borrow::Cow;
/// use kud_core::query::{query, CategoryFilter, Searchable};
///
/// #[derive(Clone)]
/// struct Row(&'static str);
///
/// impl Searchable for Row {
///     fn search_fields(&self) -> Vec<Cow<'_, str>> {
///         vec![Cow::Borrowed(self.0)]
///     }
/// }
///
/// let rows = [Row("Maemunah"), Row("Darman"), Row("Wati")];
/// let page = query(&rows, "MA", &CategoryFilter::All, 10, 1);
/// assert_eq!(page.total_items, 2);
/// ```
pub fn query<T: Searchable + Clone>(
    records: &[T],
    search_text: &str,
    filter: &CategoryFilter,
    page_size: usize,
    page: usize,
) -> Page<T> {
    let matched: Vec<T> = records
        .iter()
        .filter(|r| matches(*r, search_text, filter))
        .cloned()
        .collect();
    paginate(&matched, page_size, page)
}

// =============================================================================
// Ordering
// =============================================================================

/// Comparator: newest first by the numeric suffix of the id.
///
/// Ids without digits sort last.
pub fn newest_first<T: Entity>(a: &T, b: &T) -> Ordering {
    numeric_suffix(b.id()).cmp(&numeric_suffix(a.id()))
}

// =============================================================================
// List View
// =============================================================================

/// Stateful table: master records, the filtered view, and the cursor.
#[derive(Clone)]
pub struct ListView<T> {
    records: Vec<T>,
    visible: Vec<T>,
    search_text: String,
    filter: CategoryFilter,
    page_size: usize,
    current_page: usize,
    order: Option<fn(&T, &T) -> Ordering>,
}

impl<T: Searchable + Clone> ListView<T> {
    /// A view over `records` in their given order, on page 1.
    pub fn new(records: Vec<T>, page_size: usize) -> Self {
        let visible = records.clone();
        ListView {
            records,
            visible,
            search_text: String::new(),
            filter: CategoryFilter::All,
            page_size: page_size.max(1),
            current_page: 1,
            order: None,
        }
    }

    /// Keeps both collections sorted by `order`.
    pub fn with_order(mut self, order: fn(&T, &T) -> Ordering) -> Self {
        self.order = Some(order);
        self.records.sort_by(order);
        self.visible.sort_by(order);
        self
    }

    // -------------------------------------------------------------------------
    // Search & filter
    // -------------------------------------------------------------------------

    /// Replaces the search text and returns to page 1.
    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
        self.refilter();
    }

    /// Replaces the category filter and returns to page 1.
    pub fn set_filter(&mut self, filter: CategoryFilter) {
        self.filter = filter;
        self.refilter();
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filter(&self) -> &CategoryFilter {
        &self.filter
    }

    fn refilter(&mut self) {
        self.visible = self
            .records
            .iter()
            .filter(|r| matches(*r, &self.search_text, &self.filter))
            .cloned()
            .collect();
        self.current_page = 1;
    }

    fn admits(&self, record: &T) -> bool {
        matches(record, &self.search_text, &self.filter)
    }

    // -------------------------------------------------------------------------
    // Paging
    // -------------------------------------------------------------------------

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.visible.len(), self.page_size)
    }

    /// Moves to `page`, clamped into range.
    pub fn go_to(&mut self, page: usize) {
        self.current_page = page.clamp(1, self.total_pages());
    }

    /// Advances one page. Returns `false` on the last page.
    pub fn next_page(&mut self) -> bool {
        if self.current_page < self.total_pages() {
            self.current_page += 1;
            true
        } else {
            false
        }
    }

    /// Steps back one page. Returns `false` on the first page.
    pub fn previous_page(&mut self) -> bool {
        if self.current_page > 1 {
            self.current_page -= 1;
            true
        } else {
            false
        }
    }

    /// The current page of the filtered view.
    pub fn page(&self) -> Page<T> {
        paginate(&self.visible, self.page_size, self.current_page)
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn visible(&self) -> &[T] {
        &self.visible
    }

    pub fn into_records(self) -> Vec<T> {
        self.records
    }
}

impl<T: Searchable + Entity> ListView<T> {
    /// Adds a freshly created record at the top and returns to page 1.
    ///
    /// The record joins the filtered view only if it passes the current
    /// search and filter.
    pub fn insert(&mut self, record: T) {
        if self.admits(&record) {
            self.visible.insert(0, record.clone());
        }
        self.records.insert(0, record);
        if let Some(order) = self.order {
            self.records.sort_by(order);
            self.visible.sort_by(order);
        }
        self.current_page = 1;
    }

    /// Swaps in an edited record wherever its id appears. The page stays.
    ///
    /// Returns `false` when no record has that id.
    pub fn replace(&mut self, record: T) -> bool {
        let Some(slot) = self.records.iter_mut().find(|r| r.id() == record.id()) else {
            return false;
        };
        *slot = record.clone();
        if let Some(slot) = self.visible.iter_mut().find(|r| r.id() == record.id()) {
            *slot = record;
        }
        true
    }

    /// Drops the record with `id` from both collections.
    ///
    /// When that empties the current page and it is not the first, the
    /// view steps back exactly one page.
    pub fn remove(&mut self, id: &str) -> Option<T> {
        let index = self.records.iter().position(|r| r.id() == id)?;
        let removed = self.records.remove(index);
        self.visible.retain(|r| r.id() != id);

        let first_on_page = (self.current_page - 1) * self.page_size;
        if self.current_page > 1 && first_on_page >= self.visible.len() {
            self.current_page -= 1;
        }
        Some(removed)
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.records.iter().find(|r| r.id() == id)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
