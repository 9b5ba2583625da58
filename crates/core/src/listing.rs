//! Search filtering and fixed-size pagination for in-memory collections.
//!
//! Every list screen works on a collection already fetched in full from the
//! backend: it is filtered by a case-insensitive substring query, then cut
//! into pages of [`PAGE_SIZE`] rows.

use std::borrow::Cow;

use crate::models::GateRecord;

/// Rows per page on every list screen.
pub const PAGE_SIZE: usize = 5;

/// Something a list screen can search.
pub trait Searchable {
    /// The text fields the search query is matched against.
    fn search_fields(&self) -> Vec<Cow<'_, str>>;

    /// Whether any field contains `needle`.
    ///
    /// `needle` must already be lowercased.
    fn matches(&self, needle: &str) -> bool {
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(needle))
    }
}

impl Searchable for GateRecord {
    fn search_fields(&self) -> Vec<Cow<'_, str>> {
        vec![
            Cow::Borrowed(self.gate_name.as_str()),
            Cow::Borrowed(self.branch_name.as_str()),
        ]
    }
}

/// Keep the items matching `query`, preserving order.
///
/// An empty query passes the collection through unchanged.
#[must_use]
pub fn filter_items<T: Searchable + Clone>(items: &[T], query: &str) -> Vec<T> {
    if query.is_empty() {
        return items.to_vec();
    }
    let needle = query.to_lowercase();
    items
        .iter()
        .filter(|item| item.matches(&needle))
        .cloned()
        .collect()
}

/// Number of pages needed for `total` items (zero for an empty collection).
#[must_use]
pub const fn page_count(total: usize) -> usize {
    total.div_ceil(PAGE_SIZE)
}

/// One page of a filtered collection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    /// Rows on this page.
    pub items: Vec<T>,
    /// 1-based page number, already clamped into range.
    pub number: usize,
    /// Pages available; at least 1 so an empty list still renders a page.
    pub total_pages: usize,
    /// Items across all pages.
    pub total_items: usize,
}

impl<T> Page<T> {
    /// Whether a previous page exists.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.number > 1
    }

    /// Whether a next page exists.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.number < self.total_pages
    }

    /// The previous page number, never below 1.
    #[must_use]
    pub const fn previous(&self) -> usize {
        if self.number > 1 { self.number - 1 } else { 1 }
    }

    /// The next page number, never beyond the last page.
    #[must_use]
    pub const fn next(&self) -> usize {
        if self.number < self.total_pages {
            self.number + 1
        } else {
            self.total_pages
        }
    }

    /// 1-based index of the first row on this page (0 when empty).
    #[must_use]
    pub const fn first_row(&self) -> usize {
        if self.items.is_empty() {
            0
        } else {
            (self.number - 1) * PAGE_SIZE + 1
        }
    }

    /// Transform the rows while keeping the paging position.
    #[must_use]
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            number: self.number,
            total_pages: self.total_pages,
            total_items: self.total_items,
        }
    }
}

/// Cut `items` into the page `requested`.
///
/// The requested page is clamped into `1..=max(1, page_count)`, so a result
/// set that shrank below the current page shows its last page instead of an
/// empty one.
#[must_use]
pub fn paginate<T>(items: Vec<T>, requested: usize) -> Page<T> {
    let total_items = items.len();
    let total_pages = page_count(total_items).max(1);
    let number = requested.clamp(1, total_pages);

    let start = (number - 1) * PAGE_SIZE;
    let items: Vec<T> = items.into_iter().skip(start).take(PAGE_SIZE).collect();

    Page {
        items,
        number,
        total_pages,
        total_items,
    }
}
