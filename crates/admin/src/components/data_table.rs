//! Data table component types.
//!
//! These types define the configuration for the paged tables of the
//! dashboard and the pager rendered under them.

use lalin_core::PaymentMethod;
use lalin_core::listing::Page;

/// Column definition for a data table.
#[derive(Debug, Clone)]
pub struct TableColumn {
    /// Unique key for the column.
    pub key: String,
    /// Display label for the column header.
    pub label: String,
    /// Whether cells are right-aligned numbers.
    pub numeric: bool,
}

impl TableColumn {
    /// Create a new text column.
    #[must_use]
    pub fn new(key: &str, label: &str) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            numeric: false,
        }
    }

    /// Create a new numeric column.
    #[must_use]
    pub fn numeric(key: &str, label: &str) -> Self {
        Self {
            numeric: true,
            ..Self::new(key, label)
        }
    }
}

/// Configuration for a data table.
#[derive(Debug, Clone)]
pub struct DataTableConfig {
    /// Unique table identifier.
    pub table_id: String,
    /// Column definitions.
    pub columns: Vec<TableColumn>,
    /// Search placeholder text.
    pub search_placeholder: String,
    /// Title for empty state.
    pub empty_title: String,
    /// Description for empty state.
    pub empty_description: Option<String>,
}

impl DataTableConfig {
    /// Create a new data table configuration.
    #[must_use]
    pub fn new(table_id: &str) -> Self {
        Self {
            table_id: table_id.to_string(),
            columns: vec![],
            search_placeholder: "Search...".to_string(),
            empty_title: "No data".to_string(),
            empty_description: None,
        }
    }

    /// Add a column.
    #[must_use]
    pub fn column(mut self, column: TableColumn) -> Self {
        self.columns.push(column);
        self
    }

    /// Set search placeholder.
    #[must_use]
    pub fn search_placeholder(mut self, placeholder: &str) -> Self {
        self.search_placeholder = placeholder.to_string();
        self
    }

    /// Set empty state configuration.
    #[must_use]
    pub fn empty_state(mut self, title: &str, description: Option<&str>) -> Self {
        self.empty_title = title.to_string();
        self.empty_description = description.map(ToString::to_string);
        self
    }

    /// Number of columns, for `colspan` on the empty row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.columns.len()
    }
}

/// Build the gate master table configuration.
#[must_use]
pub fn gerbang_table_config() -> DataTableConfig {
    DataTableConfig::new("gerbang")
        .column(TableColumn::numeric("id", "ID"))
        .column(TableColumn::new("gate_name", "Nama Gerbang"))
        .column(TableColumn::new("branch_name", "Nama Cabang"))
        .column(TableColumn::new("actions", "Aksi"))
        .search_placeholder("Search Gerbang")
        .empty_state("Tidak ada data gerbang", Some("Tambahkan gerbang baru atau ubah pencarian"))
}

/// Build the traffic report table configuration.
///
/// Payment columns follow the export: cash then the electronic channels.
#[must_use]
pub fn lalin_table_config() -> DataTableConfig {
    let base = DataTableConfig::new("lalin")
        .column(TableColumn::numeric("id", "ID"))
        .column(TableColumn::new("gate", "Gerbang"))
        .column(TableColumn::new("date", "Tanggal"))
        .column(TableColumn::new("time", "Waktu"))
        .column(TableColumn::numeric("shift", "Shift"))
        .column(TableColumn::numeric(
            PaymentMethod::Cash.field_name(),
            PaymentMethod::Cash.label(),
        ));

    PaymentMethod::ELECTRONIC
        .iter()
        .fold(base, |config, method| {
            config.column(TableColumn::numeric(method.field_name(), method.label()))
        })
        .search_placeholder("Cari gerbang atau cabang")
        .empty_state(
            "Tidak ada data lalin",
            Some("Pilih tanggal lain atau ubah pencarian"),
        )
}

// =============================================================================
// Pagination
// =============================================================================

/// One numbered link in the pager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub is_current: bool,
}

/// Pager state rendered under a table.
#[derive(Debug, Clone)]
pub struct PaginationView {
    pub number: usize,
    pub total_pages: usize,
    pub total_items: usize,
    /// 1-based index of the first row on the page (0 when empty).
    pub first_row: usize,
    /// 1-based index of the last row on the page (0 when empty).
    pub last_row: usize,
    pub previous_href: Option<String>,
    pub next_href: Option<String>,
    pub links: Vec<PageLink>,
}

impl PaginationView {
    /// Build the pager for `page`, linking to `path` with `params` kept.
    #[must_use]
    pub fn new<T>(page: &Page<T>, path: &str, params: &[(&str, &str)]) -> Self {
        let href = |number: usize| page_href(path, params, number);

        Self {
            number: page.number,
            total_pages: page.total_pages,
            total_items: page.total_items,
            first_row: page.first_row(),
            last_row: page.first_row().saturating_sub(1) + page.items.len(),
            previous_href: page.has_previous().then(|| href(page.previous())),
            next_href: page.has_next().then(|| href(page.next())),
            links: (1..=page.total_pages)
                .map(|number| PageLink {
                    number,
                    href: href(number),
                    is_current: number == page.number,
                })
                .collect(),
        }
    }
}

/// Link to `page` of `path`, dropping empty parameters.
#[must_use]
pub fn page_href(path: &str, params: &[(&str, &str)], page: usize) -> String {
    let mut query: Vec<String> = params
        .iter()
        .filter(|(_, value)| !value.is_empty())
        .map(|(key, value)| format!("{key}={}", urlencoding::encode(value)))
        .collect();
    query.push(format!("page={page}"));
    format!("{path}?{}", query.join("&"))
}
