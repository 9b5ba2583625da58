//! Traffic report route handlers.
//!
//! The table searches and pages the day's records joined with gate names;
//! the export always covers the whole day.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDate;
use tracing::instrument;

use lalin_core::listing::{filter_items, paginate};
use lalin_core::report::{CSV_CONTENT_TYPE, export_filename, traffic_csv};
use lalin_core::{GateDirectory, PaymentMethod, TrafficEntry};

use crate::components::data_table::{DataTableConfig, PaginationView, lalin_table_config};
use crate::{filters, middleware::RequireSession, state::AppState};

use super::{LayoutView, ListQuery, Notice, NoticeQuery, redirect_with, render};

const LIST_PATH: &str = "/lalin";

/// Traffic row view.
#[derive(Debug, Clone)]
pub struct LalinRowView {
    pub id: String,
    pub gate_id: String,
    /// Gate name, `-` when the gate is unknown.
    pub gate_name: String,
    pub date: String,
    pub time: String,
    pub shift: String,
    /// Cash then the electronic channels, in table order.
    pub payments: Vec<i64>,
}

impl From<&TrafficEntry> for LalinRowView {
    fn from(entry: &TrafficEntry) -> Self {
        let record = &entry.record;
        let payments = std::iter::once(PaymentMethod::Cash)
            .chain(PaymentMethod::ELECTRONIC)
            .map(|method| record.payments.get(method))
            .collect();

        Self {
            id: record.id.to_string(),
            gate_id: record.gate_id.to_string(),
            gate_name: entry.gate_name.clone().unwrap_or_else(|| "-".to_string()),
            date: record.timestamp.long_date_id(),
            time: record.timestamp.time_of_day(),
            shift: record.shift_code.to_string(),
            payments,
        }
    }
}

/// Traffic report template.
#[derive(Template)]
#[template(path = "lalin/index.html")]
pub struct LalinIndexTemplate {
    pub layout: LayoutView,
    pub notices: Vec<Notice>,
    pub table: DataTableConfig,
    pub tanggal: String,
    pub search: String,
    pub rows: Vec<LalinRowView>,
    pub pagination: PaginationView,
    pub export_href: String,
    pub record_count: usize,
}

/// Build the traffic router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/lalin", get(index))
        .route("/lalin/export", get(export))
}

/// Traffic table with search and paging.
///
/// GET /lalin?tanggal=&q=&page=
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Query(query): Query<ListQuery>,
    Query(notice_query): Query<NoticeQuery>,
) -> Response {
    let date = query.date_or(state.config().default_date);
    let api = state.api_for(&session);
    let mut notices = notice_query.into_notices();

    let (gates, traffic) = tokio::join!(api.list_gates(), api.list_traffic(date));
    let gates = gates.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load gates for report");
        notices.push(Notice::error(format!("Gagal memuat data gerbang: {}", e.user_message())));
        Vec::new()
    });
    let traffic = traffic.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load traffic");
        notices.push(Notice::error(format!("Gagal memuat data lalin: {}", e.user_message())));
        Vec::new()
    });

    let directory = GateDirectory::new(&gates);
    let entries = TrafficEntry::join_all(&traffic, &directory);

    let tanggal = format_date(date);
    let search = query.search();
    let page = paginate(filter_items(&entries, &search), query.page());
    let pagination = PaginationView::new(
        &page,
        LIST_PATH,
        &[("tanggal", &tanggal), ("q", &search)],
    );

    render(&LalinIndexTemplate {
        layout: LayoutView::new(&session.username, "Lalin Report", LIST_PATH),
        notices,
        table: lalin_table_config(),
        export_href: format!("/lalin/export?tanggal={tanggal}"),
        tanggal,
        search,
        rows: page.items.iter().map(LalinRowView::from).collect(),
        pagination,
        record_count: traffic.len(),
    })
    .into_response()
}

/// Download the day's records as CSV.
///
/// GET /lalin/export?tanggal=
#[instrument(skip_all)]
async fn export(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Query(query): Query<ListQuery>,
) -> Response {
    let date = query.date_or(state.config().default_date);

    match state.api_for(&session).list_traffic(date).await {
        Ok(records) => {
            tracing::info!(count = records.len(), tanggal = %date, "Exporting traffic report");
            csv_response(date, &traffic_csv(&records))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load traffic for export");
            redirect_with(
                &format!("{LIST_PATH}?tanggal={}", format_date(date)),
                &Notice::error(format!("Export failed: {}", e.user_message())),
            )
            .into_response()
        }
    }
}

fn csv_response(date: NaiveDate, body: &str) -> Response {
    (
        [
            (header::CONTENT_TYPE, CSV_CONTENT_TYPE.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", export_filename(date)),
            ),
        ],
        body.to_string(),
    )
        .into_response()
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
