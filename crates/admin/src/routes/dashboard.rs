//! Dashboard route handler.
//!
//! Fetches the gate and traffic collections of one day concurrently and
//! charts four aggregates as server-rendered bars.

use askama::Template;
use axum::{
    Router,
    extract::{Query, State},
    response::Html,
    routing::get,
};
use chrono::NaiveDate;
use tracing::instrument;

use lalin_core::stats::{DashboardStats, Tally};
use lalin_core::long_date_id;

use crate::{filters, middleware::RequireSession, state::AppState};

use super::{LayoutView, ListQuery, Notice, NoticeQuery, render};

/// One bar of a chart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarView {
    pub label: String,
    pub value: i64,
    /// Share of the chart total, e.g. `"12.5%"`.
    pub share: String,
    /// Bar length relative to the largest bar, 0-100.
    pub width: u8,
}

/// A titled bar chart.
#[derive(Debug, Clone)]
pub struct ChartView {
    pub title: &'static str,
    pub total: i64,
    pub bars: Vec<BarView>,
}

impl ChartView {
    #[must_use]
    pub fn new(title: &'static str, tallies: &[Tally]) -> Self {
        let total: i64 = tallies.iter().map(|t| t.value).sum();
        let max = tallies.iter().map(|t| t.value).max().unwrap_or(0);

        Self {
            title,
            total,
            bars: tallies
                .iter()
                .map(|t| BarView {
                    label: t.label.clone(),
                    value: t.value,
                    share: format_share(t.value, total),
                    width: scale(t.value, max),
                })
                .collect(),
        }
    }

    /// Whether every bar is zero.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bars.iter().all(|b| b.value == 0)
    }
}

/// Dashboard template.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate {
    pub layout: LayoutView,
    pub notices: Vec<Notice>,
    pub tanggal: String,
    pub tanggal_label: String,
    pub record_count: usize,
    pub vehicle_total: i64,
    pub gate_count: usize,
    pub charts: Vec<ChartView>,
}

/// Build the dashboard router.
pub fn router() -> Router<AppState> {
    Router::new().route("/dashboard", get(index))
}

/// Dashboard page.
///
/// GET /dashboard?tanggal=YYYY-MM-DD
#[instrument(skip_all)]
async fn index(
    State(state): State<AppState>,
    RequireSession(session): RequireSession,
    Query(query): Query<ListQuery>,
    Query(notice_query): Query<NoticeQuery>,
) -> Html<String> {
    let date = query.date_or(state.config().default_date);
    let api = state.api_for(&session);
    let mut notices = notice_query.into_notices();

    let (gates, traffic) = tokio::join!(api.list_gates(), api.list_traffic(date));
    let gates = gates.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load gates for dashboard");
        notices.push(Notice::error(format!("Gagal memuat data gerbang: {}", e.user_message())));
        Vec::new()
    });
    let traffic = traffic.unwrap_or_else(|e| {
        tracing::warn!(error = %e, "Failed to load traffic for dashboard");
        notices.push(Notice::error(format!("Gagal memuat data lalin: {}", e.user_message())));
        Vec::new()
    });

    let stats = DashboardStats::compute(&gates, &traffic);
    render(&build_template(&session.username, date, notices, gates.len(), &stats))
}

fn build_template(
    username: &str,
    date: NaiveDate,
    notices: Vec<Notice>,
    gate_count: usize,
    stats: &DashboardStats,
) -> DashboardTemplate {
    DashboardTemplate {
        layout: LayoutView::new(username, "Dashboard", "/dashboard"),
        notices,
        tanggal: date.format("%Y-%m-%d").to_string(),
        tanggal_label: long_date_id(date),
        record_count: stats.record_count,
        vehicle_total: stats.payment_totals.iter().map(|t| t.value).sum(),
        gate_count,
        charts: vec![
            ChartView::new("Jumlah Lalin per Metode Pembayaran", &stats.payment_totals),
            ChartView::new("Jumlah Lalin per Gerbang", &stats.gate_counts),
            ChartView::new("Jumlah Lalin per Shift", &stats.shift_counts),
            ChartView::new("Jumlah Lalin per Cabang", &stats.branch_counts),
        ],
    }
}

// =============================================================================
// Helpers
// =============================================================================

#[allow(clippy::cast_precision_loss)]
fn format_share(value: i64, total: i64) -> String {
    if total <= 0 {
        return "0%".to_string();
    }
    let share = value as f64 * 100.0 / total as f64;
    format!("{share:.1}%")
}

fn scale(value: i64, max: i64) -> u8 {
    if max <= 0 || value <= 0 {
        return 0;
    }
    let width = (value.saturating_mul(100) / max).clamp(1, 100);
    u8::try_from(width).unwrap_or(100)
}

#[cfg(test)]
mod tests {
    use lalin_core::{BranchId, GateId, GateRecord, TrafficRecord};

    use super::*;

    fn tally(label: &str, value: i64) -> Tally {
        Tally {
            label: label.to_string(),
            value,
        }
    }

    #[test]
    fn test_chart_shares_and_widths() {
        let chart = ChartView::new(
            "Shift",
            &[tally("Shift 1", 3), tally("Shift 2", 1), tally("Shift 3", 0)],
        );
        assert_eq!(chart.total, 4);
        let shares: Vec<&str> = chart.bars.iter().map(|b| b.share.as_str()).collect();
        assert_eq!(shares, vec!["75.0%", "25.0%", "0.0%"]);
        let widths: Vec<u8> = chart.bars.iter().map(|b| b.width).collect();
        assert_eq!(widths, vec![100, 33, 0]);
        assert!(!chart.is_empty());
    }

    #[test]
    fn test_empty_chart() {
        let chart = ChartView::new("Cabang", &[tally("A", 0)]);
        assert!(chart.is_empty());
        assert_eq!(chart.bars.first().map(|b| b.share.as_str()), Some("0%"));
    }

    #[test]
    fn test_dashboard_template_renders_all_charts() {
        let gates = vec![GateRecord {
            id: GateId::new(1),
            branch_id: BranchId::new(16),
            gate_name: "Kayu Agung".to_string(),
            branch_name: "Kapal Betung".to_string(),
        }];
        let traffic: Vec<TrafficRecord> = serde_json::from_str(
            r#"[{"id": 1, "IdGerbang": 1, "IdCabang": 16, "Tanggal": "2023-11-01T08:00:00",
                 "Shift": 2, "Tunai": 1234, "eBca": 1}]"#,
        )
        .unwrap_or_default();
        let stats = DashboardStats::compute(&gates, &traffic);
        let date = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap_or_default();

        let html = build_template("admin", date, vec![], gates.len(), &stats)
            .render()
            .unwrap_or_default();

        assert!(html.contains("Jumlah Lalin per Metode Pembayaran"));
        assert!(html.contains("Jumlah Lalin per Cabang"));
        assert!(html.contains("Kayu Agung"));
        assert!(html.contains("1 November 2023"));
        assert!(html.contains("1.235"), "vehicle total uses thousands separators");
    }
}
