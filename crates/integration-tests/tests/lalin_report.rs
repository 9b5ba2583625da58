//! Dashboard and traffic report pages, including the CSV export.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, header};

use lalin_core::report::CSV_HEADER;
use lalin_integration_tests::TestContext;

#[tokio::test]
async fn test_dashboard_charts_for_chosen_day() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx.get("/dashboard?tanggal=2023-11-01").await;
    assert_eq!(status, 200);
    for title in [
        "Jumlah Lalin per Metode Pembayaran",
        "Jumlah Lalin per Gerbang",
        "Jumlah Lalin per Shift",
        "Jumlah Lalin per Cabang",
    ] {
        assert!(body.contains(title), "{title}");
    }
    assert!(body.contains("Kapal Betung"));

    let calls = ctx.backend.calls();
    assert_eq!(calls.len(), 2, "{calls:?}");
    let traffic = calls.iter().find(|c| c.path == "/api/lalins").unwrap();
    assert_eq!(traffic.query.as_deref(), Some("2023-11-01"));
}

#[tokio::test]
async fn test_malformed_date_falls_back_to_default_day() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx.get("/dashboard?tanggal=not-a-date").await;
    assert_eq!(status, 200);
    assert!(body.contains("Jumlah Lalin per Shift"));

    let calls = ctx.backend.calls();
    let traffic = calls.iter().find(|c| c.path == "/api/lalins").unwrap();
    assert_eq!(traffic.query.as_deref(), Some("2023-11-01"));
}

#[tokio::test]
async fn test_report_table_joins_gate_names_and_searches() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx.get("/lalin?tanggal=2023-11-01").await;
    assert_eq!(status, 200);
    assert!(body.contains("Kayu Agung"));
    assert!(body.contains("Cikampek Utama"));
    assert!(body.contains("1 November 2023"));

    let (_, _, body) = ctx.get("/lalin?tanggal=2023-11-01&q=cikampek").await;
    assert!(body.contains("Cikampek Utama"));
    assert!(!body.contains("<small class=\"muted\">Kayu Agung</small>"));
}

#[tokio::test]
async fn test_export_downloads_whole_day() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let response = ctx
        .client
        .get(ctx.url("/lalin/export?tanggal=2023-11-01&q=cikampek"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"lalin_report_2023-11-01.csv\""
    );
    assert!(
        response.headers()[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("text/csv")
    );

    let body = response.text().await.unwrap();
    let lines: Vec<&str> = body.lines().collect();
    assert_eq!(lines[0], CSV_HEADER.join(","));
    // Search does not narrow the export.
    assert_eq!(lines.len(), 4);
    assert_eq!(
        lines[1],
        r#""1","1","1 November 2023","01:00:00","1","5","0","0","0","2","0","0","0","0""#
    );

    let calls = ctx.backend.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].method, Method::GET);
    assert_eq!(calls[0].path, "/api/lalins");
}

#[tokio::test]
async fn test_export_empty_day_is_header_only() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx.get("/lalin/export?tanggal=2024-01-01").await;
    assert_eq!(status, 200);
    assert_eq!(body, CSV_HEADER.join(","));
}
