//! Gate master data pages: list, create, update, delete.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use axum::http::{Method, StatusCode, header};
use serde_json::json;

use lalin_integration_tests::TestContext;

#[tokio::test]
async fn test_list_shows_gates_and_filters() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx.get("/gerbang").await;
    assert_eq!(status, 200);
    assert!(body.contains("Kayu Agung"));
    assert!(body.contains("Cikampek Utama"));

    let (_, _, body) = ctx.get("/gerbang?q=kapal").await;
    assert!(body.contains("Kayu Agung"));
    assert!(!body.contains("Cikampek Utama"));
}

#[tokio::test]
async fn test_create_sends_one_post_then_reloads() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, path, body) = ctx
        .post_form(
            "/gerbang",
            &[
                ("id", "5"),
                ("branch_id", "2"),
                ("gate_name", "A"),
                ("branch_name", "B"),
            ],
        )
        .await;

    assert_eq!(status, 200);
    assert_eq!(path, "/gerbang");
    assert!(body.contains("Gerbang created successfully!"));

    let calls = ctx.backend.calls();
    assert_eq!(calls.len(), 2, "{calls:?}");
    assert_eq!(calls[0].method, Method::POST);
    assert_eq!(calls[0].path, "/api/gerbangs");
    assert_eq!(
        calls[0].body,
        Some(json!({ "id": 5, "IdCabang": 2, "NamaGerbang": "A", "NamaCabang": "B" }))
    );
    assert_eq!(calls[1].method, Method::GET);
    assert_eq!(calls[1].path, "/api/gerbangs");
}

#[tokio::test]
async fn test_create_with_blank_field_makes_no_calls() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let response = ctx
        .raw
        .post(ctx.url("/gerbang"))
        .form(&[
            ("id", "5"),
            ("branch_id", "2"),
            ("gate_name", "A"),
            ("branch_name", ""),
        ])
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body = response.text().await.unwrap();
    assert!(body.contains("Id Gerbang, Id Cabang, Nama Gerbang, and Nama Cabang are required."));
    // The typed values survive the round trip.
    assert!(body.contains("value=\"5\""));
    assert!(ctx.backend.calls().is_empty());
}

#[tokio::test]
async fn test_create_with_non_numeric_id_makes_no_calls() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx
        .post_form(
            "/gerbang",
            &[
                ("id", "abc"),
                ("branch_id", "2"),
                ("gate_name", "A"),
                ("branch_name", "B"),
            ],
        )
        .await;

    assert_eq!(status, 422);
    assert!(body.contains("Id Gerbang must be an integer"));
    assert!(ctx.backend.calls().is_empty());
}

#[tokio::test]
async fn test_backend_failure_keeps_form() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    ctx.backend
        .fail_mutations(StatusCode::BAD_REQUEST, "Gerbang sudah ada");

    let (status, path, body) = ctx
        .post_form(
            "/gerbang",
            &[
                ("id", "1"),
                ("branch_id", "16"),
                ("gate_name", "Dup"),
                ("branch_name", "B"),
            ],
        )
        .await;

    assert_eq!(status, 502);
    assert_eq!(path, "/gerbang");
    assert!(body.contains("Gerbang sudah ada"));
    assert!(body.contains("value=\"Dup\""));
    assert_eq!(ctx.backend.calls().len(), 1);
}

#[tokio::test]
async fn test_edit_form_is_prefilled_and_update_pins_id() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx.get("/gerbang/1/edit").await;
    assert_eq!(status, 200);
    assert!(body.contains("value=\"Kayu Agung\""));
    assert!(body.contains("readonly"));
    ctx.backend.reset_calls();

    let (_, path, body) = ctx
        .post_form(
            "/gerbang/1",
            &[
                ("id", "999"),
                ("branch_id", "16"),
                ("gate_name", "Kayu Agung Baru"),
                ("branch_name", "Kapal Betung"),
            ],
        )
        .await;

    assert_eq!(path, "/gerbang");
    assert!(body.contains("Gerbang updated successfully!"));
    assert!(body.contains("Kayu Agung Baru"));

    let calls = ctx.backend.calls();
    assert_eq!(calls[0].method, Method::PUT);
    assert_eq!(calls[0].body.as_ref().unwrap()["id"], 1);
}

#[tokio::test]
async fn test_delete_confirmation_makes_no_calls() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let (status, _, body) = ctx
        .get("/gerbang/5/delete?IdCabang=2&NamaGerbang=A")
        .await;

    assert_eq!(status, 200);
    assert!(body.contains("Apakah Anda yakin ingin menghapus gerbang?"));
    assert!(body.contains("name=\"IdCabang\" value=\"2\""));
    assert!(ctx.backend.calls().is_empty());
}

#[tokio::test]
async fn test_delete_confirmed_sends_key_then_reloads() {
    let mut gates = lalin_integration_tests::sample_gates();
    gates.push(json!({ "id": 5, "IdCabang": 2, "NamaGerbang": "A", "NamaCabang": "B" }));
    let ctx = TestContext::with_fixtures(gates, vec![]).await;
    ctx.login().await;

    let (_, path, body) = ctx
        .post_form("/gerbang/5/delete", &[("IdCabang", "2")])
        .await;

    assert_eq!(path, "/gerbang");
    assert!(body.contains("Gerbang deleted successfully!"));

    let calls = ctx.backend.calls();
    assert_eq!(calls.len(), 2, "{calls:?}");
    assert_eq!(calls[0].method, Method::DELETE);
    assert_eq!(calls[0].body, Some(json!({ "id": 5, "IdCabang": 2 })));
    assert_eq!(calls[1].method, Method::GET);
    assert_eq!(ctx.backend.gates().len(), 2);
}

#[tokio::test]
async fn test_delete_without_branch_is_rejected() {
    let ctx = TestContext::new().await;
    ctx.login().await;

    let response = ctx
        .raw
        .get(ctx.url("/gerbang/5/delete"))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 303);
    let location = response.headers()[header::LOCATION].to_str().unwrap();
    assert!(location.starts_with("/gerbang?error="));
    assert!(ctx.backend.calls().is_empty());
}

#[tokio::test]
async fn test_delete_failure_is_reported() {
    let ctx = TestContext::new().await;
    ctx.login().await;
    ctx.backend
        .fail_mutations(StatusCode::INTERNAL_SERVER_ERROR, "Gagal menghapus");

    let (_, path, body) = ctx
        .post_form("/gerbang/1/delete", &[("IdCabang", "16")])
        .await;

    assert_eq!(path, "/gerbang");
    assert!(body.contains("Delete failed: Gagal menghapus"));
    assert_eq!(ctx.backend.gates().len(), 2);
}
