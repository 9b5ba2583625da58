//! The backend client on its own, against the mock backend.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::time::Duration;

use axum::http::StatusCode;
use chrono::NaiveDate;
use secrecy::SecretString;

use lalin_admin::api::{ApiError, LalinApiClient, LoginOutcome};
use lalin_admin::config::ApiConfig;
use lalin_core::{BranchId, GateId, GateKey, GateRecord, Shift};
use lalin_integration_tests::{MockBackend, PASSWORD, USERNAME, sample_gates, sample_traffic};

fn client(backend: &MockBackend) -> LalinApiClient {
    let config = ApiConfig::new(&backend.base_url(), Duration::from_secs(5)).unwrap();
    LalinApiClient::new(&config).unwrap()
}

async fn logged_in(backend: &MockBackend) -> LalinApiClient {
    let api = client(backend);
    match api
        .login(USERNAME, &SecretString::from(PASSWORD.to_string()))
        .await
        .unwrap()
    {
        LoginOutcome::Authenticated(token) => api.with_token(token),
        LoginOutcome::Rejected(message) => panic!("login rejected: {message}"),
    }
}

#[tokio::test]
async fn test_login_rejection_carries_message() {
    let backend = MockBackend::start(vec![], vec![]).await;
    let api = client(&backend);

    let outcome = api
        .login(USERNAME, &SecretString::from("nope".to_string()))
        .await
        .unwrap();

    assert!(matches!(outcome, LoginOutcome::Rejected(m) if m == "Username atau password salah"));
}

#[tokio::test]
async fn test_list_endpoints_unwrap_envelope() {
    let backend = MockBackend::start(sample_gates(), sample_traffic()).await;
    let api = logged_in(&backend).await;

    let gates = api.list_gates().await.unwrap();
    assert_eq!(gates.len(), 2);
    assert_eq!(gates[0].gate_name, "Kayu Agung");
    assert_eq!(gates[1].branch_id, BranchId::new(21));

    let day = NaiveDate::from_ymd_opt(2023, 11, 1).unwrap();
    let traffic = api.list_traffic(day).await.unwrap();
    assert_eq!(traffic.len(), 3);
    assert_eq!(Shift::from_code(traffic[2].shift_code), Some(Shift::Third));
}

#[tokio::test]
async fn test_requests_without_token_are_refused() {
    let backend = MockBackend::start(sample_gates(), vec![]).await;
    let api = client(&backend);

    let err = api.list_gates().await.unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 401, .. }));
    assert_eq!(err.user_message(), "Unauthorized");
}

#[tokio::test]
async fn test_mutations_round_trip() {
    let backend = MockBackend::start(sample_gates(), vec![]).await;
    let api = logged_in(&backend).await;

    let gate = GateRecord {
        id: GateId::new(5),
        branch_id: BranchId::new(2),
        gate_name: "A".to_string(),
        branch_name: "B".to_string(),
    };
    api.create_gate(&gate).await.unwrap();
    assert_eq!(api.list_gates().await.unwrap().len(), 3);

    api.update_gate(&GateRecord {
        gate_name: "A2".to_string(),
        ..gate.clone()
    })
    .await
    .unwrap();
    let names: Vec<String> = api
        .list_gates()
        .await
        .unwrap()
        .into_iter()
        .map(|g| g.gate_name)
        .collect();
    assert!(names.contains(&"A2".to_string()));

    api.delete_gate(GateKey {
        id: GateId::new(5),
        branch_id: BranchId::new(2),
    })
    .await
    .unwrap();
    assert_eq!(api.list_gates().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_backend_error_message_surfaces() {
    let backend = MockBackend::start(sample_gates(), vec![]).await;
    backend.fail_mutations(StatusCode::CONFLICT, "Gerbang sudah ada");
    let api = logged_in(&backend).await;

    let err = api
        .create_gate(&GateRecord {
            id: GateId::new(1),
            branch_id: BranchId::new(16),
            gate_name: "Dup".to_string(),
            branch_name: "B".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Api { status: 409, .. }));
    assert_eq!(err.user_message(), "Gerbang sudah ada");
}

#[tokio::test]
async fn test_unreachable_backend() {
    let config = ApiConfig::new("http://127.0.0.1:9/api", Duration::from_secs(1)).unwrap();
    let api = LalinApiClient::new(&config).unwrap();

    let err = api.list_gates().await.unwrap_err();
    assert!(matches!(err, ApiError::Http(_)));
}
