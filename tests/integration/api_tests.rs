//! API integration tests
//!
//! Require a running server with a migrated database.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Create an instrument with a unique serial number and return its JSON
async fn create_instrument(client: &Client, interval_months: Option<i32>) -> Value {
    let serial = format!("SN-{}", uuid::Uuid::new_v4().simple());
    let response = client
        .post(format!("{}/instruments", BASE_URL))
        .json(&json!({
            "name": "Clinical Centrifuge",
            "model": "Model-X100",
            "serial_number": serial,
            "location": "Lab A, Room 101",
            "installation_date": "2024-01-15T00:00:00Z",
            "maintenance_type": "calibration",
            "maintenance_interval_months": interval_months
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

async fn schedule_event(client: &Client, instrument_id: &str, date: &str) -> Value {
    let response = client
        .post(format!("{}/instruments/{}/maintenance", BASE_URL, instrument_id))
        .json(&json!({
            "date": date,
            "description": "Quarterly calibration"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    response.json().await.expect("Failed to parse response")
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_readiness_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/ready", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
}

#[tokio::test]
#[ignore]
async fn test_create_instrument_sets_initial_schedule() {
    let client = Client::new();

    let instrument = create_instrument(&client, Some(3)).await;

    assert_eq!(instrument["status"], "operational");
    assert_eq!(instrument["last_maintenance_date"], "2024-01-15T00:00:00Z");
    assert_eq!(instrument["next_maintenance_date"], "2024-04-15T00:00:00Z");
    assert_eq!(instrument["maintenance_type"], "calibration");
}

#[tokio::test]
#[ignore]
async fn test_list_instruments() {
    let client = Client::new();
    create_instrument(&client, None).await;

    let response = client
        .get(format!("{}/instruments?per_page=5", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["instruments"].is_array());
    assert!(body["total"].as_i64().unwrap() >= 1);
    assert_eq!(body["per_page"], 5);
}

#[tokio::test]
#[ignore]
async fn test_get_unknown_instrument() {
    let client = Client::new();

    let response = client
        .get(format!("{}/instruments/{}", BASE_URL, uuid::Uuid::new_v4()))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 404);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "NoSuchInstrument");
}

#[tokio::test]
#[ignore]
async fn test_due_status_overdue() {
    let client = Client::new();
    let instrument = create_instrument(&client, Some(6)).await;
    let id = instrument["id"].as_str().unwrap();

    // next maintenance is 2024-07-15
    let response = client
        .get(format!("{}/instruments/{}/due-status?at=2024-07-20T00:00:00Z", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["due"]["status"], "overdue");
}

#[tokio::test]
#[ignore]
async fn test_archive_instrument() {
    let client = Client::new();
    let instrument = create_instrument(&client, None).await;
    let id = instrument["id"].as_str().unwrap();

    let response = client
        .post(format!("{}/instruments/{}/archive", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "archived");

    let response = client
        .get(format!("{}/instruments/{}/due-status?at=2030-01-01T00:00:00Z", BASE_URL, id))
        .send()
        .await
        .expect("Failed to send request");
    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["due"]["status"], "unknown");
}

#[tokio::test]
#[ignore]
async fn test_complete_maintenance_flow() {
    let client = Client::new();
    let instrument = create_instrument(&client, Some(3)).await;
    let instrument_id = instrument["id"].as_str().unwrap();

    let event = schedule_event(&client, instrument_id, "2024-04-15T00:00:00Z").await;
    let event_id = event["id"].as_str().unwrap();
    assert_eq!(event["completed"], false);
    assert_eq!(event["event_type"], "scheduled");

    // Completed on a different day than planned
    let response = client
        .post(format!("{}/maintenance/{}/complete", BASE_URL, event_id))
        .json(&json!({
            "completion_date": "2024-04-20T00:00:00Z",
            "notes": "Rotor replaced"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["event"]["completed"], true);
    assert_eq!(body["event"]["date"], "2024-04-20T00:00:00Z");
    assert_eq!(body["event"]["notes"], "Rotor replaced");
    assert_eq!(body["instrument"]["last_maintenance_date"], "2024-04-20T00:00:00Z");
    assert_eq!(body["instrument"]["next_maintenance_date"], "2024-07-20T00:00:00Z");

    // A second completion is rejected
    let response = client
        .post(format!("{}/maintenance/{}/complete", BASE_URL, event_id))
        .json(&json!({}))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["error"], "AlreadyCompleted");
}

#[tokio::test]
#[ignore]
async fn test_maintenance_history_newest_first() {
    let client = Client::new();
    let instrument = create_instrument(&client, None).await;
    let instrument_id = instrument["id"].as_str().unwrap();

    schedule_event(&client, instrument_id, "2024-02-01T00:00:00Z").await;
    schedule_event(&client, instrument_id, "2024-05-01T00:00:00Z").await;

    let response = client
        .get(format!(
            "{}/instruments/{}/maintenance?at=2024-03-01T00:00:00Z",
            BASE_URL, instrument_id
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let entries = body.as_array().expect("Expected an array");
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["date"], "2024-05-01T00:00:00Z");
    assert_eq!(entries[0]["state"], "pending");
    assert_eq!(entries[1]["state"], "missed");
}

#[tokio::test]
#[ignore]
async fn test_dashboard() {
    let client = Client::new();
    create_instrument(&client, Some(1)).await;

    let response = client
        .get(format!("{}/dashboard/summary", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["total"].as_u64().unwrap() >= 1);
    assert!(body["overdue"].is_number());

    // next maintenance 2024-02-15 is 14 days after the reference date
    let response = client
        .get(format!(
            "{}/dashboard/upcoming?at=2024-02-01T00:00:00Z&window_days=30",
            BASE_URL
        ))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let upcoming = body.as_array().expect("Expected an array");
    assert!(upcoming.iter().any(|u| u["days_left"] == 14));

    let response = client
        .get(format!("{}/dashboard/maintenance-types", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body.as_array().unwrap().iter().any(|t| t["maintenance_type"] == "calibration"));
}
