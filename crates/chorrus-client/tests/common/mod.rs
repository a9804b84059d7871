#![allow(dead_code)]

use std::sync::Arc;

use chorrus_auth::{Identity, MemoryTokenProvider, SessionStore};
use chorrus_client::{ApiClient, ClientConfig};
use serde_json::{Value, json};
use wiremock::MockServer;

pub const USER_ID: &str = "6f1f6d0e-4b57-4c59-9a39-1f3b1d9c2a10";
pub const HOUSEHOLD_ID: &str = "0b6f1c4e-2f0a-4e5b-8d7c-3a9e8f1d2c34";
pub const CHORE_ID: &str = "9c2d7e1a-5b3f-4a8e-b6d4-7f0e1c2a3b45";
pub const ASSIGNMENT_ID: &str = "1a2b3c4d-5e6f-4a7b-8c9d-0e1f2a3b4c5d";

/// Base path every service call is relative to.
pub const API: &str = "/api/v1";

pub fn config_for(server: &MockServer) -> ClientConfig {
    ClientConfig::default().with_api_url(server.uri())
}

/// Client whose provider mints `tok-1`, `tok-2`, ... per request.
pub async fn signed_in_client(server: &MockServer) -> (ApiClient, Arc<MemoryTokenProvider>) {
    let provider = Arc::new(MemoryTokenProvider::minting(
        Identity::new("firebase-uid-1").with_email("sam@example.com"),
        "tok",
    ));
    let session = SessionStore::new_shared(provider.clone());
    session.initialize().expect("initialize");
    let ready = session.ready().await.expect("ready");
    assert!(ready.is_authenticated());
    let client = ApiClient::new(&config_for(server), session).expect("client");
    (client, provider)
}

pub async fn anonymous_client(server: &MockServer) -> (ApiClient, Arc<MemoryTokenProvider>) {
    let provider = Arc::new(MemoryTokenProvider::anonymous());
    let session = SessionStore::new_shared(provider.clone());
    session.initialize().expect("initialize");
    session.ready().await.expect("ready");
    let client = ApiClient::new(&config_for(server), session).expect("client");
    (client, provider)
}

pub fn assignment_json(status: &str) -> Value {
    json!({
        "id": ASSIGNMENT_ID,
        "chore_id": CHORE_ID,
        "user_id": USER_ID,
        "status": status,
        "completed_at": if status == "completed" { json!("2024-01-02T09:30:00.123456") } else { Value::Null },
        "created_at": "2024-01-01T08:00:00.123456"
    })
}

pub fn chore_json(id: &str, title: &str, statuses: &[&str]) -> Value {
    let assignments: Vec<Value> = statuses.iter().map(|s| assignment_json(s)).collect();
    json!({
        "id": id,
        "household_id": HOUSEHOLD_ID,
        "created_by_id": USER_ID,
        "title": title,
        "description": null,
        "due_date": "2024-01-05",
        "is_recurring": false,
        "recurrence_interval": null,
        "created_at": "2024-01-01T08:00:00.123456",
        "assignments": assignments
    })
}

pub fn household_json(name: &str) -> Value {
    json!({
        "id": HOUSEHOLD_ID,
        "name": name,
        "admin_id": USER_ID,
        "invite_code": "ABC123",
        "created_at": "2024-01-01T08:00:00",
        "members": [{
            "id": USER_ID,
            "email": "sam@example.com",
            "display_name": "Sam",
            "household_id": HOUSEHOLD_ID,
            "created_at": "2024-01-01T08:00:00"
        }]
    })
}
