mod common;

use chorrus_core::{
    AssignmentStatus, ChoreFilter, ChoreUpdate, DueDate, NewChore, RecurrenceInterval,
};
use common::*;
use serde_json::json;
use time::macros::date;
use uuid::Uuid;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn chore_id() -> Uuid {
    CHORE_ID.parse().unwrap()
}

#[tokio::test]
async fn include_completed_is_sent_as_a_literal_boolean() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/chores/")))
        .and(query_param("include_completed", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            chore_json(CHORE_ID, "Dishes", &["pending"])
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/chores/")))
        .and(query_param("include_completed", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let open = client.chores().list(false).await.expect("open");
    assert_eq!(open.len(), 1);
    assert_eq!(open[0].title, "Dishes");
    assert_eq!(open[0].assignments[0].status, AssignmentStatus::Pending);

    let all = client.chores().list(true).await.expect("all");
    assert!(all.is_empty());
}

#[tokio::test]
async fn list_mine_uses_the_my_chores_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/chores/my-chores")))
        .and(query_param("include_completed", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            chore_json(CHORE_ID, "Bins", &["completed"])
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let mine = client.chores().list_mine(true).await.expect("mine");
    assert!(mine[0].is_fully_completed());
}

#[tokio::test]
async fn create_sends_is_recurring_false_and_omits_unset_fields() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/chores/")))
        .and(body_json(json!({
            "title": "Dishes",
            "due_date": "2024-01-01",
            "is_recurring": false
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chore_json(CHORE_ID, "Dishes", &[])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let chore = client
        .chores()
        .create(&NewChore::new("Dishes", DueDate::new(date!(2024 - 01 - 01))))
        .await
        .expect("create");
    assert_eq!(chore.id, chore_id());
    assert!(!chore.is_recurring);
}

#[tokio::test]
async fn create_sends_recurrence_and_assignees() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/chores/")))
        .and(body_json(json!({
            "title": "Vacuum",
            "description": "Living room",
            "due_date": "2024-02-10",
            "is_recurring": true,
            "recurrence_interval": "bi-weekly",
            "assigned_user_ids": [USER_ID]
        })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chore_json(CHORE_ID, "Vacuum", &["pending"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let new = NewChore::new("Vacuum", DueDate::new(date!(2024 - 02 - 10)))
        .with_description("Living room")
        .recurring(RecurrenceInterval::BiWeekly)
        .assigned_to([USER_ID.parse::<Uuid>().unwrap()]);
    client.chores().create(&new).await.expect("create");
}

#[tokio::test]
async fn invalid_chore_is_rejected_without_a_request() {
    let server = MockServer::start().await;
    let (client, provider) = signed_in_client(&server).await;

    let err = client
        .chores()
        .create(&NewChore::new("", DueDate::new(date!(2024 - 01 - 01))))
        .await
        .expect_err("empty title");
    assert!(matches!(
        err,
        chorrus_client::ClientError::Request(chorrus_client::RequestError::InvalidInput(_))
    ));
    assert_eq!(provider.issued_tokens(), 0);
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn update_sends_only_set_fields() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .and(path(format!("{API}/chores/{CHORE_ID}")))
        .and(body_json(json!({ "title": "Dishes (evening)" })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(chore_json(CHORE_ID, "Dishes (evening)", &[])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let update = ChoreUpdate {
        title: Some("Dishes (evening)".to_string()),
        ..Default::default()
    };
    let chore = client
        .chores()
        .update(chore_id(), &update)
        .await
        .expect("update");
    assert_eq!(chore.title, "Dishes (evening)");
}

#[tokio::test]
async fn delete_ignores_the_message_body() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path(format!("{API}/chores/{CHORE_ID}")))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "Chore deleted successfully"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    client.chores().delete(chore_id()).await.expect("delete");
}

#[tokio::test]
async fn mark_complete_returns_the_assignment() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("{API}/chores/{CHORE_ID}/complete")))
        .respond_with(ResponseTemplate::new(200).set_body_json(assignment_json("completed")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let assignment = client
        .chores()
        .mark_complete(chore_id())
        .await
        .expect("complete");
    assert!(assignment.is_completed());
    assert!(assignment.completed_at.is_some());
}

#[tokio::test]
async fn filtered_listing_requests_and_filters() {
    let server = MockServer::start().await;
    let done = "aaaaaaaa-0000-4000-8000-000000000001";
    let mixed = "aaaaaaaa-0000-4000-8000-000000000002";
    Mock::given(method("GET"))
        .and(path(format!("{API}/chores/")))
        .and(query_param("include_completed", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            chore_json(done, "Laundry", &["completed", "completed"]),
            chore_json(mixed, "Groceries", &["completed", "pending"]),
        ])))
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let completed = client
        .chores()
        .list_filtered(ChoreFilter::Completed)
        .await
        .expect("completed");
    assert_eq!(completed.len(), 1);
    assert_eq!(completed[0].title, "Laundry");

    let all = client
        .chores()
        .list_filtered(ChoreFilter::All)
        .await
        .expect("all");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn dashboard_resolves_household_of_first_chore() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/chores/my-chores")))
        .and(query_param("include_completed", "false"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            chore_json(CHORE_ID, "Dishes", &["pending"])
        ])))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/households/{HOUSEHOLD_ID}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(household_json("Flat 4")))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let dashboard = client.dashboard().await.expect("dashboard");
    assert_eq!(dashboard.my_chores.len(), 1);
    assert_eq!(dashboard.pending_count(), 1);
    assert_eq!(dashboard.household.expect("household").name, "Flat 4");
}

#[tokio::test]
async fn dashboard_without_chores_skips_household() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path(format!("{API}/chores/my-chores")))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&server)
        .await;

    let (client, _) = signed_in_client(&server).await;
    let dashboard = client.dashboard().await.expect("dashboard");
    assert!(dashboard.my_chores.is_empty());
    assert!(dashboard.household.is_none());
}
