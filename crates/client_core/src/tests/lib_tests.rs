use super::*;
use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use shared::error::ErrorCode;
use tokio::net::TcpListener;

#[derive(Clone, Default)]
struct Captured {
    create_bodies: Arc<Mutex<Vec<serde_json::Value>>>,
}

async fn serve(router: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("serve");
    });
    format!("http://{addr}")
}

#[tokio::test]
async fn list_contacts_parses_the_contacts_field_in_order() {
    let router = Router::new().route(
        "/contacts",
        get(|| async {
            Json(serde_json::json!({
                "contacts": [
                    {"id": 1, "firstName": "A", "lastName": "One", "email": "a@x.io"},
                    {"id": 2, "firstName": "B", "lastName": "Two", "email": "b@x.io"}
                ]
            }))
        }),
    );
    let url = serve(router).await;

    let client = ContactsClient::new(url);
    let contacts = client.list_contacts().await.expect("list");
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].id, ContactId(1));
    assert_eq!(contacts[1].id, ContactId(2));
}

#[tokio::test]
async fn missing_contacts_field_is_a_malformed_response() {
    let router = Router::new().route(
        "/contacts",
        get(|| async { Json(serde_json::json!({"people": []})) }),
    );
    let url = serve(router).await;

    let client = ContactsClient::new(url);
    let err = client.list_contacts().await.expect_err("should fail");
    assert!(matches!(err, ClientError::MalformedResponse(_)));
}

#[tokio::test]
async fn error_status_carries_the_backend_message() {
    let router = Router::new().route(
        "/contacts",
        get(|| async {
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(ErrorCode::Internal, "database exploded")),
            )
        }),
    );
    let url = serve(router).await;

    let client = ContactsClient::new(url);
    let err = client.list_contacts().await.expect_err("should fail");
    match err {
        ClientError::Status { status, message } => {
            assert_eq!(status, 500);
            assert_eq!(message, "database exploded");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[tokio::test]
async fn unreachable_server_is_a_transport_error() {
    // Bind and drop to get a port with nothing listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let client = ContactsClient::new(format!("http://{addr}"));
    let err = client.list_contacts().await.expect_err("should fail");
    assert!(matches!(err, ClientError::Transport { .. }));
}

#[tokio::test]
async fn create_contact_posts_camel_case_fields() {
    let captured = Captured::default();
    let router = Router::new()
        .route(
            "/create_contact",
            post(
                |State(captured): State<Captured>, Json(body): Json<serde_json::Value>| async move {
                    captured.create_bodies.lock().expect("lock").push(body);
                    StatusCode::CREATED
                },
            ),
        )
        .with_state(captured.clone());
    let url = serve(router).await;

    let client = ContactsClient::new(url);
    client
        .create_contact(&CreateContactRequest {
            first_name: "Ada".to_string(),
            last_name: "Lovelace".to_string(),
            email: "ada@example.com".to_string(),
        })
        .await
        .expect("create");

    let bodies = captured.create_bodies.lock().expect("lock");
    assert_eq!(bodies.len(), 1);
    assert_eq!(bodies[0]["firstName"], "Ada");
    assert_eq!(bodies[0]["lastName"], "Lovelace");
}

#[tokio::test]
async fn update_and_delete_hit_the_id_scoped_routes() {
    let router = Router::new()
        .route(
            "/update_contact/:id",
            axum::routing::patch(
                |axum::extract::Path(id): axum::extract::Path<i64>| async move {
                    assert_eq!(id, 7);
                    StatusCode::OK
                },
            ),
        )
        .route(
            "/delete_contact/:id",
            axum::routing::delete(
                |axum::extract::Path(id): axum::extract::Path<i64>| async move {
                    assert_eq!(id, 7);
                    StatusCode::OK
                },
            ),
        );
    let url = serve(router).await;

    let client = ContactsClient::new(url);
    client
        .update_contact(
            ContactId(7),
            &UpdateContactRequest {
                first_name: Some("Augusta".to_string()),
                ..Default::default()
            },
        )
        .await
        .expect("update");
    client.delete_contact(ContactId(7)).await.expect("delete");
}
