use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use http_body_util::BodyExt;
use migration::MigratorTrait;
use sea_orm::Database;
use serde_json::{Value, json};
use tower::ServiceExt;

use engine::Engine;

async fn test_app() -> Router {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder().database(db).build().await.unwrap();
    server::app(engine)
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn trip(app: &Router) -> i64 {
    let (status, group) = send(
        app,
        Method::POST,
        "/groups",
        Some(json!({ "name": "Trip", "user_ids": [1, 2, 3] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    group["id"].as_i64().unwrap()
}

#[tokio::test]
async fn trip_expense_settlement_and_balances() {
    let app = test_app().await;
    let id = trip(&app).await;

    let (status, expense) = send(
        &app,
        Method::POST,
        &format!("/groups/{id}/expenses"),
        Some(json!({
            "description": "Hotel",
            "amount": 90.0,
            "paid_by": 1,
            "split_type": "equal",
            "splits": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(expense["split_type"], "equal");
    assert_eq!(expense["splits"].as_array().unwrap().len(), 3);

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/groups/{id}/settlements"),
        Some(json!({ "from_user": 2, "to_user": 1, "amount": 30.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, balances) = send(&app, Method::GET, &format!("/groups/{id}/balances"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balances, json!({ "1": 30.0, "2": 0.0, "3": -30.0 }));

    let (status, balances) = send(&app, Method::GET, "/users/3/balances", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(balances.as_object().unwrap().len(), 1);
    assert_eq!(balances[id.to_string()], -30.0);

    let (status, group) = send(&app, Method::GET, &format!("/groups/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["total_expenses"], 90.0);
    assert_eq!(group["user_ids"], json!([1, 2, 3]));
}

#[tokio::test]
async fn error_statuses() {
    let app = test_app().await;
    let id = trip(&app).await;

    let (status, body) = send(&app, Method::GET, "/groups/999", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "group 999 not found");

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/groups/{id}/expenses"),
        Some(json!({
            "description": "Hotel",
            "amount": 90.0,
            "paid_by": 1,
            "split_type": "shares",
            "splits": null
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/groups/{id}/expenses"),
        Some(json!({
            "description": "Hotel",
            "amount": 100.0,
            "paid_by": 1,
            "split_type": "percentage",
            "splits": [{ "user_id": 1, "share": 50.0 }, { "user_id": 4, "share": 50.0 }]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("[4]"));

    let (status, _) = send(
        &app,
        Method::POST,
        &format!("/groups/{id}/settlements"),
        Some(json!({ "from_user": 1, "to_user": 9, "amount": 10.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, expenses) = send(&app, Method::GET, &format!("/groups/{id}/expenses"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(expenses, json!([]));
}

#[tokio::test]
async fn group_lifecycle() {
    let app = test_app().await;
    let id = trip(&app).await;

    let (status, group) = send(
        &app,
        Method::PATCH,
        &format!("/groups/{id}"),
        Some(json!({ "name": "Road trip", "user_ids": [1, 2] })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(group["name"], "Road trip");
    assert_eq!(group["user_ids"], json!([1, 2]));

    let (status, _) = send(&app, Method::GET, "/users/3", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, groups) = send(&app, Method::GET, "/groups", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(groups.as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::DELETE, &format!("/groups/{id}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, groups) = send(&app, Method::GET, "/groups", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(groups, json!([]));
}

#[tokio::test]
async fn users_endpoints() {
    let app = test_app().await;

    let (status, user) = send(&app, Method::POST, "/users", Some(json!({ "name": "Alice" }))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["name"], "Alice");

    let uri = format!("/users/{}", user["id"]);
    let (status, fetched) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, user);

    let (status, _) = send(&app, Method::POST, "/users", Some(json!({ "name": " " }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn chat_endpoint() {
    let app = test_app().await;
    let id = trip(&app).await;
    send(
        &app,
        Method::POST,
        &format!("/groups/{id}/expenses"),
        Some(json!({
            "description": "Hotel",
            "amount": 90.0,
            "paid_by": 1,
            "split_type": "equal",
            "splits": null
        })),
    )
    .await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({ "query": "How much does user 3 owes in group trip?", "user_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["answer"], "User 3 owes \u{20b9}30.00 in Trip");

    let (status, body) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({ "query": "who paid the most in Atlantis", "user_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "group \"Atlantis\" not found");

    let (status, _) = send(
        &app,
        Method::POST,
        "/chat",
        Some(json!({ "query": "  ", "user_id": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn idle_group_reports_positive_zero() {
    let app = test_app().await;
    let id = trip(&app).await;

    let (status, balances) = send(&app, Method::GET, "/users/1/balances", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(balances[id.to_string()].as_f64().unwrap().is_sign_positive());

    let (_, group) = send(&app, Method::GET, &format!("/groups/{id}"), None).await;
    assert!(group["total_expenses"].as_f64().unwrap().is_sign_positive());
}
