use std::sync::Arc;

use axum::http::StatusCode;
use axum_test::TestServer;
use serde_json::{json, Value};
use user_service::app::{
    self,
    health::HealthResponse,
    user::{memory::InMemoryUserRepository, User},
    AppState,
};

fn create_test_server() -> (TestServer, Arc<InMemoryUserRepository>) {
    let repository = Arc::new(InMemoryUserRepository::new());
    let state = AppState::new(repository.clone());
    let server = TestServer::new(app::router(state)).unwrap();
    (server, repository)
}

fn ada() -> Value {
    json!({ "name": "Ada", "email": "ada@x.com", "age": 30 })
}

#[tokio::test]
async fn test_user_lifecycle() {
    let (server, _) = create_test_server();

    let response = server.post("/users").json(&ada()).await;
    response.assert_status(StatusCode::CREATED);
    let created: User = response.json();
    assert_eq!(created, User { id: 1, name: "Ada".into(), email: "ada@x.com".into(), age: 30 });

    let response = server.get("/users/1").await;
    response.assert_status_ok();
    assert_eq!(response.json::<User>(), created);

    let response = server
        .put("/users/1")
        .json(&json!({ "name": "Ada L", "email": "ada@x.com", "age": 31 }))
        .await;
    response.assert_status_ok();
    let updated: User = response.json();
    assert_eq!(updated.id, 1);
    assert_eq!(updated.name, "Ada L");
    assert_eq!(updated.age, 31);
    assert_eq!(server.get("/users/1").await.json::<User>(), updated);

    server.delete("/users/1").await.assert_status(StatusCode::NO_CONTENT);
    server.get("/users/1").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_ignores_client_id() {
    let (server, _) = create_test_server();

    let response = server
        .post("/users")
        .json(&json!({ "id": 500, "name": "Bob", "email": "bob@x.com", "age": 40 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: User = response.json();
    assert_eq!(created.id, 1);
    server.get("/users/500").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_age_has_no_range_limit() {
    let (server, _) = create_test_server();

    let response = server
        .post("/users")
        .json(&json!({ "name": "A", "email": "a@x", "age": 5_000_000_000u64 }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let created: User = response.json();
    assert_eq!(created.age, 5_000_000_000);

    let response = server
        .put(&format!("/users/{}", created.id))
        .json(&json!({ "name": "A", "email": "a@x", "age": u64::MAX }))
        .await;
    response.assert_status_ok();
    assert_eq!(server.get("/users/1").await.json::<User>().age, u64::MAX);
}

#[tokio::test]
async fn test_list_is_empty_array_without_users() {
    let (server, _) = create_test_server();

    let response = server.get("/users").await;
    response.assert_status_ok();
    assert_eq!(response.json::<Value>(), json!([]));
}

#[tokio::test]
async fn test_list_returns_all_users() {
    let (server, _) = create_test_server();
    server.post("/users").json(&ada()).await;
    server
        .post("/users")
        .json(&json!({ "name": "Grace", "email": "grace@x.com", "age": 45 }))
        .await;

    let users: Vec<User> = server.get("/users").await.json();
    let names: Vec<_> = users.iter().map(|u| u.name.as_str()).collect();
    assert_eq!(names, ["Ada", "Grace"]);
}

#[tokio::test]
async fn test_invalid_users_are_rejected_and_not_persisted() {
    let (server, repository) = create_test_server();
    let cases = [
        (json!({ "name": "  ", "email": "a@x.com", "age": 1 }), "name is required"),
        (json!({ "name": "A", "email": "", "age": 1 }), "email is required"),
        (json!({ "name": "A", "email": "ax.com", "age": 1 }), "email format is invalid"),
        (json!({}), "name is required"),
    ];

    for (body, message) in &cases {
        let response = server.post("/users").json(body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], *message);
    }
    assert!(repository.is_empty().await);

    server.post("/users").json(&ada()).await.assert_status(StatusCode::CREATED);
    for (body, message) in &cases {
        let response = server.put("/users/1").json(body).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        assert_eq!(response.json::<Value>()["message"], *message);
    }
    let stored: User = server.get("/users/1").await.json();
    assert_eq!(stored.name, "Ada");
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let (server, repository) = create_test_server();

    let response = server
        .post("/users")
        .text("{\"name\": \"Ada\",")
        .content_type("application/json")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "BAD_REQUEST");

    // age 类型错误同样视为格式错误
    server
        .post("/users")
        .json(&json!({ "name": "Ada", "email": "ada@x.com", "age": -3 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    server
        .post("/users")
        .json(&json!([1, 2, 3]))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    // 非 JSON content type 也返回 400 而不是 415
    let response = server
        .post("/users")
        .text(ada().to_string())
        .content_type("text/plain")
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    assert_eq!(response.json::<Value>()["error"], "BAD_REQUEST");

    assert!(repository.is_empty().await);
}

#[tokio::test]
async fn test_invalid_id_is_bad_request() {
    let (server, _) = create_test_server();

    server.get("/users/abc").await.assert_status(StatusCode::BAD_REQUEST);
    server
        .get("/users/99999999999999999999999")
        .await
        .assert_status(StatusCode::BAD_REQUEST);
    server.put("/users/x1").json(&ada()).await.assert_status(StatusCode::BAD_REQUEST);
    server.delete("/users/1.0").await.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_missing_user_is_not_found() {
    let (server, repository) = create_test_server();

    let response = server.get("/users/12345").await;
    response.assert_status(StatusCode::NOT_FOUND);
    assert_eq!(response.json::<Value>()["message"], "user not found");

    server.put("/users/7").json(&ada()).await.assert_status(StatusCode::NOT_FOUND);
    assert!(repository.is_empty().await);

    server.delete("/users/7").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_twice() {
    let (server, _) = create_test_server();
    server.post("/users").json(&ada()).await;

    server.delete("/users/1").await.assert_status(StatusCode::NO_CONTENT);
    server.delete("/users/1").await.assert_status(StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_store_failure_is_internal_error_without_details() {
    let (server, repository) = create_test_server();
    server.post("/users").json(&ada()).await;
    repository.set_available(false);

    let response = server.post("/users").json(&ada()).await;
    response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json();
    assert_eq!(body["message"], "failed to create user");
    assert_eq!(body["code"], 500);

    server.get("/users").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server.get("/users/1").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server.put("/users/1").json(&ada()).await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
    server.delete("/users/1").await.assert_status(StatusCode::INTERNAL_SERVER_ERROR);

    // 校验先于存储调用
    server
        .post("/users")
        .json(&json!({ "name": "", "email": "a@x.com", "age": 1 }))
        .await
        .assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_follows_store_availability() {
    let (server, repository) = create_test_server();

    for path in ["/health", "/healthy"] {
        let response = server.get(path).await;
        response.assert_status_ok();
        assert_eq!(response.json::<HealthResponse>().status, "OK");
    }

    repository.set_available(false);
    let response = server.get("/health").await;
    response.assert_status(StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(response.json::<Value>(), json!({ "status": "DB_UNAVAILABLE" }));

    repository.set_available(true);
    server.get("/health").await.assert_status_ok();
}

#[tokio::test]
async fn test_responses_carry_request_id() {
    let (server, _) = create_test_server();

    let response = server.get("/health").await;
    let request_id = response.header("x-request-id");
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}
