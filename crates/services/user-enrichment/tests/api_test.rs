//! Integration tests for API endpoints.
//!
//! These tests use a fake user service and mock database connections so the
//! router can be exercised without PostgreSQL or the attribute providers.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use sea_orm::{DatabaseBackend, DatabaseConnection, MockDatabase};
use serde_json::{json, Value};
use tokio_util::sync::CancellationToken;
use tower::ServiceExt;

use common::{AppError, AppResult};
use domain::{
    parse_user_id, PageRequest, PaginatedUsers, SortColumn, User, UserFields, UserRecord,
};
use user_enrichment_lib::api::{create_router, AppState};
use user_enrichment_lib::infra::Database;
use user_enrichment_lib::service::UserService;

// =============================================================================
// Fake service
// =============================================================================

/// Applies the same input rules as the real service and records what it saw.
#[derive(Default)]
struct FakeUserService {
    calls: Mutex<Vec<String>>,
    fail_enrichment: bool,
}

impl FakeUserService {
    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl UserService for FakeUserService {
    async fn list_users(
        &self,
        page: &str,
        page_size: &str,
        sort: Option<&str>,
        _cancel: &CancellationToken,
    ) -> AppResult<PaginatedUsers> {
        let sort = SortColumn::resolve(sort)?;
        self.record(format!("list {} {} {}", page, page_size, sort));

        let record = UserRecord::from_fields(
            1,
            UserFields {
                name: "Dmitriy".to_string(),
                surname: "Ushakov".to_string(),
                patronymic: "Vasilevich".to_string(),
                age: 42,
                gender: "male".to_string(),
                nationality: "UA".to_string(),
            },
        );
        Ok(PaginatedUsers::new(
            vec![record],
            PageRequest::parse(page, page_size),
        ))
    }

    async fn create_user(&self, user: User, _cancel: &CancellationToken) -> AppResult<()> {
        if self.fail_enrichment {
            return Err(AppError::enrichment("age lookup returned HTTP 500"));
        }
        self.record(format!("create {} {} {}", user.name, user.surname, user.patronymic));
        Ok(())
    }

    async fn update_user(
        &self,
        id: &str,
        user: User,
        _cancel: &CancellationToken,
    ) -> AppResult<()> {
        let id = parse_user_id(id)?;
        self.record(format!("update {} {}", id, user.name));
        Ok(())
    }

    async fn delete_user(&self, id: &str, _cancel: &CancellationToken) -> AppResult<()> {
        let id = parse_user_id(id)?;
        self.record(format!("delete {}", id));
        Ok(())
    }
}

// =============================================================================
// Helpers
// =============================================================================

fn healthy_connection() -> DatabaseConnection {
    MockDatabase::new(DatabaseBackend::Postgres).into_connection()
}

fn app_with(service: Arc<FakeUserService>, connection: DatabaseConnection) -> Router {
    let state = AppState::new(
        service,
        Database::from_connection(connection),
        CancellationToken::new(),
    );
    create_router(state)
}

fn app(service: Arc<FakeUserService>) -> Router {
    app_with(service, DatabaseConnection::Disconnected)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn list_returns_page_with_camel_case_size_param() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(app(service.clone()), get("/users?page=2&pageSize=5&sort=age")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 2);
    assert_eq!(body["pageSize"], 5);
    assert_eq!(body["users"][0]["nationality"], "UA");
    assert_eq!(service.calls(), ["list 2 5 age"]);
}

#[tokio::test]
async fn list_accepts_snake_case_alias_and_missing_params() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(app(service.clone()), get("/users?page_size=3")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["page"], 1);
    assert_eq!(body["pageSize"], 3);

    let (status, body) = send(app(service.clone()), get("/users")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["pageSize"], 10);
    assert_eq!(service.calls(), ["list  3 id", "list   id"]);
}

#[tokio::test]
async fn list_with_unknown_sort_is_bad_request() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(app(service.clone()), get("/users?sort=password")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn create_returns_confirmation_message() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(
        app(service.clone()),
        with_json("POST", "/users", json!({ "name": "Dmitriy", "surname": "Ushakov" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User has been saved successfully.");
    // Patronymic is optional
    assert_eq!(service.calls(), ["create Dmitriy Ushakov "]);
}

#[tokio::test]
async fn create_with_malformed_json_is_bad_request() {
    let service = Arc::new(FakeUserService::default());
    let request = Request::builder()
        .method("POST")
        .uri("/users")
        .header("content-type", "application/json")
        .body(Body::from("{\"name\": "))
        .unwrap();

    let (status, body) = send(app(service.clone()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn create_with_empty_name_fails_validation() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(
        app(service.clone()),
        with_json("POST", "/users", json!({ "name": "", "surname": "Ushakov" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["message"], "Name cannot be empty");
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn create_enrichment_failure_is_bad_gateway_without_details() {
    let service = Arc::new(FakeUserService {
        fail_enrichment: true,
        ..Default::default()
    });

    let (status, body) = send(
        app(service),
        with_json("POST", "/users", json!({ "name": "Oleg", "surname": "Petrov" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["error"]["message"], "Could not look up user attributes");
}

#[tokio::test]
async fn update_returns_confirmation_message() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(
        app(service.clone()),
        with_json(
            "PUT",
            "/users/7",
            json!({ "name": "Oleg", "surname": "Petrov", "patronymic": "Olegovich" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User has been updated successfully.");
    assert_eq!(service.calls(), ["update 7 Oleg"]);
}

#[tokio::test]
async fn update_with_malformed_id_is_not_found() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(
        app(service.clone()),
        with_json("PUT", "/users/abc", json!({ "name": "Oleg", "surname": "Petrov" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "NOT_FOUND");
    assert!(service.calls().is_empty());
}

#[tokio::test]
async fn delete_returns_confirmation_message() {
    let service = Arc::new(FakeUserService::default());
    let request = Request::builder()
        .method("DELETE")
        .uri("/users/12")
        .body(Body::empty())
        .unwrap();

    let (status, body) = send(app(service.clone()), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "User has been deleted successfully.");
    assert_eq!(service.calls(), ["delete 12"]);
}

#[tokio::test]
async fn delete_with_negative_id_is_not_found() {
    let service = Arc::new(FakeUserService::default());
    let request = Request::builder()
        .method("DELETE")
        .uri("/users/-1")
        .body(Body::empty())
        .unwrap();

    let (status, _) = send(app(service.clone()), request).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(service.calls().is_empty());
}

// =============================================================================
// Health and docs
// =============================================================================

#[tokio::test]
async fn health_is_ok_when_database_answers() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(app_with(service, healthy_connection()), get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["services"]["database"]["status"], "healthy");
}

#[tokio::test]
async fn health_is_degraded_without_database() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(app(service), get("/health")).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
    assert!(body["services"]["database"]["error"].is_string());
}

#[tokio::test]
async fn openapi_document_lists_user_routes() {
    let service = Arc::new(FakeUserService::default());

    let (status, body) = send(app(service), get("/api-docs/openapi.json")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/users"].is_object());
    assert!(body["paths"]["/users/{id}"]["put"].is_object());
    assert!(body["paths"]["/health"].is_object());
}
