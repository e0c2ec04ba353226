//! User handlers.

use axum::{
    extract::{Path, Query, State},
    response::Json,
    routing::{get, put},
    Router,
};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use common::AppResult;
use domain::{PaginatedUsers, User};

use crate::api::extractors::ValidatedJson;
use crate::api::state::AppState;

/// Listing query. Values stay raw; fallback rules are applied by the service.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListUsersParams {
    /// Page number, starting at 1
    pub page: Option<String>,
    /// Rows per page
    #[serde(rename = "pageSize", alias = "page_size")]
    pub page_size: Option<String>,
    /// Column to order by
    pub sort: Option<String>,
}

/// User create/update request with validation
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UserRequest {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    #[schema(example = "Dmitriy")]
    pub name: String,
    #[validate(length(min = 1, message = "Surname cannot be empty"))]
    #[schema(example = "Ushakov")]
    pub surname: String,
    #[serde(default)]
    #[schema(example = "Vasilevich")]
    pub patronymic: String,
}

impl From<UserRequest> for User {
    fn from(req: UserRequest) -> Self {
        User {
            name: req.name,
            surname: req.surname,
            patronymic: req.patronymic,
        }
    }
}

/// Confirmation returned by mutating endpoints
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    fn new(message: &str) -> Json<Self> {
        Json(Self {
            message: message.to_string(),
        })
    }
}

/// Create user routes
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:id", put(update_user).delete(delete_user))
}

/// List users page by page
#[utoipa::path(
    get,
    path = "/users",
    tag = "Users",
    params(ListUsersParams),
    responses(
        (status = 200, description = "One page of users", body = PaginatedUsers),
        (status = 400, description = "Unknown sort column"),
        (status = 500, description = "Storage failure")
    )
)]
pub async fn list_users(
    State(state): State<AppState>,
    Query(params): Query<ListUsersParams>,
) -> AppResult<Json<PaginatedUsers>> {
    let cancel = state.request_token();
    let users = state
        .user_service
        .list_users(
            params.page.as_deref().unwrap_or_default(),
            params.page_size.as_deref().unwrap_or_default(),
            params.sort.as_deref(),
            &cancel,
        )
        .await?;

    Ok(Json(users))
}

/// Create a user enriched with age, gender and nationality
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = UserRequest,
    responses(
        (status = 200, description = "User saved", body = MessageResponse),
        (status = 400, description = "Malformed or invalid body"),
        (status = 502, description = "Attribute lookup failed")
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<MessageResponse>> {
    let cancel = state.request_token();
    state
        .user_service
        .create_user(payload.into(), &cancel)
        .await?;

    Ok(MessageResponse::new("User has been saved successfully."))
}

/// Re-enrich and overwrite a user
#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    request_body = UserRequest,
    responses(
        (status = 200, description = "User updated", body = MessageResponse),
        (status = 400, description = "Malformed or invalid body"),
        (status = 404, description = "Malformed user ID"),
        (status = 502, description = "Attribute lookup failed")
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(payload): ValidatedJson<UserRequest>,
) -> AppResult<Json<MessageResponse>> {
    let cancel = state.request_token();
    state
        .user_service
        .update_user(&id, payload.into(), &cancel)
        .await?;

    Ok(MessageResponse::new("User has been updated successfully."))
}

/// Delete a user
#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "Users",
    params(
        ("id" = String, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User deleted", body = MessageResponse),
        (status = 404, description = "Malformed user ID")
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let cancel = state.request_token();
    state.user_service.delete_user(&id, &cancel).await?;

    Ok(MessageResponse::new("User has been deleted successfully."))
}
