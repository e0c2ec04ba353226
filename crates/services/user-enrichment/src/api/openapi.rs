//! OpenAPI documentation.

use utoipa::OpenApi;

use super::handlers::health_handler::{HealthResponse, ServiceHealth, ServiceStatus};
use super::handlers::user_handler::{MessageResponse, UserRequest};
use domain::{PaginatedUsers, UserRecord};

/// API documentation struct.
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::handlers::user_handler::list_users,
        crate::api::handlers::user_handler::create_user,
        crate::api::handlers::user_handler::update_user,
        crate::api::handlers::user_handler::delete_user,
        crate::api::handlers::health_handler::health_check,
    ),
    components(
        schemas(
            UserRequest,
            MessageResponse,
            UserRecord,
            PaginatedUsers,
            HealthResponse,
            ServiceStatus,
            ServiceHealth,
        )
    ),
    tags(
        (name = "Users", description = "Enriched user records"),
        (name = "Health", description = "Service health")
    )
)]
pub struct ApiDoc;
