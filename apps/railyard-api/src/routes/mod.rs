//! API routes

pub mod components;

use axum::Router;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    dto::components::{
        ComponentRequest, ComponentResponse, ErrorResponse, FieldViolationDto,
        ValidationErrorResponse,
    },
    handlers, AppState,
};

/// OpenAPI documentation structure
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::components::list_components,
        handlers::components::get_component,
        handlers::components::create_component,
        handlers::components::update_component,
        handlers::components::delete_component,
        handlers::components::bulk_insert_components,
        handlers::components::bulk_delete_components,
        health_handler
    ),
    components(
        schemas(
            ComponentRequest,
            ComponentResponse,
            ErrorResponse,
            FieldViolationDto,
            ValidationErrorResponse
        )
    ),
    tags(
        (name = "components", description = "Component catalog endpoints"),
        (name = "health", description = "Health check endpoints")
    ),
    info(
        title = "Railyard API",
        version = "0.1.0",
        description = "Component catalog service with idempotent, transactional writes",
        contact(
            name = "Railyard Team"
        )
    )
)]
pub struct ApiDoc;

/// Create the main application router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .merge(components::routes())
        .route("/health", axum::routing::get(health_handler))
        .with_state(state)
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = String)
    ),
    tag = "health"
)]
async fn health_handler() -> &'static str {
    "OK"
}
