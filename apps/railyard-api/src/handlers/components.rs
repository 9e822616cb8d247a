//! Component handlers
//!
//! Transport edge of the write pipeline: extracts and rejects missing
//! idempotency keys, runs field validation, invokes the service and maps
//! domain failures to status codes.

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use tracing::{error, info};

use railyard_domain::catalog::{
    validation::{validate_draft, validate_drafts},
    CatalogError, ComponentDraft, ComponentId,
};

use crate::{
    dto::components::{
        ComponentRequest, ComponentResponse, ErrorResponse, FieldViolationDto,
        ValidationErrorResponse,
    },
    AppState,
};

/// Name of the header carrying the caller's idempotency key
pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";

/// List all components
#[utoipa::path(
    get,
    path = "/components",
    responses(
        (status = 200, description = "All components in insertion order", body = [ComponentResponse])
    ),
    tag = "components"
)]
pub async fn list_components(State(state): State<AppState>) -> Response {
    match state.components.get_all().await {
        Ok(components) => {
            let body: Vec<ComponentResponse> =
                components.into_iter().map(ComponentResponse::from).collect();
            (StatusCode::OK, Json(body)).into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to list components");
            error_response(err)
        }
    }
}

/// Get a single component by id
#[utoipa::path(
    get,
    path = "/components/{id}",
    params(("id" = i64, Path, description = "Component id")),
    responses(
        (status = 200, description = "The component", body = ComponentResponse),
        (status = 404, description = "No component with this id", body = ErrorResponse)
    ),
    tag = "components"
)]
pub async fn get_component(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.components.get(ComponentId::new(id)).await {
        Ok(component) => (StatusCode::OK, Json(ComponentResponse::from(component))).into_response(),
        Err(err) => error_response(err),
    }
}

/// Create a component
#[utoipa::path(
    post,
    path = "/components",
    request_body = ComponentRequest,
    params((
        "Idempotency-Key" = String,
        Header,
        description = "Opaque key making this create safe to retry"
    )),
    responses(
        (status = 201, description = "Component created (or replayed)", body = ComponentResponse),
        (status = 400, description = "Missing idempotency key or invalid input", body = ValidationErrorResponse),
        (status = 409, description = "Unique number already in use", body = ErrorResponse)
    ),
    tag = "components"
)]
pub async fn create_component(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<ComponentRequest>,
) -> Response {
    let key = match idempotency_key(&headers) {
        Ok(key) => key,
        Err(response) => return response,
    };

    let draft: ComponentDraft = payload.into();
    if let Err(err) = validate_draft(&draft) {
        return error_response(err);
    }

    match state.components.create(draft, &key).await {
        Ok(component) => {
            info!(id = %component.id(), "Created component");
            (StatusCode::CREATED, Json(ComponentResponse::from(component))).into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to create component");
            error_response(err)
        }
    }
}

/// Update an existing component
#[utoipa::path(
    put,
    path = "/components/{id}",
    request_body = ComponentRequest,
    params(("id" = i64, Path, description = "Component id")),
    responses(
        (status = 204, description = "Component updated"),
        (status = 400, description = "Invalid input", body = ValidationErrorResponse),
        (status = 404, description = "No component with this id", body = ErrorResponse),
        (status = 409, description = "Unique number already in use", body = ErrorResponse)
    ),
    tag = "components"
)]
pub async fn update_component(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ComponentRequest>,
) -> Response {
    let draft: ComponentDraft = payload.into();
    if let Err(err) = validate_draft(&draft) {
        return error_response(err);
    }

    match state.components.update(ComponentId::new(id), draft).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Delete a component by id
#[utoipa::path(
    delete,
    path = "/components/{id}",
    params(("id" = i64, Path, description = "Component id")),
    responses(
        (status = 204, description = "Component deleted"),
        (status = 404, description = "No component with this id", body = ErrorResponse)
    ),
    tag = "components"
)]
pub async fn delete_component(State(state): State<AppState>, Path(id): Path<i64>) -> Response {
    match state.components.delete(ComponentId::new(id)).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err),
    }
}

/// Bulk insert components
#[utoipa::path(
    post,
    path = "/components/bulk",
    request_body = [ComponentRequest],
    params((
        "Idempotency-Key" = String,
        Header,
        description = "Opaque key making this bulk insert safe to retry"
    )),
    responses(
        (status = 204, description = "All components inserted (or replayed)"),
        (status = 400, description = "Missing idempotency key, empty list or invalid input", body = ValidationErrorResponse),
        (status = 409, description = "A unique number is already in use", body = ErrorResponse)
    ),
    tag = "components"
)]
pub async fn bulk_insert_components(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Vec<ComponentRequest>>,
) -> Response {
    let key = match idempotency_key(&headers) {
        Ok(key) => key,
        Err(response) => return response,
    };

    if payload.is_empty() {
        return bad_request("No components specified");
    }

    let drafts: Vec<ComponentDraft> = payload.into_iter().map(ComponentDraft::from).collect();
    if let Err(err) = validate_drafts(&drafts) {
        return error_response(err);
    }

    match state.components.bulk_insert(drafts, &key).await {
        Ok(inserted) => {
            info!(inserted, "Bulk inserted components");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to bulk insert components");
            error_response(err)
        }
    }
}

/// Bulk delete components
#[utoipa::path(
    post,
    path = "/components/bulk-delete",
    request_body = [i64],
    params((
        "Idempotency-Key" = String,
        Header,
        description = "Opaque key making this bulk delete safe to retry"
    )),
    responses(
        (status = 204, description = "Matching components deleted (or replayed)"),
        (status = 400, description = "Missing idempotency key or empty list", body = ErrorResponse)
    ),
    tag = "components"
)]
pub async fn bulk_delete_components(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(payload): Json<Vec<i64>>,
) -> Response {
    let key = match idempotency_key(&headers) {
        Ok(key) => key,
        Err(response) => return response,
    };

    if payload.is_empty() {
        return bad_request("No ids specified");
    }

    let ids: Vec<ComponentId> = payload.into_iter().map(ComponentId::new).collect();
    match state.components.bulk_delete(ids, &key).await {
        Ok(removed) => {
            info!(removed, "Bulk deleted components");
            StatusCode::NO_CONTENT.into_response()
        }
        Err(err) => {
            error!(error = %err, "Failed to bulk delete components");
            error_response(err)
        }
    }
}

/// Extract the idempotency key, rejecting absent or blank values
fn idempotency_key(headers: &HeaderMap) -> Result<String, Response> {
    match headers
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|value| value.to_str().ok())
    {
        Some(key) if !key.trim().is_empty() => Ok(key.to_string()),
        _ => Err(bad_request("Idempotency-Key header is required")),
    }
}

fn bad_request(message: &str) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
        .into_response()
}

/// Map a domain failure to its client-facing outcome
fn error_response(err: CatalogError) -> Response {
    match err {
        CatalogError::Validation(violations) => (
            StatusCode::BAD_REQUEST,
            Json(ValidationErrorResponse {
                error: "validation failed".to_string(),
                violations: violations.into_iter().map(FieldViolationDto::from).collect(),
            }),
        )
            .into_response(),
        CatalogError::NotFound(id) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("component {} not found", id),
            }),
        )
            .into_response(),
        CatalogError::Conflict(unique_number) => (
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: format!("unique number '{}' is already in use", unique_number),
            }),
        )
            .into_response(),
        CatalogError::TransientStorage(msg) => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse { error: msg }),
        )
            .into_response(),
        CatalogError::Storage(msg) | CatalogError::Internal(msg) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse { error: msg }),
        )
            .into_response(),
    }
}
