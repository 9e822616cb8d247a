//! DTOs for component endpoints

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use railyard_domain::catalog::{Component, ComponentDraft, FieldViolation};

/// Request body for creating or updating a component
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ComponentRequest {
    /// Display name
    #[schema(example = "Engine")]
    pub name: String,
    /// Globally unique reference number
    #[schema(example = "ENG123")]
    pub unique_number: String,
    /// Whether this component tracks a stock quantity
    #[schema(example = false)]
    pub can_assign_quantity: bool,
    /// Stock quantity; required iff `can_assign_quantity` is true
    #[schema(example = json!(null))]
    pub quantity: Option<u32>,
}

impl From<ComponentRequest> for ComponentDraft {
    fn from(request: ComponentRequest) -> Self {
        Self {
            name: request.name,
            unique_number: request.unique_number,
            can_assign_quantity: request.can_assign_quantity,
            quantity: request.quantity,
        }
    }
}

/// Response body for a single component
#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentResponse {
    /// Store-assigned identifier
    #[schema(example = 1)]
    pub id: i64,
    /// Display name
    #[schema(example = "Engine")]
    pub name: String,
    /// Globally unique reference number
    #[schema(example = "ENG123")]
    pub unique_number: String,
    /// Whether this component tracks a stock quantity
    pub can_assign_quantity: bool,
    /// Stock quantity, if tracked
    pub quantity: Option<u32>,
}

impl From<Component> for ComponentResponse {
    fn from(component: Component) -> Self {
        Self {
            id: component.id().as_i64(),
            name: component.name().to_string(),
            unique_number: component.unique_number().to_string(),
            can_assign_quantity: component.can_assign_quantity(),
            quantity: component.quantity(),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error description
    #[schema(example = "Idempotency-Key header is required")]
    pub error: String,
}

/// A single field-level validation problem
#[derive(Debug, Serialize, ToSchema)]
pub struct FieldViolationDto {
    /// Offending field
    #[schema(example = "quantity")]
    pub field: String,
    /// Reason
    #[schema(example = "quantity must be specified when can_assign_quantity is true")]
    pub message: String,
}

impl From<FieldViolation> for FieldViolationDto {
    fn from(violation: FieldViolation) -> Self {
        Self {
            field: violation.field,
            message: violation.message,
        }
    }
}

/// Error response body carrying field-level validation problems
#[derive(Debug, Serialize, ToSchema)]
pub struct ValidationErrorResponse {
    /// Error description
    #[schema(example = "validation failed")]
    pub error: String,
    /// One entry per broken rule
    pub violations: Vec<FieldViolationDto>,
}
