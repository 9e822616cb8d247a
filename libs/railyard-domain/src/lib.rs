//! # Railyard Domain Layer
//!
//! This crate contains the pure business logic and domain models for the
//! Railyard component catalog. It follows hexagonal architecture principles:
//!
//! - **Entities**: Core domain models (Component)
//! - **Ports**: Trait definitions for external dependencies (ComponentStore,
//!   IdempotencyStore)
//! - **Services**: Business logic orchestration (the idempotent, transactional
//!   write pipeline)
//!
//! ## Architecture
//!
//! This layer has NO dependencies on infrastructure concerns (databases, HTTP,
//! etc.). All external dependencies are expressed as traits (ports) that are
//! implemented by adapter layers.
//!
//! The write pipeline guards every mutating operation with a database
//! transaction and a bounded retry budget for transient infrastructure
//! failures, and makes create/bulk operations safe to retry through
//! caller-supplied idempotency keys.
//!
//! ## Example
//!
//! ```rust
//! use railyard_domain::catalog::{ComponentDraft, ComponentService};
//!
//! async fn example<S, I>(service: ComponentService<S, I>)
//! where
//!     S: railyard_domain::ports::ComponentStore,
//!     I: railyard_domain::ports::IdempotencyStore,
//! {
//!     let draft = ComponentDraft {
//!         name: "Engine".to_string(),
//!         unique_number: "ENG123".to_string(),
//!         can_assign_quantity: false,
//!         quantity: None,
//!     };
//!     let component = service.create(draft, "req-42").await.unwrap();
//!     println!("Created component: {}", component.id());
//! }
//! ```

pub mod catalog;
pub mod ports;

// Re-export commonly used types
pub use catalog::{
    CatalogConfig, CatalogError, Component, ComponentDraft, ComponentId, ComponentService,
    FieldViolation, RetryPolicy, TransactionalExecutor,
};
pub use ports::{ComponentStore, ComponentTransaction, IdempotencyStore};
