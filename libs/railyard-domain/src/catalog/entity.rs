//! Domain entities for the component catalog
//!
//! This module defines the core domain model for catalog components. A
//! Component is a single row of the catalog: identified by a store-generated
//! id, carrying a globally unique number, and optionally tracking a quantity.

use serde::{Deserialize, Serialize};

use crate::catalog::ids::ComponentId;

/// Input record for creating or updating a component
///
/// A draft carries every component field except the identity, which is
/// generated by the store on insert. Drafts are validated at the transport
/// edge (see [`crate::catalog::validation`]) before they reach the write
/// pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentDraft {
    /// Display name, 1..=200 characters
    pub name: String,
    /// Globally unique reference number, 1..=50 characters
    pub unique_number: String,
    /// Whether this component tracks a stock quantity
    pub can_assign_quantity: bool,
    /// Stock quantity; present iff `can_assign_quantity` is true
    pub quantity: Option<u32>,
}

/// A catalog component as persisted by the store
///
/// Invariants:
/// - `id` is assigned once by the store and never changes
/// - `unique_number` is globally unique across the catalog
/// - `quantity` is present iff `can_assign_quantity` is true; non-negativity
///   is unrepresentable (`u32`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Component {
    id: ComponentId,
    name: String,
    unique_number: String,
    can_assign_quantity: bool,
    quantity: Option<u32>,
}

impl Component {
    /// Materialize a component from a draft and a freshly assigned id
    ///
    /// This is how the insert path builds the persisted entity; it performs
    /// no I/O and no validation.
    pub fn from_draft(id: ComponentId, draft: ComponentDraft) -> Self {
        Self {
            id,
            name: draft.name,
            unique_number: draft.unique_number,
            can_assign_quantity: draft.can_assign_quantity,
            quantity: draft.quantity,
        }
    }

    /// Create a Component with explicit values (used for reconstruction)
    pub fn from_parts(
        id: ComponentId,
        name: impl Into<String>,
        unique_number: impl Into<String>,
        can_assign_quantity: bool,
        quantity: Option<u32>,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            unique_number: unique_number.into(),
            can_assign_quantity,
            quantity,
        }
    }

    /// Map a draft's fields onto this component, leaving the id untouched
    ///
    /// This is the update path's field copy: every mutable field is taken
    /// from the draft.
    pub fn apply_draft(&mut self, draft: &ComponentDraft) {
        self.name = draft.name.clone();
        self.unique_number = draft.unique_number.clone();
        self.can_assign_quantity = draft.can_assign_quantity;
        self.quantity = draft.quantity;
    }

    /// Get the component's unique identifier
    pub fn id(&self) -> ComponentId {
        self.id
    }

    /// Get the display name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the globally unique reference number
    pub fn unique_number(&self) -> &str {
        &self.unique_number
    }

    /// Whether this component tracks a stock quantity
    pub fn can_assign_quantity(&self) -> bool {
        self.can_assign_quantity
    }

    /// Get the stock quantity, if tracked
    pub fn quantity(&self) -> Option<u32> {
        self.quantity
    }
}
