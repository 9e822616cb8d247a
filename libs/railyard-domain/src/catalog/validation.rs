//! Field-level validation for component drafts
//!
//! Validation runs at the transport edge, before a draft ever reaches the
//! write pipeline. Every rule is checked and every violation collected, so a
//! caller sees the full list of problems in one response rather than one per
//! round trip.

use crate::catalog::entity::ComponentDraft;
use crate::catalog::error::{CatalogError, FieldViolation, Result};

/// Maximum length of a component name, in characters
pub const NAME_MAX_LEN: usize = 200;

/// Maximum length of a unique number, in characters
pub const UNIQUE_NUMBER_MAX_LEN: usize = 50;

/// Validate a single draft against the catalog's field rules
///
/// Rules:
/// - `name` must be non-blank and at most [`NAME_MAX_LEN`] characters
/// - `unique_number` must be non-blank and at most [`UNIQUE_NUMBER_MAX_LEN`]
///   characters
/// - `quantity` must be present when `can_assign_quantity` is true and absent
///   when it is false
///
/// # Errors
///
/// Returns `CatalogError::Validation` carrying one [`FieldViolation`] per
/// broken rule.
pub fn validate_draft(draft: &ComponentDraft) -> Result<()> {
    let violations = collect_violations(draft, None);
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(violations))
    }
}

/// Validate a batch of drafts, prefixing field names with the item index
///
/// A violation on the third item's name is reported as field `2.name`, so a
/// bulk caller can attribute each problem to the offending list entry.
pub fn validate_drafts(drafts: &[ComponentDraft]) -> Result<()> {
    let mut violations = Vec::new();
    for (index, draft) in drafts.iter().enumerate() {
        violations.extend(collect_violations(draft, Some(index)));
    }
    if violations.is_empty() {
        Ok(())
    } else {
        Err(CatalogError::Validation(violations))
    }
}

fn collect_violations(draft: &ComponentDraft, index: Option<usize>) -> Vec<FieldViolation> {
    let mut violations = Vec::new();
    let mut push = |field: &str, message: &str| {
        let field = match index {
            Some(i) => format!("{i}.{field}"),
            None => field.to_string(),
        };
        violations.push(FieldViolation::new(field, message));
    };

    if draft.name.trim().is_empty() {
        push("name", "name is required");
    } else if draft.name.chars().count() > NAME_MAX_LEN {
        push("name", "name cannot exceed 200 characters");
    }

    if draft.unique_number.trim().is_empty() {
        push("unique_number", "unique number is required");
    } else if draft.unique_number.chars().count() > UNIQUE_NUMBER_MAX_LEN {
        push("unique_number", "unique number cannot exceed 50 characters");
    }

    match (draft.can_assign_quantity, draft.quantity) {
        (true, None) => push(
            "quantity",
            "quantity must be specified when can_assign_quantity is true",
        ),
        (false, Some(_)) => push(
            "quantity",
            "quantity must be absent when can_assign_quantity is false",
        ),
        _ => {}
    }

    violations
}
